use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::{
    entities::{Coordinates, Location},
    error::{duplicate_location_error, Error},
};

/// The session's place list, mirrored to a single JSON file.
#[derive(Debug)]
pub struct PlaceStore {
    path: PathBuf,
    locations: Vec<Location>,
}

impl PlaceStore {
    /// Missing and corrupt save files both load as an empty list.
    #[tracing::instrument(name = "PlaceStore::load", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let locations = match read_locations(&path) {
            Ok(locations) => locations,
            Err(err) => {
                tracing::warn!(?err, "no saved locations, starting with an empty list");
                Vec::new()
            }
        };

        Self { path, locations }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn find(&self, id: &Uuid) -> Option<&Location> {
        self.locations.iter().find(|location| &location.id == id)
    }

    #[tracing::instrument(skip(self))]
    pub fn add(&mut self, coordinates: Coordinates) -> Result<Location, Error> {
        if self
            .locations
            .iter()
            .any(|location| location.is_at(coordinates))
        {
            return Err(duplicate_location_error());
        }

        let location = Location::new(coordinates);
        self.locations.push(location.clone());
        self.save();

        Ok(location)
    }

    /// Replaces the record identified by `selected` wholesale. Saves even when
    /// nothing matched.
    #[tracing::instrument(skip(self, location))]
    pub fn update(&mut self, selected: &Uuid, location: Location) {
        if let Some(index) = self.locations.iter().position(|l| &l.id == selected) {
            self.locations[index] = location;
        }

        self.save();
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn save(&self) {
        if let Err(err) = write_locations(&self.path, &self.locations) {
            tracing::error!(?err, "unable to save locations");
        }
    }

    /// Removes the save file. The in-memory list is only cleared once the
    /// file is gone.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn delete_all(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => self.locations.clear(),
            Err(err) => tracing::error!(?err, "unable to delete saved locations"),
        }
    }
}

fn read_locations(path: &Path) -> Result<Vec<Location>, Error> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

// The temp file is created 0600 under a unique name next to the target, then
// renamed over it.
fn write_locations(path: &Path, locations: &[Location]) -> Result<(), Error> {
    let data = serde_json::to_vec(locations)?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&data)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;

    Ok(())
}

#[cfg(test)]
fn coordinates(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates {
        latitude,
        longitude,
    }
}

#[test]
fn load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();

    let store = PlaceStore::load(dir.path().join("savedPlaces"));
    assert!(store.is_empty());
}

#[test]
fn load_malformed_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savedPlaces");
    fs::write(&path, b"[{\"id\": \"not-a-uuid\"").unwrap();

    let store = PlaceStore::load(&path);
    assert!(store.is_empty());
}

#[test]
fn add_appends_and_rejects_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = PlaceStore::load(dir.path().join("savedPlaces"));

    let first = store.add(coordinates(50.0, 0.0)).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.locations()[0], first);

    let err = store.add(coordinates(50.0, 0.0)).unwrap_err();
    assert_eq!(err.code, 102);
    assert_eq!(store.len(), 1);

    store.add(coordinates(50.0, 0.5)).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn saved_list_loads_back_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savedPlaces");

    let mut store = PlaceStore::load(&path);
    store.add(coordinates(1.0, 1.0)).unwrap();
    store.add(coordinates(2.0, 2.0)).unwrap();
    store.add(coordinates(3.0, 3.0)).unwrap();

    let reloaded = PlaceStore::load(&path);
    assert_eq!(reloaded.locations(), store.locations());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn update_replaces_only_the_selected_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savedPlaces");

    let mut store = PlaceStore::load(&path);
    let first = store.add(coordinates(1.0, 1.0)).unwrap();
    let second = store.add(coordinates(2.0, 2.0)).unwrap();

    let mut edited = second.clone();
    edited.id = Uuid::new_v4();
    edited.name = "pier".into();
    edited.description = "windy".into();
    store.update(&second.id, edited.clone());

    assert_eq!(store.locations(), &[first.clone(), edited.clone()]);
    assert_eq!(PlaceStore::load(&path).locations(), &[first, edited]);
}

#[test]
fn update_unknown_record_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = PlaceStore::load(dir.path().join("savedPlaces"));
    let existing = store.add(coordinates(1.0, 1.0)).unwrap();

    store.update(&Uuid::new_v4(), Location::new(coordinates(9.0, 9.0)));

    assert_eq!(store.locations(), &[existing]);
}

#[test]
fn delete_all_clears_list_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savedPlaces");

    let mut store = PlaceStore::load(&path);
    store.add(coordinates(1.0, 1.0)).unwrap();
    assert!(path.exists());

    store.delete_all();
    assert!(store.is_empty());
    assert!(!path.exists());
    assert!(PlaceStore::load(&path).is_empty());
}

#[test]
fn delete_all_without_file_keeps_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savedPlaces");

    let mut store = PlaceStore::load(&path);
    store.add(coordinates(1.0, 1.0)).unwrap();
    fs::remove_file(&path).unwrap();

    store.delete_all();
    assert_eq!(store.len(), 1);
}

#[cfg(unix)]
#[test]
fn save_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savedPlaces");

    let mut store = PlaceStore::load(&path);
    store.add(coordinates(1.0, 1.0)).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn save_replaces_loose_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savedPlaces");
    let stale_tmp = dir.path().join("savedPlaces.tmp");

    fs::write(&path, b"[]").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    fs::write(&stale_tmp, b"[]").unwrap();
    fs::set_permissions(&stale_tmp, fs::Permissions::from_mode(0o644)).unwrap();

    let mut store = PlaceStore::load(&path);
    store.add(coordinates(1.0, 1.0)).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert_eq!(PlaceStore::load(&path).len(), 1);
}

#[test]
fn failed_save_is_not_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("savedPlaces");

    let mut store = PlaceStore::load(&path);
    store.add(coordinates(1.0, 1.0)).unwrap();
    store.add(coordinates(2.0, 2.0)).unwrap();

    assert_eq!(store.len(), 2);
    assert!(!path.exists());
}

#[test]
fn failed_save_leaves_target_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savedPlaces");

    // A non-empty directory in place of the save file makes the final rename fail.
    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep"), b"prior").unwrap();

    let mut store = PlaceStore::load(&path);
    store.add(coordinates(1.0, 1.0)).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(fs::read(path.join("keep")).unwrap(), b"prior");

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("savedPlaces")]);
}
