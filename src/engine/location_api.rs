use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::LocationAPI,
    edit::EditSession,
    entities::Location,
    error::{not_found_error, Error},
    store::PlaceStore,
};

#[async_trait]
impl LocationAPI for Engine {
    async fn list_locations(&self) -> Result<Vec<Location>, Error> {
        self.gate.ensure_unlocked()?;

        Ok(self.store.lock().await.locations().to_vec())
    }

    #[tracing::instrument(skip(self))]
    async fn add_location(&self) -> Result<Location, Error> {
        self.gate.ensure_unlocked()?;

        let center = self.region.lock().await.center;
        let location = self.with_store(move |store| store.add(center)).await??;

        tracing::info!(id = %location.id, "added location");

        Ok(location)
    }

    #[tracing::instrument(skip(self))]
    async fn update_location(
        &self,
        id: Uuid,
        name: String,
        description: String,
    ) -> Result<Location, Error> {
        self.gate.ensure_unlocked()?;

        self.with_store(move |store: &mut PlaceStore| -> Result<Location, Error> {
            let selected = store.find(&id).cloned().ok_or_else(|| not_found_error())?;

            let mut session = EditSession::new(selected);
            session.name = name;
            session.description = description;
            let location = session.finish();

            store.update(&id, location.clone());

            Ok(location)
        })
        .await?
    }

    #[tracing::instrument(skip(self))]
    async fn delete_all_locations(&self) -> Result<(), Error> {
        self.gate.ensure_unlocked()?;

        self.with_store(|store| store.delete_all()).await
    }
}

#[cfg(test)]
fn unlocked_engine(dir: &std::path::Path) -> Engine {
    let engine = super::test_engine(dir);
    engine.gate().unlock();
    engine
}

#[test]
fn locked_engine_rejects_place_operations() {
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();
    let engine = super::test_engine(dir.path());

    assert_eq!(block_on(engine.list_locations()).unwrap_err().code, 103);
    assert_eq!(block_on(engine.add_location()).unwrap_err().code, 103);
    assert_eq!(block_on(engine.delete_all_locations()).unwrap_err().code, 103);
}

#[test]
fn add_uses_region_center_once() {
    use crate::api::SessionAPI;
    use crate::entities::{Coordinates, MapRegion};
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();
    let engine = unlocked_engine(dir.path());

    let location = block_on(engine.add_location()).unwrap();
    assert_eq!(location.coordinates(), MapRegion::default().center);
    assert_eq!(block_on(engine.add_location()).unwrap_err().code, 102);

    let mut region = MapRegion::default();
    region.center = Coordinates {
        latitude: 40.7,
        longitude: -74.0,
    };
    block_on(engine.set_map_region(region)).unwrap();
    block_on(engine.add_location()).unwrap();

    assert_eq!(block_on(engine.list_locations()).unwrap().len(), 2);
}

#[test]
fn update_saves_edited_record_under_new_id() {
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();
    let engine = unlocked_engine(dir.path());

    let added = block_on(engine.add_location()).unwrap();
    let edited =
        block_on(engine.update_location(added.id, "home".into(), "my house".into())).unwrap();

    assert_ne!(edited.id, added.id);
    assert_eq!(block_on(engine.list_locations()).unwrap(), vec![edited.clone()]);

    let err = block_on(engine.update_location(added.id, "again".into(), "".into())).unwrap_err();
    assert_eq!(err.code, 104);

    let reloaded = super::test_engine(dir.path());
    reloaded.gate().unlock();
    assert_eq!(block_on(reloaded.list_locations()).unwrap(), vec![edited]);
}

#[test]
fn delete_all_empties_the_session() {
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();
    let engine = unlocked_engine(dir.path());

    block_on(engine.add_location()).unwrap();
    block_on(engine.delete_all_locations()).unwrap();

    assert!(block_on(engine.list_locations()).unwrap().is_empty());
    assert!(!dir.path().join("savedPlaces").exists());
}
