use serde::Serialize;
use uuid::Uuid;

use crate::{
    entities::{Location, Page},
    external::wikipedia::WikipediaClient,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", content = "pages", rename_all = "snake_case")]
pub enum LoadingState {
    Loading,
    Loaded(Vec<Page>),
    Failed,
}

/// Working copy of a place while its details are being edited.
#[derive(Clone, Debug)]
pub struct EditSession {
    pub location: Location,
    pub name: String,
    pub description: String,
    pub loading_state: LoadingState,
}

impl EditSession {
    pub fn new(location: Location) -> Self {
        Self {
            name: location.name.clone(),
            description: location.description.clone(),
            location,
            loading_state: LoadingState::Loading,
        }
    }

    #[tracing::instrument(skip_all, fields(location = %self.location.id))]
    pub async fn fetch_nearby(&mut self, client: &WikipediaClient) {
        self.loading_state = match client.find_nearby_pages(self.location.coordinates()).await {
            Ok(pages) => LoadingState::Loaded(pages),
            Err(err) => {
                tracing::warn!(code = err.code, "nearby search failed");
                LoadingState::Failed
            }
        };
    }

    /// The record to save. It always gets a fresh id.
    pub fn finish(self) -> Location {
        Location {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            ..self.location
        }
    }
}

#[test]
fn finish_keeps_coordinates_and_regenerates_id() {
    use crate::entities::Coordinates;

    let original = Location::new(Coordinates {
        latitude: 48.85,
        longitude: 2.29,
    });

    let mut session = EditSession::new(original.clone());
    assert_eq!(session.name, "new location");
    assert_eq!(session.loading_state, LoadingState::Loading);

    session.name = "Eiffel Tower".into();
    session.description = "tall".into();
    let saved = session.finish();

    assert_ne!(saved.id, original.id);
    assert_eq!(saved.name, "Eiffel Tower");
    assert_eq!(saved.description, "tall");
    assert_eq!(saved.coordinates(), original.coordinates());
}

#[test]
fn fetch_against_unreachable_host_fails() {
    use crate::entities::Coordinates;

    // Nothing listens on port 9 of the loopback interface.
    let client = WikipediaClient::new("http://127.0.0.1:9");
    let mut session = EditSession::new(Location::new(Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    }));

    tokio_test::block_on(session.fetch_nearby(&client));

    assert_eq!(session.loading_state, LoadingState::Failed);
}

#[test]
fn loading_state_serializes_with_tag() {
    assert_eq!(
        serde_json::to_value(LoadingState::Failed).unwrap(),
        serde_json::json!({ "state": "failed" })
    );
    assert_eq!(
        serde_json::to_value(LoadingState::Loaded(vec![])).unwrap(),
        serde_json::json!({ "state": "loaded", "pages": [] })
    );
}
