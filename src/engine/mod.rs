mod location_api;
mod search_api;
mod session_api;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    api::API,
    auth::{AccessGate, AuthenticatorFactory, PasscodeAuthenticator},
    config::Config,
    entities::MapRegion,
    error::{server_error, Error},
    external::wikipedia::WikipediaClient,
    store::PlaceStore,
};

/// Session state shared by every request. The store mutex serializes all
/// reads and writes of the place list and its save file.
pub struct Engine {
    store: Arc<Mutex<PlaceStore>>,
    region: Mutex<MapRegion>,
    gate: AccessGate,
    wikipedia: WikipediaClient,
    authenticators: AuthenticatorFactory,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip(authenticators))]
    pub fn new(
        save_path: &Path,
        wikipedia: WikipediaClient,
        authenticators: AuthenticatorFactory,
    ) -> Self {
        let store = PlaceStore::load(save_path);
        tracing::info!(count = store.len(), "loaded saved locations");

        Self {
            store: Arc::new(Mutex::new(store)),
            region: Mutex::new(MapRegion::default()),
            gate: AccessGate::new(),
            wikipedia,
            authenticators,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.save_path,
            WikipediaClient::new(config.wikipedia_api_base.clone()),
            PasscodeAuthenticator::factory(config.passcode.clone()),
        )
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// Runs `f` against the store on the blocking pool, since store mutations
    /// write the save file.
    async fn with_store<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut PlaceStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();

        tokio::task::spawn_blocking(move || f(&mut store.blocking_lock()))
            .await
            .map_err(server_error)
    }
}

impl API for Engine {}

#[cfg(test)]
pub(crate) fn test_engine(dir: &Path) -> Engine {
    Engine::new(
        &dir.join("savedPlaces"),
        WikipediaClient::new("http://127.0.0.1:9"),
        PasscodeAuthenticator::factory(Some("1234".into())),
    )
}
