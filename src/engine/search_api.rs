use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::SearchAPI,
    edit::{EditSession, LoadingState},
    error::{not_found_error, Error},
};

#[async_trait]
impl SearchAPI for Engine {
    /// Network and decode failures come back as `LoadingState::Failed`.
    #[tracing::instrument(skip(self))]
    async fn find_nearby(&self, id: Uuid) -> Result<LoadingState, Error> {
        self.gate.ensure_unlocked()?;

        let location = self
            .store
            .lock()
            .await
            .find(&id)
            .cloned()
            .ok_or_else(|| not_found_error())?;

        let mut session = EditSession::new(location);
        session.fetch_nearby(&self.wikipedia).await;

        Ok(session.loading_state)
    }
}

#[test]
fn unreachable_search_is_failed_state() {
    use crate::api::LocationAPI;
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();
    let engine = super::test_engine(dir.path());
    engine.gate().unlock();

    let location = block_on(engine.add_location()).unwrap();

    assert_eq!(
        block_on(engine.find_nearby(location.id)).unwrap(),
        LoadingState::Failed
    );
    assert_eq!(
        block_on(engine.find_nearby(Uuid::new_v4())).unwrap_err().code,
        104
    );
}
