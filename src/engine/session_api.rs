use super::Engine;

use async_trait::async_trait;

use crate::{
    api::SessionAPI,
    auth::UnlockResult,
    entities::MapRegion,
    error::{invalid_input_error, Error},
};

#[async_trait]
impl SessionAPI for Engine {
    #[tracing::instrument(skip_all)]
    async fn unlock(&self, credential: String) -> UnlockResult {
        let authenticator = (self.authenticators)(credential);

        self.gate.authenticate(authenticator.as_ref()).await
    }

    async fn map_region(&self) -> Result<MapRegion, Error> {
        self.gate.ensure_unlocked()?;

        Ok(*self.region.lock().await)
    }

    #[tracing::instrument(skip(self))]
    async fn set_map_region(&self, region: MapRegion) -> Result<MapRegion, Error> {
        self.gate.ensure_unlocked()?;

        let center = region.center;
        if !(-90.0..=90.0).contains(&center.latitude)
            || !(-180.0..=180.0).contains(&center.longitude)
        {
            return Err(invalid_input_error());
        }

        *self.region.lock().await = region;

        Ok(region)
    }
}

#[cfg(test)]
struct FixedOutcome(crate::auth::AuthOutcome);

#[cfg(test)]
#[async_trait]
impl crate::auth::Authenticator for FixedOutcome {
    async fn authenticate(&self) -> crate::auth::AuthOutcome {
        self.0
    }
}

#[cfg(test)]
fn engine_with_outcome(dir: &std::path::Path, outcome: crate::auth::AuthOutcome) -> Engine {
    use crate::external::wikipedia::WikipediaClient;

    Engine::new(
        &dir.join("savedPlaces"),
        WikipediaClient::new("http://127.0.0.1:9"),
        Box::new(move |_| {
            Box::new(FixedOutcome(outcome)) as Box<dyn crate::auth::Authenticator>
        }),
    )
}

#[test]
fn unlock_with_wrong_passcode_stays_locked() {
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();
    let engine = super::test_engine(dir.path());

    let result = block_on(engine.unlock("0000".into()));
    assert!(!result.unlocked);
    assert_eq!(result.message.as_deref(), Some("Authentication Failed"));

    let result = block_on(engine.unlock("1234".into()));
    assert!(result.unlocked);
    assert!(engine.gate().is_unlocked());
}

#[test]
fn unlock_reports_authenticator_failures() {
    use crate::auth::{AuthErrorCode, AuthOutcome};
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();

    let engine = engine_with_outcome(
        dir.path(),
        AuthOutcome::failure(AuthErrorCode::BiometryLockout),
    );
    let result = block_on(engine.unlock(String::new()));
    assert!(!result.unlocked);
    assert_eq!(
        result.message.as_deref(),
        Some("TouchID or FaceID Lockout Please go to Settings & Turn On Passcode")
    );

    let engine = engine_with_outcome(dir.path(), AuthOutcome::failure(AuthErrorCode::SystemCancel));
    let result = block_on(engine.unlock(String::new()));
    assert_eq!(result.message.as_deref(), Some("System Canceled"));

    let engine = engine_with_outcome(dir.path(), AuthOutcome::failure(AuthErrorCode::UserCancel));
    let result = block_on(engine.unlock(String::new()));
    assert_eq!(result.message, None);
    assert!(!engine.gate().is_unlocked());

    let engine = engine_with_outcome(dir.path(), AuthOutcome::success());
    assert!(block_on(engine.unlock(String::new())).unlocked);
    assert!(engine.gate().is_unlocked());
}

#[test]
fn region_is_locked_until_unlock() {
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();
    let engine = super::test_engine(dir.path());

    assert_eq!(block_on(engine.map_region()).unwrap_err().code, 103);
    assert_eq!(
        block_on(engine.set_map_region(MapRegion::default()))
            .unwrap_err()
            .code,
        103
    );

    engine.gate().unlock();
    assert_eq!(block_on(engine.map_region()).unwrap(), MapRegion::default());
}

#[test]
fn region_rejects_out_of_range_center() {
    use crate::entities::{Coordinates, Span};
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();
    let engine = super::test_engine(dir.path());
    engine.gate().unlock();

    let region = MapRegion {
        center: Coordinates {
            latitude: 91.0,
            longitude: 0.0,
        },
        span: Span {
            latitude_delta: 1.0,
            longitude_delta: 1.0,
        },
    };
    assert_eq!(block_on(engine.set_map_region(region)).unwrap_err().code, 101);
    assert_eq!(block_on(engine.map_region()).unwrap(), MapRegion::default());
}
