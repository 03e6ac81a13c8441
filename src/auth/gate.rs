use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::{
    auth::{error_message, Authenticator},
    error::{locked_error, Error},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnlockResult {
    pub unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Locked at session start; only a successful authentication opens it.
#[derive(Debug, Default)]
pub struct AccessGate {
    unlocked: AtomicBool,
}

impl AccessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::SeqCst)
    }

    pub fn unlock(&self) {
        self.unlocked.store(true, Ordering::SeqCst);
    }

    pub fn ensure_unlocked(&self) -> Result<(), Error> {
        if self.is_unlocked() {
            return Ok(());
        }

        Err(locked_error())
    }

    #[tracing::instrument(skip_all)]
    pub async fn authenticate(&self, authenticator: &dyn Authenticator) -> UnlockResult {
        let outcome = authenticator.authenticate().await;

        if outcome.success {
            self.unlock();
            tracing::info!("unlocked");
            return UnlockResult {
                unlocked: true,
                message: None,
            };
        }

        let message = outcome.error_code.map(error_message).unwrap_or_default();
        tracing::info!(code = ?outcome.error_code, "authentication failed");

        UnlockResult {
            unlocked: self.is_unlocked(),
            message: if message.is_empty() {
                None
            } else {
                Some(message)
            },
        }
    }
}

#[test]
fn gate_starts_locked() {
    let gate = AccessGate::new();

    assert!(!gate.is_unlocked());
    assert_eq!(gate.ensure_unlocked().unwrap_err().code, 103);
}

#[test]
fn successful_authentication_unlocks() {
    use crate::auth::PasscodeAuthenticator;
    use tokio_test::block_on;

    let gate = AccessGate::new();
    let authenticator = PasscodeAuthenticator::new(Some("1234".into()), "1234");

    let result = block_on(gate.authenticate(&authenticator));

    assert_eq!(
        result,
        UnlockResult {
            unlocked: true,
            message: None
        }
    );
    assert!(gate.ensure_unlocked().is_ok());
}

#[test]
fn failed_authentication_reports_message() {
    use crate::auth::PasscodeAuthenticator;
    use tokio_test::block_on;

    let gate = AccessGate::new();

    let wrong = PasscodeAuthenticator::new(Some("1234".into()), "9");
    let result = block_on(gate.authenticate(&wrong));
    assert_eq!(result.message.as_deref(), Some("Authentication Failed"));
    assert!(!result.unlocked);

    let cancelled = PasscodeAuthenticator::new(Some("1234".into()), "");
    let result = block_on(gate.authenticate(&cancelled));
    assert_eq!(result.message, None);
    assert!(!gate.is_unlocked());
}
