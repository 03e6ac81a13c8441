use async_trait::async_trait;

/// Failure codes reported by the device authentication service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum AuthErrorCode {
    AuthenticationFailed = -1,
    UserCancel = -2,
    UserFallback = -3,
    SystemCancel = -4,
    PasscodeNotSet = -5,
    BiometryNotAvailable = -6,
    BiometryNotEnrolled = -7,
    BiometryLockout = -8,
    AppCancel = -9,
    InvalidContext = -10,
}

impl AuthErrorCode {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::AuthenticationFailed),
            -2 => Some(Self::UserCancel),
            -3 => Some(Self::UserFallback),
            -4 => Some(Self::SystemCancel),
            -5 => Some(Self::PasscodeNotSet),
            -6 => Some(Self::BiometryNotAvailable),
            -7 => Some(Self::BiometryNotEnrolled),
            -8 => Some(Self::BiometryLockout),
            -9 => Some(Self::AppCancel),
            -10 => Some(Self::InvalidContext),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Message shown to the user for a failure code. Empty means do not notify.
pub fn error_message(code: i32) -> String {
    let message = match AuthErrorCode::from_code(code) {
        Some(AuthErrorCode::AuthenticationFailed) => "Authentication Failed",
        Some(AuthErrorCode::SystemCancel) => "System Canceled",
        Some(AuthErrorCode::PasscodeNotSet) => "Please go to Settings & Turn On Passcode",
        Some(AuthErrorCode::BiometryNotAvailable) => "TouchID or FaceID Not Available",
        Some(AuthErrorCode::BiometryNotEnrolled) => "TouchID or FaceID Not Enrolled",
        Some(AuthErrorCode::BiometryLockout) => {
            "TouchID or FaceID Lockout Please go to Settings & Turn On Passcode"
        }
        Some(AuthErrorCode::AppCancel) => "App Canceled",
        Some(AuthErrorCode::InvalidContext) => "Invalid Context",
        Some(AuthErrorCode::UserCancel) | Some(AuthErrorCode::UserFallback) | None => "",
    };

    message.into()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    pub error_code: Option<i32>,
}

impl AuthOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            error_code: None,
        }
    }

    pub fn failure(code: AuthErrorCode) -> Self {
        Self {
            success: false,
            error_code: Some(code.code()),
        }
    }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self) -> AuthOutcome;
}

/// Builds the authenticator for a single unlock attempt from the credential
/// the user supplied.
pub type AuthenticatorFactory = Box<dyn Fn(String) -> Box<dyn Authenticator> + Send + Sync>;

/// Checks an attempt against a configured passcode.
#[derive(Clone, Debug)]
pub struct PasscodeAuthenticator {
    expected: Option<String>,
    attempt: String,
}

impl PasscodeAuthenticator {
    pub fn new(expected: Option<String>, attempt: impl Into<String>) -> Self {
        Self {
            expected,
            attempt: attempt.into(),
        }
    }

    pub fn factory(expected: Option<String>) -> AuthenticatorFactory {
        Box::new(move |attempt| {
            Box::new(Self::new(expected.clone(), attempt)) as Box<dyn Authenticator>
        })
    }
}

#[async_trait]
impl Authenticator for PasscodeAuthenticator {
    #[tracing::instrument(skip_all)]
    async fn authenticate(&self) -> AuthOutcome {
        let expected = match &self.expected {
            Some(expected) if !expected.is_empty() => expected,
            _ => return AuthOutcome::failure(AuthErrorCode::PasscodeNotSet),
        };

        if self.attempt.is_empty() {
            return AuthOutcome::failure(AuthErrorCode::UserCancel);
        }

        if &self.attempt != expected {
            return AuthOutcome::failure(AuthErrorCode::AuthenticationFailed);
        }

        AuthOutcome::success()
    }
}

#[test]
fn known_codes_map_to_messages() {
    assert_eq!(error_message(-1), "Authentication Failed");
    assert_eq!(error_message(-4), "System Canceled");
    assert_eq!(error_message(-5), "Please go to Settings & Turn On Passcode");
    assert_eq!(error_message(-6), "TouchID or FaceID Not Available");
    assert_eq!(error_message(-7), "TouchID or FaceID Not Enrolled");
    assert_eq!(
        error_message(-8),
        "TouchID or FaceID Lockout Please go to Settings & Turn On Passcode"
    );
    assert_eq!(error_message(-9), "App Canceled");
    assert_eq!(error_message(-10), "Invalid Context");
}

#[test]
fn cancel_and_unknown_codes_are_silent() {
    assert_eq!(error_message(-2), "");
    assert_eq!(error_message(-3), "");
    assert_eq!(error_message(42), "");
}

#[test]
fn passcode_outcomes() {
    use tokio_test::block_on;

    let expected = Some("1234".to_string());

    assert_eq!(
        block_on(PasscodeAuthenticator::new(expected.clone(), "1234").authenticate()),
        AuthOutcome::success()
    );
    assert_eq!(
        block_on(PasscodeAuthenticator::new(expected.clone(), "0000").authenticate()),
        AuthOutcome::failure(AuthErrorCode::AuthenticationFailed)
    );
    assert_eq!(
        block_on(PasscodeAuthenticator::new(expected, "").authenticate()),
        AuthOutcome::failure(AuthErrorCode::UserCancel)
    );
    assert_eq!(
        block_on(PasscodeAuthenticator::new(None, "1234").authenticate()),
        AuthOutcome::failure(AuthErrorCode::PasscodeNotSet)
    );
}
