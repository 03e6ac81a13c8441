mod authenticator;
mod gate;

pub use authenticator::{
    error_message, AuthErrorCode, AuthOutcome, Authenticator, AuthenticatorFactory,
    PasscodeAuthenticator,
};
pub use gate::{AccessGate, UnlockResult};
