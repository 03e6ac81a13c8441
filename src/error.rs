use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::Debug;
use std::io;

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        storage_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        encoding_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            102 => (StatusCode::CONFLICT, self.message.as_str()),
            103 => (StatusCode::UNAUTHORIZED, self.message.as_str()),
            104 => (StatusCode::NOT_FOUND, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn duplicate_location_error() -> Error {
    Error {
        code: 102,
        message: "a place already exists at this location".into(),
    }
}

pub fn locked_error() -> Error {
    Error {
        code: 103,
        message: "places are locked".into(),
    }
}

pub fn not_found_error() -> Error {
    Error {
        code: 104,
        message: "place not found".into(),
    }
}

pub fn server_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "server error");

    Error {
        code: 1,
        message: "server error".into(),
    }
}

pub fn storage_error<T: Debug>(_: T) -> Error {
    Error {
        code: 2,
        message: "storage error".into(),
    }
}

pub fn reqwest_error(_: reqwest::Error) -> Error {
    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn encoding_error<T: Debug>(_: T) -> Error {
    Error {
        code: 5,
        message: "encoding error".into(),
    }
}

#[test]
fn client_errors_keep_their_message() {
    let response = duplicate_location_error().into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = locked_error().into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = not_found_error().into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = invalid_input_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn internal_errors_map_to_500() {
    let err: Error = io::Error::new(io::ErrorKind::Other, "disk full").into();
    assert_eq!(err.code, 2);
    assert_eq!(
        err.into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
