use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::{
    error::{invalid_input_error, Error},
    external::wikipedia::DEFAULT_API_BASE,
};

pub const DEFAULT_SAVE_PATH: &str = "savedPlaces";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct Config {
    pub save_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub wikipedia_api_base: String,
    pub passcode: Option<String>,
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr: SocketAddr = lookup("PLACES_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|_| invalid_input_error())?;

        Ok(Self {
            save_path: lookup("PLACES_SAVE_PATH")
                .unwrap_or_else(|| DEFAULT_SAVE_PATH.into())
                .into(),
            bind_addr,
            wikipedia_api_base: lookup("WIKIPEDIA_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.into()),
            passcode: lookup("PLACES_PASSCODE").filter(|passcode| !passcode.is_empty()),
        })
    }
}

#[test]
fn defaults_when_unset() {
    let config = Config::from_lookup(|_| None).unwrap();

    assert_eq!(config.save_path, PathBuf::from("savedPlaces"));
    assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
    assert_eq!(config.wikipedia_api_base, "https://en.wikipedia.org");
    assert_eq!(config.passcode, None);
}

#[test]
fn reads_overrides() {
    let config = Config::from_lookup(|key| match key {
        "PLACES_SAVE_PATH" => Some("/tmp/places.json".into()),
        "PLACES_BIND_ADDR" => Some("0.0.0.0:8080".into()),
        "PLACES_PASSCODE" => Some("2468".into()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.save_path, PathBuf::from("/tmp/places.json"));
    assert_eq!(config.bind_addr.port(), 8080);
    assert_eq!(config.passcode.as_deref(), Some("2468"));
}

#[test]
fn bad_bind_addr_is_invalid_input() {
    let err = Config::from_lookup(|key| match key {
        "PLACES_BIND_ADDR" => Some("nowhere".into()),
        _ => None,
    })
    .unwrap_err();

    assert_eq!(err.code, 101);
}
