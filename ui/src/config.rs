use payloads::APIClient;
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use crate::prefs::{FileStorage, Preferences};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Client configuration.
///
/// Environment variables:
/// - BACKEND_URL: base url of the studio API (required)
/// - API_TOKEN: bearer token sent with every request (optional)
/// - STUDIO_TIMEZONE: IANA timezone dates are shown in (optional, defaults
///   to the system timezone)
/// - PREFS_PATH: file for persisted flags on native targets (optional)
#[derive(Debug)]
pub struct Config {
    pub backend_url: String,
    pub api_token: Option<SecretString>,
    pub studio_timezone: Option<String>,
    pub prefs_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; blank values count as unset.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var =
            |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let backend_url =
            var("BACKEND_URL").ok_or(ConfigError::Missing("BACKEND_URL"))?;
        if !(backend_url.starts_with("http://")
            || backend_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid {
                name: "BACKEND_URL",
                value: backend_url,
            });
        }

        Ok(Config {
            backend_url,
            api_token: var("API_TOKEN").map(SecretString::from),
            studio_timezone: var("STUDIO_TIMEZONE"),
            prefs_path: var("PREFS_PATH").map(PathBuf::from),
        })
    }

    /// Config baked in at build time, falling back to the page's own origin
    /// when no backend url was given.
    #[cfg(target_arch = "wasm32")]
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let backend_url = match option_env!("BACKEND_URL") {
            Some(url) => url.to_string(),
            None => web_sys::window()
                .and_then(|window| window.location().origin().ok())
                .ok_or(ConfigError::Missing("BACKEND_URL"))?,
        };
        Ok(Config {
            backend_url,
            api_token: None,
            studio_timezone: option_env!("STUDIO_TIMEZONE")
                .map(str::to_string),
            prefs_path: None,
        })
    }

    /// Persisted flags in the configured file, if any.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn preferences(&self) -> Option<Preferences<FileStorage>> {
        self.prefs_path
            .as_ref()
            .map(|path| Preferences::new(FileStorage::new(path)))
    }

    pub fn api_client(&self) -> APIClient {
        let client = APIClient::new(self.backend_url.clone());
        match &self.api_token {
            Some(token) => client.with_auth_token(SecretString::from(
                token.expose_secret().to_owned(),
            )),
            None => client,
        }
    }
}
