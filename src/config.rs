//! Persisted configuration for tools that reuse the login
//!
//! The file has three sections: the credential cookies, the headers to send
//! with them, and default pacing settings for consumers.

use crate::auth::{LoginResult, SessionCookies};
use crate::constants::{
    COOKIE_BILI_JCT, COOKIE_DEDE_USER_ID, COOKIE_SESSDATA, DEFAULT_REFERER, DEFAULT_USER_AGENT,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Credential cookies, empty when the login did not deliver them
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialCookies {
    #[serde(rename = "SESSDATA")]
    pub sessdata: String,
    pub bili_jct: String,
    #[serde(rename = "DedeUserID")]
    pub dede_user_id: String,
}

/// Headers consumers send along with the cookies
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RequestHeaders {
    #[serde(rename = "User-Agent")]
    pub user_agent: String,
    #[serde(rename = "Referer")]
    pub referer: String,
}

impl Default for RequestHeaders {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}

/// Pacing settings for consumers of the config
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    /// Seconds to wait between two API requests
    pub delay_between_requests: f64,
    pub max_retries: u32,
    pub batch_size: u32,
    /// When set, consumers only perform `max_test_operations` operations
    pub test_mode: bool,
    pub max_test_operations: u32,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            delay_between_requests: 1.0,
            max_retries: 3,
            batch_size: 50,
            test_mode: false,
            max_test_operations: 5,
        }
    }
}

/// Complete contents of the configuration file
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PersistedConfig {
    pub cookies: CredentialCookies,
    pub headers: RequestHeaders,
    pub settings: RuntimeSettings,
}

impl PersistedConfig {
    /// Default config with the credential fields taken from `cookies`
    pub fn from_cookies(cookies: &SessionCookies) -> Self {
        let field = |name: &str| cookies.get(name).cloned().unwrap_or_default();

        Self {
            cookies: CredentialCookies {
                sessdata: field(COOKIE_SESSDATA),
                bili_jct: field(COOKIE_BILI_JCT),
                dede_user_id: field(COOKIE_DEDE_USER_ID),
            },
            ..Self::default()
        }
    }

    /// Read a previously written config
    pub fn load(path: &Path) -> LoginResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Whether both primary credentials are filled in
    pub fn has_credentials(&self) -> bool {
        !self.cookies.sessdata.is_empty() && !self.cookies.bili_jct.is_empty()
    }

    pub fn to_json(&self) -> LoginResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes the configuration file, replacing any previous one
pub struct ConfigWriter {
    path: PathBuf,
}

impl ConfigWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Build the config from `cookies` and write it, returning the written path
    pub fn write(&self, cookies: &SessionCookies) -> LoginResult<PathBuf> {
        self.write_config(&PersistedConfig::from_cookies(cookies))
    }

    pub fn write_config(&self, config: &PersistedConfig) -> LoginResult<PathBuf> {
        let json = config.to_json()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, json)?;

        Ok(self.path.clone())
    }
}

/// Directory holding the running executable, or the working directory
pub fn app_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
