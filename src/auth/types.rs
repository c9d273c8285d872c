//! Data types for the QR login flow
//!
//! Wire structs mirror the provider's JSON envelopes; the remaining types
//! are what the session hands around between ticks.

use crate::constants::{
    POLL_CODE_EXPIRED, POLL_CODE_NOT_SCANNED, POLL_CODE_SCANNED, POLL_CODE_SUCCESS,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Cookie name to value, as accumulated by the HTTP client
pub type SessionCookies = BTreeMap<String, String>;

/// Scan URL and opaque key identifying one pending login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginToken {
    pub scan_url: String,
    pub key: String,
}

/// Outcome of a single poll call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResult {
    pub status_code: i64,
    pub message: String,
    /// `data.url` of the success response, carrying credentials as query parameters
    pub redirect_url: Option<String>,
}

impl PollResult {
    pub fn status(&self) -> PollStatus {
        PollStatus::from_code(self.status_code)
    }
}

/// Classified poll status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Success,
    Expired,
    ScannedAwaitingConfirm,
    NotScanned,
    Other(i64),
}

impl PollStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            POLL_CODE_SUCCESS => PollStatus::Success,
            POLL_CODE_EXPIRED => PollStatus::Expired,
            POLL_CODE_SCANNED => PollStatus::ScannedAwaitingConfirm,
            POLL_CODE_NOT_SCANNED => PollStatus::NotScanned,
            other => PollStatus::Other(other),
        }
    }

    /// Terminal codes end the poll loop
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollStatus::Success | PollStatus::Expired)
    }
}

/// States of a login session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Init,
    TokenRequested,
    QrRendered,
    Polling,
    Succeeded,
    Expired,
    TimedOut,
    Failed,
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginState::Init => write!(f, "Init"),
            LoginState::TokenRequested => write!(f, "TokenRequested"),
            LoginState::QrRendered => write!(f, "QrRendered"),
            LoginState::Polling => write!(f, "Polling"),
            LoginState::Succeeded => write!(f, "Succeeded"),
            LoginState::Expired => write!(f, "Expired"),
            LoginState::TimedOut => write!(f, "TimedOut"),
            LoginState::Failed => write!(f, "Failed"),
        }
    }
}

/// Final result of a login session
#[derive(Debug)]
pub enum LoginOutcome {
    /// Login approved; cookies may still lack the primary fields
    Succeeded(SessionCookies),
    Expired,
    TimedOut,
    Failed(String),
}

impl LoginOutcome {
    pub fn state(&self) -> LoginState {
        match self {
            LoginOutcome::Succeeded(_) => LoginState::Succeeded,
            LoginOutcome::Expired => LoginState::Expired,
            LoginOutcome::TimedOut => LoginState::TimedOut,
            LoginOutcome::Failed(_) => LoginState::Failed,
        }
    }

    pub fn into_cookies(self) -> Option<SessionCookies> {
        match self {
            LoginOutcome::Succeeded(cookies) => Some(cookies),
            _ => None,
        }
    }
}

/// Envelope of the token-issue response
#[derive(Deserialize, Debug)]
pub(crate) struct GenerateResponse {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<GenerateData>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GenerateData {
    pub url: String,
    pub qrcode_key: String,
}

/// Envelope of the poll response; the login status lives in `data.code`
#[derive(Deserialize, Debug)]
pub(crate) struct PollResponse {
    pub data: Option<PollData>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct PollData {
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub url: String,
}

impl GenerateResponse {
    pub(crate) fn into_token(self) -> Result<LoginToken, super::LoginError> {
        if self.code != 0 {
            return Err(super::LoginError::Provider {
                code: self.code,
                message: self.message,
            });
        }
        let data = self.data.ok_or_else(|| {
            super::LoginError::MalformedResponse("token response has no data".to_string())
        })?;
        Ok(LoginToken {
            scan_url: data.url,
            key: data.qrcode_key,
        })
    }
}

impl PollResponse {
    pub(crate) fn into_result(self) -> Result<PollResult, super::LoginError> {
        let data = self.data.ok_or_else(|| {
            super::LoginError::MalformedResponse("poll response has no data".to_string())
        })?;
        let status_code = data.code.ok_or_else(|| {
            super::LoginError::MalformedResponse("poll response has no status code".to_string())
        })?;
        Ok(PollResult {
            status_code,
            message: data.message,
            redirect_url: if data.url.is_empty() { None } else { Some(data.url) },
        })
    }
}
