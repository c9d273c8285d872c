//! Scripted provider for exercising login sessions without a network
//!
//! Replays a fixed token response and a queue of poll responses. Once the
//! queue is exhausted every further poll reports "not scanned".

use crate::auth::error::{LoginError, LoginResult};
use crate::auth::transport::LoginTransport;
use crate::auth::types::{LoginToken, PollResult, SessionCookies};
use crate::constants::{POLL_CODE_NOT_SCANNED, POLL_CODE_SUCCESS};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted answer to the token-issue call
pub enum ScriptedToken {
    Issued { scan_url: String, key: String },
    Provider { code: i64, message: String },
    TransportError,
}

/// Scripted answer to one poll call
pub enum ScriptedPoll {
    Status(i64),
    SuccessWithUrl(String),
    TransportError,
    UndecodableBody,
    Malformed,
}

pub struct MockTransport {
    token: ScriptedToken,
    polls: Mutex<VecDeque<ScriptedPoll>>,
    success_cookies: SessionCookies,
    jar: Mutex<SessionCookies>,
    poll_count: AtomicUsize,
    token_requests: AtomicUsize,
}

impl MockTransport {
    pub fn new(token: ScriptedToken, polls: Vec<ScriptedPoll>) -> Self {
        Self {
            token,
            polls: Mutex::new(polls.into()),
            success_cookies: SessionCookies::new(),
            jar: Mutex::new(SessionCookies::new()),
            poll_count: AtomicUsize::new(0),
            token_requests: AtomicUsize::new(0),
        }
    }

    /// Token issue that succeeds with the given URL and key
    pub fn issued(scan_url: &str, key: &str, polls: Vec<ScriptedPoll>) -> Self {
        Self::new(
            ScriptedToken::Issued {
                scan_url: scan_url.to_string(),
                key: key.to_string(),
            },
            polls,
        )
    }

    /// Cookies the provider sets when a poll reports success
    pub fn with_success_cookies(mut self, cookies: &[(&str, &str)]) -> Self {
        self.success_cookies = cookies
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self
    }

    pub fn poll_count(&self) -> usize {
        self.poll_count.load(Ordering::SeqCst)
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    fn transport_error() -> LoginError {
        // An unparsable URL fails inside reqwest before anything is sent
        let err = reqwest::Client::new().get("http://[::1").build().unwrap_err();
        LoginError::Transport(err)
    }

    fn set_success_cookies(&self) {
        self.jar.lock().unwrap().extend(self.success_cookies.clone());
    }
}

#[async_trait]
impl LoginTransport for MockTransport {
    async fn issue_token(&self) -> LoginResult<LoginToken> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        match &self.token {
            ScriptedToken::Issued { scan_url, key } => Ok(LoginToken {
                scan_url: scan_url.clone(),
                key: key.clone(),
            }),
            ScriptedToken::Provider { code, message } => Err(LoginError::Provider {
                code: *code,
                message: message.clone(),
            }),
            ScriptedToken::TransportError => Err(Self::transport_error()),
        }
    }

    async fn poll(&self, _token: &LoginToken) -> LoginResult<PollResult> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        let next = self.polls.lock().unwrap().pop_front();
        let (status_code, redirect_url) = match next {
            Some(ScriptedPoll::Status(code)) => (code, None),
            Some(ScriptedPoll::SuccessWithUrl(url)) => (POLL_CODE_SUCCESS, Some(url)),
            Some(ScriptedPoll::TransportError) => return Err(Self::transport_error()),
            Some(ScriptedPoll::UndecodableBody) => {
                return Err(LoginError::Json(
                    serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
                ))
            }
            Some(ScriptedPoll::Malformed) => {
                return Err(LoginError::MalformedResponse(
                    "poll response has no data".to_string(),
                ))
            }
            None => (POLL_CODE_NOT_SCANNED, None),
        };

        if status_code == POLL_CODE_SUCCESS {
            self.set_success_cookies();
        }
        Ok(PollResult {
            status_code,
            message: String::new(),
            redirect_url,
        })
    }

    fn cookies(&self) -> SessionCookies {
        self.jar.lock().unwrap().clone()
    }
}
