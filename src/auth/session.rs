//! Login session state machine
//!
//! `Init → TokenRequested → QrRendered → Polling → {Succeeded | Expired | TimedOut | Failed}`
//!
//! Every provider call returns an explicit result; the session decides per
//! call site whether to abort, keep polling, or ignore the failure.

use crate::auth::qr::QrImage;
use crate::auth::transport::LoginTransport;
use crate::auth::types::{LoginOutcome, LoginState, LoginToken, PollResult, PollStatus, SessionCookies};
use crate::constants::{
    COOKIE_BILI_JCT, COOKIE_DEDE_USER_ID, COOKIE_SESSDATA, POLL_CEILING_SECS, POLL_INTERVAL_SECS,
};
use crate::cprintln;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Timing of the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Sleep between two poll calls
    pub interval: Duration,
    /// Overall budget, measured from loop entry
    pub ceiling: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(POLL_INTERVAL_SECS),
            ceiling: Duration::from_secs(POLL_CEILING_SECS),
        }
    }
}

/// One QR login attempt against a provider
pub struct LoginSession<'a, T: LoginTransport + ?Sized> {
    transport: &'a T,
    qr_path: PathBuf,
    settings: PollSettings,
    open_image: bool,
    trail: Vec<LoginState>,
}

impl<'a, T: LoginTransport + ?Sized> LoginSession<'a, T> {
    /// Create a session that renders its QR code to `qr_path`
    pub fn new(transport: &'a T, qr_path: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            qr_path: qr_path.into(),
            settings: PollSettings::default(),
            open_image: true,
            trail: vec![LoginState::Init],
        }
    }

    /// Set custom poll timing
    pub fn with_settings(mut self, settings: PollSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Enable or disable opening the QR image in the system viewer
    pub fn with_open_image(mut self, open_image: bool) -> Self {
        self.open_image = open_image;
        self
    }

    /// States visited so far, starting with `Init`
    pub fn trail(&self) -> &[LoginState] {
        &self.trail
    }

    pub fn state(&self) -> LoginState {
        self.trail.last().copied().unwrap_or(LoginState::Init)
    }

    /// Run the whole handshake
    ///
    /// The QR image only lives for the duration of this call; it is removed
    /// on every exit path.
    pub async fn run(&mut self) -> LoginOutcome {
        self.trail.truncate(1);

        cprintln!("Requesting login QR code...");
        let token = match self.transport.issue_token().await {
            Ok(token) => token,
            Err(e) => {
                cprintln!(error: "Failed to get QR code: {}", e);
                return self.finish(LoginOutcome::Failed(e.to_string()));
            }
        };
        self.enter(LoginState::TokenRequested);

        let image = match QrImage::render(&token.scan_url, &self.qr_path) {
            Ok(image) => image,
            Err(e) => {
                cprintln!(error: "Failed to render QR code: {}", e);
                cprintln!("Open this link to generate a QR code manually: {}", token.scan_url);
                return self.finish(LoginOutcome::Failed(e.to_string()));
            }
        };
        self.enter(LoginState::QrRendered);
        cprintln!(info: "QR code written to {}", image.path().display());

        if self.open_image {
            if let Err(e) = image.open() {
                cprintln!(warn: "Could not open the image automatically, please open it manually: {}", e);
            }
        }

        cprintln!("Scan the QR code with the mobile app to log in (valid for about 3 minutes)...");
        let outcome = self.poll_until_terminal(&token, &image).await;
        drop(image);
        self.finish(outcome)
    }

    async fn poll_until_terminal(&mut self, token: &LoginToken, image: &QrImage) -> LoginOutcome {
        self.enter(LoginState::Polling);
        let started = Instant::now();
        let mut last_status = None;

        while started.elapsed() < self.settings.ceiling {
            match self.transport.poll(token).await {
                Ok(result) => {
                    let status = result.status();
                    if status.is_terminal() {
                        return self.conclude(status, &result, image);
                    }
                    if status == PollStatus::ScannedAwaitingConfirm && last_status != Some(status) {
                        cprintln!(info: "QR code scanned, confirm the login in the app");
                    } else {
                        cprintln!(debug: "Poll status {} ({})", result.status_code, result.message);
                    }
                    last_status = Some(status);
                }
                Err(e) if e.is_transient() => {
                    cprintln!(debug: "Poll failed, retrying: {}", e);
                }
                Err(e) => {
                    cprintln!(error: "Login failed: {}", e);
                    return LoginOutcome::Failed(e.to_string());
                }
            }

            sleep(self.settings.interval).await;
        }

        cprintln!(error: "Login timed out");
        LoginOutcome::TimedOut
    }

    /// Outcome for a terminal poll status
    fn conclude(&self, status: PollStatus, result: &PollResult, image: &QrImage) -> LoginOutcome {
        match status {
            PollStatus::Success => {
                cprintln!(success: "Login successful! Saving credentials...");
                image.remove();
                LoginOutcome::Succeeded(self.collect_cookies(result))
            }
            _ => {
                cprintln!(warn: "QR code expired, please try again");
                LoginOutcome::Expired
            }
        }
    }

    /// Cookies from the jar, topped up from the success redirect URL
    fn collect_cookies(&self, result: &PollResult) -> SessionCookies {
        let mut cookies = self.transport.cookies();
        if let Some(redirect) = result.redirect_url.as_deref() {
            merge_redirect_credentials(&mut cookies, redirect);
        }
        cookies
    }

    fn enter(&mut self, state: LoginState) {
        cprintln!(debug: "{} -> {}", self.state(), state);
        self.trail.push(state);
    }

    fn finish(&mut self, outcome: LoginOutcome) -> LoginOutcome {
        self.enter(outcome.state());
        outcome
    }
}

/// Copy credential query parameters missing from `cookies`
///
/// Values are copied as transmitted, still percent-encoded, which is the
/// form the cookie jar holds them in.
fn merge_redirect_credentials(cookies: &mut SessionCookies, redirect: &str) {
    let url = match Url::parse(redirect) {
        Ok(url) => url,
        Err(e) => {
            cprintln!(warn: "Ignoring unparsable login redirect URL: {}", e);
            return;
        }
    };
    let Some(query) = url.query() else {
        return;
    };

    let known = [COOKIE_SESSDATA, COOKIE_BILI_JCT, COOKIE_DEDE_USER_ID];
    for pair in query.split('&') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        if known.contains(&name) && !cookies.contains_key(name) {
            cookies.insert(name.to_string(), value.to_string());
        }
    }
}
