//! QR-code login against the provider
//!
//! This module provides:
//! - the transport seam and its reqwest-backed implementation
//! - QR image rendering with guaranteed cleanup
//! - the login session state machine

mod error;
#[cfg(test)]
pub(crate) mod mock;
mod qr;
mod session;
mod transport;
mod types;

pub use error::{LoginError, LoginResult};
pub use qr::QrImage;
pub use session::{LoginSession, PollSettings};
pub use transport::{HttpTransport, LoginTransport};
pub use types::{LoginOutcome, LoginState, LoginToken, PollResult, PollStatus, SessionCookies};
