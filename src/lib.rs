//! bililogin: QR-code login helper
//!
//! This library provides the pieces of the `bililogin` binary: the login
//! session against the provider, QR rendering, and the configuration file
//! other tools read the credentials from.

pub mod auth;
pub mod config;
pub mod constants;
mod macros;
pub mod setup;

pub use setup::{auto_login_setup, SetupOptions};
