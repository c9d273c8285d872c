//! bililogin - log in by QR code and save the session for other tools
//!
//! Takes no arguments. Writes `config.json` next to the executable on
//! success and exits with status 1 otherwise.

use anyhow::Context;
use bililogin::auth::HttpTransport;
use bililogin::{auto_login_setup, SetupOptions};

/// Main entry point for the application
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let transport = HttpTransport::new().context("Failed to create HTTP client")?;

    let options = SetupOptions::default();
    if !auto_login_setup(&transport, &options).await {
        std::process::exit(1);
    }

    Ok(())
}
