//! Top-level login setup
//!
//! Runs one login session and, when it succeeds, writes the configuration
//! file. Failures are printed and folded into a `false` result.

use crate::auth::{LoginSession, LoginTransport, PollSettings};
use crate::config::{app_dir, ConfigWriter, PersistedConfig};
use crate::constants::{CONFIG_FILE, QR_IMAGE_FILE};
use crate::cprintln;
use std::path::PathBuf;

/// Where and how the setup runs
#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// Directory receiving the QR image and the config file
    pub output_dir: PathBuf,
    /// Open the QR image in the system viewer
    pub open_image: bool,
    pub poll: PollSettings,
}

impl SetupOptions {
    pub fn qr_path(&self) -> PathBuf {
        self.output_dir.join(QR_IMAGE_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.output_dir.join(CONFIG_FILE)
    }
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            output_dir: app_dir(),
            open_image: true,
            poll: PollSettings::default(),
        }
    }
}

/// Log in by QR code and persist the credentials
///
/// Returns `true` only when the login succeeded and the config was written.
pub async fn auto_login_setup<T: LoginTransport + ?Sized>(
    transport: &T,
    options: &SetupOptions,
) -> bool {
    cprintln!("A login QR code will be generated, scan it with the mobile app...");

    let mut session = LoginSession::new(transport, options.qr_path())
        .with_settings(options.poll)
        .with_open_image(options.open_image);
    let cookies = session.run().await.into_cookies();

    let written = match cookies {
        Some(cookies) => save_config(&PersistedConfig::from_cookies(&cookies), options),
        None => false,
    };

    if !written {
        cprintln!(error: "Login failed or cancelled");
        remove_leftover_qr(options);
    }
    written
}

fn save_config(config: &PersistedConfig, options: &SetupOptions) -> bool {
    if !config.has_credentials() {
        cprintln!(warn: "Login succeeded but SESSDATA or bili_jct is missing, the saved config may not work");
    }

    match ConfigWriter::new(options.config_path()).write_config(config) {
        Ok(path) => {
            cprintln!(success: "Configuration saved to {}", path.display());
            true
        }
        Err(e) => {
            cprintln!(error: "Failed to create configuration file: {}", e);
            false
        }
    }
}

fn remove_leftover_qr(options: &SetupOptions) {
    let path = options.qr_path();
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }
}
