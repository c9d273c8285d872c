//! QR image rendering and lifetime
//!
//! A [`QrImage`] owns the PNG written for the scan URL. Dropping it removes
//! the file, so every exit path of a session cleans up after itself.

use crate::auth::error::LoginResult;
use crate::constants::{QR_BORDER_MODULES, QR_BOX_SIZE};
use image::{imageops, GrayImage, Luma};
use qrcode::QrCode;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Rendered QR code on disk, removed when dropped
#[derive(Debug)]
pub struct QrImage {
    path: PathBuf,
}

impl QrImage {
    /// Encode `data` as a QR code and write it as a PNG to `path`
    pub fn render(data: &str, path: impl Into<PathBuf>) -> LoginResult<Self> {
        let path = path.into();
        let canvas = render_matrix(data)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        canvas.save(&path)?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ask the platform to display the image
    pub fn open(&self) -> io::Result<()> {
        open_with_system_viewer(&self.path)
    }

    /// Delete the image file, ignoring errors
    pub fn remove(&self) {
        if self.path.exists() {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

impl Drop for QrImage {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Black-on-white QR matrix with a `QR_BORDER_MODULES` quiet zone
fn render_matrix(data: &str) -> LoginResult<GrayImage> {
    let code = QrCode::new(data.as_bytes())?;
    let matrix = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(QR_BOX_SIZE, QR_BOX_SIZE)
        .dark_color(Luma([0u8]))
        .light_color(Luma([255u8]))
        .build();

    let border = QR_BORDER_MODULES * QR_BOX_SIZE;
    let mut canvas = GrayImage::from_pixel(
        matrix.width() + 2 * border,
        matrix.height() + 2 * border,
        Luma([255u8]),
    );
    imageops::overlay(&mut canvas, &matrix, border as i64, border as i64);
    Ok(canvas)
}

fn open_with_system_viewer(path: &Path) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        command.arg("/c").arg("start").arg("").arg(path);
        command
    };

    #[cfg(target_os = "macos")]
    let mut command = {
        let mut command = Command::new("open");
        command.arg(path);
        command
    };

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    };

    command.spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn test_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from("./target").join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_render_writes_png_with_border() {
        let dir = test_dir("test_qr_render");
        let path = dir.join("login_qrcode.png");

        let image = QrImage::render("https://example/qr?x=1", &path).unwrap();
        assert!(path.exists(), "QR image should be written");

        let decoded = image::open(image.path()).unwrap().to_luma8();
        assert_eq!(decoded.width(), decoded.height());
        // Border pixels are white, the finder pattern corner right after the border is black
        let border = QR_BORDER_MODULES * QR_BOX_SIZE;
        assert_eq!(decoded.get_pixel(0, 0), &Luma([255u8]));
        assert_eq!(decoded.get_pixel(border, border), &Luma([0u8]));

        drop(image);
        assert!(!path.exists(), "QR image should be removed on drop");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = test_dir("test_qr_remove");
        let path = dir.join("login_qrcode.png");

        let image = QrImage::render("abc", &path).unwrap();
        image.remove();
        assert!(!path.exists());
        // A second removal and the drop must not panic
        image.remove();
        drop(image);
        fs::remove_dir_all(dir).unwrap();
    }
}
