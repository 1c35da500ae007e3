//! Screenshot capture for failed scenarios

use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::driver::PageDriver;
use crate::error::{BrowserError, Result};

/// Writes full-page PNG screenshots into one directory
#[derive(Debug, Clone)]
pub struct ScreenshotCapture {
    dir: PathBuf,
}

impl ScreenshotCapture {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Capture the session's page as `<label>_<unix-millis>.png`
    ///
    /// # Returns
    /// Path of the written file
    pub async fn capture<D: PageDriver>(&self, session: &D, label: &str) -> Result<PathBuf> {
        info!("Capturing screenshot for {}", label);

        let data = session.screenshot().await?;
        if data.is_empty() {
            return Err(BrowserError::ScreenshotFailed(format!(
                "Driver returned an empty screenshot for {}",
                label
            )));
        }

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            BrowserError::ScreenshotFailed(format!(
                "Failed to create screenshot directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let filename = format!("{}_{}.png", label, Utc::now().timestamp_millis());
        let path = self.dir.join(filename);
        fs::write(&path, &data).await.map_err(|e| {
            BrowserError::ScreenshotFailed(format!(
                "Failed to write screenshot {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!("Screenshot saved to {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedNewsletter;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_capture_writes_png() {
        let dir = TempDir::new().unwrap();
        let capture = ScreenshotCapture::new(dir.path().join("screenshots"));
        let sim = SimulatedNewsletter::new();

        let path = capture.capture(&sim, "TC01-valid-email").await.unwrap();

        assert!(path.starts_with(dir.path().join("screenshots")));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("TC01-valid-email_"));
        assert!(name.ends_with(".png"));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_capture_into_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let capture = ScreenshotCapture::new(blocker.join("screenshots"));
        let sim = SimulatedNewsletter::new();
        let err = capture.capture(&sim, "TC02").await.unwrap_err();
        assert!(matches!(err, BrowserError::ScreenshotFailed(_)));
    }
}
