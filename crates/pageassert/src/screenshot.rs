// Screenshots - named captures and the after-failed-step capture

use crate::api::SessionConfig;
use crate::error::{Error, Result};
use crate::page::Page;
use crate::session::Session;
use std::path::{Path, PathBuf};

/// File name written by [`FailureScreenshot`].
pub const FAILURE_SCREENSHOT_FILE: &str = "screenshot-fail.png";

/// Captures a PNG of the page into `dir/<name>.png` and returns the path.
///
/// `name` must be a plain file stem; path separators are rejected so a step
/// cannot write outside the screenshot directory.
pub async fn save_screenshot<P: Page>(
    session: &Session<P>,
    dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
        return Err(Error::InvalidArgument(format!(
            "screenshot name \"{}\" must be a plain file name",
            name
        )));
    }
    let path = dir.join(format!("{}.png", name));
    write_png(session, &path).await?;
    Ok(path)
}

async fn write_png<P: Page>(session: &Session<P>, path: &Path) -> Result<()> {
    let png = session.page().screenshot().await?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &png).await?;
    tracing::info!("Saved screenshot ({} bytes) to {}", png.len(), path.display());
    Ok(())
}

/// Screenshot taken after a step fails.
///
/// The window is resized first so failure captures have a consistent size.
#[derive(Debug, Clone)]
pub struct FailureScreenshot {
    dir: PathBuf,
    window_size: (u32, u32),
}

impl FailureScreenshot {
    pub fn new(dir: impl Into<PathBuf>, window_size: (u32, u32)) -> Self {
        Self {
            dir: dir.into(),
            window_size,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.screenshot_dir.clone(), config.window_size)
    }

    /// Path the capture is written to.
    pub fn path(&self) -> PathBuf {
        self.dir.join(FAILURE_SCREENSHOT_FILE)
    }

    /// Resizes the window and writes the capture, overwriting earlier ones.
    pub async fn capture<P: Page>(&self, session: &Session<P>) -> Result<PathBuf> {
        let (width, height) = self.window_size;
        session.page().set_window_size(width, height).await?;
        let path = self.path();
        write_png(session, &path).await?;
        Ok(path)
    }
}
