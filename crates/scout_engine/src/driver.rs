use std::path::{Path, PathBuf};

use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use scout_core::{DriverError, DriverResolver};
use scout_logging::scout_info;

/// Default directory receiving the managed browser download.
pub const DEFAULT_INSTALL_DIR: &str = "./browser_cache";

/// Resolver backed by chromiumoxide's browser fetcher.
///
/// An explicit non-empty path is handed back unchecked; the job validates
/// it at first use. Without one, a managed Chromium is downloaded into the
/// install directory. A failed download is returned as-is, never retried.
pub struct ManagedDriverResolver {
    install_dir: PathBuf,
}

impl ManagedDriverResolver {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    async fn download(&self) -> Result<PathBuf, DriverError> {
        std::fs::create_dir_all(&self.install_dir)
            .map_err(|err| DriverError::new(format!("install dir: {err}")))?;

        let options = BrowserFetcherOptions::builder()
            .with_path(&self.install_dir)
            .build()
            .map_err(|err| DriverError::new(format!("fetcher options: {err}")))?;
        let fetcher = BrowserFetcher::new(options);

        let info = fetcher
            .fetch()
            .await
            .map_err(|err| DriverError::new(format!("browser download: {err}")))?;
        scout_info!(
            "managed browser installed at {}",
            info.executable_path.display()
        );
        Ok(info.executable_path)
    }
}

impl Default for ManagedDriverResolver {
    fn default() -> Self {
        Self::new(DEFAULT_INSTALL_DIR)
    }
}

impl DriverResolver for ManagedDriverResolver {
    fn resolve(&self, explicit: Option<&Path>) -> Result<PathBuf, DriverError> {
        if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(path.to_path_buf());
        }

        scout_info!("no browser path given, fetching a managed one");
        // Resolution is called synchronously from the interactive context,
        // so the download runs on its own single-use runtime.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| DriverError::new(format!("async runtime: {err}")))?;
        runtime.block_on(self.download())
    }
}
