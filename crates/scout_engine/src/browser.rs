use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use futures::StreamExt;
use scout_core::JobConfig;
use scout_logging::scout_debug;
use tokio::task::JoinHandle;

use crate::types::ScrapeError;

/// CDP requests get twice the configured page wait, with a floor of two
/// seconds for a zero wait.
fn request_timeout(wait_secs: u64) -> Duration {
    Duration::from_secs(wait_secs.max(1).saturating_mul(2))
}

/// Launch the browser described by the job config and spawn its CDP
/// handler loop. The caller owns closing the browser; aborting the
/// returned task only stops message pumping.
pub(crate) async fn launch(config: &JobConfig) -> Result<(Browser, JoinHandle<()>), ScrapeError> {
    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(request_timeout(config.wait_secs))
        .window_size(1280, 900);

    if let Some(path) = &config.driver_path {
        builder = builder.chrome_executable(path);
    }
    builder = if config.headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };
    builder = builder
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-notifications")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--mute-audio")
        .arg("--lang=en-US");

    let browser_config = builder.build().map_err(ScrapeError::Launch)?;
    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .map_err(|err| ScrapeError::Launch(err.to_string()))?;

    let handler_task = tokio::task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(err) = event {
                // CDP noise is frequent and rarely actionable.
                scout_debug!("browser handler: {err}");
            }
        }
    });

    Ok((browser, handler_task))
}
