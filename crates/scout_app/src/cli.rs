use std::path::PathBuf;

use clap::Parser;
use scout_core::JobConfig;

/// Interactive Google Maps results scraper.
#[derive(Debug, Parser)]
#[command(name = "mapscout", version, about)]
pub struct Args {
    /// Number of results to scrape (-1 for all results)
    #[arg(short, long, default_value_t = 500, allow_negative_numbers = true)]
    pub limit: i64,

    /// Replacement text for unavailable information
    #[arg(short, long, default_value = "Not Available")]
    pub unavailable_text: String,

    /// Browser waiting time in seconds
    #[arg(short = 'b', long, default_value_t = 15)]
    pub browser_wait: u64,

    /// Suggested URL extensions to try (can be given multiple times)
    #[arg(short = 's', long = "suggested-ext")]
    pub suggested_ext: Vec<String>,

    /// Run the browser with a visible window instead of headless
    #[arg(short = 'w', long)]
    pub windowed_browser: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Output folder for the CSV and manifest files
    #[arg(short, long, default_value = "./CSV_FILES")]
    pub output_folder: PathBuf,

    /// Path to a browser executable (downloaded when not provided)
    #[arg(short, long)]
    pub driver_path: Option<PathBuf>,
}

impl Args {
    /// Immutable per-task snapshot for one query.
    pub fn job_config(&self, query: &str) -> JobConfig {
        let mut config = JobConfig::new(query);
        config.limit = self.limit;
        config.unavailable_text = self.unavailable_text.clone();
        config.headless = !self.windowed_browser;
        config.wait_secs = self.browser_wait;
        config.suggested_ext = self.suggested_ext.clone();
        config.output_dir = self.output_folder.clone();
        config.driver_path = self.driver_path.clone();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let args = Args::parse_from(["mapscout"]);
        assert_eq!(args.limit, 500);
        assert_eq!(args.unavailable_text, "Not Available");
        assert_eq!(args.browser_wait, 15);
        assert!(args.suggested_ext.is_empty());
        assert!(!args.windowed_browser);
        assert_eq!(args.output_folder, PathBuf::from("./CSV_FILES"));
        assert!(args.driver_path.is_none());
    }

    #[test]
    fn windowed_flag_disables_headless_in_the_snapshot() {
        let args = Args::parse_from(["mapscout", "-w", "--limit=-1"]);
        let config = args.job_config("coffee");
        assert!(!config.headless);
        assert_eq!(config.limit, -1);
        assert_eq!(config.effective_limit(), scout_core::DEFAULT_RESULT_CAP);
    }

    #[test]
    fn repeated_extensions_are_collected_in_order() {
        let args = Args::parse_from(["mapscout", "-s", "es", "-s", "de"]);
        let config = args.job_config("tapas");
        assert_eq!(config.suggested_ext, vec!["es", "de"]);
    }
}
