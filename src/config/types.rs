use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Longest spacing between downloads a configuration may ask for
pub const MAX_DOWNLOAD_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Main configuration structure for Mirror-Crawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Global download ceiling, shared by every worker
    pub requests_per_second: f64,

    /// Maximum number of files open for writing at once
    pub max_open_handles: usize,

    /// Longest final path segment (in characters) the crawler will mirror
    pub max_filename_length: usize,

    /// Number of concurrent crawl workers
    pub workers: usize,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl CrawlerConfig {
    /// Minimum spacing between downloads, capped at [`MAX_DOWNLOAD_INTERVAL`]
    pub fn download_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.requests_per_second)
            .map_or(MAX_DOWNLOAD_INTERVAL, |interval| interval.min(MAX_DOWNLOAD_INTERVAL))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10.0,
            max_open_handles: 512,
            max_filename_length: 250,
            workers: 16,
            request_timeout_secs: 30,
            user_agent: format!("mirror-crawl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Root of the mirrored directory tree
    pub directory: PathBuf,

    /// Path to the SQLite database file; `None` disables persistence
    pub database_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./crawl"),
            database_path: Some(PathBuf::from("./crawl/crawl.db")),
        }
    }
}
