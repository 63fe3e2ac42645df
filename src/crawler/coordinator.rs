//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Initializing storage, the HTTP client and the shared limiters
//! - Running a bounded pool of worker tasks over the work queue
//! - Admitting discovered links and recording them in storage
//! - Tallying per-URL failures and building the final report

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, FetchResult, Fetcher};
use crate::crawler::handle_gate::HandleGate;
use crate::crawler::rate_limiter::RateLimiter;
use crate::crawler::scheduler::{Admission, QueuedUrl, Scheduler};
use crate::output::CrawlReport;
use crate::state::ErrorTally;
use crate::storage::{open_storage, Page, SqliteStorage, Storage, StorageResult};
use crate::url::{normalize_url, resolve_same_origin};
use crate::CrawlError;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinSet;
use url::Url;

/// Pages between progress log lines
const PROGRESS_INTERVAL: u64 = 50;

/// Tally category for worker tasks that panicked
const WORKER_PANIC_MESSAGE: &str = "worker panicked";

/// Locks a shared value, recovering it if a worker panicked while holding it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What a worker reports back about one URL
#[derive(Debug)]
struct ProcessedUrl {
    url: Url,

    /// `Some(is_html)` when the body was written to the mirror
    mirrored: Option<bool>,

    /// Raw hrefs found in an HTML body
    links: Vec<String>,
}

impl ProcessedUrl {
    fn failed(url: Url) -> Self {
        Self {
            url,
            mirrored: None,
            links: Vec::new(),
        }
    }
}

/// State shared by every worker task
struct WorkerContext {
    fetcher: Fetcher,
    storage: Option<Arc<Mutex<SqliteStorage>>>,
    tally: Arc<Mutex<ErrorTally>>,
}

impl WorkerContext {
    /// Fetches one claimed URL and records its outcome
    ///
    /// Every failure is terminal for this URL only: it is logged, tallied and
    /// stored, and the worker returns normally.
    async fn process_url(&self, queued: QueuedUrl) -> ProcessedUrl {
        let url = queued.url;

        match self.fetcher.fetch(&url).await {
            FetchResult::Success {
                is_html,
                body,
                path,
                links,
            } => {
                tracing::debug!(
                    "Mirrored {} to {} ({} bytes, {} links)",
                    url,
                    path.display(),
                    body.len(),
                    links.len()
                );
                self.store_page(Page::downloaded(url.as_str(), is_html, body));

                ProcessedUrl {
                    url,
                    mirrored: Some(is_html),
                    links,
                }
            }

            FetchResult::HttpError { status_code } => {
                tracing::warn!("HTTP {} for {}", status_code, url);
                lock(&self.tally).record_http(status_code);
                self.store_failure(&url, Some(status_code), None);
                ProcessedUrl::failed(url)
            }

            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                lock(&self.tally).record_unknown(&error);
                self.store_failure(&url, None, Some(&error));
                ProcessedUrl::failed(url)
            }

            FetchResult::WriteError { path, error } => {
                tracing::warn!("Failed to write {} to {}: {}", url, path.display(), error);
                lock(&self.tally).record_unknown(&error);
                self.store_failure(&url, None, Some(&error));
                ProcessedUrl::failed(url)
            }
        }
    }

    fn store_page(&self, page: Page) {
        let Some(storage) = &self.storage else {
            return;
        };

        let mut storage = lock(storage);
        match record_page(&mut *storage, &page) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("{} already stored, keeping existing row", page.url),
            Err(e) => tracing::error!("Failed to store page {}: {}", page.url, e),
        }
    }

    fn store_failure(&self, url: &Url, code: Option<u16>, message: Option<&str>) {
        let Some(storage) = &self.storage else {
            return;
        };

        let mut storage = lock(storage);
        match record_failure(&mut *storage, url, code, message) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("{} already stored, keeping existing row", url),
            Err(e) => tracing::error!("Failed to store failure for {}: {}", url, e),
        }
    }

    fn store_link(&self, origin: &Url, target: &Url) {
        let Some(storage) = &self.storage else {
            return;
        };

        if let Err(e) = lock(storage).insert_link(origin.as_str(), target.as_str()) {
            tracing::error!("Failed to store link {} -> {}: {}", origin, target, e);
        }
    }
}

/// Stores a page unless the database already holds a row for its URL
///
/// Returns `false` when an earlier crawl recorded the URL. The first stored
/// row is kept.
fn record_page(storage: &mut dyn Storage, page: &Page) -> StorageResult<bool> {
    if storage.get_page_by_url(&page.url)?.is_some() {
        return Ok(false);
    }

    storage.create_page(page)?;
    Ok(true)
}

/// Stores a failed page, creating its error category on first sight
fn record_failure(
    storage: &mut dyn Storage,
    url: &Url,
    code: Option<u16>,
    message: Option<&str>,
) -> StorageResult<bool> {
    if storage.get_page_by_url(url.as_str())?.is_some() {
        return Ok(false);
    }

    let error = storage.get_or_create_error(code, message)?;
    storage.create_page(&Page::failed(url.as_str(), error.id))?;
    Ok(true)
}

/// Main crawler coordinator structure
pub struct Coordinator {
    root: Url,
    config: Arc<Config>,
    scheduler: Scheduler,
    context: Arc<WorkerContext>,
    links_followed: u64,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `root` - The URL to start from; its origin bounds the crawl
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - Invalid root or config, or failed to initialize
    pub fn new(root: &str, config: Config) -> Result<Self, CrawlError> {
        validate(&config)?;
        let root = normalize_url(root)?;

        std::fs::create_dir_all(&config.output.directory)?;

        let storage = match &config.output.database_path {
            Some(path) => {
                tracing::info!("Recording crawl in {}", path.display());
                Some(Arc::new(Mutex::new(open_storage(path)?)))
            }
            None => {
                tracing::info!("No database configured, pages are only mirrored");
                None
            }
        };

        let client = build_http_client(&config.crawler)?;
        let rate_limiter = Arc::new(RateLimiter::new(config.crawler.download_interval()));
        let handle_gate = HandleGate::new(config.crawler.max_open_handles);
        let fetcher = Fetcher::new(
            client,
            rate_limiter,
            handle_gate,
            config.output.directory.clone(),
        );

        let scheduler = Scheduler::new(config.crawler.max_filename_length);

        Ok(Self {
            root,
            config: Arc::new(config),
            scheduler,
            context: Arc::new(WorkerContext {
                fetcher,
                storage,
                tally: Arc::new(Mutex::new(ErrorTally::new())),
            }),
            links_followed: 0,
        })
    }

    /// The normalized crawl root
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Runs the main crawl loop
    ///
    /// This is the core crawling logic that:
    /// 1. Claims the root URL
    /// 2. Keeps up to `workers` fetch tasks in flight
    /// 3. Admits links discovered by finished tasks
    /// 4. Returns once the queue is empty and no task is in flight
    pub async fn run(&mut self) -> Result<CrawlReport, CrawlError> {
        let started_at = Utc::now();
        let start_time = std::time::Instant::now();
        let workers = self.config.crawler.workers;

        tracing::info!(
            "Starting crawl of {} into {} ({} workers, {} req/s)",
            self.root,
            self.context.fetcher.output_dir().display(),
            workers,
            self.config.crawler.requests_per_second
        );

        let root = self.root.clone();
        if let Admission::FilenameTooLong { length } = self.scheduler.offer(root.clone()) {
            self.skip_long_filename(&root, length);
        }

        let mut tasks: JoinSet<ProcessedUrl> = JoinSet::new();
        let mut pages_processed: u64 = 0;
        let mut pages_mirrored: u64 = 0;
        let mut html_pages: u64 = 0;

        loop {
            while tasks.len() < workers {
                let Some(queued) = self.scheduler.next_url() else {
                    break;
                };
                let context = Arc::clone(&self.context);
                tasks.spawn(async move { context.process_url(queued).await });
            }

            let Some(joined) = tasks.join_next().await else {
                tracing::info!("Work queue is empty, crawl complete");
                break;
            };

            pages_processed += 1;

            match joined {
                Ok(processed) => {
                    if let Some(is_html) = processed.mirrored {
                        pages_mirrored += 1;
                        if is_html {
                            html_pages += 1;
                        }
                    }

                    for href in &processed.links {
                        self.follow_link(&processed.url, href);
                    }
                }
                Err(e) => {
                    let error = CrawlError::WorkerPanic(e.to_string());
                    tracing::error!("{}", error);
                    lock(&self.context.tally).record_unknown(WORKER_PANIC_MESSAGE);
                }
            }

            if pages_processed % PROGRESS_INTERVAL == 0 {
                let elapsed = start_time.elapsed();
                let rate = pages_processed as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} pages processed, {} queued, {} in flight, {:.2} pages/sec",
                    pages_processed,
                    self.scheduler.queue_size(),
                    tasks.len(),
                    rate
                );
            }
        }

        let errors = lock(&self.context.tally).clone();
        let duration = start_time.elapsed();

        tracing::info!(
            "Crawl completed: {} pages mirrored, {} errors in {:?}",
            pages_mirrored,
            errors.total(),
            duration
        );

        Ok(CrawlReport {
            root: self.root.to_string(),
            started_at,
            finished_at: Utc::now(),
            duration,
            urls_claimed: self.scheduler.claimed_count() as u64,
            pages_mirrored,
            html_pages,
            links_followed: self.links_followed,
            errors,
        })
    }

    /// Handles one href discovered on `origin`
    ///
    /// This method:
    /// 1. Drops hrefs that are not site-relative or leave the root's origin
    /// 2. Skips targets whose final path segment is too long
    /// 3. Records the link in storage
    /// 4. Queues the target if it has not been claimed yet
    fn follow_link(&mut self, origin: &Url, href: &str) {
        let Some(target) = resolve_same_origin(&self.root, href) else {
            tracing::trace!("Ignoring link {:?} on {}", href, origin);
            return;
        };

        match self.scheduler.offer(target.clone()) {
            Admission::Queued => tracing::debug!("Queued {}", target),
            Admission::AlreadyClaimed => tracing::trace!("Already claimed {}", target),
            Admission::FilenameTooLong { length } => {
                self.skip_long_filename(&target, length);
                return;
            }
        }

        self.links_followed += 1;
        self.context.store_link(origin, &target);
    }

    fn skip_long_filename(&self, url: &Url, length: usize) {
        tracing::warn!(
            "Skipping {}: final path segment is {} characters (limit {})",
            url,
            length,
            self.config.crawler.max_filename_length
        );
        lock(&self.context.tally).record_filename_too_long();
    }
}

/// Runs a crawl from `root` with the given configuration
///
/// This function:
/// 1. Validates the configuration and normalizes the root URL
/// 2. Opens the database (when configured) and builds the HTTP client
/// 3. Mirrors every reachable same-origin resource
/// 4. Returns the crawl report
///
/// # Arguments
///
/// * `root` - The URL to start from
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished; per-URL failures are in the report
/// * `Err(CrawlError)` - Setup failed before any URL was fetched
///
/// # Example
///
/// ```no_run
/// use mirror_crawl::config::Config;
/// use mirror_crawl::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl("https://example.com/", Config::default()).await?;
/// println!("{} pages mirrored", report.pages_mirrored);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(root: &str, config: Config) -> Result<CrawlReport, CrawlError> {
    let mut coordinator = Coordinator::new(root, config)?;
    coordinator.run().await
}
