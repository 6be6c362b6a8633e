//! In-memory taxonomy cache with TTL refresh

use flycatcher_proxy::ProxyError;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::entry::{LookupResult, TaxonomyTable};
use super::fetcher::TaxonomyFetcher;
use super::parser::{ParserKind, TaxonomyParser};
use crate::error::CoreError;

/// Default time-to-live for a refreshed table
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Configuration for the taxonomy cache
#[derive(Debug, Clone)]
pub struct TaxonomyCacheConfig {
    /// Age after which the table is stale
    pub ttl: Duration,
    /// Refresh when a code is missing even if the table is fresh.
    ///
    /// Every lookup of an unknown code costs one upstream fetch, so a client
    /// cycling through bogus codes can drive unbounded upstream traffic.
    pub refresh_on_miss: bool,
    /// Answer from the previous table when a refresh fails and the code is present
    pub serve_stale_on_error: bool,
    /// Row parser used on every refresh
    pub parser: ParserKind,
}

impl Default for TaxonomyCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            refresh_on_miss: true,
            serve_stale_on_error: false,
            parser: ParserKind::Naive,
        }
    }
}

/// Freshness of the cached table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    /// Never populated, or the last refresh yielded no rows
    Empty,
    Fresh,
    Stale,
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyStats {
    pub state: CacheState,
    pub entry_count: usize,
    /// Number of successful refreshes so far
    pub generation: u64,
    pub seconds_since_refresh: Option<u64>,
    pub fetch_attempts: u64,
    pub fetch_failures: u64,
}

/// An immutable table swapped in whole by a refresh
#[derive(Debug)]
struct Snapshot {
    table: TaxonomyTable,
    refreshed_at: Instant,
    generation: u64,
}

/// Taxonomy cache
///
/// Readers clone the current snapshot under a short lock and never wait on a
/// refresh in flight. Refreshes are serialized by an async mutex; callers that
/// queue behind a refresh reuse its result instead of fetching again.
pub struct TaxonomyCache {
    fetcher: Arc<dyn TaxonomyFetcher>,
    parser: Box<dyn TaxonomyParser>,
    config: TaxonomyCacheConfig,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    refresh_lock: Mutex<()>,
    fetch_attempts: AtomicU64,
    fetch_failures: AtomicU64,
}

impl TaxonomyCache {
    /// Create an empty cache
    pub fn new(fetcher: Arc<dyn TaxonomyFetcher>, config: TaxonomyCacheConfig) -> Self {
        info!(
            "Initializing taxonomy cache (ttl: {}s, refresh_on_miss: {}, serve_stale_on_error: {}, parser: {})",
            config.ttl.as_secs(),
            config.refresh_on_miss,
            config.serve_stale_on_error,
            config.parser.as_str()
        );

        Self {
            fetcher,
            parser: config.parser.parser(),
            config,
            snapshot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            fetch_attempts: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
        }
    }

    /// Replace the parser selected by the config
    pub fn with_parser(mut self, parser: Box<dyn TaxonomyParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Look up a species code, refreshing the table first when required
    pub async fn lookup(&self, code: &str) -> Result<LookupResult, CoreError> {
        let snapshot = self.current();

        if !self.needs_refresh(snapshot.as_deref(), code) {
            return Ok(self.answer(snapshot.as_deref(), code));
        }

        debug!(
            "Refreshing taxonomy for lookup of {} (state: {:?})",
            code,
            self.state_of(snapshot.as_deref())
        );

        let seen = snapshot.as_ref().map(|s| s.generation);
        match self.refresh_unless_replaced(seen).await {
            Ok(fresh) => Ok(self.answer(Some(fresh.as_ref()), code)),
            Err(e) => {
                if self.config.serve_stale_on_error
                    && let Some(entry) = snapshot.as_ref().and_then(|s| s.table.get(code))
                {
                    warn!("Taxonomy refresh failed ({}), serving stale entry for {}", e, code);
                    metrics::counter!("flycatcher_taxonomy_lookups_total", "result" => "stale")
                        .increment(1);
                    return Ok(LookupResult::Found(entry.clone()));
                }
                metrics::counter!("flycatcher_taxonomy_lookups_total", "result" => "error")
                    .increment(1);
                Err(e)
            }
        }
    }

    /// Force a refresh regardless of state, returning the new entry count
    pub async fn refresh(&self) -> Result<usize, CoreError> {
        let _guard = self.refresh_lock.lock().await;
        let snapshot = self.refresh_locked().await?;
        Ok(snapshot.table.len())
    }

    /// Current freshness of the table
    pub fn state(&self) -> CacheState {
        self.state_of(self.current().as_deref())
    }

    /// Get cache statistics
    pub fn stats(&self) -> TaxonomyStats {
        let snapshot = self.current();
        TaxonomyStats {
            state: self.state_of(snapshot.as_deref()),
            entry_count: snapshot.as_ref().map_or(0, |s| s.table.len()),
            generation: snapshot.as_ref().map_or(0, |s| s.generation),
            seconds_since_refresh: snapshot.as_ref().map(|s| s.refreshed_at.elapsed().as_secs()),
            fetch_attempts: self.fetch_attempts.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
        }
    }

    fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().clone()
    }

    fn state_of(&self, snapshot: Option<&Snapshot>) -> CacheState {
        match snapshot {
            None => CacheState::Empty,
            Some(s) if s.table.is_empty() => CacheState::Empty,
            Some(s) if s.refreshed_at.elapsed() > self.config.ttl => CacheState::Stale,
            Some(_) => CacheState::Fresh,
        }
    }

    fn needs_refresh(&self, snapshot: Option<&Snapshot>, code: &str) -> bool {
        match self.state_of(snapshot) {
            CacheState::Empty | CacheState::Stale => true,
            CacheState::Fresh => {
                self.config.refresh_on_miss
                    && !snapshot.is_some_and(|s| s.table.contains_key(code))
            }
        }
    }

    fn answer(&self, snapshot: Option<&Snapshot>, code: &str) -> LookupResult {
        match snapshot.and_then(|s| s.table.get(code)) {
            Some(entry) => {
                metrics::counter!("flycatcher_taxonomy_lookups_total", "result" => "found")
                    .increment(1);
                LookupResult::Found(entry.clone())
            }
            None => {
                debug!("Species code not in taxonomy: {}", code);
                metrics::counter!("flycatcher_taxonomy_lookups_total", "result" => "not_found")
                    .increment(1);
                LookupResult::not_found(code)
            }
        }
    }

    /// Refresh unless another caller swapped in a new table since `seen`
    async fn refresh_unless_replaced(&self, seen: Option<u64>) -> Result<Arc<Snapshot>, CoreError> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.current()
            && Some(current.generation) != seen
        {
            debug!(
                "Taxonomy already refreshed by a concurrent caller (generation {})",
                current.generation
            );
            return Ok(current);
        }

        self.refresh_locked().await
    }

    /// Fetch, parse and swap. Caller must hold `refresh_lock`.
    async fn refresh_locked(&self) -> Result<Arc<Snapshot>, CoreError> {
        let started = Instant::now();
        self.fetch_attempts.fetch_add(1, Ordering::Relaxed);

        let raw = match self.fetcher.fetch().await {
            Ok(raw) => raw,
            Err(e) => return Err(self.record_failure(e)),
        };

        let table = self.parser.parse(&raw);
        let generation = self.current().map_or(1, |s| s.generation + 1);
        let snapshot = Arc::new(Snapshot {
            table,
            refreshed_at: started,
            generation,
        });

        *self.snapshot.write() = Some(snapshot.clone());

        metrics::counter!("flycatcher_taxonomy_refreshes_total", "outcome" => "success")
            .increment(1);
        info!(
            "Cached {} species (generation {}, fetched in {}ms)",
            snapshot.table.len(),
            generation,
            started.elapsed().as_millis()
        );

        Ok(snapshot)
    }

    fn record_failure(&self, err: ProxyError) -> CoreError {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("flycatcher_taxonomy_refreshes_total", "outcome" => "failure")
            .increment(1);
        warn!("Taxonomy refresh failed: {}", err);
        CoreError::from(err)
    }
}

/// Spawn a background task that refreshes the taxonomy periodically
pub fn spawn_refresh_task(
    cache: Arc<TaxonomyCache>,
    interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    use tokio::time::interval;

    info!(
        "Starting background taxonomy refresh task (interval: {} seconds)",
        interval_secs
    );

    tokio::spawn(async move {
        // First tick fires immediately and warms the cache
        let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));

        loop {
            ticker.tick().await;

            match cache.refresh().await {
                Ok(count) => debug!("Scheduled taxonomy refresh cached {} species", count),
                Err(e) => warn!("Error during scheduled taxonomy refresh: {}", e),
            }
        }
    })
}
