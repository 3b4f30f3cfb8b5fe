//! Favicon resolution across inspection strategies.
//!
//! `FaviconResolver` tries the header probe first and falls back to the
//! homepage HTML. A fetch error inside a strategy is logged, written to the
//! error sink, and treated as "nothing found by this strategy"; it never
//! aborts a resolution or a batch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::error_handling::{
    categorize_fetch_error, ErrorType, FetchError, InitializationError, ProcessingStats,
};
use crate::initialization::{build_client, FetchOptions};
use crate::input::DomainEntry;
use crate::inspector::{HeaderInspector, HtmlInspector, Inspector};
use crate::output::{format_error_line, format_runtime_line, FaviconRecord, LogSink, ResultSink};

/// Summary of one sequential batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// First row number of the batch
    pub start: usize,
    /// Requested number of rows
    pub offset: usize,
    /// Records written
    pub processed: usize,
    /// Records with a non-empty favicon URL
    pub found: usize,
    /// Wall-clock time of the batch
    pub elapsed: Duration,
    /// Caught fetch errors per category (non-zero only)
    pub errors: Vec<(ErrorType, usize)>,
}

impl BatchReport {
    /// Total caught fetch errors.
    pub fn total_errors(&self) -> usize {
        self.errors.iter().map(|(_, count)| count).sum()
    }

    /// Line appended to the runtime log when the batch completes.
    pub fn runtime_line(&self) -> String {
        format_runtime_line(self.start, self.offset, self.elapsed.as_secs())
    }
}

/// Resolves favicon URLs for domains.
pub struct FaviconResolver {
    probe_client: Arc<reqwest::Client>,
    html_client: Arc<reqwest::Client>,
    config: Arc<ResolverConfig>,
    error_sink: Arc<dyn LogSink>,
}

impl FaviconResolver {
    /// Builds the probe and homepage clients from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if a client cannot be built.
    pub fn new(
        config: ResolverConfig,
        error_sink: Arc<dyn LogSink>,
    ) -> Result<Self, InitializationError> {
        let probe_client = build_client(&FetchOptions::header_probe(&config))?;
        let html_client = build_client(&FetchOptions::html_document(&config))?;
        Ok(Self {
            probe_client,
            html_client,
            config: Arc::new(config),
            error_sink,
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Strategies in precedence order. Fresh inspectors per resolution.
    fn strategies(&self) -> Vec<Box<dyn Inspector>> {
        vec![
            Box::new(HeaderInspector::new(
                self.probe_client.clone(),
                self.config.clone(),
            )),
            Box::new(HtmlInspector::new(
                self.html_client.clone(),
                self.config.clone(),
            )),
        ]
    }

    /// Favicon URL of `domain` (e.g. `yahoo.com`), or an empty string.
    pub async fn resolve(&self, domain: &str) -> String {
        self.resolve_counted(domain, None).await
    }

    async fn resolve_counted(&self, domain: &str, stats: Option<&ProcessingStats>) -> String {
        for mut strategy in self.strategies() {
            match strategy.load_by_domain(domain).await {
                Ok(()) => {
                    let favicon = strategy.find_favicon().await;
                    if !favicon.is_empty() {
                        debug!("{} strategy found {} for {}", strategy.name(), favicon, domain);
                        return favicon;
                    }
                    debug!("{} strategy found nothing for {}", strategy.name(), domain);
                }
                Err(e) => self.record_fetch_error(strategy.name(), domain, &e, stats),
            }
        }
        String::new()
    }

    fn record_fetch_error(
        &self,
        strategy: &str,
        domain: &str,
        error: &FetchError,
        stats: Option<&ProcessingStats>,
    ) {
        let category = categorize_fetch_error(error);
        warn!("{} strategy failed for {} ({}): {}", strategy, domain, category, error);
        self.error_sink.write_line(&format_error_line(&error.to_string()));
        if let Some(stats) = stats {
            stats.increment_error(category);
        }
    }

    /// Resolves `entries` one after another, writing one record per entry in
    /// input order.
    ///
    /// `start` and `offset` describe the requested window and are carried
    /// into the report as-is.
    ///
    /// # Errors
    ///
    /// Only a failing result sink aborts the batch; fetch errors are caught
    /// per domain.
    pub async fn resolve_batch<S>(
        &self,
        start: usize,
        offset: usize,
        entries: &[DomainEntry],
        sink: &mut S,
    ) -> Result<BatchReport>
    where
        S: ResultSink + ?Sized,
    {
        let started = Instant::now();
        let stats = ProcessingStats::new();
        let mut found = 0;

        for entry in entries {
            let favicon_url = self.resolve_counted(&entry.domain, Some(&stats)).await;
            if !favicon_url.is_empty() {
                found += 1;
            }
            sink.write_record(&FaviconRecord {
                rank: entry.rank,
                domain: entry.domain.clone(),
                favicon_url,
            })?;
        }
        sink.flush()?;

        let report = BatchReport {
            start,
            offset,
            processed: entries.len(),
            found,
            elapsed: started.elapsed(),
            errors: stats.non_zero(),
        };

        info!(
            "Batch start:{} offset:{} processed {} domains, {} favicons, {} caught errors in {:.2}s",
            report.start,
            report.offset,
            report.processed,
            report.found,
            report.total_errors(),
            report.elapsed.as_secs_f64()
        );
        for (error_type, count) in &report.errors {
            info!("   {}: {}", error_type, count);
        }

        Ok(report)
    }
}
