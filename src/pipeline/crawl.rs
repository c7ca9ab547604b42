// src/pipeline/crawl.rs

//! Crawl controller.
//!
//! Drives the page-by-page crawl: load a listing page, discover
//! candidates, extract and validate each one, and accumulate accepted
//! records. Strictly sequential; the only suspension points are
//! renderer navigations and pacing delays. Output order is discovery
//! order: page order, then within-page candidate order.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{Candidate, CrawlConfig, CrawlStats, ProductRecord, SiteProfile};
use crate::render::{HttpRenderer, RenderedPage, Renderer};
use crate::services::{
    PaceContext, PacingScheduler, discover_links, extract_record, is_acceptable,
};
use crate::storage::RecordStorage;

/// Fixed delay between navigation attempts.
const RETRY_DELAY_MS: u64 = 1000;

/// Consecutive empty listing pages that stop the crawl.
const MAX_EMPTY_STREAK: u32 = 2;

/// Everything one crawl session produced.
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Accepted records, in acceptance order
    pub records: Vec<ProductRecord>,
    /// Session counters
    pub stats: CrawlStats,
}

/// What happened to one candidate.
enum CandidateOutcome {
    Accepted(Box<ProductRecord>),
    Rejected,
    NavigationFailed,
    ExtractionFailed,
}

/// Drives one crawl session over a single site.
///
/// Exclusively owns the accumulated result sequence for the session;
/// no other component writes to it.
pub struct CrawlController<'a, R: Renderer> {
    renderer: &'a R,
    profile: &'a SiteProfile,
    config: &'a CrawlConfig,
    pacing: PacingScheduler,
}

impl<'a, R: Renderer> CrawlController<'a, R> {
    pub fn new(
        renderer: &'a R,
        profile: &'a SiteProfile,
        config: &'a CrawlConfig,
        pacing: PacingScheduler,
    ) -> Self {
        Self {
            renderer,
            profile,
            config,
            pacing,
        }
    }

    /// Run the crawl to completion and return the accumulated records.
    pub async fn run(mut self) -> Result<CrawlOutcome> {
        let mut stats = CrawlStats::begin();
        let mut results: Vec<ProductRecord> = Vec::new();
        let mut page: u32 = 1;
        let mut empty_streak: u32 = 0;

        while page <= self.config.max_pages && empty_streak < MAX_EMPTY_STREAK {
            let listing_url = self.profile.listing_url(page);
            log::info!("Listing page {page}: {listing_url}");

            // Exhausted retries at the listing level degrade to an empty
            // page and count toward the stop condition.
            let candidates = match self.navigate_with_retry(&listing_url).await {
                Ok(listing) => discover_links(&listing, self.profile),
                Err(e) => {
                    log::warn!("Giving up on listing page {page}: {e}");
                    stats.navigation_failures += 1;
                    Vec::new()
                }
            };
            stats.pages_visited += 1;

            if candidates.is_empty() {
                empty_streak += 1;
                log::info!("Page {page} yielded no candidates (streak {empty_streak})");
                page += 1;
                continue;
            }

            empty_streak = 0;
            stats.candidates_seen += candidates.len();
            log::info!("Page {page}: {} candidates", candidates.len());

            for candidate in &candidates {
                match self.process_candidate(candidate).await {
                    CandidateOutcome::Accepted(record) => {
                        log::info!("Accepted: {}", record.title);
                        results.push(*record);
                        stats.records_accepted += 1;
                    }
                    CandidateOutcome::Rejected => stats.records_rejected += 1,
                    CandidateOutcome::NavigationFailed => stats.navigation_failures += 1,
                    CandidateOutcome::ExtractionFailed => stats.extraction_failures += 1,
                }
                self.pacing.pause(PaceContext::Interacting).await;
            }

            self.pacing.pause(PaceContext::Browsing).await;
            page += 1;
        }

        stats.finish();
        Ok(CrawlOutcome {
            records: results,
            stats,
        })
    }

    /// Fetch, extract, and validate one candidate. Every failure mode is
    /// contained here; the crawl always continues with the next
    /// candidate.
    async fn process_candidate(&mut self, candidate: &Candidate) -> CandidateOutcome {
        self.pacing.pause(PaceContext::Reading).await;

        let page: RenderedPage = match self.navigate_with_retry(&candidate.url).await {
            Ok(page) => page,
            Err(e) => {
                log::warn!("Skipping candidate: {e}");
                return CandidateOutcome::NavigationFailed;
            }
        };

        let record = match extract_record(&page, &candidate.url, &candidate.title, self.profile)
        {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Extraction fault for {}: {e}", candidate.url);
                return CandidateOutcome::ExtractionFailed;
            }
        };

        if is_acceptable(&record, &self.profile.filter) {
            CandidateOutcome::Accepted(Box::new(record))
        } else {
            CandidateOutcome::Rejected
        }
    }

    /// Navigate with the profile's retry policy: up to `max_retries`
    /// attempts with a fixed inter-attempt delay, then propagate.
    async fn navigate_with_retry(&self, url: &str) -> Result<RenderedPage> {
        let policy = &self.profile.navigation;
        let mut last_error = None;

        for attempt in 1..=policy.max_retries {
            match self.renderer.navigate(url, policy).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    log::warn!(
                        "Navigation attempt {attempt}/{} to {url} failed: {e}",
                        policy.max_retries
                    );
                    last_error = Some(e);
                    if attempt < policy.max_retries {
                        tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::navigation(url, "no attempts made")))
    }
}

/// Run a full crawl session and persist the snapshot.
pub async fn run_crawl(
    config: &CrawlConfig,
    profile: &SiteProfile,
    storage: &dyn RecordStorage,
) -> Result<CrawlOutcome> {
    profile.validate()?;
    config.validate()?;

    let pacing = if config.humanize {
        PacingScheduler::humanized()
    } else {
        PacingScheduler::plain(config.request_delay_ms)
    };

    // A humanized session adopts its chosen browser identity.
    let user_agent = pacing
        .identity()
        .map(|id| id.user_agent.to_string())
        .unwrap_or_else(|| config.user_agent.clone());
    let renderer = HttpRenderer::new(&user_agent, config.timeout_secs, config.visual_debug)?;

    log::info!("Crawling '{}' (max {} pages)", profile.site_name, config.max_pages);
    let controller = CrawlController::new(&renderer, profile, config, pacing);
    let outcome = controller.run().await?;

    let summary = storage.write_snapshot(&outcome.records, &outcome.stats).await?;
    log::info!(
        "Crawl complete: {} records accepted, {} rejected, snapshot at {}",
        outcome.stats.records_accepted,
        outcome.stats.records_rejected,
        summary.location
    );

    Ok(outcome)
}
