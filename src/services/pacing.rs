// src/services/pacing.rs

//! Request pacing between renderer interactions.
//!
//! Two modes: plain (a short fixed delay) and humanized (randomized,
//! context-specific delays plus simulated pointer movement and
//! scrolling, with a session identity chosen once). Pacing is a timing
//! and observability policy only; it never changes which records a
//! crawl produces.

use std::ops::Range;
use std::time::Duration;

/// What the crawler is about to do; selects the humanized delay range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceContext {
    /// Moving between listing pages
    Browsing,
    /// About to read a product page
    Reading,
    /// Small actions between candidates
    Interacting,
}

/// Declared viewport sizes for humanized sessions.
const VIEWPORTS: &[(u32, u32)] = &[
    (1920, 1080),
    (1680, 1050),
    (1536, 864),
    (1440, 900),
    (1366, 768),
];

/// Browser identity strings for humanized sessions.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
];

/// Probability of simulating a scroll event during a humanized pause.
const SCROLL_PROBABILITY: f64 = 0.3;

/// Identity attributes chosen once per humanized session.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user_agent: &'static str,
    pub viewport: (u32, u32),
}

impl SessionIdentity {
    fn choose() -> Self {
        Self {
            user_agent: USER_AGENTS[fastrand::usize(0..USER_AGENTS.len())],
            viewport: VIEWPORTS[fastrand::usize(0..VIEWPORTS.len())],
        }
    }
}

/// Supplies delays (and, in humanized mode, simulated interaction)
/// between renderer actions.
pub struct PacingScheduler {
    mode: Mode,
}

enum Mode {
    Plain {
        delay: Duration,
    },
    Humanized {
        identity: SessionIdentity,
        pointer: (u32, u32),
    },
}

impl PacingScheduler {
    /// Fixed-delay pacing.
    pub fn plain(delay_ms: u64) -> Self {
        Self {
            mode: Mode::Plain {
                delay: Duration::from_millis(delay_ms),
            },
        }
    }

    /// Humanized pacing; session identity is fixed at construction.
    pub fn humanized() -> Self {
        let identity = SessionIdentity::choose();
        log::debug!(
            "Session identity: viewport {}x{}, agent '{}'",
            identity.viewport.0,
            identity.viewport.1,
            identity.user_agent
        );
        Self {
            mode: Mode::Humanized {
                identity,
                pointer: (0, 0),
            },
        }
    }

    /// The session identity, when humanized pacing is active.
    pub fn identity(&self) -> Option<&SessionIdentity> {
        match &self.mode {
            Mode::Plain { .. } => None,
            Mode::Humanized { identity, .. } => Some(identity),
        }
    }

    /// Wait the appropriate amount of time before the next action.
    pub async fn pause(&mut self, context: PaceContext) {
        match &mut self.mode {
            Mode::Plain { delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
            }
            Mode::Humanized { identity, pointer } => {
                let range = delay_range(context);
                let delay = fastrand::u64(range);

                *pointer = (
                    fastrand::u32(0..identity.viewport.0),
                    fastrand::u32(0..identity.viewport.1),
                );
                log::trace!("Pointer moved to {:?}", pointer);
                if fastrand::f64() < SCROLL_PROBABILITY {
                    log::trace!("Scrolled {}px", fastrand::u32(100..600));
                }

                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }
    }
}

/// Humanized delay range in milliseconds for a context.
fn delay_range(context: PaceContext) -> Range<u64> {
    match context {
        PaceContext::Browsing => 800..2500,
        PaceContext::Reading => 1500..4000,
        PaceContext::Interacting => 300..1200,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_pauses_longest_interacting_shortest() {
        let browsing = delay_range(PaceContext::Browsing);
        let reading = delay_range(PaceContext::Reading);
        let interacting = delay_range(PaceContext::Interacting);
        assert!(reading.start > browsing.start);
        assert!(interacting.end < browsing.end);
    }

    #[test]
    fn plain_mode_has_no_identity() {
        let scheduler = PacingScheduler::plain(100);
        assert!(scheduler.identity().is_none());
    }

    #[test]
    fn humanized_identity_is_fixed_for_the_session() {
        let scheduler = PacingScheduler::humanized();
        let identity = scheduler.identity().unwrap().clone();
        assert!(USER_AGENTS.contains(&identity.user_agent));
        assert!(VIEWPORTS.contains(&identity.viewport));
        // Repeated reads observe the same choice.
        assert_eq!(
            scheduler.identity().unwrap().user_agent,
            identity.user_agent
        );
    }

    #[tokio::test]
    async fn plain_zero_delay_returns_immediately() {
        let mut scheduler = PacingScheduler::plain(0);
        scheduler.pause(PaceContext::Browsing).await;
    }
}
