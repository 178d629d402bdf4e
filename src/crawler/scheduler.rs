//! Frontier bookkeeping for the crawl
//!
//! This module handles:
//! - The FIFO queue of `(url, depth)` pairs still to be fetched
//! - The visited set of canonical URLs
//! - The depth, page-cap and revisit checks made before each fetch
//! - Tracking in-flight fetches so workers know when the crawl is over
//!
//! The scheduler holds no locks of its own. The coordinator keeps it behind a
//! mutex shared by all fetch workers and never holds that mutex across an
//! `.await`.

use crate::url::canonicalize;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch, as discovered
    pub url: Url,

    /// Canonical string form, used as the visited-set and result key
    pub canonical: String,

    /// Link distance from the seed
    pub depth: u32,
}

/// What a worker should do next
#[derive(Debug, PartialEq, Eq)]
pub enum Claim {
    /// Fetch this URL; it is now marked visited and counted as in flight
    Fetch(QueuedUrl),

    /// The queue is empty but other fetches may still add links
    Wait,

    /// The queue is empty and nothing is in flight
    Done,
}

/// Why a queued URL was dropped without being fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DepthExceeded,
    PageLimit,
    AlreadyVisited,
}

/// Scheduler manages the frontier queue and the visited set
#[derive(Debug)]
pub struct Scheduler {
    /// Pending URLs in discovery order
    frontier: VecDeque<QueuedUrl>,

    /// Canonical URLs already claimed for fetching
    visited: HashSet<String>,

    /// Number of claimed fetches that have not completed yet
    in_flight: usize,

    /// Number of queued URLs dropped by the pre-fetch checks
    skipped: usize,

    max_depth: u32,
    max_pages: usize,
}

impl Scheduler {
    /// Creates a new scheduler with the crawl limits
    pub fn new(max_depth: u32, max_pages: usize) -> Self {
        Self {
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            in_flight: 0,
            skipped: 0,
            max_depth,
            max_pages,
        }
    }

    /// Queues `url` at `depth`
    ///
    /// The URL is kept as discovered, minus its fragment, so it is fetched
    /// and later resolves relative links exactly as the site spells it. Only
    /// the canonical form is used for deduplication.
    ///
    /// Returns false if the URL cannot be canonicalized or was already
    /// visited. Queued duplicates are tolerated; the visited check at claim
    /// time filters them.
    pub fn add_to_frontier(&mut self, url: &Url, depth: u32) -> bool {
        let canonical = match canonicalize(url) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("Not queueing {}: {}", url, e);
                return false;
            }
        };

        if self.visited.contains(&canonical) {
            return false;
        }

        let mut url = url.clone();
        url.set_fragment(None);

        self.frontier.push_back(QueuedUrl {
            url,
            canonical,
            depth,
        });
        true
    }

    /// Hands out the next URL to fetch
    ///
    /// A URL is dropped when its depth exceeds the maximum, when
    /// `pages_collected` already reached the page cap, or when it was
    /// visited. The cap is checked against pages collected so far, so fetches
    /// already in flight can push the final count past it.
    pub fn claim(&mut self, pages_collected: usize) -> Claim {
        while let Some(queued) = self.frontier.pop_front() {
            if let Some(reason) = self.skip_reason(&queued, pages_collected) {
                tracing::trace!("Skipping {} ({:?})", queued.canonical, reason);
                self.skipped += 1;
                continue;
            }

            self.visited.insert(queued.canonical.clone());
            self.in_flight += 1;
            return Claim::Fetch(queued);
        }

        if self.in_flight == 0 {
            Claim::Done
        } else {
            Claim::Wait
        }
    }

    /// Records that a claimed fetch finished, successfully or not
    pub fn complete(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn skip_reason(&self, queued: &QueuedUrl, pages_collected: usize) -> Option<SkipReason> {
        if queued.depth > self.max_depth {
            Some(SkipReason::DepthExceeded)
        } else if pages_collected >= self.max_pages {
            Some(SkipReason::PageLimit)
        } else if self.visited.contains(&queued.canonical) {
            Some(SkipReason::AlreadyVisited)
        } else {
            None
        }
    }

    /// Returns true if the canonical URL has been claimed
    #[cfg(test)]
    fn is_visited(&self, canonical: &str) -> bool {
        self.visited.contains(canonical)
    }

    #[cfg(test)]
    fn visited_count(&self) -> usize {
        self.visited.len()
    }

    #[cfg(test)]
    fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
