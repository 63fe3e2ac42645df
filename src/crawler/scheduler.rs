//! Scheduler for managing the crawl frontier
//!
//! This module handles:
//! - The FIFO work queue of claimed URLs waiting for a worker
//! - Admission of discovered URLs (filename check, then claim)

use crate::state::Frontier;
use crate::url::final_segment_len;
use std::collections::VecDeque;
use url::Url;

/// A claimed URL waiting for a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch
    pub url: Url,
}

/// Outcome of offering a URL to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Newly claimed and queued
    Queued,

    /// Claimed earlier in this run; not queued again
    AlreadyClaimed,

    /// Final path segment exceeds the limit; never claimed
    FilenameTooLong {
        /// Length of the offending segment in characters
        length: usize,
    },
}

/// Scheduler owns the claim set and the queue of pending work
///
/// It is only ever touched by the orchestrator loop through `&mut self`, so
/// checking and claiming a URL cannot interleave with another claim.
#[derive(Debug)]
pub struct Scheduler {
    /// Every URL handed out this run
    frontier: Frontier,

    /// Claimed URLs not yet given to a worker
    queue: VecDeque<QueuedUrl>,

    /// Longest final path segment allowed
    max_filename_length: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `max_filename_length` - Longest final path segment, in characters
    pub fn new(max_filename_length: usize) -> Self {
        Self {
            frontier: Frontier::new(),
            queue: VecDeque::new(),
            max_filename_length,
        }
    }

    /// Offers a URL for crawling
    ///
    /// The filename check runs before the claim, so an over-long URL is never
    /// claimed and is reported again each time it is discovered.
    pub fn offer(&mut self, url: Url) -> Admission {
        let length = final_segment_len(&url);
        if length > self.max_filename_length {
            return Admission::FilenameTooLong { length };
        }

        if !self.frontier.try_claim(&url) {
            return Admission::AlreadyClaimed;
        }

        self.queue.push_back(QueuedUrl { url });
        Admission::Queued
    }

    /// Takes the oldest pending URL
    pub fn next_url(&mut self) -> Option<QueuedUrl> {
        self.queue.pop_front()
    }

    /// Returns the number of URLs waiting for a worker
    pub fn queue_size(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether no URL is waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of URLs claimed so far
    pub fn claimed_count(&self) -> usize {
        self.frontier.len()
    }

    /// Whether the URL was claimed earlier in this run
    pub fn is_claimed(&self, url: &Url) -> bool {
        self.frontier.is_claimed(url)
    }
}
