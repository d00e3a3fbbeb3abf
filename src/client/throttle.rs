// src/client/throttle.rs

//! The outbound throttle: a FIFO of pending lines released at most one per
//! interval, so the bot respects the server's flood-control policy.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Owns the FIFO of pending outbound lines. The queue is deliberately
/// unbounded: back-pressure on a chat bot would only trade memory for
/// dropped replies.
#[derive(Debug)]
pub struct Throttle {
    queue: VecDeque<String>,
    interval: Duration,
    last_release: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            interval,
            last_release: None,
        }
    }

    /// Appends a line to the tail of the FIFO.
    pub fn enqueue(&mut self, line: String) {
        self.queue.push_back(line);
    }

    /// Puts a line back at the head, for a transmission that failed before
    /// reaching the wire.
    pub fn requeue_front(&mut self, line: String) {
        self.queue.push_front(line);
    }

    /// Releases the head of the FIFO if the interval has elapsed since the
    /// previous release. At most one line per call; there is no burst
    /// catch-up after a long idle gap.
    pub fn release(&mut self, now: Instant) -> Option<String> {
        if self.queue.is_empty() {
            return None;
        }
        if let Some(last) = self.last_release
            && now.duration_since(last) < self.interval
        {
            return None;
        }
        self.last_release = Some(now);
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
