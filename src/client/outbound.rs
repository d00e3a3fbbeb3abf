// src/client/outbound.rs

//! The enqueue side of the outbound path. Formats protocol lines and hands
//! them to the session engine, which owns the throttle and the socket.

use tokio::sync::mpsc;
use tracing::debug;

/// A cheap, cloneable handle for emitting outbound lines. Lines are queued
/// through the session engine's throttle; nothing here writes to the socket.
#[derive(Debug, Clone)]
pub struct OutboundHandle {
    tx: mpsc::UnboundedSender<String>,
}

impl OutboundHandle {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Broadcasts `text` into `room`.
    pub fn send_room(&self, room: &str, text: &str) {
        self.send_raw(format!("{room}|{text}"));
    }

    /// Sends a room-less line, e.g. `/join` or the login assertion.
    pub fn send_global(&self, text: &str) {
        self.send_raw(format!("|{text}"));
    }

    /// Sends a private message to `target` (rank marker allowed).
    pub fn send_private(&self, target: &str, text: &str) {
        self.send_raw(format!("|/w {target}, {text}"));
    }

    /// Enqueues an already-formatted protocol line.
    pub fn send_raw(&self, line: String) {
        if self.tx.send(line).is_err() {
            // Only happens while the session engine is tearing down.
            debug!("Dropping outbound line: session engine is gone");
        }
    }
}
