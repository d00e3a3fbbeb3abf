// src/core/protocol/decoder.rs

//! Splits raw frames into typed inbound events.
//!
//! Decoding is pure and deterministic. Unrecognized event tags produce no
//! events, and a recognized tag with too few fields drops the whole frame;
//! malformed input must never escalate into an error.

use crate::core::protocol::event::{InboundEvent, Speaker};
use crate::core::protocol::{DEFAULT_ROOM, to_room_id, to_user_id};

pub struct Decoder {
    /// The bot's own normalized identity, used to suppress echoes of its
    /// own chat lines at decode time.
    self_id: String,
}

impl Decoder {
    pub fn new(username: &str) -> Self {
        Self {
            self_id: to_user_id(username),
        }
    }

    /// Decodes one raw frame into zero or more events.
    pub fn decode(&self, raw: &str) -> Vec<InboundEvent> {
        if raw.is_empty() {
            return Vec::new();
        }

        let parts: Vec<&str> = raw.split('|').collect();

        // The first field carries the room identifier on its own first line.
        let room = {
            let first_line = parts[0].lines().next().unwrap_or("");
            let id = to_room_id(first_line);
            if id.is_empty() { DEFAULT_ROOM.to_string() } else { id }
        };

        let Some(tag) = parts.get(1) else {
            return Vec::new();
        };

        match *tag {
            "challstr" => {
                // The challenge may itself contain the delimiter.
                let Some(payload) = rejoin(&parts, 2) else {
                    return Vec::new();
                };
                vec![InboundEvent::HandshakeChallenge(payload)]
            }
            "updateuser" => {
                let Some(name) = parts.get(2) else {
                    return Vec::new();
                };
                vec![InboundEvent::IdentityConfirmed(name.trim().to_string())]
            }
            "j" | "J" | "n" | "N" => {
                // A name change carries the same side effects as a join.
                let Some(user) = parts.get(2) else {
                    return Vec::new();
                };
                vec![InboundEvent::UserJoined {
                    room,
                    speaker: Speaker::new(user.trim()),
                }]
            }
            "l" | "L" => {
                let Some(user) = parts.get(2) else {
                    return Vec::new();
                };
                vec![InboundEvent::UserLeft {
                    room,
                    speaker: Speaker::new(user.trim()),
                }]
            }
            "pm" => {
                let (Some(sender), Some(text)) = (parts.get(2), rejoin(&parts, 4)) else {
                    return Vec::new();
                };
                if to_user_id(sender) == self.self_id {
                    return Vec::new();
                }
                vec![InboundEvent::PrivateMessage {
                    speaker: Speaker::new(sender.trim()),
                    text: text.trim().to_string(),
                }]
            }
            "c" => {
                let (Some(sender), Some(text)) = (parts.get(2), rejoin(&parts, 3)) else {
                    return Vec::new();
                };
                if to_user_id(sender) == self.self_id {
                    return Vec::new();
                }
                vec![InboundEvent::ChatLine {
                    room,
                    speaker: Speaker::new(sender.trim()),
                    text: text.trim().to_string(),
                }]
            }
            "c:" => {
                // Timestamped chat: field 2 is the epoch timestamp, which the
                // bot has no use for.
                let (Some(sender), Some(text)) = (parts.get(3), rejoin(&parts, 4)) else {
                    return Vec::new();
                };
                if to_user_id(sender) == self.self_id {
                    return Vec::new();
                }
                vec![InboundEvent::ChatLine {
                    room,
                    speaker: Speaker::new(sender.trim()),
                    text: text.trim().to_string(),
                }]
            }
            "init" => {
                // Field 6 is "<count>,<user>,<user>,..."; the count is dropped.
                let Some(user_field) = parts.get(6) else {
                    return Vec::new();
                };
                let users: Vec<String> = user_field
                    .trim()
                    .split(',')
                    .skip(1)
                    .map(|u| u.to_string())
                    .collect();
                vec![InboundEvent::RoomRosterUpdate { room, users }]
            }
            "queryresponse" => {
                let (Some(kind), Some(payload)) = (parts.get(2), rejoin(&parts, 3)) else {
                    return Vec::new();
                };
                vec![InboundEvent::QueryResponse {
                    kind: kind.to_string(),
                    payload,
                }]
            }
            // Unknown tags are not an error.
            _ => Vec::new(),
        }
    }
}

/// Reconstructs a trailing payload that may legitimately contain the
/// delimiter. Returns `None` when the frame is too short.
fn rejoin(parts: &[&str], from: usize) -> Option<String> {
    if parts.len() <= from {
        return None;
    }
    Some(parts[from..].join("|"))
}
