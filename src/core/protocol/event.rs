// src/core/protocol/event.rs

//! Typed inbound events and the speaker identity model.

use crate::core::protocol::to_user_id;

/// The ordered set of rank marker characters, lowest rank first.
pub const RANK_MARKERS: [char; 8] = ['+', '*', '%', '@', '\u{2605}', '#', '&', '~'];

/// A speaker identifier as it appears on the wire: an optional rank marker
/// character followed by the display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    raw: String,
}

impl Speaker {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The identifier exactly as received, rank marker included. This is the
    /// form the server accepts as a private-message target.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The display name with any rank marker stripped.
    pub fn display_name(&self) -> &str {
        match self.raw.chars().next() {
            Some(c) if RANK_MARKERS.contains(&c) => &self.raw[c.len_utf8()..],
            _ => &self.raw,
        }
    }

    /// The normalized user identifier.
    pub fn user_id(&self) -> String {
        to_user_id(&self.raw)
    }

    /// The rank derived from the leading marker character.
    pub fn rank(&self) -> Rank {
        self.raw.chars().next().map_or(Rank::Regular, Rank::from_marker)
    }

    /// Whether the speaker holds at least voice-equivalent rank.
    pub fn has_voice(&self) -> bool {
        self.rank() >= Rank::Voice
    }
}

/// Permission level of a speaker, derived per-event from the identifier's
/// first character. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank {
    Regular,
    Voice,
    Bot,
    Driver,
    Moderator,
    Host,
    RoomOwner,
    Leader,
    Administrator,
}

impl Rank {
    pub fn from_marker(marker: char) -> Self {
        match marker {
            '+' => Rank::Voice,
            '*' => Rank::Bot,
            '%' => Rank::Driver,
            '@' => Rank::Moderator,
            '\u{2605}' => Rank::Host,
            '#' => Rank::RoomOwner,
            '&' => Rank::Leader,
            '~' => Rank::Administrator,
            _ => Rank::Regular,
        }
    }
}

/// A decoded inbound event, scoped to the room the frame named.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// The server's login challenge string.
    HandshakeChallenge(String),
    /// The server confirmed which identity this session holds.
    IdentityConfirmed(String),
    /// The initial user roster of a room.
    RoomRosterUpdate { room: String, users: Vec<String> },
    UserJoined { room: String, speaker: Speaker },
    UserLeft { room: String, speaker: Speaker },
    ChatLine {
        room: String,
        speaker: Speaker,
        text: String,
    },
    PrivateMessage { speaker: Speaker, text: String },
    /// The answer to a `/cmd` style query.
    QueryResponse { kind: String, payload: String },
}
