// src/core/protocol/mod.rs

//! The wire protocol layer: identifier normalization, typed inbound events,
//! and the frame decoder.

pub mod decoder;
pub mod event;

pub use decoder::Decoder;
pub use event::{InboundEvent, Rank, Speaker};

/// The room every frame belongs to when it does not name one.
pub const DEFAULT_ROOM: &str = "lobby";

/// Normalizes a display name into a user identifier: lowercased and filtered
/// to ASCII alphanumerics. Rank markers and decorations fall away.
pub fn to_user_id(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Normalizes a room name into a room identifier. Rooms additionally allow
/// `-` so that subroom identifiers survive.
pub fn to_room_id(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}
