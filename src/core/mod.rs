// src/core/mod.rs

//! The central module containing the core logic and data structures of blowpipe.

pub mod commands;
pub mod dispatch;
pub mod errors;
pub mod protocol;
pub mod store;

pub use errors::BlowpipeError;
pub use protocol::event::InboundEvent;
