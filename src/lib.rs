// src/lib.rs

pub mod client;
pub mod config;
pub mod core;
pub mod health;

// Re-export
pub use crate::core::BlowpipeError;
