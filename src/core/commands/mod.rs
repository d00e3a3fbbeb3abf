// src/core/commands/mod.rs

//! All command bodies, and the one place they are registered. The registry
//! built here is handed to the dispatcher by reference and never mutated
//! again.

pub mod boards;
pub mod quips;
pub mod token;

use crate::core::dispatch::CommandRegistry;

/// Builds the complete command table. Called once at startup.
pub fn build_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    quips::register(&mut registry);
    boards::register(&mut registry);
    token::register(&mut registry);
    registry
}
