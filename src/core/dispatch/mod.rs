// src/core/dispatch/mod.rs

//! Command dispatch: the registry of named handlers, alias resolution,
//! and the routing of handler replies back onto the wire.

mod command;
mod dispatcher;
mod registry;

pub use command::{Command, CommandContext, Reply, Services};
pub use dispatcher::Dispatcher;
pub use registry::{CommandEntry, CommandKind, CommandRegistry};
