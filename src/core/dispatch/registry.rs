// src/core/dispatch/registry.rs

//! The command table: a write-once mapping from lowercase command name to
//! a handler or an alias. Built during startup, shared immutably afterwards.

use crate::core::dispatch::command::Command;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Upper bound on alias indirection. An unresolved or cyclic chain fails
/// closed and is treated as an unknown command.
const MAX_ALIAS_HOPS: usize = 8;

/// What a command name maps to.
#[derive(Clone)]
pub enum CommandKind {
    Handler(Arc<dyn Command>),
    AliasOf(String),
}

/// One registry entry: a handler or alias, plus an enable flag. Disabling a
/// command makes it indistinguishable from an unknown one.
#[derive(Clone)]
pub struct CommandEntry {
    pub kind: CommandKind,
    pub enabled: bool,
}

#[derive(Default)]
pub struct CommandRegistry {
    entries: HashMap<String, CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its canonical name.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.insert(command, true);
    }

    /// Registers a handler that is present but switched off.
    pub fn register_disabled(&mut self, command: Arc<dyn Command>) {
        self.insert(command, false);
    }

    fn insert(&mut self, command: Arc<dyn Command>, enabled: bool) {
        let name = command.name().to_lowercase();
        if self
            .entries
            .insert(
                name.clone(),
                CommandEntry {
                    kind: CommandKind::Handler(command),
                    enabled,
                },
            )
            .is_some()
        {
            warn!("Command '{}' registered more than once", name);
        }
    }

    /// Registers `alias` as another name for `target`.
    pub fn alias(&mut self, alias: &str, target: &str) {
        self.entries.insert(
            alias.to_lowercase(),
            CommandEntry {
                kind: CommandKind::AliasOf(target.to_lowercase()),
                enabled: true,
            },
        );
    }

    /// Resolves a name to its handler, following alias indirection up to
    /// `MAX_ALIAS_HOPS` times. Returns `None` for unknown names, disabled
    /// entries, and chains that do not terminate in a handler.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Command>> {
        let mut current = name.to_lowercase();
        for _ in 0..MAX_ALIAS_HOPS {
            let entry = self.entries.get(&current)?;
            if !entry.enabled {
                return None;
            }
            match &entry.kind {
                CommandKind::Handler(handler) => return Some(handler.clone()),
                CommandKind::AliasOf(target) => current = target.clone(),
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
