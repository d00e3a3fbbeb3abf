// src/core/dispatch/command.rs

//! The trait implemented by every command body, and the context it runs in.

use crate::client::outbound::OutboundHandle;
use crate::config::Config;
use crate::core::protocol::Speaker;
use crate::core::store::StoreClient;
use async_trait::async_trait;
use std::sync::Arc;

/// Shared collaborators handed to every command invocation.
#[derive(Clone)]
pub struct Services {
    pub config: Arc<Config>,
    pub store: Arc<StoreClient>,
    pub outbound: OutboundHandle,
}

/// Everything a handler needs to know about one invocation. Owned, so the
/// invocation can be moved into an isolating task.
#[derive(Clone)]
pub struct CommandContext {
    pub speaker: Speaker,
    /// The originating room, or `None` for a private-message context.
    pub room: Option<String>,
    /// The trimmed argument string following the command name.
    pub args: String,
    pub services: Services,
}

impl CommandContext {
    /// The voice gate most room commands apply: in a room, the speaker must
    /// hold at least voice rank. Private invocations always pass.
    pub fn voice_gate(&self) -> Option<()> {
        if self.room.is_some() && !self.speaker.has_voice() {
            None
        } else {
            Some(())
        }
    }

    pub fn is_administrator(&self) -> bool {
        self.services
            .config
            .is_administrator(&self.speaker.user_id())
    }
}

/// A handler's reply, to be routed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Force private routing even for a room-originated invocation.
    pub force_private: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            force_private: false,
        }
    }

    pub fn private(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            force_private: true,
        }
    }
}

/// A command body. Implementations are stateless; anything long-running is
/// expected to spawn its own task and deliver results through
/// `ctx.services.outbound` rather than holding up the event loop.
#[async_trait]
pub trait Command: Send + Sync {
    /// The canonical lowercase name the command is registered under.
    fn name(&self) -> &'static str;

    /// Executes the command. `None` produces no outbound traffic.
    async fn execute(&self, ctx: CommandContext) -> Option<Reply>;
}
