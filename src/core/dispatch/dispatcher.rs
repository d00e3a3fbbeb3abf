// src/core/dispatch/dispatcher.rs

//! Consumes chat-grade events, extracts command invocations, and routes
//! replies to the room or to a private channel.

use crate::core::dispatch::command::{Command, CommandContext, Reply, Services};
use crate::core::dispatch::registry::CommandRegistry;
use crate::core::protocol::Speaker;
use std::sync::Arc;
use tracing::{debug, error};

/// The generic answer to a private message that is not a command.
const FALLBACK_PM_REPLY: &str = "I'm a bot";
/// The answer to an unknown command received as a private message.
const UNKNOWN_COMMAND_REPLY: &str = "Invalid command";

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    services: Services,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>, services: Services) -> Self {
        Self { registry, services }
    }

    /// Entry point for an in-room chat line.
    pub async fn handle_chat(&self, speaker: Speaker, room: String, text: String) {
        self.handle_line(speaker, Some(room), text).await;
    }

    /// Entry point for a private message.
    pub async fn handle_private(&self, speaker: Speaker, text: String) {
        self.handle_line(speaker, None, text).await;
    }

    async fn handle_line(&self, speaker: Speaker, room: Option<String>, text: String) {
        let prefix = self.services.config.command_prefix;
        if !text.starts_with(prefix) {
            // Plain chat is ignored in-room; in private it gets the fallback.
            if room.is_none() {
                self.services
                    .outbound
                    .send_private(speaker.raw(), FALLBACK_PM_REPLY);
            }
            return;
        }

        let body = &text[prefix.len_utf8()..];
        let (name_token, remainder) = body.split_once(' ').unwrap_or((body, ""));
        let name = name_token.to_lowercase();

        let Some(handler) = self.registry.resolve(&name) else {
            // Unknown command: silent in-room, explicit rejection in private.
            if room.is_none() {
                self.services
                    .outbound
                    .send_private(speaker.raw(), UNKNOWN_COMMAND_REPLY);
            } else {
                debug!("Ignoring unknown command '{}' in room context", name);
            }
            return;
        };

        let ctx = CommandContext {
            speaker: speaker.clone(),
            room: room.clone(),
            args: remainder.trim().to_string(),
            services: self.services.clone(),
        };

        let Some(reply) = self.invoke(handler, ctx).await else {
            return;
        };

        match (&room, reply.force_private) {
            (Some(room), false) => self.services.outbound.send_room(room, &reply.text),
            _ => self
                .services
                .outbound
                .send_private(speaker.raw(), &reply.text),
        }
    }

    /// Runs one handler in its own task so that a panicking command body
    /// cannot take down the inbound loop. The task is awaited immediately:
    /// handlers still run to completion before the next event is processed.
    async fn invoke(&self, handler: Arc<dyn Command>, ctx: CommandContext) -> Option<Reply> {
        let name = handler.name();
        match tokio::spawn(async move { handler.execute(ctx).await }).await {
            Ok(reply) => reply,
            Err(e) if e.is_panic() => {
                error!("Command '{}' panicked; suppressing reply", name);
                None
            }
            Err(e) => {
                error!("Command '{}' task failed: {}", name, e);
                None
            }
        }
    }
}
