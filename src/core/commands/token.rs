// src/core/commands/token.rs

//! Mints one-shot access tokens for the store's dashboard.

use crate::core::dispatch::{Command, CommandContext, CommandRegistry, Reply};
use async_trait::async_trait;
use rand::RngCore;
use std::sync::Arc;

struct Token;

#[async_trait]
impl Command for Token {
    fn name(&self) -> &'static str {
        "token"
    }

    async fn execute(&self, ctx: CommandContext) -> Option<Reply> {
        if !ctx.is_administrator() {
            return None;
        }

        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        // The store learns the token in the background; the reply does not
        // wait for the registration to land.
        let store = ctx.services.store.clone();
        let registered = token.clone();
        tokio::spawn(async move {
            store.request("newtoken", &[("token", registered)]).await;
        });

        let url = format!(
            "{}/dashboard.php?token={}",
            ctx.services.store.url().trim_end_matches('/'),
            token
        );
        Some(Reply::private(url))
    }
}

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(Token));
}
