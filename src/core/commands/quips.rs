// src/core/commands/quips.rs

//! Stateless string-response commands. In a room they require at least
//! voice rank; in private anyone may use them.

use crate::core::dispatch::{Command, CommandContext, CommandRegistry, Reply};
use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::Arc;

/// A fixed-text responder.
struct Quip {
    name: &'static str,
    text: &'static str,
}

#[async_trait]
impl Command for Quip {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn execute(&self, ctx: CommandContext) -> Option<Reply> {
        ctx.voice_gate()?;
        Some(Reply::text(self.text))
    }
}

/// Randomized typo apology.
struct Consecutio;

#[async_trait]
impl Command for Consecutio {
    fn name(&self) -> &'static str {
        "consecutio"
    }

    async fn execute(&self, ctx: CommandContext) -> Option<Reply> {
        ctx.voice_gate()?;
        let suffixes = ["", "s", "ss", "sss"];
        let suffix = suffixes[rand::thread_rng().gen_range(0..suffixes.len())];
        Some(Reply::text(format!(
            "opss{suffix} ho lasciato il pc acceso tutta notte"
        )))
    }
}

/// Shuffled-name responder.
struct Inflikted;

#[async_trait]
impl Command for Inflikted {
    fn name(&self) -> &'static str {
        "inflikted"
    }

    async fn execute(&self, ctx: CommandContext) -> Option<Reply> {
        ctx.voice_gate()?;
        let mut letters: Vec<char> = "INFLIKTED".chars().collect();
        letters.shuffle(&mut rand::thread_rng());
        Some(Reply::text(letters.into_iter().collect::<String>()))
    }
}

pub fn register(registry: &mut CommandRegistry) {
    let quips = [
        ("acher", "lo acher che bont\u{e0} \u{266b}"),
        ("aethernum", "da decidere"),
        ("alphawittem", "Italian luck jajaja"),
        ("duck", "quack"),
        ("edgummet", "soccontro"),
        ("francyy", "ei qualcuno ha qualche codice tcgo??? :3"),
        ("haund", "( \u{361}\u{b0} \u{35c}\u{296} \u{361}\u{b0})"),
        ("howkings", "Che si vinca o si perda, v0lca merda :3"),
    ];
    for (name, text) in quips {
        registry.register(Arc::new(Quip { name, text }));
    }

    registry.register(Arc::new(Consecutio));
    registry.register(Arc::new(Inflikted));

    registry.alias("aeth", "aethernum");
    registry.alias("eterno", "aethernum");
    registry.alias("alpha", "alphawittem");
    registry.alias("wittem", "alphawittem");
    registry.alias("cinse", "consecutio");
    registry.alias("cobse", "consecutio");
    registry.alias("conse", "consecutio");
    registry.alias("ed", "edgummet");
    registry.alias("francy", "francyy");
    registry.alias("infli", "inflikted");
}
