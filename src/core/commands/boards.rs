// src/core/commands/boards.rs

//! Commands backed by the auxiliary store. These spawn their own store
//! request and deliver the result through the outbound handle, so the
//! event loop never waits on the store.

use crate::core::dispatch::{Command, CommandContext, CommandRegistry, Reply};
use crate::core::protocol::to_user_id;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Current tournament standings, with tie-aware placement.
struct Leaderboard;

#[async_trait]
impl Command for Leaderboard {
    fn name(&self) -> &'static str {
        "leaderboard"
    }

    async fn execute(&self, ctx: CommandContext) -> Option<Reply> {
        // Room broadcast only, and only for voiced speakers.
        let room = ctx.room.clone()?;
        if !ctx.speaker.has_voice() {
            return None;
        }

        let services = ctx.services.clone();
        tokio::spawn(async move {
            let Some(body) = services.store.request("getleaderboard", &[]).await else {
                return;
            };
            let text = match body.as_array() {
                Some(rows) if !rows.is_empty() => format_standings(rows),
                _ => "Nessun risultato trovato".to_string(),
            };
            services.outbound.send_room(&room, &text);
        });
        None
    }
}

/// Renders standings rows into one chat line. Equal scores share a
/// placement; the next distinct score skips past the tied block.
fn format_standings(rows: &[Value]) -> String {
    let mut position = 0usize;
    let mut ties = 0usize;
    let mut previous_score: Option<i64> = None;
    let mut parts = Vec::with_capacity(rows.len());

    for row in rows {
        let user = row.get("utente").and_then(Value::as_str).unwrap_or("?");
        let score = score_of(row);
        if previous_score.is_none_or(|prev| score < prev) {
            position += ties + 1;
            ties = 0;
        } else {
            ties += 1;
        }
        previous_score = Some(score);
        parts.push(format!("{position}. {user} ({score})"));
    }
    parts.join(" - ")
}

fn score_of(row: &Value) -> i64 {
    match row.get("punteggio") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// A member's profile card: display name, titles held, description.
/// Room broadcast only, and only for voiced speakers.
struct Profile;

#[async_trait]
impl Command for Profile {
    fn name(&self) -> &'static str {
        "profile"
    }

    async fn execute(&self, ctx: CommandContext) -> Option<Reply> {
        let room = ctx.room.clone()?;
        if !ctx.speaker.has_voice() {
            return None;
        }

        // Bare invocation shows the speaker's own profile.
        let target = if ctx.args.trim().is_empty() {
            ctx.speaker.user_id()
        } else {
            to_user_id(&ctx.args)
        };

        let services = ctx.services.clone();
        tokio::spawn(async move {
            let Some(body) = services
                .store
                .request("getprofile", &[("userid", target)])
                .await
            else {
                return;
            };
            services.outbound.send_room(&room, &format_profile(&body));
        });
        None
    }
}

/// Renders a profile row into one chat line: name, then each title with its
/// date range, then the description.
fn format_profile(body: &Value) -> String {
    let mut parts = vec![
        body.get("nome")
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_string(),
    ];
    if let Some(titles) = body.get("elitefour").and_then(Value::as_array) {
        for title in titles {
            let tier = title.get("tier").and_then(Value::as_str).unwrap_or("?");
            let since = title.get("data").and_then(Value::as_str).unwrap_or("?");
            let mut entry = format!("{tier} dal {since}");
            if let Some(until) = title.get("datafine").and_then(Value::as_str) {
                entry.push_str(&format!(" al {until}"));
            }
            parts.push(entry);
        }
    }
    if let Some(description) = body.get("descrizione").and_then(Value::as_str)
        && !description.trim().is_empty()
    {
        parts.push(description.trim().to_string());
    }
    parts.join(" - ")
}

/// Longest description `setprofile` accepts, in characters.
const PROFILE_DESCRIPTION_LIMIT: usize = 200;

/// Stores the speaker's own profile description.
struct SetProfile;

#[async_trait]
impl Command for SetProfile {
    fn name(&self) -> &'static str {
        "setprofile"
    }

    async fn execute(&self, ctx: CommandContext) -> Option<Reply> {
        ctx.voice_gate()?;

        if ctx.args.chars().count() > PROFILE_DESCRIPTION_LIMIT {
            return Some(Reply::text(format!(
                "Errore: lunghezza massima {PROFILE_DESCRIPTION_LIMIT} caratteri"
            )));
        }

        let services = ctx.services.clone();
        let user_id = ctx.speaker.user_id();
        let description = ctx.args.clone();
        tokio::spawn(async move {
            services
                .store
                .request(
                    "setprofile",
                    &[("userid", user_id), ("descrizione", description)],
                )
                .await;
        });
        Some(Reply::text("Salvato"))
    }
}

/// Current title holders per tier. Registered disabled: the command stays
/// in the table but behaves as unknown until switched back on.
struct Champions;

#[async_trait]
impl Command for Champions {
    fn name(&self) -> &'static str {
        "elitefour"
    }

    async fn execute(&self, ctx: CommandContext) -> Option<Reply> {
        ctx.voice_gate()?;

        let tier = to_user_id(&ctx.args);
        let services = ctx.services.clone();
        let room = ctx.room.clone();
        let speaker = ctx.speaker.clone();
        tokio::spawn(async move {
            let Some(body) = services
                .store
                .request("getelitefour", &[("tier", tier)])
                .await
            else {
                return;
            };
            let Some(rows) = body.as_array() else {
                return;
            };
            let text = match rows.len() {
                0 => return,
                1 => rows[0]
                    .get("utente")
                    .and_then(Value::as_str)
                    .unwrap_or("?")
                    .to_string(),
                _ => rows
                    .iter()
                    .map(|row| {
                        format!(
                            "{}: {}",
                            row.get("tier").and_then(Value::as_str).unwrap_or("?"),
                            row.get("utente").and_then(Value::as_str).unwrap_or("?"),
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" - "),
            };
            match room {
                Some(room) => services.outbound.send_room(&room, &text),
                None => services.outbound.send_private(speaker.raw(), &text),
            }
        });
        None
    }
}

/// The tier the champion shortcut queries when invoked bare.
pub fn champion_tier(args: &str) -> &str {
    let args = args.trim();
    if args.is_empty() { "ou" } else { args }
}

/// Title holder of the flagship tier: the champions board with the default
/// tier filled in. Ships disabled alongside it.
struct Champion {
    board: Arc<Champions>,
}

#[async_trait]
impl Command for Champion {
    fn name(&self) -> &'static str {
        "champion"
    }

    async fn execute(&self, mut ctx: CommandContext) -> Option<Reply> {
        ctx.args = champion_tier(&ctx.args).to_string();
        self.board.execute(ctx).await
    }
}

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(Leaderboard));
    registry.register(Arc::new(Profile));
    registry.register(Arc::new(SetProfile));

    let board = Arc::new(Champions);
    registry.register_disabled(board.clone());
    registry.register_disabled(Arc::new(Champion { board }));
    registry.alias("e4", "elitefour");
    registry.alias("elite4", "elitefour");
    registry.alias("super4", "elitefour");
    registry.alias("superquattro", "elitefour");
    registry.alias("campione", "champion");
}
