// src/client/roster.rs

//! Join and roster bookkeeping against the auxiliary store.
//!
//! All store traffic here is fire-and-forget: each handler spawns a task
//! whose results, if any, re-enter the serialized outbound path through the
//! `OutboundHandle`. Liveness is re-checked by the throttle, never assumed.

use crate::client::outbound::OutboundHandle;
use crate::config::Config;
use crate::core::protocol::Speaker;
use crate::core::store::StoreClient;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Pause between roster entries when syncing a freshly joined room, so the
/// store is not hammered with one request per user at once.
const ROSTER_SYNC_SPACING: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct RosterSync {
    config: Arc<Config>,
    store: Arc<StoreClient>,
    outbound: OutboundHandle,
}

impl RosterSync {
    pub fn new(config: Arc<Config>, store: Arc<StoreClient>, outbound: OutboundHandle) -> Self {
        Self {
            config,
            store,
            outbound,
        }
    }

    /// A user joined (or changed name in) a room.
    pub fn user_joined(&self, speaker: &Speaker) {
        let this = self.clone();
        let speaker = speaker.clone();
        tokio::spawn(async move {
            this.register_user(&speaker).await;
        });
    }

    /// A room sent its initial roster; register every user, staggered.
    pub fn roster_update(&self, users: Vec<String>) {
        let this = self.clone();
        tokio::spawn(async move {
            for user in users {
                this.register_user(&Speaker::new(user)).await;
                tokio::time::sleep(ROSTER_SYNC_SPACING).await;
            }
        });
    }

    /// Handles the answer to a `/cmd userdetails` query.
    pub fn query_response(&self, kind: &str, payload: &str) {
        if kind != "userdetails" {
            debug!("Ignoring query response of kind '{}'", kind);
            return;
        }
        let Ok(details) = serde_json::from_str::<Value>(payload) else {
            debug!("Dropping malformed userdetails payload");
            return;
        };
        let (Some(userid), Some(avatar)) = (
            details.get("userid").and_then(Value::as_str),
            details.get("avatar"),
        ) else {
            return;
        };
        let avatar = match avatar {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return,
        };
        let store = self.store.clone();
        let userid = userid.to_string();
        tokio::spawn(async move {
            store
                .request(
                    "setavatar",
                    &[("userid", userid), ("avatar", avatar)],
                )
                .await;
        });
    }

    async fn register_user(&self, speaker: &Speaker) {
        let user_id = speaker.user_id();
        if user_id.is_empty() {
            return;
        }

        let params = [
            ("userid", user_id.clone()),
            ("name", speaker.display_name().to_string()),
        ];
        if let Some(body) = self.store.request("adduser", &params).await
            && body.get("needs_avatar").and_then(Value::as_i64) == Some(1)
        {
            self.outbound
                .send_global(&format!("/cmd userdetails {}", speaker.raw()));
        }

        // Administrators get a reminder of any profiles awaiting approval.
        if self.config.is_administrator(&user_id)
            && let Some(body) = self
                .store
                .request("getunapprovedprofiles", &[("user", user_id)])
                .await
            && let Some(num) = body.get("num").and_then(Value::as_i64)
            && num > 0
        {
            self.outbound.send_private(
                speaker.raw(),
                &format!(
                    "There are {num} profiles awaiting approval. Use {}token to review them.",
                    self.config.command_prefix
                ),
            );
        }
    }
}
