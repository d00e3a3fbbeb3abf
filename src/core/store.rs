// src/core/store.rs

//! Client for the auxiliary HTTP data store (profiles, leaderboards, tokens).
//!
//! Every call degrades silently: a transport error, a non-200 status, or a
//! malformed body all collapse into `None`, and the affected feature simply
//! produces no reply.

use crate::config::Config;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    url: String,
    secret: String,
}

impl StoreClient {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            url: config.store.url.clone(),
            secret: config.store.secret.clone(),
        }
    }

    /// Base URL of the store, for building user-facing links.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs one request against the store. `action` selects the
    /// operation; `params` is a flat key-value set.
    pub async fn request(&self, action: &str, params: &[(&str, String)]) -> Option<Value> {
        let mut form: Vec<(&str, &str)> = vec![("action", action), ("secret", &self.secret)];
        form.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let response = match self.http.post(&self.url).form(&form).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("Store request '{}' failed: {}", action, e);
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(
                "Store request '{}' returned status {}",
                action,
                response.status()
            );
            return None;
        }
        match response.json::<Value>().await {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Store request '{}' returned malformed JSON: {}", action, e);
                None
            }
        }
    }
}
