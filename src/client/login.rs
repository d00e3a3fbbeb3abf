// src/client/login.rs

//! The login handshake: exchange the server's challenge for an assertion
//! through the HTTP login endpoint, then claim the identity on the socket.

use crate::client::outbound::OutboundHandle;
use crate::client::session::ControlEvent;
use crate::config::Config;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Spawns the login exchange for one handshake challenge. Transport trouble
/// with the login endpoint is logged and abandoned (the next reconnect gets
/// a fresh challenge); a rejected assertion is fatal and reported through
/// the control channel.
pub fn spawn_login(
    http: reqwest::Client,
    config: Arc<Config>,
    outbound: OutboundHandle,
    control: mpsc::UnboundedSender<ControlEvent>,
    challenge: String,
) {
    tokio::spawn(async move {
        let form = [
            ("act", "login".to_string()),
            ("name", config.username.clone()),
            ("pass", config.password.clone().unwrap_or_default()),
            ("challstr", challenge),
        ];

        let response = match http.post(&config.login_url).form(&form).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Login request failed: {}", e);
                return;
            }
        };
        if !response.status().is_success() {
            warn!("Login endpoint returned status {}", response.status());
            return;
        }
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Failed to read login response: {}", e);
                return;
            }
        };

        match parse_assertion(&body) {
            Ok(assertion) => {
                outbound.send_global(&format!("/trn {},0,{}", config.username, assertion));
            }
            Err(reason) => {
                let _ = control.send(ControlEvent::FatalAuth(reason));
            }
        }
    });
}

/// Extracts the assertion from a login response body. The body is a `]`
/// sentinel followed by JSON; an assertion starting with `;` means the
/// server rejected the credentials.
pub fn parse_assertion(body: &str) -> Result<String, String> {
    let Some(json_part) = body.strip_prefix(']') else {
        return Err("login endpoint returned an unrecognized body".to_string());
    };
    let value: Value = serde_json::from_str(json_part)
        .map_err(|e| format!("malformed login response: {e}"))?;
    let assertion = value
        .get("assertion")
        .and_then(Value::as_str)
        .ok_or_else(|| "login response carried no assertion".to_string())?;
    if assertion.starts_with(';') {
        return Err("server rejected the login assertion".to_string());
    }
    Ok(assertion.to_string())
}
