use async_trait::async_trait;
use blowpipe::client::OutboundHandle;
use blowpipe::config::{Config, HealthConfig, StoreConfig};
use blowpipe::core::dispatch::{
    Command, CommandContext, CommandRegistry, Dispatcher, Reply, Services,
};
use blowpipe::core::protocol::{Decoder, InboundEvent, Speaker};
use blowpipe::core::store::StoreClient;
use std::sync::Arc;
use tokio::sync::mpsc;

fn test_config() -> Config {
    Config {
        endpoint: "ws://127.0.0.1:8000/chat/websocket".to_string(),
        username: "Blowpipe".to_string(),
        password: Some("hunter2".to_string()),
        avatar: None,
        rooms: vec!["lobby".to_string()],
        private_rooms: vec![],
        command_prefix: '!',
        administrators: vec!["ann".to_string()],
        reconnect_delay_ms: 15000,
        throttle_interval_ms: 300,
        login_url: "https://login.example/action.php".to_string(),
        store: StoreConfig {
            url: "http://127.0.0.1:9/store".to_string(),
            secret: String::new(),
        },
        health: HealthConfig::default(),
        log_level: "info".to_string(),
    }
}

fn setup(registry: CommandRegistry) -> (Dispatcher, mpsc::UnboundedReceiver<String>) {
    let config = Arc::new(test_config());
    let (tx, rx) = mpsc::unbounded_channel();
    let outbound = OutboundHandle::new(tx);
    let store = Arc::new(StoreClient::new(&config, reqwest::Client::new()));
    let services = Services {
        config,
        store,
        outbound,
    };
    (Dispatcher::new(Arc::new(registry), services), rx)
}

/// Replies with its argument string, so tests can observe extraction.
struct EchoArgs;

#[async_trait]
impl Command for EchoArgs {
    fn name(&self) -> &'static str {
        "hello"
    }

    async fn execute(&self, ctx: CommandContext) -> Option<Reply> {
        Some(Reply::text(format!("args=[{}]", ctx.args)))
    }
}

/// Applies the usual in-room voice gate.
struct Gated;

#[async_trait]
impl Command for Gated {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn execute(&self, ctx: CommandContext) -> Option<Reply> {
        ctx.voice_gate()?;
        Some(Reply::text("through"))
    }
}

struct Whisperer;

#[async_trait]
impl Command for Whisperer {
    fn name(&self) -> &'static str {
        "whisper"
    }

    async fn execute(&self, _ctx: CommandContext) -> Option<Reply> {
        Some(Reply::private("psst"))
    }
}

struct Panicker;

#[async_trait]
impl Command for Panicker {
    fn name(&self) -> &'static str {
        "panic"
    }

    async fn execute(&self, _ctx: CommandContext) -> Option<Reply> {
        panic!("handler bug");
    }
}

fn full_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(EchoArgs));
    registry.register(Arc::new(Gated));
    registry.register(Arc::new(Whisperer));
    registry.register(Arc::new(Panicker));
    registry.alias("hi", "hello");
    registry
}

#[tokio::test]
async fn test_room_command_reply_is_broadcast_to_originating_room() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_chat(Speaker::new("+Bob"), "lobby".to_string(), "!hello".to_string())
        .await;
    assert_eq!(rx.try_recv().unwrap(), "lobby|args=[]");
}

#[tokio::test]
async fn test_argument_extraction_trims_remainder() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_chat(
            Speaker::new("+Bob"),
            "lobby".to_string(),
            "!HeLLo   foo bar ".to_string(),
        )
        .await;
    assert_eq!(rx.try_recv().unwrap(), "lobby|args=[foo bar]");
}

#[tokio::test]
async fn test_decoded_frame_flows_into_dispatch() {
    let (dispatcher, mut rx) = setup(full_registry());
    let decoder = Decoder::new("Blowpipe");
    for event in decoder.decode("lobby\nroom|c:|1700000000|+Bob|!hello") {
        if let InboundEvent::ChatLine {
            room,
            speaker,
            text,
        } = event
        {
            dispatcher.handle_chat(speaker, room, text).await;
        }
    }
    assert_eq!(rx.try_recv().unwrap(), "lobby|args=[]");
}

#[tokio::test]
async fn test_unknown_command_in_room_is_silent() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_chat(
            Speaker::new("+Bob"),
            "lobby".to_string(),
            "!unknowncmd foo".to_string(),
        )
        .await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_unknown_command_in_private_is_rejected() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_private(Speaker::new("+Bob"), "!unknowncmd foo".to_string())
        .await;
    assert_eq!(rx.try_recv().unwrap(), "|/w +Bob, Invalid command");
}

#[tokio::test]
async fn test_non_command_private_message_gets_fallback() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_private(Speaker::new("+Bob"), "hey, are you real?".to_string())
        .await;
    assert_eq!(rx.try_recv().unwrap(), "|/w +Bob, I'm a bot");
}

#[tokio::test]
async fn test_non_command_room_chat_is_ignored() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_chat(
            Speaker::new("+Bob"),
            "lobby".to_string(),
            "just chatting".to_string(),
        )
        .await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_private_invocation_replies_privately() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_private(Speaker::new("+Bob"), "!hello".to_string())
        .await;
    assert_eq!(rx.try_recv().unwrap(), "|/w +Bob, args=[]");
}

#[tokio::test]
async fn test_force_private_reply_from_room_context() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_chat(
            Speaker::new("+Bob"),
            "lobby".to_string(),
            "!whisper".to_string(),
        )
        .await;
    assert_eq!(rx.try_recv().unwrap(), "|/w +Bob, psst");
}

#[tokio::test]
async fn test_voice_gate_blocks_unranked_room_speaker() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_chat(Speaker::new("Bob"), "lobby".to_string(), "!gated".to_string())
        .await;
    assert!(rx.try_recv().is_err());

    dispatcher
        .handle_chat(
            Speaker::new("+Bob"),
            "lobby".to_string(),
            "!gated".to_string(),
        )
        .await;
    assert_eq!(rx.try_recv().unwrap(), "lobby|through");
}

#[tokio::test]
async fn test_voice_gate_passes_private_invocations() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_private(Speaker::new("Bob"), "!gated".to_string())
        .await;
    assert_eq!(rx.try_recv().unwrap(), "|/w Bob, through");
}

#[tokio::test]
async fn test_alias_invocation() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_chat(
            Speaker::new("+Bob"),
            "lobby".to_string(),
            "!hi there".to_string(),
        )
        .await;
    assert_eq!(rx.try_recv().unwrap(), "lobby|args=[there]");
}

#[tokio::test]
async fn test_panicking_handler_is_isolated() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_chat(
            Speaker::new("+Bob"),
            "lobby".to_string(),
            "!panic".to_string(),
        )
        .await;
    assert!(rx.try_recv().is_err());

    // The dispatcher keeps working after the panic.
    dispatcher
        .handle_chat(Speaker::new("+Bob"), "lobby".to_string(), "!hello".to_string())
        .await;
    assert_eq!(rx.try_recv().unwrap(), "lobby|args=[]");
}

#[tokio::test]
async fn test_disabled_command_behaves_as_unknown() {
    let mut registry = CommandRegistry::new();
    registry.register_disabled(Arc::new(EchoArgs));
    let (dispatcher, mut rx) = setup(registry);

    dispatcher
        .handle_chat(Speaker::new("+Bob"), "lobby".to_string(), "!hello".to_string())
        .await;
    assert!(rx.try_recv().is_err());

    dispatcher
        .handle_private(Speaker::new("+Bob"), "!hello".to_string())
        .await;
    assert_eq!(rx.try_recv().unwrap(), "|/w +Bob, Invalid command");
}

#[tokio::test]
async fn test_bare_prefix_in_private_is_rejected() {
    let (dispatcher, mut rx) = setup(full_registry());
    dispatcher
        .handle_private(Speaker::new("+Bob"), "!".to_string())
        .await;
    assert_eq!(rx.try_recv().unwrap(), "|/w +Bob, Invalid command");
}
