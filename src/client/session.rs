// src/client/session.rs

//! The connection lifecycle state machine and the single event loop that
//! serializes inbound decoding, command dispatch, and throttled writes.

use crate::client::login;
use crate::client::outbound::OutboundHandle;
use crate::client::roster::RosterSync;
use crate::client::throttle::Throttle;
use crate::config::Config;
use crate::core::BlowpipeError;
use crate::core::dispatch::Dispatcher;
use crate::core::protocol::{Decoder, InboundEvent, to_user_id};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Lifecycle of the single connection slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Live,
    Reconnecting,
}

/// Events delivered back into the session loop by auxiliary tasks.
#[derive(Debug)]
pub enum ControlEvent {
    /// The login endpoint rejected our credentials. Not recoverable.
    FatalAuth(String),
}

/// Owns the connection slot, the throttle, and the receiving ends of the
/// outbound and control channels. All protocol logic runs on this one task.
pub struct SessionEngine {
    config: Arc<Config>,
    http: reqwest::Client,
    decoder: Decoder,
    dispatcher: Dispatcher,
    roster: RosterSync,
    outbound: OutboundHandle,
    outbound_rx: mpsc::UnboundedReceiver<String>,
    control_tx: mpsc::UnboundedSender<ControlEvent>,
    control_rx: mpsc::UnboundedReceiver<ControlEvent>,
    throttle: Throttle,
    state: ConnectionState,
}

impl SessionEngine {
    pub fn new(
        config: Arc<Config>,
        http: reqwest::Client,
        dispatcher: Dispatcher,
        roster: RosterSync,
        outbound: OutboundHandle,
        outbound_rx: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        Self {
            decoder: Decoder::new(&config.username),
            throttle: Throttle::new(config.throttle_interval()),
            config,
            http,
            dispatcher,
            roster,
            outbound,
            outbound_rx,
            control_tx,
            control_rx,
            state: ConnectionState::Disconnected,
        }
    }

    /// Connects and reconnects forever. Only a fatal error (authentication
    /// rejection) makes this return. The throttle queue lives here, outside
    /// the per-connection loop, so pending lines survive a reconnect.
    pub async fn run(&mut self) -> Result<(), BlowpipeError> {
        loop {
            self.state = ConnectionState::Connecting;
            info!("Connecting to {}", self.config.endpoint);

            match connect_async(self.config.endpoint.as_str()).await {
                Ok((socket, _)) => {
                    self.state = ConnectionState::Live;
                    info!("Connection established");
                    match self.drive(socket).await {
                        Ok(()) => info!("Connection closed by peer"),
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => warn!("Connection terminated: {}", e),
                    }
                }
                Err(e) => warn!("Failed to connect: {}", e),
            }

            self.state = ConnectionState::Reconnecting;
            info!(
                "Reconnecting in {} ms ({} outbound lines queued)",
                self.config.reconnect_delay_ms,
                self.throttle.len()
            );
            tokio::time::sleep(self.config.reconnect_delay()).await;
        }
    }

    /// The per-connection event loop. Inbound frames, throttle ticks,
    /// outbound enqueues, and control events all serialize here; no other
    /// task touches the socket.
    async fn drive(&mut self, socket: WsStream) -> Result<(), BlowpipeError> {
        let (mut sink, mut source): (WsSink, WsSource) = socket.split();

        let mut tick = tokio::time::interval(self.config.throttle_interval());
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                Some(event) = self.control_rx.recv() => {
                    match event {
                        ControlEvent::FatalAuth(reason) => {
                            return Err(BlowpipeError::AuthenticationFailed(reason));
                        }
                    }
                }

                message = source.next() => {
                    match message {
                        Some(Ok(Message::Text(frame))) => {
                            self.handle_frame(frame.as_str()).await;
                        }
                        Some(Ok(Message::Close(_))) | None => return Ok(()),
                        // Ping/pong is answered by the protocol layer;
                        // binary frames have no meaning here.
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e.into()),
                    }
                }

                Some(line) = self.outbound_rx.recv() => {
                    self.throttle.enqueue(line);
                    self.transmit_ready(&mut sink).await?;
                }

                _ = tick.tick() => {
                    self.transmit_ready(&mut sink).await?;
                }
            }
        }
    }

    /// Releases at most one line from the throttle onto the socket. A line
    /// that fails to transmit goes back to the head of the queue for the
    /// next connection.
    async fn transmit_ready(&mut self, sink: &mut WsSink) -> Result<(), BlowpipeError> {
        let Some(line) = self.throttle.release(Instant::now()) else {
            return Ok(());
        };
        debug!(">> {}", line);
        if let Err(e) = sink.send(Message::text(line.clone())).await {
            self.throttle.requeue_front(line);
            return Err(e.into());
        }
        Ok(())
    }

    async fn handle_frame(&self, raw: &str) {
        trace!("<< {}", raw);
        for event in self.decoder.decode(raw) {
            match event {
                InboundEvent::HandshakeChallenge(challenge) => {
                    info!("Received handshake challenge, logging in");
                    login::spawn_login(
                        self.http.clone(),
                        self.config.clone(),
                        self.outbound.clone(),
                        self.control_tx.clone(),
                        challenge,
                    );
                }
                InboundEvent::IdentityConfirmed(name) => {
                    if to_user_id(&name) != to_user_id(&self.config.username) {
                        continue;
                    }
                    info!("Identity confirmed as {}", name);
                    if let Some(avatar) = &self.config.avatar {
                        self.outbound.send_global(&format!("/avatar {avatar}"));
                    }
                    for room in self.config.all_rooms() {
                        self.outbound.send_global(&format!("/join {room}"));
                    }
                }
                InboundEvent::UserJoined { speaker, .. } => {
                    self.roster.user_joined(&speaker);
                }
                InboundEvent::UserLeft { room, speaker } => {
                    trace!("{} left {}", speaker.raw(), room);
                }
                InboundEvent::RoomRosterUpdate { room, users } => {
                    debug!("Roster for '{}': {} users", room, users.len());
                    self.roster.roster_update(users);
                }
                InboundEvent::ChatLine {
                    room,
                    speaker,
                    text,
                } => {
                    self.dispatcher.handle_chat(speaker, room, text).await;
                }
                InboundEvent::PrivateMessage { speaker, text } => {
                    self.dispatcher.handle_private(speaker, text).await;
                }
                InboundEvent::QueryResponse { kind, payload } => {
                    self.roster.query_response(&kind, &payload);
                }
            }
        }
    }

    /// The current lifecycle state, for observability.
    pub fn state(&self) -> ConnectionState {
        self.state
    }
}
