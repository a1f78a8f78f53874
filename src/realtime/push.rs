use std::time::Duration;

use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tokio::time::{interval, sleep, timeout, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::events::{ClientSignal, PushEvent};
use crate::table::SeatId;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

const LOG_TARGET: &str = "realtime::push";

#[derive(Debug, Clone)]
pub struct PushChannelConfig {
    pub ws_url: Url,
    pub handshake_timeout: Duration,
    pub heartbeat_interval: Duration,
    pub reconnect_delay: Duration,
    pub broadcast_capacity: usize,
}

impl PushChannelConfig {
    pub fn new(ws_url: Url) -> Self {
        Self {
            ws_url,
            handshake_timeout: Duration::from_secs(10),
            heartbeat_interval: Duration::from_secs(15),
            reconnect_delay: Duration::from_secs(5),
            broadcast_capacity: 64,
        }
    }
}

/// The room this session subscribes to once the game id is known.
#[derive(Debug, Clone)]
pub struct RoomSubscription {
    pub game_id: String,
    pub player_id: Option<SeatId>,
    pub player_name: String,
}

/// Long-lived push-channel task: connects, joins the game room, pumps
/// inbound events into a broadcast channel, and reconnects with a delay
/// until cancelled. Messages are fanned out in arrival order.
pub struct PushChannelClient {
    cfg: PushChannelConfig,
    room: RoomSubscription,
    tx: broadcast::Sender<PushEvent>,
    stop: CancellationToken,
}

impl PushChannelClient {
    pub fn new(
        cfg: PushChannelConfig,
        room: RoomSubscription,
        stop: CancellationToken,
    ) -> (Self, broadcast::Receiver<PushEvent>) {
        let (tx, rx) = broadcast::channel(cfg.broadcast_capacity);
        (
            Self {
                cfg,
                room,
                tx,
                stop,
            },
            rx,
        )
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PushEvent> {
        self.tx.subscribe()
    }

    pub async fn run(self) -> Result<()> {
        info!(target = LOG_TARGET, url = %self.cfg.ws_url, game_id = %self.room.game_id, "starting push channel");
        while !self.stop.is_cancelled() {
            match self.connect().await {
                Ok(stream) => {
                    if let Err(err) = self.pump(stream).await {
                        warn!(target = LOG_TARGET, error = %err, "push stream ended with error");
                    }
                }
                Err(err) => {
                    warn!(target = LOG_TARGET, error = %err, "failed to connect push channel");
                }
            }

            if self.stop.is_cancelled() {
                break;
            }

            debug!(
                target = LOG_TARGET,
                delay_secs = self.cfg.reconnect_delay.as_secs_f32(),
                "waiting before reconnect attempt"
            );
            sleep(self.cfg.reconnect_delay).await;
        }

        info!(target = LOG_TARGET, "push channel stopped");
        Ok(())
    }

    async fn connect(&self) -> Result<WsStream> {
        let connect_fut = connect_async(self.cfg.ws_url.to_string());
        let (stream, _) = timeout(self.cfg.handshake_timeout, connect_fut)
            .await
            .context("push channel handshake timed out")?
            .context("push channel handshake failed")?;
        Ok(stream)
    }

    async fn pump(&self, stream: WsStream) -> Result<()> {
        let (mut sink, mut source) = stream.split();

        let join = encode_signal(&ClientSignal::JoinGameRoom {
            game_id: self.room.game_id.clone(),
            player_id: self.room.player_id,
            player_name: self.room.player_name.clone(),
        })?;
        sink.send(Message::Text(join))
            .await
            .context("failed to send join-room signal")?;

        let mut heartbeat = interval(self.cfg.heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.stop.cancelled() => {
                    debug!(target = LOG_TARGET, "shutdown signal received");
                    break;
                }
                _ = heartbeat.tick() => {
                    if let Err(err) = sink.send(Message::Ping(Vec::new())).await {
                        warn!(target = LOG_TARGET, error = %err, "heartbeat send failed, ending loop");
                        break;
                    }
                }
                msg = source.next() => {
                    match msg {
                        Some(Ok(Message::Text(txt))) => self.handle_text(&txt),
                        Some(Ok(Message::Ping(payload))) => {
                            sink.send(Message::Pong(payload)).await.ok();
                        }
                        Some(Ok(Message::Close(frame))) => {
                            debug!(target = LOG_TARGET, ?frame, "socket closed by server");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            warn!(target = LOG_TARGET, error = %err, "websocket error");
                            break;
                        }
                        None => {
                            debug!(target = LOG_TARGET, "websocket stream ended");
                            break;
                        }
                    }
                }
            }
        }

        self.send_leave(&mut sink).await.ok();
        let _ = sink.close().await;

        Ok(())
    }

    fn handle_text(&self, txt: &str) {
        match serde_json::from_str::<PushEvent>(txt) {
            Ok(event) => {
                debug!(target = LOG_TARGET, event = event.event_name(), "push event received");
                // Send failure only means no receiver is listening right now.
                let _ = self.tx.send(event);
            }
            Err(err) => {
                debug!(target = LOG_TARGET, error = %err, "ignoring unrecognized push frame");
            }
        }
    }

    async fn send_leave(
        &self,
        sink: &mut futures::stream::SplitSink<WsStream, Message>,
    ) -> Result<()> {
        let leave = encode_signal(&ClientSignal::LeaveGameRoom {
            game_id: self.room.game_id.clone(),
            player_name: self.room.player_name.clone(),
        })?;
        sink.send(Message::Text(leave))
            .await
            .context("failed to send leave-room signal")
    }
}

fn encode_signal(signal: &ClientSignal) -> Result<String> {
    serde_json::to_string(signal).context("failed to serialize push-channel signal")
}
