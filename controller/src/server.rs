//! WebSocket server the game connects to.

use crate::policy::Policy;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::protocol::{parse_game_message, Action, ActionMessage, GameMessage, Status};
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, Duration};
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Pause between a game over and the jump that restarts the game.
    pub restart_delay: Duration,
    pub react_distance: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            restart_delay: Duration::from_millis(5000),
            react_distance: crate::policy::DEFAULT_REACT_DISTANCE,
        }
    }
}

pub struct ControllerServer {
    listener: TcpListener,
    config: ControllerConfig,
}

impl ControllerServer {
    pub async fn bind(addr: &str, config: ControllerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts games forever, one task per connection.
    pub async fn run(self) -> io::Result<()> {
        info!("Controller listening on ws://{}", self.local_addr()?);
        loop {
            let (stream, peer) = self.listener.accept().await?;
            info!("Game connected from {}", peer);
            tokio::spawn(handle_connection(stream, self.config.clone()));
        }
    }
}

/// Plays one game connection until it closes.
pub async fn handle_connection(stream: TcpStream, config: ControllerConfig) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!("Failed to accept WebSocket: {}", e);
            return;
        }
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let mut policy = Policy::new(config.react_distance);

    while let Some(msg) = ws_receiver.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("Connection error: {}", e);
                break;
            }
        };

        let reply = match parse_game_message(&text) {
            Ok(GameMessage::Status(status)) => match status.status {
                Status::GameOver => {
                    info!(
                        "Game over after avoiding {} obstacles, restarting in {:?}",
                        policy.avoided(),
                        config.restart_delay
                    );
                    policy.reset();
                    sleep(config.restart_delay).await;
                    Some(Action::Jump)
                }
                Status::Restart => {
                    info!("Game restarted");
                    None
                }
            },
            Ok(GameMessage::Snapshot(snapshot)) => {
                let decision = policy.observe(&snapshot);
                match decision.action {
                    Action::Nothing => None,
                    action => Some(action),
                }
            }
            Err(e) => {
                debug!("Skipping unparseable frame: {}", e);
                None
            }
        };

        if let Some(action) = reply {
            let json = match serde_json::to_string(&ActionMessage::new(action)) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to encode action: {}", e);
                    continue;
                }
            };
            if let Err(e) = ws_sender.send(Message::Text(json)).await {
                warn!("Failed to send action: {}", e);
                break;
            }
        }
    }

    info!("Game disconnected");
}
