//! Runtime driver: binds the synchronous game core to a WebSocket connection,
//! human input and the wall clock.
//!
//! The connection lives in its own tasks and talks to the driver through
//! channels. The driver owns the [`Game`] and is the only code that touches it.

use crate::input::Command;
use crate::presentation::Presenter;
use crate::session::Game;
use crate::sync::Transport;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info};
use std::error::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// What the connection tasks report to the driver.
#[derive(Debug)]
pub enum NetworkEvent {
    /// Connected; frames pushed into the sender go out on the socket.
    Opened(mpsc::UnboundedSender<String>),
    Message(String),
    Error(String),
    Closed,
}

/// [`Transport`] backed by the writer task of a WebSocket connection.
#[derive(Debug, Default)]
pub struct WsTransport {
    outbound: Option<mpsc::UnboundedSender<String>>,
}

impl WsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, outbound: mpsc::UnboundedSender<String>) {
        self.outbound = Some(outbound);
    }

    pub fn detach(&mut self) {
        self.outbound = None;
    }
}

impl Transport for WsTransport {
    fn is_open(&self) -> bool {
        self.outbound
            .as_ref()
            .map_or(false, |sender| !sender.is_closed())
    }

    fn send(&mut self, text: String) -> Result<(), Box<dyn Error>> {
        match &self.outbound {
            Some(sender) => sender.send(text).map_err(|e| e.to_string().into()),
            None => Err("not connected".into()),
        }
    }
}

/// Connects to `url` in the background and forwards everything that happens
/// on the connection to `events`. There is no reconnect.
pub fn spawn_connection(url: String, events: mpsc::UnboundedSender<NetworkEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Connecting to controller at {}", url);
        let ws_stream = match connect_async(url.as_str()).await {
            Ok((ws_stream, _)) => ws_stream,
            Err(e) => {
                let _ = events.send(NetworkEvent::Error(e.to_string()));
                let _ = events.send(NetworkEvent::Closed);
                return;
            }
        };
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();

        let writer = tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                if let Err(e) = ws_sender.send(Message::Text(text)).await {
                    error!("Failed to write to controller: {}", e);
                    break;
                }
            }
            let _ = ws_sender.close().await;
        });

        if events.send(NetworkEvent::Opened(outbound_tx)).is_err() {
            writer.abort();
            return;
        }

        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if events.send(NetworkEvent::Message(text)).is_err() {
                        break;
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    let _ = events.send(NetworkEvent::Error(e.to_string()));
                    break;
                }
            }
        }

        writer.abort();
        let _ = events.send(NetworkEvent::Closed);
    })
}

/// Owns the game and maps wall-clock time onto its virtual clock.
pub struct Runner<P: Presenter> {
    game: Game<WsTransport, P>,
    epoch: Instant,
}

impl<P: Presenter> Runner<P> {
    pub fn new(game: Game<WsTransport, P>) -> Self {
        Self {
            game,
            epoch: Instant::now(),
        }
    }

    pub fn game(&self) -> &Game<WsTransport, P> {
        &self.game
    }

    /// Milliseconds of virtual time corresponding to now.
    fn elapsed_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn catch_up(&mut self) {
        let now = self.elapsed_ms().max(self.game.now());
        self.game.advance_to(now);
    }

    fn deadline_instant(&mut self) -> Option<Instant> {
        self.game
            .next_deadline()
            .map(|due| self.epoch + Duration::from_millis(due))
    }

    fn on_network_event(&mut self, event: NetworkEvent) {
        match event {
            NetworkEvent::Opened(outbound) => {
                self.game.sync_mut().transport_mut().attach(outbound);
                self.game.sync_mut().on_open();
            }
            NetworkEvent::Message(text) => {
                debug!("Received: {}", text);
                self.game.handle_message(&text);
            }
            NetworkEvent::Error(err) => self.game.sync_mut().on_error(&err),
            NetworkEvent::Closed => {
                self.game.sync_mut().transport_mut().detach();
                self.game.sync_mut().on_close();
            }
        }
    }

    /// Connects to `url` and plays until Ctrl+C. Human commands arrive on `commands`.
    pub async fn run(
        &mut self,
        url: &str,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) -> Result<(), Box<dyn Error>> {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let connection = spawn_connection(url.to_string(), event_tx);
        let mut commands_open = true;

        self.epoch = Instant::now();
        self.game.start();

        loop {
            let deadline = self.deadline_instant();
            tokio::select! {
                Some(event) = event_rx.recv() => {
                    self.catch_up();
                    self.on_network_event(event);
                }
                command = commands.recv(), if commands_open => {
                    match command {
                        Some(command) => {
                            self.catch_up();
                            self.game.command(command);
                        }
                        None => commands_open = false,
                    }
                }
                _ = async {
                    match deadline {
                        Some(deadline) => sleep_until(deadline).await,
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    self.catch_up();
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received Ctrl+C, shutting down");
                    break;
                }
            }
        }

        connection.abort();
        let stats = self.game.stats();
        info!(
            "Played {} sessions, best score {}",
            stats.sessions_started, stats.best_score
        );
        Ok(())
    }
}
