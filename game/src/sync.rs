//! Sync protocol endpoint: outbound snapshots and status events, inbound actions.
//!
//! Sends are fire-and-forget. Nothing is queued while the channel is closed,
//! nothing is retried after a failure, and no failure escapes this module.

use log::{debug, error, info, trace, warn};
use serde::Serialize;
use shared::protocol::{parse_action, Action, SnapshotDraft, Status, StatusMessage};
use std::error::Error;

/// Text channel to the external controller.
pub trait Transport {
    fn is_open(&self) -> bool;
    fn send(&mut self, text: String) -> Result<(), Box<dyn Error>>;
}

/// In-memory transport that records every sent frame.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    pub open: bool,
    pub sent: Vec<String>,
}

impl MemoryTransport {
    pub fn open() -> Self {
        Self {
            open: true,
            sent: Vec::new(),
        }
    }

    pub fn closed() -> Self {
        Self::default()
    }

    /// Removes and returns everything sent so far.
    pub fn take_sent(&mut self) -> Vec<String> {
        std::mem::take(&mut self.sent)
    }
}

impl Transport for MemoryTransport {
    fn is_open(&self) -> bool {
        self.open
    }

    fn send(&mut self, text: String) -> Result<(), Box<dyn Error>> {
        self.sent.push(text);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub sent: u64,
    pub skipped_closed: u64,
    pub dropped_malformed: u64,
    pub send_failures: u64,
    pub ignored_inbound: u64,
}

pub struct SyncEndpoint<T> {
    transport: T,
    stats: SyncStats,
}

impl<T: Transport> SyncEndpoint<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            stats: SyncStats::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Serializes and sends `message`. Returns true if it was handed to the transport.
    pub fn send<M: Serialize>(&mut self, message: &M) -> bool {
        if !self.transport.is_open() {
            trace!("Channel not open, skipping send");
            self.stats.skipped_closed += 1;
            return false;
        }
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to encode outbound message: {}", e);
                self.stats.send_failures += 1;
                return false;
            }
        };
        match self.transport.send(text) {
            Ok(()) => {
                self.stats.sent += 1;
                true
            }
            Err(e) => {
                error!("Failed to send message: {}", e);
                self.stats.send_failures += 1;
                false
            }
        }
    }

    /// Sends a snapshot if it is complete; incomplete drafts are dropped.
    pub fn send_snapshot(&mut self, draft: SnapshotDraft) -> bool {
        match draft.validate() {
            Some(snapshot) => self.send(&snapshot),
            None => {
                debug!("Dropping incomplete state snapshot");
                self.stats.dropped_malformed += 1;
                false
            }
        }
    }

    pub fn send_status(&mut self, status: Status) -> bool {
        self.send(&StatusMessage::new(status))
    }

    /// Decodes an inbound frame into a recognized action.
    pub fn on_message(&mut self, text: &str) -> Option<Action> {
        match parse_action(text) {
            Ok(Some(action)) => Some(action),
            Ok(None) => {
                trace!("Ignoring inbound message without a recognized action: {}", text);
                self.stats.ignored_inbound += 1;
                None
            }
            Err(e) => {
                debug!("Ignoring unparseable inbound message: {}", e);
                self.stats.ignored_inbound += 1;
                None
            }
        }
    }

    pub fn on_open(&mut self) {
        info!("Connection to controller established");
    }

    pub fn on_error(&mut self, err: &str) {
        error!("Controller connection error: {}", err);
    }

    pub fn on_close(&mut self) {
        warn!("Controller connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::{EdgeOffsets, ObstacleReport};
    use shared::ObstacleKind;

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn is_open(&self) -> bool {
            true
        }

        fn send(&mut self, _text: String) -> Result<(), Box<dyn Error>> {
            Err("socket gone".into())
        }
    }

    fn complete_draft() -> SnapshotDraft {
        SnapshotDraft {
            player_position: Some(EdgeOffsets {
                bottom: 0.0,
                right: 710.0,
            }),
            obstacles: Some(vec![ObstacleReport {
                right: 12.0,
                bottom: 0.0,
                kind: ObstacleKind::Normal,
            }]),
            score: 9,
        }
    }

    #[test]
    fn test_status_sent_when_open() {
        let mut endpoint = SyncEndpoint::new(MemoryTransport::open());
        assert!(endpoint.send_status(Status::GameOver));
        assert_eq!(endpoint.transport().sent, vec![r#"{"status":"game_over"}"#]);
        assert_eq!(endpoint.stats().sent, 1);
    }

    #[test]
    fn test_send_skipped_when_closed() {
        let mut endpoint = SyncEndpoint::new(MemoryTransport::closed());
        assert!(!endpoint.send_status(Status::Restart));
        assert!(!endpoint.send_snapshot(complete_draft()));
        assert!(endpoint.transport().sent.is_empty());
        assert_eq!(endpoint.stats().skipped_closed, 2);

        // Nothing was queued for later delivery.
        endpoint.transport_mut().open = true;
        assert!(endpoint.transport().sent.is_empty());
    }

    #[test]
    fn test_complete_snapshot_sent() {
        let mut endpoint = SyncEndpoint::new(MemoryTransport::open());
        assert!(endpoint.send_snapshot(complete_draft()));

        let sent = endpoint.transport_mut().take_sent();
        assert_eq!(sent.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(value["score"], 9);
        assert_eq!(value["playerPosition"]["right"], 710.0);
        assert_eq!(value["obstacles"][0]["type"], "normal");
    }

    #[test]
    fn test_snapshot_without_player_position_dropped() {
        let mut endpoint = SyncEndpoint::new(MemoryTransport::open());
        let draft = SnapshotDraft {
            player_position: None,
            ..complete_draft()
        };
        assert!(!endpoint.send_snapshot(draft));
        assert!(endpoint.transport().sent.is_empty());
        assert_eq!(endpoint.stats().dropped_malformed, 1);
    }

    #[test]
    fn test_snapshot_without_obstacles_dropped() {
        let mut endpoint = SyncEndpoint::new(MemoryTransport::open());
        let draft = SnapshotDraft {
            obstacles: None,
            ..complete_draft()
        };
        assert!(!endpoint.send_snapshot(draft));
        assert!(endpoint.transport().sent.is_empty());
    }

    #[test]
    fn test_transport_failure_is_contained() {
        let mut endpoint = SyncEndpoint::new(FailingTransport);
        assert!(!endpoint.send_status(Status::Restart));
        assert_eq!(endpoint.stats().send_failures, 1);
    }

    #[test]
    fn test_inbound_actions() {
        let mut endpoint = SyncEndpoint::new(MemoryTransport::open());
        assert_eq!(endpoint.on_message(r#"{"action":"jump"}"#), Some(Action::Jump));
        assert_eq!(
            endpoint.on_message(r#"{"action":"crouch"}"#),
            Some(Action::Crouch)
        );
        assert_eq!(endpoint.on_message(r#"{"action":"nothing"}"#), None);
        assert_eq!(endpoint.on_message("garbage"), None);
        assert_eq!(endpoint.stats().ignored_inbound, 2);
    }
}
