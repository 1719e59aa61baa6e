//! JSON messages exchanged between the game and an external controller.
//!
//! Game -> controller: [`StateSnapshot`] on the broadcast period and one-shot
//! [`StatusMessage`]s on restart and game over.
//! Controller -> game: [`ActionMessage`].

use crate::ObstacleKind;
use serde::{Deserialize, Serialize};

/// Offsets of a rectangle's bottom and right edges from the field's bottom and right edges.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct EdgeOffsets {
    pub bottom: f32,
    pub right: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ObstacleReport {
    pub right: f32,
    pub bottom: f32,
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub player_position: EdgeOffsets,
    pub obstacles: Vec<ObstacleReport>,
    pub score: u64,
}

/// A snapshot as assembled from the live game, before validation.
#[derive(Debug, Clone, Default)]
pub struct SnapshotDraft {
    pub player_position: Option<EdgeOffsets>,
    pub obstacles: Option<Vec<ObstacleReport>>,
    pub score: u64,
}

impl SnapshotDraft {
    /// Returns the sendable snapshot, or `None` when a required part is missing.
    pub fn validate(self) -> Option<StateSnapshot> {
        Some(StateSnapshot {
            player_position: self.player_position?,
            obstacles: self.obstacles?,
            score: self.score,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Restart,
    GameOver,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct StatusMessage {
    pub status: Status,
}

impl StatusMessage {
    pub fn new(status: Status) -> Self {
        Self { status }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Jump,
    Crouch,
    /// Sent by controllers that decided to do nothing; the game ignores it.
    Nothing,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ActionMessage {
    pub action: Action,
}

impl ActionMessage {
    pub fn new(action: Action) -> Self {
        Self { action }
    }
}

/// Anything the game sends, as seen by a controller.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum GameMessage {
    Status(StatusMessage),
    Snapshot(StateSnapshot),
}

/// Parses an inbound controller message.
///
/// Malformed JSON is an error. Well-formed JSON that is not an object with a
/// recognized `action` string (including `nothing`) yields `Ok(None)`.
pub fn parse_action(text: &str) -> Result<Option<Action>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let action = value
        .as_object()
        .and_then(|object| object.get("action"))
        .and_then(|action| Action::deserialize(action).ok())
        .filter(|action| *action != Action::Nothing);
    Ok(action)
}

pub fn parse_game_message(text: &str) -> Result<GameMessage, serde_json::Error> {
    serde_json::from_str(text)
}
