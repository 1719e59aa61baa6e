//! # Controller Library
//!
//! An autonomous player for the runner game. The game connects to this
//! server over a WebSocket, streams state snapshots and status events, and
//! receives `{"action": "jump" | "crouch"}` replies.
//!
//! ## Module Organization
//!
//! ### Policy Module (`policy`)
//! Picks the obstacle closest to the player and answers with the posture that
//! avoids it once it is within reacting distance. Also counts how many
//! obstacles were passed during the current game.
//!
//! ### Server Module (`server`)
//! Accepts game connections and runs the policy against each of them. After a
//! game over it waits for the configured delay and sends a jump, which the
//! game treats as a restart.

pub mod policy;
pub mod server;
