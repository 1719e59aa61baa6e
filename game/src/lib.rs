//! # Runner Game Library
//!
//! This library contains the real-time core of a single-player runner: the
//! player jumps over floor obstacles and crouches under flying ones while the
//! score climbs. The game can be played by a human or driven by an external
//! controller connected over a WebSocket.
//!
//! ## Architecture Overview
//!
//! The core is synchronous and single-threaded. It never reads the wall clock;
//! instead every periodic behaviour is a timer on a virtual millisecond clock
//! owned by the game. A runtime driver maps real time onto that clock and
//! feeds in network frames and key presses between timer deadlines.
//!
//! ### Timers
//! While a session runs, three repeating timers drive it: the score tick, the
//! state broadcast and the obstacle spawn. Every obstacle additionally owns its
//! own movement timer, and a jump or crouch schedules a one-shot revert. Game
//! over cancels the session timers and every movement timer.
//!
//! ### Collision
//! Each movement tick tests the obstacle's hitbox against the player's
//! current hitbox before moving it. Hitboxes come from a [`geometry::Geometry`]
//! so the layout can be replaced without touching the simulation.
//!
//! ### Synchronization
//! A JSON snapshot of the player and obstacle positions goes out on every
//! broadcast tick, plus one-shot `restart` and `game_over` status events.
//! Inbound `{"action": ...}` frames are applied exactly like key presses.
//!
//! ## Module Organization
//!
//! ### Scheduler Module (`scheduler`)
//! Virtual clock with repeating and one-shot timers.
//!
//! ### Session Module (`session`)
//! The state machine (`Idle` -> `Running` -> `GameOver`) and the [`Game`]
//! orchestrator that owns every other component.
//!
//! ### Obstacles and Collision (`obstacles`, `collision`, `geometry`)
//! Obstacle arena with per-obstacle timers, the hit test and the layout.
//!
//! ### Sync Module (`sync`)
//! Outbound snapshots and status events, inbound actions, over any
//! [`sync::Transport`].
//!
//! ### Network Module (`network`)
//! tokio driver binding the core to a WebSocket connection and stdin.
//!
//! ## Usage Example
//!
//! ```rust
//! use game::config::GameConfig;
//! use game::presentation::LogPresenter;
//! use game::session::{Game, Phase};
//! use game::sync::MemoryTransport;
//!
//! let mut game = Game::new(GameConfig::default(), MemoryTransport::open(), LogPresenter);
//! game.start();
//! game.advance_by(100);
//! assert_eq!(game.phase(), Phase::Running);
//! assert_eq!(game.score(), 10);
//! ```

pub mod collision;
pub mod config;
pub mod geometry;
pub mod input;
pub mod network;
pub mod obstacles;
pub mod player;
pub mod presentation;
pub mod scheduler;
pub mod session;
pub mod sync;

pub use session::Game;
