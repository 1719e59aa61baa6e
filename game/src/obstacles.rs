//! Obstacle arena: creation, per-obstacle movement timers, and cleanup.
//!
//! Every live obstacle owns exactly one repeating movement timer. The timer
//! handle lives next to the obstacle so removing an obstacle and cancelling
//! its timer always happen together, and [`ObstacleManager::cancel_all`]
//! sweeps the whole arena in one call.

use crate::scheduler::{Scheduler, TimerId};
use crate::session::Tick;
use log::trace;
use rand::Rng;
use shared::ObstacleKind;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    /// Offset of the obstacle's right edge from the field's right edge.
    pub position: f32,
    pub timer: TimerId,
}

/// Result of one movement tick.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Moved { position: f32 },
    /// Left the field; the obstacle and its timer are gone.
    Exited(Obstacle),
    /// No such obstacle (already removed).
    Missing,
}

/// Type draw for the opening triad: three outcomes, only one of them flying.
pub fn draw_triad_kind<R: Rng + ?Sized>(rng: &mut R) -> ObstacleKind {
    match rng.gen_range(0..3) {
        1 => ObstacleKind::Flying,
        _ => ObstacleKind::Normal,
    }
}

/// Type draw for periodic spawns: normal and flying equally likely.
pub fn draw_single_kind<R: Rng + ?Sized>(rng: &mut R) -> ObstacleKind {
    if rng.gen_bool(0.5) {
        ObstacleKind::Flying
    } else {
        ObstacleKind::Normal
    }
}

/// Right-edge offset that centres an obstacle on `fraction` of the field width.
pub fn triad_position(fraction: f32, field_width: f32, obstacle_width: f32) -> f32 {
    field_width * fraction - obstacle_width / 2.0
}

#[derive(Debug, Default)]
pub struct ObstacleManager {
    obstacles: BTreeMap<ObstacleId, Obstacle>,
    next_id: u64,
}

impl ObstacleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an obstacle and starts its movement timer.
    pub fn insert(
        &mut self,
        kind: ObstacleKind,
        position: f32,
        scheduler: &mut Scheduler<Tick>,
        move_period: u64,
    ) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        let timer = scheduler.schedule_repeating(Tick::Move(id), move_period);
        trace!("Obstacle {:?} ({:?}) created at {:.1}", id, kind, position);
        self.obstacles.insert(
            id,
            Obstacle {
                id,
                kind,
                position,
                timer,
            },
        );
        id
    }

    /// Creates the opening triad at fixed fractions of the field width.
    pub fn spawn_batch<R: Rng + ?Sized>(
        &mut self,
        fractions: &[f32; 3],
        field_width: f32,
        obstacle_width: f32,
        rng: &mut R,
        scheduler: &mut Scheduler<Tick>,
        move_period: u64,
    ) -> Vec<ObstacleId> {
        let mut ids = Vec::with_capacity(fractions.len());
        for fraction in fractions {
            let kind = draw_triad_kind(&mut *rng);
            let position = triad_position(*fraction, field_width, obstacle_width);
            ids.push(self.insert(kind, position, &mut *scheduler, move_period));
        }
        ids
    }

    /// Creates a single obstacle at the field's entry edge.
    pub fn spawn_one<R: Rng + ?Sized>(
        &mut self,
        entry_offset: f32,
        rng: &mut R,
        scheduler: &mut Scheduler<Tick>,
        move_period: u64,
    ) -> ObstacleId {
        let kind = draw_single_kind(rng);
        self.insert(kind, entry_offset, scheduler, move_period)
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(&id)
    }

    /// Live obstacles in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.values()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Moves an obstacle `speed` units towards the left edge. Once past
    /// `field_width` it is removed and its timer cancelled.
    pub fn advance(
        &mut self,
        id: ObstacleId,
        speed: f32,
        field_width: f32,
        scheduler: &mut Scheduler<Tick>,
    ) -> MoveOutcome {
        let Some(obstacle) = self.obstacles.get_mut(&id) else {
            return MoveOutcome::Missing;
        };
        obstacle.position += speed;
        let position = obstacle.position;
        if position > field_width {
            return match self.remove(id, scheduler) {
                Some(obstacle) => MoveOutcome::Exited(obstacle),
                None => MoveOutcome::Missing,
            };
        }
        MoveOutcome::Moved { position }
    }

    pub fn remove(&mut self, id: ObstacleId, scheduler: &mut Scheduler<Tick>) -> Option<Obstacle> {
        let obstacle = self.obstacles.remove(&id)?;
        scheduler.cancel(obstacle.timer);
        Some(obstacle)
    }

    /// Removes every obstacle and cancels every movement timer.
    pub fn cancel_all(&mut self, scheduler: &mut Scheduler<Tick>) -> Vec<Obstacle> {
        let removed: Vec<Obstacle> = std::mem::take(&mut self.obstacles).into_values().collect();
        for obstacle in &removed {
            scheduler.cancel(obstacle.timer);
        }
        removed
    }
}
