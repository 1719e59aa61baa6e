//! Player posture with timed auto-revert.

use crate::scheduler::{Scheduler, TimerId};
use crate::session::Tick;
use shared::Posture;

#[derive(Debug, Default)]
pub struct Player {
    posture: Posture,
    /// Pending stand-up timer. At most one exists at any time.
    revert: Option<TimerId>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posture(&self) -> Posture {
        self.posture
    }

    pub fn revert_timer(&self) -> Option<TimerId> {
        self.revert
    }

    /// Switches to `posture` for `duration` ms.
    ///
    /// Ignored while already in that posture: the running timer is neither
    /// restarted nor duplicated. Switching between jumping and crouching
    /// replaces the pending revert. Returns true if the posture changed.
    pub fn enter(
        &mut self,
        posture: Posture,
        scheduler: &mut Scheduler<Tick>,
        duration: u64,
    ) -> bool {
        if posture == Posture::Standing || self.posture == posture {
            return false;
        }
        if let Some(previous) = self.revert.take() {
            scheduler.cancel(previous);
        }
        self.posture = posture;
        self.revert = Some(scheduler.schedule_once(Tick::PostureRevert, duration));
        true
    }

    /// Handles a fired revert timer. Returns true if the player stood up.
    pub fn on_revert(&mut self, timer: TimerId) -> bool {
        if self.revert != Some(timer) {
            return false;
        }
        self.revert = None;
        self.posture = Posture::Standing;
        true
    }
}
