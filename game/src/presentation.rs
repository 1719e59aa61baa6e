//! Signals for whatever draws the game. The core only emits them.

use crate::obstacles::{Obstacle, ObstacleId};
use log::{debug, info, trace};
use shared::Posture;

pub trait Presenter {
    fn show_game_over(&mut self, score: u64);
    fn hide_game_over(&mut self);
    fn update_score(&mut self, score: u64);
    fn obstacle_spawned(&mut self, obstacle: &Obstacle);
    fn obstacle_removed(&mut self, obstacle: &Obstacle);
    fn posture_changed(&mut self, posture: Posture);
}

/// Headless presenter that reports every signal through the log.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn show_game_over(&mut self, score: u64) {
        info!("GAME OVER - score {}", score);
    }

    fn hide_game_over(&mut self) {
        debug!("Game over screen hidden");
    }

    fn update_score(&mut self, score: u64) {
        trace!("Score: {}", score);
        if score > 0 && score % 1000 == 0 {
            info!("Score reached {}", score);
        }
    }

    fn obstacle_spawned(&mut self, obstacle: &Obstacle) {
        debug!(
            "Obstacle {:?} ({:?}) entered at {:.1}",
            obstacle.id, obstacle.kind, obstacle.position
        );
    }

    fn obstacle_removed(&mut self, obstacle: &Obstacle) {
        trace!("Obstacle {:?} removed", obstacle.id);
    }

    fn posture_changed(&mut self, posture: Posture) {
        debug!("Player is now {:?}", posture);
    }
}

/// One emitted presentation signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    ShowGameOver(u64),
    HideGameOver,
    Score(u64),
    Spawned(ObstacleId),
    Removed(ObstacleId),
    Posture(Posture),
}

/// Presenter that keeps every signal it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub signals: Vec<Signal>,
}

impl RecordingPresenter {
    pub fn count(&self, pred: impl Fn(&Signal) -> bool) -> usize {
        self.signals.iter().filter(|s| pred(s)).count()
    }

    pub fn clear(&mut self) {
        self.signals.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn show_game_over(&mut self, score: u64) {
        self.signals.push(Signal::ShowGameOver(score));
    }

    fn hide_game_over(&mut self) {
        self.signals.push(Signal::HideGameOver);
    }

    fn update_score(&mut self, score: u64) {
        self.signals.push(Signal::Score(score));
    }

    fn obstacle_spawned(&mut self, obstacle: &Obstacle) {
        self.signals.push(Signal::Spawned(obstacle.id));
    }

    fn obstacle_removed(&mut self, obstacle: &Obstacle) {
        self.signals.push(Signal::Removed(obstacle.id));
    }

    fn posture_changed(&mut self, posture: Posture) {
        self.signals.push(Signal::Posture(posture));
    }
}
