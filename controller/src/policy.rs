//! Reactive obstacle-avoidance policy.

use log::{debug, info};
use shared::protocol::{Action, ObstacleReport, StateSnapshot};
use shared::ObstacleKind;

/// Default distance (in field units) at which the policy starts reacting.
pub const DEFAULT_REACT_DISTANCE: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Action,
    /// The previously nearest obstacle has been passed since the last observation.
    pub avoided: bool,
}

#[derive(Debug, Clone)]
pub struct Policy {
    react_distance: f32,
    prev_nearest_right: Option<f32>,
    avoided: u64,
}

/// The closest obstacle that has not yet reached the player's right edge.
pub fn nearest_obstacle(snapshot: &StateSnapshot) -> Option<&ObstacleReport> {
    let player_right = snapshot.player_position.right;
    snapshot
        .obstacles
        .iter()
        .filter(|obstacle| obstacle.right < player_right)
        .max_by(|a, b| a.right.total_cmp(&b.right))
}

impl Policy {
    pub fn new(react_distance: f32) -> Self {
        Self {
            react_distance,
            prev_nearest_right: None,
            avoided: 0,
        }
    }

    pub fn avoided(&self) -> u64 {
        self.avoided
    }

    /// Forgets everything learned during the last game.
    pub fn reset(&mut self) {
        self.prev_nearest_right = None;
        self.avoided = 0;
    }

    pub fn observe(&mut self, snapshot: &StateSnapshot) -> Decision {
        let nearest = nearest_obstacle(snapshot);
        let nearest_right = nearest.map(|obstacle| obstacle.right);

        let avoided = match (self.prev_nearest_right, nearest_right) {
            (Some(prev), Some(current)) => current < prev,
            _ => false,
        };
        if avoided {
            self.avoided += 1;
            info!(
                "Obstacle avoided ({} this game, score {})",
                self.avoided, snapshot.score
            );
        }
        self.prev_nearest_right = nearest_right;

        let action = match nearest {
            Some(obstacle)
                if snapshot.player_position.right - obstacle.right <= self.react_distance =>
            {
                match obstacle.kind {
                    ObstacleKind::Normal => Action::Jump,
                    ObstacleKind::Flying => Action::Crouch,
                }
            }
            _ => Action::Nothing,
        };
        debug!(
            "Nearest obstacle {:?}, player {:?} -> {:?}",
            nearest, snapshot.player_position, action
        );

        Decision { action, avoided }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(DEFAULT_REACT_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::EdgeOffsets;

    fn snapshot(obstacles: &[(f32, ObstacleKind)]) -> StateSnapshot {
        StateSnapshot {
            player_position: EdgeOffsets {
                bottom: 0.0,
                right: 710.0,
            },
            obstacles: obstacles
                .iter()
                .map(|(right, kind)| ObstacleReport {
                    right: *right,
                    bottom: 0.0,
                    kind: *kind,
                })
                .collect(),
            score: 0,
        }
    }

    #[test]
    fn test_no_obstacles_does_nothing() {
        let mut policy = Policy::default();
        let decision = policy.observe(&snapshot(&[]));
        assert_eq!(decision.action, Action::Nothing);
        assert!(!decision.avoided);
    }

    #[test]
    fn test_far_obstacle_does_nothing() {
        let mut policy = Policy::default();
        let decision = policy.observe(&snapshot(&[(100.0, ObstacleKind::Normal)]));
        assert_eq!(decision.action, Action::Nothing);
    }

    #[test]
    fn test_close_obstacles_pick_matching_action() {
        let mut policy = Policy::default();
        let jump = policy.observe(&snapshot(&[(600.0, ObstacleKind::Normal)]));
        assert_eq!(jump.action, Action::Jump);

        let mut policy = Policy::default();
        let crouch = policy.observe(&snapshot(&[(600.0, ObstacleKind::Flying)]));
        assert_eq!(crouch.action, Action::Crouch);
    }

    #[test]
    fn test_nearest_ignores_passed_obstacles() {
        let snapshot = snapshot(&[
            (720.0, ObstacleKind::Flying),
            (300.0, ObstacleKind::Normal),
            (550.0, ObstacleKind::Normal),
        ]);
        let nearest = nearest_obstacle(&snapshot).unwrap();
        assert_eq!(nearest.right, 550.0);
    }

    #[test]
    fn test_avoided_when_nearest_offset_drops() {
        let mut policy = Policy::default();
        policy.observe(&snapshot(&[(600.0, ObstacleKind::Normal), (200.0, ObstacleKind::Normal)]));
        let moved = policy.observe(&snapshot(&[(680.0, ObstacleKind::Normal), (280.0, ObstacleKind::Normal)]));
        assert!(!moved.avoided);

        // The first obstacle went past the player; the next one is now nearest.
        let passed = policy.observe(&snapshot(&[(760.0, ObstacleKind::Normal), (360.0, ObstacleKind::Normal)]));
        assert!(passed.avoided);
        assert_eq!(policy.avoided(), 1);

        policy.reset();
        assert_eq!(policy.avoided(), 0);
        let fresh = policy.observe(&snapshot(&[(100.0, ObstacleKind::Normal)]));
        assert!(!fresh.avoided);
    }
}
