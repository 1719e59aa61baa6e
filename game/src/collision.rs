//! Player-versus-obstacle hit test.

use crate::geometry::Geometry;
use crate::obstacles::Obstacle;
use shared::{check_overlap, Posture};

/// True if `obstacle` currently overlaps the player in `posture`.
pub fn obstacle_hits_player(geometry: &dyn Geometry, posture: Posture, obstacle: &Obstacle) -> bool {
    let player = geometry.player_hitbox(posture);
    let hitbox = geometry.obstacle_hitbox(obstacle.kind, obstacle.position);
    check_overlap(&player, &hitbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FieldGeometry;
    use crate::obstacles::ObstacleManager;
    use crate::scheduler::Scheduler;
    use shared::{ObstacleKind, FIELD_WIDTH, OBSTACLE_WIDTH, PLAYER_LEFT, PLAYER_WIDTH};

    fn obstacle_at(kind: ObstacleKind, position: f32) -> Obstacle {
        let mut scheduler = Scheduler::new();
        let mut manager = ObstacleManager::new();
        let id = manager.insert(kind, position, &mut scheduler, 20);
        manager.get(id).cloned().unwrap()
    }

    #[test]
    fn test_far_obstacle_misses() {
        let geometry = FieldGeometry::default();
        let obstacle = obstacle_at(ObstacleKind::Normal, 0.0);
        assert!(!obstacle_hits_player(&geometry, Posture::Standing, &obstacle));
    }

    #[test]
    fn test_touching_edge_hits() {
        let geometry = FieldGeometry::default();
        // Obstacle's left edge lands exactly on the player's right edge.
        let position = FIELD_WIDTH - (PLAYER_LEFT + PLAYER_WIDTH) - OBSTACLE_WIDTH;
        let obstacle = obstacle_at(ObstacleKind::Normal, position);

        let player = geometry.player_hitbox(Posture::Standing);
        let hitbox = geometry.obstacle_hitbox(obstacle.kind, obstacle.position);
        assert_eq!(hitbox.left, player.right);
        assert!(obstacle_hits_player(&geometry, Posture::Standing, &obstacle));
    }

    #[test]
    fn test_passed_obstacle_misses() {
        let geometry = FieldGeometry::default();
        let obstacle = obstacle_at(ObstacleKind::Normal, FIELD_WIDTH - PLAYER_LEFT + 1.0);
        assert!(!obstacle_hits_player(&geometry, Posture::Standing, &obstacle));
    }

    #[test]
    fn test_posture_decides_outcome() {
        let geometry = FieldGeometry::default();
        let position = FIELD_WIDTH - PLAYER_LEFT - PLAYER_WIDTH;
        let normal = obstacle_at(ObstacleKind::Normal, position);
        let flying = obstacle_at(ObstacleKind::Flying, position);

        assert!(!obstacle_hits_player(&geometry, Posture::Jumping, &normal));
        assert!(obstacle_hits_player(&geometry, Posture::Crouching, &normal));
        assert!(!obstacle_hits_player(&geometry, Posture::Crouching, &flying));
        assert!(obstacle_hits_player(&geometry, Posture::Jumping, &flying));
    }
}
