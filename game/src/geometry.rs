//! Geometry capability: where the field, the player and the obstacles are.
//!
//! The simulation never measures anything itself; it asks a [`Geometry`]
//! for hitboxes so the layout can be swapped out (tests use custom layouts).

use shared::{
    ObstacleKind, Posture, Rect, CROUCH_HEIGHT, FIELD_HEIGHT, FIELD_WIDTH, FLYING_ALTITUDE,
    FLYING_HEIGHT, JUMP_ALTITUDE, OBSTACLE_HEIGHT, OBSTACLE_WIDTH, PLAYER_HEIGHT, PLAYER_LEFT,
    PLAYER_WIDTH,
};

pub trait Geometry {
    /// The field's bounds. Every other rectangle shares this coordinate frame.
    fn field(&self) -> Rect;

    fn field_width(&self) -> f32 {
        self.field().width()
    }

    fn player_hitbox(&self, posture: Posture) -> Rect;

    /// Hitbox of an obstacle of `kind` whose right edge sits `position` units
    /// left of the field's right edge.
    fn obstacle_hitbox(&self, kind: ObstacleKind, position: f32) -> Rect;

    fn obstacle_width(&self) -> f32;
}

/// Fixed side-scrolling layout: the player stands near the left edge,
/// obstacles enter from the right and travel left.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGeometry {
    pub width: f32,
    pub height: f32,
    pub player_left: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub crouch_height: f32,
    pub jump_altitude: f32,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub flying_altitude: f32,
    pub flying_height: f32,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            player_left: PLAYER_LEFT,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            crouch_height: CROUCH_HEIGHT,
            jump_altitude: JUMP_ALTITUDE,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            flying_altitude: FLYING_ALTITUDE,
            flying_height: FLYING_HEIGHT,
        }
    }
}

impl FieldGeometry {
    /// Rectangle standing `altitude` above the floor.
    fn above_floor(&self, left: f32, width: f32, altitude: f32, height: f32) -> Rect {
        let bottom = self.height - altitude;
        Rect::new(left, bottom - height, width, height)
    }
}

impl Geometry for FieldGeometry {
    fn field(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn player_hitbox(&self, posture: Posture) -> Rect {
        let (altitude, height) = match posture {
            Posture::Standing => (0.0, self.player_height),
            Posture::Jumping => (self.jump_altitude, self.player_height),
            Posture::Crouching => (0.0, self.crouch_height),
        };
        self.above_floor(self.player_left, self.player_width, altitude, height)
    }

    fn obstacle_hitbox(&self, kind: ObstacleKind, position: f32) -> Rect {
        let (altitude, height) = match kind {
            ObstacleKind::Normal => (0.0, self.obstacle_height),
            ObstacleKind::Flying => (self.flying_altitude, self.flying_height),
        };
        let left = self.width - position - self.obstacle_width;
        self.above_floor(left, self.obstacle_width, altitude, height)
    }

    fn obstacle_width(&self) -> f32 {
        self.obstacle_width
    }
}
