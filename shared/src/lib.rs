use serde::{Deserialize, Serialize};

pub mod protocol;

/// Score tick period in milliseconds.
pub const SCORE_PERIOD_MS: u64 = 10;
/// State snapshot broadcast period in milliseconds.
pub const BROADCAST_PERIOD_MS: u64 = 200;
/// Periodic single-obstacle spawn period in milliseconds.
pub const SPAWN_PERIOD_MS: u64 = 1800;
/// Per-obstacle movement tick period in milliseconds.
pub const MOVE_PERIOD_MS: u64 = 20;
/// How long a jump or crouch lasts before the player stands up again.
pub const POSTURE_DURATION_MS: u64 = 800;

/// Distance an obstacle travels per movement tick at score 0.
pub const BASE_SPEED: f32 = 8.0;
/// Every `SCORE_DIVISOR` points add one unit of speed per movement tick.
pub const SCORE_DIVISOR: f32 = 8000.0;

pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 200.0;

/// Player's left edge, measured from the field's left edge.
pub const PLAYER_LEFT: f32 = 50.0;
pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 60.0;
pub const CROUCH_HEIGHT: f32 = 30.0;
/// Height of the player's feet above the floor while jumping.
pub const JUMP_ALTITUDE: f32 = 70.0;

pub const OBSTACLE_WIDTH: f32 = 20.0;
pub const OBSTACLE_HEIGHT: f32 = 40.0;
/// Height of a flying obstacle's underside above the floor.
pub const FLYING_ALTITUDE: f32 = 45.0;
pub const FLYING_HEIGHT: f32 = 30.0;

/// Fractions of the field width (from the right edge) where the opening triad spawns.
pub const TRIAD_FRACTIONS: [f32; 3] = [0.1 / 6.0, 2.0 / 6.0, 4.0 / 6.0];

/// The player's avoidance stance.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    #[default]
    Standing,
    Jumping,
    Crouching,
}

/// Obstacle variants. Normal obstacles sit on the floor and must be jumped,
/// flying obstacles hang at head height and must be crouched under.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    #[default]
    Normal,
    Flying,
}

/// Axis-aligned rectangle in field coordinates: x grows to the right from the
/// field's left edge, y grows downwards from the field's top edge.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            bottom: top + height,
            left,
            right: left + width,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Distances from this rectangle's bottom and right edges to the matching
    /// edges of `container`.
    pub fn offsets_within(&self, container: &Rect) -> protocol::EdgeOffsets {
        protocol::EdgeOffsets {
            bottom: container.bottom - self.bottom,
            right: container.right - self.right,
        }
    }
}

/// Inclusive AABB overlap: rectangles that merely touch along an edge overlap.
pub fn check_overlap(a: &Rect, b: &Rect) -> bool {
    b.left <= a.right && b.right >= a.left && b.top <= a.bottom && b.bottom >= a.top
}

/// Per-tick obstacle displacement for a given score.
pub fn obstacle_speed(score: u64, base_speed: f32, score_divisor: f32) -> f32 {
    base_speed + score as f32 / score_divisor
}
