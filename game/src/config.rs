//! Tuning knobs for the simulation. Defaults come from the shared constants.

use shared::{
    BASE_SPEED, BROADCAST_PERIOD_MS, MOVE_PERIOD_MS, POSTURE_DURATION_MS, SCORE_DIVISOR,
    SCORE_PERIOD_MS, SPAWN_PERIOD_MS, TRIAD_FRACTIONS,
};

/// How obstacle speed scales with score: `base_speed + score / score_divisor`
/// per movement tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyCurve {
    pub base_speed: f32,
    pub score_divisor: f32,
}

impl DifficultyCurve {
    pub fn speed_at(&self, score: u64) -> f32 {
        shared::obstacle_speed(score, self.base_speed, self.score_divisor)
    }
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            score_divisor: SCORE_DIVISOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub score_period_ms: u64,
    pub broadcast_period_ms: u64,
    pub spawn_period_ms: u64,
    pub move_period_ms: u64,
    pub posture_duration_ms: u64,
    pub difficulty: DifficultyCurve,
    /// Opening obstacle positions as fractions of the field width.
    pub triad_fractions: [f32; 3],
    /// Position (offset from the right edge) given to periodically spawned obstacles.
    pub entry_offset: f32,
    /// Seed for obstacle type draws. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            score_period_ms: SCORE_PERIOD_MS,
            broadcast_period_ms: BROADCAST_PERIOD_MS,
            spawn_period_ms: SPAWN_PERIOD_MS,
            move_period_ms: MOVE_PERIOD_MS,
            posture_duration_ms: POSTURE_DURATION_MS,
            difficulty: DifficultyCurve::default(),
            triad_fractions: TRIAD_FRACTIONS,
            entry_offset: 0.0,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Ensures every period is non-zero so no timer can spin at a fixed instant.
    pub fn validate(&self) -> Result<(), String> {
        let periods = [
            ("score", self.score_period_ms),
            ("broadcast", self.broadcast_period_ms),
            ("spawn", self.spawn_period_ms),
            ("move", self.move_period_ms),
            ("posture", self.posture_duration_ms),
        ];
        for (name, period) in periods {
            if period == 0 {
                return Err(format!("{} period must be greater than zero", name));
            }
        }
        if self.difficulty.score_divisor <= 0.0 {
            return Err("score divisor must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.score_period_ms, 10);
        assert_eq!(config.broadcast_period_ms, 200);
        assert_eq!(config.spawn_period_ms, 1800);
        assert_eq!(config.move_period_ms, 20);
        assert_eq!(config.posture_duration_ms, 800);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_difficulty_curve() {
        let curve = DifficultyCurve::default();
        assert_approx_eq!(curve.speed_at(0), 8.0);
        assert_approx_eq!(curve.speed_at(4000), 8.5);
    }

    #[test]
    fn test_zero_period_rejected() {
        let config = GameConfig {
            move_period_ms: 0,
            ..GameConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("move"));
    }

    #[test]
    fn test_with_seed() {
        let config = GameConfig::default().with_seed(7);
        assert_eq!(config.seed, Some(7));
    }
}
