//! Data-driven game balance
//!
//! All physics and spawning constants flow through [`Tuning`] so a run can be
//! reconfigured from JSON without touching the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reasons a tuning table is rejected
#[derive(Debug)]
pub enum TuningError {
    /// JSON could not be parsed
    Parse(serde_json::Error),
    /// A field is NaN or infinite
    NotFinite(&'static str),
    /// A field that must be strictly positive is not
    NotPositive(&'static str),
    /// Jump impulse must point upward (negative)
    JumpNotUpward(f32),
    /// Obstacles would overlap each other at spawn time
    SpacingTooNarrow { spacing: f32, obstacle_width: f32 },
    /// A field is outside its allowed range
    OutOfRange(&'static str, f32),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "invalid tuning JSON: {}", e),
            TuningError::NotFinite(field) => write!(f, "{} must be finite", field),
            TuningError::NotPositive(field) => write!(f, "{} must be greater than zero", field),
            TuningError::JumpNotUpward(v) => {
                write!(f, "jump_impulse must be negative (upward), got {}", v)
            }
            TuningError::SpacingTooNarrow {
                spacing,
                obstacle_width,
            } => write!(
                f,
                "horizontal_spacing ({}) must exceed obstacle_width ({})",
                spacing, obstacle_width
            ),
            TuningError::OutOfRange(field, v) => write!(f, "{} is out of range: {}", field, v),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Physics and spawning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub jump_impulse: f32,
    pub speed: f32,
    pub horizontal_spacing: f32,
    pub obstacle_width: f32,
    pub avatar_size: f32,
    pub min_top_height: f32,
    pub avatar_x_fraction: f32,
    pub gap_divisor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            speed: OBSTACLE_SPEED,
            horizontal_spacing: HORIZONTAL_SPACING,
            obstacle_width: OBSTACLE_WIDTH,
            avatar_size: AVATAR_SIZE,
            min_top_height: MIN_TOP_HEIGHT,
            avatar_x_fraction: AVATAR_X_FRACTION,
            gap_divisor: GAP_DIVISOR,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table; missing fields use defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every field for values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let fields = [
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("speed", self.speed),
            ("horizontal_spacing", self.horizontal_spacing),
            ("obstacle_width", self.obstacle_width),
            ("avatar_size", self.avatar_size),
            ("min_top_height", self.min_top_height),
            ("avatar_x_fraction", self.avatar_x_fraction),
            ("gap_divisor", self.gap_divisor),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(TuningError::NotFinite(name));
            }
        }

        for (name, value) in [
            ("gravity", self.gravity),
            ("speed", self.speed),
            ("obstacle_width", self.obstacle_width),
            ("avatar_size", self.avatar_size),
        ] {
            if value <= 0.0 {
                return Err(TuningError::NotPositive(name));
            }
        }
        if self.min_top_height < 0.0 {
            return Err(TuningError::NotPositive("min_top_height"));
        }

        if self.jump_impulse >= 0.0 {
            return Err(TuningError::JumpNotUpward(self.jump_impulse));
        }

        if self.horizontal_spacing <= self.obstacle_width {
            return Err(TuningError::SpacingTooNarrow {
                spacing: self.horizontal_spacing,
                obstacle_width: self.obstacle_width,
            });
        }

        if self.avatar_x_fraction <= 0.0 || self.avatar_x_fraction >= 1.0 {
            return Err(TuningError::OutOfRange(
                "avatar_x_fraction",
                self.avatar_x_fraction,
            ));
        }
        if self.gap_divisor <= 1.0 {
            return Err(TuningError::OutOfRange("gap_divisor", self.gap_divisor));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.jump_impulse, -12.0);
        assert_eq!(tuning.horizontal_spacing, 400.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.75, "speed": 6.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.75);
        assert_eq!(tuning.speed, 6.0);
        assert_eq!(tuning.obstacle_width, OBSTACLE_WIDTH);
    }

    #[test]
    fn test_rejects_spacing_not_wider_than_obstacle() {
        let err = Tuning::from_json(r#"{ "horizontal_spacing": 80.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::SpacingTooNarrow { .. }));
    }

    #[test]
    fn test_rejects_downward_jump() {
        let tuning = Tuning {
            jump_impulse: 3.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::JumpNotUpward(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite() {
        let tuning = Tuning {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotFinite("gravity"))
        ));
    }

    #[test]
    fn test_rejects_gap_covering_viewport() {
        let tuning = Tuning {
            gap_divisor: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::OutOfRange("gap_divisor", _))
        ));
    }

    #[test]
    fn test_parse_error_is_wrapped() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("invalid tuning JSON"));
    }
}
