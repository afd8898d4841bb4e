//! Level selection and the wave plan each level starts from.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Level chosen by the player when a run starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelSelection {
    /// Five short waves.
    One,
    /// Seven waves.
    Two,
    /// Ten waves.
    Three,
    /// Unbounded waves with their own escalation curve.
    Endless,
}

impl LevelSelection {
    /// Maps the external level number (`0` selects endless mode).
    pub fn from_number(number: u32) -> Result<Self, LevelError> {
        match number {
            0 => Ok(Self::Endless),
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(LevelError::Unknown(other)),
        }
    }

    /// External level number, `0` for endless mode.
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::Endless => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Whether waves continue forever.
    #[must_use]
    pub const fn is_endless(self) -> bool {
        matches!(self, Self::Endless)
    }

    /// Opening parameters of the first wave.
    #[must_use]
    pub const fn wave_plan(self) -> WavePlan {
        match self {
            Self::One => WavePlan {
                total_waves: Some(5),
                enemies_per_wave: 5,
                spawn_interval: Duration::from_millis(2000),
            },
            Self::Two => WavePlan {
                total_waves: Some(7),
                enemies_per_wave: 8,
                spawn_interval: Duration::from_millis(1500),
            },
            Self::Three => WavePlan {
                total_waves: Some(10),
                enemies_per_wave: 12,
                spawn_interval: Duration::from_millis(1200),
            },
            Self::Endless => WavePlan {
                total_waves: None,
                enemies_per_wave: 5,
                spawn_interval: Duration::from_millis(2000),
            },
        }
    }
}

impl TryFrom<u32> for LevelSelection {
    type Error = LevelError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        Self::from_number(number)
    }
}

/// Opening wave parameters of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavePlan {
    /// Waves to clear before the level completes; `None` when unbounded.
    pub total_waves: Option<u32>,
    /// Enemies produced by the first wave.
    pub enemies_per_wave: u32,
    /// Time between spawns during the first wave.
    pub spawn_interval: Duration,
}

/// Rejected level numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// No level carries the requested number.
    #[error("unknown level {0}; expected 1, 2, 3 or 0 for endless")]
    Unknown(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_numbers_map_to_selections() {
        assert_eq!(LevelSelection::from_number(0), Ok(LevelSelection::Endless));
        assert_eq!(LevelSelection::try_from(2), Ok(LevelSelection::Two));
        assert_eq!(LevelSelection::from_number(4), Err(LevelError::Unknown(4)));
        assert_eq!(LevelSelection::Three.number(), 3);
    }

    #[test]
    fn wave_plans_follow_level_tables() {
        let first = LevelSelection::One.wave_plan();
        assert_eq!(first.total_waves, Some(5));
        assert_eq!(first.enemies_per_wave, 5);

        let third = LevelSelection::Three.wave_plan();
        assert_eq!(third.total_waves, Some(10));
        assert_eq!(third.enemies_per_wave, 12);
        assert_eq!(third.spawn_interval, Duration::from_millis(1200));

        assert_eq!(LevelSelection::Endless.wave_plan().total_waves, None);
        assert!(LevelSelection::Endless.is_endless());
    }
}
