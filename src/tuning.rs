//! Data-driven game balance
//!
//! Defaults mirror `crate::consts`. A JSON file can override any subset of
//! fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading a tuning file
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning value: {0}")]
    Invalid(String),
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub min_drop_interval: f32,
    pub max_drop_interval: f32,
    pub drop_fall_duration: f32,
    pub level_advance_delay: f32,
    pub purge_initial_delay: f32,
    pub purge_stagger: f32,
    pub reset_speed: f32,
    pub max_number_of_continues: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_drop_interval: MIN_DROP_INTERVAL,
            max_drop_interval: MAX_DROP_INTERVAL,
            drop_fall_duration: DROP_FALL_DURATION,
            level_advance_delay: LEVEL_ADVANCE_DELAY,
            purge_initial_delay: PURGE_INITIAL_DELAY,
            purge_stagger: PURGE_STAGGER,
            reset_speed: RESET_SPEED,
            max_number_of_continues: MAX_NUMBER_OF_CONTINUES,
        }
    }
}

impl Tuning {
    /// Parse from a JSON string and validate
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the game loop cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.min_drop_interval <= 0.0 {
            return Err(TuningError::Invalid(
                "min_drop_interval must be positive".into(),
            ));
        }
        if self.min_drop_interval > self.max_drop_interval {
            return Err(TuningError::Invalid(format!(
                "min_drop_interval {} exceeds max_drop_interval {}",
                self.min_drop_interval, self.max_drop_interval
            )));
        }
        let durations = [
            ("drop_fall_duration", self.drop_fall_duration),
            ("level_advance_delay", self.level_advance_delay),
            ("reset_speed", self.reset_speed),
        ];
        for (name, value) in durations {
            if value <= 0.0 {
                return Err(TuningError::Invalid(format!("{name} must be positive")));
            }
        }
        if self.purge_initial_delay < 0.0 || self.purge_stagger < 0.0 {
            return Err(TuningError::Invalid("purge delays must not be negative".into()));
        }
        Ok(())
    }
}
