//! Game state and core simulation types
//!
//! The bookkeeping the game loop owns. Entities live on the scene.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::drops_expected;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start tap
    Idle,
    /// Drops are spawning or falling
    Running,
    /// Level cleared, waiting out the "get ready" delay
    LevelTransition,
    /// A drop was missed
    GameOver,
}

/// Score, level and drop counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub level: u32,
    pub score: u64,
    pub drops_collected: u32,
    /// Countdown label for the next spawn
    pub drop_number: u32,
    pub in_progress: bool,
    /// Next start skips the score/level reset
    pub is_continue: bool,
    pub phase: GamePhase,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            level: 1,
            score: 0,
            drops_collected: 0,
            drop_number: 0,
            in_progress: false,
            is_continue: false,
            phase: GamePhase::Idle,
        }
    }

    /// Drops the current level expects
    pub fn drops_expected(&self) -> u32 {
        drops_expected(self.level)
    }

    /// Every drop of the level has been caught
    pub fn level_cleared(&self) -> bool {
        self.drops_collected == self.drops_expected()
    }
}

/// Things the presentation layer reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted { level: u32, score: u64, continued: bool },
    DropSpawned { id: u32, x: f32, drop_number: u32 },
    /// A catch; `pos` is where the chomp text goes
    Chomp { id: u32, pos: Vec2 },
    ScoreChanged(u64),
    LevelChanged(u32),
    LevelCleared { level: u32 },
    GameOver { level: u32, score: u64 },
    /// A leftover drop popped after game over
    DropPurged { id: u32 },
    ContinueUsed { remaining: u32 },
    ContinuesChanged(u32),
    RewardedAdRequested,
    /// Mute audio and hide distractions while an ad shows
    SuspendDistractions,
    ResumeDistractions,
}
