//! Gloop Drop - catch the falling gloop, miss one and it's over
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scheduler, entities, level model, game loop)
//! - `economy`: Free-continue counter on top of a persistence port
//! - `persistence`: Save data stores (memory, JSON file)
//! - `ads`: Rewarded-ad collaborator contract (message channel)
//! - `assets`: Animation frame catalog
//! - `ui`: HUD layout, hit testing and label text
//! - `platform`: Headless stand-ins for physics, ads and input
//! - `tuning`: Data-driven game balance

pub mod ads;
pub mod assets;
pub mod economy;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use economy::ContinueEconomy;
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the display link)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Scene dimensions (y axis points up, origin bottom-left)
    pub const SCENE_WIDTH: f32 = 1336.0;
    pub const SCENE_HEIGHT: f32 = 1024.0;
    /// Top edge of the foreground strip the player walks on
    pub const FLOOR_Y: f32 = 176.0;

    /// Fastest spawn interval (seconds between drops)
    pub const MIN_DROP_INTERVAL: f32 = 0.12;
    /// Slowest spawn interval
    pub const MAX_DROP_INTERVAL: f32 = 1.0;
    /// Time a drop takes to reach the floor. Constant across levels.
    pub const DROP_FALL_DURATION: f32 = 1.0;
    /// Drops start this many player-heights up
    pub const DROP_START_FACTOR: f32 = 2.5;

    /// Pause between clearing a level and the next spawn loop
    pub const LEVEL_ADVANCE_DELAY: f32 = 2.25;
    /// Delay before the first leftover drop pops after game over
    pub const PURGE_INITIAL_DELAY: f32 = 1.0;
    /// Extra delay per leftover drop (cascade)
    pub const PURGE_STAGGER: f32 = 0.15;
    /// Divisor for the post-game-over glide back to center
    pub const RESET_SPEED: f32 = 1.5;

    /// Highest continue count the badge shows before switching to "max"
    pub const MAX_NUMBER_OF_CONTINUES: u32 = 6;
    /// Free continues on a fresh save
    pub const DEFAULT_FREE_CONTINUES: u32 = 1;

    /// Player walk cycle frame time
    pub const WALK_FRAME_TIME: f32 = 0.15;
    /// Player die cycle frame time
    pub const DIE_FRAME_TIME: f32 = 0.25;
}

/// Axis-aligned rectangle in scene space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn mid_x(&self) -> f32 {
        (self.min.x + self.max.x) / 2.0
    }
}

/// Scene bounds used for placement
pub fn scene_rect() -> Rect {
    Rect::new(Vec2::ZERO, Vec2::new(consts::SCENE_WIDTH, consts::SCENE_HEIGHT))
}
