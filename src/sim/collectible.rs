//! Falling collectibles
//!
//! A collectible is anchored at its top-center. It falls from its spawn point
//! until its bottom edge rests on the floor line; the contact layer decides
//! whether the player or the ground got it first.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tween::Tween;
use crate::Rect;

/// What kind of item is falling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollectibleKind {
    #[default]
    Gloop,
}

impl CollectibleKind {
    /// Texture name in the asset catalog
    pub fn texture(&self) -> &'static str {
        match self {
            CollectibleKind::Gloop => "gloop",
        }
    }
}

/// Collectible lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleState {
    /// Placed but not yet dropping
    Spawned,
    Falling,
    Collected,
    Missed,
}

impl CollectibleState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CollectibleState::Collected | CollectibleState::Missed)
    }
}

/// A falling item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    /// Top-center anchor
    pub pos: Vec2,
    pub size: Vec2,
    /// Countdown number shown on the drop
    pub drop_number: u32,
    pub state: CollectibleState,
    /// Active fall (None once halted or landed)
    fall: Option<Tween>,
    /// Contact sensor attached
    sensor: bool,
}

impl Collectible {
    pub fn new(id: u32, kind: CollectibleKind, pos: Vec2, size: Vec2, drop_number: u32) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            drop_number,
            state: CollectibleState::Spawned,
            fall: None,
            sensor: true,
        }
    }

    /// Start falling so the bottom edge meets `floor_level` after `duration` seconds
    pub fn drop(&mut self, duration: f32, floor_level: f32) {
        let target = Vec2::new(self.pos.x, floor_level + self.size.y);
        self.fall = Some(Tween::new(self.pos, target, duration));
        self.state = CollectibleState::Falling;
    }

    /// Advance the fall
    pub fn step(&mut self, dt: f32) {
        if self.state != CollectibleState::Falling {
            return;
        }
        if let Some(fall) = self.fall.as_mut() {
            self.pos = fall.step(dt);
            if fall.is_finished() {
                self.fall = None;
            }
        }
    }

    /// Stop the fall animation and detach the sensor, leaving it in place
    pub fn halt(&mut self) {
        self.fall = None;
        self.sensor = false;
    }

    pub fn collected(&mut self) {
        self.state = CollectibleState::Collected;
        self.halt();
    }

    pub fn missed(&mut self) {
        self.state = CollectibleState::Missed;
        self.halt();
    }

    pub fn is_falling(&self) -> bool {
        self.fall.is_some()
    }

    pub fn has_sensor(&self) -> bool {
        self.sensor
    }

    /// Where the fall ends, if one is running
    pub fn fall_target(&self) -> Option<Vec2> {
        self.fall.map(|f| f.to)
    }

    /// Contact body (hangs below the anchor)
    pub fn bounds(&self) -> Rect {
        let half_w = self.size.x / 2.0;
        Rect::new(
            Vec2::new(self.pos.x - half_w, self.pos.y - self.size.y),
            Vec2::new(self.pos.x + half_w, self.pos.y),
        )
    }
}
