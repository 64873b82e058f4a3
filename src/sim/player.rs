//! The player blob
//!
//! Anchored at its bottom-center and locked to the floor line. Horizontal
//! movement comes from dragging or from scripted glides.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tween::Tween;
use crate::assets::{AssetError, Atlas};
use crate::consts::{DIE_FRAME_TIME, WALK_FRAME_TIME};
use crate::Rect;

/// Which way the sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Animation the player is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationState {
    Idle,
    Walking,
    Dying,
}

/// Looping frame sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameAnimation {
    frames: Vec<String>,
    frame_time: f32,
    elapsed: f32,
    index: usize,
}

impl FrameAnimation {
    pub fn new(frames: Vec<String>, frame_time: f32) -> Self {
        Self {
            frames,
            frame_time,
            elapsed: 0.0,
            index: 0,
        }
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.index = 0;
    }

    pub fn step(&mut self, dt: f32) {
        if self.frames.len() < 2 || self.frame_time <= 0.0 {
            return;
        }
        self.elapsed += dt;
        while self.elapsed >= self.frame_time {
            self.elapsed -= self.frame_time;
            self.index = (self.index + 1) % self.frames.len();
        }
    }

    pub fn frame(&self) -> &str {
        self.frames.get(self.index).map(String::as_str).unwrap_or("")
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// The player actor. Lives for the whole session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Bottom-center anchor
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub animation: AnimationState,
    pub is_dragging: bool,
    /// Last x seen while dragging, for facing
    last_drag_x: Option<f32>,
    glide: Option<Tween>,
    walk_anim: FrameAnimation,
    die_anim: FrameAnimation,
}

impl Player {
    /// Build the player, failing if its animation frames are missing
    pub fn new(atlas: &Atlas, pos: Vec2) -> Result<Self, AssetError> {
        let walk = atlas.load_frames("walk", "blob-walk_", 0, 2)?;
        let die = atlas.load_frames("die", "blob-die_", 0, 0)?;
        let size = atlas.require(&walk[0])?;

        Ok(Self {
            pos,
            size,
            facing: Facing::Right,
            animation: AnimationState::Idle,
            is_dragging: false,
            last_drag_x: None,
            glide: None,
            walk_anim: FrameAnimation::new(walk, WALK_FRAME_TIME),
            die_anim: FrameAnimation::new(die, DIE_FRAME_TIME),
        })
    }

    /// Stop dying, loop the walk cycle
    pub fn walk(&mut self) {
        self.die_anim.restart();
        self.walk_anim.restart();
        self.animation = AnimationState::Walking;
    }

    /// Stop walking, loop the die cycle
    pub fn die(&mut self) {
        self.walk_anim.restart();
        self.die_anim.restart();
        self.animation = AnimationState::Dying;
    }

    /// Face `direction` and glide to `target` over `duration` seconds
    pub fn move_to(&mut self, target: Vec2, direction: Facing, duration: f32) {
        self.facing = direction;
        let target = Vec2::new(target.x, self.pos.y);
        if duration <= 0.0 {
            self.pos = target;
            self.glide = None;
        } else {
            self.glide = Some(Tween::new(self.pos, target, duration));
        }
    }

    pub fn begin_drag(&mut self) {
        self.is_dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
    }

    /// Follow a drag to `x`, turning toward the motion
    pub fn drag_to(&mut self, x: f32) {
        if !self.is_dragging {
            return;
        }
        let last = self.last_drag_x.unwrap_or(self.pos.x);
        self.facing = if last > x { Facing::Left } else { Facing::Right };
        self.glide = None;
        self.pos.x = x;
        self.last_drag_x = Some(x);
    }

    pub fn is_gliding(&self) -> bool {
        self.glide.is_some()
    }

    pub fn step(&mut self, dt: f32) {
        if let Some(glide) = self.glide.as_mut() {
            self.pos = glide.step(dt);
            if glide.is_finished() {
                self.glide = None;
            }
        }
        match self.animation {
            AnimationState::Idle => {}
            AnimationState::Walking => self.walk_anim.step(dt),
            AnimationState::Dying => self.die_anim.step(dt),
        }
    }

    /// Texture to draw this frame
    pub fn current_frame(&self) -> &str {
        match self.animation {
            AnimationState::Idle | AnimationState::Walking => self.walk_anim.frame(),
            AnimationState::Dying => self.die_anim.frame(),
        }
    }

    /// Contact body (sits on the anchor)
    pub fn bounds(&self) -> Rect {
        let half_w = self.size.x / 2.0;
        Rect::new(
            Vec2::new(self.pos.x - half_w, self.pos.y),
            Vec2::new(self.pos.x + half_w, self.pos.y + self.size.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(&Atlas::builtin(), Vec2::new(668.0, 176.0)).unwrap()
    }

    #[test]
    fn test_missing_die_frames_fail() {
        let mut atlas = Atlas::new();
        for i in 0..=2 {
            atlas.insert(format!("blob-walk_{i}"), Vec2::ONE);
        }
        let err = Player::new(&atlas, Vec2::ZERO).unwrap_err();
        assert!(matches!(err, AssetError::MissingAnimation { animation: "die", .. }));
    }

    #[test]
    fn test_walk_and_die_swap() {
        let mut p = player();
        assert_eq!(p.animation, AnimationState::Idle);
        p.walk();
        p.step(0.16);
        assert_eq!(p.current_frame(), "blob-walk_1");
        p.die();
        assert_eq!(p.animation, AnimationState::Dying);
        assert_eq!(p.current_frame(), "blob-die_0");
        // Single-frame loop stays put
        p.step(5.0);
        assert_eq!(p.current_frame(), "blob-die_0");
        p.walk();
        assert_eq!(p.current_frame(), "blob-walk_0");
    }

    #[test]
    fn test_walk_cycle_wraps() {
        let mut p = player();
        p.walk();
        for _ in 0..3 {
            p.step(0.151);
        }
        assert_eq!(p.current_frame(), "blob-walk_0");
    }

    #[test]
    fn test_move_to_glides_and_keeps_floor() {
        let mut p = player();
        p.move_to(Vec2::new(868.0, 999.0), Facing::Right, 0.5);
        assert!(p.is_gliding());
        p.step(0.25);
        assert!((p.pos.x - 768.0).abs() < 1e-3);
        p.step(0.25);
        assert_eq!(p.pos, Vec2::new(868.0, 176.0));
        assert!(!p.is_gliding());
    }

    #[test]
    fn test_move_to_zero_duration_snaps() {
        let mut p = player();
        p.move_to(Vec2::new(100.0, 0.0), Facing::Left, 0.0);
        assert_eq!(p.pos.x, 100.0);
        assert_eq!(p.facing, Facing::Left);
    }

    #[test]
    fn test_drag_sets_facing_from_last_position() {
        let mut p = player();
        p.drag_to(10.0);
        assert_eq!(p.pos.x, 668.0, "not dragging yet");

        p.begin_drag();
        p.drag_to(600.0);
        assert_eq!(p.facing, Facing::Left);
        p.drag_to(650.0);
        assert_eq!(p.facing, Facing::Right);
        assert_eq!(p.pos, Vec2::new(650.0, 176.0));
        p.end_drag();
        assert!(!p.is_dragging);
    }
}
