//! HUD model
//!
//! Button placement, hit testing and the text the presentation layer draws.
//! Visibility here is logical; fades are up to the renderer.

use glam::Vec2;

use crate::Rect;
use crate::consts::*;
use crate::economy::ContinueBadge;

pub const MSG_TAP_TO_START: &str = "Tap start to Play the Game";
pub const MSG_GET_READY: &str = "Get ready!";
pub const MSG_GAME_OVER: &str = "Game Over\nStart a New Game or Continue";

/// Tappable HUD buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Start,
    Continue,
    WatchAd,
}

/// HUD state
#[derive(Debug, Clone)]
pub struct Hud {
    start_rect: Rect,
    continue_rect: Rect,
    watch_ad_rect: Rect,
    pub start_visible: bool,
    pub continue_visible: bool,
    pub watch_ad_visible: bool,
    pub message: Option<String>,
    pub level_text: String,
    pub score_text: String,
    pub continue_badge: ContinueBadge,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        let start_size = Vec2::new(300.0, 150.0) * 0.55;
        let start_rect = Rect::from_center(
            Vec2::new(SCENE_WIDTH / 2.0, SCENE_HEIGHT / 2.0),
            start_size,
        );
        let watch_ad_rect = Rect::from_center(
            Vec2::new(start_rect.max.x + 75.0, SCENE_HEIGHT / 2.0 - 25.0),
            Vec2::new(100.0, 100.0) * 0.75,
        );
        let continue_rect = Rect::from_center(
            Vec2::new(SCENE_WIDTH - 75.0, 60.0),
            Vec2::new(120.0, 80.0) * 0.85,
        );

        Self {
            start_rect,
            continue_rect,
            watch_ad_rect,
            start_visible: true,
            continue_visible: true,
            watch_ad_visible: false,
            message: None,
            level_text: level_text(1),
            score_text: score_text(0),
            continue_badge: ContinueBadge::Count(0),
        }
    }

    pub fn rect(&self, button: Button) -> Rect {
        match button {
            Button::Start => self.start_rect,
            Button::Continue => self.continue_rect,
            Button::WatchAd => self.watch_ad_rect,
        }
    }

    /// Buttons under `pos`, in dispatch order
    pub fn hit_test(&self, pos: Vec2) -> Vec<Button> {
        [Button::WatchAd, Button::Continue, Button::Start]
            .into_iter()
            .filter(|b| self.rect(*b).contains(pos))
            .collect()
    }

    pub fn show_message(&mut self, text: &str) {
        self.message = Some(text.to_string());
    }

    pub fn hide_message(&mut self) {
        self.message = None;
    }

    /// Show start/continue, plus watch-ad if an ad is ready
    pub fn show_buttons(&mut self, reward_ad_ready: bool) {
        self.start_visible = true;
        self.continue_visible = true;
        if reward_ad_ready {
            self.watch_ad_visible = true;
        }
    }

    pub fn hide_buttons(&mut self) {
        self.start_visible = false;
        self.continue_visible = false;
        self.watch_ad_visible = false;
    }

    pub fn set_level(&mut self, level: u32) {
        self.level_text = level_text(level);
    }

    pub fn set_score(&mut self, score: u64) {
        self.score_text = score_text(score);
    }
}

pub fn level_text(level: u32) -> String {
    format!("Level {level}")
}

pub fn score_text(score: u64) -> String {
    format!("Score: {score}")
}
