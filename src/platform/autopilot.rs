//! Scripted player for headless runs
//!
//! Grabs the blob, drags it under the lowest live drop at a capped speed, and
//! taps the HUD after a game over: continue while any are left, otherwise
//! watch an ad if one is offered, otherwise start over.

use glam::Vec2;

use crate::persistence::ContinueStore;
use crate::sim::{PointerEvent, Scene};
use crate::ui::Button;

/// Drag speed cap in scene units per second
pub const DEFAULT_MAX_SPEED: f32 = 1400.0;
/// Seconds to wait on the game-over screen before tapping
pub const DEFAULT_TAP_DELAY: f32 = 1.5;

#[derive(Debug, Clone)]
pub struct Autopilot {
    pub max_speed: f32,
    pub tap_delay: f32,
    /// Time spent with no run in progress
    idle: f32,
    /// Ad already requested for this game-over screen
    ad_requested: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SPEED, DEFAULT_TAP_DELAY)
    }
}

impl Autopilot {
    pub fn new(max_speed: f32, tap_delay: f32) -> Self {
        Self {
            max_speed,
            tap_delay,
            idle: 0.0,
            ad_requested: false,
        }
    }

    /// Pointer events for the next tick
    pub fn plan<S: ContinueStore>(&mut self, scene: &Scene<S>, dt: f32) -> Vec<PointerEvent> {
        if scene.state().in_progress {
            self.idle = 0.0;
            self.ad_requested = false;
            return self.steer(scene, dt);
        }

        self.idle += dt;
        if self.idle < self.tap_delay {
            return Vec::new();
        }
        self.idle = 0.0;

        let hud = scene.hud();
        let button = if scene.economy().can_continue() && hud.continue_visible {
            Button::Continue
        } else if hud.watch_ad_visible && !self.ad_requested {
            self.ad_requested = true;
            Button::WatchAd
        } else {
            Button::Start
        };
        log::debug!("Autopilot taps {:?}", button);
        let r = hud.rect(button);
        let center = (r.min + r.max) / 2.0;
        vec![PointerEvent::Down(center), PointerEvent::Up(center)]
    }

    fn steer<S: ContinueStore>(&self, scene: &Scene<S>, dt: f32) -> Vec<PointerEvent> {
        let player = scene.player();
        let Some(target) = scene
            .collectibles()
            .iter()
            .filter(|c| c.has_sensor())
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|c| c.pos.x)
        else {
            return Vec::new();
        };

        let mut events = Vec::new();
        let body = player.bounds();
        let grab = (body.min + body.max) / 2.0;
        if !player.is_dragging {
            events.push(PointerEvent::Down(grab));
        }

        let max_step = self.max_speed * dt;
        let dx = (target - player.pos.x).clamp(-max_step, max_step);
        if dx != 0.0 {
            events.push(PointerEvent::Moved(Vec2::new(player.pos.x + dx, grab.y)));
        }
        events
    }
}
