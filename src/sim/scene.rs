//! The game scene: level loop and state machine
//!
//! Owns the bookkeeping, the entities, the timer table and the continue
//! economy. Every mutation happens on the caller's thread through `&mut self`,
//! so transitions never interleave.
//!
//! Flow: `start_run` schedules `drops_expected` spawns → each drop falls →
//! contacts resolve to `on_collected` / `on_missed` → a full catch advances
//! the level after a short pause, a miss ends the run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collectible::{Collectible, CollectibleKind};
use super::contact::{Contact, ContactOutcome, resolve};
use super::level::{DropPlacer, LevelParameters};
use super::player::{Facing, Player};
use super::scheduler::{Fired, Owner, Repeat, Scheduler};
use super::state::{GameEvent, GamePhase, GameState};
use crate::ads::{AdEvent, AdLink};
use crate::assets::{AssetError, Atlas};
use crate::consts::*;
use crate::economy::ContinueEconomy;
use crate::persistence::ContinueStore;
use crate::tuning::Tuning;
use crate::ui::{self, Button, Hud};
use crate::{Rect, scene_rect};

/// Spawn loop tag
pub const TAG_SPAWN: &str = "gloop";
/// Pending level advance tag
pub const TAG_ADVANCE: &str = "advance";
/// Leftover drop removal tag
pub const TAG_PURGE: &str = "purge";

/// Deferred work the scene schedules for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneAction {
    SpawnDrop,
    AdvanceLevel,
    PurgeDrop(u32),
}

/// The running game
#[derive(Debug)]
pub struct Scene<S: ContinueStore> {
    state: GameState,
    player: Player,
    /// Live drops, sorted by id
    collectibles: Vec<Collectible>,
    scheduler: Scheduler<SceneAction>,
    placer: DropPlacer,
    rng: Pcg32,
    economy: ContinueEconomy<S>,
    ads: Option<AdLink>,
    reward_ad_ready: bool,
    distractions_suspended: bool,
    hud: Hud,
    tuning: Tuning,
    bounds: Rect,
    drop_size: Vec2,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl<S: ContinueStore> Scene<S> {
    /// Build the scene. Fails if required sprites are missing.
    pub fn new(seed: u64, tuning: Tuning, atlas: &Atlas, store: S) -> Result<Self, AssetError> {
        let bounds = scene_rect();
        let player = Player::new(atlas, Vec2::new(bounds.mid_x(), FLOOR_Y))?;
        let drop_size = atlas.require(CollectibleKind::Gloop.texture())?;
        let economy = ContinueEconomy::new(store, tuning.max_number_of_continues);

        let mut hud = Hud::new();
        hud.continue_badge = economy.badge();
        hud.show_message(ui::MSG_TAP_TO_START);

        Ok(Self {
            state: GameState::new(),
            player,
            collectibles: Vec::new(),
            scheduler: Scheduler::new(),
            placer: DropPlacer::new(),
            rng: Pcg32::seed_from_u64(seed),
            economy,
            ads: None,
            reward_ad_ready: false,
            distractions_suspended: false,
            hud,
            tuning,
            bounds,
            drop_size,
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Connect the rewarded-ad channel
    pub fn attach_ads(&mut self, link: AdLink) {
        self.ads = Some(link);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn scheduler(&self) -> &Scheduler<SceneAction> {
        &self.scheduler
    }

    pub fn economy(&self) -> &ContinueEconomy<S> {
        &self.economy
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Column of the last spawned drop (0.0 before the first)
    pub fn prev_drop_location(&self) -> f32 {
        self.placer.prev_x()
    }

    pub fn level_parameters(&self) -> LevelParameters {
        LevelParameters::for_level(self.state.level, &self.tuning)
    }

    pub fn is_spawning(&self) -> bool {
        self.scheduler.is_scheduled(Owner::Scene, TAG_SPAWN)
    }

    pub fn reward_ad_ready(&self) -> bool {
        self.reward_ad_ready
    }

    pub fn distractions_suspended(&self) -> bool {
        self.distractions_suspended
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Delay before the `index`-th leftover drop pops
    pub fn purge_delay(&self, index: usize) -> f32 {
        self.tuning.purge_initial_delay + self.tuning.purge_stagger * index as f32
    }

    // === Run lifecycle ===

    /// Begin (or resume) the spawn loop for the current level.
    ///
    /// A fresh run resets score and level; a continue or a level advance
    /// keeps them.
    pub fn start_run(&mut self) {
        self.hud.hide_message();
        self.hud.hide_buttons();
        self.player.walk();

        let continued = self.state.is_continue;
        if !self.state.in_progress && !self.state.is_continue {
            self.state.score = 0;
            self.state.level = 1;
            self.hud.set_score(0);
            self.hud.set_level(1);
            self.events.push(GameEvent::ScoreChanged(0));
            self.events.push(GameEvent::LevelChanged(1));
        } else {
            self.state.is_continue = false;
        }

        let params = self.level_parameters();
        self.state.drops_collected = 0;
        self.state.drop_number = params.drops_expected;

        self.scheduler.schedule_repeating(
            Owner::Scene,
            TAG_SPAWN,
            params.drop_interval,
            Repeat::Times(params.drops_expected),
            SceneAction::SpawnDrop,
        );

        self.state.in_progress = true;
        self.state.phase = GamePhase::Running;
        log::info!(
            "Level {} started: {} drops every {:.3}s (score {}, continued: {})",
            params.level,
            params.drops_expected,
            params.drop_interval,
            self.state.score,
            continued
        );
        self.events.push(GameEvent::RunStarted {
            level: self.state.level,
            score: self.state.score,
            continued,
        });
    }

    /// Start button: only while no run is in progress
    pub fn press_start(&mut self) {
        if self.state.in_progress {
            log::debug!("Start ignored, run in progress");
            return;
        }
        self.start_run();
    }

    /// Release one drop from the top of the scene
    pub fn spawn_drop(&mut self) {
        let margin = self.drop_size.x * 2.0;
        let spacing = self.level_parameters().spacing;
        let x = self.placer.next_x(
            &mut self.rng,
            spacing,
            self.bounds.min.x + margin,
            self.bounds.max.x - margin,
        );

        let id = self.next_id;
        self.next_id += 1;

        let start = Vec2::new(x, self.player.pos.y * DROP_START_FACTOR);
        let mut drop = Collectible::new(
            id,
            CollectibleKind::Gloop,
            start,
            self.drop_size,
            self.state.drop_number,
        );
        self.state.drop_number = self.state.drop_number.saturating_sub(1);
        drop.drop(self.tuning.drop_fall_duration, self.player.bounds().min.y);

        log::debug!("Spawned drop {} (#{}) at x={:.1}", id, drop.drop_number, x);
        self.events.push(GameEvent::DropSpawned {
            id,
            x,
            drop_number: drop.drop_number,
        });
        self.collectibles.push(drop);
    }

    /// Route a contact from the physics collaborator
    pub fn handle_contact(&mut self, contact: &Contact) {
        match resolve(contact) {
            Some(ContactOutcome::Collected(id)) => self.on_collected(id),
            Some(ContactOutcome::Missed(id)) => self.on_missed(id),
            None => log::debug!("Ignoring contact {:?}", contact),
        }
    }

    /// Index of a drop that can still be hit
    fn live_drop(&self, id: u32) -> Option<usize> {
        self.collectibles
            .iter()
            .position(|c| c.id == id && c.has_sensor() && !c.state.is_terminal())
    }

    /// Player caught drop `id`
    pub fn on_collected(&mut self, id: u32) {
        let Some(idx) = self.live_drop(id) else {
            log::debug!("Collect for unknown or inactive drop {}", id);
            return;
        };
        let mut drop = self.collectibles.remove(idx);
        drop.collected();
        self.scheduler.cancel_owner(Owner::Collectible(id));

        if self.state.drops_collected < self.state.drops_expected() {
            self.state.drops_collected += 1;
        }
        self.state.score += u64::from(self.state.level);
        self.hud.set_score(self.state.score);

        let chomp_pos = Vec2::new(self.player.pos.x, self.player.bounds().max.y + 25.0);
        self.events.push(GameEvent::Chomp { id, pos: chomp_pos });
        self.events.push(GameEvent::ScoreChanged(self.state.score));

        if self.state.level_cleared() {
            self.advance_level();
        }
    }

    /// Drop `id` hit the ground
    pub fn on_missed(&mut self, id: u32) {
        let Some(idx) = self.live_drop(id) else {
            log::debug!("Miss for unknown or inactive drop {}", id);
            return;
        };
        let mut drop = self.collectibles.remove(idx);
        drop.missed();
        self.scheduler.cancel_owner(Owner::Collectible(id));
        self.game_over();
    }

    /// Show "get ready" and queue the next level
    pub fn advance_level(&mut self) {
        self.hud.show_message(ui::MSG_GET_READY);
        self.state.phase = GamePhase::LevelTransition;
        self.scheduler.schedule_after(
            Owner::Scene,
            TAG_ADVANCE,
            self.tuning.level_advance_delay,
            SceneAction::AdvanceLevel,
        );
        log::info!("Level {} cleared (score {})", self.state.level, self.state.score);
        self.events.push(GameEvent::LevelCleared {
            level: self.state.level,
        });
    }

    /// The delayed half of `advance_level`
    fn next_level(&mut self) {
        if !self.state.in_progress || self.state.phase != GamePhase::LevelTransition {
            log::debug!("Stale level advance dropped (phase {:?})", self.state.phase);
            return;
        }
        self.state.level += 1;
        self.hud.set_level(self.state.level);
        self.events.push(GameEvent::LevelChanged(self.state.level));
        self.start_run();
    }

    /// End the run: stop spawning, freeze and pop leftovers, send the player home
    pub fn game_over(&mut self) {
        self.hud.show_message(ui::MSG_GAME_OVER);
        self.state.in_progress = false;
        self.state.phase = GamePhase::GameOver;

        self.player.die();
        self.player.end_drag();

        self.scheduler.cancel(Owner::Scene, TAG_SPAWN);
        self.scheduler.cancel(Owner::Scene, TAG_ADVANCE);

        for drop in &mut self.collectibles {
            drop.halt();
            self.scheduler.cancel_owner(Owner::Collectible(drop.id));
        }

        self.reset_player_position();
        self.pop_remaining_drops();
        self.hud.show_buttons(self.reward_ad_ready);
        self.state.drops_collected = 0;

        log::info!(
            "Game over at level {} with score {}",
            self.state.level,
            self.state.score
        );
        self.events.push(GameEvent::GameOver {
            level: self.state.level,
            score: self.state.score,
        });
    }

    /// Slow glide back to center; farther away takes longer
    fn reset_player_position(&mut self) {
        let center = self.bounds.mid_x();
        let distance = (center - self.player.pos.x).abs();
        let duration = distance / (self.tuning.reset_speed * 2.0) / 255.0;
        let direction = if self.player.pos.x > center {
            Facing::Left
        } else {
            Facing::Right
        };
        self.player
            .move_to(Vec2::new(center, self.player.pos.y), direction, duration);
    }

    /// Queue leftover drops for removal in a staggered cascade
    fn pop_remaining_drops(&mut self) {
        let ids: Vec<u32> = self.collectibles.iter().map(|c| c.id).collect();
        for (i, id) in ids.into_iter().enumerate() {
            let delay = self.purge_delay(i);
            self.scheduler.schedule_after(
                Owner::Collectible(id),
                TAG_PURGE,
                delay,
                SceneAction::PurgeDrop(id),
            );
        }
    }

    fn purge_drop(&mut self, id: u32) {
        let before = self.collectibles.len();
        self.collectibles.retain(|c| c.id != id);
        if self.collectibles.len() != before {
            self.events.push(GameEvent::DropPurged { id });
        }
    }

    // === Continues & ads ===

    /// Spend a free continue and resume at the current level and score
    pub fn use_continue(&mut self) {
        if self.state.in_progress {
            log::debug!("Continue ignored, run in progress");
            return;
        }
        if !self.economy.try_consume() {
            log::debug!("Continue ignored, none left");
            return;
        }
        self.state.is_continue = true;
        self.hud.continue_badge = self.economy.badge();
        self.events.push(GameEvent::ContinueUsed {
            remaining: self.economy.free_continues(),
        });
        self.start_run();
    }

    /// Watch-ad button: forward to the ad network
    pub fn request_rewarded_ad(&mut self) {
        if self.state.in_progress {
            return;
        }
        let Some(ads) = &self.ads else {
            log::warn!("No ad network attached, rewarded ad request dropped");
            return;
        };
        ads.request_rewarded_ad();
        self.events.push(GameEvent::RewardedAdRequested);
    }

    /// React to one ad-network notification
    pub fn handle_ad_event(&mut self, event: AdEvent) {
        match event {
            AdEvent::RewardAdLoaded => {
                self.reward_ad_ready = true;
                if !self.state.in_progress && self.hud.start_visible {
                    self.hud.watch_ad_visible = true;
                }
            }
            AdEvent::RewardAdUnavailable => {
                self.reward_ad_ready = false;
                self.hud.watch_ad_visible = false;
            }
            AdEvent::WillPresent => {
                self.distractions_suspended = true;
                self.hud.watch_ad_visible = false;
                self.events.push(GameEvent::SuspendDistractions);
            }
            AdEvent::RewardEarned => self.on_reward_earned(),
            AdEvent::DidOrWillDismiss => {
                self.distractions_suspended = false;
                self.events.push(GameEvent::ResumeDistractions);
            }
            AdEvent::FailedToPresent(reason) => {
                log::warn!("Rewarded ad failed to present: {}", reason);
            }
        }
    }

    /// A watched ad earns one continue
    pub fn on_reward_earned(&mut self) {
        self.economy.grant();
        self.hud.continue_badge = self.economy.badge();
        log::info!("Reward earned, free continues: {}", self.economy.free_continues());
        self.events
            .push(GameEvent::ContinuesChanged(self.economy.free_continues()));
    }

    fn poll_ads(&mut self) {
        let events = match &self.ads {
            Some(ads) => ads.poll(),
            None => return,
        };
        for event in events {
            self.handle_ad_event(event);
        }
    }

    // === Input ===

    pub fn pointer_down(&mut self, pos: Vec2) {
        if self.state.in_progress && self.player.bounds().contains(pos) {
            self.player.begin_drag();
        }
        for button in self.hud.hit_test(pos) {
            match button {
                Button::WatchAd if !self.state.in_progress => {
                    self.request_rewarded_ad();
                    return;
                }
                Button::Continue if !self.state.in_progress => {
                    self.use_continue();
                    return;
                }
                Button::Start if !self.state.in_progress => self.start_run(),
                _ => log::debug!("{:?} tap ignored while running", button),
            }
        }
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        if self.player.is_dragging {
            let x = pos.x.clamp(self.bounds.min.x, self.bounds.max.x);
            self.player.drag_to(x);
        }
    }

    pub fn pointer_up(&mut self, _pos: Vec2) {
        self.player.end_drag();
    }

    // === Frame update ===

    /// Advance the scene by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.poll_ads();

        let until = self.scheduler.now() + f64::from(dt);
        // Drops released mid-frame only fall for the rest of the frame
        let mut fresh: Vec<(u32, f32)> = Vec::new();
        while let Some(fired) = self.scheduler.pop_due(until) {
            if let Some(id) = self.dispatch(&fired) {
                fresh.push((id, (until - fired.at) as f32));
            }
        }
        self.scheduler.settle(until);

        self.player.step(dt);
        for drop in &mut self.collectibles {
            let step = fresh
                .iter()
                .find(|(id, _)| *id == drop.id)
                .map(|(_, rest)| *rest)
                .unwrap_or(dt);
            drop.step(step);
        }
    }

    /// Run a fired action; returns the id of a freshly spawned drop
    fn dispatch(&mut self, fired: &Fired<SceneAction>) -> Option<u32> {
        match fired.action {
            SceneAction::SpawnDrop => {
                self.spawn_drop();
                self.collectibles.last().map(|c| c.id)
            }
            SceneAction::AdvanceLevel => {
                self.next_level();
                None
            }
            SceneAction::PurgeDrop(id) => {
                self.purge_drop(id);
                None
            }
        }
    }
}
