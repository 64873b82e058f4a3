//! End-to-end game scenarios through the public API

use glam::Vec2;
use gloop_drop::ads::ad_channel;
use gloop_drop::assets::Atlas;
use gloop_drop::consts::*;
use gloop_drop::persistence::{ContinueStore, JsonFileStore, MemoryStore};
use gloop_drop::platform::{Autopilot, SimulatedAdNetwork, probe_contacts};
use gloop_drop::sim::{
    AnimationState, Category, Contact, GameEvent, GamePhase, Owner, PointerEvent, Scene, TAG_SPAWN,
    TickInput, drop_interval, drops_expected, tick,
};
use gloop_drop::tuning::Tuning;
use gloop_drop::ui::Button;

fn scene_with<S: ContinueStore>(store: S) -> Scene<S> {
    Scene::new(2024, Tuning::default(), &Atlas::builtin(), store).unwrap()
}

fn step_until_drop<S: ContinueStore>(scene: &mut Scene<S>) -> u32 {
    let known: Vec<u32> = scene.collectibles().iter().map(|c| c.id).collect();
    for _ in 0..600 {
        tick(scene, &TickInput::default(), SIM_DT);
        if let Some(c) = scene.collectibles().iter().find(|c| !known.contains(&c.id)) {
            return c.id;
        }
    }
    panic!("no drop within 10s");
}

fn tap<S: ContinueStore>(scene: &mut Scene<S>, button: Button) {
    let r = scene.hud().rect(button);
    let center = (r.min + r.max) / 2.0;
    let input = TickInput {
        pointer: vec![PointerEvent::Down(center), PointerEvent::Up(center)],
        ..Default::default()
    };
    tick(scene, &input, SIM_DT);
}

#[test]
fn test_level_one_parameters() {
    let tuning = Tuning::default();
    assert_eq!(drops_expected(1), 10);
    assert!((drop_interval(1, &tuning) - 1.0).abs() < 1e-6);
}

#[test]
fn test_ten_catches_advance_to_level_two() {
    let mut scene = scene_with(MemoryStore::new());
    tap(&mut scene, Button::Start);
    for _ in 0..10 {
        let id = step_until_drop(&mut scene);
        scene.handle_contact(&Contact::new(Category::Player, Category::Collectible, Some(id)));
    }
    assert_eq!(scene.state().score, 10);

    for _ in 0..((LEVEL_ADVANCE_DELAY / SIM_DT) as usize + 2) {
        tick(&mut scene, &TickInput::default(), SIM_DT);
    }
    assert_eq!(scene.state().level, 2);
    assert_eq!(scene.state().phase, GamePhase::Running);
}

#[test]
fn test_first_miss_is_game_over() {
    let mut scene = scene_with(MemoryStore::new());
    tap(&mut scene, Button::Start);
    let id = step_until_drop(&mut scene);
    scene.handle_contact(&Contact::new(Category::Ground, Category::Collectible, Some(id)));

    assert_eq!(scene.state().phase, GamePhase::GameOver);
    assert_eq!(scene.state().drops_collected, 0);
    assert_eq!(scene.player().animation, AnimationState::Dying);
    assert!(!scene.scheduler().is_scheduled(Owner::Scene, TAG_SPAWN));

    // Nothing else spawns afterwards
    for _ in 0..180 {
        tick(&mut scene, &TickInput::default(), SIM_DT);
    }
    assert!(scene.collectibles().is_empty());
}

#[test]
fn test_continue_tap_without_stock_changes_nothing() {
    let mut scene = scene_with(MemoryStore::with_continues(0));
    tap(&mut scene, Button::Start);
    let id = step_until_drop(&mut scene);
    scene.handle_contact(&Contact::new(Category::Ground, Category::Collectible, Some(id)));
    let before = scene.state().clone();

    tap(&mut scene, Button::Continue);
    assert!(!scene.state().is_continue);
    assert!(!scene.state().in_progress);
    assert_eq!(scene.state().score, before.score);
    assert_eq!(scene.state().level, before.level);
}

#[test]
fn test_continues_survive_restart_on_disk() {
    let path = std::env::temp_dir().join(format!("gloop-drop-scenario-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    {
        // Fresh save starts with one free continue
        let mut scene = scene_with(JsonFileStore::new(path.clone()));
        assert_eq!(scene.economy().free_continues(), DEFAULT_FREE_CONTINUES);
        scene.on_reward_earned();
        assert_eq!(scene.economy().free_continues(), 2);
    }

    let mut scene = scene_with(JsonFileStore::new(path.clone()));
    assert_eq!(scene.economy().free_continues(), 2);
    scene.press_start();
    scene.game_over();
    scene.use_continue();
    assert!(scene.state().in_progress);

    let reopened = JsonFileStore::new(path.clone());
    assert_eq!(reopened.read().unwrap().free_continues, 1);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_watch_ad_grants_continue() {
    let mut scene = scene_with(MemoryStore::with_continues(0));
    let (link, end) = ad_channel();
    scene.attach_ads(link);
    let mut network = SimulatedAdNetwork::new(end, 1, 1.0);
    network.load();

    tap(&mut scene, Button::Start);
    let id = step_until_drop(&mut scene);
    scene.handle_contact(&Contact::new(Category::Ground, Category::Collectible, Some(id)));
    assert!(scene.hud().watch_ad_visible);

    tap(&mut scene, Button::WatchAd);
    network.pump();
    tick(&mut scene, &TickInput::default(), SIM_DT);
    assert_eq!(scene.economy().free_continues(), 1);
    assert!(!scene.distractions_suspended());

    let events = scene.drain_events();
    assert!(events.contains(&GameEvent::SuspendDistractions));
    assert!(events.contains(&GameEvent::ResumeDistractions));

    tap(&mut scene, Button::Continue);
    assert!(scene.state().in_progress);
    assert_eq!(scene.economy().free_continues(), 0);
}

#[test]
fn test_dragged_player_catches_drop() {
    let mut scene = scene_with(MemoryStore::new());
    tap(&mut scene, Button::Start);
    let id = step_until_drop(&mut scene);
    let x = scene
        .collectibles()
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.pos.x)
        .unwrap();

    let body = scene.player().bounds();
    let grab = (body.min + body.max) / 2.0;
    let input = TickInput {
        pointer: vec![
            PointerEvent::Down(grab),
            PointerEvent::Moved(Vec2::new(x, grab.y)),
        ],
        ..Default::default()
    };
    tick(&mut scene, &input, SIM_DT);
    assert_eq!(scene.player().pos.x, x);

    let mut input = TickInput::default();
    for _ in 0..60 {
        tick(&mut scene, &input, SIM_DT);
        input.contacts = probe_contacts(&scene);
        if scene.state().score > 0 {
            break;
        }
    }
    assert_eq!(scene.state().score, 1);
    assert!(scene.state().in_progress);
}

#[test]
fn test_autopilot_session_is_deterministic() {
    fn play(seed: u64) -> (u32, u64) {
        let mut scene =
            Scene::new(seed, Tuning::default(), &Atlas::builtin(), MemoryStore::new()).unwrap();
        let mut pilot = Autopilot::default();
        let mut input = TickInput::default();
        for _ in 0..(60 * 40) {
            input.pointer = pilot.plan(&scene, SIM_DT);
            tick(&mut scene, &input, SIM_DT);
            input.contacts = probe_contacts(&scene);
        }
        (scene.state().level, scene.state().score)
    }

    let a = play(77);
    assert_eq!(a, play(77));
    assert!(a.1 > 0);
}
