//! Gloop Drop entry point
//!
//! Runs the game headless: an autopilot plays, a contact probe stands in for
//! physics and an in-process ad network serves rewarded videos.

use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use gloop_drop::assets::Atlas;
use gloop_drop::ads::ad_channel;
use gloop_drop::consts::*;
use gloop_drop::persistence::JsonFileStore;
use gloop_drop::platform::{Autopilot, SimulatedAdNetwork, probe_contacts};
use gloop_drop::sim::{GameEvent, Scene, TickInput, tick};
use gloop_drop::tuning::Tuning;

const DEFAULT_SAVE_PATH: &str = "gloop-drop-save.json";
const DEFAULT_SECONDS: f32 = 120.0;
/// Chance the simulated network has an ad to show
const AD_FILL_RATE: f64 = 0.8;
/// Wall-clock frame length the driver pretends to run at
const FRAME_DT: f32 = 1.0 / 30.0;

/// Command-line arguments for a headless session
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Simulated play time in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_SECONDS)]
    seconds: f32,
    /// RNG seed (defaults to the wall clock)
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Continue save file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SAVE_PATH)]
    save: PathBuf,
    /// JSON tuning overrides
    #[arg(long, value_name = "PATH")]
    tuning: Option<PathBuf>,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Totals for the exit summary
#[derive(Debug, Default)]
struct RunStats {
    runs: u32,
    best_level: u32,
    best_score: u64,
    catches: u32,
    continues_used: u32,
}

impl RunStats {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RunStarted { continued: false, .. } => self.runs += 1,
            GameEvent::Chomp { .. } => self.catches += 1,
            GameEvent::ContinueUsed { .. } => self.continues_used += 1,
            GameEvent::GameOver { level, score } => {
                log::info!("Run over: level {}, score {}", level, score);
            }
            GameEvent::LevelChanged(level) => self.best_level = self.best_level.max(*level),
            GameEvent::ScoreChanged(score) => self.best_score = self.best_score.max(*score),
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Gloop Drop (headless) starting...");

    let options = CliArgs::parse();

    let tuning = match &options.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let seed = options.seed.unwrap_or_else(clock_seed);
    let store = JsonFileStore::new(options.save.clone());
    let mut scene = match Scene::new(seed, tuning, &Atlas::builtin(), store) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Failed to build scene: {e}");
            process::exit(1);
        }
    };
    log::info!("Game initialized with seed: {}", seed);

    let (link, end) = ad_channel();
    scene.attach_ads(link);
    let mut network = SimulatedAdNetwork::new(end, seed ^ 0xad, AD_FILL_RATE);
    network.load();

    let mut pilot = Autopilot::default();
    let mut input = TickInput::default();
    let mut stats = RunStats {
        best_level: scene.state().level,
        ..Default::default()
    };

    let mut accumulator = 0.0;
    let mut elapsed = 0.0;
    while elapsed < options.seconds {
        let dt = FRAME_DT.min(0.1);
        accumulator += dt;
        elapsed += dt;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            input.pointer = pilot.plan(&scene, SIM_DT);
            tick(&mut scene, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;

            // Contacts from this step's positions land next step
            input.contacts = probe_contacts(&scene);
            network.pump();
            for event in scene.drain_events() {
                stats.record(&event);
            }
        }
    }

    let state = scene.state();
    log::info!(
        "Summary after {:.0}s: level {}, score {}, runs {}, catches {}, best level {}, best score {}",
        elapsed,
        state.level,
        state.score,
        stats.runs,
        stats.catches,
        stats.best_level,
        stats.best_score
    );
    log::info!(
        "Continues: {} used, {} left, {} ads watched",
        stats.continues_used,
        scene.economy().free_continues(),
        network.rewards_paid
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::try_parse_from(["gloop-drop"]).unwrap();
        assert_eq!(args.seconds, DEFAULT_SECONDS);
        assert_eq!(args.seed, None);
        assert_eq!(args.save, PathBuf::from(DEFAULT_SAVE_PATH));
        assert!(args.tuning.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let args = CliArgs::try_parse_from([
            "gloop-drop",
            "--seconds",
            "30",
            "--seed",
            "42",
            "--save",
            "/tmp/save.json",
            "--tuning",
            "balance.json",
        ])
        .unwrap();
        assert_eq!(args.seconds, 30.0);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.save, PathBuf::from("/tmp/save.json"));
        assert_eq!(args.tuning, Some(PathBuf::from("balance.json")));
    }

    #[test]
    fn test_cli_rejects_bad_input() {
        assert!(CliArgs::try_parse_from(["gloop-drop", "--seed", "soon"]).is_err());
        assert!(CliArgs::try_parse_from(["gloop-drop", "--bogus"]).is_err());
    }
}
