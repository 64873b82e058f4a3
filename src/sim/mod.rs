//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulation clock only (no wall time)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collectible;
pub mod contact;
pub mod level;
pub mod player;
pub mod scene;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod tween;

pub use collectible::{Collectible, CollectibleKind, CollectibleState};
pub use contact::{Category, Contact, ContactOutcome};
pub use level::{DropPlacer, LevelParameters, drop_interval, drops_expected, spacing_range};
pub use player::{AnimationState, Facing, Player};
pub use scene::{Scene, SceneAction, TAG_ADVANCE, TAG_PURGE, TAG_SPAWN};
pub use scheduler::{Fired, Owner, Repeat, Scheduler};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{PointerEvent, TickInput, tick};
pub use tween::Tween;
