//! Free-continue economy
//!
//! Wraps the persistence port. Every change is written through immediately;
//! a failed write is logged and the in-memory count stays authoritative.

use crate::persistence::ContinueStore;

/// How the continue button badge should read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueBadge {
    Count(u32),
    Max,
}

impl ContinueBadge {
    /// Texture name for the badge
    pub fn texture(&self) -> String {
        match self {
            ContinueBadge::Count(n) => format!("continueRemaining-{n}"),
            ContinueBadge::Max => "continueRemaining-max".to_string(),
        }
    }
}

/// Free continues, persisted through `S`
#[derive(Debug)]
pub struct ContinueEconomy<S: ContinueStore> {
    store: S,
    free_continues: u32,
    max_displayed: u32,
}

impl<S: ContinueStore> ContinueEconomy<S> {
    /// Load the count from `store`. Unreadable data falls back to the default.
    pub fn new(mut store: S, max_displayed: u32) -> Self {
        let free_continues = match store.load_free_continues() {
            Ok(n) => n,
            Err(e) => {
                log::warn!("Couldn't load game data ({e}), using defaults");
                crate::consts::DEFAULT_FREE_CONTINUES
            }
        };
        log::info!("Free continues: {}", free_continues);
        Self {
            store,
            free_continues,
            max_displayed,
        }
    }

    pub fn free_continues(&self) -> u32 {
        self.free_continues
    }

    pub fn can_continue(&self) -> bool {
        self.free_continues > 0
    }

    /// Spend one continue. Returns false (and changes nothing) if none are left.
    pub fn try_consume(&mut self) -> bool {
        if self.free_continues == 0 {
            return false;
        }
        self.free_continues -= 1;
        self.persist();
        true
    }

    /// Reward from a watched ad. No cap here; the badge clamps.
    pub fn grant(&mut self) {
        self.free_continues = self.free_continues.saturating_add(1);
        self.persist();
    }

    pub fn badge(&self) -> ContinueBadge {
        if self.free_continues > self.max_displayed {
            ContinueBadge::Max
        } else {
            ContinueBadge::Count(self.free_continues)
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save_free_continues(self.free_continues) {
            log::warn!("Couldn't write game data: {e}");
        }
    }
}
