//! Sprite catalog
//!
//! The presentation layer owns the actual textures. The simulation only needs
//! to know which frames exist and how big they are, so it can size contact
//! bodies and run frame animations. A missing frame is a startup failure.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Raised when a required sprite is not in the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("could not find texture `{0}`")]
    MissingTexture(String),
    #[error("could not find textures for the {animation} animation (`{prefix}{first}`..=`{prefix}{last}`)")]
    MissingAnimation {
        animation: &'static str,
        prefix: String,
        first: u32,
        last: u32,
    },
}

/// Named sprite sizes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Atlas {
    sprites: BTreeMap<String, Vec2>,
}

impl Atlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sprites shipped with the game
    pub fn builtin() -> Self {
        let mut atlas = Self::new();
        for i in 0..=2 {
            atlas.insert(format!("blob-walk_{i}"), Vec2::new(120.0, 110.0));
        }
        atlas.insert("blob-die_0", Vec2::new(120.0, 110.0));
        atlas.insert("gloop", Vec2::new(52.0, 60.0));
        atlas
    }

    pub fn insert(&mut self, name: impl Into<String>, size: Vec2) {
        self.sprites.insert(name.into(), size);
    }

    pub fn size_of(&self, name: &str) -> Option<Vec2> {
        self.sprites.get(name).copied()
    }

    /// Size of a single texture, failing if absent
    pub fn require(&self, name: &str) -> Result<Vec2, AssetError> {
        self.size_of(name)
            .ok_or_else(|| AssetError::MissingTexture(name.to_string()))
    }

    /// Collect `prefix{first}..=prefix{last}`, failing if any frame is absent
    pub fn load_frames(
        &self,
        animation: &'static str,
        prefix: &str,
        first: u32,
        last: u32,
    ) -> Result<Vec<String>, AssetError> {
        let frames: Vec<String> = (first..=last).map(|i| format!("{prefix}{i}")).collect();
        if frames.is_empty() || frames.iter().any(|f| !self.sprites.contains_key(f)) {
            return Err(AssetError::MissingAnimation {
                animation,
                prefix: prefix.to_string(),
                first,
                last,
            });
        }
        Ok(frames)
    }
}
