//! Contact categories and the pair dispatch table
//!
//! The physics collaborator reports which categories touched; this module
//! turns a pair into a game outcome. No broad-phase lives here.

use serde::{Deserialize, Serialize};

/// Physics category tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Collectible,
    Ground,
}

impl Category {
    /// Bit used in category masks
    pub const fn bits(self) -> u32 {
        match self {
            Category::Player => 0b1,
            Category::Collectible => 0b10,
            Category::Ground => 0b100,
        }
    }
}

/// A contact reported by the physics collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: Category,
    pub b: Category,
    /// The collectible involved, if any
    pub collectible: Option<u32>,
}

impl Contact {
    pub fn new(a: Category, b: Category, collectible: Option<u32>) -> Self {
        Self { a, b, collectible }
    }

    fn pair_bits(&self) -> u32 {
        self.a.bits() | self.b.bits()
    }
}

/// What a contact means for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Collected(u32),
    Missed(u32),
}

/// Dispatch a contact. Unknown pairs and contacts without a collectible resolve to None.
pub fn resolve(contact: &Contact) -> Option<ContactOutcome> {
    const CATCH: u32 = Category::Collectible.bits() | Category::Player.bits();
    const MISS: u32 = Category::Collectible.bits() | Category::Ground.bits();

    let id = contact.collectible?;
    match contact.pair_bits() {
        CATCH => Some(ContactOutcome::Collected(id)),
        MISS => Some(ContactOutcome::Missed(id)),
        _ => None,
    }
}
