//! Overlap-based contact reports
//!
//! Plays the physics engine's role: every live sensor that overlaps the
//! player or reaches the floor yields a contact, once per tick. Duplicate
//! reports across ticks are expected and ignored by the scene.

use crate::consts::FLOOR_Y;
use crate::persistence::ContinueStore;
use crate::sim::{Category, Contact, Scene};

/// How close to the floor a drop's bottom edge counts as landed
pub const GROUND_EPSILON: f32 = 0.5;

/// Contacts for the current positions, in id order.
///
/// A drop touching both the player and the floor reports the player only.
pub fn probe_contacts<S: ContinueStore>(scene: &Scene<S>) -> Vec<Contact> {
    let player = scene.player().bounds();
    scene
        .collectibles()
        .iter()
        .filter(|c| c.has_sensor())
        .filter_map(|c| {
            let body = c.bounds();
            if body.intersects(&player) {
                Some(Contact::new(Category::Player, Category::Collectible, Some(c.id)))
            } else if body.min.y <= FLOOR_Y + GROUND_EPSILON {
                Some(Contact::new(Category::Collectible, Category::Ground, Some(c.id)))
            } else {
                None
            }
        })
        .collect()
}
