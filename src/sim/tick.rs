//! Fixed timestep simulation tick
//!
//! Drains one frame's worth of resolved input and contact reports into the
//! scene, then advances it. Input is applied before contacts so a drag that
//! lands under a drop this frame still counts.

use glam::Vec2;

use super::contact::Contact;
use super::scene::Scene;
use crate::persistence::ContinueStore;

/// A resolved pointer event in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Moved(Vec2),
    Up(Vec2),
}

/// Everything that happened since the last tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub pointer: Vec<PointerEvent>,
    pub contacts: Vec<Contact>,
}

/// Advance the scene by one fixed timestep
pub fn tick<S: ContinueStore>(scene: &mut Scene<S>, input: &TickInput, dt: f32) {
    for event in &input.pointer {
        match *event {
            PointerEvent::Down(pos) => scene.pointer_down(pos),
            PointerEvent::Moved(pos) => scene.pointer_moved(pos),
            PointerEvent::Up(pos) => scene.pointer_up(pos),
        }
    }

    for contact in &input.contacts {
        scene.handle_contact(contact);
    }

    scene.update(dt);
}
