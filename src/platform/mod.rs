//! Platform abstraction layer
//!
//! Stand-ins for the collaborators a shipping build gets from its engine and
//! vendors, so the game can run headless:
//! - Contact reports (physics engine)
//! - Pointer input (touch screen)
//! - Rewarded ads (ad SDK)

pub mod ad_network;
pub mod autopilot;
pub mod probe;

pub use ad_network::SimulatedAdNetwork;
pub use autopilot::Autopilot;
pub use probe::probe_contacts;
