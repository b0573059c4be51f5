//! Game-side components, behaviours and systems for the Otter core.
//!
//! Components here satisfy the [`Component`](otter_ecs::Component) contract:
//! `#[repr(C)]` or `#[repr(transparent)]` plain-old-data types bound to one
//! [`ComponentType`](otter_ecs::ComponentType) each.

pub mod behaviours;
pub mod components;
pub mod systems;

pub use behaviours::{OscillatePosition, UpdateCounter};
pub use components::{MaterialHandle, MeshHandle, Velocity, register_components};
pub use systems::{DEFAULT_SPEED_SCALE, movement, register_movement};
