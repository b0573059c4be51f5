//! # otter_ecs
//!
//! The entity-component core of Otter: an authoritative store of entity
//! transforms and typed component blocks, plus the systems, behaviours and
//! tick loop that update them each frame.
//!
//! This crate provides:
//!
//! - [`Store`]: entities, transforms and component blocks behind checked
//!   accessors.
//! - [`Entity`]: lightweight `u64` handles, reused lowest-first.
//! - [`ComponentType`] / [`Component`]: the closed set of component kinds
//!   and the Rust types bound to them.
//! - [`SystemRegistry`]: callbacks run over entities matching a mask.
//! - [`Behaviour`] / [`UpdateContext`]: per-entity update logic.
//! - [`TickLoop`]: fixed-timestep driver with a configurable
//!   [`FailurePolicy`].

pub mod behaviour;
pub mod bitmap;
pub mod component;
pub mod config;
pub mod entity;
pub mod error;
pub mod list;
pub mod pool;
pub mod store;
pub mod system;
pub mod tick;

pub use behaviour::{Behaviour, BehaviourId, BehaviourSet, UpdateContext};
pub use component::{Component, ComponentLayout, ComponentMask, ComponentType};
pub use config::{FailurePolicy, TickConfig};
pub use entity::{Entity, EntityAllocator};
pub use error::{StoreError, TickError, UpdateFailure};
pub use store::{EntityView, Store};
pub use system::{FrameContext, SystemId, SystemRegistry};
pub use tick::{FrameReport, TickLoop};
