//! Component definitions and their registration.

use bytemuck::{Pod, Zeroable};
use otter_ecs::{Component, ComponentType, Store, StoreError};
use otter_math::Vec3;
use serde::{Deserialize, Serialize};

/// Linear velocity in world units per second.
///
/// Laid out exactly as a [`Vec3`], so updates may also read the block as a
/// plain vector.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Velocity(pub Vec3);

impl Velocity {
    /// Zero velocity.
    pub const ZERO: Self = Self(Vec3::ZERO);

    /// Create a new velocity.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }
}

impl Component for Velocity {
    const TYPE: ComponentType = ComponentType::Velocity;
}

/// Opaque handle to a mesh asset owned by the renderer.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
pub struct MeshHandle(pub u64);

impl Component for MeshHandle {
    const TYPE: ComponentType = ComponentType::Mesh;
}

/// Opaque handle to a material asset owned by the renderer.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
pub struct MaterialHandle(pub u64);

impl Component for MaterialHandle {
    const TYPE: ComponentType = ComponentType::Material;
}

/// Register the layout of every game component with the store.
///
/// # Errors
///
/// [`StoreError::AlreadyRegistered`] if any kind was registered before.
pub fn register_components(store: &mut Store) -> Result<(), StoreError> {
    store.register::<MeshHandle>()?;
    store.register::<MaterialHandle>()?;
    store.register::<Velocity>()?;
    Ok(())
}
