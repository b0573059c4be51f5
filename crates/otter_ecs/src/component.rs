//! Component kinds, layouts and the [`Component`] trait.
//!
//! Component kinds form the closed [`ComponentType`] enumeration. Each kind
//! is registered with the store together with its fixed [`ComponentLayout`];
//! every block of that kind is exactly that many bytes. Rust types that
//! describe a block implement [`Component`], which ties the type to its kind
//! so typed access can be checked statically.

use bytemuck::Pod;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// The kinds of component the store knows about.
///
/// Adding a kind means extending this enum and registering its layout with
/// the store during startup.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentType {
    /// Handle to a renderable mesh asset.
    Mesh = 0,
    /// Handle to a material asset.
    Material = 1,
    /// Linear velocity, laid out as a `Vec3`.
    Velocity = 2,
}

impl ComponentType {
    /// Every component kind, in index order.
    pub const ALL: [ComponentType; 3] = [Self::Mesh, Self::Material, Self::Velocity];

    /// Number of component kinds.
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index of this kind, used for storage and masks.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mesh => "Mesh",
            Self::Material => "Material",
            Self::Velocity => "Velocity",
        }
    }
}

// The mask is a single word.
const _: () = assert!(ComponentType::COUNT <= 64);

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u64> for ComponentType {
    type Error = StoreError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.index() as u64 == raw)
            .ok_or(StoreError::UnknownComponentType(raw))
    }
}

/// A set of component kinds, one bit per [`ComponentType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentMask(pub u64);

impl ComponentMask {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Build a mask from a list of kinds.
    #[must_use]
    pub fn from_types(types: &[ComponentType]) -> Self {
        types.iter().copied().collect()
    }

    /// Add a kind to the set.
    pub fn insert(&mut self, ty: ComponentType) {
        self.0 |= 1 << ty.index();
    }

    /// Remove a kind from the set.
    pub fn remove(&mut self, ty: ComponentType) {
        self.0 &= !(1 << ty.index());
    }

    /// Returns `true` if the kind is in the set.
    #[must_use]
    pub const fn contains(self, ty: ComponentType) -> bool {
        self.0 & (1 << ty.index()) != 0
    }

    /// Returns `true` if every kind in `other` is also in `self`.
    #[must_use]
    pub const fn contains_all(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the kinds in the set, in index order.
    pub fn iter(self) -> impl Iterator<Item = ComponentType> {
        ComponentType::ALL
            .into_iter()
            .filter(move |&ty| self.contains(ty))
    }
}

impl FromIterator<ComponentType> for ComponentMask {
    fn from_iter<I: IntoIterator<Item = ComponentType>>(iter: I) -> Self {
        let mut mask = Self::EMPTY;
        for ty in iter {
            mask.insert(ty);
        }
        mask
    }
}

/// Fixed byte layout of one component block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLayout {
    /// Size in bytes.
    pub size: usize,
    /// Required alignment in bytes.
    pub align: usize,
}

impl ComponentLayout {
    /// Largest alignment component storage can honour.
    pub const MAX_ALIGN: usize = std::mem::align_of::<u64>();

    /// Layout of a Rust type.
    #[must_use]
    pub const fn of<T>() -> Self {
        Self {
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
        }
    }
}

/// A Rust type describing the block of one [`ComponentType`].
///
/// Components are plain old data so they can be viewed in place inside the
/// store's byte storage.
///
/// # Examples
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
/// use otter_ecs::{Component, ComponentType};
///
/// #[repr(C)]
/// #[derive(Debug, Clone, Copy, Pod, Zeroable)]
/// struct Velocity {
///     x: f32,
///     y: f32,
///     z: f32,
/// }
///
/// impl Component for Velocity {
///     const TYPE: ComponentType = ComponentType::Velocity;
/// }
/// ```
pub trait Component: Pod + Send + Sync + 'static {
    /// The kind this type describes.
    const TYPE: ComponentType;

    /// The layout to register for [`Component::TYPE`].
    fn layout() -> ComponentLayout {
        ComponentLayout::of::<Self>()
    }
}
