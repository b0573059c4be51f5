//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight `u64` identifier with no inherent data.
//! Identifiers are slot indices handed out by the [`EntityAllocator`].

use serde::{Deserialize, Serialize};

use crate::bitmap::BitMap;

/// A unique entity identifier.
///
/// Entities are pure identifiers; their transform and components live in the
/// [`Store`](crate::Store). A handle stays valid until the entity is
/// destroyed, after which its slot may be handed to a new entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity(u64::MAX);

    /// Create an entity from a raw `u64` identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` unless this is [`Entity::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u64::MAX
    }

    /// The slot index backing this handle.
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates entity IDs, always handing out the lowest free slot.
///
/// Live slots are tracked in a [`BitMap`]; freeing the highest live entities
/// shrinks the map again.
#[derive(Debug, Clone, Default)]
pub struct EntityAllocator {
    live: BitMap,
    count: u64,
}

impl EntityAllocator {
    /// Creates an empty allocator. The first entity is `Entity(0)`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the lowest free entity ID.
    pub fn allocate(&mut self) -> Entity {
        let index = self.live.find_first_unset();
        self.live.set(index, true);
        self.count += 1;
        Entity(index as u64)
    }

    /// Releases an entity ID. Returns `false` if it was not live.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.live.set(entity.index(), false);
        self.live.compact();
        self.count -= 1;
        true
    }

    /// Returns `true` if the entity is currently allocated.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        entity.is_valid() && self.live.get(entity.index())
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Iterate live entities in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.live.iter_set().map(|index| Entity(index as u64))
    }
}
