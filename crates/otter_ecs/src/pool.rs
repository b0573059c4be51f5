//! Registered component kinds and their storage.

use crate::component::{ComponentLayout, ComponentType};
use crate::error::StoreError;
use crate::list::ComponentList;

/// One [`ComponentList`] per registered [`ComponentType`].
#[derive(Debug, Clone)]
pub struct ComponentPool {
    lists: [Option<ComponentList>; ComponentType::COUNT],
}

impl ComponentPool {
    /// Create a pool with no registered kinds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lists: std::array::from_fn(|_| None),
        }
    }

    /// Register the fixed layout of a component kind.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyRegistered`] if the kind has a list already, and
    /// [`StoreError::UnsupportedLayout`] if the alignment is not a power of
    /// two no larger than [`ComponentLayout::MAX_ALIGN`].
    pub fn register(&mut self, ty: ComponentType, layout: ComponentLayout) -> Result<(), StoreError> {
        if !layout.align.is_power_of_two() || layout.align > ComponentLayout::MAX_ALIGN {
            return Err(StoreError::UnsupportedLayout {
                component: ty,
                layout,
            });
        }
        let slot = &mut self.lists[ty.index()];
        if slot.is_some() {
            return Err(StoreError::AlreadyRegistered(ty));
        }
        *slot = Some(ComponentList::new(layout));
        Ok(())
    }

    /// Returns `true` if the kind has been registered.
    #[must_use]
    pub fn is_registered(&self, ty: ComponentType) -> bool {
        self.lists[ty.index()].is_some()
    }

    /// The registered layout of a kind.
    ///
    /// # Errors
    ///
    /// [`StoreError::ComponentNotRegistered`] for unknown kinds.
    pub fn layout(&self, ty: ComponentType) -> Result<ComponentLayout, StoreError> {
        self.list(ty).map(ComponentList::layout)
    }

    /// The storage list of a kind.
    ///
    /// # Errors
    ///
    /// [`StoreError::ComponentNotRegistered`] for unknown kinds.
    pub fn list(&self, ty: ComponentType) -> Result<&ComponentList, StoreError> {
        self.lists[ty.index()]
            .as_ref()
            .ok_or(StoreError::ComponentNotRegistered(ty))
    }

    /// Mutable storage list of a kind.
    ///
    /// # Errors
    ///
    /// [`StoreError::ComponentNotRegistered`] for unknown kinds.
    pub fn list_mut(&mut self, ty: ComponentType) -> Result<&mut ComponentList, StoreError> {
        self.lists[ty.index()]
            .as_mut()
            .ok_or(StoreError::ComponentNotRegistered(ty))
    }

    /// Mutable access to every registered list at once.
    pub fn lists_mut(&mut self) -> impl Iterator<Item = (ComponentType, &mut ComponentList)> {
        ComponentType::ALL
            .into_iter()
            .zip(self.lists.iter_mut())
            .filter_map(|(ty, list)| list.as_mut().map(|list| (ty, list)))
    }
}

impl Default for ComponentPool {
    fn default() -> Self {
        Self::new()
    }
}
