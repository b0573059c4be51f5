//! Per-entity behaviours and their update context.
//!
//! A [`Behaviour`] is attached to one entity and updated once per tick after
//! all systems have run. Its [`UpdateContext`] carries the frame's delta
//! time and tick id plus accessors into the store, so an update can read a
//! component, change it and write it back.

use std::collections::BTreeMap;

use bytemuck::Pod;
use otter_math::Transform;

use crate::component::ComponentType;
use crate::entity::Entity;
use crate::error::{StoreError, UpdateFailure};
use crate::store::Store;
use crate::system::FrameContext;

/// Per-entity update logic.
pub trait Behaviour: Send + 'static {
    /// Name used in logs and failure reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once per tick for the entity this behaviour is attached to.
    ///
    /// # Errors
    ///
    /// Any store or math error; how it is handled depends on the tick
    /// loop's [`FailurePolicy`](crate::FailurePolicy).
    fn on_update(&mut self, ctx: &mut UpdateContext<'_>) -> Result<(), StoreError>;
}

/// Identifier of an attached behaviour, unique for the loop's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BehaviourId(pub u64);

/// Frame data and store access for one behaviour update.
#[derive(Debug)]
pub struct UpdateContext<'a> {
    /// The current tick ID.
    pub tick_id: u64,
    /// Seconds since the previous tick.
    pub delta_time: f32,
    entity: Entity,
    store: &'a mut Store,
}

impl<'a> UpdateContext<'a> {
    /// Bind a context to the entity being updated.
    pub fn new(store: &'a mut Store, entity: Entity, frame: &FrameContext) -> Self {
        Self {
            tick_id: frame.tick_id,
            delta_time: frame.delta_time,
            entity,
            store,
        }
    }

    /// The entity being updated.
    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Mutable reference to an entity's transform.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`] if the handle is not live.
    pub fn get_transform(&mut self, entity: Entity) -> Result<&mut Transform, StoreError> {
        self.store.get_transform(entity)
    }

    /// Copy a component block out as `T`.
    ///
    /// # Errors
    ///
    /// See [`Store::component_mut`].
    pub fn get_component<T: Pod>(&self, entity: Entity, ty: ComponentType) -> Result<T, StoreError> {
        self.store.component::<T>(entity, ty).copied()
    }

    /// View a component block in place as `T`.
    ///
    /// # Errors
    ///
    /// See [`Store::component_mut`].
    pub fn component_mut<T: Pod>(
        &mut self,
        entity: Entity,
        ty: ComponentType,
    ) -> Result<&mut T, StoreError> {
        self.store.component_mut(entity, ty)
    }

    /// Overwrite a component block with `value`.
    ///
    /// # Errors
    ///
    /// See [`Store::set_component`].
    pub fn set_component<T: Pod>(
        &mut self,
        entity: Entity,
        ty: ComponentType,
        value: &T,
    ) -> Result<(), StoreError> {
        self.store.set(entity, ty, value)
    }
}

struct Attached {
    id: BehaviourId,
    behaviour: Box<dyn Behaviour>,
}

/// Behaviours attached to entities, updated in ascending entity order and
/// then attach order.
#[derive(Default)]
pub struct BehaviourSet {
    attached: BTreeMap<Entity, Vec<Attached>>,
    next_id: u64,
}

impl std::fmt::Debug for BehaviourSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviourSet")
            .field("entities", &self.attached.len())
            .field("behaviours", &self.len())
            .finish()
    }
}

impl BehaviourSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a behaviour to an entity.
    pub fn attach(&mut self, entity: Entity, behaviour: Box<dyn Behaviour>) -> BehaviourId {
        let id = BehaviourId(self.next_id);
        self.next_id += 1;
        self.attached
            .entry(entity)
            .or_default()
            .push(Attached { id, behaviour });
        id
    }

    /// Detach one behaviour.
    ///
    /// # Errors
    ///
    /// [`StoreError::BehaviourNotFound`] if the behaviour is not attached to
    /// this entity.
    pub fn detach(&mut self, entity: Entity, id: BehaviourId) -> Result<Box<dyn Behaviour>, StoreError> {
        let not_found = StoreError::BehaviourNotFound {
            entity,
            behaviour: id.0,
        };
        let list = self.attached.get_mut(&entity).ok_or_else(|| not_found.clone())?;
        let position = list
            .iter()
            .position(|attached| attached.id == id)
            .ok_or(not_found)?;
        let removed = list.remove(position);
        if list.is_empty() {
            self.attached.remove(&entity);
        }
        Ok(removed.behaviour)
    }

    /// Drop every behaviour attached to an entity. Returns how many were
    /// removed.
    pub fn detach_all(&mut self, entity: Entity) -> usize {
        self.attached.remove(&entity).map_or(0, |list| list.len())
    }

    /// Number of behaviours attached to an entity.
    #[must_use]
    pub fn count_for(&self, entity: Entity) -> usize {
        self.attached.get(&entity).map_or(0, Vec::len)
    }

    /// Total number of attached behaviours.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attached.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    /// Update every behaviour once.
    ///
    /// A failing update is handed to `on_failure`; returning `Err` from it
    /// stops the pass.
    pub(crate) fn run<H>(
        &mut self,
        store: &mut Store,
        frame: &FrameContext,
        mut on_failure: H,
    ) -> Result<(), UpdateFailure>
    where
        H: FnMut(UpdateFailure) -> Result<(), UpdateFailure>,
    {
        for (&entity, list) in &mut self.attached {
            for attached in list.iter_mut() {
                let mut ctx = UpdateContext::new(store, entity, frame);
                if let Err(source) = attached.behaviour.on_update(&mut ctx) {
                    on_failure(UpdateFailure {
                        tick_id: frame.tick_id,
                        entity,
                        origin: attached.behaviour.name().to_owned(),
                        source,
                    })?;
                }
            }
        }
        Ok(())
    }
}
