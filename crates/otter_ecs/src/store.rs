//! The entity-component store.
//!
//! [`Store`] is the single owner of every entity's [`Transform`] and
//! component blocks. Entities are addressed by [`Entity`] handles and every
//! access goes through a checked accessor: unknown handles, missing
//! components and mismatched layouts come back as [`StoreError`]s.
//!
//! References handed out by the store point straight into its storage, so a
//! write through them is visible to every later lookup. Mutations are
//! validated before any byte is written, which keeps a failed update from
//! leaving partial state behind.
//!
//! The store does no locking of its own. Exclusive access is expressed with
//! `&mut self`; hosts that share a store between threads wrap it in a lock.

use bytemuck::Pod;
use otter_math::Transform;
use tracing::debug;

use crate::component::{Component, ComponentLayout, ComponentMask, ComponentType};
use crate::entity::{Entity, EntityAllocator};
use crate::error::StoreError;
use crate::pool::ComponentPool;

/// Per-entity bookkeeping: the transform and the slot of each component.
#[derive(Debug, Clone)]
struct EntityRecord {
    transform: Transform,
    slots: [Option<usize>; ComponentType::COUNT],
}

impl EntityRecord {
    fn new(transform: Transform) -> Self {
        Self {
            transform,
            slots: [None; ComponentType::COUNT],
        }
    }

    fn mask(&self) -> ComponentMask {
        ComponentType::ALL
            .into_iter()
            .filter(|ty| self.slots[ty.index()].is_some())
            .collect()
    }
}

/// Authoritative storage for entities, transforms and components.
#[derive(Debug, Clone, Default)]
pub struct Store {
    allocator: EntityAllocator,
    /// Indexed by entity id; `None` marks a free slot.
    records: Vec<Option<EntityRecord>>,
    pool: ComponentPool,
    /// Handles destroyed since the last [`Store::drain_destroyed`].
    destroyed: Vec<Entity>,
}

impl Store {
    /// Create an empty store with no registered component kinds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Registration --

    /// Register the fixed byte layout of a component kind.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyRegistered`] or [`StoreError::UnsupportedLayout`].
    pub fn register_component(
        &mut self,
        ty: ComponentType,
        layout: ComponentLayout,
    ) -> Result<(), StoreError> {
        self.pool.register(ty, layout)?;
        debug!(component = %ty, size = layout.size, align = layout.align, "component registered");
        Ok(())
    }

    /// Register the layout of a typed component.
    ///
    /// # Errors
    ///
    /// See [`Store::register_component`].
    pub fn register<C: Component>(&mut self) -> Result<(), StoreError> {
        self.register_component(C::TYPE, C::layout())
    }

    /// Returns `true` if the kind has a registered layout.
    #[must_use]
    pub fn is_registered(&self, ty: ComponentType) -> bool {
        self.pool.is_registered(ty)
    }

    /// The registered layout of a kind.
    ///
    /// # Errors
    ///
    /// [`StoreError::ComponentNotRegistered`] for unknown kinds.
    pub fn layout(&self, ty: ComponentType) -> Result<ComponentLayout, StoreError> {
        self.pool.layout(ty)
    }

    // -- Entity lifecycle --

    /// Create an entity with the identity transform and no components.
    pub fn create_entity(&mut self) -> Entity {
        self.create_entity_with(Transform::IDENTITY)
    }

    /// Create an entity with the given transform and no components.
    pub fn create_entity_with(&mut self, transform: Transform) -> Entity {
        let entity = self.allocator.allocate();
        let index = entity.index();
        if index >= self.records.len() {
            self.records.resize_with(index + 1, || None);
        }
        self.records[index] = Some(EntityRecord::new(transform));
        debug!(%entity, "entity created");
        entity
    }

    /// Destroy an entity and release all of its components.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`] if the handle is not live.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), StoreError> {
        let record = self
            .records
            .get_mut(entity.index())
            .and_then(Option::take)
            .ok_or(StoreError::EntityNotFound(entity))?;

        for (ty, list) in self.pool.lists_mut() {
            if let Some(slot) = record.slots[ty.index()] {
                list.deallocate(slot);
            }
        }
        self.allocator.free(entity);
        if !self.destroyed.contains(&entity) {
            self.destroyed.push(entity);
        }

        while matches!(self.records.last(), Some(None)) {
            self.records.pop();
        }
        debug!(%entity, "entity destroyed");
        Ok(())
    }

    /// Take the handles destroyed since the previous call, oldest first.
    /// Each handle appears at most once.
    ///
    /// Owners of per-entity state kept outside the store use this to drop
    /// it before a destroyed handle is handed out again.
    pub fn drain_destroyed(&mut self) -> impl Iterator<Item = Entity> + '_ {
        self.destroyed.drain(..)
    }

    /// Returns `true` if the handle refers to a live entity.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.record(entity).is_ok()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allocator.count() as usize
    }

    /// Returns `true` if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entities in ascending handle order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.allocator.iter()
    }

    // -- Transforms --

    /// Mutable reference to an entity's transform.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`] if the handle is not live.
    pub fn get_transform(&mut self, entity: Entity) -> Result<&mut Transform, StoreError> {
        Ok(&mut self.record_mut(entity)?.transform)
    }

    /// Shared reference to an entity's transform.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`] if the handle is not live.
    pub fn transform(&self, entity: Entity) -> Result<&Transform, StoreError> {
        Ok(&self.record(entity)?.transform)
    }

    // -- Components --

    /// Attach a zero-filled component block to an entity.
    ///
    /// This is the only way a component comes into existence; setters never
    /// create one.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`], [`StoreError::ComponentNotRegistered`]
    /// or [`StoreError::DuplicateComponent`].
    pub fn add_component(
        &mut self,
        entity: Entity,
        ty: ComponentType,
    ) -> Result<&mut [u8], StoreError> {
        let record = self
            .records
            .get_mut(entity.index())
            .and_then(Option::as_mut)
            .ok_or(StoreError::EntityNotFound(entity))?;
        let list = self.pool.list_mut(ty)?;
        let slot = &mut record.slots[ty.index()];
        if slot.is_some() {
            return Err(StoreError::DuplicateComponent {
                entity,
                component: ty,
            });
        }

        let index = list.allocate();
        *slot = Some(index);
        debug!(%entity, component = %ty, slot = index, "component added");
        list.get_mut(index).ok_or(StoreError::ComponentNotFound {
            entity,
            component: ty,
        })
    }

    /// Attach a typed component with an initial value.
    ///
    /// # Errors
    ///
    /// See [`Store::add_component`].
    pub fn insert<C: Component>(&mut self, entity: Entity, value: C) -> Result<(), StoreError> {
        let layout = self.pool.layout(C::TYPE)?;
        check_size::<C>(C::TYPE, layout.size)?;
        self.add_component(entity, C::TYPE)?
            .copy_from_slice(bytemuck::bytes_of(&value));
        Ok(())
    }

    /// Detach and release a component.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`] or [`StoreError::ComponentNotFound`].
    pub fn remove_component(&mut self, entity: Entity, ty: ComponentType) -> Result<(), StoreError> {
        let record = self
            .records
            .get_mut(entity.index())
            .and_then(Option::as_mut)
            .ok_or(StoreError::EntityNotFound(entity))?;
        let slot = record.slots[ty.index()].ok_or(StoreError::ComponentNotFound {
            entity,
            component: ty,
        })?;
        self.pool.list_mut(ty)?.deallocate(slot);
        record.slots[ty.index()] = None;
        debug!(%entity, component = %ty, "component removed");
        Ok(())
    }

    /// Returns `true` if the entity is live and has a component of this kind.
    #[must_use]
    pub fn has_component(&self, entity: Entity, ty: ComponentType) -> bool {
        self.record(entity)
            .is_ok_and(|record| record.slots[ty.index()].is_some())
    }

    /// The set of component kinds attached to an entity.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`] if the handle is not live.
    pub fn component_mask(&self, entity: Entity) -> Result<ComponentMask, StoreError> {
        Ok(self.record(entity)?.mask())
    }

    /// Mutable, type-erased view of a component block.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`] or [`StoreError::ComponentNotFound`].
    pub fn get_component(
        &mut self,
        entity: Entity,
        ty: ComponentType,
    ) -> Result<&mut [u8], StoreError> {
        let not_found = StoreError::ComponentNotFound {
            entity,
            component: ty,
        };
        let slot = self.record(entity)?.slots[ty.index()].ok_or_else(|| not_found.clone())?;
        self.pool.list_mut(ty)?.get_mut(slot).ok_or(not_found)
    }

    /// Shared, type-erased view of a component block.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`] or [`StoreError::ComponentNotFound`].
    pub fn component_bytes(&self, entity: Entity, ty: ComponentType) -> Result<&[u8], StoreError> {
        let not_found = StoreError::ComponentNotFound {
            entity,
            component: ty,
        };
        let slot = self.record(entity)?.slots[ty.index()].ok_or_else(|| not_found.clone())?;
        self.pool.list(ty)?.get(slot).ok_or(not_found)
    }

    /// View a component block as `T`.
    ///
    /// # Errors
    ///
    /// As [`Store::get_component`], plus [`StoreError::TypeMismatch`] when
    /// `T` does not fit the registered layout.
    pub fn component_mut<T: Pod>(
        &mut self,
        entity: Entity,
        ty: ComponentType,
    ) -> Result<&mut T, StoreError> {
        cast_mut(ty, self.get_component(entity, ty)?)
    }

    /// Read a component block as `T`.
    ///
    /// # Errors
    ///
    /// See [`Store::component_mut`].
    pub fn component<T: Pod>(&self, entity: Entity, ty: ComponentType) -> Result<&T, StoreError> {
        cast_ref(ty, self.component_bytes(entity, ty)?)
    }

    /// Typed shared access through the [`Component`] binding.
    ///
    /// # Errors
    ///
    /// See [`Store::component_mut`].
    pub fn get<C: Component>(&self, entity: Entity) -> Result<&C, StoreError> {
        self.component(entity, C::TYPE)
    }

    /// Typed mutable access through the [`Component`] binding.
    ///
    /// # Errors
    ///
    /// See [`Store::component_mut`].
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C, StoreError> {
        self.component_mut(entity, C::TYPE)
    }

    /// Overwrite a whole component block.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`], [`StoreError::ComponentNotFound`]
    /// (components are never created here) or [`StoreError::TypeMismatch`]
    /// if `bytes` is not exactly the registered size.
    pub fn set_component(
        &mut self,
        entity: Entity,
        ty: ComponentType,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        let block = self.get_component(entity, ty)?;
        if block.len() != bytes.len() {
            return Err(StoreError::TypeMismatch {
                component: ty,
                expected: block.len(),
                actual: bytes.len(),
            });
        }
        block.copy_from_slice(bytes);
        Ok(())
    }

    /// Overwrite a component block with a typed value.
    ///
    /// # Errors
    ///
    /// See [`Store::set_component`].
    pub fn set<T: Pod>(&mut self, entity: Entity, ty: ComponentType, value: &T) -> Result<(), StoreError> {
        self.set_component(entity, ty, bytemuck::bytes_of(value))
    }

    // -- Iteration --

    /// Call `f` for every entity whose components include all of `mask`, in
    /// ascending handle order.
    ///
    /// The view carries the entity's transform and the blocks of the kinds
    /// in `mask`. Iteration stops at the first error `f` returns.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `f`.
    pub fn visit_matching<E, F>(&mut self, mask: ComponentMask, mut f: F) -> Result<(), E>
    where
        F: FnMut(EntityView<'_>) -> Result<(), E>,
    {
        let Self { records, pool, .. } = self;
        for (index, record) in records.iter_mut().enumerate() {
            let Some(record) = record else {
                continue;
            };
            if !record.mask().contains_all(mask) {
                continue;
            }

            let EntityRecord { transform, slots } = record;
            let mut components: [Option<&mut [u8]>; ComponentType::COUNT] = Default::default();
            for (ty, list) in pool.lists_mut() {
                if mask.contains(ty)
                    && let Some(slot) = slots[ty.index()]
                {
                    components[ty.index()] = list.get_mut(slot);
                }
            }

            f(EntityView {
                entity: Entity::from_raw(index as u64),
                transform,
                components,
            })?;
        }
        Ok(())
    }

    fn record(&self, entity: Entity) -> Result<&EntityRecord, StoreError> {
        self.records
            .get(entity.index())
            .and_then(Option::as_ref)
            .ok_or(StoreError::EntityNotFound(entity))
    }

    fn record_mut(&mut self, entity: Entity) -> Result<&mut EntityRecord, StoreError> {
        self.records
            .get_mut(entity.index())
            .and_then(Option::as_mut)
            .ok_or(StoreError::EntityNotFound(entity))
    }
}

/// Mutable access to one entity's transform and a chosen set of its
/// component blocks, handed out by [`Store::visit_matching`].
#[derive(Debug)]
pub struct EntityView<'a> {
    entity: Entity,
    transform: &'a mut Transform,
    /// Indexed by [`ComponentType::index`]; only the requested kinds are set.
    components: [Option<&'a mut [u8]>; ComponentType::COUNT],
}

impl EntityView<'_> {
    /// The entity being viewed.
    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// The entity's transform.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        self.transform
    }

    /// Mutable access to the entity's transform.
    pub fn transform_mut(&mut self) -> &mut Transform {
        self.transform
    }

    /// Mutable type-erased block of a kind in the view.
    ///
    /// # Errors
    ///
    /// [`StoreError::ComponentNotFound`] if the kind is not part of the view.
    pub fn bytes_mut(&mut self, ty: ComponentType) -> Result<&mut [u8], StoreError> {
        let entity = self.entity;
        self.components[ty.index()]
            .as_deref_mut()
            .ok_or(StoreError::ComponentNotFound {
                entity,
                component: ty,
            })
    }

    /// View a block in the view as `T`.
    ///
    /// # Errors
    ///
    /// [`StoreError::ComponentNotFound`] or [`StoreError::TypeMismatch`].
    pub fn get_mut<T: Pod>(&mut self, ty: ComponentType) -> Result<&mut T, StoreError> {
        cast_mut(ty, self.bytes_mut(ty)?)
    }

    /// Typed access through the [`Component`] binding.
    ///
    /// # Errors
    ///
    /// See [`EntityView::get_mut`].
    pub fn component_mut<C: Component>(&mut self) -> Result<&mut C, StoreError> {
        self.get_mut(C::TYPE)
    }
}

fn check_size<T>(component: ComponentType, expected: usize) -> Result<(), StoreError> {
    let actual = std::mem::size_of::<T>();
    if actual != expected {
        return Err(StoreError::TypeMismatch {
            component,
            expected,
            actual,
        });
    }
    Ok(())
}

fn cast_mut<T: Pod>(component: ComponentType, bytes: &mut [u8]) -> Result<&mut T, StoreError> {
    check_size::<T>(component, bytes.len())?;
    let expected = bytes.len();
    bytemuck::try_from_bytes_mut(bytes).map_err(|_| StoreError::TypeMismatch {
        component,
        expected,
        actual: std::mem::size_of::<T>(),
    })
}

fn cast_ref<T: Pod>(component: ComponentType, bytes: &[u8]) -> Result<&T, StoreError> {
    check_size::<T>(component, bytes.len())?;
    bytemuck::try_from_bytes(bytes).map_err(|_| StoreError::TypeMismatch {
        component,
        expected: bytes.len(),
        actual: std::mem::size_of::<T>(),
    })
}

#[cfg(test)]
mod tests {
    use bytemuck::{Pod, Zeroable};
    use otter_math::Vec3;

    use super::*;

    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    struct Velocity(Vec3);

    impl Component for Velocity {
        const TYPE: ComponentType = ComponentType::Velocity;
    }

    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    struct MeshId(u64);

    impl Component for MeshId {
        const TYPE: ComponentType = ComponentType::Mesh;
    }

    fn make_store() -> Store {
        let mut store = Store::new();
        store.register::<Velocity>().unwrap();
        store.register::<MeshId>().unwrap();
        store
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_store_is_send_and_sync() {
        assert_send_sync::<Store>();
    }

    #[test]
    fn test_shared_store_serializes_writers() {
        let store = std::sync::Mutex::new(make_store());
        let entities: Vec<_> = {
            let mut guard = store.lock().unwrap();
            (0..4)
                .map(|_| {
                    let e = guard.create_entity();
                    guard.insert(e, Velocity(Vec3::ZERO)).unwrap();
                    e
                })
                .collect()
        };

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for &e in &entities {
                        for _ in 0..100 {
                            let mut guard = store.lock().unwrap();
                            guard.get_mut::<Velocity>(e).unwrap().0.x += 1.0;
                        }
                    }
                });
            }
        });

        let store = store.into_inner().unwrap();
        for e in entities {
            assert_eq!(store.get::<Velocity>(e).unwrap().0.x, 800.0);
        }
    }

    #[test]
    fn test_create_entity_sequential() {
        let mut store = Store::new();
        assert_eq!(store.create_entity(), Entity(0));
        assert_eq!(store.create_entity(), Entity(1));
        assert_eq!(store.create_entity(), Entity(2));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_destroyed_slot_is_reused() {
        let mut store = Store::new();
        let e1 = store.create_entity();
        let e2 = store.create_entity();
        let e3 = store.create_entity();

        store.destroy_entity(e2).unwrap();
        assert!(!store.contains(e2));

        let e4 = store.create_entity();
        let e5 = store.create_entity();
        assert_eq!(
            (e1, e2, e3, e4, e5),
            (Entity(0), Entity(1), Entity(2), Entity(1), Entity(3))
        );
    }

    #[test]
    fn test_destroy_all_entities() {
        let mut store = make_store();
        let entities: Vec<_> = (0..3).map(|_| store.create_entity()).collect();
        store.insert(entities[1], Velocity(Vec3::X)).unwrap();
        for entity in entities {
            store.destroy_entity(entity).unwrap();
        }
        assert!(store.is_empty());
        assert_eq!(store.entities().count(), 0);
    }

    #[test]
    fn test_drain_destroyed() {
        let mut store = Store::new();
        let a = store.create_entity();
        let b = store.create_entity();
        store.destroy_entity(b).unwrap();
        store.destroy_entity(a).unwrap();

        assert_eq!(store.drain_destroyed().collect::<Vec<_>>(), vec![b, a]);
        assert_eq!(store.drain_destroyed().count(), 0);
    }

    #[test]
    fn test_destroy_unknown_entity() {
        let mut store = Store::new();
        assert_eq!(
            store.destroy_entity(Entity(4)),
            Err(StoreError::EntityNotFound(Entity(4)))
        );
    }

    #[test]
    fn test_new_entity_has_identity_transform() {
        let mut store = Store::new();
        let e = store.create_entity();
        assert_eq!(*store.transform(e).unwrap(), Transform::IDENTITY);
    }

    #[test]
    fn test_transform_mutation_is_visible() {
        let mut store = Store::new();
        let e = store.create_entity();
        for v in [17.0, -3.5, 0.0, 1e6] {
            store.get_transform(e).unwrap().position.x = v;
            assert_eq!(store.get_transform(e).unwrap().position.x, v);
        }
    }

    #[test]
    fn test_get_transform_unknown_entity() {
        let mut store = Store::new();
        assert_eq!(
            store.get_transform(Entity(0)).unwrap_err(),
            StoreError::EntityNotFound(Entity(0))
        );
    }

    #[test]
    fn test_add_and_get_component() {
        let mut store = make_store();
        let e = store.create_entity();

        let block = store.add_component(e, ComponentType::Velocity).unwrap();
        assert_eq!(block.len(), 12);
        assert!(block.iter().all(|&b| b == 0));
        assert!(store.has_component(e, ComponentType::Velocity));
        assert_eq!(*store.get::<Velocity>(e).unwrap(), Velocity(Vec3::ZERO));
    }

    #[test]
    fn test_missing_component_is_an_error() {
        let mut store = make_store();
        let e = store.create_entity();
        assert_eq!(
            store.component_mut::<Vec3>(e, ComponentType::Velocity).unwrap_err(),
            StoreError::ComponentNotFound {
                entity: e,
                component: ComponentType::Velocity
            }
        );
    }

    #[test]
    fn test_get_component_unknown_entity() {
        let mut store = make_store();
        assert_eq!(
            store.get_component(Entity(9), ComponentType::Velocity).unwrap_err(),
            StoreError::EntityNotFound(Entity(9))
        );
    }

    #[test]
    fn test_add_unregistered_component() {
        let mut store = Store::new();
        let e = store.create_entity();
        assert_eq!(
            store.add_component(e, ComponentType::Material).unwrap_err(),
            StoreError::ComponentNotRegistered(ComponentType::Material)
        );
    }

    #[test]
    fn test_add_duplicate_component() {
        let mut store = make_store();
        let e = store.create_entity();
        store.insert(e, Velocity(Vec3::X)).unwrap();
        assert!(matches!(
            store.add_component(e, ComponentType::Velocity),
            Err(StoreError::DuplicateComponent { .. })
        ));
        assert_eq!(*store.get::<Velocity>(e).unwrap(), Velocity(Vec3::X));
    }

    #[test]
    fn test_in_place_component_mutation() {
        let mut store = make_store();
        let e = store.create_entity();
        store.insert(e, Velocity(Vec3::new(1.0, 0.0, 0.0))).unwrap();

        store
            .component_mut::<Vec3>(e, ComponentType::Velocity)
            .unwrap()
            .x = -1.0;

        assert_eq!(
            *store.component::<Vec3>(e, ComponentType::Velocity).unwrap(),
            Vec3::new(-1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_set_component_overwrites() {
        let mut store = make_store();
        let e = store.create_entity();
        store.insert(e, Velocity(Vec3::ZERO)).unwrap();

        store
            .set(e, ComponentType::Velocity, &Vec3::new(4.0, 5.0, 6.0))
            .unwrap();
        assert_eq!(store.get::<Velocity>(e).unwrap().0, Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_set_component_size_mismatch() {
        let mut store = make_store();
        let e = store.create_entity();
        store.insert(e, Velocity(Vec3::ONE)).unwrap();

        assert_eq!(
            store.set(e, ComponentType::Velocity, &1.0f64),
            Err(StoreError::TypeMismatch {
                component: ComponentType::Velocity,
                expected: 12,
                actual: 8
            })
        );
        assert_eq!(store.get::<Velocity>(e).unwrap().0, Vec3::ONE);
    }

    #[test]
    fn test_set_component_never_creates() {
        let mut store = make_store();
        let e = store.create_entity();
        assert!(matches!(
            store.set(e, ComponentType::Velocity, &Vec3::ONE),
            Err(StoreError::ComponentNotFound { .. })
        ));
        assert!(!store.has_component(e, ComponentType::Velocity));
    }

    #[test]
    fn test_typed_view_size_mismatch() {
        let mut store = make_store();
        let e = store.create_entity();
        store.insert(e, MeshId(3)).unwrap();
        assert!(matches!(
            store.component_mut::<Vec3>(e, ComponentType::Mesh),
            Err(StoreError::TypeMismatch { expected: 8, actual: 12, .. })
        ));
    }

    #[test]
    fn test_remove_component() {
        let mut store = make_store();
        let e = store.create_entity();
        store.insert(e, MeshId(1)).unwrap();
        store.remove_component(e, ComponentType::Mesh).unwrap();

        assert!(!store.has_component(e, ComponentType::Mesh));
        assert!(matches!(
            store.remove_component(e, ComponentType::Mesh),
            Err(StoreError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_components_are_isolated_per_entity() {
        let mut store = make_store();
        let a = store.create_entity();
        let b = store.create_entity();
        store.insert(a, Velocity(Vec3::X)).unwrap();
        store.insert(b, Velocity(Vec3::Y)).unwrap();

        store.get_mut::<Velocity>(a).unwrap().0 = Vec3::Z;

        assert_eq!(store.get::<Velocity>(a).unwrap().0, Vec3::Z);
        assert_eq!(store.get::<Velocity>(b).unwrap().0, Vec3::Y);
    }

    #[test]
    fn test_component_survives_other_entity_destroy() {
        let mut store = make_store();
        let a = store.create_entity();
        let b = store.create_entity();
        store.insert(a, Velocity(Vec3::X)).unwrap();
        store.insert(b, Velocity(Vec3::Y)).unwrap();

        store.destroy_entity(a).unwrap();
        assert_eq!(store.get::<Velocity>(b).unwrap().0, Vec3::Y);

        let c = store.create_entity();
        assert_eq!(c, a);
        assert!(!store.has_component(c, ComponentType::Velocity));
    }

    #[test]
    fn test_component_mask() {
        let mut store = make_store();
        let e = store.create_entity();
        store.insert(e, MeshId(1)).unwrap();
        store.insert(e, Velocity(Vec3::ZERO)).unwrap();
        assert_eq!(
            store.component_mask(e).unwrap(),
            ComponentMask::from_types(&[ComponentType::Mesh, ComponentType::Velocity])
        );
    }

    #[test]
    fn test_visit_matching_filters_by_mask() {
        let mut store = make_store();
        let moving = store.create_entity();
        let still = store.create_entity();
        let both = store.create_entity();
        store.insert(moving, Velocity(Vec3::X)).unwrap();
        store.insert(still, MeshId(7)).unwrap();
        store.insert(both, Velocity(Vec3::Y)).unwrap();
        store.insert(both, MeshId(8)).unwrap();

        let mut visited = Vec::new();
        store
            .visit_matching(
                ComponentMask::from_types(&[ComponentType::Velocity]),
                |mut view| {
                    let velocity = view.component_mut::<Velocity>()?.0;
                    view.transform_mut().position += velocity;
                    visited.push(view.entity());
                    Ok::<_, StoreError>(())
                },
            )
            .unwrap();

        assert_eq!(visited, vec![moving, both]);
        assert_eq!(store.transform(moving).unwrap().position, Vec3::X);
        assert_eq!(store.transform(still).unwrap().position, Vec3::ZERO);
        assert_eq!(store.transform(both).unwrap().position, Vec3::Y);
    }

    #[test]
    fn test_visit_view_excludes_unrequested_kinds() {
        let mut store = make_store();
        let e = store.create_entity();
        store.insert(e, Velocity(Vec3::X)).unwrap();
        store.insert(e, MeshId(1)).unwrap();

        let result = store.visit_matching(
            ComponentMask::from_types(&[ComponentType::Velocity]),
            |mut view| view.component_mut::<MeshId>().map(|_| ()),
        );
        assert!(matches!(result, Err(StoreError::ComponentNotFound { .. })));
    }

    #[test]
    fn test_visit_stops_at_first_error() {
        let mut store = make_store();
        for _ in 0..3 {
            let e = store.create_entity();
            store.insert(e, Velocity(Vec3::ZERO)).unwrap();
        }
        let mut calls = 0;
        let result = store.visit_matching(ComponentMask::EMPTY, |view| {
            calls += 1;
            if view.entity() == Entity(1) {
                Err("boom")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(calls, 2);
    }
}
