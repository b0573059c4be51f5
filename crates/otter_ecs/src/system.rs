//! System registry.
//!
//! A system is a named callback paired with a [`ComponentMask`]. Every tick
//! it runs once for each entity whose components include the mask, in
//! ascending entity order. Entities with extra components still match.

use crate::component::{ComponentMask, ComponentType};
use crate::error::{StoreError, UpdateFailure};
use crate::store::{EntityView, Store};

/// Per-tick data handed to systems and behaviours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// The current tick ID.
    pub tick_id: u64,
    /// Seconds since the previous tick.
    pub delta_time: f32,
}

impl FrameContext {
    /// Create a context for one tick.
    #[must_use]
    pub fn new(tick_id: u64, delta_time: f32) -> Self {
        Self {
            tick_id,
            delta_time,
        }
    }
}

/// Identifier of a registered system. Freed ids are reused lowest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub u64);

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "System({})", self.0)
    }
}

/// Boxed system callback.
pub type SystemFn =
    Box<dyn FnMut(&FrameContext, &mut EntityView<'_>) -> Result<(), StoreError> + Send>;

struct SystemEntry {
    name: String,
    mask: ComponentMask,
    run: SystemFn,
}

impl std::fmt::Debug for SystemEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemEntry")
            .field("name", &self.name)
            .field("mask", &self.mask)
            .finish_non_exhaustive()
    }
}

/// Registry of all systems run by the tick loop.
#[derive(Debug, Default)]
pub struct SystemRegistry {
    /// Indexed by [`SystemId`]; `None` marks a free id.
    entries: Vec<Option<SystemEntry>>,
}

impl SystemRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system that runs on every entity having all of `types`.
    pub fn register<F>(&mut self, name: impl Into<String>, types: &[ComponentType], f: F) -> SystemId
    where
        F: FnMut(&FrameContext, &mut EntityView<'_>) -> Result<(), StoreError> + Send + 'static,
    {
        let entry = SystemEntry {
            name: name.into(),
            mask: ComponentMask::from_types(types),
            run: Box::new(f),
        };
        let index = match self.entries.iter().position(Option::is_none) {
            Some(index) => {
                self.entries[index] = Some(entry);
                index
            }
            None => {
                self.entries.push(Some(entry));
                self.entries.len() - 1
            }
        };
        SystemId(index as u64)
    }

    /// Remove a system.
    ///
    /// # Errors
    ///
    /// [`StoreError::SystemNotFound`] if no system has this id.
    pub fn deregister(&mut self, id: SystemId) -> Result<(), StoreError> {
        self.entries
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .ok_or(StoreError::SystemNotFound(id.0))?;
        while matches!(self.entries.last(), Some(None)) {
            self.entries.pop();
        }
        Ok(())
    }

    /// The name of a registered system.
    #[must_use]
    pub fn name(&self, id: SystemId) -> Option<&str> {
        self.entry(id).map(|entry| entry.name.as_str())
    }

    /// The component mask of a registered system.
    #[must_use]
    pub fn mask(&self, id: SystemId) -> Option<ComponentMask> {
        self.entry(id).map(|entry| entry.mask)
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// Returns `true` if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered ids in execution order.
    pub fn ids(&self) -> impl Iterator<Item = SystemId> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_some())
            .map(|(index, _)| SystemId(index as u64))
    }

    /// Run every system once, in ascending id order.
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
        for entry in self.entries.iter_mut().flatten() {
            let SystemEntry { name, mask, run } = entry;
            store.visit_matching(*mask, |mut view| match run(frame, &mut view) {
                Ok(()) => Ok(()),
                Err(source) => on_failure(UpdateFailure {
                    tick_id: frame.tick_id,
                    entity: view.entity(),
                    origin: name.clone(),
                    source,
                }),
            })?;
        }
        Ok(())
    }

    fn entry(&self, id: SystemId) -> Option<&SystemEntry> {
        self.entries.get(id.0 as usize).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use otter_math::Vec3;

    use super::*;

    fn noop(_: &FrameContext, _: &mut EntityView<'_>) -> Result<(), StoreError> {
        Ok(())
    }

    fn velocity_store() -> Store {
        let mut store = Store::new();
        store
            .register_component(ComponentType::Velocity, crate::ComponentLayout::of::<Vec3>())
            .unwrap();
        store
            .register_component(ComponentType::Mesh, crate::ComponentLayout::of::<u64>())
            .unwrap();
        store
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut registry = SystemRegistry::new();
        let a = registry.register("a", &[ComponentType::Velocity], noop);
        let b = registry.register("b", &[], noop);
        assert_eq!((a, b), (SystemId(0), SystemId(1)));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.name(b), Some("b"));
        assert_eq!(
            registry.mask(a),
            Some(ComponentMask::from_types(&[ComponentType::Velocity]))
        );
    }

    #[test]
    fn test_deregister_reuses_lowest_id() {
        let mut registry = SystemRegistry::new();
        let a = registry.register("a", &[], noop);
        let _b = registry.register("b", &[], noop);
        registry.deregister(a).unwrap();
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![SystemId(1)]);
        assert_eq!(registry.register("c", &[], noop), SystemId(0));
    }

    #[test]
    fn test_deregister_unknown() {
        let mut registry = SystemRegistry::new();
        assert_eq!(
            registry.deregister(SystemId(3)),
            Err(StoreError::SystemNotFound(3))
        );
    }

    #[test]
    fn test_system_matches_supersets_only() {
        let mut store = velocity_store();
        let plain = store.create_entity();
        let moving = store.create_entity();
        let moving_mesh = store.create_entity();
        store.add_component(moving, ComponentType::Velocity).unwrap();
        store.add_component(moving_mesh, ComponentType::Velocity).unwrap();
        store.add_component(moving_mesh, ComponentType::Mesh).unwrap();
        store.add_component(plain, ComponentType::Mesh).unwrap();

        let mut registry = SystemRegistry::new();
        registry.register("mark", &[ComponentType::Velocity], |frame, view| {
            view.transform_mut().position.x = frame.tick_id as f32;
            Ok(())
        });

        registry
            .run(&mut store, &FrameContext::new(7, 0.1), Err)
            .unwrap();

        assert_eq!(store.transform(plain).unwrap().position.x, 0.0);
        assert_eq!(store.transform(moving).unwrap().position.x, 7.0);
        assert_eq!(store.transform(moving_mesh).unwrap().position.x, 7.0);
    }

    #[test]
    fn test_failure_is_reported_with_origin() {
        let mut store = velocity_store();
        let e = store.create_entity();
        store.add_component(e, ComponentType::Velocity).unwrap();

        let mut registry = SystemRegistry::new();
        registry.register("broken", &[ComponentType::Velocity], |_, view| {
            view.get_mut::<u64>(ComponentType::Mesh).map(|_| ())
        });

        let failure = registry
            .run(&mut store, &FrameContext::new(1, 0.1), Err)
            .unwrap_err();
        assert_eq!(failure.origin, "broken");
        assert_eq!(failure.entity, e);
        assert!(matches!(failure.source, StoreError::ComponentNotFound { .. }));
    }
}
