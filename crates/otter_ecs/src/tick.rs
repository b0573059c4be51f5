//! Fixed-timestep tick loop.
//!
//! Each tick:
//!
//! 1. Drop behaviours of destroyed entities and advance the tick counter.
//! 2. Run every system over its matching entities, in ascending system id.
//! 3. Update every behaviour, in ascending entity then attach order.
//! 4. Apply the [`FailurePolicy`] to any update that failed.

use std::time::Instant;

use otter_math::Transform;
use tracing::{debug, info, trace, warn};

use crate::behaviour::{Behaviour, BehaviourId, BehaviourSet};
use crate::component::ComponentType;
use crate::config::{FailurePolicy, TickConfig};
use crate::entity::Entity;
use crate::error::{StoreError, TickError, UpdateFailure};
use crate::store::{EntityView, Store};
use crate::system::{FrameContext, SystemId, SystemRegistry};

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// The tick that ran.
    pub tick_id: u64,
    /// Delta time the tick ran with.
    pub delta_time: f32,
    /// Updates that failed and were skipped.
    pub failures: Vec<UpdateFailure>,
}

impl FrameReport {
    /// Returns `true` if every update succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns the store, systems and behaviours and drives them tick by tick.
#[derive(Debug)]
pub struct TickLoop {
    /// Current tick counter.
    tick_id: u64,
    config: TickConfig,
    store: Store,
    systems: SystemRegistry,
    behaviours: BehaviourSet,
}

impl TickLoop {
    /// Create a tick loop around an empty store.
    #[must_use]
    pub fn new(config: TickConfig) -> Self {
        Self::with_store(config, Store::new())
    }

    /// Create a tick loop around an existing store.
    #[must_use]
    pub fn with_store(config: TickConfig, store: Store) -> Self {
        Self {
            tick_id: 0,
            config,
            store,
            systems: SystemRegistry::new(),
            behaviours: BehaviourSet::new(),
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns the loop configuration.
    #[must_use]
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Returns a reference to the store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns a mutable reference to the store.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Returns the system registry.
    #[must_use]
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    /// Returns the attached behaviours.
    #[must_use]
    pub fn behaviours(&self) -> &BehaviourSet {
        &self.behaviours
    }

    /// Create an entity with the given transform.
    ///
    /// The new entity never inherits behaviours from an earlier entity that
    /// held the same handle.
    pub fn spawn(&mut self, transform: Transform) -> Entity {
        self.reap_destroyed();
        self.store.create_entity_with(transform)
    }

    /// Destroy an entity together with its behaviours.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`] if the handle is not live.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), StoreError> {
        self.store.destroy_entity(entity)?;
        self.reap_destroyed();
        debug!(%entity, "entity despawned");
        Ok(())
    }

    /// Drop the behaviours of every entity destroyed through the store since
    /// the last call, including ones destroyed via [`TickLoop::store_mut`].
    fn reap_destroyed(&mut self) {
        for entity in self.store.drain_destroyed() {
            let dropped = self.behaviours.detach_all(entity);
            if dropped > 0 {
                debug!(%entity, behaviours = dropped, "behaviours of destroyed entity dropped");
            }
        }
    }

    /// Register a system over entities having all of `types`.
    pub fn register_system<F>(
        &mut self,
        name: impl Into<String>,
        types: &[ComponentType],
        f: F,
    ) -> SystemId
    where
        F: FnMut(&FrameContext, &mut EntityView<'_>) -> Result<(), StoreError> + Send + 'static,
    {
        let name = name.into();
        let id = self.systems.register(name.clone(), types, f);
        info!(system = %name, %id, "system registered");
        id
    }

    /// Remove a system.
    ///
    /// # Errors
    ///
    /// [`StoreError::SystemNotFound`] if no system has this id.
    pub fn deregister_system(&mut self, id: SystemId) -> Result<(), StoreError> {
        self.systems.deregister(id)?;
        info!(%id, "system deregistered");
        Ok(())
    }

    /// Attach a behaviour to a live entity.
    ///
    /// # Errors
    ///
    /// [`StoreError::EntityNotFound`] if the handle is not live.
    pub fn attach_behaviour<B: Behaviour>(
        &mut self,
        entity: Entity,
        behaviour: B,
    ) -> Result<BehaviourId, StoreError> {
        if !self.store.contains(entity) {
            return Err(StoreError::EntityNotFound(entity));
        }
        self.reap_destroyed();
        let id = self.behaviours.attach(entity, Box::new(behaviour));
        debug!(%entity, behaviour = id.0, "behaviour attached");
        Ok(id)
    }

    /// Detach a behaviour from an entity.
    ///
    /// # Errors
    ///
    /// [`StoreError::BehaviourNotFound`] if it is not attached there.
    pub fn detach_behaviour(&mut self, entity: Entity, id: BehaviourId) -> Result<(), StoreError> {
        self.behaviours.detach(entity, id)?;
        debug!(%entity, behaviour = id.0, "behaviour detached");
        Ok(())
    }

    /// Run one tick of the simulation.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], the first failed update. Under
    /// [`FailurePolicy::Skip`] failures are collected in the report instead.
    pub fn tick(&mut self, delta_time: f32) -> Result<FrameReport, UpdateFailure> {
        self.reap_destroyed();
        self.tick_id += 1;
        let frame = FrameContext::new(self.tick_id, delta_time);

        trace!(
            tick_id = self.tick_id,
            delta_time,
            systems = self.systems.len(),
            behaviours = self.behaviours.len(),
            "tick start"
        );

        let policy = self.config.failure_policy;
        let mut failures = Vec::new();
        let mut on_failure = |failure: UpdateFailure| match policy {
            FailurePolicy::Skip => {
                warn!(
                    tick_id = failure.tick_id,
                    entity = %failure.entity,
                    origin = %failure.origin,
                    error = %failure.source,
                    "update failed, skipping"
                );
                failures.push(failure);
                Ok(())
            }
            FailurePolicy::Abort => Err(failure),
        };

        self.systems.run(&mut self.store, &frame, &mut on_failure)?;
        self.behaviours.run(&mut self.store, &frame, &mut on_failure)?;

        Ok(FrameReport {
            tick_id: self.tick_id,
            delta_time,
            failures,
        })
    }

    /// Run the tick loop for the configured number of ticks, or indefinitely.
    ///
    /// Every tick uses the fixed delta time `1 / tick_rate`; the loop sleeps
    /// off whatever is left of each tick's budget.
    ///
    /// # Errors
    ///
    /// [`TickError::InvalidTickRate`] before the first tick if the rate
    /// cannot pace the loop, or [`TickError::Update`] with the failure that
    /// aborted a tick under [`FailurePolicy::Abort`].
    pub fn run(&mut self) -> Result<(), TickError> {
        let tick_duration = self.config.tick_duration()?;
        let delta_time = self.config.delta_time();
        let mut tick_count = 0u64;
        let mut skipped = 0usize;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            failure_policy = ?self.config.failure_policy,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            let report = self.tick(delta_time)?;
            skipped += report.failures.len();

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, skipped_updates = skipped, "tick loop complete");
                return Ok(());
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }
}
