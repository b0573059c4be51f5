//! Store and tick-loop error types.

use otter_math::MathError;

use crate::component::{ComponentLayout, ComponentType};
use crate::entity::Entity;

/// Errors returned by store lookups and mutations, and by the systems and
/// behaviours that use them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The handle does not refer to a live entity.
    #[error("{0} not found")]
    EntityNotFound(Entity),

    /// The entity has no component of the requested kind.
    #[error("component {component} not found on {entity}")]
    ComponentNotFound {
        /// The entity that was queried.
        entity: Entity,
        /// The missing kind.
        component: ComponentType,
    },

    /// A value's byte layout does not match the registered layout.
    #[error("type mismatch for component {component}: expected {expected} bytes, got {actual}")]
    TypeMismatch {
        /// The component kind being accessed.
        component: ComponentType,
        /// Registered block size in bytes.
        expected: usize,
        /// Size of the value supplied.
        actual: usize,
    },

    /// The component kind has not been registered with the store.
    #[error("component {0} is not registered")]
    ComponentNotRegistered(ComponentType),

    /// The component kind was registered twice.
    #[error("component {0} is already registered")]
    AlreadyRegistered(ComponentType),

    /// The entity already has a component of this kind.
    #[error("{entity} already has component {component}")]
    DuplicateComponent {
        /// The entity the component was added to.
        entity: Entity,
        /// The duplicated kind.
        component: ComponentType,
    },

    /// The layout cannot be stored (alignment above 8 bytes).
    #[error("unsupported layout for component {component}: {layout:?}")]
    UnsupportedLayout {
        /// The component kind being registered.
        component: ComponentType,
        /// The rejected layout.
        layout: ComponentLayout,
    },

    /// A raw component id did not name a known kind.
    #[error("unknown component type id {0}")]
    UnknownComponentType(u64),

    /// No system is registered under this id.
    #[error("system {0} not found")]
    SystemNotFound(u64),

    /// No behaviour with this id is attached to the entity.
    #[error("behaviour {behaviour} not found on {entity}")]
    BehaviourNotFound {
        /// The entity the behaviour was expected on.
        entity: Entity,
        /// The behaviour id.
        behaviour: u64,
    },

    /// A vector operation inside an update failed.
    #[error(transparent)]
    Math(#[from] MathError),
}

/// One per-entity update that failed during a tick.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{origin} failed on {entity} at tick {tick_id}: {source}")]
pub struct UpdateFailure {
    /// The tick during which the update ran.
    pub tick_id: u64,
    /// The entity being updated.
    pub entity: Entity,
    /// Name of the system or behaviour that failed.
    pub origin: String,
    /// The underlying error.
    #[source]
    pub source: StoreError,
}

/// Errors that stop [`TickLoop::run`](crate::TickLoop::run).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TickError {
    /// The configured tick rate cannot pace a loop.
    #[error("tick rate must be a positive finite number of ticks per second, got {0}")]
    InvalidTickRate(f64),

    /// A tick was aborted under [`FailurePolicy::Abort`](crate::FailurePolicy::Abort).
    #[error(transparent)]
    Update(#[from] UpdateFailure),
}
