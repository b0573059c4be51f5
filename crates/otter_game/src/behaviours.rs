//! Per-entity behaviours.

use otter_ecs::{Behaviour, ComponentType, StoreError, UpdateContext};
use otter_math::Vec3;
use tracing::debug;

/// Bounces an entity back and forth along the x axis.
///
/// Once the entity passes `bound` its x velocity is pointed back towards the
/// origin; the movement system does the actual moving. Requires a
/// [`Velocity`](crate::Velocity) component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatePosition {
    /// Distance from the origin at which the direction flips.
    pub bound: f32,
}

impl OscillatePosition {
    /// Default turnaround distance.
    pub const DEFAULT_BOUND: f32 = 16.0;

    /// Create an oscillator with the given bound.
    #[must_use]
    pub fn new(bound: f32) -> Self {
        Self { bound }
    }
}

impl Default for OscillatePosition {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BOUND)
    }
}

impl Behaviour for OscillatePosition {
    fn name(&self) -> &str {
        "oscillate_position"
    }

    fn on_update(&mut self, ctx: &mut UpdateContext<'_>) -> Result<(), StoreError> {
        let entity = ctx.entity();
        let x = ctx.get_transform(entity)?.position.x;
        let mut velocity: Vec3 = ctx.get_component(entity, ComponentType::Velocity)?;

        if x > self.bound {
            velocity.x = -1.0;
        } else if x < -self.bound {
            velocity.x = 1.0;
        }

        ctx.set_component(entity, ComponentType::Velocity, &velocity)
    }
}

/// Counts its own updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCounter {
    count: u64,
}

impl UpdateCounter {
    /// Number of updates so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Behaviour for UpdateCounter {
    fn name(&self) -> &str {
        "update_counter"
    }

    fn on_update(&mut self, ctx: &mut UpdateContext<'_>) -> Result<(), StoreError> {
        self.count += 1;
        debug!(
            entity = %ctx.entity(),
            count = self.count,
            delta_time = ctx.delta_time,
            "counter updated"
        );
        Ok(())
    }
}
