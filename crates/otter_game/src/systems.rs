//! Systems run over every matching entity each tick.

use otter_ecs::{ComponentType, EntityView, FrameContext, StoreError, SystemId, TickLoop};
use otter_math::Vec3;

/// Default multiplier applied to velocity by [`movement`].
pub const DEFAULT_SPEED_SCALE: f32 = 10.0;

/// Integrates velocity into position:
/// `position += velocity * delta_time * speed_scale`.
pub fn movement(
    speed_scale: f32,
) -> impl FnMut(&FrameContext, &mut EntityView<'_>) -> Result<(), StoreError> + Send + 'static {
    move |frame, view| {
        let velocity = *view.get_mut::<Vec3>(ComponentType::Velocity)?;
        view.transform_mut().position += velocity * (frame.delta_time * speed_scale);
        Ok(())
    }
}

/// Register [`movement`] over every entity with a velocity.
pub fn register_movement(tick_loop: &mut TickLoop, speed_scale: f32) -> SystemId {
    tick_loop.register_system("movement", &[ComponentType::Velocity], movement(speed_scale))
}
