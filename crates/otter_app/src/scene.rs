//! Startup scene construction.

use otter_ecs::{Entity, StoreError, TickLoop};
use otter_game::{MaterialHandle, MeshHandle, OscillatePosition, Velocity, register_movement};
use otter_math::Transform;
use tracing::info;

use crate::config::SceneConfig;

/// Spawn the oscillating entity and register the movement system.
///
/// Component layouts must already be registered. On failure the partly
/// built entity is despawned and no system is registered.
pub fn build(tick_loop: &mut TickLoop, config: &SceneConfig) -> Result<Entity, StoreError> {
    let entity = tick_loop.spawn(Transform::from_position(config.start_position));
    if let Err(err) = populate(tick_loop, entity, config) {
        tick_loop.despawn(entity)?;
        return Err(err);
    }
    register_movement(tick_loop, config.speed_scale);

    info!(
        %entity,
        position = %config.start_position,
        velocity = %config.start_velocity,
        "scene built"
    );
    Ok(entity)
}

fn populate(tick_loop: &mut TickLoop, entity: Entity, config: &SceneConfig) -> Result<(), StoreError> {
    let store = tick_loop.store_mut();
    store.insert(entity, MeshHandle(config.mesh))?;
    store.insert(entity, MaterialHandle(config.material))?;
    store.insert(entity, Velocity(config.start_velocity))?;
    tick_loop.attach_behaviour(entity, OscillatePosition::new(config.oscillate_bound))?;
    Ok(())
}
