//! Per-frame motion integration.
//!
//! Every body is advanced with a velocity-Verlet style step:
//! `position += velocity*dt + 0.5*acceleration*dt^2`, then `velocity += acceleration*dt`.
//! Gravity is a direct positional nudge of `gravity` units down per step,
//! independent of `dt`; velocity is untouched by it. There is no collision.

use notdoom_ecs::{ComponentVec, EcsError, EntityId, PhysicsComponent, TransformComponent};
use notdoom_math::Vector3f;

use crate::config::PhysicsConfig;
use crate::{FrameContext, KernelError, World};

/// Tunables for one physics step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    /// Units the Y position drops per step for gravity-affected bodies.
    pub gravity: f32,
    /// Scale applied to the player's walking direction.
    pub movement_speed: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: PhysicsComponent::K_GRAVITY,
            movement_speed: PhysicsConfig::default().movement_speed,
        }
    }
}

impl From<&PhysicsConfig> for PhysicsParams {
    fn from(config: &PhysicsConfig) -> Self {
        Self {
            gravity: config.gravity,
            movement_speed: config.movement_speed,
        }
    }
}

/// Player input for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerInput {
    pub entity: EntityId,
    pub direction: Vector3f,
}

/// Advance every physics body by `dt` seconds.
///
/// The player's velocity is boosted by `direction * movement_speed * dt` for this step
/// only: the same boost is subtracted again afterwards, whether or not integration
/// succeeded, so walking never accumulates into residual velocity. A player without a physics body
/// ignores input. A body without a transform fails with `MissingComponent`.
pub fn step(
    physics: &mut ComponentVec<PhysicsComponent>,
    transforms: &mut ComponentVec<TransformComponent>,
    player: Option<PlayerInput>,
    params: &PhysicsParams,
    dt: f32,
) -> Result<(), EcsError> {
    let boosted = player.and_then(|input| {
        let body = physics.find_mut(input.entity)?;
        let boost = input.direction * params.movement_speed * dt;
        body.velocity += boost;
        Some((input.entity, boost))
    });

    let result = integrate(physics, transforms, params.gravity, dt);

    if let Some((entity, boost)) = boosted {
        if let Some(body) = physics.find_mut(entity) {
            body.velocity -= boost;
        }
    }
    result
}

fn integrate(
    physics: &mut ComponentVec<PhysicsComponent>,
    transforms: &mut ComponentVec<TransformComponent>,
    gravity: f32,
    dt: f32,
) -> Result<(), EcsError> {
    for body in physics.iter_mut() {
        let transform = transforms.require_mut(body.entity_id)?;
        let delta_v = body.acceleration * dt;
        transform.position += body.velocity * dt + delta_v * (0.5 * dt);
        body.velocity += delta_v;
        if body.is_affected_by_gravity {
            transform.position.y -= gravity;
        }
    }
    Ok(())
}

/// System closure stepping the world's physics with the frame's input and `dt`.
pub fn physics_system(
    params: PhysicsParams,
) -> impl FnMut(&mut World, &FrameContext) -> Result<(), KernelError> {
    move |world, ctx| {
        let player = PlayerInput {
            entity: world.player(),
            direction: ctx.movement,
        };
        let (physics, transforms) = world
            .components_mut()
            .get_pair_mut::<PhysicsComponent, TransformComponent>()?;
        step(physics, transforms, Some(player), &params, ctx.delta_time)?;
        tracing::trace!(bodies = physics.len(), dt = ctx.delta_time, "physics stepped");
        Ok(())
    }
}
