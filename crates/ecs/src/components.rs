use notdoom_math::{Quaternionf, Transformf, Vector3f};
use serde::{Deserialize, Serialize};

use crate::{Component, EntityId};

/// Handle to a texture owned by the texture resource manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// World-space placement of an entity. `rotation` should stay unit-norm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformComponent {
    pub entity_id: EntityId,
    pub position: Vector3f,
    pub rotation: Quaternionf,
    pub scale: Vector3f,
}

impl TransformComponent {
    pub fn new(entity_id: EntityId, transform: Transformf) -> Self {
        Self {
            entity_id,
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
        }
    }

    /// Identity rotation and unit scale at `position`.
    pub fn at(entity_id: EntityId, position: Vector3f) -> Self {
        Self::new(entity_id, Transformf::from_position(position))
    }

    pub fn transform(&self) -> Transformf {
        Transformf::new(self.position, self.rotation, self.scale)
    }
}

impl Component for TransformComponent {
    const KIND: &'static str = "Transform";

    fn entity_id(&self) -> EntityId {
        self.entity_id
    }
}

/// Linear motion state integrated by the physics system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsComponent {
    pub entity_id: EntityId,
    pub velocity: Vector3f,
    pub acceleration: Vector3f,
    pub is_affected_by_gravity: bool,
}

impl PhysicsComponent {
    /// Downward position nudge applied once per step to gravity-affected bodies.
    pub const K_GRAVITY: f32 = 0.1;

    /// At rest and not affected by gravity.
    pub fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            velocity: Vector3f::zero(),
            acceleration: Vector3f::zero(),
            is_affected_by_gravity: false,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector3f) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vector3f) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.is_affected_by_gravity = affected;
        self
    }
}

impl Component for PhysicsComponent {
    const KIND: &'static str = "Physics";

    fn entity_id(&self) -> EntityId {
        self.entity_id
    }
}

/// Drawable referencing a cached mesh by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshComponent {
    pub entity_id: EntityId,
    pub mesh_name: String,
}

impl MeshComponent {
    pub fn new(entity_id: EntityId, mesh_name: impl Into<String>) -> Self {
        Self {
            entity_id,
            mesh_name: mesh_name.into(),
        }
    }
}

impl Component for MeshComponent {
    const KIND: &'static str = "Mesh";

    fn entity_id(&self) -> EntityId {
        self.entity_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderableKind {
    /// Always faces the camera.
    Sprite,
    /// Oriented by the entity's rotation.
    Quad,
}

/// Textured rectangle drawn by the sprite renderer. Size is in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderComponent {
    pub entity_id: EntityId,
    pub kind: RenderableKind,
    pub texture: TextureHandle,
    pub width: f32,
    pub height: f32,
}

impl Component for RenderComponent {
    const KIND: &'static str = "Render";

    fn entity_id(&self) -> EntityId {
        self.entity_id
    }
}
