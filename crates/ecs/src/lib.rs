//! Minimal entity-component model: id allocation plus one dense array per component kind.
//!
//! Component kinds are registered once and then looked up by type. Storage for a kind is
//! an insertion-ordered `Vec` scanned linearly by entity id; entity counts are in the tens.
//!
//! # Invariants
//! - The allocator always hands out the lowest free id.
//! - At most one component of a kind per entity is expected but not enforced on insert.
//! - Destroying an entity id leaves its components in place.
//! - Misuse (double registration, unknown kind, out-of-range id, missing paired
//!   component) is reported as an [`EcsError`], never a panic.

mod components;
mod entity;
mod storage;

pub use components::{
    MeshComponent, PhysicsComponent, RenderComponent, RenderableKind, TextureHandle,
    TransformComponent,
};
pub use entity::{EntityAllocator, EntityId};
pub use storage::{Component, ComponentRegistry, ComponentVec};

/// Errors from entity and component operations.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    #[error("component kind {0} is already registered")]
    AlreadyRegistered(&'static str),
    #[error("component kind {0} is not registered")]
    NotRegistered(&'static str),
    #[error("entity {entity} is out of range (allocator holds {capacity} ids)")]
    EntityOutOfRange { entity: EntityId, capacity: usize },
    #[error("entity {entity} has no {kind} component")]
    MissingComponent {
        entity: EntityId,
        kind: &'static str,
    },
    #[error("component kind {0} cannot be borrowed twice at once")]
    AliasedStorage(&'static str),
}

pub fn crate_info() -> &'static str {
    "notdoom-ecs v0.1.0"
}
