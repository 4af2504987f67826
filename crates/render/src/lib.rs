//! Rendering: turns world state into draw data for a graphics backend.
//!
//! Two renderers share the camera: a batched mesh renderer producing one indirect draw per
//! mesh, and a sprite renderer tessellating textured quads in screen space. Submission to a
//! graphics API sits behind [`RenderBackend`].
//!
//! # Invariants
//! - Renderers never mutate the world.
//! - The view is derived from the player's transform every frame.
//! - Output order is deterministic for a given world.

mod backend;
mod batch;
mod camera;
mod renderer;
mod sprite;

pub use backend::{RecordingBackend, RenderBackend};
pub use batch::{BatchedRenderer, DrawElementsIndirectCommand, DrawList, InstanceData};
pub use camera::{Camera, RenderView};
pub use renderer::{DebugTextRenderer, Renderer, render_system};
pub use sprite::{MAX_CELLS_PER_EDGE, SpriteDraw, SpriteFrame, SpriteRenderer, SpriteVertex};

use notdoom_ecs::EcsError;

/// Errors from building or submitting a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Ecs(#[from] EcsError),
    #[error("{count} mesh instances exceed the limit of {max}")]
    TooManyInstances { count: usize, max: usize },
    #[error("backend error: {0}")]
    Backend(String),
}

pub fn crate_info() -> &'static str {
    "notdoom-render v0.1.0"
}
