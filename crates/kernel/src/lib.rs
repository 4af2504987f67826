//! Kernel: world state, physics stepping, the system schedule and the frame loop.
//!
//! # Invariants
//! - The player entity is allocated first and is never despawned by the engine.
//! - Systems run in registration order; the first error ends the frame.
//! - Every world mutation happens inside a system or an explicit `World` call.

mod clock;
pub mod config;
mod game;
pub mod physics;
pub mod scene;
mod schedule;
mod world;

pub use clock::{Clock, FixedClock, MonotonicClock};
pub use config::{ConfigError, EngineConfig};
pub use game::Game;
pub use physics::{PhysicsParams, PlayerInput, physics_system};
pub use schedule::{FrameContext, Schedule, SystemFn};
pub use world::World;

use notdoom_assets::AssetError;
use notdoom_ecs::EcsError;

/// Errors surfaced by the kernel and by systems it runs.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error(transparent)]
    Ecs(#[from] EcsError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("system {system} failed: {source}")]
    SystemFailed {
        system: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub fn crate_info() -> &'static str {
    "notdoom-kernel v0.1.0"
}
