use notdoom_math::Vector3f;

use crate::{KernelError, World};

/// Per-frame inputs shared by every system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Zero-based frame counter.
    pub frame: u64,
    /// Seconds since the previous frame.
    pub delta_time: f32,
    /// Player walking direction from the input state.
    pub movement: Vector3f,
}

impl FrameContext {
    pub fn new(frame: u64, delta_time: f32, movement: Vector3f) -> Self {
        Self {
            frame,
            delta_time,
            movement,
        }
    }
}

/// A per-frame function over the world.
pub type SystemFn = Box<dyn FnMut(&mut World, &FrameContext) -> Result<(), KernelError>>;

/// Systems run once per frame in registration order.
#[derive(Default)]
pub struct Schedule {
    systems: Vec<(&'static str, SystemFn)>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_system<F>(&mut self, name: &'static str, system: F) -> &mut Self
    where
        F: FnMut(&mut World, &FrameContext) -> Result<(), KernelError> + 'static,
    {
        self.systems.push((name, Box::new(system)));
        self
    }

    /// Run every system to completion. The first failure stops the frame.
    pub fn run(&mut self, world: &mut World, ctx: &FrameContext) -> Result<(), KernelError> {
        for (name, system) in &mut self.systems {
            let _span = tracing::debug_span!("system", name = *name, frame = ctx.frame).entered();
            system(world, ctx).inspect_err(|err| {
                tracing::error!(system = *name, %err, "system failed");
            })?;
        }
        Ok(())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|(name, _)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl std::fmt::Debug for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schedule")
            .field("systems", &self.names())
            .finish()
    }
}
