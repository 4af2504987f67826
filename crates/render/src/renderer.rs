use notdoom_ecs::{MeshComponent, RenderComponent, TransformComponent};
use notdoom_kernel::{FrameContext, KernelError, World};

use crate::{RenderBackend, RenderError, RenderView};

/// Turns world state into one frame of renderer output.
///
/// Renderers read the world and never mutate it.
pub trait Renderer {
    type Output;

    fn render(&mut self, world: &World, view: &RenderView) -> Result<Self::Output, RenderError>;
}

/// Human-readable frame summary, for the CLI and logs.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, world: &World, view: &RenderView) -> Result<String, RenderError> {
        let components = world.components();
        let transforms = components.get::<TransformComponent>()?;
        let meshes = components.get::<MeshComponent>()?;
        let sprites = components.get::<RenderComponent>()?;

        let mut out = String::new();
        let eye = view.eye.position;
        out.push_str(&format!("=== World State (tick={}) ===\n", world.tick()));
        out.push_str(&format!("Entities: {}\n", world.entity_count()));
        out.push_str(&format!(
            "Camera: pos=({:.2}, {:.2}, {:.2})\n",
            eye.x, eye.y, eye.z
        ));

        for id in world.entities().alive() {
            let Some(transform) = transforms.find(id) else {
                continue;
            };
            let p = transform.position;
            out.push_str(&format!("  {id} pos=({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
            if id == world.player() {
                out.push_str(" player");
            }
            if let Some(mesh) = meshes.find(id) {
                out.push_str(&format!(" mesh={}", mesh.mesh_name));
            }
            if let Some(sprite) = sprites.find(id) {
                out.push_str(&format!(
                    " {:?} {}x{} texture={}",
                    sprite.kind, sprite.width, sprite.height, sprite.texture.0
                ));
            }
            out.push('\n');
        }
        Ok(out)
    }
}

/// System closure rendering each frame through the player and submitting it to `backend`.
///
/// Render failures surface as [`KernelError::SystemFailed`] naming `name`.
pub fn render_system<R, B>(
    name: &'static str,
    mut renderer: R,
    mut backend: B,
) -> impl FnMut(&mut World, &FrameContext) -> Result<(), KernelError>
where
    R: Renderer,
    B: RenderBackend<R::Output>,
{
    move |world: &mut World, _ctx: &FrameContext| {
        let world: &World = world;
        let frame = RenderView::from_world(world)
            .and_then(|view| renderer.render(world, &view))
            .and_then(|output| backend.submit(output));
        frame.map_err(|err| KernelError::SystemFailed {
            system: name,
            source: Box::new(err),
        })
    }
}
