//! Textured quads and billboards projected on the CPU into screen-space triangle grids.
//!
//! Each quad is cut into cells no larger than `tile_length` pixels on screen. Grid points
//! are interpolated in camera space and projected one by one, so the affine texture
//! mapping inside a cell stays close to the perspective-correct result.
//!
//! # Invariants
//! - A drawable with any corner outside `[-far, -near]` in camera-space Z is culled whole.
//! - Quads are placed by the same model matrix as meshes ([`Matrix4x4f::from_transform`]);
//!   sprites face the camera and only take the entity's position and scale.
//! - Draws are ordered farthest first; equal depths keep component order.

use bytemuck::{Pod, Zeroable};
use notdoom_ecs::{EntityId, RenderComponent, RenderableKind, TextureHandle, TransformComponent};
use notdoom_kernel::{EngineConfig, World};
use notdoom_math::{Matrix4x4f, Vector2f, Vector3f};

use crate::{Camera, RenderError, RenderView, Renderer};

/// Upper bound on grid cells along one edge of a quad.
pub const MAX_CELLS_PER_EDGE: u32 = 64;

/// Screen-space vertex; `position` is in pixels from the top-left corner.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

/// One tessellated drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub entity: EntityId,
    pub texture: TextureHandle,
    /// Camera-space Z of the drawable's origin.
    pub depth: f32,
    pub columns: u32,
    pub rows: u32,
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
}

impl SpriteDraw {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// A frame's sprite draws in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpriteFrame {
    pub draws: Vec<SpriteDraw>,
    /// Drawables dropped by depth culling.
    pub culled: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRenderer {
    camera: Camera,
    projection: Matrix4x4f,
    viewport: Vector2f,
    tile_length: f32,
}

impl SpriteRenderer {
    pub fn new(camera: Camera, viewport: Vector2f, tile_length: f32) -> Self {
        Self {
            camera,
            projection: camera.projection(),
            viewport,
            tile_length,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let window = &config.window;
        Self::new(
            Camera::from_config(&config.camera, window.aspect_ratio()),
            Vector2f::new(window.width as f32, window.height as f32),
            config.render.tile_length,
        )
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Project a camera-space point to pixel coordinates, y down.
    pub fn to_screen(&self, point: Vector3f) -> Vector2f {
        let ndc = self.projection.rotate_point(point);
        Vector2f::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        )
    }

    fn cells_along(&self, a: f32, b: f32) -> u32 {
        let pixels = a.max(b);
        ((pixels / self.tile_length).ceil() as u32).clamp(1, MAX_CELLS_PER_EDGE)
    }

    /// Tessellate every visible drawable as seen through `view`, farthest first.
    pub fn prepare(&self, world: &World, view: &RenderView) -> Result<SpriteFrame, RenderError> {
        let components = world.components();
        let transforms = components.get::<TransformComponent>()?;
        let mut frame = SpriteFrame::default();

        for drawable in components.get::<RenderComponent>()? {
            let transform = transforms.require(drawable.entity_id)?;
            let model = Matrix4x4f::from_transform(&transform.transform());
            let centre = match drawable.kind {
                RenderableKind::Sprite => view.to_camera_space(transform.position),
                RenderableKind::Quad => view.to_camera_space(model.rotate_point(Vector3f::zero())),
            };
            let (hw, hh) = (drawable.width * 0.5, drawable.height * 0.5);
            let scale = transform.scale;
            // top-left, top-right, bottom-right, bottom-left
            let corners = [(-hw, hh), (hw, hh), (hw, -hh), (-hw, -hh)].map(|(x, y)| {
                match drawable.kind {
                    RenderableKind::Sprite => {
                        centre + Vector3f::new(x * scale.x, y * scale.y, 0.0)
                    }
                    RenderableKind::Quad => {
                        view.to_camera_space(model.rotate_point(Vector3f::new(x, y, 0.0)))
                    }
                }
            });

            if corners.iter().any(|c| !self.camera.in_depth_range(c.z)) {
                tracing::trace!(entity = %drawable.entity_id, "sprite culled");
                frame.culled += 1;
                continue;
            }
            frame.draws.push(self.tessellate(drawable, centre.z, corners));
        }

        frame.draws.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        tracing::debug!(
            draws = frame.draws.len(),
            culled = frame.culled,
            "sprite frame built"
        );
        Ok(frame)
    }

    fn tessellate(
        &self,
        drawable: &RenderComponent,
        depth: f32,
        corners: [Vector3f; 4],
    ) -> SpriteDraw {
        let [tl, tr, br, bl] = corners;
        let screen = corners.map(|c| self.to_screen(c));
        let edge = |a: usize, b: usize| (screen[a] - screen[b]).length();
        let columns = self.cells_along(edge(0, 1), edge(3, 2));
        let rows = self.cells_along(edge(0, 3), edge(1, 2));

        let mut vertices = Vec::with_capacity(((columns + 1) * (rows + 1)) as usize);
        for j in 0..=rows {
            let v = j as f32 / rows as f32;
            for i in 0..=columns {
                let u = i as f32 / columns as f32;
                let point = tl.lerp(tr, u).lerp(bl.lerp(br, u), v);
                let position = self.to_screen(point);
                vertices.push(SpriteVertex {
                    position: [position.x, position.y],
                    tex_coord: [u, v],
                });
            }
        }

        let stride = columns + 1;
        let mut indices = Vec::with_capacity((columns * rows * 6) as usize);
        for j in 0..rows {
            for i in 0..columns {
                let top = j * stride + i;
                let bottom = top + stride;
                indices.extend_from_slice(&[top, bottom, top + 1, top + 1, bottom, bottom + 1]);
            }
        }

        SpriteDraw {
            entity: drawable.entity_id,
            texture: drawable.texture,
            depth,
            columns,
            rows,
            vertices,
            indices,
        }
    }
}

impl Renderer for SpriteRenderer {
    type Output = SpriteFrame;

    fn render(&mut self, world: &World, view: &RenderView) -> Result<SpriteFrame, RenderError> {
        self.prepare(world, view)
    }
}
