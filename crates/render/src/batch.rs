//! Batched mesh rendering: one indirect draw per distinct mesh, one matrix per instance.

use bytemuck::{Pod, Zeroable};
use notdoom_assets::{COLOR_COMPONENTS, MeshCache, POSITION_COMPONENTS};
use notdoom_ecs::{EntityId, MeshComponent, TransformComponent};
use notdoom_kernel::World;
use notdoom_math::Matrix4x4f;
use std::collections::BTreeMap;

use crate::{RenderError, RenderView, Renderer};

/// Layout-compatible with the GL `DrawElementsIndirectCommand` record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawElementsIndirectCommand {
    /// Indices drawn per instance.
    pub count: u32,
    pub instance_count: u32,
    /// Offset into the shared index buffer, in indices.
    pub first_index: u32,
    /// Added to every index before vertex fetch.
    pub base_vertex: i32,
    /// First row of the instance matrix buffer used by this draw.
    pub base_instance: u32,
}

/// Column-major model-view matrix for one instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_view: [[f32; 4]; 4],
}

impl From<Matrix4x4f> for InstanceData {
    fn from(m: Matrix4x4f) -> Self {
        let column = |c: usize| [m.at(0, c), m.at(1, c), m.at(2, c), m.at(3, c)];
        Self {
            model_view: [column(0), column(1), column(2), column(3)],
        }
    }
}

/// Everything one frame of batched drawing needs, ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    /// Packed xyz positions of every distinct mesh.
    pub vertices: Vec<f32>,
    /// Packed rgba colors, parallel to `vertices`.
    pub colors: Vec<f32>,
    /// Mesh-local indices; each command's `base_vertex` rebases them.
    pub indices: Vec<u16>,
    pub commands: Vec<DrawElementsIndirectCommand>,
    /// `view * model` per instance, grouped in command order.
    pub instances: Vec<Matrix4x4f>,
}

impl DrawList {
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn command_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.commands)
    }

    pub fn instance_data(&self) -> Vec<InstanceData> {
        self.instances.iter().copied().map(InstanceData::from).collect()
    }
}

/// Groups mesh instances by name and packs their geometry into shared buffers.
#[derive(Debug)]
pub struct BatchedRenderer {
    meshes: MeshCache,
    max_instances: usize,
}

impl BatchedRenderer {
    pub fn new(max_instances: usize) -> Self {
        Self {
            meshes: MeshCache::new(),
            max_instances,
        }
    }

    pub fn max_instances(&self) -> usize {
        self.max_instances
    }

    /// Build the frame's draw list as seen through `view`.
    ///
    /// Meshes are visited in name order. Unknown mesh names are skipped with a warning.
    pub fn prepare(&mut self, world: &World, view: &RenderView) -> Result<DrawList, RenderError> {
        let components = world.components();
        let transforms = components.get::<TransformComponent>()?;

        let mut groups: BTreeMap<&str, Vec<EntityId>> = BTreeMap::new();
        for mesh in components.get::<MeshComponent>()? {
            groups
                .entry(mesh.mesh_name.as_str())
                .or_default()
                .push(mesh.entity_id);
        }

        let mut list = DrawList::default();
        for (name, entities) in groups {
            let Some(mesh) = self.meshes.get(name) else {
                continue;
            };
            let first_instance = list.instances.len();
            if first_instance + entities.len() > self.max_instances {
                return Err(RenderError::TooManyInstances {
                    count: first_instance + entities.len(),
                    max: self.max_instances,
                });
            }

            let command = DrawElementsIndirectCommand {
                count: mesh.index_count() as u32,
                instance_count: entities.len() as u32,
                first_index: list.indices.len() as u32,
                base_vertex: (list.vertices.len() / POSITION_COMPONENTS) as i32,
                base_instance: first_instance as u32,
            };
            list.vertices.extend_from_slice(&mesh.vertices);
            list.colors.extend_from_slice(&mesh.colors);
            list.indices.extend_from_slice(&mesh.indices);
            debug_assert_eq!(
                list.vertices.len() / POSITION_COMPONENTS,
                list.colors.len() / COLOR_COMPONENTS
            );

            for entity in entities {
                let model = Matrix4x4f::from_transform(&transforms.require(entity)?.transform());
                list.instances.push(view.view * model);
            }
            list.commands.push(command);
        }

        tracing::debug!(
            draws = list.commands.len(),
            instances = list.instances.len(),
            "mesh draw list built"
        );
        Ok(list)
    }
}

impl Renderer for BatchedRenderer {
    type Output = DrawList;

    fn render(&mut self, world: &World, view: &RenderView) -> Result<DrawList, RenderError> {
        self.prepare(world, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notdoom_assets::Mesh;
    use notdoom_math::Vector3f;

    fn world_with(meshes: &[(&str, Vector3f)]) -> World {
        let mut world = World::with_builtin_components().unwrap();
        for (name, position) in meshes {
            let id = world.spawn();
            world.insert(TransformComponent::at(id, *position)).unwrap();
            world.insert(MeshComponent::new(id, *name)).unwrap();
        }
        world
    }

    #[test]
    fn one_command_per_mesh_in_name_order() {
        let world = world_with(&[
            ("pyramid", Vector3f::zero()),
            ("cube", Vector3f::new(1.0, 0.0, 0.0)),
            ("pyramid", Vector3f::new(2.0, 0.0, 0.0)),
            ("cube", Vector3f::new(3.0, 0.0, 0.0)),
            ("cube", Vector3f::new(4.0, 0.0, 0.0)),
        ]);
        let list = BatchedRenderer::new(100)
            .prepare(&world, &RenderView::default())
            .unwrap();

        let cube = Mesh::cube();
        let pyramid = Mesh::pyramid();
        assert_eq!(
            list.commands,
            vec![
                DrawElementsIndirectCommand {
                    count: cube.index_count() as u32,
                    instance_count: 3,
                    first_index: 0,
                    base_vertex: 0,
                    base_instance: 0,
                },
                DrawElementsIndirectCommand {
                    count: pyramid.index_count() as u32,
                    instance_count: 2,
                    first_index: cube.index_count() as u32,
                    base_vertex: cube.vertex_count() as i32,
                    base_instance: 3,
                },
            ]
        );
        assert_eq!(
            list.vertices.len(),
            (cube.vertex_count() + pyramid.vertex_count()) * POSITION_COMPONENTS
        );
        assert_eq!(list.indices.len(), 36 + 18);
        // instances follow command order: cubes at x = 1, 3, 4 then pyramids at 0, 2
        let xs: Vec<f32> = list.instances.iter().map(|m| m.at(0, 3)).collect();
        assert_eq!(xs, vec![1.0, 3.0, 4.0, 0.0, 2.0]);
    }

    #[test]
    fn instances_are_view_times_model() {
        let world = world_with(&[("cube", Vector3f::new(0.0, 0.0, -2.0))]);
        let view = RenderView::from_eye(notdoom_math::Transformf::from_position(Vector3f::new(
            0.0, 0.0, 3.0,
        )));
        let list = BatchedRenderer::new(10).prepare(&world, &view).unwrap();
        let origin = list.instances[0].rotate_point(Vector3f::zero());
        assert_eq!(origin, Vector3f::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn unknown_meshes_are_skipped() {
        let world = world_with(&[("teapot", Vector3f::zero()), ("cube", Vector3f::zero())]);
        let list = BatchedRenderer::new(10)
            .prepare(&world, &RenderView::default())
            .unwrap();
        assert_eq!(list.commands.len(), 1);
        assert_eq!(list.instance_count(), 1);
    }

    #[test]
    fn instance_limit_is_enforced() {
        let world = world_with(&[
            ("cube", Vector3f::zero()),
            ("cube", Vector3f::zero()),
            ("cube", Vector3f::zero()),
        ]);
        let err = BatchedRenderer::new(2)
            .prepare(&world, &RenderView::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::TooManyInstances { count: 3, max: 2 }));
    }

    #[test]
    fn mesh_without_transform_fails() {
        let mut world = World::with_builtin_components().unwrap();
        let id = world.spawn();
        world.insert(MeshComponent::new(id, "cube")).unwrap();
        let err = BatchedRenderer::new(10)
            .prepare(&world, &RenderView::default())
            .unwrap_err();
        assert!(err.to_string().contains("has no Transform"));
    }

    #[test]
    fn upload_views() {
        let world = world_with(&[("cube", Vector3f::new(1.0, 2.0, 3.0))]);
        let list = BatchedRenderer::new(10)
            .prepare(&world, &RenderView::default())
            .unwrap();
        assert_eq!(
            list.command_bytes().len(),
            std::mem::size_of::<DrawElementsIndirectCommand>()
        );
        assert_eq!(std::mem::size_of::<DrawElementsIndirectCommand>(), 20);
        let data = list.instance_data();
        assert_eq!(data[0].model_view[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
