use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Floats per vertex position.
pub const POSITION_COMPONENTS: usize = 3;
/// Floats per vertex color (RGBA).
pub const COLOR_COMPONENTS: usize = 4;

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
const PURPLE: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

/// Indexed triangle geometry with one RGBA color per vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Flat `x, y, z` triples.
    pub vertices: Vec<f32>,
    /// Flat `r, g, b, a` quadruples, one per vertex.
    pub colors: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / POSITION_COMPONENTS
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Unit cube centred on the origin, one color per face.
    pub fn cube() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            // front
            -0.5,  0.5,  0.5,
            -0.5, -0.5,  0.5,
             0.5,  0.5,  0.5,
             0.5, -0.5,  0.5,
            // back
            -0.5,  0.5, -0.5,
             0.5,  0.5, -0.5,
            -0.5, -0.5, -0.5,
             0.5, -0.5, -0.5,
            // left
            -0.5,  0.5, -0.5,
            -0.5, -0.5, -0.5,
            -0.5,  0.5,  0.5,
            -0.5, -0.5,  0.5,
            // right
             0.5,  0.5, -0.5,
             0.5,  0.5,  0.5,
             0.5, -0.5, -0.5,
             0.5, -0.5,  0.5,
            // top
            -0.5,  0.5, -0.5,
            -0.5,  0.5,  0.5,
             0.5,  0.5, -0.5,
             0.5,  0.5,  0.5,
            // bottom
            -0.5, -0.5, -0.5,
             0.5, -0.5, -0.5,
            -0.5, -0.5,  0.5,
             0.5, -0.5,  0.5,
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 2, 1, 3,
            4, 5, 6, 7, 6, 5,
            8, 9, 10, 10, 9, 11,
            12, 13, 14, 15, 14, 13,
            16, 17, 18, 18, 17, 19,
            20, 21, 22, 23, 22, 21,
        ];
        Self {
            vertices,
            colors: face_colors(&[
                (RED, 4),
                (GREEN, 4),
                (BLUE, 4),
                (YELLOW, 4),
                (CYAN, 4),
                (PURPLE, 4),
            ]),
            indices,
        }
    }

    /// Square-based pyramid spanning `[-1, 1]` on every axis, apex at `+y`.
    pub fn pyramid() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            // base
            -1.0, -1.0,  1.0,
             1.0, -1.0,  1.0,
            -1.0, -1.0, -1.0,
             1.0, -1.0, -1.0,
            // front
            -1.0, -1.0,  1.0,
             1.0, -1.0,  1.0,
             0.0,  1.0,  0.0,
            // back
            -1.0, -1.0, -1.0,
             1.0, -1.0, -1.0,
             0.0,  1.0,  0.0,
            // left
            -1.0, -1.0, -1.0,
            -1.0, -1.0,  1.0,
             0.0,  1.0,  0.0,
            // right
             1.0, -1.0, -1.0,
             1.0, -1.0,  1.0,
             0.0,  1.0,  0.0,
        ];
        #[rustfmt::skip]
        let indices = vec![
            2, 1, 0,
            2, 3, 1,
            4, 5, 6,
            8, 7, 9,
            10, 11, 12,
            14, 13, 15,
        ];
        Self {
            vertices,
            colors: face_colors(&[(RED, 4), (GREEN, 3), (BLUE, 3), (YELLOW, 3), (CYAN, 3)]),
            indices,
        }
    }
}

fn face_colors(faces: &[([f32; 4], usize)]) -> Vec<f32> {
    faces
        .iter()
        .flat_map(|(color, vertices)| std::iter::repeat_n(color, *vertices))
        .flatten()
        .copied()
        .collect()
}

/// Geometry looked up by name and built on first use.
///
/// Only the built-in `cube` and `pyramid` are known.
#[derive(Debug, Clone, Default)]
pub struct MeshCache {
    meshes: HashMap<String, Mesh>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the named mesh, building and caching it on first request.
    ///
    /// Unknown names are logged and yield `None`.
    pub fn get(&mut self, name: &str) -> Option<&Mesh> {
        if !self.meshes.contains_key(name) {
            let mesh = match name {
                "cube" => Mesh::cube(),
                "pyramid" => Mesh::pyramid(),
                _ => {
                    tracing::warn!(mesh = name, "mesh could not be loaded");
                    return None;
                }
            };
            tracing::debug!(
                mesh = name,
                vertices = mesh.vertex_count(),
                indices = mesh.index_count(),
                "mesh loaded"
            );
            self.meshes.insert(name.to_owned(), mesh);
        }
        self.meshes.get(name)
    }

    /// Number of meshes built so far.
    pub fn loaded(&self) -> usize {
        self.meshes.len()
    }
}
