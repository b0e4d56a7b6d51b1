// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use super::{Resource, ResourceError, ResourceHandle, ResourceType};
use crate::config::DEFAULT_ALIGNMENT;
use crate::memory::{AllocError, ArenaBuffer, ChunkAllocator};
use bytemuck::{Pod, Zeroable};

/// A fully expanded (non-indexed) vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Surface normal.
    pub normal: [f32; 3],
    /// Surface tangent.
    pub tangent: [f32; 3],
    /// Vertex colour.
    pub colour: [f32; 3],
    /// Texture coordinates.
    pub texcoord: [f32; 2],
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0, 1.0, 0.0],
            tangent: [0.0, 0.0, 1.0],
            colour: [1.0; 3],
            texcoord: [0.0; 2],
        }
    }
}

/// One mesh of a model: a vertex array in the arena plus its material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBuffer {
    /// The vertices, three per triangle.
    pub vertices: ArenaBuffer,
    /// The number of [`Vertex`] values in `vertices`.
    pub vertex_count: usize,
    /// The material the mesh is drawn with. May be invalid.
    pub material: ResourceHandle,
}

impl MeshBuffer {
    /// Copies `vertices` into the arena, labelled `"MdlRes - Mesh - <name>"`.
    pub fn from_vertices(
        allocator: &mut ChunkAllocator,
        name: &str,
        vertices: &[Vertex],
        material: ResourceHandle,
    ) -> Result<Self, ResourceError> {
        if vertices.is_empty() {
            return Err(ResourceError::decode(name, "mesh has no vertices"));
        }

        let label = format!("{} - Mesh - {name}", ResourceType::Model.label_prefix());
        let buffer = allocator.allocate_bytes(
            bytemuck::cast_slice(vertices),
            DEFAULT_ALIGNMENT,
            &label,
        )?;
        Ok(Self {
            vertices: buffer,
            vertex_count: vertices.len(),
            material,
        })
    }

    /// The vertices, if the mesh is still alive in `allocator`.
    pub fn vertices<'a>(&self, allocator: &'a ChunkAllocator) -> Option<&'a [Vertex]> {
        allocator.cast_buffer(self.vertices)
    }
}

/// A model made of one or more meshes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    /// The meshes, in file order.
    pub meshes: Vec<MeshBuffer>,
}

impl Model {
    /// The total number of vertices across every mesh.
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.vertex_count).sum()
    }
}

impl Resource for Model {
    const TYPE: ResourceType = ResourceType::Model;

    fn release(&mut self, allocator: &mut ChunkAllocator) -> Result<(), AllocError> {
        // Release every mesh even if one fails, then report the first failure.
        let mut result = Ok(());
        for mesh in self.meshes.drain(..) {
            if let Err(err) = allocator.release_buffer(mesh.vertices) {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vertex_matches_renderer_conventions() {
        let vertex = Vertex::default();
        assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertex.tangent, [0.0, 0.0, 1.0]);
        assert_eq!(vertex.colour, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn model_release_frees_every_mesh() {
        let mut allocator = ChunkAllocator::with_capacity(4096).unwrap();
        let triangle = [Vertex::default(); 3];
        let mut model = Model {
            meshes: vec![
                MeshBuffer::from_vertices(&mut allocator, "a.obj", &triangle, ResourceHandle::INVALID)
                    .unwrap(),
                MeshBuffer::from_vertices(&mut allocator, "a.obj", &triangle, ResourceHandle::INVALID)
                    .unwrap(),
            ],
        };
        assert_eq!(model.vertex_count(), 6);
        assert_eq!(model.meshes[0].vertices(&allocator), Some(&triangle[..]));

        model.release(&mut allocator).unwrap();

        assert!(model.meshes.is_empty());
        let chunks = allocator.get_memory_chunk_list();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_free);
    }
}
