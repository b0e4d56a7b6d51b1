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


//! Defines a lane for loading Wavefront OBJ models.

use crate::resource_lane::DecodeFailure;
use ahash::AHashMap;
use flan_core::resource::{
    sibling_path, LoadContext, MeshBuffer, Model, ResourceError, ResourceHandle,
    ResourceLoaderLane, ResourceType, Vertex,
};
use std::cell::RefCell;
use std::io::Cursor;

/// Lane for loading OBJ models.
///
/// Every OBJ object becomes one [`MeshBuffer`] of fully expanded triangles.
/// Materials referenced through `mtllib`/`usemtl` are loaded as dependencies
/// with the identity `"<library path>#<material name>"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelLoaderLane;

impl ResourceLoaderLane<Model> for ModelLoaderLane {
    fn load(&self, ctx: &mut dyn LoadContext, bytes: &[u8]) -> Result<Model, ResourceError> {
        let identity = ctx.identity().to_string();
        let obj_text =
            std::str::from_utf8(bytes).map_err(|err| DecodeFailure::from(err).at(&identity))?;

        // Material identities in the order tobj numbers them.
        let material_identities = RefCell::new(Vec::new());

        let (models, materials) = {
            let reader: &dyn LoadContext = &*ctx;
            tobj::load_obj_buf(
                &mut Cursor::new(obj_text),
                &tobj::LoadOptions {
                    triangulate: true,
                    single_index: true,
                    ..Default::default()
                },
                |library| {
                    let library_path = sibling_path(&identity, &library.to_string_lossy());
                    let library_bytes = reader.read_file(&library_path).map_err(|err| {
                        log::warn!("Model '{identity}': cannot read material library: {err}");
                        tobj::LoadError::OpenFileFailed
                    })?;
                    let (materials, names) =
                        tobj::load_mtl_buf(&mut Cursor::new(library_bytes))?;
                    material_identities.borrow_mut().extend(
                        materials
                            .iter()
                            .map(|material| format!("{library_path}#{}", material.name)),
                    );
                    Ok((materials, names))
                },
            )
            .map_err(|err| DecodeFailure::Obj(err).at(&identity))?
        };

        if let Err(err) = materials {
            log::warn!("Model '{identity}' is missing materials: {err}");
        }
        if models.is_empty() {
            return Err(DecodeFailure::NoGeometry.at(&identity));
        }

        // Dependencies are resolved before the allocator is borrowed for the vertices.
        let material_identities = material_identities.into_inner();
        let mut material_handles: AHashMap<usize, ResourceHandle> = AHashMap::new();
        for material_id in models.iter().filter_map(|model| model.mesh.material_id) {
            if material_handles.contains_key(&material_id) {
                continue;
            }
            let handle = match material_identities.get(material_id) {
                Some(material) => ctx.load_dependency(ResourceType::Material, material),
                None => ResourceHandle::INVALID,
            };
            material_handles.insert(material_id, handle);
        }

        let mut allocator = ctx.allocator();
        let mut meshes = Vec::with_capacity(models.len());
        for model in &models {
            let vertices = expand_vertices(&model.mesh);
            if vertices.is_empty() {
                log::debug!("Model '{identity}': skipping empty object '{}'", model.name);
                continue;
            }

            let material = model
                .mesh
                .material_id
                .and_then(|id| material_handles.get(&id).copied())
                .unwrap_or(ResourceHandle::INVALID);

            match MeshBuffer::from_vertices(&mut allocator, &identity, &vertices, material) {
                Ok(mesh) => meshes.push(mesh),
                Err(err) => {
                    for mesh in meshes {
                        if let Err(release_err) = allocator.release_buffer(mesh.vertices) {
                            log::error!("Model '{identity}': {release_err}");
                        }
                    }
                    return Err(err);
                }
            }
        }

        if meshes.is_empty() {
            return Err(DecodeFailure::NoGeometry.at(&identity));
        }

        log::debug!(
            "Model '{identity}' loaded with {} meshes and {} materials",
            meshes.len(),
            material_handles.len()
        );
        Ok(Model { meshes })
    }
}

/// Expands single-indexed OBJ geometry into one vertex per index.
fn expand_vertices(mesh: &tobj::Mesh) -> Vec<Vertex> {
    let triple = |data: &[f32], index: usize| -> Option<[f32; 3]> {
        data.get(index * 3..index * 3 + 3)
            .map(|value| [value[0], value[1], value[2]])
    };

    mesh.indices
        .iter()
        .map(|&index| {
            let index = index as usize;
            let mut vertex = Vertex::default();
            if let Some(position) = triple(&mesh.positions, index) {
                vertex.position = position;
            }
            if let Some(normal) = triple(&mesh.normals, index) {
                vertex.normal = normal;
            }
            if let Some(colour) = triple(&mesh.vertex_color, index) {
                vertex.colour = colour;
            }
            if let Some(texcoord) = mesh.texcoords.get(index * 2..index * 2 + 2) {
                vertex.texcoord = [texcoord[0], texcoord[1]];
            }
            vertex
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_lane::test_context::TestContext;
    use flan_core::resource::identity_hash;

    const QUAD: &str = "\
mtllib crate.mtl
o Quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
usemtl Wood
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    const LIBRARY: &str = "\
newmtl Metal
Kd 0.5 0.5 0.5

newmtl Wood
Kd 0.8 0.6 0.4
map_Kd wood.png
";

    #[test]
    fn test_quad_is_triangulated_and_expanded() {
        // --- 1. SETUP ---
        let mut ctx = TestContext::new("models/crate.obj").with_file("models/crate.mtl", LIBRARY);

        // --- 2. ACTION ---
        let model = ModelLoaderLane.load(&mut ctx, QUAD.as_bytes()).unwrap();

        // --- 3. ASSERTIONS ---
        assert_eq!(model.meshes.len(), 1);
        let mesh = model.meshes[0];
        assert_eq!(mesh.vertex_count, 6, "A quad becomes two triangles");

        let allocator = ctx.allocator_ref();
        let vertices = mesh.vertices(&allocator).unwrap();
        assert_eq!(vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(vertices[1].texcoord, [1.0, 0.0]);
        assert!(vertices.iter().all(|vertex| vertex.normal == [0.0, 0.0, 1.0]));
        assert!(vertices.iter().all(|vertex| vertex.tangent == [0.0, 0.0, 1.0]));

        let used: Vec<String> = allocator
            .get_memory_chunk_list()
            .into_iter()
            .filter(|chunk| !chunk.is_free)
            .map(|chunk| chunk.label)
            .collect();
        assert_eq!(used, vec!["MdlRes - Mesh - models/crate.obj".to_string()]);
    }

    #[test]
    fn test_used_materials_are_requested_as_dependencies() {
        let mut ctx = TestContext::new("models/crate.obj").with_file("models/crate.mtl", LIBRARY);

        let model = ModelLoaderLane.load(&mut ctx, QUAD.as_bytes()).unwrap();

        assert_eq!(
            ctx.dependencies,
            vec![(ResourceType::Material, "models/crate.mtl#Wood".to_string())]
        );
        assert_eq!(
            model.meshes[0].material,
            ResourceHandle::new(identity_hash("models/crate.mtl#Wood"), ResourceType::Material)
        );
    }

    #[test]
    fn test_missing_library_leaves_material_invalid() {
        let mut ctx = TestContext::new("models/crate.obj");

        let model = ModelLoaderLane.load(&mut ctx, QUAD.as_bytes()).unwrap();

        assert!(ctx.dependencies.is_empty());
        assert!(!model.meshes[0].material.is_valid());
    }

    #[test]
    fn test_defaults_fill_missing_attributes() {
        let mut ctx = TestContext::new("tri.obj");

        let model = ModelLoaderLane
            .load(&mut ctx, b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")
            .unwrap();

        let allocator = ctx.allocator_ref();
        let vertices = model.meshes[0].vertices(&allocator).unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[2].position, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[2].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[2].colour, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_empty_obj_is_rejected() {
        let mut ctx = TestContext::new("empty.obj");

        let result = ModelLoaderLane.load(&mut ctx, b"# nothing here\n");

        assert!(matches!(result, Err(ResourceError::DecodeError { .. })));
        assert_eq!(ctx.allocator_ref().memory_report().used_chunks, 0);
    }
}
