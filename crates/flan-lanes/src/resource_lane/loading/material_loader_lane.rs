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


//! Defines a lane for loading materials out of Wavefront MTL libraries.

use crate::resource_lane::DecodeFailure;
use flan_core::resource::{
    sibling_path, split_identity, LoadContext, Material, PbrTextures, ResourceError,
    ResourceLoaderLane, ResourceType, TextureSlot,
};
use std::io::Cursor;

/// Lane for loading one material from an MTL library.
///
/// The identity fragment names the material (`"crate.mtl#Wood"`); without a
/// fragment the first material of the library is used. Texture maps are
/// loaded as texture dependencies relative to the library's folder:
///
/// | MTL statement          | slot        |
/// |------------------------|-------------|
/// | `map_Kd`               | colour      |
/// | `map_Bump`, `norm`     | normal      |
/// | `map_Pm`               | metallic    |
/// | `map_Pr`               | roughness   |
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialLoaderLane;

impl ResourceLoaderLane<Material> for MaterialLoaderLane {
    fn load(&self, ctx: &mut dyn LoadContext, bytes: &[u8]) -> Result<Material, ResourceError> {
        let identity = ctx.identity().to_string();
        let (_, fragment) = split_identity(&identity);

        let (materials, _) = tobj::load_mtl_buf(&mut Cursor::new(bytes))
            .map_err(|err| DecodeFailure::Mtl(err).at(&identity))?;

        let source = match fragment {
            Some(name) => materials
                .iter()
                .find(|material| material.name == name)
                .ok_or_else(|| DecodeFailure::MissingMaterial(name.to_string()).at(&identity))?,
            None => materials
                .first()
                .ok_or_else(|| DecodeFailure::EmptyLibrary.at(&identity))?,
        };

        let [r, g, b] = source.diffuse.unwrap_or([1.0; 3]);
        let alpha = source.dissolve.unwrap_or(1.0);

        let mut textures = PbrTextures::default();
        for (slot, map) in texture_maps(source) {
            if let Some(map) = map {
                let path = sibling_path(&identity, map);
                *textures.get_mut(slot) = ctx.load_dependency(ResourceType::Texture, &path);
            }
        }

        Ok(Material {
            base_colour: [r, g, b, alpha],
            textures,
        })
    }
}

fn texture_maps(material: &tobj::Material) -> [(TextureSlot, Option<&str>); 4] {
    let unknown = |key: &str| material.unknown_param.get(key).map(String::as_str);
    [
        (TextureSlot::Colour, material.diffuse_texture.as_deref()),
        (
            TextureSlot::Normal,
            material
                .normal_texture
                .as_deref()
                .or_else(|| unknown("norm")),
        ),
        (TextureSlot::Metallic, unknown("map_Pm")),
        (TextureSlot::Roughness, unknown("map_Pr")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_lane::test_context::TestContext;
    use flan_core::resource::{identity_hash, ResourceHandle};

    const LIBRARY: &str = "\
newmtl Plain
Kd 0.2 0.4 0.6

newmtl Brick
Kd 0.9 0.3 0.2
d 0.5
map_Kd textures/brick_colour.png
map_Bump textures/brick_normal.png
map_Pr textures/brick_roughness.png
";

    #[test]
    fn test_fragment_selects_material_and_its_maps() {
        // --- 1. SETUP ---
        let mut ctx = TestContext::new("materials/wall.mtl#Brick");

        // --- 2. ACTION ---
        let material = MaterialLoaderLane.load(&mut ctx, LIBRARY.as_bytes()).unwrap();

        // --- 3. ASSERTIONS ---
        assert_eq!(material.base_colour, [0.9, 0.3, 0.2, 0.5]);
        assert_eq!(
            material.textures.colour,
            ResourceHandle::new(
                identity_hash("materials/textures/brick_colour.png"),
                ResourceType::Texture
            )
        );
        assert!(material.textures.normal.is_valid());
        assert!(material.textures.roughness.is_valid());
        assert!(!material.textures.metallic.is_valid(), "No map_Pm in the library");
        assert_eq!(ctx.dependencies.len(), 3);
    }

    #[test]
    fn test_first_material_without_fragment() {
        let mut ctx = TestContext::new("materials/wall.mtl");

        let material = MaterialLoaderLane.load(&mut ctx, LIBRARY.as_bytes()).unwrap();

        assert_eq!(material.base_colour, [0.2, 0.4, 0.6, 1.0]);
        assert!(ctx.dependencies.is_empty());
    }

    #[test]
    fn test_unknown_material_is_a_decode_error() {
        let mut ctx = TestContext::new("materials/wall.mtl#Marble");

        let result = MaterialLoaderLane.load(&mut ctx, LIBRARY.as_bytes());

        assert!(matches!(result, Err(ResourceError::DecodeError { .. })));
    }

    #[test]
    fn test_metallic_map_is_read_from_extension_statement() {
        let mut ctx = TestContext::new("metal.mtl");

        let material = MaterialLoaderLane
            .load(&mut ctx, b"newmtl Steel\nmap_Pm steel_metallic.png\nnorm steel_n.png\n")
            .unwrap();

        assert_eq!(
            ctx.dependencies,
            vec![
                (ResourceType::Texture, "steel_n.png".to_string()),
                (ResourceType::Texture, "steel_metallic.png".to_string()),
            ]
        );
        assert!(material.textures.metallic.is_valid());
        assert!(material.textures.normal.is_valid());
    }
}
