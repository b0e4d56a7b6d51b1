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


use super::{Resource, ResourceHandle, ResourceType};
use crate::memory::{AllocError, ChunkAllocator};

/// The texture slots of a PBR material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Base colour (albedo).
    Colour,
    /// Tangent-space normal map.
    Normal,
    /// Metalness.
    Metallic,
    /// Roughness.
    Roughness,
}

impl TextureSlot {
    /// Every slot, in binding order.
    pub const ALL: [TextureSlot; 4] = [
        TextureSlot::Colour,
        TextureSlot::Normal,
        TextureSlot::Metallic,
        TextureSlot::Roughness,
    ];
}

/// Texture handles of a material. Any of them may be invalid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PbrTextures {
    /// Base colour texture.
    pub colour: ResourceHandle,
    /// Normal map.
    pub normal: ResourceHandle,
    /// Metalness texture.
    pub metallic: ResourceHandle,
    /// Roughness texture.
    pub roughness: ResourceHandle,
}

impl PbrTextures {
    /// The handle bound to `slot`.
    pub fn get(&self, slot: TextureSlot) -> ResourceHandle {
        match slot {
            TextureSlot::Colour => self.colour,
            TextureSlot::Normal => self.normal,
            TextureSlot::Metallic => self.metallic,
            TextureSlot::Roughness => self.roughness,
        }
    }

    /// Mutable access to the handle bound to `slot`.
    pub fn get_mut(&mut self, slot: TextureSlot) -> &mut ResourceHandle {
        match slot {
            TextureSlot::Colour => &mut self.colour,
            TextureSlot::Normal => &mut self.normal,
            TextureSlot::Metallic => &mut self.metallic,
            TextureSlot::Roughness => &mut self.roughness,
        }
    }
}

/// Surface parameters of a mesh.
///
/// Materials own no arena memory; their textures are separate cache entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGBA base colour.
    pub base_colour: [f32; 4],
    /// The bound textures.
    pub textures: PbrTextures,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_colour: [1.0; 4],
            textures: PbrTextures::default(),
        }
    }
}

impl Resource for Material {
    const TYPE: ResourceType = ResourceType::Material;

    fn release(&mut self, _allocator: &mut ChunkAllocator) -> Result<(), AllocError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_address_their_handle() {
        let mut textures = PbrTextures::default();
        let handle = ResourceHandle::new(42, ResourceType::Texture);

        *textures.get_mut(TextureSlot::Roughness) = handle;

        assert_eq!(textures.roughness, handle);
        for slot in TextureSlot::ALL {
            if slot != TextureSlot::Roughness {
                assert!(!textures.get(slot).is_valid());
            }
        }
    }
}
