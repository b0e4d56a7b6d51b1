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


//! Procedurally generated resources that never touch the disk.

use flan_core::memory::ChunkAllocator;
use flan_core::resource::{Pixel32, ResourceError, Texture, TextureSlot};

/// Describes one of the built-in fallback textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultTextureSpec {
    /// The material slot the texture stands in for.
    pub slot: TextureSlot,
    /// The identity the texture is cached under.
    pub name: &'static str,
    /// The colour of its single pixel.
    pub pixel: Pixel32,
}

/// The fallback bound to material slots whose texture is missing.
pub const DEFAULT_TEXTURES: [DefaultTextureSpec; 4] = [
    DefaultTextureSpec {
        slot: TextureSlot::Colour,
        name: "internal/default colour texture",
        pixel: Pixel32::new(255, 255, 255, 255),
    },
    DefaultTextureSpec {
        slot: TextureSlot::Normal,
        name: "internal/default normal texture",
        pixel: Pixel32::new(128, 128, 255, 255),
    },
    DefaultTextureSpec {
        slot: TextureSlot::Metallic,
        name: "internal/default metallic texture",
        pixel: Pixel32::new(0, 0, 0, 255),
    },
    DefaultTextureSpec {
        slot: TextureSlot::Roughness,
        name: "internal/default roughness texture",
        pixel: Pixel32::new(255, 255, 255, 255),
    },
];

/// Builds a 1x1 texture filled with `pixel`.
pub fn solid_texture(
    allocator: &mut ChunkAllocator,
    name: &str,
    pixel: Pixel32,
) -> Result<Texture, ResourceError> {
    Texture::from_pixels(allocator, name, 1, 1, &[pixel])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_default_per_slot() {
        for slot in TextureSlot::ALL {
            assert_eq!(
                DEFAULT_TEXTURES.iter().filter(|spec| spec.slot == slot).count(),
                1,
                "{slot:?} should have exactly one default"
            );
        }
    }

    #[test]
    fn solid_texture_has_one_pixel() {
        let mut allocator = ChunkAllocator::with_capacity(256).unwrap();
        let spec = DEFAULT_TEXTURES[1];

        let texture = solid_texture(&mut allocator, spec.name, spec.pixel).unwrap();

        assert_eq!((texture.width, texture.height), (1, 1));
        assert_eq!(texture.pixels(&allocator), Some(&[Pixel32::new(128, 128, 255, 255)][..]));
    }
}
