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


use super::cache::ResourceCache;
use flan_core::resource::{Material, PbrTextures, ResourceError, ResourceHandle, TextureSlot};
use flan_lanes::resource_lane::{solid_texture, DEFAULT_TEXTURES};

/// One-pixel textures standing in for material slots a file leaves empty.
///
/// They are ordinary cache entries, so they are created once and shared by
/// every material that needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultTextures {
    textures: PbrTextures,
}

impl DefaultTextures {
    /// Builds the four default textures and caches them under their internal names.
    pub fn create(cache: &mut ResourceCache) -> Result<Self, ResourceError> {
        let mut textures = PbrTextures::default();

        for spec in DEFAULT_TEXTURES {
            let texture = {
                let mut allocator = cache.allocator().borrow_mut();
                solid_texture(&mut allocator, spec.name, spec.pixel)?
            };

            let handle = cache.load_from_buffer(spec.name, texture);
            if !handle.is_valid() {
                return Err(ResourceError::InvalidHandle { handle });
            }
            *textures.get_mut(spec.slot) = handle;
        }

        log::debug!("Created {} default textures", DEFAULT_TEXTURES.len());
        Ok(Self { textures })
    }

    /// The default texture for `slot`.
    pub fn get(&self, slot: TextureSlot) -> ResourceHandle {
        self.textures.get(slot)
    }

    /// `handle` if it is valid, otherwise the default for `slot`.
    pub fn or_default(&self, slot: TextureSlot, handle: ResourceHandle) -> ResourceHandle {
        if handle.is_valid() {
            handle
        } else {
            self.get(slot)
        }
    }

    /// The textures to bind for `material`, with every empty slot filled in.
    pub fn resolve(&self, material: &Material) -> PbrTextures {
        let mut resolved = material.textures;
        for slot in TextureSlot::ALL {
            *resolved.get_mut(slot) = self.or_default(slot, material.textures.get(slot));
        }
        resolved
    }
}
