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


//! Texture loading.

use crate::resource_lane::DecodeFailure;
use flan_core::resource::{LoadContext, ResourceError, ResourceLoaderLane, Texture};

/// A lane decoding image files (PNG, JPEG, ...) into RGBA8 textures.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureLoaderLane;

impl ResourceLoaderLane<Texture> for TextureLoaderLane {
    fn load(&self, ctx: &mut dyn LoadContext, bytes: &[u8]) -> Result<Texture, ResourceError> {
        let identity = ctx.identity().to_string();

        // Decode the image using the `image` crate
        let image = image::load_from_memory(bytes)
            .map_err(|err| DecodeFailure::from(err).at(&identity))?;

        if !image.color().has_alpha() {
            log::warn!(
                "Texture '{identity}' is {:?}, not RGBA. It will be expanded to RGBA8.",
                image.color()
            );
        }

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut allocator = ctx.allocator();
        Texture::from_rgba8(&mut allocator, &identity, width, height, rgba.as_raw())
    }
}
