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


use super::{Resource, ResourceError, ResourceType};
use crate::config::DEFAULT_ALIGNMENT;
use crate::memory::{AllocError, ArenaBuffer, ChunkAllocator};
use bytemuck::{Pod, Zeroable};

/// One RGBA8 pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Pixel32 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Pixel32 {
    /// Creates a pixel from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// An RGBA8 image whose pixels live in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height` [`Pixel32`] values, row-major.
    pub pixels: ArenaBuffer,
}

impl Texture {
    /// Copies tightly packed RGBA8 data into the arena.
    ///
    /// The allocation is labelled `"TexRes - data - <name>"`.
    pub fn from_rgba8(
        allocator: &mut ChunkAllocator,
        name: &str,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<Self, ResourceError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(std::mem::size_of::<Pixel32>()));
        if expected != Some(data.len()) || data.is_empty() {
            return Err(ResourceError::decode(
                name,
                format!(
                    "{width}x{height} texture cannot hold {} bytes of RGBA8 data",
                    data.len()
                ),
            ));
        }

        let label = format!("{} - data - {name}", ResourceType::Texture.label_prefix());
        let pixels = allocator.allocate_bytes(data, DEFAULT_ALIGNMENT, &label)?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Copies `pixels` into the arena.
    pub fn from_pixels(
        allocator: &mut ChunkAllocator,
        name: &str,
        width: u32,
        height: u32,
        pixels: &[Pixel32],
    ) -> Result<Self, ResourceError> {
        Self::from_rgba8(allocator, name, width, height, bytemuck::cast_slice(pixels))
    }

    /// The pixels, if the texture is still alive in `allocator`.
    pub fn pixels<'a>(&self, allocator: &'a ChunkAllocator) -> Option<&'a [Pixel32]> {
        allocator.cast_buffer(self.pixels)
    }

    /// The pixel at `(x, y)`.
    pub fn pixel(&self, allocator: &ChunkAllocator, x: u32, y: u32) -> Option<Pixel32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels(allocator)?.get(index).copied()
    }
}

impl Resource for Texture {
    const TYPE: ResourceType = ResourceType::Texture;

    fn release(&mut self, allocator: &mut ChunkAllocator) -> Result<(), AllocError> {
        allocator.release_buffer(self.pixels)
    }
}
