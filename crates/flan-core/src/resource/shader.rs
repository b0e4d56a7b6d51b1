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
use crate::memory::{AllocError, ArenaBuffer, ChunkAllocator};
use serde::Serialize;
use std::fmt;

/// The pipeline stage a shader is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Pixel (fragment) shader.
    Pixel,
    /// Geometry shader.
    Geometry,
    /// Compute shader.
    Compute,
}

impl ShaderStage {
    /// Infers the stage from a file extension such as `vert` or `ps`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "vert" | "vs" => Some(ShaderStage::Vertex),
            "frag" | "fs" | "ps" => Some(ShaderStage::Pixel),
            "geom" | "gs" => Some(ShaderStage::Geometry),
            "comp" | "cs" => Some(ShaderStage::Compute),
            _ => None,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Pixel => "pixel",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Compute => "compute",
        };
        f.write_str(name)
    }
}

/// Shader source text held in the arena, ready to be handed to a compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shader {
    /// The stage the source targets.
    pub stage: ShaderStage,
    /// UTF-8 source text.
    pub source: ArenaBuffer,
}

impl Shader {
    /// Copies `source` into the arena, labelled `"ShdRes - source - <name>"`.
    pub fn from_source(
        allocator: &mut ChunkAllocator,
        name: &str,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self, ResourceError> {
        if source.is_empty() {
            return Err(ResourceError::decode(name, "shader source is empty"));
        }

        let label = format!("{} - source - {name}", ResourceType::Shader.label_prefix());
        let buffer = allocator.allocate_bytes(source.as_bytes(), 1, &label)?;
        Ok(Self {
            stage,
            source: buffer,
        })
    }

    /// The source text, if the shader is still alive in `allocator`.
    pub fn source<'a>(&self, allocator: &'a ChunkAllocator) -> Option<&'a str> {
        std::str::from_utf8(allocator.buffer_bytes(self.source)?).ok()
    }
}

impl Resource for Shader {
    const TYPE: ResourceType = ResourceType::Shader;

    fn release(&mut self, allocator: &mut ChunkAllocator) -> Result<(), AllocError> {
        allocator.release_buffer(self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_follows_extension() {
        assert_eq!(ShaderStage::from_extension("vert"), Some(ShaderStage::Vertex));
        assert_eq!(ShaderStage::from_extension("PS"), Some(ShaderStage::Pixel));
        assert_eq!(ShaderStage::from_extension("gs"), Some(ShaderStage::Geometry));
        assert_eq!(ShaderStage::from_extension("comp"), Some(ShaderStage::Compute));
        assert_eq!(ShaderStage::from_extension("txt"), None);
    }

    #[test]
    fn source_round_trips_through_the_arena() {
        let mut allocator = ChunkAllocator::with_capacity(256).unwrap();
        let shader = Shader::from_source(
            &mut allocator,
            "basic.vert",
            ShaderStage::Vertex,
            "void main() {}",
        )
        .unwrap();

        assert_eq!(shader.source(&allocator), Some("void main() {}"));
    }
}
