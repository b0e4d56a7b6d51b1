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


use serde::Serialize;
use std::fmt;

/// The kind of resource a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ResourceType {
    /// An RGBA8 image.
    Texture,
    /// A set of vertex arrays with their materials.
    Model,
    /// Surface parameters and texture references.
    Material,
    /// Shader source text.
    Shader,
    /// The tag of [`ResourceHandle::INVALID`].
    Invalid,
}

impl ResourceType {
    /// The prefix used in the labels of allocations owned by this kind of resource.
    pub fn label_prefix(self) -> &'static str {
        match self {
            ResourceType::Texture => "TexRes",
            ResourceType::Model => "MdlRes",
            ResourceType::Material => "MatRes",
            ResourceType::Shader => "ShdRes",
            ResourceType::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceType::Texture => "texture",
            ResourceType::Model => "model",
            ResourceType::Material => "material",
            ResourceType::Shader => "shader",
            ResourceType::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// A lightweight reference to a cached resource.
///
/// Handles are plain values: copying or comparing one costs nothing and does
/// not keep the resource alive. Once the resource is swept, resolving the
/// handle through the cache fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceHandle {
    /// The identity hash of the resource.
    pub hash: u64,
    /// The kind of resource.
    pub resource_type: ResourceType,
}

impl ResourceHandle {
    /// The handle returned by failed loads. It never resolves.
    pub const INVALID: ResourceHandle = ResourceHandle {
        hash: 0,
        resource_type: ResourceType::Invalid,
    };

    /// Creates a handle from its parts.
    pub const fn new(hash: u64, resource_type: ResourceType) -> Self {
        Self {
            hash,
            resource_type,
        }
    }

    /// Whether this handle could refer to a resource.
    pub fn is_valid(&self) -> bool {
        self.resource_type != ResourceType::Invalid
    }
}

impl Default for ResourceHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:016x}", self.resource_type, self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_handle_is_the_default() {
        assert_eq!(ResourceHandle::default(), ResourceHandle::INVALID);
        assert!(!ResourceHandle::INVALID.is_valid());
        assert!(ResourceHandle::new(0, ResourceType::Texture).is_valid());
    }

    #[test]
    fn display_shows_type_and_hash() {
        let handle = ResourceHandle::new(0xabc, ResourceType::Model);
        assert_eq!(handle.to_string(), "model#0000000000000abc");
    }
}
