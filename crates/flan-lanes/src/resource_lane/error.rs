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


use flan_core::resource::ResourceError;
use thiserror::Error;

/// A lane-level decoding failure, before it is attached to a resource path.
#[derive(Debug, Error)]
pub enum DecodeFailure {
    /// The image crate could not decode the bytes.
    #[error("image decoding failed: {0}")]
    Image(#[from] image::ImageError),
    /// The Wavefront OBJ data is malformed.
    #[error("OBJ parsing failed: {0}")]
    Obj(#[source] tobj::LoadError),
    /// The material library is malformed.
    #[error("MTL parsing failed: {0}")]
    Mtl(#[source] tobj::LoadError),
    /// A text format was not valid UTF-8.
    #[error("file is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// The shader's extension does not name a pipeline stage.
    #[error("cannot infer shader stage from '{0}'")]
    UnknownShaderStage(String),
    /// The requested material is not defined by the library.
    #[error("material '{0}' is not defined in the library")]
    MissingMaterial(String),
    /// The library defines no material at all.
    #[error("material library is empty")]
    EmptyLibrary,
    /// The model contains no triangles.
    #[error("model contains no geometry")]
    NoGeometry,
}

impl DecodeFailure {
    /// Attaches the identity being decoded, producing a [`ResourceError::DecodeError`].
    pub fn at(self, identity: &str) -> ResourceError {
        ResourceError::decode(identity, self)
    }
}
