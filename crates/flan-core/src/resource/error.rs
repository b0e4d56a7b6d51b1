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


use super::{ResourceHandle, ResourceType};
use crate::memory::AllocError;
use std::fmt;

/// An error raised while loading or resolving a resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// The file does not exist.
    FileNotFound {
        /// The path that was requested.
        path: String,
    },
    /// The file exists but could not be read.
    Io {
        /// The path that was requested.
        path: String,
        /// The underlying I/O error message.
        message: String,
    },
    /// The bytes could not be decoded into a resource.
    DecodeError {
        /// The identity being decoded.
        path: String,
        /// What went wrong.
        reason: String,
    },
    /// The handle is invalid or its resource is no longer cached.
    InvalidHandle {
        /// The offending handle.
        handle: ResourceHandle,
    },
    /// The resource exists but is of another type.
    TypeMismatch {
        /// The type the caller asked for.
        expected: ResourceType,
        /// The type of the cached resource.
        found: ResourceType,
    },
    /// No loader is registered for this type of resource.
    NoLoader {
        /// The type without a loader.
        resource_type: ResourceType,
    },
    /// The allocator could not back the resource.
    Allocation(AllocError),
}

impl ResourceError {
    /// Shorthand for a [`ResourceError::DecodeError`].
    pub fn decode(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        ResourceError::DecodeError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::FileNotFound { path } => write!(f, "File not found: '{path}'"),
            ResourceError::Io { path, message } => {
                write!(f, "Failed to read '{path}': {message}")
            }
            ResourceError::DecodeError { path, reason } => {
                write!(f, "Failed to decode '{path}': {reason}")
            }
            ResourceError::InvalidHandle { handle } => {
                write!(f, "Invalid or unloaded resource handle: {handle}")
            }
            ResourceError::TypeMismatch { expected, found } => {
                write!(f, "Resource type mismatch: expected {expected}, found {found}")
            }
            ResourceError::NoLoader { resource_type } => {
                write!(f, "No loader registered for {resource_type} resources")
            }
            ResourceError::Allocation(err) => write!(f, "Resource allocation failed: {err}"),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Allocation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for ResourceError {
    fn from(err: AllocError) -> Self {
        ResourceError::Allocation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn allocation_errors_keep_their_source() {
        let err: ResourceError = AllocError::InvalidArgument {
            reason: "size must be greater than zero".to_string(),
        }
        .into();

        assert!(err.source().is_some());
        assert!(err.to_string().contains("size must be greater than zero"));
    }

    #[test]
    fn type_mismatch_names_both_types() {
        let err = ResourceError::TypeMismatch {
            expected: ResourceType::Texture,
            found: ResourceType::Model,
        };
        assert_eq!(
            err.to_string(),
            "Resource type mismatch: expected texture, found model"
        );
    }
}
