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


use super::{ResourceError, ResourceHandle, ResourceType};
use crate::memory::{AllocError, ChunkAllocator};
use std::any::Any;
use std::cell::RefMut;

/// A type that can be owned by the resource cache.
///
/// Resources keep their bulk data in the [`ChunkAllocator`] and only hold
/// buffer descriptors themselves. The cache calls [`Resource::release`] during
/// the sweep to hand those buffers back.
pub trait Resource: Any {
    /// The tag stored in handles to this kind of resource.
    const TYPE: ResourceType;

    /// Releases every allocation owned by this resource.
    fn release(&mut self, allocator: &mut ChunkAllocator) -> Result<(), AllocError>;
}

/// The object-safe face of a [`Resource`], used where the concrete type is erased.
pub trait ErasedResource: Any {
    /// The tag of the concrete resource type.
    fn resource_type(&self) -> ResourceType;
    /// Calls the type-specific [`Resource::release`].
    fn release_resource(&mut self, allocator: &mut ChunkAllocator) -> Result<(), AllocError>;
    /// Upcasts to `Any` for downcasting back to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl<R: Resource> ErasedResource for R {
    fn resource_type(&self) -> ResourceType {
        R::TYPE
    }

    fn release_resource(&mut self, allocator: &mut ChunkAllocator) -> Result<(), AllocError> {
        Resource::release(self, allocator)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// What a loader lane can reach while decoding.
pub trait LoadContext {
    /// The identity being loaded, fragment included.
    fn identity(&self) -> &str;

    /// Borrows the allocator. The borrow must be dropped before calling
    /// [`LoadContext::load_dependency`].
    fn allocator(&self) -> RefMut<'_, ChunkAllocator>;

    /// Reads a companion file (such as a material library) without caching it.
    fn read_file(&self, path: &str) -> Result<Vec<u8>, ResourceError>;

    /// Loads (or finds in the cache) another resource this one depends on.
    /// Returns [`ResourceHandle::INVALID`] if it cannot be loaded.
    fn load_dependency(&mut self, resource_type: ResourceType, identity: &str) -> ResourceHandle;
}

/// A stateless routine decoding raw bytes into one kind of resource.
pub trait ResourceLoaderLane<R: Resource> {
    /// Decodes `bytes` into a resource whose buffers live in the context's allocator.
    ///
    /// On error, every allocation made during the call must have been released.
    fn load(&self, ctx: &mut dyn LoadContext, bytes: &[u8]) -> Result<R, ResourceError>;
}
