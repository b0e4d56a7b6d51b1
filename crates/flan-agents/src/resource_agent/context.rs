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


use super::ResourceCache;
use flan_core::memory::ChunkAllocator;
use flan_core::resource::{LoadContext, ResourceError, ResourceHandle, ResourceType};
use std::cell::RefMut;

/// The [`LoadContext`] lent to a lane while it decodes one resource.
pub(crate) struct CacheLoadContext<'a> {
    pub(crate) cache: &'a mut ResourceCache,
    pub(crate) identity: &'a str,
}

impl LoadContext for CacheLoadContext<'_> {
    fn identity(&self) -> &str {
        self.identity
    }

    fn allocator(&self) -> RefMut<'_, ChunkAllocator> {
        self.cache.allocator().borrow_mut()
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        self.cache.read_file(path)
    }

    fn load_dependency(&mut self, resource_type: ResourceType, identity: &str) -> ResourceHandle {
        log::debug!(
            "'{}' requests {resource_type} dependency '{identity}'",
            self.identity
        );
        self.cache.load_typed(resource_type, identity)
    }
}
