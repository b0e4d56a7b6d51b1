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


use flan_core::memory::ChunkAllocator;
use flan_core::resource::{
    identity_hash, LoadContext, ResourceError, ResourceHandle, ResourceType,
};
use std::cell::{RefCell, RefMut};
use std::collections::HashMap;

/// A [`LoadContext`] backed by in-memory files that records dependency requests.
pub(crate) struct TestContext {
    identity: String,
    allocator: RefCell<ChunkAllocator>,
    files: HashMap<String, Vec<u8>>,
    pub dependencies: Vec<(ResourceType, String)>,
}

impl TestContext {
    pub fn new(identity: &str) -> Self {
        Self {
            identity: identity.to_string(),
            allocator: RefCell::new(ChunkAllocator::with_capacity(1024 * 1024).unwrap()),
            files: HashMap::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_string(), bytes.into());
        self
    }

    pub fn allocator_ref(&self) -> std::cell::Ref<'_, ChunkAllocator> {
        self.allocator.borrow()
    }
}

impl LoadContext for TestContext {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn allocator(&self) -> RefMut<'_, ChunkAllocator> {
        self.allocator.borrow_mut()
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::FileNotFound {
                path: path.to_string(),
            })
    }

    fn load_dependency(&mut self, resource_type: ResourceType, identity: &str) -> ResourceHandle {
        self.dependencies
            .push((resource_type, identity.to_string()));
        ResourceHandle::new(identity_hash(identity), resource_type)
    }
}
