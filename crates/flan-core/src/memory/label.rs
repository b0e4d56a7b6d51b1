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


use super::ChunkAllocator;
use std::ops::{Deref, DerefMut};

/// A guard that sets the allocator's current label and restores the previous one on drop.
///
/// Created by [`ChunkAllocator::labeled`]. The guard dereferences to the
/// allocator, so every allocation made through it carries the scoped label:
///
/// ```
/// use flan_core::memory::ChunkAllocator;
///
/// let mut allocator = ChunkAllocator::with_capacity(1024).unwrap();
/// {
///     let mut scope = allocator.labeled("MdlRes - Mesh - crate.obj");
///     scope.allocate(64, 16).unwrap();
/// }
/// assert_eq!(allocator.current_label(), "untitled");
/// ```
pub struct LabelScope<'a> {
    allocator: &'a mut ChunkAllocator,
    previous: String,
}

impl<'a> LabelScope<'a> {
    pub(super) fn new(allocator: &'a mut ChunkAllocator, label: String) -> Self {
        let previous = allocator.replace_label(label);
        Self {
            allocator,
            previous,
        }
    }
}

impl Deref for LabelScope<'_> {
    type Target = ChunkAllocator;

    fn deref(&self) -> &Self::Target {
        self.allocator
    }
}

impl DerefMut for LabelScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.allocator
    }
}

impl Drop for LabelScope<'_> {
    fn drop(&mut self) {
        let previous = std::mem::take(&mut self.previous);
        self.allocator.replace_label(previous);
    }
}
