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

/// An offset into the arena, as handed out by the allocator.
///
/// Addresses are offsets rather than pointers, so they stay valid when the
/// arena grows and its storage moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ArenaAddress(pub usize);

impl ArenaAddress {
    /// The raw offset from the start of the arena.
    pub fn offset(self) -> usize {
        self.0
    }

    /// Whether the address is a multiple of `alignment`.
    pub fn is_aligned_to(self, alignment: usize) -> bool {
        alignment != 0 && self.0 % alignment == 0
    }
}

impl fmt::Display for ArenaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arena+{:#x}", self.0)
    }
}

/// A byte range owned by the allocator, used by resources to reference their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ArenaBuffer {
    /// The start of the range, as returned by the allocation.
    pub address: ArenaAddress,
    /// The number of meaningful bytes in the range.
    pub len: usize,
}

/// A contiguous region of the arena, as reported by
/// [`ChunkAllocator::get_memory_chunk_list`](super::ChunkAllocator::get_memory_chunk_list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryChunk {
    /// Where the chunk begins.
    pub offset: usize,
    /// The aligned start handed to the caller. Equals `offset` for free chunks.
    pub address: ArenaAddress,
    /// The size in bytes, alignment padding included.
    pub size: usize,
    /// Whether the chunk is available.
    pub is_free: bool,
    /// What the chunk holds.
    pub label: String,
    /// Position in the address-ordered chunk list.
    pub index: usize,
}

impl MemoryChunk {
    /// One past the last byte of the chunk.
    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    /// The bytes available to the caller, i.e. the size minus leading padding.
    pub fn usable_size(&self) -> usize {
        self.end() - self.address.0
    }
}
