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


//! The chunked allocator backing every bulk allocation of the engine.
//!
//! A [`ChunkAllocator`] owns a single contiguous arena carved into an
//! address-ordered list of chunks. Every chunk is either free or used, and every
//! used chunk carries a human-readable label so the memory inspector can show
//! what each byte of the arena is holding.
//!
//! The allocator is an explicit instance rather than a global. Components that
//! need it share a [`SharedAllocator`].

mod allocator;
mod chunk;
mod error;
mod label;
mod stats;

pub use allocator::ChunkAllocator;
pub use chunk::{ArenaAddress, ArenaBuffer, MemoryChunk};
pub use error::AllocError;
pub use label::LabelScope;
pub use stats::{format_byte_size, AllocatorStats, MemoryReport};

use std::cell::RefCell;
use std::rc::Rc;

/// The alignment of the arena's backing storage. Any address aligned to a
/// power of two up to this value is aligned in real memory as well.
pub const MAX_ARENA_ALIGNMENT: usize = 256;

/// The label carried by chunks allocated outside of any label context.
pub const DEFAULT_LABEL: &str = "untitled";

/// The allocator as shared between the cache, the lanes and the frame loop.
pub type SharedAllocator = Rc<RefCell<ChunkAllocator>>;
