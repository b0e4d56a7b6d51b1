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


use flan_core::memory::{AllocError, ArenaAddress, ChunkAllocator};

/// The label carried by every temporary allocation.
pub const TEMPORARY_LABEL: &str = "temporary allocation";

/// Scratch allocations that live until the end of the current frame.
#[derive(Debug, Default)]
pub struct FrameAllocations {
    addresses: Vec<ArenaAddress>,
}

impl FrameAllocations {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates `size` bytes that [`end_frame`](Self::end_frame) will release.
    pub fn allocate_temporary(
        &mut self,
        allocator: &mut ChunkAllocator,
        size: usize,
        alignment: usize,
    ) -> Result<ArenaAddress, AllocError> {
        let address = allocator.allocate_labeled(size, alignment, TEMPORARY_LABEL)?;
        self.addresses.push(address);
        Ok(address)
    }

    /// Releases every temporary allocation of the frame and returns how many there were.
    ///
    /// All allocations are released even if one fails; the first failure is returned.
    pub fn end_frame(&mut self, allocator: &mut ChunkAllocator) -> Result<usize, AllocError> {
        let count = self.addresses.len();
        let mut first_error = None;

        for address in self.addresses.drain(..) {
            if let Err(err) = allocator.release(address) {
                log::error!("Failed to release temporary allocation: {err}");
                first_error.get_or_insert(err);
            }
        }

        if count > 0 {
            log::trace!("Released {count} temporary allocations");
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(count),
        }
    }

    /// The number of temporary allocations alive this frame.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether no temporary allocation is alive.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_frame_releases_temporaries() {
        // --- 1. SETUP ---
        let mut allocator = ChunkAllocator::with_capacity(1024).unwrap();
        let mut frame = FrameAllocations::new();
        let persistent = allocator.allocate_labeled(64, 16, "persistent").unwrap();

        // --- 2. ACTION ---
        frame.allocate_temporary(&mut allocator, 128, 16).unwrap();
        frame.allocate_temporary(&mut allocator, 32, 4).unwrap();
        let labels: Vec<String> = allocator
            .get_memory_chunk_list()
            .into_iter()
            .filter(|chunk| !chunk.is_free)
            .map(|chunk| chunk.label)
            .collect();
        let released = frame.end_frame(&mut allocator).unwrap();

        // --- 3. ASSERTIONS ---
        assert_eq!(
            labels.iter().filter(|label| *label == TEMPORARY_LABEL).count(),
            2
        );
        assert_eq!(released, 2);
        assert!(frame.is_empty());
        assert!(allocator.bytes(persistent, 64).is_some());
        assert_eq!(allocator.memory_report().used_chunks, 1);
    }

    #[test]
    fn test_end_frame_reports_foreign_release() {
        let mut allocator = ChunkAllocator::with_capacity(256).unwrap();
        let mut frame = FrameAllocations::new();
        let address = frame.allocate_temporary(&mut allocator, 16, 16).unwrap();
        allocator.release(address).unwrap();

        let result = frame.end_frame(&mut allocator);

        assert_eq!(result, Err(AllocError::InvalidFree { address }));
        assert_eq!(frame.len(), 0);
    }
}
