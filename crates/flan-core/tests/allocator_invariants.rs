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


//! Property tests for the chunk allocator's structural invariants.
//!
//! Random sequences of allocations, releases and reallocations are replayed
//! against a small arena. After every step the chunk list must cover the arena
//! exactly, contain no adjacent free chunks, and every live allocation must
//! satisfy its alignment and keep its contents.

use flan_core::memory::{ArenaAddress, ChunkAllocator, MemoryChunk, MAX_ARENA_ALIGNMENT};
use proptest::prelude::*;

const ARENA_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone)]
enum Op {
    Allocate { size: usize, align_log2: u32 },
    Release { pick: usize },
    Reallocate { pick: usize, size: usize, align_log2: u32 },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1usize..512, 0u32..=8).prop_map(|(size, align_log2)| Op::Allocate { size, align_log2 }),
        any::<usize>().prop_map(|pick| Op::Release { pick }),
        (any::<usize>(), 1usize..512, 0u32..=8).prop_map(|(pick, size, align_log2)| {
            Op::Reallocate {
                pick,
                size,
                align_log2,
            }
        }),
    ]
}

struct Live {
    address: ArenaAddress,
    size: usize,
    alignment: usize,
    fill: u8,
}

fn holds(allocator: &ChunkAllocator, address: ArenaAddress, len: usize, fill: u8) -> bool {
    allocator
        .bytes(address, len)
        .is_some_and(|bytes| bytes.iter().all(|&byte| byte == fill))
}

fn check_structure(chunks: &[MemoryChunk]) -> Result<(), TestCaseError> {
    let mut expected_offset = 0;
    for (index, chunk) in chunks.iter().enumerate() {
        prop_assert_eq!(chunk.index, index);
        prop_assert_eq!(chunk.offset, expected_offset, "gap or overlap");
        prop_assert!(chunk.size > 0, "empty chunk at {}", chunk.offset);
        expected_offset = chunk.end();
    }
    prop_assert_eq!(expected_offset, ARENA_SIZE);
    for pair in chunks.windows(2) {
        prop_assert!(
            !(pair[0].is_free && pair[1].is_free),
            "adjacent free chunks at {} and {}",
            pair[0].offset,
            pair[1].offset
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn chunk_list_stays_consistent(ops in prop::collection::vec(arb_op(), 1..64)) {
        let mut allocator = ChunkAllocator::with_capacity(ARENA_SIZE).unwrap();
        let mut live: Vec<Live> = Vec::new();
        let mut next_fill = 1u8;

        for op in ops {
            match op {
                Op::Allocate { size, align_log2 } => {
                    let alignment = 1usize << align_log2;
                    if let Ok(address) = allocator.allocate(size, alignment) {
                        let fill = next_fill;
                        next_fill = next_fill.wrapping_add(1).max(1);
                        prop_assert!(allocator.write(address, &vec![fill; size]));
                        live.push(Live { address, size, alignment, fill });
                    }
                }
                Op::Release { pick } => {
                    if !live.is_empty() {
                        let entry = live.swap_remove(pick % live.len());
                        prop_assert!(allocator.release(entry.address).is_ok());
                        prop_assert!(allocator.release(entry.address).is_err(), "double free accepted");
                    }
                }
                Op::Reallocate { pick, size, align_log2 } => {
                    if !live.is_empty() {
                        let index = pick % live.len();
                        let alignment = 1usize << align_log2;
                        let old = live[index].address;
                        if let Ok(address) = allocator.reallocate(Some(old), size, alignment) {
                            let kept = live[index].size.min(size);
                            let fill = live[index].fill;
                            prop_assert!(holds(&allocator, address, kept, fill));
                            prop_assert!(allocator.write(address, &vec![fill; size]));
                            live[index] = Live { address, size, alignment, fill };
                        }
                    }
                }
            }

            let chunks = allocator.get_memory_chunk_list();
            check_structure(&chunks)?;

            for entry in &live {
                prop_assert_eq!(entry.address.offset() % entry.alignment, 0);
                prop_assert!(
                    holds(&allocator, entry.address, entry.size, entry.fill),
                    "allocation at {} was corrupted",
                    entry.address
                );
            }
        }
    }

    #[test]
    fn every_alignment_is_honoured(size in 1usize..1024, align_log2 in 0u32..=8) {
        let alignment = 1usize << align_log2;
        prop_assume!(alignment <= MAX_ARENA_ALIGNMENT);
        let mut allocator = ChunkAllocator::with_capacity(ARENA_SIZE).unwrap();

        // Misalign the free space first.
        allocator.allocate(3, 1).unwrap();
        let address = allocator.allocate(size, alignment).unwrap();

        prop_assert!(address.is_aligned_to(alignment));
        let bytes = allocator.bytes(address, size).unwrap();
        prop_assert_eq!(bytes.as_ptr() as usize % alignment, 0, "real memory is misaligned");
    }
}

#[test]
fn released_memory_is_reused_under_churn() {
    // --- 1. SETUP ---
    let mut allocator = ChunkAllocator::with_capacity(ARENA_SIZE).unwrap();

    // --- 2. ACTION ---
    // Allocating and releasing far more than the arena holds must never fail.
    for round in 0..1_000usize {
        let size = 64 + (round % 7) * 96;
        let a = allocator.allocate(size, 16).unwrap();
        let b = allocator.allocate(size / 2 + 1, 64).unwrap();
        allocator.release(a).unwrap();
        allocator.release(b).unwrap();
    }

    // --- 3. ASSERTIONS ---
    let chunks = allocator.get_memory_chunk_list();
    assert_eq!(chunks.len(), 1, "Everything should coalesce back");
    assert!(chunks[0].is_free);
    assert_eq!(allocator.stats().bytes_in_use, 0);
    assert_eq!(allocator.stats().total_allocations, 2_000);
}
