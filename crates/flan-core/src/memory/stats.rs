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

// --- Data Structures for Reporting ---

/// A snapshot of the allocator's counters, including derived metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AllocatorStats {
    // --- Current State ---
    /// The number of bytes currently held by used chunks, padding included.
    pub bytes_in_use: usize,
    /// The maximum value `bytes_in_use` has ever reached.
    pub peak_bytes_in_use: usize,
    /// The total size of the arena.
    pub capacity: usize,

    // --- Operation Counters ---
    /// The number of successful allocation calls.
    pub total_allocations: u64,
    /// The number of successful release calls.
    pub total_releases: u64,
    /// The number of successful reallocation calls.
    pub total_reallocations: u64,
    /// Reallocations served without moving the data.
    pub in_place_reallocations: u64,
    /// Allocation or reallocation requests that ended in `OutOfMemory`.
    pub failed_allocations: u64,
    /// The number of times the arena was enlarged.
    pub growth_events: u64,
    /// The net number of live allocations (`total_allocations` - `total_releases`).
    pub net_allocations: i64,

    // --- Free Space ---
    /// The total number of free bytes.
    pub total_free_bytes: usize,
    /// The size of the largest free chunk.
    pub largest_free_chunk: usize,

    // --- Calculated Metrics ---
    /// External fragmentation (`1.0 - largest_free / total_free`), zero when nothing is free.
    pub fragmentation_ratio: f64,
    /// The share of the arena currently in use.
    pub utilisation: f64,
}

impl AllocatorStats {
    /// Populates the derived metrics based on the raw counter values.
    pub fn calculate_derived_metrics(&mut self) {
        self.net_allocations = self.total_allocations as i64 - self.total_releases as i64;

        self.fragmentation_ratio = if self.total_free_bytes > 0 {
            1.0 - (self.largest_free_chunk as f64 / self.total_free_bytes as f64)
        } else {
            0.0
        };

        if self.capacity > 0 {
            self.utilisation = self.bytes_in_use as f64 / self.capacity as f64;
        }
    }
}

/// The summary shown by the memory inspector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryReport {
    /// The total size of the arena.
    pub capacity: usize,
    /// Bytes held by used chunks.
    pub used_bytes: usize,
    /// Bytes held by free chunks.
    pub free_bytes: usize,
    /// The number of used chunks.
    pub used_chunks: usize,
    /// The number of free chunks.
    pub free_chunks: usize,
    /// The size of the largest free chunk.
    pub largest_free_chunk: usize,
}

impl MemoryReport {
    /// The total number of chunks in the arena.
    pub fn chunk_count(&self) -> usize {
        self.used_chunks + self.free_chunks
    }
}

impl std::fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {} used across {} chunks ({} used, {} free), largest free chunk {}",
            format_byte_size(self.used_bytes),
            format_byte_size(self.capacity),
            self.chunk_count(),
            self.used_chunks,
            self.free_chunks,
            format_byte_size(self.largest_free_chunk)
        )
    }
}

/// Formats a byte count with a binary unit, e.g. `"512 B"` or `"1.50 KiB"`.
pub fn format_byte_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}
