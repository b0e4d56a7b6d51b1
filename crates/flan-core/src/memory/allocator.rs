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


use super::{
    format_byte_size, AllocError, AllocatorStats, ArenaAddress, ArenaBuffer, LabelScope,
    MemoryChunk, MemoryReport, DEFAULT_LABEL, MAX_ARENA_ALIGNMENT,
};
use crate::config::{AllocatorConfig, ArenaGrowth};
use bytemuck::Pod;
use std::fmt;

/// A first-fit allocator carving one contiguous arena into labelled chunks.
///
/// The chunk list is kept sorted by offset and always covers the whole arena
/// with no gaps or overlaps. Adjacent free chunks are merged as soon as they
/// appear, so the list never holds two free neighbours.
pub struct ChunkAllocator {
    storage: Vec<u8>,
    /// Offset into `storage` at which the arena begins, aligned to `MAX_ARENA_ALIGNMENT`.
    base: usize,
    capacity: usize,
    chunks: Vec<Chunk>,
    label: String,
    growth: ArenaGrowth,
    default_alignment: usize,
    counters: AllocatorStats,
}

#[derive(Debug, Clone)]
struct Chunk {
    offset: usize,
    address: usize,
    size: usize,
    is_free: bool,
    label: String,
}

impl Chunk {
    fn free(offset: usize, size: usize) -> Self {
        Self {
            offset,
            address: offset,
            size,
            is_free: true,
            label: DEFAULT_LABEL.to_string(),
        }
    }

    fn end(&self) -> usize {
        self.offset + self.size
    }
}

fn align_up(value: usize, alignment: usize) -> Option<usize> {
    value
        .checked_add(alignment - 1)
        .map(|value| value & !(alignment - 1))
}

impl ChunkAllocator {
    /// Creates an allocator whose arena is sized and managed according to `config`.
    pub fn new(config: &AllocatorConfig) -> Result<Self, AllocError> {
        if config.arena_size == 0 {
            return Err(AllocError::invalid_argument(
                "arena size must be greater than zero",
            ));
        }
        if !config.default_alignment.is_power_of_two() {
            return Err(AllocError::invalid_argument(format!(
                "default alignment {} is not a power of two",
                config.default_alignment
            )));
        }

        let (storage, base) = Self::allocate_storage(config.arena_size)?;
        log::debug!(
            "Chunk allocator created with a {} arena ({:?})",
            format_byte_size(config.arena_size),
            config.growth
        );

        Ok(Self {
            storage,
            base,
            capacity: config.arena_size,
            chunks: vec![Chunk::free(0, config.arena_size)],
            label: DEFAULT_LABEL.to_string(),
            growth: config.growth,
            default_alignment: config.default_alignment,
            counters: AllocatorStats::default(),
        })
    }

    /// Creates an allocator with a fixed arena of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Self::new(&AllocatorConfig::fixed(capacity))
    }

    fn allocate_storage(capacity: usize) -> Result<(Vec<u8>, usize), AllocError> {
        let total = capacity
            .checked_add(MAX_ARENA_ALIGNMENT)
            .ok_or_else(|| AllocError::invalid_argument("arena size overflows usize"))?;
        let mut storage = Vec::new();
        if let Err(err) = storage.try_reserve_exact(total) {
            log::warn!("Cannot reserve a {} arena: {err}", format_byte_size(total));
            return Err(AllocError::OutOfMemory {
                requested: capacity,
                alignment: MAX_ARENA_ALIGNMENT,
                label: DEFAULT_LABEL.to_string(),
                largest_free: 0,
            });
        }
        storage.resize(total, 0);
        let base = match storage.as_ptr().align_offset(MAX_ARENA_ALIGNMENT) {
            offset if offset < MAX_ARENA_ALIGNMENT => offset,
            _ => 0,
        };
        Ok((storage, base))
    }

    /// The current size of the arena in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The alignment configured for callers without a specific requirement.
    pub fn default_alignment(&self) -> usize {
        self.default_alignment
    }

    // --- Allocation ---

    /// Allocates `size` bytes aligned to `alignment`, labelled with the current label.
    pub fn allocate(&mut self, size: usize, alignment: usize) -> Result<ArenaAddress, AllocError> {
        let label = self.label.clone();
        let address = self.allocate_chunk(size, alignment, label)?;
        self.counters.total_allocations += 1;
        Ok(address)
    }

    /// Allocates `size` bytes aligned to `alignment` with an explicit label.
    pub fn allocate_labeled(
        &mut self,
        size: usize,
        alignment: usize,
        label: &str,
    ) -> Result<ArenaAddress, AllocError> {
        let address = self.allocate_chunk(size, alignment, label.to_string())?;
        self.counters.total_allocations += 1;
        Ok(address)
    }

    /// Allocates a buffer holding a copy of `data`.
    pub fn allocate_bytes(
        &mut self,
        data: &[u8],
        alignment: usize,
        label: &str,
    ) -> Result<ArenaBuffer, AllocError> {
        let address = self.allocate_labeled(data.len(), alignment, label)?;
        let start = self.base + address.0;
        self.storage[start..start + data.len()].copy_from_slice(data);
        Ok(ArenaBuffer {
            address,
            len: data.len(),
        })
    }

    /// Resizes an allocation, moving it only when it cannot be resized in place.
    ///
    /// `None` behaves like [`allocate`](Self::allocate). A moved allocation keeps
    /// its label and the first `min(old, new)` bytes of its contents. On failure
    /// the original allocation is left untouched.
    pub fn reallocate(
        &mut self,
        address: Option<ArenaAddress>,
        new_size: usize,
        alignment: usize,
    ) -> Result<ArenaAddress, AllocError> {
        let Some(address) = address else {
            return self.allocate(new_size, alignment);
        };

        let rounded = Self::validate_request(new_size, alignment)?;
        let index = self
            .find_used(address)
            .ok_or(AllocError::InvalidFree { address })?;

        if address.is_aligned_to(alignment) {
            let (offset, size) = (self.chunks[index].offset, self.chunks[index].size);
            let need = (address.0 - offset)
                .checked_add(rounded)
                .ok_or_else(|| AllocError::invalid_argument("size overflows usize"))?;

            if need <= size {
                self.shrink_in_place(index, need);
                return Ok(self.finish_in_place(address, new_size));
            }

            let next_free = self
                .chunks
                .get(index + 1)
                .filter(|next| next.is_free)
                .map(|next| next.size);
            if let Some(next_size) = next_free {
                if size + next_size >= need {
                    let next = self.chunks.remove(index + 1);
                    self.chunks[index].size += next.size;
                    self.counters.bytes_in_use += next.size;
                    self.shrink_in_place(index, need);
                    return Ok(self.finish_in_place(address, new_size));
                }
            }
        }

        let (usable, label) = {
            let chunk = &self.chunks[index];
            (chunk.end() - chunk.address, chunk.label.clone())
        };
        let new_address = self.allocate_chunk(new_size, alignment, label)?;

        let copy_len = usable.min(new_size);
        let src = self.base + address.0;
        self.storage
            .copy_within(src..src + copy_len, self.base + new_address.0);

        let old_index = self
            .find_used(address)
            .ok_or(AllocError::InvalidFree { address })?;
        self.free_chunk(old_index);

        self.counters.total_reallocations += 1;
        log::trace!("Moved allocation {address} to {new_address} ({new_size} bytes)");
        Ok(new_address)
    }

    fn finish_in_place(&mut self, address: ArenaAddress, new_size: usize) -> ArenaAddress {
        self.counters.total_reallocations += 1;
        self.counters.in_place_reallocations += 1;
        self.counters.peak_bytes_in_use = self
            .counters
            .peak_bytes_in_use
            .max(self.counters.bytes_in_use);
        log::trace!("Resized allocation {address} in place to {new_size} bytes");
        address
    }

    /// Releases the allocation starting at `address`.
    ///
    /// Fails with [`AllocError::InvalidFree`] if `address` is not the start of a
    /// used chunk, which covers double frees and addresses never handed out.
    pub fn release(&mut self, address: ArenaAddress) -> Result<(), AllocError> {
        let index = self
            .find_used(address)
            .ok_or(AllocError::InvalidFree { address })?;
        self.free_chunk(index);
        self.counters.total_releases += 1;
        Ok(())
    }

    /// Releases the allocation behind `buffer`.
    pub fn release_buffer(&mut self, buffer: ArenaBuffer) -> Result<(), AllocError> {
        self.release(buffer.address)
    }

    fn validate_request(size: usize, alignment: usize) -> Result<usize, AllocError> {
        if size == 0 {
            return Err(AllocError::invalid_argument(
                "size must be greater than zero",
            ));
        }
        if !alignment.is_power_of_two() {
            return Err(AllocError::invalid_argument(format!(
                "alignment {alignment} is not a power of two"
            )));
        }
        if alignment > MAX_ARENA_ALIGNMENT {
            return Err(AllocError::invalid_argument(format!(
                "alignment {alignment} exceeds the arena alignment of {MAX_ARENA_ALIGNMENT}"
            )));
        }
        align_up(size, alignment)
            .ok_or_else(|| AllocError::invalid_argument("size overflows usize"))
    }

    fn allocate_chunk(
        &mut self,
        size: usize,
        alignment: usize,
        label: String,
    ) -> Result<ArenaAddress, AllocError> {
        let rounded = Self::validate_request(size, alignment)?;

        let mut fit = self.find_fit(rounded, alignment);
        if fit.is_none() && self.grow_for(rounded, alignment) {
            fit = self.find_fit(rounded, alignment);
        }

        let Some((index, address, need)) = fit else {
            self.counters.failed_allocations += 1;
            let largest_free = self.largest_free_chunk();
            log::warn!(
                "Arena exhausted: {size} bytes for '{label}' do not fit (largest free chunk: {largest_free} bytes)"
            );
            return Err(AllocError::OutOfMemory {
                requested: size,
                alignment,
                label,
                largest_free,
            });
        };

        log::trace!("Allocated {need} bytes at {address:#x} for '{label}'");
        self.place(index, address, need, label);
        Ok(ArenaAddress(address))
    }

    /// Finds the first free chunk able to hold `rounded` bytes at `alignment`.
    /// Returns the chunk index, the aligned address and the bytes the chunk must keep.
    fn find_fit(&self, rounded: usize, alignment: usize) -> Option<(usize, usize, usize)> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| chunk.is_free)
            .find_map(|(index, chunk)| {
                let address = align_up(chunk.offset, alignment)?;
                let need = (address - chunk.offset).checked_add(rounded)?;
                (need <= chunk.size).then_some((index, address, need))
            })
    }

    fn place(&mut self, index: usize, address: usize, need: usize, label: String) {
        let chunk = &mut self.chunks[index];
        let remainder = chunk.size - need;
        let tail_offset = chunk.offset + need;

        chunk.size = need;
        chunk.address = address;
        chunk.is_free = false;
        chunk.label = label;

        if remainder > 0 {
            self.chunks
                .insert(index + 1, Chunk::free(tail_offset, remainder));
        }

        self.counters.bytes_in_use += need;
        self.counters.peak_bytes_in_use = self
            .counters
            .peak_bytes_in_use
            .max(self.counters.bytes_in_use);
    }

    fn shrink_in_place(&mut self, index: usize, need: usize) {
        let chunk = &mut self.chunks[index];
        let remainder = chunk.size - need;
        if remainder == 0 {
            return;
        }

        chunk.size = need;
        let tail = Chunk::free(chunk.offset + need, remainder);
        self.chunks.insert(index + 1, tail);
        self.counters.bytes_in_use -= remainder;
        self.coalesce(index + 1);
    }

    fn free_chunk(&mut self, index: usize) {
        let chunk = &mut self.chunks[index];
        log::trace!(
            "Released {} bytes at {:#x} ('{}')",
            chunk.size,
            chunk.address,
            chunk.label
        );

        chunk.is_free = true;
        chunk.address = chunk.offset;
        chunk.label = DEFAULT_LABEL.to_string();
        self.counters.bytes_in_use -= chunk.size;
        self.coalesce(index);
    }

    /// Merges the free chunk at `index` with its free neighbours.
    fn coalesce(&mut self, index: usize) {
        if self.chunks.get(index + 1).is_some_and(|next| next.is_free) {
            let next = self.chunks.remove(index + 1);
            self.chunks[index].size += next.size;
        }
        if index > 0 && self.chunks[index - 1].is_free {
            let current = self.chunks.remove(index);
            self.chunks[index - 1].size += current.size;
        }
    }

    /// Enlarges the arena so that a `rounded` byte request at `alignment` is
    /// guaranteed to fit. Returns `false` when the growth policy forbids it.
    fn grow_for(&mut self, rounded: usize, alignment: usize) -> bool {
        let ArenaGrowth::Grow { step, max_capacity } = self.growth else {
            return false;
        };

        // Worst case: the new tail starts misaligned and nothing before it is free.
        let Some(minimum) = rounded.checked_add(alignment) else {
            return false;
        };
        let Some(mut new_capacity) = self.capacity.checked_add(step.max(minimum)) else {
            return false;
        };
        if let Some(max) = max_capacity {
            if new_capacity > max {
                match self.capacity.checked_add(minimum) {
                    Some(needed) if needed <= max => new_capacity = max,
                    _ => return false,
                }
            }
        }

        let Ok((mut storage, base)) = Self::allocate_storage(new_capacity) else {
            return false;
        };
        storage[base..base + self.capacity]
            .copy_from_slice(&self.storage[self.base..self.base + self.capacity]);

        let extra = new_capacity - self.capacity;
        match self.chunks.last_mut() {
            Some(last) if last.is_free => last.size += extra,
            _ => self.chunks.push(Chunk::free(self.capacity, extra)),
        }

        self.storage = storage;
        self.base = base;
        self.capacity = new_capacity;
        self.counters.growth_events += 1;
        log::debug!("Arena grown to {}", format_byte_size(new_capacity));
        true
    }

    fn find_used(&self, address: ArenaAddress) -> Option<usize> {
        let index = self
            .chunks
            .partition_point(|chunk| chunk.offset <= address.0)
            .checked_sub(1)?;
        let chunk = &self.chunks[index];
        (!chunk.is_free && chunk.address == address.0).then_some(index)
    }

    /// Checks that `[address, address + len)` lies in the usable part of a used chunk.
    fn check_range(&self, address: ArenaAddress, len: usize) -> Option<usize> {
        let index = self
            .chunks
            .partition_point(|chunk| chunk.offset <= address.0)
            .checked_sub(1)?;
        let chunk = &self.chunks[index];
        if chunk.is_free || address.0 < chunk.address {
            return None;
        }
        let end = address.0.checked_add(len)?;
        (end <= chunk.end()).then_some(self.base + address.0)
    }

    fn largest_free_chunk(&self) -> usize {
        self.chunks
            .iter()
            .filter(|chunk| chunk.is_free)
            .map(|chunk| chunk.size)
            .max()
            .unwrap_or(0)
    }

    // --- Data Access ---

    /// The bytes in `[address, address + len)`, if they belong to a live allocation.
    pub fn bytes(&self, address: ArenaAddress, len: usize) -> Option<&[u8]> {
        let start = self.check_range(address, len)?;
        Some(&self.storage[start..start + len])
    }

    /// Mutable access to `[address, address + len)`, if it belongs to a live allocation.
    pub fn bytes_mut(&mut self, address: ArenaAddress, len: usize) -> Option<&mut [u8]> {
        let start = self.check_range(address, len)?;
        Some(&mut self.storage[start..start + len])
    }

    /// Copies `data` to `address`. Returns `false` if the range is not part of a live allocation.
    pub fn write(&mut self, address: ArenaAddress, data: &[u8]) -> bool {
        match self.bytes_mut(address, data.len()) {
            Some(target) => {
                target.copy_from_slice(data);
                true
            }
            None => false,
        }
    }

    /// The bytes referenced by `buffer`.
    pub fn buffer_bytes(&self, buffer: ArenaBuffer) -> Option<&[u8]> {
        self.bytes(buffer.address, buffer.len)
    }

    /// Views `buffer` as a slice of `T`. `None` if the buffer is dead or misaligned for `T`.
    pub fn cast_buffer<T: Pod>(&self, buffer: ArenaBuffer) -> Option<&[T]> {
        bytemuck::try_cast_slice(self.buffer_bytes(buffer)?).ok()
    }

    // --- Labels ---

    /// Sets the label carried by subsequent allocations.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Restores the default label.
    pub fn reset_label(&mut self) {
        self.label = DEFAULT_LABEL.to_string();
    }

    /// The label carried by subsequent allocations.
    pub fn current_label(&self) -> &str {
        &self.label
    }

    /// Sets `label` for the lifetime of the returned guard.
    pub fn labeled(&mut self, label: impl Into<String>) -> LabelScope<'_> {
        LabelScope::new(self, label.into())
    }

    pub(super) fn replace_label(&mut self, label: String) -> String {
        std::mem::replace(&mut self.label, label)
    }

    // --- Diagnostics ---

    /// A snapshot of every chunk, in address order.
    pub fn get_memory_chunk_list(&self) -> Vec<MemoryChunk> {
        self.chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| MemoryChunk {
                offset: chunk.offset,
                address: ArenaAddress(chunk.address),
                size: chunk.size,
                is_free: chunk.is_free,
                label: chunk.label.clone(),
                index,
            })
            .collect()
    }

    /// Takes a snapshot of the allocator's counters and computes the derived metrics.
    pub fn stats(&self) -> AllocatorStats {
        let mut stats = AllocatorStats {
            capacity: self.capacity,
            total_free_bytes: self
                .chunks
                .iter()
                .filter(|chunk| chunk.is_free)
                .map(|chunk| chunk.size)
                .sum(),
            largest_free_chunk: self.largest_free_chunk(),
            ..self.counters
        };
        stats.calculate_derived_metrics();
        stats
    }

    /// Summarises the arena for the memory inspector.
    pub fn memory_report(&self) -> MemoryReport {
        let mut report = MemoryReport {
            capacity: self.capacity,
            ..Default::default()
        };
        for chunk in &self.chunks {
            if chunk.is_free {
                report.free_bytes += chunk.size;
                report.free_chunks += 1;
                report.largest_free_chunk = report.largest_free_chunk.max(chunk.size);
            } else {
                report.used_bytes += chunk.size;
                report.used_chunks += 1;
            }
        }
        report
    }
}

impl fmt::Debug for ChunkAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkAllocator")
            .field("capacity", &self.capacity)
            .field("chunks", &self.chunks.len())
            .field("label", &self.label)
            .field("growth", &self.growth)
            .finish()
    }
}
