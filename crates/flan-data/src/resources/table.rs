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


use flan_core::memory::ArenaBuffer;
use flan_core::resource::{ErasedResource, ResourceType};
use std::collections::HashMap;

/// One cached resource together with its bookkeeping header.
pub struct ResourceSlot {
    /// The identity hash the slot is registered under.
    pub hash: u64,
    /// The tag of the stored resource.
    pub resource_type: ResourceType,
    /// The resource identity, stored in the arena.
    pub name: ArenaBuffer,
    /// Set by `schedule_unload`, consumed by the next sweep.
    pub scheduled_for_unload: bool,
    /// The resource itself, owned exclusively by the slot.
    pub resource: Box<dyn ErasedResource>,
}

impl std::fmt::Debug for ResourceSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceSlot")
            .field("hash", &format_args!("{:016x}", self.hash))
            .field("resource_type", &self.resource_type)
            .field("name", &self.name)
            .field("scheduled_for_unload", &self.scheduled_for_unload)
            .finish_non_exhaustive()
    }
}

/// Maps identity hashes to slots in a stable vector.
///
/// Removed slots are recycled through a free list, so slot indices of live
/// entries never move.
#[derive(Debug, Default)]
pub struct ResourceTable {
    index: HashMap<u64, usize>,
    slots: Vec<Option<ResourceSlot>>,
    free: Vec<usize>,
}

impl ResourceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `slot` under its hash and returns its slot index.
    ///
    /// If the hash is already present the table is left unchanged and the
    /// slot is handed back.
    pub fn insert(&mut self, slot: ResourceSlot) -> Result<usize, ResourceSlot> {
        if self.index.contains_key(&slot.hash) {
            return Err(slot);
        }

        let hash = slot.hash;
        let position = match self.free.pop() {
            Some(position) => {
                self.slots[position] = Some(slot);
                position
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };
        self.index.insert(hash, position);
        Ok(position)
    }

    /// The slot registered under `hash`.
    pub fn get(&self, hash: u64) -> Option<&ResourceSlot> {
        let position = *self.index.get(&hash)?;
        self.slots.get(position)?.as_ref()
    }

    /// Mutable access to the slot registered under `hash`.
    pub fn get_mut(&mut self, hash: u64) -> Option<&mut ResourceSlot> {
        let position = *self.index.get(&hash)?;
        self.slots.get_mut(position)?.as_mut()
    }

    /// Whether a slot is registered under `hash`.
    pub fn contains(&self, hash: u64) -> bool {
        self.index.contains_key(&hash)
    }

    /// Removes and returns the slot registered under `hash`.
    pub fn remove(&mut self, hash: u64) -> Option<ResourceSlot> {
        let position = self.index.remove(&hash)?;
        let slot = self.slots.get_mut(position)?.take();
        self.free.push(position);
        slot
    }

    /// The number of live slots.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the table holds no slot.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterates over live slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceSlot> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// The hashes of every slot flagged for unloading, in slot order.
    pub fn scheduled(&self) -> Vec<u64> {
        self.iter()
            .filter(|slot| slot.scheduled_for_unload)
            .map(|slot| slot.hash)
            .collect()
    }

    /// Removes every slot, leaving the table empty.
    pub fn drain(&mut self) -> Vec<ResourceSlot> {
        self.index.clear();
        self.free.clear();
        self.slots.drain(..).flatten().collect()
    }
}
