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


//! The resource cache.

use super::context::CacheLoadContext;
use super::diagnostics::{CacheStats, ResourceDebug};
use super::loader::ResourceLoaderLaneRegistry;
use flan_core::memory::{ArenaBuffer, ChunkAllocator, SharedAllocator};
use flan_core::resource::{
    identity_hash, split_identity, ErasedResource, Material, Model, Resource, ResourceError,
    ResourceHandle, ResourceLoaderLane, ResourceType, Shader, Texture,
};
use flan_data::resources::{ResourceSlot, ResourceTable};
use flan_io::FileSource;
use flan_lanes::resource_lane::{
    MaterialLoaderLane, ModelLoaderLane, ShaderLoaderLane, TextureLoaderLane,
};
use std::cell::Ref;
use std::collections::HashSet;
use std::fmt;

/// A content-addressed cache owning every loaded resource.
///
/// Resources are identified by the hash of their identity string, so loading
/// the same path twice yields the same handle and touches the disk once.
/// Destruction is deferred: [`schedule_unload`](Self::schedule_unload) only
/// flags an entry, and [`tick`](Self::tick) releases it.
///
/// The cache borrows the shared allocator while loading and sweeping; callers
/// must not hold a borrow of it across those calls.
pub struct ResourceCache {
    allocator: SharedAllocator,
    source: Box<dyn FileSource>,
    loaders: ResourceLoaderLaneRegistry,
    table: ResourceTable,
    /// Identities currently being decoded, to break dependency cycles.
    loading: HashSet<u64>,
    stats: CacheStats,
}

impl ResourceCache {
    /// Creates an empty cache without any loader.
    pub fn new(allocator: SharedAllocator, source: impl FileSource + 'static) -> Self {
        Self {
            allocator,
            source: Box::new(source),
            loaders: ResourceLoaderLaneRegistry::default(),
            table: ResourceTable::new(),
            loading: HashSet::new(),
            stats: CacheStats::default(),
        }
    }

    /// Creates a cache with the texture, model, material and shader lanes registered.
    pub fn with_standard_loaders(
        allocator: SharedAllocator,
        source: impl FileSource + 'static,
    ) -> Self {
        let mut cache = Self::new(allocator, source);
        cache.register_loader::<Texture>(TextureLoaderLane);
        cache.register_loader::<Model>(ModelLoaderLane);
        cache.register_loader::<Material>(MaterialLoaderLane);
        cache.register_loader::<Shader>(ShaderLoaderLane);
        cache
    }

    /// Registers the lane used to decode resources of type `R`.
    pub fn register_loader<R: Resource>(&mut self, loader: impl ResourceLoaderLane<R> + 'static) {
        self.loaders.register::<R>(loader);
    }

    /// Whether a lane is registered for `resource_type`.
    pub fn has_loader(&self, resource_type: ResourceType) -> bool {
        self.loaders.contains(resource_type)
    }

    /// The allocator backing every cached resource.
    pub fn allocator(&self) -> &SharedAllocator {
        &self.allocator
    }

    pub(crate) fn read_file(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        self.source.read(path)
    }

    // --- Loading ---

    /// Loads the resource at `path`, or returns the cached handle if it is already loaded.
    ///
    /// `path` may carry a `#fragment` naming a sub-resource; only the part
    /// before `#` is read. Failures are logged and return
    /// [`ResourceHandle::INVALID`]. Nothing is cached for a failed path, so the
    /// next call retries.
    pub fn load_from_disk<T: Resource>(&mut self, path: &str) -> ResourceHandle {
        self.load_typed(T::TYPE, path)
    }

    pub(crate) fn load_typed(
        &mut self,
        resource_type: ResourceType,
        identity: &str,
    ) -> ResourceHandle {
        if resource_type == ResourceType::Invalid || identity.is_empty() {
            log::error!("Refusing to load {resource_type} resource with identity '{identity}'");
            self.stats.failures += 1;
            return ResourceHandle::INVALID;
        }

        let hash = identity_hash(identity);
        if let Some(cached) = self.table.get(hash).map(|slot| slot.resource_type) {
            self.stats.hits += 1;
            if cached != resource_type {
                log::warn!("'{identity}' is cached as a {cached}, not a {resource_type}");
            } else {
                log::debug!("Cache hit for {resource_type} '{identity}'");
            }
            return ResourceHandle::new(hash, cached);
        }

        if self.loading.contains(&hash) {
            log::error!("Circular dependency: '{identity}' was requested while being loaded");
            self.stats.failures += 1;
            return ResourceHandle::INVALID;
        }

        self.stats.misses += 1;
        log::debug!("Cache miss for {resource_type} '{identity}'");

        match self.load_uncached(resource_type, identity, hash) {
            Ok(handle) => {
                log::info!("Loaded {resource_type} '{identity}'");
                handle
            }
            Err(err) => {
                self.stats.failures += 1;
                log::error!("Failed to load {resource_type} '{identity}': {err}");
                ResourceHandle::INVALID
            }
        }
    }

    fn load_uncached(
        &mut self,
        resource_type: ResourceType,
        identity: &str,
        hash: u64,
    ) -> Result<ResourceHandle, ResourceError> {
        let loader = self
            .loaders
            .get(resource_type)
            .ok_or(ResourceError::NoLoader { resource_type })?;

        let (path, _) = split_identity(identity);
        let bytes = self.source.read(path)?;

        self.loading.insert(hash);
        let result = {
            let mut ctx = CacheLoadContext {
                cache: self,
                identity,
            };
            loader.load_any(&mut ctx, &bytes)
        };
        self.loading.remove(&hash);

        self.insert(hash, identity, result?)
    }

    /// Takes ownership of an already built resource and caches it under `name`.
    ///
    /// If `name` is already cached, `resource` is released and the existing
    /// handle is returned.
    pub fn load_from_buffer<T: Resource>(&mut self, name: &str, mut resource: T) -> ResourceHandle {
        let hash = identity_hash(name);
        let existing = self.table.get(hash).map(|slot| slot.resource_type);

        if name.is_empty() || existing.is_some() {
            if let Err(err) = resource.release(&mut self.allocator.borrow_mut()) {
                log::error!("Failed to release {} '{name}': {err}", T::TYPE);
            }
        }

        if name.is_empty() {
            log::error!("Refusing to cache a {} without a name", T::TYPE);
            self.stats.failures += 1;
            return ResourceHandle::INVALID;
        }
        if let Some(existing) = existing {
            log::debug!("'{name}' is already cached; released the incoming {}", T::TYPE);
            self.stats.hits += 1;
            return ResourceHandle::new(hash, existing);
        }

        self.stats.misses += 1;
        match self.insert(hash, name, Box::new(resource)) {
            Ok(handle) => handle,
            Err(err) => {
                self.stats.failures += 1;
                log::error!("Failed to cache {} '{name}': {err}", T::TYPE);
                ResourceHandle::INVALID
            }
        }
    }

    fn insert(
        &mut self,
        hash: u64,
        identity: &str,
        mut resource: Box<dyn ErasedResource>,
    ) -> Result<ResourceHandle, ResourceError> {
        let resource_type = resource.resource_type();
        let label = format!("{} - name - {identity}", resource_type.label_prefix());

        let name = {
            let mut allocator = self.allocator.borrow_mut();
            match allocator.allocate_bytes(identity.as_bytes(), 1, &label) {
                Ok(name) => name,
                Err(err) => {
                    if let Err(release_err) = resource.release_resource(&mut allocator) {
                        log::error!("Failed to release {resource_type} '{identity}': {release_err}");
                    }
                    return Err(err.into());
                }
            }
        };

        let slot = ResourceSlot {
            hash,
            resource_type,
            name,
            scheduled_for_unload: false,
            resource,
        };
        if let Err(mut rejected) = self.table.insert(slot) {
            release_slot(&mut self.allocator.borrow_mut(), &mut rejected);
            let cached = self
                .table
                .get(hash)
                .map_or(resource_type, |slot| slot.resource_type);
            return Ok(ResourceHandle::new(hash, cached));
        }

        Ok(ResourceHandle::new(hash, resource_type))
    }

    // --- Access ---

    /// Resolves `handle` to its resource.
    ///
    /// Absent handles fail with [`ResourceError::InvalidHandle`]; a live entry of
    /// another type fails with [`ResourceError::TypeMismatch`].
    pub fn get<T: Resource>(&self, handle: ResourceHandle) -> Result<&T, ResourceError> {
        if !handle.is_valid() {
            return Err(ResourceError::InvalidHandle { handle });
        }

        let slot = self
            .table
            .get(handle.hash)
            .ok_or(ResourceError::InvalidHandle { handle })?;
        let mismatch = ResourceError::TypeMismatch {
            expected: T::TYPE,
            found: slot.resource_type,
        };
        if slot.resource_type != T::TYPE {
            return Err(mismatch);
        }
        if handle.resource_type != slot.resource_type {
            return Err(ResourceError::InvalidHandle { handle });
        }

        slot.resource.as_any().downcast_ref::<T>().ok_or(mismatch)
    }

    /// Whether `handle` currently resolves to a cached resource.
    pub fn contains(&self, handle: ResourceHandle) -> bool {
        handle.is_valid()
            && self
                .table
                .get(handle.hash)
                .is_some_and(|slot| slot.resource_type == handle.resource_type)
    }

    /// The identity `handle` was loaded under.
    pub fn name_of(&self, handle: ResourceHandle) -> Option<String> {
        if !handle.is_valid() {
            return None;
        }
        let slot = self.table.get(handle.hash)?;
        let bytes = self.read_buffer(slot.name)?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Borrows the bytes of an arena buffer owned by a cached resource.
    ///
    /// Returns `None` if the buffer is dead or the allocator is mutably borrowed.
    pub fn read_buffer(&self, buffer: ArenaBuffer) -> Option<Ref<'_, [u8]>> {
        let allocator = self.allocator.try_borrow().ok()?;
        Ref::filter_map(allocator, |allocator| allocator.buffer_bytes(buffer)).ok()
    }

    // --- Destruction ---

    /// Flags the resource behind `handle` for release at the next [`tick`](Self::tick).
    ///
    /// Scheduling twice is harmless. Invalid, stale or mistyped handles are ignored.
    pub fn schedule_unload(&mut self, handle: ResourceHandle) {
        if !handle.is_valid() {
            log::warn!("Ignoring unload request for an invalid handle");
            return;
        }

        match self.table.get_mut(handle.hash) {
            Some(slot) if slot.resource_type != handle.resource_type => log::warn!(
                "Ignoring unload request for {handle}: the entry is a {}",
                slot.resource_type
            ),
            Some(slot) if !slot.scheduled_for_unload => {
                slot.scheduled_for_unload = true;
                log::debug!("Scheduled {handle} for unload");
            }
            Some(_) => {}
            None => log::warn!("Ignoring unload request for {handle}: it is not cached"),
        }
    }

    /// Releases every resource scheduled for unload and returns how many were swept.
    ///
    /// `delta_time` is only reported; the sweep always runs to completion.
    pub fn tick(&mut self, delta_time: f32) -> usize {
        let scheduled = self.table.scheduled();
        if scheduled.is_empty() {
            return 0;
        }

        let mut swept = 0;
        {
            let mut allocator = self.allocator.borrow_mut();
            for hash in scheduled {
                if let Some(mut slot) = self.table.remove(hash) {
                    release_slot(&mut allocator, &mut slot);
                    swept += 1;
                }
            }
        }

        self.stats.unloads += swept as u64;
        log::debug!("Swept {swept} resources (frame time {delta_time:.4}s)");
        swept
    }

    // --- Diagnostics ---

    /// The number of cached resources.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Hit, miss, failure and unload counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Lists every cached resource with its type and name.
    pub fn debug_loaded_resources(&self) -> Vec<ResourceDebug> {
        let allocator = self.allocator.borrow();
        self.table
            .iter()
            .map(|slot| ResourceDebug {
                hash: slot.hash,
                resource_type: slot.resource_type,
                name: allocator
                    .buffer_bytes(slot.name)
                    .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                    .unwrap_or_default(),
                scheduled_for_unload: slot.scheduled_for_unload,
            })
            .collect()
    }
}

fn release_slot(allocator: &mut ChunkAllocator, slot: &mut ResourceSlot) {
    if let Err(err) = slot.resource.release_resource(allocator) {
        log::error!(
            "Failed to release {} {:016x}: {err}",
            slot.resource_type,
            slot.hash
        );
    }
    if let Err(err) = allocator.release_buffer(slot.name) {
        log::error!(
            "Failed to release the name of {} {:016x}: {err}",
            slot.resource_type,
            slot.hash
        );
    }
}

impl Drop for ResourceCache {
    fn drop(&mut self) {
        if self.table.is_empty() {
            return;
        }

        match self.allocator.try_borrow_mut() {
            Ok(mut allocator) => {
                let slots = self.table.drain();
                let count = slots.len();
                for mut slot in slots {
                    release_slot(&mut allocator, &mut slot);
                }
                log::debug!("Released {count} resources on shutdown");
            }
            Err(_) => log::warn!(
                "Allocator is borrowed; {} cached resources were not released",
                self.table.len()
            ),
        }
    }
}

impl fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("resources", &self.table.len())
            .field("loading", &self.loading.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
