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


// Flan Sandbox
// Loads the configured resources, runs a few frames and reports memory use.

use std::cell::RefCell;
use std::env;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use flan_agents::resource_agent::{DefaultTextures, ResourceCache};
use flan_core::resource::{Material, Model, ResourceHandle, Shader, ShaderStage, Texture};
use flan_core::{ChunkAllocator, FlanConfig};
use flan_data::allocators::FrameAllocations;
use flan_io::FileSystemSource;

const FRAME_COUNT: usize = 3;
const FRAME_TIME: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Flan.toml"));
    let config = FlanConfig::load(&config_path)?;

    let allocator = ChunkAllocator::new(&config.allocator)
        .context("Failed to reserve the resource arena")?;
    let allocator = Rc::new(RefCell::new(allocator));
    log::info!("Reserved a {} byte arena", allocator.borrow().capacity());

    let source = FileSystemSource::new(&config.resources.asset_root);
    let mut cache = ResourceCache::with_standard_loaders(allocator.clone(), source);
    let defaults = DefaultTextures::create(&mut cache)?;
    log::debug!("Default textures: {defaults:?}");

    let loaded: Vec<ResourceHandle> = config
        .resources
        .preload
        .iter()
        .filter_map(|path| preload(&mut cache, path))
        .collect();
    log::info!(
        "Preloaded {}/{} resources",
        loaded.len(),
        config.resources.preload.len()
    );

    let mut frame = FrameAllocations::new();
    for index in 0..FRAME_COUNT {
        {
            let mut allocator = allocator.borrow_mut();
            frame.allocate_temporary(&mut allocator, 4 * 1024, 16)?;
            frame.allocate_temporary(&mut allocator, 256, 64)?;
        }

        // Everything preloaded is dropped after the first frame.
        if index == 0 {
            for &handle in &loaded {
                cache.schedule_unload(handle);
            }
        }

        frame.end_frame(&mut allocator.borrow_mut())?;
        let swept = cache.tick(FRAME_TIME);
        log::info!("Frame {index}: swept {swept} resources");
    }

    report(&cache);
    Ok(())
}

/// Loads `path` with the lane matching its extension.
fn preload(cache: &mut ResourceCache, path: &str) -> Option<ResourceHandle> {
    let extension = Path::new(path.split('#').next().unwrap_or(path))
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let handle = match extension.as_str() {
        "png" | "jpg" | "jpeg" | "bmp" | "tga" => cache.load_from_disk::<Texture>(path),
        "obj" => cache.load_from_disk::<Model>(path),
        "mtl" => cache.load_from_disk::<Material>(path),
        other if ShaderStage::from_extension(other).is_some() => {
            cache.load_from_disk::<Shader>(path)
        }
        _ => {
            log::warn!("Skipping '{path}': unknown resource extension");
            return None;
        }
    };
    handle.is_valid().then_some(handle)
}

fn report(cache: &ResourceCache) {
    let allocator = cache.allocator().borrow();
    log::info!("{}", allocator.memory_report());

    let stats = allocator.stats();
    log::info!(
        "Allocator: {} allocations, {} releases, peak {} bytes, fragmentation {:.2}",
        stats.total_allocations,
        stats.total_releases,
        stats.peak_bytes_in_use,
        stats.fragmentation_ratio
    );
    log::info!("Cache: {:?}", cache.stats());

    if log::log_enabled!(log::Level::Debug) {
        match serde_json::to_string_pretty(&allocator.get_memory_chunk_list()) {
            Ok(json) => log::debug!("Chunks: {json}"),
            Err(err) => log::warn!("Cannot serialise the chunk list: {err}"),
        }
        match serde_json::to_string_pretty(&cache.debug_loaded_resources()) {
            Ok(json) => log::debug!("Resources: {json}"),
            Err(err) => log::warn!("Cannot serialise the resource list: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_preloads_every_asset() {
        // --- 1. SETUP ---
        let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
        let config = FlanConfig::load(&workspace.join("Flan.toml")).unwrap();
        let allocator = Rc::new(RefCell::new(ChunkAllocator::new(&config.allocator).unwrap()));
        let source = FileSystemSource::new(workspace.join(&config.resources.asset_root));
        let mut cache = ResourceCache::with_standard_loaders(allocator, source);

        // --- 2. ACTION ---
        let loaded: Vec<_> = config
            .resources
            .preload
            .iter()
            .filter_map(|path| preload(&mut cache, path))
            .collect();

        // --- 3. ASSERTIONS ---
        assert!(!config.resources.preload.is_empty());
        assert_eq!(loaded.len(), config.resources.preload.len());
        assert_eq!(cache.stats().failures, 0);
    }
}
