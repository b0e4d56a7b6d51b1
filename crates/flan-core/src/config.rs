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

//! Engine configuration, loaded from a `Flan.toml` file.
//!
//! Every section has sensible defaults, so a missing file or a partially
//! filled one is always valid. Values are validated once at load time.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default size of the backing arena: 128 MiB.
pub const DEFAULT_ARENA_SIZE: usize = 128 * 1024 * 1024;

/// Default alignment used for bulk resource data (SIMD friendly).
pub const DEFAULT_ALIGNMENT: usize = 16;

/// Top-level configuration, the in-memory form of `Flan.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlanConfig {
    /// Settings for the chunked allocator.
    pub allocator: AllocatorConfig,
    /// Settings for the resource cache.
    pub resources: ResourceConfig,
}

/// How the arena behaves once no free chunk can satisfy a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArenaGrowth {
    /// The arena never grows; exhausting it is a hard `OutOfMemory`.
    #[default]
    Fixed,
    /// The arena grows by at least `step` bytes, up to `max_capacity` if set.
    Grow {
        /// Minimum number of bytes appended per growth event.
        step: usize,
        /// Upper bound on the total arena size.
        #[serde(default)]
        max_capacity: Option<usize>,
    },
}

/// Configuration for the [`ChunkAllocator`](crate::memory::ChunkAllocator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Initial arena size in bytes.
    pub arena_size: usize,
    /// Growth policy applied when the arena is exhausted.
    pub growth: ArenaGrowth,
    /// Alignment used by callers that do not have a specific requirement.
    pub default_alignment: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            arena_size: DEFAULT_ARENA_SIZE,
            growth: ArenaGrowth::Fixed,
            default_alignment: DEFAULT_ALIGNMENT,
        }
    }
}

impl AllocatorConfig {
    /// A fixed-size arena of `arena_size` bytes.
    pub fn fixed(arena_size: usize) -> Self {
        Self {
            arena_size,
            ..Default::default()
        }
    }
}

/// Configuration for the resource cache and the sandbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Directory every resource path is resolved against.
    pub asset_root: PathBuf,
    /// Resource paths loaded eagerly at startup.
    pub preload: Vec<String>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            preload: Vec::new(),
        }
    }
}

impl FlanConfig {
    /// Loads the configuration from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!(
                "No '{}' found. Using default configuration.",
                path.display()
            );
            return Ok(Self::default());
        }

        log::info!("Found '{}'. Loading configuration.", path.display());
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{}'", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid configuration in '{}'", path.display()))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: FlanConfig = toml::from_str(text).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the allocator relies on.
    pub fn validate(&self) -> Result<()> {
        let allocator = &self.allocator;
        if allocator.arena_size == 0 {
            bail!("allocator.arena_size must be greater than zero");
        }
        if !allocator.default_alignment.is_power_of_two() {
            bail!(
                "allocator.default_alignment must be a power of two, got {}",
                allocator.default_alignment
            );
        }
        if let ArenaGrowth::Grow { step, max_capacity } = allocator.growth {
            if step == 0 {
                bail!("allocator.growth.grow.step must be greater than zero");
            }
            if let Some(max) = max_capacity {
                if max < allocator.arena_size {
                    bail!(
                        "allocator.growth.grow.max_capacity ({max}) is smaller than arena_size ({})",
                        allocator.arena_size
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = FlanConfig::from_toml_str("").unwrap();
        assert_eq!(config, FlanConfig::default());
        assert_eq!(config.allocator.growth, ArenaGrowth::Fixed);
    }

    #[test]
    fn parses_growth_policy() {
        let config = FlanConfig::from_toml_str(
            r#"
            [allocator]
            arena_size = 4096
            growth = { grow = { step = 1024, max_capacity = 8192 } }

            [resources]
            asset_root = "content"
            preload = ["textures/test.png"]
            "#,
        )
        .unwrap();

        assert_eq!(config.allocator.arena_size, 4096);
        assert_eq!(
            config.allocator.growth,
            ArenaGrowth::Grow {
                step: 1024,
                max_capacity: Some(8192)
            }
        );
        assert_eq!(config.allocator.default_alignment, DEFAULT_ALIGNMENT);
        assert_eq!(config.resources.asset_root, PathBuf::from("content"));
        assert_eq!(config.resources.preload, vec!["textures/test.png"]);
    }

    #[test]
    fn rejects_non_power_of_two_alignment() {
        let result = FlanConfig::from_toml_str(
            r#"
            [allocator]
            default_alignment = 12
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_max_capacity_below_arena_size() {
        let result = FlanConfig::from_toml_str(
            r#"
            [allocator]
            arena_size = 4096
            growth = { grow = { step = 1024, max_capacity = 1024 } }
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FlanConfig::load(&dir.path().join("Flan.toml")).unwrap();
        assert_eq!(config, FlanConfig::default());
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Flan.toml");
        fs::write(&path, "[allocator]\narena_size = 65536\ngrowth = \"fixed\"\n").unwrap();

        let config = FlanConfig::load(&path).unwrap();
        assert_eq!(config.allocator.arena_size, 65536);
    }
}
