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


//! Acts as the **[A]gent** for the resource subsystem.
//!
//! This module provides the public-facing API for requesting resources and
//! querying their state, but it delegates the decoding work to the lanes of
//! `flan_lanes::resource_lane`.
//!
//! Lifecycle of an entry:
//! 1. `load_from_disk` or `load_from_buffer` inserts it (or finds it already cached).
//! 2. `get` resolves its handle as many times as needed.
//! 3. `schedule_unload` flags it.
//! 4. The next `tick` releases its memory and removes it; the handle goes stale.

mod cache;
mod context;
mod defaults;
mod diagnostics;
mod loader;

pub use cache::ResourceCache;
pub use defaults::DefaultTextures;
pub use diagnostics::{CacheStats, ResourceDebug};
