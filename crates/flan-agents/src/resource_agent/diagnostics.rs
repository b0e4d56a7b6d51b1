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


use flan_core::resource::ResourceType;
use serde::Serialize;

/// One row of the "loaded resources" listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDebug {
    /// The identity hash.
    pub hash: u64,
    /// The kind of resource.
    pub resource_type: ResourceType,
    /// The identity the resource was loaded under.
    pub name: String,
    /// Whether the next sweep will remove it.
    pub scheduled_for_unload: bool,
}

/// Counters describing how the cache has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Requests served from the cache.
    pub hits: u64,
    /// Requests that had to load the resource.
    pub misses: u64,
    /// Loads that ended with an invalid handle.
    pub failures: u64,
    /// Resources removed by sweeps.
    pub unloads: u64,
}
