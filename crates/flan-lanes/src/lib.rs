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


//! # Flan Lanes
//!
//! Stateless decode routines, one per resource type. A lane receives the raw
//! bytes of a file plus a [`LoadContext`](flan_core::resource::LoadContext),
//! allocates the resource's buffers through the context's allocator and
//! requests the resources it depends on.

#![warn(missing_docs)]

pub mod resource_lane;
