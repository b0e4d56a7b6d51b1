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


//! Provides the foundational traits and primitive types for Flan's resource system.
//!
//! This module defines the contracts shared by the decode lanes and the
//! resource cache, but it has no knowledge of how resources are read or stored:
//!
//! - [`ResourceHandle`]: a `Copy` reference made of an identity hash and a type tag.
//! - [`Resource`]: implemented by every resource variant, with a type-specific
//!   destructor that hands its buffers back to the allocator.
//! - [`ResourceLoaderLane`] and [`LoadContext`]: the interface through which a
//!   lane decodes bytes into a resource and requests its dependencies.
//! - The variants themselves: [`Texture`], [`Model`], [`Material`] and [`Shader`].

mod error;
mod handle;
mod identity;
mod loader;
mod material;
mod model;
mod shader;
mod texture;

pub use error::*;
pub use handle::*;
pub use identity::*;
pub use loader::*;
pub use material::*;
pub use model::*;
pub use shader::*;
pub use texture::*;
