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


//! A registry of loader lanes, keyed by resource type.

use flan_core::resource::{
    ErasedResource, LoadContext, Resource, ResourceError, ResourceLoaderLane, ResourceType,
};
use std::{collections::HashMap, marker::PhantomData, rc::Rc};

/// Internal trait for loading any resource type.
pub(crate) trait AnyLoaderLane {
    fn load_any(
        &self,
        ctx: &mut dyn LoadContext,
        bytes: &[u8],
    ) -> Result<Box<dyn ErasedResource>, ResourceError>;
}

/// A "wrapper" that takes a generic `ResourceLoaderLane<R>` and implements `AnyLoaderLane`.
struct ResourceLoaderLaneWrapper<R: Resource, L: ResourceLoaderLane<R>>(L, PhantomData<fn() -> R>);

impl<R: Resource, L: ResourceLoaderLane<R>> AnyLoaderLane for ResourceLoaderLaneWrapper<R, L> {
    fn load_any(
        &self,
        ctx: &mut dyn LoadContext,
        bytes: &[u8],
    ) -> Result<Box<dyn ErasedResource>, ResourceError> {
        // Call the GENERIC and TYPE-SAFE load() method, then erase the result.
        let resource: R = self.0.load(ctx, bytes)?;
        Ok(Box::new(resource))
    }
}

/// The registry that manages loader lanes for the `ResourceCache`.
#[derive(Default)]
pub(crate) struct ResourceLoaderLaneRegistry {
    loaders: HashMap<ResourceType, Rc<dyn AnyLoaderLane>>,
}

impl ResourceLoaderLaneRegistry {
    /// Registers the lane for `R`, replacing any previous one.
    pub(crate) fn register<R: Resource>(&mut self, loader: impl ResourceLoaderLane<R> + 'static) {
        let wrapped = ResourceLoaderLaneWrapper(loader, PhantomData);
        if self.loaders.insert(R::TYPE, Rc::new(wrapped)).is_some() {
            log::debug!("Replaced the loader lane for {} resources", R::TYPE);
        }
    }

    /// The lane registered for `resource_type`.
    ///
    /// Returned as an `Rc` so the caller can keep it while lending the cache
    /// mutably to the lane.
    pub(crate) fn get(&self, resource_type: ResourceType) -> Option<Rc<dyn AnyLoaderLane>> {
        self.loaders.get(&resource_type).cloned()
    }

    pub(crate) fn contains(&self, resource_type: ResourceType) -> bool {
        self.loaders.contains_key(&resource_type)
    }
}
