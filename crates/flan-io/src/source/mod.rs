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


//! Sources of raw resource bytes.

mod file_system;
mod memory;

pub use file_system::FileSystemSource;
pub use memory::MemorySource;

use flan_core::resource::ResourceError;

/// Reads the bytes behind a resource path.
///
/// Paths use forward slashes and are relative to whatever root the source
/// was created with. A missing file must be reported as
/// [`ResourceError::FileNotFound`] so callers can tell it apart from other I/O failures.
pub trait FileSource {
    /// Reads the whole file at `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError>;
}

impl<S: FileSource + ?Sized> FileSource for Box<S> {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        (**self).read(path)
    }
}

impl<S: FileSource + ?Sized> FileSource for std::rc::Rc<S> {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        (**self).read(path)
    }
}
