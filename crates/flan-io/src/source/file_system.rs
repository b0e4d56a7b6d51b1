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


use super::FileSource;
use flan_core::resource::ResourceError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A [`FileSource`] reading from the local filesystem, relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    /// Creates a source resolving every path against `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The directory paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileSource for FileSystemSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let full_path = self.root.join(path);
        log::trace!("Reading '{}'", full_path.display());

        std::fs::read(&full_path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ResourceError::FileNotFound {
                path: path.to_string(),
            },
            _ => ResourceError::Io {
                path: path.to_string(),
                message: err.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_relative_to_root() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("shaders")).unwrap();
        std::fs::write(dir.path().join("shaders/basic.vert"), b"void main() {}").unwrap();

        let source = FileSystemSource::new(dir.path());

        assert_eq!(source.read("shaders/basic.vert").unwrap(), b"void main() {}");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let source = FileSystemSource::new(dir.path());

        assert_eq!(
            source.read("missing.png"),
            Err(ResourceError::FileNotFound {
                path: "missing.png".to_string()
            })
        );
    }

    #[test]
    fn reading_a_directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder")).unwrap();
        let source = FileSystemSource::new(dir.path());

        assert!(matches!(source.read("folder"), Err(ResourceError::Io { .. })));
    }
}
