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


/// Hashes a resource identity: the first eight bytes (little-endian) of its BLAKE3 digest.
///
/// The hash is stable across processes and platforms. Two identities that
/// collide are treated as the same resource.
pub fn identity_hash(identity: &str) -> u64 {
    let digest = blake3::hash(identity.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(prefix)
}

/// Splits `"file.mtl#Name"` into `("file.mtl", Some("Name"))`.
///
/// The part before `#` is what gets read from disk. The whole string stays
/// the identity, so each sub-resource of a file is cached separately.
pub fn split_identity(identity: &str) -> (&str, Option<&str>) {
    match identity.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (identity, None),
    }
}

/// Resolves `relative` against the folder containing the file of `identity`.
pub fn sibling_path(identity: &str, relative: &str) -> String {
    let (file, _) = split_identity(identity);
    let relative = relative.replace('\\', "/");
    match file.rfind(['/', '\\']) {
        Some(end) => format!("{}/{}", &file[..end], relative),
        None => relative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_distinguishes_names() {
        let a = identity_hash("textures/brick.png");
        assert_eq!(a, identity_hash("textures/brick.png"));
        assert_ne!(a, identity_hash("textures/brick2.png"));

        let digest = blake3::hash(b"textures/brick.png");
        let expected = u64::from_le_bytes(digest.as_bytes()[..8].try_into().unwrap());
        assert_eq!(a, expected);
    }

    #[test]
    fn splits_fragment() {
        assert_eq!(split_identity("crate.mtl#Wood"), ("crate.mtl", Some("Wood")));
        assert_eq!(split_identity("crate.mtl"), ("crate.mtl", None));
    }

    #[test]
    fn resolves_sibling_paths() {
        assert_eq!(sibling_path("models/crate.obj", "crate.mtl"), "models/crate.mtl");
        assert_eq!(
            sibling_path("models/crate.mtl#Wood", "textures\\wood.png"),
            "models/textures/wood.png"
        );
        assert_eq!(sibling_path("crate.obj", "crate.mtl"), "crate.mtl");
    }
}
