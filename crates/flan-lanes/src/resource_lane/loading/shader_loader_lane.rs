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


//! Shader source loading.

use crate::resource_lane::DecodeFailure;
use flan_core::resource::{
    split_identity, LoadContext, ResourceError, ResourceLoaderLane, Shader, ShaderStage,
};
use std::path::Path;

/// A lane validating shader source text and storing it for the compiler.
///
/// The stage is inferred from the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderLoaderLane;

impl ResourceLoaderLane<Shader> for ShaderLoaderLane {
    fn load(&self, ctx: &mut dyn LoadContext, bytes: &[u8]) -> Result<Shader, ResourceError> {
        let identity = ctx.identity().to_string();
        let (path, _) = split_identity(&identity);

        let stage = Path::new(path)
            .extension()
            .and_then(|extension| extension.to_str())
            .and_then(ShaderStage::from_extension)
            .ok_or_else(|| DecodeFailure::UnknownShaderStage(path.to_string()).at(&identity))?;

        let source =
            std::str::from_utf8(bytes).map_err(|err| DecodeFailure::from(err).at(&identity))?;

        let mut allocator = ctx.allocator();
        Shader::from_source(&mut allocator, &identity, stage, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_lane::test_context::TestContext;

    #[test]
    fn loads_pixel_shader() {
        let mut ctx = TestContext::new("shaders/lit.ps");

        let shader = ShaderLoaderLane
            .load(&mut ctx, b"float4 main() : SV_Target { return 1; }")
            .unwrap();

        assert_eq!(shader.stage, ShaderStage::Pixel);
        assert_eq!(
            shader.source(&ctx.allocator_ref()),
            Some("float4 main() : SV_Target { return 1; }")
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let mut ctx = TestContext::new("shaders/readme.txt");
        let result = ShaderLoaderLane.load(&mut ctx, b"hello");
        assert!(matches!(result, Err(ResourceError::DecodeError { .. })));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut ctx = TestContext::new("shaders/broken.comp");
        let result = ShaderLoaderLane.load(&mut ctx, &[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(ResourceError::DecodeError { .. })));
    }
}
