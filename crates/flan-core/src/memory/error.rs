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


use super::ArenaAddress;
use std::fmt;

/// An error returned by the [`ChunkAllocator`](super::ChunkAllocator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// No free chunk can hold the request and the arena cannot grow any further.
    OutOfMemory {
        /// The requested size, in bytes, before alignment rounding.
        requested: usize,
        /// The requested alignment.
        alignment: usize,
        /// The label the allocation would have carried.
        label: String,
        /// The largest free chunk at the time of the failure.
        largest_free: usize,
    },
    /// The address is not the start of a used chunk (double free or foreign address).
    InvalidFree {
        /// The offending address.
        address: ArenaAddress,
    },
    /// A request was malformed (zero size, non power-of-two alignment, overflow).
    InvalidArgument {
        /// What was wrong with the request.
        reason: String,
    },
}

impl AllocError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        AllocError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::OutOfMemory {
                requested,
                alignment,
                label,
                largest_free,
            } => write!(
                f,
                "Out of arena memory: requested {requested} bytes (alignment {alignment}) for '{label}', largest free chunk is {largest_free} bytes"
            ),
            AllocError::InvalidFree { address } => {
                write!(f, "Invalid free: {address} is not the start of a used chunk")
            }
            AllocError::InvalidArgument { reason } => {
                write!(f, "Invalid allocation request: {reason}")
            }
        }
    }
}

impl std::error::Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_memory_message_names_the_label() {
        let err = AllocError::OutOfMemory {
            requested: 4096,
            alignment: 16,
            label: "TexRes - data - brick.png".to_string(),
            largest_free: 128,
        };
        let message = err.to_string();
        assert!(message.contains("4096"));
        assert!(message.contains("TexRes - data - brick.png"));
        assert!(message.contains("128"));
    }
}
