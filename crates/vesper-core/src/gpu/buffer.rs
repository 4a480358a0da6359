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

//! Buffer descriptors and the index format enum.

/// Usage flags describing how a buffer may be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferUsage {
    bits: u32,
}

impl BufferUsage {
    /// Usable as a vertex buffer.
    pub const VERTEX: Self = Self { bits: 1 << 0 };
    /// Usable as an index buffer.
    pub const INDEX: Self = Self { bits: 1 << 1 };
    /// Usable as a uniform buffer bound through a descriptor set.
    pub const UNIFORM: Self = Self { bits: 1 << 2 };
    /// Usable as the destination of a write or copy.
    pub const COPY_DST: Self = Self { bits: 1 << 3 };

    /// Returns the union of two usage sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns `true` when all flags in `other` are present in `self`.
    #[inline]
    pub const fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }
}

impl std::ops::BitOr for BufferUsage {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A descriptor for creating a GPU buffer.
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The size of the buffer in bytes.
    pub size: u64,
    /// How the buffer may be bound.
    pub usage: BufferUsage,
}

/// An opaque handle to a GPU buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// The element width of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// 16-bit unsigned indices.
    Uint16,
    /// 32-bit unsigned indices.
    Uint32,
}
