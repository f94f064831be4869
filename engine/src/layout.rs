//! Vertex buffer layouts.

use std::mem;

/// A scalar type that can make up a vertex attribute.
pub trait VertexAttribute: bytemuck::Pod {
    /// The driver's type enum for `Self`.
    const DATA_TYPE: u32;
    /// Whether integer data is normalized to `[0, 1]` when read as floats.
    const NORMALIZED: bool;
}

impl VertexAttribute for f32 {
    const DATA_TYPE: u32 = glow::FLOAT;
    const NORMALIZED: bool = false;
}

impl VertexAttribute for u32 {
    const DATA_TYPE: u32 = glow::UNSIGNED_INT;
    const NORMALIZED: bool = false;
}

impl VertexAttribute for u8 {
    const DATA_TYPE: u32 = glow::UNSIGNED_BYTE;
    const NORMALIZED: bool = true;
}

/// One attribute of a vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[must_use]
pub struct LayoutElement {
    pub data_type: u32,
    pub count: u32,
    pub normalized: bool,
    /// Byte offset from the start of the vertex.
    pub offset: u32,
    /// Size in bytes.
    pub size: u32,
}

/// Describes how consecutive attributes are packed into each vertex of a buffer.
///
/// Elements are laid out back to back in push order with no padding.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct VertexBufferLayout {
    elements: Vec<LayoutElement>,
    stride: u32,
}

impl VertexBufferLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute of `count` components of `T`.
    pub fn push<T: VertexAttribute>(&mut self, count: u32) -> &mut Self {
        let size = count * mem::size_of::<T>() as u32;
        self.elements.push(LayoutElement {
            data_type: T::DATA_TYPE,
            count,
            normalized: T::NORMALIZED,
            offset: self.stride,
            size,
        });
        self.stride += size;
        self
    }

    #[inline]
    #[must_use]
    pub fn elements(&self) -> &[LayoutElement] {
        &self.elements
    }

    /// Size in bytes of a single vertex.
    #[inline]
    #[must_use]
    pub fn stride(&self) -> u32 {
        self.stride
    }
}
