//! GPU vertex and index buffers.

use crate::{
    gl::{Gl, Handle, INVALID_HANDLE},
    Result,
};
use std::rc::Rc;

/// Vertex data uploaded once with `STATIC_DRAW`.
#[derive(Debug)]
#[must_use]
pub struct VertexBuffer {
    gl: Rc<Gl>,
    handle: Handle,
    size: usize,
}

impl VertexBuffer {
    pub fn new<T: bytemuck::Pod>(gl: &Rc<Gl>, data: &[T]) -> Result<Self> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        tracing::debug!("creating vertex buffer, size: {}", bytes.len());
        let handle = gl_create!(gl, "vertex buffer", create_buffer())?;
        let buffer = Self {
            gl: Rc::clone(gl),
            handle,
            size: bytes.len(),
        };
        gl_call!(gl, bind_buffer(glow::ARRAY_BUFFER, handle))?;
        gl_call!(gl, buffer_data(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW))?;
        Ok(buffer)
    }

    pub fn bind(&self) -> Result<()> {
        gl_call!(self.gl, bind_buffer(glow::ARRAY_BUFFER, self.handle))
    }

    pub fn unbind(&self) -> Result<()> {
        gl_call!(self.gl, bind_buffer(glow::ARRAY_BUFFER, INVALID_HANDLE))
    }

    #[inline]
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Size in bytes of the uploaded data.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        if let Err(err) = gl_call!(self.gl, delete_buffer(self.handle)) {
            tracing::error!("failed to delete vertex buffer {}: {err}", self.handle);
        }
    }
}

/// `u32` element indices uploaded once with `STATIC_DRAW`.
#[derive(Debug)]
#[must_use]
pub struct IndexBuffer {
    gl: Rc<Gl>,
    handle: Handle,
    count: usize,
}

impl IndexBuffer {
    /// Element buffers are vertex array state: the buffer is recorded by whichever vertex array is
    /// bound while creating or binding it.
    pub fn new(gl: &Rc<Gl>, indices: &[u32]) -> Result<Self> {
        tracing::debug!("creating index buffer, count: {}", indices.len());
        let handle = gl_create!(gl, "index buffer", create_buffer())?;
        let buffer = Self {
            gl: Rc::clone(gl),
            handle,
            count: indices.len(),
        };
        gl_call!(gl, bind_buffer(glow::ELEMENT_ARRAY_BUFFER, handle))?;
        gl_call!(
            gl,
            buffer_data(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                glow::STATIC_DRAW
            )
        )?;
        Ok(buffer)
    }

    pub fn bind(&self) -> Result<()> {
        gl_call!(self.gl, bind_buffer(glow::ELEMENT_ARRAY_BUFFER, self.handle))
    }

    pub fn unbind(&self) -> Result<()> {
        gl_call!(self.gl, bind_buffer(glow::ELEMENT_ARRAY_BUFFER, INVALID_HANDLE))
    }

    #[inline]
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        if let Err(err) = gl_call!(self.gl, delete_buffer(self.handle)) {
            tracing::error!("failed to delete index buffer {}: {err}", self.handle);
        }
    }
}
