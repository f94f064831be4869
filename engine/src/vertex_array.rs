//! Vertex array objects.

use crate::{
    buffer::VertexBuffer,
    gl::{Gl, Handle, INVALID_HANDLE},
    layout::VertexBufferLayout,
    Result,
};
use std::rc::Rc;

/// Records which buffers feed which vertex attributes.
///
/// [`VertexArray::add_buffer`] trusts the layout: nothing checks that its stride matches the data
/// that was uploaded to the buffer.
#[derive(Debug)]
#[must_use]
pub struct VertexArray {
    gl: Rc<Gl>,
    handle: Handle,
}

impl VertexArray {
    pub fn new(gl: &Rc<Gl>) -> Result<Self> {
        tracing::debug!("creating vertex array");
        let handle = gl_create!(gl, "vertex array", create_vertex_array())?;
        Ok(Self {
            gl: Rc::clone(gl),
            handle,
        })
    }

    /// Point attributes `0..layout.elements().len()` at `buffer`, replacing whatever those
    /// attributes were previously fed from.
    pub fn add_buffer(&mut self, buffer: &VertexBuffer, layout: &VertexBufferLayout) -> Result<()> {
        self.bind()?;
        buffer.bind()?;
        let stride = layout.stride() as i32;
        for (index, element) in (0..).zip(layout.elements()) {
            gl_call!(self.gl, enable_vertex_attrib_array(index))?;
            gl_call!(
                self.gl,
                vertex_attrib_pointer(
                    index,
                    element.count as i32,
                    element.data_type,
                    element.normalized,
                    stride,
                    element.offset as i32,
                )
            )?;
        }
        Ok(())
    }

    pub fn bind(&self) -> Result<()> {
        gl_call!(self.gl, bind_vertex_array(self.handle))
    }

    pub fn unbind(&self) -> Result<()> {
        gl_call!(self.gl, bind_vertex_array(INVALID_HANDLE))
    }

    #[inline]
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        if let Err(err) = gl_call!(self.gl, delete_vertex_array(self.handle)) {
            tracing::error!("failed to delete vertex array {}: {err}", self.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gl::{fake::FakeApi, ErrorCheck},
        shader::ShaderLinkMode,
    };

    #[test]
    fn attributes_follow_layout() {
        let api = Rc::new(FakeApi::default());
        let gl = Rc::new(Gl::new(api.clone(), ErrorCheck::Halt, ShaderLinkMode::Lenient));

        #[rustfmt::skip]
        let vertices = [
            -0.5_f32, -0.5, 0.0, 0.0,
             0.5, -0.5, 1.0, 0.0,
             0.5,  0.5, 1.0, 1.0,
            -0.5,  0.5, 0.0, 1.0,
        ];
        let buffer = VertexBuffer::new(&gl, &vertices).expect("valid vertex buffer");
        let mut layout = VertexBufferLayout::new();
        layout.push::<f32>(2).push::<f32>(2);
        let mut vertex_array = VertexArray::new(&gl).expect("valid vertex array");
        vertex_array
            .add_buffer(&buffer, &layout)
            .expect("valid add_buffer");

        let pointers = api.attrib_pointers();
        assert_eq!(pointers.len(), 2);
        for (index, pointer) in pointers.iter().enumerate() {
            assert_eq!(pointer.vertex_array, vertex_array.handle());
            assert_eq!(pointer.index, index as u32);
            assert_eq!(pointer.count, 2);
            assert_eq!(pointer.stride, 16);
            assert_eq!(pointer.data_type, glow::FLOAT);
        }
        assert_eq!(pointers[0].offset, 0);
        assert_eq!(pointers[1].offset, 8);
    }

    #[test]
    fn later_buffer_replaces_attributes_from_zero() {
        let api = Rc::new(FakeApi::default());
        let gl = Rc::new(Gl::new(api.clone(), ErrorCheck::Halt, ShaderLinkMode::Lenient));

        let positions = VertexBuffer::new(&gl, &[0.0_f32; 6]).expect("valid positions");
        let colors = VertexBuffer::new(&gl, &[255_u8; 12]).expect("valid colors");
        let mut position_layout = VertexBufferLayout::new();
        position_layout.push::<f32>(2);
        let mut color_layout = VertexBufferLayout::new();
        color_layout.push::<u8>(4);

        let mut vertex_array = VertexArray::new(&gl).expect("valid vertex array");
        vertex_array
            .add_buffer(&positions, &position_layout)
            .expect("valid positions");
        vertex_array
            .add_buffer(&colors, &color_layout)
            .expect("valid colors");

        let pointers = api.attrib_pointers();
        assert_eq!(pointers.len(), 2);
        assert_eq!(pointers[1].index, 0);
        assert!(pointers[1].normalized);
        assert_eq!(pointers[1].stride, 4);
    }
}
