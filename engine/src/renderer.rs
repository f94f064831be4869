//! Indexed draw submission.

use crate::{buffer::IndexBuffer, gl::Gl, shader::Shader, vertex_array::VertexArray, Result};
use glam::Vec4;
use std::rc::Rc;

#[derive(Debug, Clone)]
#[must_use]
pub struct Renderer {
    gl: Rc<Gl>,
}

impl Renderer {
    pub fn new(gl: &Rc<Gl>) -> Self {
        Self { gl: Rc::clone(gl) }
    }

    #[inline]
    #[must_use]
    pub fn gl(&self) -> &Rc<Gl> {
        &self.gl
    }

    pub fn clear(&self) -> Result<()> {
        gl_call!(self.gl, clear(glow::COLOR_BUFFER_BIT))
    }

    pub fn set_clear_color(&self, color: Vec4) -> Result<()> {
        gl_call!(self.gl, clear_color(color.x, color.y, color.z, color.w))
    }

    /// Standard `src * alpha + dst * (1 - alpha)` blending.
    pub fn enable_blending(&self) -> Result<()> {
        gl_call!(self.gl, enable(glow::BLEND))?;
        gl_call!(
            self.gl,
            blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA)
        )
    }

    pub fn set_viewport(&self, width: u32, height: u32) -> Result<()> {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        gl_call!(self.gl, viewport(0, 0, width, height))
    }

    /// Draw every index of `index_buffer` as triangles.
    pub fn draw(
        &self,
        vertex_array: &VertexArray,
        index_buffer: &IndexBuffer,
        shader: &Shader,
    ) -> Result<()> {
        shader.bind()?;
        vertex_array.bind()?;
        index_buffer.bind()?;
        let count = i32::try_from(index_buffer.count()).unwrap_or(i32::MAX);
        gl_call!(
            self.gl,
            draw_elements(glow::TRIANGLES, count, glow::UNSIGNED_INT, 0)
        )
    }
}
