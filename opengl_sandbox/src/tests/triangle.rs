use super::BASIC_SHADER;
use sandbox_engine::{prelude::*, Result};
use std::rc::Rc;

#[rustfmt::skip]
const POSITIONS: [f32; 9] = [
    -0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
     0.5, -0.5, 0.0,
];
const INDICES: [u32; 3] = [0, 1, 2];

#[derive(Debug)]
pub(crate) struct Triangle {
    color: [f32; 4],
    shader: Shader,
    index_buffer: IndexBuffer,
    vertex_array: VertexArray,
    _vertex_buffer: VertexBuffer,
}

impl Triangle {
    pub(crate) fn new(gl: &Rc<Gl>) -> Result<Self> {
        let mut vertex_array = VertexArray::new(gl)?;
        let vertex_buffer = VertexBuffer::new(gl, &POSITIONS)?;
        let mut layout = VertexBufferLayout::new();
        layout.push::<f32>(3);
        vertex_array.add_buffer(&vertex_buffer, &layout)?;
        let index_buffer = IndexBuffer::new(gl, &INDICES)?;
        let shader = Shader::from_path(gl, BASIC_SHADER)?;

        vertex_array.unbind()?;
        vertex_buffer.unbind()?;
        index_buffer.unbind()?;
        shader.unbind()?;

        Ok(Self {
            color: [0.8, 0.2, 0.3, 1.0],
            shader,
            index_buffer,
            vertex_array,
            _vertex_buffer: vertex_buffer,
        })
    }
}

impl Test for Triangle {
    fn on_render(&mut self, renderer: &Renderer) -> Result<()> {
        let [r, g, b, a] = self.color;
        self.shader.bind()?;
        self.shader.set_uniform_4f("u_Color", r, g, b, a)?;
        renderer.draw(&self.vertex_array, &self.index_buffer, &self.shader)
    }

    fn on_imgui_render(&mut self, ui: &Ui) {
        ui.color_edit4("Color", &mut self.color);
    }
}
