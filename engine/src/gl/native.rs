//! [`GraphicsApi`] backed by a [`glow::Context`].

use super::{GraphicsApi, Handle, Location, INVALID_LOCATION};
use glow::{
    HasContext, NativeBuffer, NativeProgram, NativeShader, NativeTexture, NativeUniformLocation,
    NativeVertexArray,
};
use std::num::NonZeroU32;

#[inline]
fn native<T>(handle: Handle, f: impl FnOnce(NonZeroU32) -> T) -> Option<T> {
    NonZeroU32::new(handle).map(f)
}

#[inline]
fn native_location(location: Location) -> Option<NativeUniformLocation> {
    u32::try_from(location).ok().map(NativeUniformLocation)
}

// SAFETY (all methods): `Gl` is only reachable through an `Rc`, so every call happens on the thread
// that made the context current, and handles originate from this same context.
impl GraphicsApi for glow::Context {
    fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }

    fn create_buffer(&self) -> Result<Handle, String> {
        unsafe { HasContext::create_buffer(self) }.map(|buffer| buffer.0.get())
    }

    fn delete_buffer(&self, buffer: Handle) {
        if let Some(buffer) = native(buffer, NativeBuffer) {
            unsafe { HasContext::delete_buffer(self, buffer) };
        }
    }

    fn bind_buffer(&self, target: u32, buffer: Handle) {
        unsafe { HasContext::bind_buffer(self, target, native(buffer, NativeBuffer)) };
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.buffer_data_u8_slice(target, data, usage) };
    }

    fn create_vertex_array(&self) -> Result<Handle, String> {
        unsafe { HasContext::create_vertex_array(self) }.map(|vertex_array| vertex_array.0.get())
    }

    fn delete_vertex_array(&self, vertex_array: Handle) {
        if let Some(vertex_array) = native(vertex_array, NativeVertexArray) {
            unsafe { HasContext::delete_vertex_array(self, vertex_array) };
        }
    }

    fn bind_vertex_array(&self, vertex_array: Handle) {
        unsafe {
            HasContext::bind_vertex_array(self, native(vertex_array, NativeVertexArray));
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) };
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        count: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.vertex_attrib_pointer_f32(index, count, data_type, normalized, stride, offset);
        }
    }

    fn create_shader(&self, stage: u32) -> Result<Handle, String> {
        unsafe { HasContext::create_shader(self, stage) }.map(|shader| shader.0.get())
    }

    fn shader_source(&self, shader: Handle, source: &str) {
        if let Some(shader) = native(shader, NativeShader) {
            unsafe { HasContext::shader_source(self, shader, source) };
        }
    }

    fn compile_shader(&self, shader: Handle) {
        if let Some(shader) = native(shader, NativeShader) {
            unsafe { HasContext::compile_shader(self, shader) };
        }
    }

    fn shader_compile_status(&self, shader: Handle) -> bool {
        native(shader, NativeShader)
            .map_or(false, |shader| unsafe { self.get_shader_compile_status(shader) })
    }

    fn shader_info_log(&self, shader: Handle) -> String {
        native(shader, NativeShader)
            .map(|shader| unsafe { self.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: Handle) {
        if let Some(shader) = native(shader, NativeShader) {
            unsafe { HasContext::delete_shader(self, shader) };
        }
    }

    fn create_program(&self) -> Result<Handle, String> {
        unsafe { HasContext::create_program(self) }.map(|program| program.0.get())
    }

    fn attach_shader(&self, program: Handle, shader: Handle) {
        if let (Some(program), Some(shader)) =
            (native(program, NativeProgram), native(shader, NativeShader))
        {
            unsafe { HasContext::attach_shader(self, program, shader) };
        }
    }

    fn detach_shader(&self, program: Handle, shader: Handle) {
        if let (Some(program), Some(shader)) =
            (native(program, NativeProgram), native(shader, NativeShader))
        {
            unsafe { HasContext::detach_shader(self, program, shader) };
        }
    }

    fn link_program(&self, program: Handle) {
        if let Some(program) = native(program, NativeProgram) {
            unsafe { HasContext::link_program(self, program) };
        }
    }

    fn program_link_status(&self, program: Handle) -> bool {
        native(program, NativeProgram)
            .map_or(false, |program| unsafe { self.get_program_link_status(program) })
    }

    fn program_info_log(&self, program: Handle) -> String {
        native(program, NativeProgram)
            .map(|program| unsafe { self.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn use_program(&self, program: Handle) {
        unsafe { HasContext::use_program(self, native(program, NativeProgram)) };
    }

    fn delete_program(&self, program: Handle) {
        if let Some(program) = native(program, NativeProgram) {
            unsafe { HasContext::delete_program(self, program) };
        }
    }

    fn uniform_location(&self, program: Handle, name: &str) -> Location {
        native(program, NativeProgram)
            .and_then(|program| unsafe { self.get_uniform_location(program, name) })
            .and_then(|location| Location::try_from(location.0).ok())
            .unwrap_or(INVALID_LOCATION)
    }

    fn uniform_1_i32(&self, location: Location, x: i32) {
        unsafe { HasContext::uniform_1_i32(self, native_location(location).as_ref(), x) };
    }

    fn uniform_1_f32(&self, location: Location, x: f32) {
        unsafe { HasContext::uniform_1_f32(self, native_location(location).as_ref(), x) };
    }

    fn uniform_4_f32(&self, location: Location, x: f32, y: f32, z: f32, w: f32) {
        unsafe {
            HasContext::uniform_4_f32(self, native_location(location).as_ref(), x, y, z, w);
        }
    }

    fn uniform_matrix_4_f32(&self, location: Location, transpose: bool, value: &[f32; 16]) {
        unsafe {
            self.uniform_matrix_4_f32_slice(native_location(location).as_ref(), transpose, value);
        }
    }

    fn create_texture(&self) -> Result<Handle, String> {
        unsafe { HasContext::create_texture(self) }.map(|texture| texture.0.get())
    }

    fn delete_texture(&self, texture: Handle) {
        if let Some(texture) = native(texture, NativeTexture) {
            unsafe { HasContext::delete_texture(self, texture) };
        }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, unit) };
    }

    fn bind_texture(&self, target: u32, texture: Handle) {
        unsafe { HasContext::bind_texture(self, target, native(texture, NativeTexture)) };
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        unsafe { HasContext::tex_parameter_i32(self, target, parameter, value) };
    }

    fn tex_image_2d_rgba8(&self, target: u32, width: i32, height: i32, pixels: &[u8]) {
        unsafe {
            self.tex_image_2d(
                target,
                0,
                glow::RGBA8 as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(pixels),
            );
        }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { HasContext::clear_color(self, red, green, blue, alpha) };
    }

    fn clear(&self, mask: u32) {
        unsafe { HasContext::clear(self, mask) };
    }

    fn enable(&self, capability: u32) {
        unsafe { HasContext::enable(self, capability) };
    }

    fn blend_func(&self, src: u32, dst: u32) {
        unsafe { HasContext::blend_func(self, src, dst) };
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) };
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        unsafe { HasContext::draw_elements(self, mode, count, element_type, offset) };
    }
}
