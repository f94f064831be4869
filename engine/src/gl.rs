//! The OpenGL driver seam.
//!
//! Every GPU call made by the resource wrappers goes through [`GraphicsApi`], bracketed by the
//! [`gl_call!`](crate::gl_call) macro which applies the configured [`ErrorCheck`] policy.

use crate::{shader::ShaderLinkMode, Error, Result};
use std::{fmt, rc::Rc, str::FromStr};

mod native;

#[cfg(test)]
pub(crate) mod fake;

/// Opaque GPU object id. `0` is never a valid object.
pub type Handle = u32;

/// Uniform location. `-1` means the uniform doesn't exist and writes to it are ignored.
pub type Location = i32;

pub const INVALID_HANDLE: Handle = 0;
pub const INVALID_LOCATION: Location = -1;

/// The subset of OpenGL used by the engine.
///
/// Implementations assume the context that created them is current on the calling thread.
pub trait GraphicsApi {
    fn get_error(&self) -> u32;

    fn create_buffer(&self) -> std::result::Result<Handle, String>;
    fn delete_buffer(&self, buffer: Handle);
    /// Binding [`INVALID_HANDLE`] unbinds `target`.
    fn bind_buffer(&self, target: u32, buffer: Handle);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);

    fn create_vertex_array(&self) -> std::result::Result<Handle, String>;
    fn delete_vertex_array(&self, vertex_array: Handle);
    fn bind_vertex_array(&self, vertex_array: Handle);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        count: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );

    fn create_shader(&self, stage: u32) -> std::result::Result<Handle, String>;
    fn shader_source(&self, shader: Handle, source: &str);
    fn compile_shader(&self, shader: Handle);
    fn shader_compile_status(&self, shader: Handle) -> bool;
    fn shader_info_log(&self, shader: Handle) -> String;
    fn delete_shader(&self, shader: Handle);

    fn create_program(&self) -> std::result::Result<Handle, String>;
    fn attach_shader(&self, program: Handle, shader: Handle);
    fn detach_shader(&self, program: Handle, shader: Handle);
    fn link_program(&self, program: Handle);
    fn program_link_status(&self, program: Handle) -> bool;
    fn program_info_log(&self, program: Handle) -> String;
    fn use_program(&self, program: Handle);
    fn delete_program(&self, program: Handle);

    fn uniform_location(&self, program: Handle, name: &str) -> Location;
    fn uniform_1_i32(&self, location: Location, x: i32);
    fn uniform_1_f32(&self, location: Location, x: f32);
    fn uniform_4_f32(&self, location: Location, x: f32, y: f32, z: f32, w: f32);
    fn uniform_matrix_4_f32(&self, location: Location, transpose: bool, value: &[f32; 16]);

    fn create_texture(&self) -> std::result::Result<Handle, String>;
    fn delete_texture(&self, texture: Handle);
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: Handle);
    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    fn tex_image_2d_rgba8(&self, target: u32, width: i32, height: i32, pixels: &[u8]);

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear(&self, mask: u32);
    fn enable(&self, capability: u32);
    fn blend_func(&self, src: u32, dst: u32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32);
}

/// What to do when a driver call raises an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[must_use]
pub enum ErrorCheck {
    /// Don't query the driver for errors at all.
    Ignore,
    /// Report errors and keep going.
    Log,
    /// Report errors and fail the call.
    Halt,
}

impl Default for ErrorCheck {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Halt
        } else {
            Self::Ignore
        }
    }
}

impl FromStr for ErrorCheck {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" | "off" => Ok(Self::Ignore),
            "log" => Ok(Self::Log),
            "halt" => Ok(Self::Halt),
            _ => Err(anyhow::anyhow!("invalid error check policy: {s:?}").into()),
        }
    }
}

/// A shared handle to the driver and the policies applied to calls made through it.
#[must_use]
pub struct Gl {
    api: Rc<dyn GraphicsApi>,
    error_check: ErrorCheck,
    shader_link_mode: ShaderLinkMode,
}

impl fmt::Debug for Gl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gl")
            .field("error_check", &self.error_check)
            .field("shader_link_mode", &self.shader_link_mode)
            .finish_non_exhaustive()
    }
}

impl Gl {
    pub fn new(
        api: Rc<dyn GraphicsApi>,
        error_check: ErrorCheck,
        shader_link_mode: ShaderLinkMode,
    ) -> Self {
        Self {
            api,
            error_check,
            shader_link_mode,
        }
    }

    #[inline]
    #[must_use]
    pub fn api(&self) -> &dyn GraphicsApi {
        self.api.as_ref()
    }

    #[inline]
    pub fn error_check(&self) -> ErrorCheck {
        self.error_check
    }

    #[inline]
    pub fn shader_link_mode(&self) -> ShaderLinkMode {
        self.shader_link_mode
    }

    /// Drain any errors left over from earlier calls so they aren't blamed on the next one.
    #[inline]
    pub fn clear_errors(&self) {
        if self.error_check == ErrorCheck::Ignore {
            return;
        }
        while self.api.get_error() != glow::NO_ERROR {}
    }

    /// Check for errors raised by `call`.
    pub fn check_errors(&self, call: &'static str, file: &'static str, line: u32) -> Result<()> {
        if self.error_check == ErrorCheck::Ignore {
            return Ok(());
        }
        let mut first = None;
        loop {
            let code = self.api.get_error();
            if code == glow::NO_ERROR {
                break;
            }
            tracing::error!("[OpenGL error] ({code:#06x}): {call} {file}:{line}");
            first.get_or_insert(code);
        }
        match (first, self.error_check) {
            (Some(code), ErrorCheck::Halt) => Err(Error::Driver {
                call,
                file,
                line,
                code,
            }),
            _ => Ok(()),
        }
    }
}

/// Call a [`GraphicsApi`] method through a [`Gl`], checking for driver errors according to its
/// [`ErrorCheck`] policy. Evaluates to `Result<T>` where `T` is the method's return type.
///
/// ```ignore
/// let buffer = gl_call!(gl, create_buffer())?;
/// gl_call!(gl, bind_buffer(glow::ARRAY_BUFFER, buffer))?;
/// ```
#[macro_export]
macro_rules! gl_call {
    ($gl:expr, $method:ident($($arg:expr),* $(,)?)) => {{
        let gl: &$crate::gl::Gl = &$gl;
        gl.clear_errors();
        let value = gl.api().$method($($arg),*);
        gl.check_errors(
            concat!(stringify!($method), "(", stringify!($($arg),*), ")"),
            file!(),
            line!(),
        )
        .map(|()| value)
    }};
}

/// Create a GPU object, turning the driver's failure string into an [`Error::Create`].
#[macro_export]
macro_rules! gl_create {
    ($gl:expr, $resource:literal, $method:ident($($arg:expr),* $(,)?)) => {
        $crate::gl_call!($gl, $method($($arg),*))?.map_err(|reason| $crate::Error::Create {
            resource: $resource,
            reason,
        })
    };
}
