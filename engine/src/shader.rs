//! Shader programs.

use crate::{
    gl::{Gl, Handle, Location, INVALID_HANDLE, INVALID_LOCATION},
    Error, Result,
};
use anyhow::anyhow;
use fnv::FnvHashMap;
use glam::Mat4;
use std::{
    cell::RefCell,
    mem,
    path::{Path, PathBuf},
    rc::Rc,
    str::FromStr,
};

pub use asset_loader::{ShaderSource, ShaderStage};

/// What to do when a shader stage fails to compile or a program fails to link.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[must_use]
pub enum ShaderLinkMode {
    /// Report the failure and keep going with an unusable program. Drawing with it does nothing.
    #[default]
    Lenient,
    /// Report the failure and return an error.
    Strict,
}

impl FromStr for ShaderLinkMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(anyhow!("invalid shader link mode: {s:?}").into()),
        }
    }
}

/// A linked vertex + fragment program and the uniform locations looked up so far.
#[derive(Debug)]
#[must_use]
pub struct Shader {
    gl: Rc<Gl>,
    filepath: Option<PathBuf>,
    source: ShaderSource,
    program: Handle,
    uniform_locations: RefCell<FnvHashMap<String, Location>>,
}

impl Shader {
    /// Build a program from a combined `.shader` file.
    pub fn from_path(gl: &Rc<Gl>, filepath: impl AsRef<Path>) -> Result<Self> {
        let filepath = filepath.as_ref();
        let source = ShaderSource::from_path(filepath)?;
        let mut shader = Self::from_source(gl, source)?;
        shader.filepath = Some(filepath.to_path_buf());
        Ok(shader)
    }

    pub fn from_source(gl: &Rc<Gl>, source: ShaderSource) -> Result<Self> {
        let program = build_program(gl, &source)?;
        tracing::debug!("created shader program {program}");
        Ok(Self {
            gl: Rc::clone(gl),
            filepath: None,
            source,
            program,
            uniform_locations: RefCell::new(FnvHashMap::default()),
        })
    }

    /// Rebuild the program, re-reading its file if it came from one. Previously looked up uniform
    /// locations are forgotten since they belonged to the old program.
    pub fn reload(&mut self) -> Result<()> {
        if let Some(filepath) = &self.filepath {
            self.source = ShaderSource::from_path(filepath)?;
        }
        let program = build_program(&self.gl, &self.source)?;
        let previous = mem::replace(&mut self.program, program);
        self.uniform_locations.get_mut().clear();
        tracing::debug!("reloaded shader program {previous} as {program}");
        gl_call!(self.gl, delete_program(previous))
    }

    #[inline]
    #[must_use]
    pub fn program(&self) -> Handle {
        self.program
    }

    /// Whether the program compiled and linked. Only ever `false` with [`ShaderLinkMode::Lenient`].
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.program != INVALID_HANDLE
    }

    pub fn bind(&self) -> Result<()> {
        gl_call!(self.gl, use_program(self.program))
    }

    pub fn unbind(&self) -> Result<()> {
        gl_call!(self.gl, use_program(INVALID_HANDLE))
    }

    /// Look up a uniform, asking the driver only the first time `name` is seen.
    ///
    /// Missing uniforms resolve to `-1`, which the setters accept and the driver ignores.
    pub fn uniform_location(&self, name: &str) -> Result<Location> {
        if let Some(&location) = self.uniform_locations.borrow().get(name) {
            return Ok(location);
        }
        let location = if self.is_valid() {
            gl_call!(self.gl, uniform_location(self.program, name))?
        } else {
            INVALID_LOCATION
        };
        if location == INVALID_LOCATION {
            tracing::warn!("uniform `{name}` doesn't exist in shader program {}", self.program);
        }
        self.uniform_locations
            .borrow_mut()
            .insert(name.to_owned(), location);
        Ok(location)
    }

    pub fn set_uniform_1i(&self, name: &str, value: i32) -> Result<()> {
        let location = self.uniform_location(name)?;
        if !self.is_valid() {
            return Ok(());
        }
        gl_call!(self.gl, uniform_1_i32(location, value))
    }

    pub fn set_uniform_1f(&self, name: &str, value: f32) -> Result<()> {
        let location = self.uniform_location(name)?;
        if !self.is_valid() {
            return Ok(());
        }
        gl_call!(self.gl, uniform_1_f32(location, value))
    }

    pub fn set_uniform_4f(&self, name: &str, v0: f32, v1: f32, v2: f32, v3: f32) -> Result<()> {
        let location = self.uniform_location(name)?;
        if !self.is_valid() {
            return Ok(());
        }
        gl_call!(self.gl, uniform_4_f32(location, v0, v1, v2, v3))
    }

    pub fn set_uniform_mat4(&self, name: &str, matrix: &Mat4) -> Result<()> {
        let location = self.uniform_location(name)?;
        if !self.is_valid() {
            return Ok(());
        }
        gl_call!(
            self.gl,
            uniform_matrix_4_f32(location, false, &matrix.to_cols_array())
        )
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        if !self.is_valid() {
            return;
        }
        if let Err(err) = gl_call!(self.gl, delete_program(self.program)) {
            tracing::error!("failed to delete shader program {}: {err}", self.program);
        }
    }
}

/// Compile both stages and link them. Stage objects never outlive this call.
fn build_program(gl: &Gl, source: &ShaderSource) -> Result<Handle> {
    let vertex = compile_stage(gl, ShaderStage::Vertex, source.stage(ShaderStage::Vertex))?;
    let fragment = match compile_stage(gl, ShaderStage::Fragment, source.stage(ShaderStage::Fragment))
    {
        Ok(fragment) => fragment,
        Err(err) => {
            delete_stage(gl, vertex);
            return Err(err);
        }
    };
    let program = link_stages(gl, [vertex, fragment]);
    delete_stage(gl, vertex);
    delete_stage(gl, fragment);
    program
}

/// Returns [`INVALID_HANDLE`] for a stage that failed to compile in lenient mode.
fn compile_stage(gl: &Gl, stage: ShaderStage, source: &str) -> Result<Handle> {
    let kind = match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    };
    let shader = gl_create!(gl, "shader", create_shader(kind))?;
    match compile(gl, shader, stage, source) {
        Ok(true) => Ok(shader),
        result => {
            delete_stage(gl, shader);
            result.map(|_| INVALID_HANDLE)
        }
    }
}

fn compile(gl: &Gl, shader: Handle, stage: ShaderStage, source: &str) -> Result<bool> {
    gl_call!(gl, shader_source(shader, source))?;
    gl_call!(gl, compile_shader(shader))?;
    if gl_call!(gl, shader_compile_status(shader))? {
        return Ok(true);
    }
    let log = gl_call!(gl, shader_info_log(shader))?;
    tracing::error!("failed to compile {stage} shader: {log}");
    match gl.shader_link_mode() {
        ShaderLinkMode::Lenient => Ok(false),
        ShaderLinkMode::Strict => Err(Error::ShaderCompile { stage, log }),
    }
}

/// Returns [`INVALID_HANDLE`] in lenient mode for a program that failed to link or is missing a
/// stage that failed to compile, even if the driver linked what was left.
fn link_stages(gl: &Gl, stages: [Handle; 2]) -> Result<Handle> {
    let program = gl_create!(gl, "shader program", create_program())?;
    let missing_stage = stages.contains(&INVALID_HANDLE);
    let stages: Vec<_> = stages
        .into_iter()
        .filter(|&stage| stage != INVALID_HANDLE)
        .collect();
    let result = link(gl, program, &stages);
    for &stage in &stages {
        if let Err(err) = gl_call!(gl, detach_shader(program, stage)) {
            tracing::error!("failed to detach shader {stage}: {err}");
        }
    }
    match result {
        Ok(true) if !missing_stage => Ok(program),
        result => {
            if missing_stage {
                tracing::error!("discarding shader program {program} with a failed stage");
            }
            if let Err(err) = gl_call!(gl, delete_program(program)) {
                tracing::error!("failed to delete shader program {program}: {err}");
            }
            result.map(|_| INVALID_HANDLE)
        }
    }
}

fn link(gl: &Gl, program: Handle, stages: &[Handle]) -> Result<bool> {
    for &stage in stages {
        gl_call!(gl, attach_shader(program, stage))?;
    }
    gl_call!(gl, link_program(program))?;
    if gl_call!(gl, program_link_status(program))? {
        return Ok(true);
    }
    let log = gl_call!(gl, program_info_log(program))?;
    tracing::error!("failed to link shader program: {log}");
    match gl.shader_link_mode() {
        ShaderLinkMode::Lenient => Ok(false),
        ShaderLinkMode::Strict => Err(Error::ShaderLink { log }),
    }
}

fn delete_stage(gl: &Gl, shader: Handle) {
    if shader == INVALID_HANDLE {
        return;
    }
    if let Err(err) = gl_call!(gl, delete_shader(shader)) {
        tracing::error!("failed to delete shader {shader}: {err}");
    }
}
