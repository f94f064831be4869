//! An in-memory [`GraphicsApi`] that tracks object lifetimes and raises the errors a real driver
//! would for the mistakes the wrappers are meant to prevent.

use super::{GraphicsApi, Handle, Location, INVALID_HANDLE, INVALID_LOCATION};
use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet, VecDeque},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct AttribPointer {
    pub(crate) vertex_array: Handle,
    pub(crate) index: u32,
    pub(crate) count: i32,
    pub(crate) data_type: u32,
    pub(crate) normalized: bool,
    pub(crate) stride: i32,
    pub(crate) offset: i32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Draw {
    pub(crate) program: Handle,
    pub(crate) vertex_array: Handle,
    pub(crate) count: i32,
}

#[derive(Default, Debug)]
struct Shader {
    stage: u32,
    source: String,
    compiled: bool,
}

#[derive(Default, Debug)]
struct Program {
    attached: Vec<Handle>,
    linked_source: Option<String>,
}

#[derive(Default, Debug)]
pub(crate) struct FakeApi {
    next_handle: Cell<Handle>,
    live: RefCell<HashSet<Handle>>,
    errors: RefCell<VecDeque<u32>>,
    raise_on_next_call: Cell<Option<u32>>,
    links_partial_programs: Cell<bool>,

    shaders: RefCell<HashMap<Handle, Shader>>,
    programs: RefCell<HashMap<Handle, Program>>,
    vertex_arrays: RefCell<HashMap<Handle, Option<Handle>>>,

    bound_array_buffer: Cell<Handle>,
    bound_vertex_array: Cell<Handle>,
    bound_texture: Cell<Handle>,
    current_program: Cell<Handle>,

    uniform_queries: Cell<usize>,
    uniform_writes: RefCell<Vec<(Location, Vec<f32>)>>,
    attrib_pointers: RefCell<Vec<AttribPointer>>,
    draws: RefCell<Vec<Draw>>,
    clear_color: Cell<[f32; 4]>,
    buffer_uploads: RefCell<HashMap<Handle, usize>>,
}

impl FakeApi {
    /// Make the next non-error-query call raise `code`.
    pub(crate) fn raise_on_next_call(&self, code: u32) {
        self.raise_on_next_call.set(Some(code));
    }

    /// Queue `code` as if an earlier, unchecked call had raised it.
    pub(crate) fn raise_now(&self, code: u32) {
        self.errors.borrow_mut().push_back(code);
    }

    /// Link programs with any compiled stage attached, like desktop drivers do for a lone vertex
    /// or fragment stage.
    pub(crate) fn link_partial_programs(&self) {
        self.links_partial_programs.set(true);
    }

    pub(crate) fn pending_errors(&self) -> usize {
        self.errors.borrow().len()
    }

    /// Number of objects created and not yet deleted.
    pub(crate) fn live_objects(&self) -> usize {
        self.live.borrow().len()
    }

    pub(crate) fn is_live(&self, handle: Handle) -> bool {
        self.live.borrow().contains(&handle)
    }

    pub(crate) fn uniform_queries(&self) -> usize {
        self.uniform_queries.get()
    }

    pub(crate) fn uniform_writes(&self) -> Vec<(Location, Vec<f32>)> {
        self.uniform_writes.borrow().clone()
    }

    pub(crate) fn attrib_pointers(&self) -> Vec<AttribPointer> {
        self.attrib_pointers.borrow().clone()
    }

    pub(crate) fn draws(&self) -> Vec<Draw> {
        self.draws.borrow().clone()
    }

    pub(crate) fn current_program(&self) -> Handle {
        self.current_program.get()
    }

    pub(crate) fn bound_texture(&self) -> Handle {
        self.bound_texture.get()
    }

    pub(crate) fn last_clear_color(&self) -> [f32; 4] {
        self.clear_color.get()
    }

    pub(crate) fn buffer_size(&self, buffer: Handle) -> Option<usize> {
        self.buffer_uploads.borrow().get(&buffer).copied()
    }

    fn called(&self) {
        if let Some(code) = self.raise_on_next_call.take() {
            self.raise_now(code);
        }
    }

    fn create(&self) -> Handle {
        self.called();
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        self.live.borrow_mut().insert(handle);
        handle
    }

    fn delete(&self, handle: Handle) {
        self.called();
        self.live.borrow_mut().remove(&handle);
    }

    fn bind(&self, slot: &Cell<Handle>, handle: Handle) {
        self.called();
        if handle != INVALID_HANDLE && !self.is_live(handle) {
            self.raise_now(glow::INVALID_OPERATION);
            return;
        }
        slot.set(handle);
    }

    fn write_uniform(&self, location: Location, values: &[f32]) {
        self.called();
        if self.current_program.get() == INVALID_HANDLE {
            self.raise_now(glow::INVALID_OPERATION);
            return;
        }
        if location != INVALID_LOCATION {
            self.uniform_writes
                .borrow_mut()
                .push((location, values.to_vec()));
        }
    }
}

impl GraphicsApi for FakeApi {
    fn get_error(&self) -> u32 {
        self.errors.borrow_mut().pop_front().unwrap_or(glow::NO_ERROR)
    }

    fn create_buffer(&self) -> Result<Handle, String> {
        Ok(self.create())
    }

    fn delete_buffer(&self, buffer: Handle) {
        self.delete(buffer);
    }

    fn bind_buffer(&self, target: u32, buffer: Handle) {
        match target {
            glow::ELEMENT_ARRAY_BUFFER => {
                self.called();
                if buffer != INVALID_HANDLE && !self.is_live(buffer) {
                    self.raise_now(glow::INVALID_OPERATION);
                    return;
                }
                // Element bindings are vertex array state; `0` stands in for the default array.
                let vertex_array = self.bound_vertex_array.get();
                self.vertex_arrays
                    .borrow_mut()
                    .insert(vertex_array, (buffer != INVALID_HANDLE).then_some(buffer));
            }
            _ => self.bind(&self.bound_array_buffer, buffer),
        }
    }

    fn buffer_data(&self, target: u32, data: &[u8], _usage: u32) {
        self.called();
        let buffer = match target {
            glow::ELEMENT_ARRAY_BUFFER => self
                .vertex_arrays
                .borrow()
                .get(&self.bound_vertex_array.get())
                .copied()
                .flatten(),
            _ => Some(self.bound_array_buffer.get()).filter(|&buffer| buffer != INVALID_HANDLE),
        };
        match buffer {
            Some(buffer) => {
                self.buffer_uploads.borrow_mut().insert(buffer, data.len());
            }
            None => self.raise_now(glow::INVALID_OPERATION),
        }
    }

    fn create_vertex_array(&self) -> Result<Handle, String> {
        let vertex_array = self.create();
        self.vertex_arrays.borrow_mut().insert(vertex_array, None);
        Ok(vertex_array)
    }

    fn delete_vertex_array(&self, vertex_array: Handle) {
        self.delete(vertex_array);
        self.vertex_arrays.borrow_mut().remove(&vertex_array);
        if self.bound_vertex_array.get() == vertex_array {
            self.bound_vertex_array.set(INVALID_HANDLE);
        }
    }

    fn bind_vertex_array(&self, vertex_array: Handle) {
        self.bind(&self.bound_vertex_array, vertex_array);
    }

    fn enable_vertex_attrib_array(&self, _index: u32) {
        self.called();
        if self.bound_vertex_array.get() == INVALID_HANDLE {
            self.raise_now(glow::INVALID_OPERATION);
        }
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
        self.called();
        let vertex_array = self.bound_vertex_array.get();
        if vertex_array == INVALID_HANDLE || self.bound_array_buffer.get() == INVALID_HANDLE {
            self.raise_now(glow::INVALID_OPERATION);
            return;
        }
        self.attrib_pointers.borrow_mut().push(AttribPointer {
            vertex_array,
            index,
            count,
            data_type,
            normalized,
            stride,
            offset,
        });
    }

    fn create_shader(&self, stage: u32) -> Result<Handle, String> {
        let shader = self.create();
        self.shaders.borrow_mut().insert(
            shader,
            Shader {
                stage,
                ..Shader::default()
            },
        );
        Ok(shader)
    }

    fn shader_source(&self, shader: Handle, source: &str) {
        self.called();
        match self.shaders.borrow_mut().get_mut(&shader) {
            Some(entry) => entry.source = source.to_owned(),
            None => self.raise_now(glow::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: Handle) {
        self.called();
        match self.shaders.borrow_mut().get_mut(&shader) {
            Some(entry) => {
                entry.compiled = !entry.source.trim().is_empty() && !entry.source.contains("error");
            }
            None => self.raise_now(glow::INVALID_VALUE),
        }
    }

    fn shader_compile_status(&self, shader: Handle) -> bool {
        self.shaders
            .borrow()
            .get(&shader)
            .map_or(false, |entry| entry.compiled)
    }

    fn shader_info_log(&self, shader: Handle) -> String {
        match self.shaders.borrow().get(&shader) {
            Some(entry) if !entry.compiled => format!("0:1(1): error: bad {:#06x} shader", entry.stage),
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: Handle) {
        self.delete(shader);
        self.shaders.borrow_mut().remove(&shader);
    }

    fn create_program(&self) -> Result<Handle, String> {
        let program = self.create();
        self.programs
            .borrow_mut()
            .insert(program, Program::default());
        Ok(program)
    }

    fn attach_shader(&self, program: Handle, shader: Handle) {
        self.called();
        if !self.shaders.borrow().contains_key(&shader) {
            self.raise_now(glow::INVALID_VALUE);
            return;
        }
        match self.programs.borrow_mut().get_mut(&program) {
            Some(entry) => entry.attached.push(shader),
            None => self.raise_now(glow::INVALID_VALUE),
        }
    }

    fn detach_shader(&self, program: Handle, shader: Handle) {
        self.called();
        if let Some(entry) = self.programs.borrow_mut().get_mut(&program) {
            entry.attached.retain(|&attached| attached != shader);
        }
    }

    fn link_program(&self, program: Handle) {
        self.called();
        let shaders = self.shaders.borrow();
        let mut programs = self.programs.borrow_mut();
        let Some(entry) = programs.get_mut(&program) else {
            self.raise_now(glow::INVALID_VALUE);
            return;
        };
        let stages: Vec<_> = entry
            .attached
            .iter()
            .filter_map(|shader| shaders.get(shader))
            .collect();
        let has_stage = |stage| stages.iter().any(|s| s.stage == stage && s.compiled);
        let links = if self.links_partial_programs.get() {
            has_stage(glow::VERTEX_SHADER) || has_stage(glow::FRAGMENT_SHADER)
        } else {
            has_stage(glow::VERTEX_SHADER) && has_stage(glow::FRAGMENT_SHADER)
        };
        entry.linked_source = links.then(|| stages.iter().map(|s| s.source.as_str()).collect());
    }

    fn program_link_status(&self, program: Handle) -> bool {
        self.programs
            .borrow()
            .get(&program)
            .map_or(false, |entry| entry.linked_source.is_some())
    }

    fn program_info_log(&self, program: Handle) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            "error: linking with uncompiled/unspecialized shader".to_owned()
        }
    }

    fn use_program(&self, program: Handle) {
        self.called();
        let linked = program == INVALID_HANDLE || self.program_link_status(program);
        if !linked {
            self.raise_now(glow::INVALID_OPERATION);
            return;
        }
        self.current_program.set(program);
    }

    fn delete_program(&self, program: Handle) {
        self.delete(program);
        self.programs.borrow_mut().remove(&program);
        if self.current_program.get() == program {
            self.current_program.set(INVALID_HANDLE);
        }
    }

    fn uniform_location(&self, program: Handle, name: &str) -> Location {
        self.called();
        self.uniform_queries.set(self.uniform_queries.get() + 1);
        let programs = self.programs.borrow();
        let Some(source) = programs.get(&program).and_then(|p| p.linked_source.as_ref()) else {
            self.raise_now(glow::INVALID_OPERATION);
            return INVALID_LOCATION;
        };
        source
            .find(name)
            .and_then(|offset| Location::try_from(offset).ok())
            .unwrap_or(INVALID_LOCATION)
    }

    fn uniform_1_i32(&self, location: Location, x: i32) {
        self.write_uniform(location, &[x as f32]);
    }

    fn uniform_1_f32(&self, location: Location, x: f32) {
        self.write_uniform(location, &[x]);
    }

    fn uniform_4_f32(&self, location: Location, x: f32, y: f32, z: f32, w: f32) {
        self.write_uniform(location, &[x, y, z, w]);
    }

    fn uniform_matrix_4_f32(&self, location: Location, _transpose: bool, value: &[f32; 16]) {
        self.write_uniform(location, value);
    }

    fn create_texture(&self) -> Result<Handle, String> {
        Ok(self.create())
    }

    fn delete_texture(&self, texture: Handle) {
        self.delete(texture);
        if self.bound_texture.get() == texture {
            self.bound_texture.set(INVALID_HANDLE);
        }
    }

    fn active_texture(&self, unit: u32) {
        self.called();
        if !(glow::TEXTURE0..glow::TEXTURE0 + 32).contains(&unit) {
            self.raise_now(glow::INVALID_ENUM);
        }
    }

    fn bind_texture(&self, _target: u32, texture: Handle) {
        self.bind(&self.bound_texture, texture);
    }

    fn tex_parameter_i32(&self, _target: u32, _parameter: u32, _value: i32) {
        self.called();
        if self.bound_texture.get() == INVALID_HANDLE {
            self.raise_now(glow::INVALID_OPERATION);
        }
    }

    fn tex_image_2d_rgba8(&self, _target: u32, width: i32, height: i32, pixels: &[u8]) {
        self.called();
        let expected = usize::try_from(width * height * 4).unwrap_or(usize::MAX);
        if self.bound_texture.get() == INVALID_HANDLE || pixels.len() < expected {
            self.raise_now(glow::INVALID_OPERATION);
        }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.called();
        self.clear_color.set([red, green, blue, alpha]);
    }

    fn clear(&self, _mask: u32) {
        self.called();
    }

    fn enable(&self, _capability: u32) {
        self.called();
    }

    fn blend_func(&self, _src: u32, _dst: u32) {
        self.called();
    }

    fn viewport(&self, _x: i32, _y: i32, width: i32, height: i32) {
        self.called();
        if width < 0 || height < 0 {
            self.raise_now(glow::INVALID_VALUE);
        }
    }

    fn draw_elements(&self, _mode: u32, count: i32, _element_type: u32, _offset: i32) {
        self.called();
        let program = self.current_program.get();
        let vertex_array = self.bound_vertex_array.get();
        let has_indices = self
            .vertex_arrays
            .borrow()
            .get(&vertex_array)
            .map_or(false, Option::is_some);
        if vertex_array == INVALID_HANDLE || !has_indices {
            self.raise_now(glow::INVALID_OPERATION);
            return;
        }
        // Nothing runs without a program, but it isn't an error either.
        if program == INVALID_HANDLE {
            return;
        }
        self.draws.borrow_mut().push(Draw {
            program,
            vertex_array,
            count,
        });
    }
}
