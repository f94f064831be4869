//! Dear ImGui platform glue and rendering.

use crate::{window::Window, Error, Result};
use ::imgui::{ConfigFlags, FontConfig, FontSource, MouseCursor};
use anyhow::anyhow;
use derive_more::{Deref, DerefMut};
use imgui_glow_renderer::{Renderer as GlowRenderer, SimpleTextureMap};
use std::{fmt, rc::Rc, time::Duration};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent},
    window::CursorIcon,
};

pub use ::imgui::{DrawData, Ui};

const FONT_SIZE: f64 = 13.0;

#[derive(Deref, DerefMut)]
#[must_use]
pub struct ImGui {
    #[deref]
    #[deref_mut]
    pub(crate) cx: ::imgui::Context,
    renderer: GlowRenderer,
    textures: SimpleTextureMap,
    gl: Rc<glow::Context>,
    hidpi_factor: f64,
}

impl fmt::Debug for ImGui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImGui")
            .field("cx", &self.cx)
            .field("hidpi_factor", &self.hidpi_factor)
            .finish_non_exhaustive()
    }
}

impl ImGui {
    /// Initialize the imgui `Context` and upload its font atlas.
    pub fn initialize(window: &Window, gl: Rc<glow::Context>) -> Result<Self> {
        let mut imgui = ::imgui::Context::create();
        imgui.set_ini_filename(None);

        let hidpi_factor = window.scale_factor().round();
        let io = imgui.io_mut();
        io.display_framebuffer_scale = [hidpi_factor as f32; 2];
        let logical_size = window.inner_size().to_logical::<f32>(hidpi_factor);
        io.display_size = [logical_size.width, logical_size.height];
        io.font_global_scale = (1.0 / hidpi_factor) as f32;
        imgui.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                size_pixels: (FONT_SIZE * hidpi_factor) as f32,
                ..FontConfig::default()
            }),
        }]);

        let mut textures = SimpleTextureMap::default();
        let renderer = GlowRenderer::initialize(&gl, &mut imgui, &mut textures, true)
            .map_err(|err| Error::Renderer(anyhow!("failed to initialize imgui: {err}")))?;

        Ok(Self {
            cx: imgui,
            renderer,
            textures,
            gl,
            hidpi_factor,
        })
    }

    /// Run one imgui frame: prepare input, build the UI with `build`, then draw it. The frame is
    /// drawn even when `build` fails so imgui's frame bookkeeping stays balanced.
    pub fn frame(
        &mut self,
        delta_time: Duration,
        window: &Window,
        build: impl FnOnce(&mut Ui) -> Result<()>,
    ) -> Result<()> {
        self.begin_frame(delta_time, window);
        let ui = self.cx.new_frame();
        let result = build(ui);
        Self::end_frame(ui, window);
        let draw_data = self.cx.render();
        self.renderer
            .render(&self.gl, &self.textures, draw_data)
            .map_err(|err| Error::Renderer(anyhow!("failed to render imgui: {err}")))?;
        result
    }

    /// Called at the beginning of a frame to prepare the imgui for rendering.
    #[inline]
    fn begin_frame(&mut self, delta_time: Duration, window: &Window) {
        let io = self.cx.io_mut();
        io.update_delta_time(delta_time);

        if io.want_set_mouse_pos {
            let [x, y] = io.mouse_pos;
            let position = PhysicalPosition::new(
                f64::from(x) * self.hidpi_factor,
                f64::from(y) * self.hidpi_factor,
            );
            if let Err(err) = window.set_cursor_position(position) {
                tracing::error!("failed to set cursor position: {err:?}");
            }
        }
    }

    /// Called at the end of a frame to submit updates to imgui.
    #[inline]
    fn end_frame(ui: &mut Ui, window: &Window) {
        if !ui
            .io()
            .config_flags
            .contains(ConfigFlags::NO_MOUSE_CURSOR_CHANGE)
        {
            match ui.mouse_cursor() {
                Some(cursor) if !ui.io().mouse_draw_cursor => {
                    window.set_cursor_visible(true);
                    window.set_cursor_icon(cursor_into_winit(cursor));
                }
                _ => window.set_cursor_visible(false),
            }
        }
    }

    /// Called on every window event.
    pub fn on_event(&mut self, event: &WindowEvent<'_>) {
        let hidpi_factor = self.hidpi_factor;
        let io = self.cx.io_mut();
        match event {
            WindowEvent::Resized(size) => {
                let size = size.to_logical::<f32>(hidpi_factor);
                io.display_size = [size.width, size.height];
            }
            WindowEvent::ScaleFactorChanged {
                scale_factor,
                new_inner_size,
            } => {
                let hidpi_factor = scale_factor.round();
                self.hidpi_factor = hidpi_factor;
                io.display_framebuffer_scale = [hidpi_factor as f32; 2];
                let size = new_inner_size.to_logical::<f32>(hidpi_factor);
                io.display_size = [size.width, size.height];
            }
            WindowEvent::KeyboardInput { input, .. } => {
                if let Some(key) = input.virtual_keycode.and_then(key_into_imgui) {
                    io.add_key_event(key, input.state == ElementState::Pressed);
                }
            }
            WindowEvent::ReceivedCharacter(ch) if *ch != '\u{7f}' => {
                io.add_input_character(*ch);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                io.key_ctrl = modifiers.ctrl();
                io.key_shift = modifiers.shift();
                io.key_alt = modifiers.alt();
                io.key_super = modifiers.logo();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = position.to_logical::<f32>(hidpi_factor);
                io.add_mouse_pos_event([position.x, position.y]);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let pixels_per_line = 12.0;
                let (x, y) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                    MouseScrollDelta::PixelDelta(position) => {
                        let position = position.to_logical::<f32>(hidpi_factor);
                        (position.x / pixels_per_line, position.y / pixels_per_line)
                    }
                };
                io.add_mouse_wheel_event([x, y]);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(button) = mouse_button_into_imgui(*button) {
                    io.add_mouse_button_event(button, *state == ElementState::Pressed);
                }
            }
            _ => (),
        }
    }
}

impl Drop for ImGui {
    fn drop(&mut self) {
        self.renderer.destroy(&self.gl);
    }
}

#[inline]
pub(crate) fn cursor_into_winit(cursor: MouseCursor) -> CursorIcon {
    match cursor {
        MouseCursor::Arrow => CursorIcon::Default,
        MouseCursor::TextInput => CursorIcon::Text,
        MouseCursor::ResizeAll => CursorIcon::Move,
        MouseCursor::ResizeNS => CursorIcon::NsResize,
        MouseCursor::ResizeEW => CursorIcon::EwResize,
        MouseCursor::ResizeNESW => CursorIcon::NeswResize,
        MouseCursor::ResizeNWSE => CursorIcon::NwseResize,
        MouseCursor::Hand => CursorIcon::Hand,
        MouseCursor::NotAllowed => CursorIcon::NotAllowed,
    }
}

fn mouse_button_into_imgui(button: MouseButton) -> Option<::imgui::MouseButton> {
    Some(match button {
        MouseButton::Left => ::imgui::MouseButton::Left,
        MouseButton::Right => ::imgui::MouseButton::Right,
        MouseButton::Middle => ::imgui::MouseButton::Middle,
        MouseButton::Other(0) => ::imgui::MouseButton::Extra1,
        MouseButton::Other(1) => ::imgui::MouseButton::Extra2,
        MouseButton::Other(_) => return None,
    })
}

fn key_into_imgui(keycode: VirtualKeyCode) -> Option<::imgui::Key> {
    use ::imgui::Key;
    Some(match keycode {
        VirtualKeyCode::Key1 => Key::Alpha1,
        VirtualKeyCode::Key2 => Key::Alpha2,
        VirtualKeyCode::Key3 => Key::Alpha3,
        VirtualKeyCode::Key4 => Key::Alpha4,
        VirtualKeyCode::Key5 => Key::Alpha5,
        VirtualKeyCode::Key6 => Key::Alpha6,
        VirtualKeyCode::Key7 => Key::Alpha7,
        VirtualKeyCode::Key8 => Key::Alpha8,
        VirtualKeyCode::Key9 => Key::Alpha9,
        VirtualKeyCode::Key0 => Key::Alpha0,
        VirtualKeyCode::A => Key::A,
        VirtualKeyCode::C => Key::C,
        VirtualKeyCode::V => Key::V,
        VirtualKeyCode::X => Key::X,
        VirtualKeyCode::Y => Key::Y,
        VirtualKeyCode::Z => Key::Z,
        VirtualKeyCode::Escape => Key::Escape,
        VirtualKeyCode::Insert => Key::Insert,
        VirtualKeyCode::Home => Key::Home,
        VirtualKeyCode::Delete => Key::Delete,
        VirtualKeyCode::End => Key::End,
        VirtualKeyCode::PageDown => Key::PageDown,
        VirtualKeyCode::PageUp => Key::PageUp,
        VirtualKeyCode::Left => Key::LeftArrow,
        VirtualKeyCode::Up => Key::UpArrow,
        VirtualKeyCode::Right => Key::RightArrow,
        VirtualKeyCode::Down => Key::DownArrow,
        VirtualKeyCode::Back => Key::Backspace,
        VirtualKeyCode::Return => Key::Enter,
        VirtualKeyCode::Space => Key::Space,
        VirtualKeyCode::Tab => Key::Tab,
        VirtualKeyCode::NumpadEnter => Key::KeypadEnter,
        VirtualKeyCode::Minus => Key::Minus,
        VirtualKeyCode::NumpadSubtract => Key::KeypadSubtract,
        VirtualKeyCode::Period => Key::Period,
        VirtualKeyCode::NumpadDecimal => Key::KeypadDecimal,
        VirtualKeyCode::LControl => Key::LeftCtrl,
        VirtualKeyCode::RControl => Key::RightCtrl,
        VirtualKeyCode::LShift => Key::LeftShift,
        VirtualKeyCode::RShift => Key::RightShift,
        VirtualKeyCode::LAlt => Key::LeftAlt,
        VirtualKeyCode::RAlt => Key::RightAlt,
        VirtualKeyCode::LWin => Key::LeftSuper,
        VirtualKeyCode::RWin => Key::RightSuper,
        _ => return None,
    })
}
