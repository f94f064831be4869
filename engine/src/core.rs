//! Core engine features

use crate::{
    config::Config,
    context::Context,
    gl::Gl,
    imgui::{ImGui, Ui},
    window::GlWindow,
    Result,
};
use std::{
    borrow::Cow,
    fmt::Write,
    rc::Rc,
    thread,
    time::{Duration, Instant},
};
#[cfg(debug_assertions)]
use winit::event::{ElementState, VirtualKeyCode};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    platform::run_return::EventLoopExtRunReturn,
};

pub trait OnUpdate {
    /// Called on engine start, once the OpenGL context is current.
    fn on_start(&mut self, _cx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Called every frame while the window has a drawable area.
    fn on_update(&mut self, cx: &mut Context, ui: &mut Ui) -> Result<()>;

    /// Called on engine shutdown, before any GPU resources are released.
    fn on_stop(&mut self, _cx: &mut Context) {}

    /// Called on every window event.
    fn on_event(&mut self, _cx: &mut Context, _event: &WindowEvent<'_>) {}
}

#[derive(Debug, Clone)]
#[must_use]
pub struct Engine {
    title: Cow<'static, str>,
    version: Cow<'static, str>,
    width: u32,
    height: u32,
    config: Config,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            title: "".into(),
            version: "1.0.0".into(),
            width: 960,
            height: 540,
            config: Config::default(),
        }
    }
}

#[derive(Default, Debug, Clone)]
#[must_use]
pub struct EngineBuilder {
    engine: Engine,
}

impl EngineBuilder {
    pub fn title(mut self, title: impl Into<Cow<'static, str>>) -> Self {
        self.engine.title = title.into();
        self
    }

    pub fn version(mut self, version: impl Into<Cow<'static, str>>) -> Self {
        self.engine.version = version.into();
        self
    }

    /// Logical size of the window.
    pub fn inner_size(mut self, width: u32, height: u32) -> Self {
        self.engine.width = width;
        self.engine.height = height;
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.engine.config = config;
        self
    }

    pub fn build(self) -> Engine {
        self.engine
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Open the window and drive `app` until the window closes or the app quits.
    ///
    /// An error from any frame stops the loop and is returned once `app` and every GPU resource
    /// it owns have been released.
    pub fn run(self, app: impl OnUpdate) -> Result<()> {
        let mut event_loop = EventLoop::new();
        let (window, glow) = GlWindow::new(
            &event_loop,
            &self.title,
            self.width,
            self.height,
            self.config.vsync,
        )?;
        let glow = Rc::new(glow);
        let gl = Rc::new(Gl::new(
            Rc::clone(&glow) as _,
            self.config.error_check,
            self.config.shader_link_mode,
        ));
        tracing::info!(
            "starting {} v{}: {:?}",
            self.title,
            self.version,
            self.config
        );

        let mut imgui = ImGui::initialize(window.window(), glow)?;
        // Declared after imgui and the window so it drops before them on early returns.
        let mut app = app;
        let size = window.window().inner_size();
        let mut cx = Context::new(self.config, &gl, size.width, size.height)?;

        app.on_start(&mut cx)?;

        let mut result = Ok(());
        event_loop.run_return(|event, _window_target, control_flow| {
            control_flow.set_poll();

            tracing::trace!("received event: {event:?}");
            match event {
                Event::MainEventsCleared if cx.is_running() => {
                    if let Err(err) = self.update_and_render(&mut app, &mut cx, &mut imgui, &window)
                    {
                        tracing::error!("failed to update application: {err}");
                        result = Err(err);
                        control_flow.set_exit_with_code(1);
                    }
                }
                Event::WindowEvent { event, .. } => {
                    imgui.on_event(&event);
                    match &event {
                        WindowEvent::Resized(size) => {
                            window.resize(size.width, size.height);
                            if let Err(err) = cx.on_resized(size.width, size.height) {
                                tracing::error!("failed to resize viewport: {err}");
                            }
                        }
                        #[cfg(debug_assertions)]
                        WindowEvent::KeyboardInput { input, .. }
                            if matches!(
                                (input.virtual_keycode, input.state),
                                (Some(VirtualKeyCode::Escape), ElementState::Pressed)
                            ) =>
                        {
                            control_flow.set_exit();
                        }
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            tracing::debug!("window closed or destroyed");
                            control_flow.set_exit();
                        }
                        _ => (),
                    }
                    app.on_event(&mut cx, &event);
                }
                Event::LoopDestroyed => {
                    tracing::info!("shutting down...");
                }
                _ => (),
            }

            if cx.should_quit {
                control_flow.set_exit();
            }
        });

        app.on_stop(&mut cx);
        // GPU resources go first, while the context they belong to is still alive.
        drop(app);
        drop(cx);
        drop(imgui);
        drop(gl);
        drop(window);
        result
    }

    fn update_and_render(
        &self,
        app: &mut impl OnUpdate,
        cx: &mut Context,
        imgui: &mut ImGui,
        window: &GlWindow,
    ) -> Result<()> {
        let current_time = Instant::now();
        cx.delta_time = current_time - cx.last_frame_time;

        imgui.frame(cx.delta_time, window.window(), |ui| app.on_update(cx, ui))?;
        window.swap_buffers()?;

        let end_time = Instant::now();
        let elapsed = end_time - current_time;
        cx.fps_timer += cx.delta_time;
        let remaining = cx
            .target_frame_rate
            .checked_sub(elapsed)
            .unwrap_or_default();
        if remaining.as_millis() > 0 {
            if self.config.limit_frame_rate {
                thread::sleep(remaining - Duration::from_millis(1));
            }
            cx.fps_counter += 1;
        }

        let one_second = Duration::from_secs(1);
        if cx.fps_timer > one_second {
            cx.window_title.clear();
            let _ = write!(cx.window_title, "{} - FPS: {}", self.title, cx.fps_counter);
            window.window().set_title(&cx.window_title);
            cx.fps_timer -= one_second;
            cx.fps_counter = 0;
        }

        cx.last_frame_time = current_time;

        Ok(())
    }
}
