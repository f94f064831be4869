//! Engine context

use crate::{config::Config, gl::Gl, renderer::Renderer, Result};
use std::{
    rc::Rc,
    time::{Duration, Instant},
};

/// Per-run state handed to the application every frame.
#[derive(Debug)]
#[must_use]
pub struct Context {
    pub(crate) window_title: String,
    pub(crate) last_frame_time: Instant,
    pub(crate) delta_time: Duration,
    pub(crate) target_frame_rate: Duration,
    pub(crate) fps_counter: usize,
    pub(crate) fps_timer: Duration,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) suspended: bool,
    pub(crate) should_quit: bool,
    pub(crate) config: Config,
    pub(crate) gl: Rc<Gl>,
    pub(crate) renderer: Renderer,
}

impl Context {
    pub(crate) fn new(config: Config, gl: &Rc<Gl>, width: u32, height: u32) -> Result<Self> {
        let renderer = Renderer::new(gl);
        renderer.set_viewport(width, height)?;
        Ok(Self {
            window_title: String::new(),
            last_frame_time: Instant::now(),
            delta_time: Duration::default(),
            target_frame_rate: Duration::from_secs(1) / config.target_fps.max(1),
            fps_counter: 0,
            fps_timer: Duration::default(),
            width,
            height,
            suspended: width == 0 || height == 0,
            should_quit: false,
            config,
            gl: Rc::clone(gl),
            renderer,
        })
    }

    #[inline]
    #[must_use]
    pub fn gl(&self) -> &Rc<Gl> {
        &self.gl
    }

    #[inline]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Seconds since the previous frame.
    #[inline]
    #[must_use]
    pub fn delta_time(&self) -> f32 {
        self.delta_time.as_secs_f32()
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.suspended
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Track the drawable size. Rendering is suspended while the window has no area.
    pub(crate) fn on_resized(&mut self, width: u32, height: u32) -> Result<()> {
        tracing::debug!("resized event: {width}x{height}");
        self.width = width;
        self.height = height;
        self.suspended = width == 0 || height == 0;
        if self.suspended {
            return Ok(());
        }
        self.renderer.set_viewport(width, height)
    }
}
