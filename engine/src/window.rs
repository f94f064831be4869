//! Window and OpenGL context creation.

use crate::Result;
use anyhow::{anyhow, Context as _};
use glutin::{
    config::{Config, ConfigTemplateBuilder, GlConfig},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{Display, GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasRawWindowHandle;
use std::{ffi::CString, fmt, num::NonZeroU32};
use winit::{dpi::LogicalSize, event_loop::EventLoop, window::WindowBuilder};

pub use winit::window::Window;

/// A window with a current OpenGL 3.3 core context.
#[must_use]
pub struct GlWindow {
    // Dropped in declaration order: the surface and context go before the window they draw to.
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl fmt::Debug for GlWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlWindow")
            .field("window", &self.window.id())
            .finish_non_exhaustive()
    }
}

impl GlWindow {
    /// Open a window, create a context for it and make that context current. Returns the driver
    /// functions loaded for the new context.
    pub fn new<T>(
        event_loop: &EventLoop<T>,
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, glow::Context)> {
        let window_builder = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(LogicalSize::new(width, height));
        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(event_loop, template, gl_config_picker)
            .map_err(|err| anyhow!("failed to create window: {err}"))?;
        let window = window.context("failed to create window")?;
        tracing::debug!(
            "picked gl config with {} samples, {} alpha bits",
            gl_config.num_samples(),
            gl_config.alpha_size()
        );

        let gl_display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));
        // SAFETY: The raw window handle belongs to `window`, which outlives the context.
        let context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("failed to create OpenGL context")?;

        let surface_attributes = window.build_surface_attributes(Default::default());
        // SAFETY: Same as above.
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .context("failed to create window surface")?;
        let context = context
            .make_current(&surface)
            .context("failed to make OpenGL context current")?;

        let interval = NonZeroU32::new(1)
            .filter(|_| vsync)
            .map_or(SwapInterval::DontWait, SwapInterval::Wait);
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            tracing::warn!("failed to set vsync to {vsync}: {err}");
        }

        let gl = load_functions(&gl_display);
        tracing::info!("created OpenGL 3.3 core context, vsync: {vsync}");

        Ok((
            Self {
                surface,
                context,
                window,
            },
            gl,
        ))
    }

    #[inline]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resize the drawable surface. Zero sized windows are left alone.
    pub fn resize(&self, width: u32, height: u32) {
        if let (Some(width), Some(height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, width, height);
        }
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")?;
        Ok(())
    }
}

fn load_functions(gl_display: &Display) -> glow::Context {
    // SAFETY: The context these functions belong to was made current on this thread.
    unsafe {
        glow::Context::from_loader_function(|symbol| {
            CString::new(symbol).map_or(std::ptr::null(), |symbol| {
                gl_display.get_proc_address(&symbol)
            })
        })
    }
}

/// Prefer multisampled configs.
#[allow(clippy::expect_used)]
fn gl_config_picker(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    most_samples(configs, GlConfig::num_samples)
        .expect("glutin only calls the picker with at least one config")
}

/// The first config with the highest sample count.
fn most_samples<T>(configs: impl Iterator<Item = T>, num_samples: impl Fn(&T) -> u8) -> Option<T> {
    configs.reduce(|best, config| {
        if num_samples(&config) > num_samples(&best) {
            config
        } else {
            best
        }
    })
}
