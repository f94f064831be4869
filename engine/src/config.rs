//! Engine configuration.

use crate::{gl::ErrorCheck, shader::ShaderLinkMode};
use std::{env, str::FromStr};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[must_use]
pub struct Config {
    pub(crate) limit_frame_rate: bool,
    pub(crate) target_fps: u32,
    pub(crate) vsync: bool,
    pub(crate) error_check: ErrorCheck,
    pub(crate) shader_link_mode: ShaderLinkMode,
}

impl Default for Config {
    /// Reads `LIMIT_FPS`, `TARGET_FPS`, `VSYNC`, `GL_ERROR_CHECK` and `SHADER_LINK_MODE`.
    fn default() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            limit_frame_rate: lookup("LIMIT_FPS").is_some(),
            target_fps: parse(&lookup, "TARGET_FPS")
                .filter(|&target_fps| target_fps > 0)
                .unwrap_or(60),
            vsync: lookup("VSYNC").map_or(true, |vsync| vsync != "0"),
            error_check: parse(&lookup, "GL_ERROR_CHECK").unwrap_or_default(),
            shader_link_mode: parse(&lookup, "SHADER_LINK_MODE").unwrap_or_default(),
        }
    }

    pub fn limit_frame_rate(mut self, limit_frame_rate: bool) -> Self {
        self.limit_frame_rate = limit_frame_rate;
        self
    }

    pub fn target_fps(mut self, target_fps: u32) -> Self {
        self.target_fps = target_fps.max(1);
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn error_check(mut self, error_check: ErrorCheck) -> Self {
        self.error_check = error_check;
        self
    }

    pub fn shader_link_mode(mut self, shader_link_mode: ShaderLinkMode) -> Self {
        self.shader_link_mode = shader_link_mode;
        self
    }
}

fn parse<T>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = lookup(key)?;
    match value.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("ignoring {key}={value:?}: {err}");
            None
        }
    }
}
