//! 2D textures.

use crate::{
    gl::{Gl, Handle, INVALID_HANDLE},
    Result,
};
use anyhow::anyhow;
use asset_loader::TextureAsset;
use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

/// An RGBA8 texture with linear filtering and clamped edges. Pixel data only lives on the GPU once
/// uploaded.
#[derive(Debug)]
#[must_use]
pub struct Texture {
    gl: Rc<Gl>,
    handle: Handle,
    filepath: PathBuf,
    width: u32,
    height: u32,
    channels: u32,
}

impl Texture {
    /// Decode and upload the image at `filepath`.
    pub fn new(gl: &Rc<Gl>, filepath: impl AsRef<Path>) -> Result<Self> {
        Self::from_asset(gl, TextureAsset::from_path(filepath)?)
    }

    /// Upload already decoded pixels, consuming them.
    pub fn from_asset(gl: &Rc<Gl>, asset: TextureAsset) -> Result<Self> {
        let TextureAsset {
            filename,
            width,
            height,
            data,
        } = asset;
        let (Ok(gl_width), Ok(gl_height)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(anyhow!("texture {filename:?} is too large: {width}x{height}").into());
        };

        tracing::debug!("creating texture {filename:?}, {width}x{height}");
        let handle = gl_create!(gl, "texture", create_texture())?;
        let texture = Self {
            gl: Rc::clone(gl),
            handle,
            filepath: filename,
            width,
            height,
            channels: asset_loader::texture::CHANNELS,
        };

        gl_call!(gl, bind_texture(glow::TEXTURE_2D, handle))?;
        for (parameter, value) in [
            (glow::TEXTURE_MIN_FILTER, glow::LINEAR),
            (glow::TEXTURE_MAG_FILTER, glow::LINEAR),
            (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
            (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
        ] {
            gl_call!(
                gl,
                tex_parameter_i32(glow::TEXTURE_2D, parameter, value as i32)
            )?;
        }
        gl_call!(
            gl,
            tex_image_2d_rgba8(glow::TEXTURE_2D, gl_width, gl_height, &data)
        )?;
        texture.unbind()?;

        Ok(texture)
    }

    /// Bind to texture unit `slot`.
    pub fn bind(&self, slot: u32) -> Result<()> {
        gl_call!(self.gl, active_texture(glow::TEXTURE0 + slot))?;
        gl_call!(self.gl, bind_texture(glow::TEXTURE_2D, self.handle))
    }

    pub fn unbind(&self) -> Result<()> {
        gl_call!(self.gl, bind_texture(glow::TEXTURE_2D, INVALID_HANDLE))
    }

    #[inline]
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    #[inline]
    #[must_use]
    pub fn filepath(&self) -> &Path {
        &self.filepath
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

    #[inline]
    #[must_use]
    pub fn channels(&self) -> u32 {
        self.channels
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Err(err) = gl_call!(self.gl, delete_texture(self.handle)) {
            tracing::error!("failed to delete texture {:?}: {err}", self.filepath);
        }
    }
}
