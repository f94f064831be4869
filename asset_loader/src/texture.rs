//! Texture image decoding.

use crate::{filesystem, Error, Result};
use png::{ColorType, Transformations};
use std::{
    io::Read,
    path::{Path, PathBuf},
};

/// Bytes per pixel of every decoded texture.
pub const CHANNELS: u32 = 4;

/// Decoded RGBA8 pixels, bottom row first.
#[derive(Default, Clone, PartialEq, Eq)]
#[must_use]
pub struct TextureAsset {
    pub filename: PathBuf,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for TextureAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureAsset")
            .field("filename", &self.filename)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("size", &self.data.len())
            .finish()
    }
}

impl TextureAsset {
    /// Decode a PNG texture from disk.
    pub fn from_path(filename: impl AsRef<Path>) -> Result<Self> {
        let filename = filename.as_ref();
        tracing::debug!("reading texture {filename:?}");
        let texture = Self::from_reader(filename, filesystem::open_file(filename)?)?;
        tracing::debug!(
            "loaded texture {filename:?} successfully, {}x{}",
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    /// Decode a PNG texture from any reader. `filename` is only used for error reporting.
    pub fn from_reader(filename: impl AsRef<Path>, reader: impl Read) -> Result<Self> {
        let filename = filename.as_ref();
        let decode_err = |source| Error::Decode {
            path: filename.to_path_buf(),
            source,
        };

        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
        let mut reader = decoder.read_info().map_err(decode_err)?;
        let mut pixels = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut pixels).map_err(decode_err)?;
        pixels.truncate(info.buffer_size());

        let rgba = to_rgba8(info.color_type, &pixels).ok_or_else(|| Error::UnsupportedTexture {
            path: filename.to_path_buf(),
            reason: format!("{:?} at {:?}", info.color_type, info.bit_depth),
        })?;

        Ok(Self {
            filename: filename.to_path_buf(),
            width: info.width,
            height: info.height,
            data: flip_vertically(rgba, info.width, info.height),
        })
    }

    #[must_use]
    pub fn channels(&self) -> u32 {
        CHANNELS
    }
}

fn to_rgba8(color_type: ColorType, pixels: &[u8]) -> Option<Vec<u8>> {
    let rgba = match color_type {
        ColorType::Rgba => pixels.to_vec(),
        ColorType::Rgb => pixels
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], u8::MAX])
            .collect(),
        ColorType::GrayscaleAlpha => pixels
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        ColorType::Grayscale => pixels
            .iter()
            .flat_map(|&g| [g, g, g, u8::MAX])
            .collect(),
        // EXPAND turns palettes into RGB(A) before we get here.
        ColorType::Indexed => return None,
    };
    Some(rgba)
}

/// OpenGL expects the first row of texture data to be the bottom of the image.
fn flip_vertically(pixels: Vec<u8>, width: u32, height: u32) -> Vec<u8> {
    let row_len = (width * CHANNELS) as usize;
    if row_len == 0 || height <= 1 {
        return pixels;
    }
    pixels
        .chunks_exact(row_len)
        .rev()
        .flatten()
        .copied()
        .collect()
}
