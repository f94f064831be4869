//! Loading of the file-backed inputs used by the sandbox renderer: combined shader sources and
//! texture images. Nothing in this crate touches the GPU.

use std::{io, path::PathBuf};

pub mod filesystem;
pub mod shader;
pub mod texture;

pub use shader::{ShaderSource, ShaderStage};
pub use texture::TextureAsset;

/// Results that can be returned from this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can be returned from this library.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("unsupported texture format in {path:?}: {reason}")]
    UnsupportedTexture { path: PathBuf, reason: String },
    #[error("failed to decode texture {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: png::DecodingError,
    },
}
