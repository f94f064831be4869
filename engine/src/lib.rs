//! A small OpenGL engine: thin RAII wrappers over driver objects, a renderer that draws indexed
//! geometry with them, a test menu for switching between demo scenes at runtime and the window,
//! context and imgui plumbing that drives it all.
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    clippy::branches_sharing_code,
    clippy::map_unwrap_or,
    clippy::match_wildcard_for_single_variants,
    // clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::needless_for_each,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::unreadable_literal,
    clippy::unwrap_used,
    clippy::expect_used,
    deprecated_in_future,
    ellipsis_inclusive_range_patterns,
    future_incompatible,
    missing_copy_implementations,
    missing_debug_implementations,
    // missing_docs,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2018_idioms,
    rust_2021_compatibility,
    rustdoc::bare_urls,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::private_intra_doc_links,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused,
    variant_size_differences
)]

use asset_loader::ShaderStage;

#[macro_use]
pub mod gl;
pub mod buffer;
pub mod config;
pub mod context;
pub mod core;
pub mod imgui;
pub mod layout;
pub mod renderer;
pub mod shader;
pub mod test_menu;
pub mod texture;
pub mod vertex_array;
pub mod window;

/// Results that can be returned from this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can be returned from this crate.
#[allow(variant_size_differences)]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("failed to link shader program: {log}")]
    ShaderLink { log: String },
    #[error("[OpenGL error] ({code:#06x}): {call} {file}:{line}")]
    Driver {
        call: &'static str,
        file: &'static str,
        line: u32,
        code: u32,
    },
    #[error("failed to create {resource}: {reason}")]
    Create {
        resource: &'static str,
        reason: String,
    },
    #[error("no test registered named `{0}`")]
    UnknownTest(String),
    #[error("renderer error: {0}")]
    Renderer(anyhow::Error),
    #[error(transparent)]
    Asset(#[from] asset_loader::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub mod prelude {
    //! Most commonly used exports for setting up an application.

    pub use crate::{
        buffer::{IndexBuffer, VertexBuffer},
        config::Config,
        context::Context,
        core::{Engine, OnUpdate},
        gl::{ErrorCheck, Gl},
        imgui::Ui,
        layout::VertexBufferLayout,
        renderer::Renderer,
        shader::{Shader, ShaderLinkMode},
        test_menu::{Test, TestMenu},
        texture::Texture,
        vertex_array::VertexArray,
    };
    pub use glam::{Mat4, Vec3, Vec4};
}
