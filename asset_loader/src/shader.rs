//! Combined shader source files.
//!
//! A single `.shader` file carries both program stages. A line containing `#shader vertex` or
//! `#shader fragment` switches which stage the following lines belong to:
//!
//! ```text
//! #shader vertex
//! #version 330 core
//! ...
//! #shader fragment
//! #version 330 core
//! ...
//! ```

use crate::{filesystem, Result};
use std::{fmt, path::Path};

const MARKER: &str = "#shader";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[must_use]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn from_marker(line: &str) -> Option<Self> {
        if line.contains("vertex") {
            Some(Self::Vertex)
        } else if line.contains("fragment") {
            Some(Self::Fragment)
        } else {
            None
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Per-stage sources split out of a combined shader file.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    /// Split a combined shader source into its vertex and fragment stages.
    ///
    /// Lines before the first recognized marker are dropped. A stage without a marker comes back
    /// empty; compiling it is what fails, not splitting.
    pub fn parse(source: &str) -> Self {
        let mut sources = Self::default();
        let mut stage = None;
        for line in source.lines() {
            if line.contains(MARKER) {
                // A marker naming neither stage keeps the current selection.
                if let Some(next) = ShaderStage::from_marker(line) {
                    stage = Some(next);
                }
                continue;
            }
            let Some(stage) = stage else {
                continue;
            };
            let target = sources.stage_mut(stage);
            target.push_str(line);
            target.push('\n');
        }
        sources
    }

    /// Read and split a combined shader file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("reading shader {path:?}");
        let source = filesystem::read_to_string(path)?;
        Ok(Self::parse(&source))
    }

    #[must_use]
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }

    fn stage_mut(&mut self, stage: ShaderStage) -> &mut String {
        match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        }
    }
}
