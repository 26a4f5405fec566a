//! Makespan Parser - pipeline file parser using nom combinators.
//!
//! A pipeline file is a sequence of four-line task records:
//!
//! ```text
//! preprocess      <- task name
//! 3               <- duration in minutes
//! prepare         <- group (blank line: ungrouped)
//! load,clean      <- dependencies (blank line: none)
//! ```
//!
//! Records repeat until a line reading `END` or the end of the file.

mod ast;
mod combinators;
mod error;
mod parser;
mod span;

pub use error::ParseError;
pub use parser::parse_pipeline;

use std::path::Path;

use makespan_core::{MakespanError, Pipeline, Result};

/// Parses a pipeline from the given path.
pub fn parse_file(path: &Path) -> Result<Pipeline> {
    let content = std::fs::read_to_string(path).map_err(|e| MakespanError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(parse_pipeline(&content, path)?)
}
