//! Pipeline file discovery logic.

use std::path::{Path, PathBuf};

use makespan_core::{MakespanError, Result};

/// Default pipeline file name.
const PIPELINE_NAME: &str = "pipeline.txt";

/// Finds the pipeline file by searching from the current directory upwards.
pub fn find_pipeline() -> Result<PathBuf> {
    find_pipeline_from(&std::env::current_dir()?)
}

/// Finds the pipeline file starting from the given directory.
pub fn find_pipeline_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(PIPELINE_NAME);

        if candidate.is_file() {
            return Ok(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return Err(MakespanError::PipelineNotFound(start.to_path_buf())),
        }
    }
}
