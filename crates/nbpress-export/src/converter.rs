//! The external notebook-to-markdown converter collaborator.
//!
//! The converter contract: given a valid notebook file, produce a sibling
//! `.md` file with the same basename and, if the notebook contains
//! generated chart output, a sibling `<basename>_files` directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use nbpress_core::error::{NbpressError, Result};

/// Default converter program.
pub const DEFAULT_CONVERTER: &str = "jupyter-nbconvert";

/// Converts a notebook file into a sibling markdown file.
pub trait MarkdownConverter {
    /// Produce `<stem>.md` next to `notebook` and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`NbpressError::Conversion`] if the converter fails.
    fn convert(&self, notebook: &Path) -> Result<PathBuf>;
}

/// Production converter: invokes `<program> <path> --to markdown` as a
/// subprocess with an argument list (no shell), capturing exit status
/// and stderr.
pub struct NbConvert {
    program: String,
}

impl NbConvert {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NbConvert {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTER)
    }
}

impl MarkdownConverter for NbConvert {
    fn convert(&self, notebook: &Path) -> Result<PathBuf> {
        debug!(notebook = %notebook.display(), program = %self.program, "converting to markdown");

        let output = Command::new(&self.program)
            .arg(notebook)
            .args(["--to", "markdown"])
            .output()?;

        if !output.status.success() {
            return Err(NbpressError::Conversion {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(notebook.with_extension("md"))
    }
}
