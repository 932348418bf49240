//! Recursive folder conversion.
//!
//! Walks an input root for `*.ipynb` files, mirrors the relative directory
//! hierarchy under the output and media roots, and exports each notebook
//! independently: a draft or a malformed file never aborts the rest of the
//! batch.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use nbpress_core::error::{NbpressError, Result};
use nbpress_core::notebook::NOTEBOOK_EXT;

use crate::converter::MarkdownConverter;
use crate::exporter::Exporter;
use crate::links::rewrite_asset_links;

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Destination paths of successfully exported notes.
    pub exported: Vec<PathBuf>,
    /// Notes skipped because they are drafts. Expected, not failures.
    pub skipped_drafts: usize,
    /// Per-file hard failures, recorded and walked past.
    pub failures: Vec<(PathBuf, NbpressError)>,
}

impl BatchReport {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Exports every notebook under an input root, preserving hierarchy.
pub struct BatchExporter<C> {
    exporter: Exporter<C>,
    output_root: PathBuf,
    media_root: PathBuf,
    asset_prefix: Option<String>,
}

impl<C: MarkdownConverter> BatchExporter<C> {
    #[must_use]
    pub fn new(converter: C, output_root: impl Into<PathBuf>, media_root: impl Into<PathBuf>) -> Self {
        Self {
            exporter: Exporter::new(converter),
            output_root: output_root.into(),
            media_root: media_root.into(),
            asset_prefix: None,
        }
    }

    /// Rewrite local image links in each exported file with this prefix.
    #[must_use]
    pub fn with_asset_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.asset_prefix = Some(prefix.into());
        self
    }

    /// Convert every `*.ipynb` under `input_root`.
    ///
    /// A notebook at `input_root/a/b/note.ipynb` exports to
    /// `output_root/a/b/note.md` with media at `media_root/a/b/note`.
    /// Validation and conversion failures are collected in the report;
    /// only walk-level IO errors abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`NbpressError::Io`] if the input root itself cannot be
    /// traversed.
    pub fn convert_tree(&self, input_root: &Path) -> Result<BatchReport> {
        let mut report = BatchReport::default();

        for entry in WalkDir::new(input_root).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(NOTEBOOK_EXT) {
                continue;
            }

            debug!(notebook = %path.display(), "processing");
            let (destination, media_destination) = self.destinations(input_root, path);
            match self.export_one(path, &destination, &media_destination) {
                Ok(()) => report.exported.push(destination),
                Err(e) if e.is_draft() => {
                    debug!(notebook = %path.display(), "skipping draft");
                    report.skipped_drafts += 1;
                }
                Err(e) => {
                    warn!(notebook = %path.display(), error = %e, "export failed");
                    report.failures.push((path.to_path_buf(), e));
                }
            }
        }

        Ok(report)
    }

    fn export_one(&self, path: &Path, destination: &Path, media: &Path) -> Result<()> {
        self.exporter.export(path, destination, Some(media))?;
        if let Some(prefix) = &self.asset_prefix {
            rewrite_asset_links(destination, prefix)?;
        }
        Ok(())
    }

    /// Compute the mirrored output and media paths for one notebook:
    /// the path relative to the input root, filename excluded, is the
    /// hierarchy segment.
    fn destinations(&self, input_root: &Path, notebook: &Path) -> (PathBuf, PathBuf) {
        let hierarchy = notebook
            .strip_prefix(input_root)
            .ok()
            .and_then(Path::parent)
            .unwrap_or(Path::new(""));
        let stem = notebook.file_stem().unwrap_or_default();

        let mut markdown_name = stem.to_os_string();
        markdown_name.push(".md");
        (
            self.output_root.join(hierarchy).join(markdown_name),
            self.media_root.join(hierarchy).join(stem),
        )
    }
}
