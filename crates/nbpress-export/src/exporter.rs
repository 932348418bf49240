//! Notebook validation and export.
//!
//! An export runs validate → convert → move → relocate media for a single
//! notebook, end-to-end, before the next file is touched. Success is
//! "no error returned"; all effects are on the filesystem.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use nbpress_core::error::{FormatError, NbpressError, Result};
use nbpress_core::frontmatter::FrontMatter;
use nbpress_core::notebook::{RawNotebook, NOTEBOOK_EXT};

use crate::converter::MarkdownConverter;

/// Suffix the converter appends to the markdown basename for the
/// generated-media directory.
const MEDIA_BUNDLE_SUFFIX: &str = "_files";

/// Validates and exports notebook documents through a [`MarkdownConverter`].
pub struct Exporter<C> {
    converter: C,
}

impl<C: MarkdownConverter> Exporter<C> {
    #[must_use]
    pub fn new(converter: C) -> Self {
        Self { converter }
    }

    /// Validate a notebook for publication.
    ///
    /// Checks, in order: the `.ipynb` extension, notebook JSON shape, a
    /// leading raw cell holding exactly the `---` fenced header and
    /// nothing after it, presence of `author` and `title`, and the draft
    /// gate.
    ///
    /// # Errors
    ///
    /// Returns [`NbpressError::Format`] for structural defects and
    /// [`NbpressError::Draft`] when the note is not cleared for
    /// publication. Drafts are expected and frequent; callers should
    /// skip them quietly rather than alarm.
    pub fn validate(&self, path: &Path) -> Result<FrontMatter> {
        if path.extension().and_then(|e| e.to_str()) != Some(NOTEBOOK_EXT) {
            return Err(FormatError::Extension {
                path: path.display().to_string(),
            }
            .into());
        }

        let notebook = RawNotebook::load(path)?;
        let front_matter = notebook.front_matter()?;

        for field in ["author", "title"] {
            if front_matter.get(field).is_none() {
                return Err(FormatError::MissingField {
                    field: field.to_string(),
                }
                .into());
            }
        }

        if front_matter.is_draft() {
            return Err(NbpressError::Draft);
        }

        Ok(front_matter)
    }

    /// Export a notebook to `destination`, relocating generated media to
    /// `media_destination` (default: `media` next to the exported file).
    ///
    /// `destination` is either a literal `.md` path or a directory, in
    /// which case the filename derives from the notebook's. Destination
    /// directories are created as needed; an existing file at the final
    /// path is overwritten, so exporting twice is idempotent.
    ///
    /// # Errors
    ///
    /// Fails fast on validation (no partial output), and propagates
    /// converter and filesystem errors.
    pub fn export(
        &self,
        path: &Path,
        destination: &Path,
        media_destination: Option<&Path>,
    ) -> Result<()> {
        self.validate(path)?;

        let destination = resolve_destination(path, destination);
        let converted = self.converter.convert(path)?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        move_file(&converted, &destination)?;
        debug!(destination = %destination.display(), "markdown exported");

        let bundle = media_bundle_path(&converted);
        if bundle.exists() {
            let media_destination = media_destination.map_or_else(
                || destination.parent().unwrap_or(Path::new(".")).join("media"),
                Path::to_path_buf,
            );
            debug!(media = %media_destination.display(), "relocating media bundle");
            copy_tree(&bundle, &media_destination)?;
            fs::remove_dir_all(&bundle)?;
        }

        Ok(())
    }
}

/// Resolve an export target to a concrete file path: a literal `.md` path
/// is used as-is, anything else is treated as a directory and the filename
/// derives from the notebook's.
#[must_use]
pub fn resolve_destination(notebook: &Path, destination: &Path) -> PathBuf {
    if destination.extension().and_then(|e| e.to_str()) == Some("md") {
        destination.to_path_buf()
    } else {
        let stem = notebook.file_stem().unwrap_or_default();
        let mut name = stem.to_os_string();
        name.push(".md");
        destination.join(name)
    }
}

/// Path of the media bundle the converter produces alongside a markdown
/// file: `note.md` → `note_files`.
#[must_use]
pub fn media_bundle_path(markdown: &Path) -> PathBuf {
    let mut name = OsString::from(markdown.file_stem().unwrap_or_default());
    name.push(MEDIA_BUNDLE_SUFFIX);
    markdown.with_file_name(name)
}

/// Move a file, overwriting the destination. Falls back to copy+remove
/// when rename fails (destination on another filesystem).
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_err() {
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}

/// Recursively copy a directory into `to`, merging with whatever is
/// already there. Existing files are overwritten, not skipped.
fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to)?;
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(std::io::Error::from)?;
        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::test_support::StubConverter;
    use crate::test_fixtures::{write_notebook, TEST_FRONT_MATTER};

    fn exporter() -> Exporter<StubConverter> {
        Exporter::new(StubConverter::default())
    }

    #[test]
    fn validate_accepts_publishable_notebook() {
        let dir = tempfile::tempdir().unwrap();
        let nb = write_notebook(dir.path(), "note.ipynb", TEST_FRONT_MATTER);

        let fm = exporter().validate(&nb).unwrap();
        assert_eq!(fm.author(), Some("ana"));
        assert_eq!(fm.title(), Some("A note"));
    }

    #[test]
    fn validate_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let nb = write_notebook(dir.path(), "note.txt", TEST_FRONT_MATTER);

        let err = exporter().validate(&nb).unwrap_err();
        assert!(matches!(
            err,
            NbpressError::Format(FormatError::Extension { .. })
        ));
    }

    #[test]
    fn validate_rejects_missing_author_or_title() {
        let dir = tempfile::tempdir().unwrap();

        let nb = write_notebook(
            dir.path(),
            "no_author.ipynb",
            &["---", "title: T", "draft: false", "---"],
        );
        let err = exporter().validate(&nb).unwrap_err();
        assert!(matches!(
            err,
            NbpressError::Format(FormatError::MissingField { ref field }) if field == "author"
        ));

        let nb = write_notebook(
            dir.path(),
            "no_title.ipynb",
            &["---", "author: ana", "draft: false", "---"],
        );
        let err = exporter().validate(&nb).unwrap_err();
        assert!(matches!(
            err,
            NbpressError::Format(FormatError::MissingField { ref field }) if field == "title"
        ));
    }

    #[test]
    fn validate_rejects_unfenced_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let nb = write_notebook(
            dir.path(),
            "note.ipynb",
            &["title: T", "author: ana", "draft: false"],
        );
        let err = exporter().validate(&nb).unwrap_err();
        assert!(matches!(
            err,
            NbpressError::Format(FormatError::MissingDelimiter)
        ));
    }

    #[test]
    fn validate_rejects_cell_continuing_past_fence() {
        let dir = tempfile::tempdir().unwrap();
        let nb = write_notebook(
            dir.path(),
            "note.ipynb",
            &["---", "author: ana", "title: T", "draft: false", "---", "stray text after fence"],
        );
        let err = exporter().validate(&nb).unwrap_err();
        assert!(matches!(
            err,
            NbpressError::Format(FormatError::TrailingContent)
        ));
    }

    #[test]
    fn validate_gates_drafts() {
        let dir = tempfile::tempdir().unwrap();

        let nb = write_notebook(
            dir.path(),
            "draft.ipynb",
            &["---", "author: ana", "title: T", "draft: true", "---"],
        );
        assert!(exporter().validate(&nb).unwrap_err().is_draft());

        let nb = write_notebook(
            dir.path(),
            "no_flag.ipynb",
            &["---", "author: ana", "title: T", "---"],
        );
        assert!(exporter().validate(&nb).unwrap_err().is_draft());
    }

    #[test]
    fn export_to_directory_derives_filename() {
        let dir = tempfile::tempdir().unwrap();
        let nb = write_notebook(dir.path(), "jan.ipynb", TEST_FRONT_MATTER);
        let out = dir.path().join("out");

        exporter().export(&nb, &out, None).unwrap();
        assert!(out.join("jan.md").exists());
        // the converted sibling was moved, not copied
        assert!(!dir.path().join("jan.md").exists());
    }

    #[test]
    fn export_to_literal_path_uses_it() {
        let dir = tempfile::tempdir().unwrap();
        let nb = write_notebook(dir.path(), "jan.ipynb", TEST_FRONT_MATTER);
        let out = dir.path().join("posts").join("renamed.md");

        exporter().export(&nb, &out, None).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn export_is_idempotent_on_destination() {
        let dir = tempfile::tempdir().unwrap();
        let nb = write_notebook(dir.path(), "jan.ipynb", TEST_FRONT_MATTER);
        let out = dir.path().join("out");

        exporter().export(&nb, &out, None).unwrap();
        exporter().export(&nb, &out, None).unwrap();

        let entries: Vec<_> = fs::read_dir(&out).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn export_relocates_media_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let nb = write_notebook(dir.path(), "jan.ipynb", TEST_FRONT_MATTER);
        let out = dir.path().join("out");
        let media = dir.path().join("media").join("jan");

        let exporter = Exporter::new(StubConverter::with_media(&["chart.png", "fig/plot.svg"]));
        exporter.export(&nb, &out, Some(&media)).unwrap();

        assert!(media.join("chart.png").exists());
        assert!(media.join("fig").join("plot.svg").exists());
        // bundle is deleted after relocation
        assert!(!dir.path().join("jan_files").exists());
    }

    #[test]
    fn export_merges_media_over_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let nb = write_notebook(dir.path(), "jan.ipynb", TEST_FRONT_MATTER);
        let out = dir.path().join("out");
        let media = dir.path().join("media");
        fs::create_dir_all(&media).unwrap();
        fs::write(media.join("chart.png"), "stale").unwrap();
        fs::write(media.join("kept.png"), "kept").unwrap();

        let exporter = Exporter::new(StubConverter::with_media(&["chart.png"]));
        exporter.export(&nb, &out, Some(&media)).unwrap();

        assert_ne!(fs::read_to_string(media.join("chart.png")).unwrap(), "stale");
        assert_eq!(fs::read_to_string(media.join("kept.png")).unwrap(), "kept");
    }

    #[test]
    fn export_of_draft_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let nb = write_notebook(
            dir.path(),
            "draft.ipynb",
            &["---", "author: ana", "title: T", "draft: true", "---"],
        );
        let out = dir.path().join("out");

        let err = exporter().export(&nb, &out, None).unwrap_err();
        assert!(err.is_draft());
        assert!(!out.exists());
    }

    #[test]
    fn media_bundle_path_appends_suffix() {
        assert_eq!(
            media_bundle_path(Path::new("notes/jan.md")),
            PathBuf::from("notes/jan_files")
        );
    }
}
