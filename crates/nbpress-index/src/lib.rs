//! # nbpress-index
//!
//! Builds a flat JSON search index from a tree of converted markdown
//! posts. Each entry carries the document's front-matter metadata plus a
//! `content` preview and a public `link` computed from the file's path
//! under the content root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use nbpress_core::error::{NbpressError, Result};
use nbpress_core::frontmatter::FrontMatter;

/// Maximum length, in characters, of the `content` preview field.
pub const CONTENT_PREVIEW_LIMIT: usize = 500;

/// Section stubs are never indexed.
const SECTION_STUB: &str = "_index.md";

/// Configuration for an index build.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Root of the converted markdown corpus.
    pub content_root: PathBuf,
    /// Public URL prefix for entry links.
    pub base_url: String,
    /// Where to write the JSON index.
    pub output: PathBuf,
}

/// One searchable entry: every front-matter key of the document, flattened
/// into the object, plus the computed `content` and `link` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    #[serde(flatten)]
    pub metadata: BTreeMap<String, String>,
    pub content: String,
    pub link: String,
}

/// Build index entries for every `*.md` file under the content root,
/// excluding files named exactly `_index.md`. Files without a leading
/// `---` fence are skipped with a warning.
///
/// # Errors
///
/// Returns [`NbpressError::Io`] if the content root cannot be traversed
/// or a file cannot be read.
pub fn build_index(config: &IndexConfig) -> Result<Vec<IndexEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(&config.content_root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some("md")
            || entry.file_name() == SECTION_STUB
        {
            continue;
        }

        debug!(post = %path.display(), "indexing");
        let content = fs::read_to_string(path)?;
        let Ok(front_matter) = FrontMatter::parse_str(&content) else {
            warn!(post = %path.display(), "no front-matter fence, skipping");
            continue;
        };

        let lines: Vec<&str> = content.lines().collect();
        entries.push(IndexEntry {
            link: entry_link(&config.base_url, &config.content_root, path),
            content: content_preview(&lines[front_matter.body_start().min(lines.len())..]),
            metadata: front_matter.into_fields(),
        });
    }

    Ok(entries)
}

/// Serialize entries as a JSON array to the configured output file.
///
/// # Errors
///
/// Returns [`NbpressError::Serialization`] if encoding fails and
/// [`NbpressError::Io`] if the file cannot be written.
pub fn write_index(entries: &[IndexEntry], output: &Path) -> Result<()> {
    let json =
        serde_json::to_vec(entries).map_err(|e| NbpressError::Serialization(e.to_string()))?;
    fs::write(output, json)?;
    info!(count = entries.len(), output = %output.display(), "index written");
    Ok(())
}

/// Join body lines into one string and truncate to the preview limit.
fn content_preview(body: &[&str]) -> String {
    let joined = body.join(" ");
    joined
        .chars()
        .take(CONTENT_PREVIEW_LIMIT)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Public URL for a post: base URL plus the slugged path segments relative
/// to the content root, with the filename's extension stripped.
fn entry_link(base_url: &str, content_root: &Path, post: &Path) -> String {
    let relative = post.strip_prefix(content_root).unwrap_or(post);
    let mut link = base_url.trim_end_matches('/').to_string();

    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            let segment = component.as_os_str().to_string_lossy();
            link.push('/');
            link.push_str(&slug(&segment));
        }
    }

    let stem = post.file_stem().unwrap_or_default().to_string_lossy();
    link.push('/');
    link.push_str(&slug(&stem));
    link
}

/// Lower-case and space-to-hyphen normalization for link segments.
fn slug(segment: &str) -> String {
    segment.to_lowercase().replace(' ', "-")
}
