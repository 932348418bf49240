//! Raw notebook document model.
//!
//! A `.ipynb` file is a JSON document with an ordered `cells` array. Only
//! the fields nbpress needs are modeled; everything else is ignored.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{FormatError, NbpressError};
use crate::frontmatter::FrontMatter;

/// File extension of notebook documents (without the dot).
pub const NOTEBOOK_EXT: &str = "ipynb";

/// A notebook document as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNotebook {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// A single notebook cell.
#[derive(Debug, Clone, Deserialize)]
pub struct Cell {
    pub cell_type: String,
    #[serde(default, deserialize_with = "source_lines")]
    pub source: Vec<String>,
}

/// nbformat allows `source` to be either a list of lines or one
/// multiline string; normalize both to lines.
fn source_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Source {
        Lines(Vec<String>),
        Text(String),
    }

    Ok(match Source::deserialize(deserializer)? {
        Source::Lines(lines) => lines,
        Source::Text(text) => text.lines().map(String::from).collect(),
    })
}

impl RawNotebook {
    /// Load and deserialize a notebook file.
    ///
    /// # Errors
    ///
    /// Returns [`NbpressError::Io`] if the file cannot be read and
    /// [`FormatError::InvalidNotebook`] if it is not valid notebook JSON.
    pub fn load(path: &Path) -> Result<Self, NbpressError> {
        let content = fs::read_to_string(path)?;
        let notebook: Self = serde_json::from_str(&content)
            .map_err(|e| FormatError::InvalidNotebook(e.to_string()))?;
        Ok(notebook)
    }

    /// Extract front-matter from the first cell. The cell must contain
    /// nothing but the fenced header: its last line is the closing `---`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::FirstCellNotRaw`] if the first cell is absent
    /// or not of type `raw`, [`FormatError::TrailingContent`] if the cell
    /// continues past the closing fence, and propagates delimiter errors
    /// from the front-matter parser.
    pub fn front_matter(&self) -> Result<FrontMatter, FormatError> {
        let first = self
            .cells
            .first()
            .filter(|cell| cell.cell_type == "raw")
            .ok_or(FormatError::FirstCellNotRaw)?;
        let front_matter = FrontMatter::parse_lines(&first.source)?;
        if front_matter.body_start() != first.source.len() {
            return Err(FormatError::TrailingContent);
        }
        Ok(front_matter)
    }
}
