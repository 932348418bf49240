//! Front-matter parsing.
//!
//! Handles the `---` delimited metadata header shared by notebook raw cells
//! and converted markdown posts. Format:
//! ```text
//! ---
//! title: My First Post
//! author: someone
//! draft: false
//! ---
//!
//! Body content here
//! ```
//!
//! Values are plain strings: the line splits at the first `:` and the
//! remainder is kept verbatim, so titles containing colons survive.
//!
//! This parser is the single source of truth for front-matter. Both the
//! export validator and the search indexer go through it, and both require
//! the opening `---` on the first line.

use std::collections::BTreeMap;

use crate::error::FormatError;

/// The front-matter fence line.
pub const DELIMITER: &str = "---";

/// Parsed front-matter: the key/value mapping plus the line offset
/// where the document body starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: BTreeMap<String, String>,
    body_start: usize,
}

impl FrontMatter {
    /// Parse front-matter from a document's raw lines.
    ///
    /// The first line must be exactly `---` (after trimming); lines up to
    /// the next `---` are parsed as `key: value` pairs. Blank lines inside
    /// the header are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::MissingDelimiter`] if the opening or closing
    /// fence is absent.
    pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, FormatError> {
        let mut iter = lines.iter().map(|l| l.as_ref().trim());

        if iter.next() != Some(DELIMITER) {
            return Err(FormatError::MissingDelimiter);
        }

        let mut fields = BTreeMap::new();
        for (offset, line) in iter.enumerate() {
            if line == DELIMITER {
                return Ok(Self {
                    fields,
                    // offset counts from line 1; the body starts after the fence
                    body_start: offset + 2,
                });
            }
            if line.is_empty() {
                continue;
            }
            match line.split_once(':') {
                Some((key, value)) => {
                    fields.insert(key.trim().to_string(), value.trim().to_string());
                }
                None => {
                    fields.insert(line.to_string(), String::new());
                }
            }
        }

        Err(FormatError::MissingDelimiter)
    }

    /// Parse front-matter from full document text.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::MissingDelimiter`] if the opening or closing
    /// fence is absent.
    pub fn parse_str(content: &str) -> Result<Self, FormatError> {
        let lines: Vec<&str> = content.lines().collect();
        Self::parse_lines(&lines)
    }

    /// Look up a metadata value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.get("author")
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    /// The draft gate: a note is a draft unless `draft` is present and
    /// equal to `"false"` (case-insensitive).
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.get("draft")
            .is_none_or(|v| !v.eq_ignore_ascii_case("false"))
    }

    /// Line index (into the original lines) where the body starts.
    #[must_use]
    pub fn body_start(&self) -> usize {
        self.body_start
    }

    /// Consume the front-matter, yielding the metadata mapping.
    #[must_use]
    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }
}
