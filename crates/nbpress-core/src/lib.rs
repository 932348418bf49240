//! # nbpress-core
//!
//! Shared types for the nbpress publishing pipeline:
//! - [`RawNotebook`] — the on-disk notebook document
//! - [`FrontMatter`] — the `---` fenced metadata header, parsed once and
//!   shared by the export validator and the search indexer
//! - Error hierarchy ([`NbpressError`], [`FormatError`])

pub mod error;
pub mod frontmatter;
pub mod notebook;

pub use error::{FormatError, NbpressError, Result};
pub use frontmatter::FrontMatter;
pub use notebook::{Cell, RawNotebook, NOTEBOOK_EXT};
