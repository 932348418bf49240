//! # nbpress-export
//!
//! Notebook validation and markdown export for nbpress.
//!
//! The pipeline for one notebook: validate front-matter → run the external
//! converter → move the markdown to its destination → relocate the media
//! bundle. [`BatchExporter`] runs it over a whole tree, mirroring the
//! input hierarchy and isolating per-file failures.

pub mod batch;
pub mod converter;
pub mod exporter;
pub mod links;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use batch::{BatchExporter, BatchReport};
pub use converter::{MarkdownConverter, NbConvert, DEFAULT_CONVERTER};
pub use exporter::Exporter;
pub use links::rewrite_asset_links;
