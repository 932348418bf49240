//! Local asset link rewriting for exported markdown.
//!
//! Rewrites image references `![...](link)` that point at local files to
//! carry a public URL prefix, in place. Web links (`http`, `www`) are left
//! alone. Only link targets inside image syntax are touched, so one link
//! that happens to be a substring of another (or of the surrounding prose)
//! is never clobbered.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use nbpress_core::error::Result;

static IMAGE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("valid image link pattern"));

/// Rewrite local image links in `markdown` to be prefixed by
/// `public_prefix`. Returns the number of distinct links rewritten.
///
/// # Errors
///
/// Returns [`nbpress_core::NbpressError::Io`] if the file cannot be read
/// or written.
pub fn rewrite_asset_links(markdown: &Path, public_prefix: &str) -> Result<usize> {
    let content = fs::read_to_string(markdown)?;
    let prefix = public_prefix.trim_end_matches('/');

    let mut rewritten = BTreeSet::new();
    let replaced = IMAGE_LINK.replace_all(&content, |caps: &Captures| {
        let (alt, link) = (&caps[1], &caps[2]);
        if link.contains("http") || link.contains("www") {
            return caps[0].to_string();
        }
        debug!(%link, %prefix, "rewriting asset link");
        rewritten.insert(link.to_string());
        format!("![{alt}]({prefix}/{link})")
    });

    let count = rewritten.len();
    if count > 0 {
        fs::write(markdown, replaced.as_ref())?;
    }
    Ok(count)
}
