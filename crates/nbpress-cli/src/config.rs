//! Optional site configuration, read from `nbpress.toml` in the working
//! directory. Every field has a CLI flag that overrides it; an absent file
//! means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

const CONFIG_FILENAME: &str = "nbpress.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public URL prefix for index entry links.
    pub base_url: Option<String>,
    /// Root of the converted markdown corpus.
    pub content_root: Option<PathBuf>,
    /// Where the search index is written.
    pub index_output: Option<PathBuf>,
    /// Converter program to invoke.
    pub converter: Option<String>,
}

impl SiteConfig {
    /// Load config from `dir/nbpress.toml`, or return defaults if absent.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).with_context(|| format!("invalid config at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn loads_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "base_url = \"http://example.com/site\"\ncontent_root = \"_site/content\"\n",
        )
        .unwrap();

        let config = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://example.com/site"));
        assert_eq!(
            config.content_root.as_deref(),
            Some(Path::new("_site/content"))
        );
        assert_eq!(config.index_output, None);
    }

    #[test]
    fn rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "bse_url = \"typo\"\n").unwrap();
        assert!(SiteConfig::load(dir.path()).is_err());
    }
}
