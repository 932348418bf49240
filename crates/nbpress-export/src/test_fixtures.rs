//! Shared fixtures for the export crate's tests.

use std::fs;
use std::path::{Path, PathBuf};

/// A publishable front-matter cell.
pub const TEST_FRONT_MATTER: &[&str] =
    &["---", "author: ana", "title: A note", "draft: false", "---"];

/// Write a minimal notebook file whose first raw cell holds the given
/// front-matter lines.
pub fn write_notebook(dir: &Path, name: &str, front_matter: &[&str]) -> PathBuf {
    let source: Vec<String> = front_matter.iter().map(|l| format!("{l}\n")).collect();
    let json = serde_json::json!({
        "cells": [
            {"cell_type": "raw", "metadata": {}, "source": source},
            {"cell_type": "markdown", "metadata": {}, "source": ["Some body\n"]},
        ],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5,
    });
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, json.to_string()).unwrap();
    path
}
