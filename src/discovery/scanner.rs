//! File system scanner for discovering design documents.
//!
//! Recursively scans directories for `*.design.json` and `*.design.yaml`
//! files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::parser::SourceFormat;

use super::manifest::Manifest;

/// Result of scanning for design documents.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Discovered design files, in walk order.
    pub documents: Vec<PathBuf>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Merge another scan result into this one, dropping repeated paths.
    pub fn merge(&mut self, other: ScanResult) {
        for path in other.documents {
            if !self.documents.contains(&path) {
                self.documents.push(path);
            }
        }
    }
}

/// Scan a directory for design documents.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    if !root.exists() {
        return result;
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if path.is_dir() || manifest.is_excluded(path) {
            continue;
        }

        if is_design_file(path) {
            result.documents.push(path.to_path_buf());
        }
    }

    result
}

/// Scan multiple source paths relative to `base_path`.
pub fn scan_sources(sources: &[String], base_path: &Path, manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    for source in sources {
        let source_path = if Path::new(source).is_absolute() {
            PathBuf::from(source)
        } else {
            base_path.join(source)
        };

        result.merge(scan_directory(&source_path, manifest));
    }

    result
}

/// Whether a path names a design document.
pub fn is_design_file(path: &Path) -> bool {
    SourceFormat::from_path(path).is_some()
}
