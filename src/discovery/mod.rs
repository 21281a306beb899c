//! File discovery and document loading for guiport projects.
//!
//! Finds design documents under a project directory, either by scanning
//! everything or by following the source paths of a `guiport.yaml`
//! manifest.
//!
//! # Example
//!
//! ```ignore
//! use guiport::discovery::discover;
//!
//! let result = discover("./my-game")?;
//! println!("Found {} design documents", result.scan.total());
//!
//! let loaded = result.load();
//! ```

mod loader;
mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use loader::{load_documents, LoadReport, LoadedDocument};
pub use manifest::{AtlasConfig, Manifest};
pub use scanner::{is_design_file, scan_directory, scan_sources, ScanResult};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "guiport.yaml";

/// Result of discovering design documents in a project.
#[derive(Debug)]
pub struct DiscoveryResult {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if no guiport.yaml was found).
    pub manifest: Manifest,

    pub has_manifest: bool,

    pub scan: ScanResult,
}

impl DiscoveryResult {
    /// Parse every discovered document.
    pub fn load(&self) -> LoadReport {
        load_documents(&self.scan)
    }
}

/// Discover design documents in a project directory.
///
/// Uses the source paths of `guiport.yaml` when the root has one, otherwise
/// scans the whole directory.
pub fn discover(root: impl AsRef<Path>) -> Result<DiscoveryResult> {
    let root = root.as_ref().to_path_buf();

    let manifest_path = root.join(MANIFEST_FILENAME);
    let (manifest, has_manifest) = if manifest_path.exists() {
        (Manifest::load(&manifest_path)?, true)
    } else {
        (Manifest::default(), false)
    };

    let sources = manifest.effective_sources();
    let scan = scan_sources(&sources, &root, &manifest);

    Ok(DiscoveryResult {
        root,
        manifest,
        has_manifest,
        scan,
    })
}

/// Discover documents from explicit files and directories.
///
/// The manifest is looked up in the current directory so atlas and font
/// tables still apply.
pub fn discover_paths(paths: &[PathBuf]) -> Result<DiscoveryResult> {
    let root = PathBuf::from(".");
    let manifest_path = root.join(MANIFEST_FILENAME);
    let (manifest, has_manifest) = if manifest_path.exists() {
        (Manifest::load(&manifest_path)?, true)
    } else {
        (Manifest::default(), false)
    };

    let mut scan = ScanResult::new();
    for path in paths {
        if path.is_dir() {
            scan.merge(scan_directory(path, &manifest));
        } else if path.is_file() && is_design_file(path) {
            scan.merge(ScanResult {
                documents: vec![path.clone()],
            });
        }
    }

    Ok(DiscoveryResult {
        root,
        manifest,
        has_manifest,
        scan,
    })
}
