//! Document loader: parses discovered files into design trees.

use std::path::PathBuf;

use crate::error::GuiportError;
use crate::parser::{load_design_file, ParsedDocument};

use super::scanner::ScanResult;

/// A parsed design document and where it came from.
#[derive(Debug)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub document: ParsedDocument,
}

/// Outcome of loading every scanned file.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents: Vec<LoadedDocument>,
    /// Files that failed to read or parse. The rest still load.
    pub failures: Vec<(PathBuf, GuiportError)>,
}

/// Parse every discovered design file.
pub fn load_documents(scan: &ScanResult) -> LoadReport {
    let mut report = LoadReport::default();

    for path in &scan.documents {
        match load_design_file(path) {
            Ok(document) => report.documents.push(LoadedDocument {
                path: path.clone(),
                document,
            }),
            Err(e) => report.failures.push((path.clone(), e)),
        }
    }

    report
}
