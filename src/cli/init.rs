//! Init command implementation.
//!
//! Generates a `guiport.yaml` manifest from discovered design documents.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{scan_directory, Manifest, MANIFEST_FILENAME};
use crate::error::{GuiportError, Result};
use crate::output::{display_path, plural, Printer};

/// Initialize a guiport project by generating a guiport.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing guiport.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(GuiportError::Io {
            path: manifest_path,
            message: "Manifest already exists (use --force to overwrite)".to_string(),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    // Scan everything; an existing manifest's sources are about to be replaced.
    let scan = scan_directory(&args.path, &Manifest::default());

    let source_dirs = source_directories(&scan.documents, &args.path);
    let yaml = render_manifest(&source_dirs, &Manifest::default());

    fs::write(&manifest_path, &yaml).map_err(|e| GuiportError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    if !source_dirs.is_empty() {
        let dirs: Vec<&str> = source_dirs.iter().map(|s| s.as_str()).collect();
        printer.info("Discovered", &dirs.join(", "));
    }

    printer.success(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            plural(scan.total(), "design document", "design documents")
        ),
    );

    Ok(())
}

/// Unique parent directories of `files`, relative to `root`.
fn source_directories(files: &[PathBuf], root: &Path) -> BTreeSet<String> {
    let mut dirs = BTreeSet::new();
    for file in files {
        if let Some(parent) = file.parent() {
            let relative = parent.strip_prefix(root).unwrap_or(parent);
            let dir = if relative == Path::new("") {
                ".".to_string()
            } else {
                format!("{}/", relative.display())
            };
            dirs.insert(dir);
        }
    }
    dirs
}

/// Build the manifest text by hand so the tables come out commented.
fn render_manifest(source_dirs: &BTreeSet<String>, defaults: &Manifest) -> String {
    let mut yaml = String::new();

    let only_root = source_dirs.len() == 1 && source_dirs.contains(".");
    if !source_dirs.is_empty() && !only_root {
        yaml.push_str("sources:\n");
        for dir in source_dirs {
            yaml.push_str(&format!("  - \"{}\"\n", dir));
        }
    }

    yaml.push_str(&format!("output: {}\n", defaults.output.display()));
    yaml.push_str(&format!("base_font_size: {}\n", defaults.base_font_size));
    yaml.push_str(&format!("max_nodes: {}\n", defaults.max_nodes));
    yaml.push_str(&format!("templates_dir: {}\n", defaults.templates_dir));
    yaml.push_str("\n# atlases:\n");
    yaml.push_str("#   ui:\n");
    yaml.push_str("#     path: /assets/ui.atlas\n");
    yaml.push_str("#     sprites:\n");
    yaml.push_str("#       button_bg: [200, 80]\n");
    yaml.push_str("\n# fonts:\n");
    yaml.push_str("#   Roboto: /assets/fonts/roboto.font\n");

    yaml
}
