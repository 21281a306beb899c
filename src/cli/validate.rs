//! Validate command implementation.
//!
//! Runs the full export in memory, then reports manifest and scene problems
//! without writing anything.

use std::path::PathBuf;

use clap::Args;

use crate::error::{GuiportError, Result};
use crate::output::{plural, Printer};
use crate::validation::validate_project;

use super::export::{discover_inputs, export_project, scene_diagnostics};

/// Validate design documents and the project manifest
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Design files or directories (default: sources from guiport.yaml)
    pub paths: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    let discovery = discover_inputs(&args.paths)?;
    if discovery.scan.is_empty() {
        printer.warning("Skipping", "no design documents found");
    }

    let project = export_project(&discovery, &discovery.manifest, printer)?;

    let mut result = validate_project(&discovery.manifest, &project.scenes);
    result.merge(scene_diagnostics(&project.scenes));

    printer.diagnostics(&result);
    printer.summary(&result);

    if project.failures > 0 {
        return Err(GuiportError::Export {
            message: format!("{} failed to export", plural(project.failures, "input", "inputs")),
            help: None,
        });
    }
    if result.has_errors() || (args.strict && result.has_warnings()) {
        return Err(GuiportError::Validation {
            message: format!(
                "{}, {}",
                plural(result.error_count(), "error", "errors"),
                plural(result.warning_count(), "warning", "warnings")
            ),
            help: None,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(paths: Vec<PathBuf>, strict: bool) -> ValidateArgs {
        ValidateArgs { paths, strict }
    }

    #[test]
    fn test_validate_clean_document() {
        let dir = tempdir().unwrap();
        let design = dir.path().join("menu.design.json");
        fs::write(
            &design,
            r#"{ "roots": [ { "name": "menu", "type": "box", "width": 960, "height": 640 } ] }"#,
        )
        .unwrap();

        run(args(vec![design], false), &Printer::plain()).unwrap();
    }

    #[test]
    fn test_validate_does_not_write_output() {
        let dir = tempdir().unwrap();
        let design = dir.path().join("menu.design.json");
        fs::write(
            &design,
            r#"{ "roots": [ { "name": "menu", "type": "box", "width": 960, "height": 640 } ] }"#,
        )
        .unwrap();

        run(args(vec![design], false), &Printer::plain()).unwrap();

        assert!(!dir.path().join("gui").exists());
        assert!(!dir.path().join("menu.gui").exists());
    }

    #[test]
    fn test_strict_fails_on_warnings() {
        let dir = tempdir().unwrap();
        let design = dir.path().join("hud.design.json");
        // Unmapped font family falls back to the system font with a warning.
        fs::write(
            &design,
            r#"{ "roots": [ { "name": "hud", "type": "box", "width": 960, "height": 640,
                 "children": [ { "name": "score", "type": "text", "width": 100, "height": 40,
                                 "text": { "characters": "0", "font_family": "Roboto", "font_size": 40 } } ] } ] }"#,
        )
        .unwrap();

        assert!(run(args(vec![design.clone()], false), &Printer::plain()).is_ok());
        assert!(run(args(vec![design], true), &Printer::plain()).is_err());
    }

    #[test]
    fn test_validate_reports_parse_failures() {
        let dir = tempdir().unwrap();
        let design = dir.path().join("broken.design.yaml");
        fs::write(&design, "roots: [ {").unwrap();

        assert!(run(args(vec![design], false), &Printer::plain()).is_err());
    }
}
