//! Export command implementation.
//!
//! Loads design documents, exports every root to a `.gui` scene and writes
//! the scenes to the output directory (or stdout).

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{discover, discover_paths, DiscoveryResult, LoadedDocument, Manifest};
use crate::error::{GuiportError, Result};
use crate::export::{AtlasTable, ExportOptions, ExportedScene, Exporter, FontTable, TimerSettle};
use crate::output::{display_path, plural, Printer};
use crate::render::{render_gui, GuiSettings};
use crate::validation::{validate_project, ValidationResult};

/// Export design documents as GUI scenes
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Design files or directories (default: sources from guiport.yaml)
    pub paths: Vec<PathBuf>,

    /// Output directory (overrides guiport.yaml)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print scenes to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Inline template children instead of emitting references
    #[arg(long)]
    pub expand_templates: bool,
}

/// Scenes exported from a set of documents.
#[derive(Debug, Default)]
pub struct ProjectExport {
    pub scenes: Vec<ExportedScene>,
    /// Files and roots that could not be exported.
    pub failures: usize,
}

pub fn run(args: ExportArgs, printer: &Printer) -> Result<()> {
    let discovery = discover_inputs(&args.paths)?;
    let mut manifest = discovery.manifest.clone();
    if args.expand_templates {
        manifest.expand_templates = true;
    }

    let project = export_project(&discovery, &manifest, printer)?;

    let mut diagnostics = validate_project(&manifest, &project.scenes);
    diagnostics.merge(scene_diagnostics(&project.scenes));
    printer.diagnostics(&diagnostics);
    if diagnostics.has_errors() {
        return Err(GuiportError::Validation {
            message: format!("{} found", plural(diagnostics.error_count(), "error", "errors")),
            help: Some("Run `guiport validate` for the full report".to_string()),
        });
    }

    let settings = GuiSettings::from_manifest(&manifest);
    if args.stdout {
        for scene in &project.scenes {
            print!("{}", render_gui(scene, &settings));
        }
    } else {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| discovery.root.join(&manifest.output));
        write_scenes(&project.scenes, &settings, &output, printer)?;
    }

    if project.failures > 0 {
        return Err(GuiportError::Export {
            message: format!("{} failed to export", plural(project.failures, "input", "inputs")),
            help: None,
        });
    }

    Ok(())
}

/// Discover from explicit paths, or from the current project.
pub fn discover_inputs(paths: &[PathBuf]) -> Result<DiscoveryResult> {
    if paths.is_empty() {
        discover(".")
    } else {
        discover_paths(paths)
    }
}

/// Load and export every discovered document on a single-threaded runtime.
pub fn export_project(discovery: &DiscoveryResult, manifest: &Manifest, printer: &Printer) -> Result<ProjectExport> {
    let loaded = discovery.load();
    for (path, error) in &loaded.failures {
        printer.error("Failed", &format!("{}: {}", display_path(path), error));
    }

    let mut documents = loaded.documents;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let mut project = runtime.block_on(export_documents(&mut documents, manifest, printer))?;
    project.failures += loaded.failures.len();

    if project.failures == 0 {
        printer.success("Finished", &plural(project.scenes.len(), "scene", "scenes"));
    }
    Ok(project)
}

/// Export every root of every document, in order.
///
/// Root failures are reported and counted; a consistency error aborts.
pub async fn export_documents(
    documents: &mut [LoadedDocument],
    manifest: &Manifest,
    printer: &Printer,
) -> Result<ProjectExport> {
    let atlases = AtlasTable::from_manifest(manifest);
    let fonts = FontTable::from_manifest(manifest);
    let settle = TimerSettle::from_millis(manifest.settle_ms);
    let exporter = Exporter::new(ExportOptions::from_manifest(manifest), &atlases, &fonts, &settle);

    let mut project = ProjectExport::default();
    for loaded in documents.iter_mut() {
        let roots = loaded.document.tree.roots().to_vec();
        let batch = exporter.export_batch(&mut loaded.document.tree, &roots).await?;

        for failure in &batch.failures {
            printer.error(
                "Failed",
                &format!("{} root '{}': {}", display_path(&loaded.path), failure.root, failure.error),
            );
        }
        project.failures += batch.failures.len();

        for scene in batch.scenes {
            printer.status(
                "Exporting",
                &format!("{} {}", scene.name, printer.dim(&format!("({})", plural(scene.nodes.len(), "node", "nodes")))),
            );
            project.scenes.push(scene);
        }
    }

    Ok(project)
}

fn write_scenes(scenes: &[ExportedScene], settings: &GuiSettings, output: &Path, printer: &Printer) -> Result<()> {
    fs::create_dir_all(output).map_err(|e| GuiportError::Io {
        path: output.to_path_buf(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    for scene in scenes {
        let path = output.join(format!("{}.gui", scene.name));
        fs::write(&path, render_gui(scene, settings)).map_err(|e| GuiportError::Io {
            path: path.clone(),
            message: format!("Failed to write scene: {}", e),
        })?;
        printer.info("Wrote", &printer.cyan(&display_path(&path)));
    }

    Ok(())
}

/// Merge every scene's traversal warnings into one result.
pub fn scene_diagnostics(scenes: &[ExportedScene]) -> ValidationResult {
    let mut result = ValidationResult::new();
    for scene in scenes {
        result.merge(scene.diagnostics.clone());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HUD: &str = r#"{
  "roots": [
    { "id": "1", "name": "hud", "type": "box", "width": 960, "height": 640,
      "children": [
        { "id": "2", "name": "score", "type": "text", "x": 20, "y": 20, "width": 200, "height": 40,
          "text": { "characters": "0", "font_family": "Roboto", "font_size": 40 } }
      ] }
  ]
}"#;

    #[test]
    fn test_export_writes_scene_files() {
        let dir = tempdir().unwrap();
        let design = dir.path().join("hud.design.json");
        fs::write(&design, HUD).unwrap();
        let out = dir.path().join("gui");

        let args = ExportArgs {
            paths: vec![design],
            output: Some(out.clone()),
            stdout: false,
            expand_templates: false,
        };
        run(args, &Printer::plain()).unwrap();

        let text = fs::read_to_string(out.join("hud.gui")).unwrap();
        assert!(text.contains("id: \"score\""));
        assert!(text.contains("type: TYPE_TEXT"));
        assert!(text.contains("font: \"system_font\""));
    }

    #[test]
    fn test_broken_file_fails_after_exporting_the_rest() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("hud.design.json");
        let bad = dir.path().join("bad.design.json");
        fs::write(&good, HUD).unwrap();
        fs::write(&bad, "{").unwrap();
        let out = dir.path().join("gui");

        let args = ExportArgs {
            paths: vec![bad, good],
            output: Some(out.clone()),
            stdout: false,
            expand_templates: false,
        };

        assert!(run(args, &Printer::plain()).is_err());
        assert!(out.join("hud.gui").exists());
    }
}
