//! End-to-end export of a small project.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};

use guiport::cli::export::export_project;
use guiport::output::Printer;
use guiport::{discover, render_gui, validate_project, GuiSettings};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// A project directory holding the fixture manifest and menu document.
fn project() -> TempDir {
    let dir = tempdir().unwrap();
    fs::copy(fixture("guiport.yaml"), dir.path().join("guiport.yaml")).unwrap();
    fs::create_dir_all(dir.path().join("design")).unwrap();
    fs::copy(
        fixture("main_menu.design.yaml"),
        dir.path().join("design/main_menu.design.yaml"),
    )
    .unwrap();
    dir
}

fn export(root: &Path) -> Vec<(String, String)> {
    let discovery = discover(root).unwrap();
    let project = export_project(&discovery, &discovery.manifest, &Printer::plain()).unwrap();
    assert_eq!(project.failures, 0);

    let validation = validate_project(&discovery.manifest, &project.scenes);
    assert!(!validation.has_errors(), "{:?}", validation);

    let settings = GuiSettings::from_manifest(&discovery.manifest);
    project
        .scenes
        .iter()
        .map(|scene| (scene.name.clone(), render_gui(scene, &settings)))
        .collect()
}

fn position(text: &str, needle: &str) -> usize {
    text.find(needle).unwrap_or_else(|| panic!("missing {needle:?}"))
}

#[test]
fn exports_one_scene_per_root() {
    let dir = project();
    let scenes = export(dir.path());

    let names: Vec<&str> = scenes.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["main_menu", "hud"]);
}

#[test]
fn menu_scene_has_variants_template_and_resources() {
    let dir = project();
    let scenes = export(dir.path());
    let menu = &scenes[0].1;

    assert!(menu.starts_with("script: \"\"\n"));
    assert!(menu.contains("fonts {\n  name: \"roboto\"\n  font: \"/assets/fonts/roboto.font\"\n}\n"));
    assert!(menu.contains("textures {\n  name: \"ui\"\n  texture: \"/assets/ui.atlas\"\n}\n"));
    assert!(menu.contains("texture: \"ui/button_bg\""));
    assert!(menu.contains("type: TYPE_TEMPLATE"));
    assert!(menu.contains("template: \"/gui/templates/settings_dialog.gui\""));
    assert!(menu.ends_with("max_nodes: 512\n"));

    // Skipped containers leave no node behind but prefix their children's
    // ids, and template children are not inlined.
    assert!(!menu.contains("id: \"_buttons\""));
    assert!(!menu.contains("\"close\""));

    let idle = position(menu, "id: \"buttons_play_idle\"");
    let idle_label = position(menu, "id: \"buttons_label_idle\"");
    let pressed = position(menu, "id: \"buttons_play_pressed\"");
    let pressed_label = position(menu, "id: \"buttons_label_pressed\"");
    assert!(idle < idle_label && idle_label < pressed && pressed < pressed_label);
    assert!(menu.contains("parent: \"buttons_play_pressed\""));
}

#[test]
fn expanded_templates_inline_children() {
    let dir = project();
    let manifest = fs::read_to_string(dir.path().join("guiport.yaml")).unwrap();
    fs::write(
        dir.path().join("guiport.yaml"),
        format!("{manifest}expand_templates: true\n"),
    )
    .unwrap();

    let scenes = export(dir.path());
    let menu = &scenes[0].1;

    assert!(menu.contains("id: \"settings_dialog/close\""));
    assert!(menu.contains("template_node_child: true"));
    assert!(menu.contains("texture: \"ui/close_icon\""));
}

#[test]
fn export_command_writes_gui_files() {
    let dir = project();
    let out = dir.path().join("out");

    let args = guiport::cli::export::ExportArgs {
        paths: vec![dir.path().join("design")],
        output: Some(out.clone()),
        stdout: false,
        expand_templates: false,
    };
    guiport::cli::export::run(args, &Printer::plain()).unwrap();

    assert!(out.join("main_menu.gui").exists());
    let hud = fs::read_to_string(out.join("hud.gui")).unwrap();
    assert!(hud.contains("id: \"score\""));
    assert!(hud.contains("pivot: PIVOT_W"));
}
