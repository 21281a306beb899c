//! Validation checks for a project and its exported scenes.
//!
//! Each check returns a `ValidationResult`.

use std::collections::HashMap;

use crate::discovery::Manifest;
use crate::export::ExportedScene;
use crate::render::atlas_footprint;
use crate::types::SceneKind;

use super::diagnostic::{Diagnostic, Measure, Subject, ValidationResult};

/// Check that every atlas packs within its `max_size`.
pub fn check_atlas_sizes(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (name, atlas) in &manifest.atlases {
        let footprint = atlas_footprint(atlas);
        if !footprint.fits(atlas.max_size) {
            result.push(
                Diagnostic::error(
                    "guiport::validate::atlas-size",
                    format!(
                        "Atlas '{}' packs to {}x{} which exceeds the limit of {}x{}",
                        name, footprint.width, footprint.height, atlas.max_size, atlas.max_size
                    ),
                )
                .with_help("Raise max_size, shrink the sprites or split the atlas")
                .about(Subject::Atlas(name.clone()))
                .exceeding(
                    Measure::Extent {
                        width: footprint.width,
                        height: footprint.height,
                    },
                    Measure::Extent {
                        width: atlas.max_size,
                        height: atlas.max_size,
                    },
                ),
            );
        }
    }

    result
}

/// Check that every atlas and font in the manifest names a resource.
pub fn check_resource_paths(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (name, atlas) in &manifest.atlases {
        if atlas.path.trim().is_empty() {
            result.push(
                Diagnostic::error(
                    "guiport::validate::missing-texture",
                    format!("Atlas '{}' has no resource path", name),
                )
                .with_help("Set 'path' to the project path of the .atlas file")
                .about(Subject::Atlas(name.clone())),
            );
        }
        if atlas.sprites.is_empty() {
            result.push(
                Diagnostic::warning(
                    "guiport::validate::empty-atlas",
                    format!("Atlas '{}' lists no sprites", name),
                )
                .about(Subject::Atlas(name.clone())),
            );
        }
    }

    for (family, path) in &manifest.fonts {
        if path.trim().is_empty() {
            result.push(
                Diagnostic::error(
                    "guiport::validate::missing-font",
                    format!("Font family '{}' has no resource path", family),
                )
                .with_help("Set the family to the project path of a .font file")
                .about(Subject::Font(family.clone())),
            );
        }
    }

    result
}

/// Check that scenes reference only resources they declare.
pub fn check_scene_resources(scene: &ExportedScene) -> ValidationResult {
    let mut result = ValidationResult::new();

    for node in &scene.nodes {
        match &node.kind {
            SceneKind::Box(visual) => {
                if let Some(texture) = &visual.texture {
                    if !scene.textures.contains_key(&texture.atlas) {
                        result.push(
                            Diagnostic::error(
                                "guiport::validate::missing-texture",
                                format!(
                                    "Scene '{}': node '{}' uses atlas '{}' which the scene does not declare",
                                    scene.name, node.id, texture.atlas
                                ),
                            )
                            .about(node_subject(scene, &node.id)),
                        );
                    }
                }
            }
            SceneKind::Text(visual) => {
                if !scene.fonts.contains_key(&visual.font) {
                    result.push(
                        Diagnostic::error(
                            "guiport::validate::missing-font",
                            format!(
                                "Scene '{}': node '{}' uses font '{}' which the scene does not declare",
                                scene.name, node.id, visual.font
                            ),
                        )
                        .about(node_subject(scene, &node.id)),
                    );
                }
            }
            SceneKind::Template(_) => {}
        }
    }

    result
}

fn node_subject(scene: &ExportedScene, id: &str) -> Subject {
    Subject::Node {
        scene: scene.name.clone(),
        id: id.to_string(),
    }
}

/// Check scenes against the node budget.
pub fn check_node_counts(scenes: &[ExportedScene], max_nodes: u32) -> ValidationResult {
    let mut result = ValidationResult::new();

    for scene in scenes {
        let count = scene.nodes.len();
        if count > max_nodes as usize {
            result.push(
                Diagnostic::error(
                    "guiport::validate::max-nodes",
                    format!(
                        "Scene '{}' has {} nodes which exceeds max_nodes of {}",
                        scene.name, count, max_nodes
                    ),
                )
                .with_help("Raise max_nodes in guiport.yaml or split the screen")
                .about(Subject::Scene(scene.name.clone()))
                .exceeding(Measure::Count(count), Measure::Count(max_nodes as usize)),
            );
        }
    }

    result
}

/// Check that no two scenes would be written to the same file.
pub fn check_scene_names(scenes: &[ExportedScene]) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for scene in scenes {
        *seen.entry(scene.name.as_str()).or_default() += 1;
    }

    let mut duplicates: Vec<_> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort();
    for (name, count) in duplicates {
        result.push(
            Diagnostic::error(
                "guiport::validate::duplicate-scene",
                format!("{} roots export to the same scene name '{}'", count, name),
            )
            .with_help("Rename the root frames so each scene gets its own file")
            .about(Subject::Scene(name.to_string())),
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::AtlasConfig;
    use crate::types::{SceneNode, TextureRef};
    use crate::validation::ValidationResult;
    use std::collections::BTreeMap;

    fn scene(name: &str, nodes: Vec<SceneNode>) -> ExportedScene {
        ExportedScene {
            name: name.to_string(),
            nodes,
            textures: BTreeMap::new(),
            fonts: BTreeMap::new(),
            layers: Vec::new(),
            diagnostics: ValidationResult::new(),
        }
    }

    #[test]
    fn test_atlas_size_reports_measured_and_limit() {
        let mut atlas = AtlasConfig {
            path: "/assets/big.atlas".to_string(),
            max_size: 256,
            padding: 0,
            ..Default::default()
        };
        atlas.sprites.insert("bg".to_string(), [300, 100]);
        let mut manifest = Manifest::default();
        manifest.atlases.insert("big".to_string(), atlas);

        let result = check_atlas_sizes(&manifest);

        assert_eq!(result.error_count(), 1);
        let d = result.iter().next().unwrap();
        assert_eq!(d.code, "guiport::validate::atlas-size");
        assert_eq!(d.subject, Some(Subject::Atlas("big".to_string())));
        let excess = d.excess.unwrap();
        assert_eq!(excess.measured, Measure::Extent { width: 512, height: 100 });
        assert_eq!(excess.limit, Measure::Extent { width: 256, height: 256 });
        assert!(d.message.contains("512x100"));
    }

    #[test]
    fn test_atlas_within_limit_passes() {
        let mut atlas = AtlasConfig {
            path: "/assets/ui.atlas".to_string(),
            ..Default::default()
        };
        atlas.sprites.insert("button".to_string(), [200, 80]);
        let mut manifest = Manifest::default();
        manifest.atlases.insert("ui".to_string(), atlas);

        assert!(check_atlas_sizes(&manifest).is_ok());
        assert!(check_resource_paths(&manifest).is_ok());
    }

    #[test]
    fn test_resource_paths() {
        let mut manifest = Manifest::default();
        manifest.atlases.insert("ui".to_string(), AtlasConfig::default());
        manifest.fonts.insert("Roboto".to_string(), String::new());

        let result = check_resource_paths(&manifest);

        assert_eq!(result.error_count(), 2);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_scene_missing_atlas() {
        let mut node = SceneNode::new_box("icon");
        if let Some(visual) = node.as_box_mut() {
            visual.texture = Some(TextureRef::new("ui", "star"));
        }

        let result = check_scene_resources(&scene("hud", vec![node]));
        assert!(result.has_errors());
        let icon = Subject::Node {
            scene: "hud".to_string(),
            id: "icon".to_string(),
        };
        assert_eq!(result.about(&icon).count(), 1);
    }

    #[test]
    fn test_node_counts_and_names() {
        let scenes = vec![
            scene("hud", vec![SceneNode::new_box("a"), SceneNode::new_box("b")]),
            scene("hud", vec![SceneNode::new_box("a")]),
        ];

        let counts = check_node_counts(&scenes, 1);
        assert_eq!(counts.error_count(), 1);
        let d = counts.iter().next().unwrap();
        assert_eq!(d.subject, Some(Subject::Scene("hud".to_string())));
        assert_eq!(d.context().as_deref(), Some("scene 'hud': 2 over a limit of 1"));
        assert!(check_node_counts(&scenes, 2).is_ok());
        assert_eq!(check_scene_names(&scenes).error_count(), 1);
    }
}
