//! Validation of a guiport project.
//!
//! Runs a suite of checks against the manifest and the exported scenes and
//! reports errors and warnings. Used by both `guiport validate` and
//! `guiport export`.

mod checks;
mod diagnostic;

pub use checks::{
    check_atlas_sizes, check_node_counts, check_resource_paths, check_scene_names,
    check_scene_resources,
};
pub use diagnostic::{Diagnostic, Excess, Measure, Severity, Subject, ValidationResult};

use crate::discovery::Manifest;
use crate::export::ExportedScene;

/// Run all validation checks.
pub fn validate_project(manifest: &Manifest, scenes: &[ExportedScene]) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_atlas_sizes(manifest));
    result.merge(checks::check_resource_paths(manifest));
    for scene in scenes {
        result.merge(checks::check_scene_resources(scene));
    }
    result.merge(checks::check_node_counts(scenes, manifest.max_nodes));
    result.merge(checks::check_scene_names(scenes));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::AtlasConfig;

    #[test]
    fn test_validate_empty_project() {
        let result = validate_project(&Manifest::default(), &[]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_catches_oversized_atlas() {
        let mut atlas = AtlasConfig {
            path: "/assets/ui.atlas".to_string(),
            max_size: 64,
            ..Default::default()
        };
        atlas.sprites.insert("bg".to_string(), [128, 128]);
        let mut manifest = Manifest::default();
        manifest.atlases.insert("ui".to_string(), atlas);

        let result = validate_project(&manifest, &[]);
        assert!(result.has_errors());
    }
}
