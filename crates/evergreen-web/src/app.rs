//! Bevy application setup

use bevy::prelude::*;
use evergreen_core::{SceneConfig, SceneDescription};
use evergreen_scene::EvergreenScenePlugin;

use crate::host;

/// Canvas element the renderer attaches to
pub const CANVAS_ID: &str = "evergreen-canvas";

/// Scene configuration baked into the module at build time
const EMBEDDED_CONFIG: &str = include_str!("../../../evergreen.toml");

/// Build the scene from TOML text, falling back to the stock scene when
/// the text does not parse or validate.
///
/// Returns `None` only if no scene can be built at all.
pub fn scene_from_toml(text: &str) -> Option<SceneDescription> {
    let config = match SceneConfig::from_toml(text) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid embedded config, using defaults: {}", e);
            SceneConfig::default()
        }
    };

    match SceneDescription::build(&config) {
        Ok(scene) => Some(scene),
        Err(e) => {
            tracing::error!("Failed to build scene from embedded config, using defaults: {}", e);
            SceneDescription::build(&SceneConfig::default())
                .map_err(|e| tracing::error!("Failed to build default scene: {}", e))
                .ok()
        }
    }
}

pub fn run() {
    let Some(scene) = scene_from_toml(EMBEDDED_CONFIG) else {
        return;
    };

    if let Err(e) = host::ensure_canvas(CANVAS_ID) {
        tracing::error!("Failed to prepare canvas: {:?}", e);
        return;
    }

    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Evergreen".to_string(),
                canvas: Some(format!("#{CANVAS_ID}")),
                fit_canvas_to_parent: true,
                // Keep middle-click autoscroll and the context menu off the canvas
                prevent_default_event_handling: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EvergreenScenePlugin::new(scene))
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_builds() {
        let scene = scene_from_toml(EMBEDDED_CONFIG).unwrap();
        assert_eq!(scene.foliage.len(), 3);
        assert!(scene.pipeline.bloom().is_some());
    }

    #[test]
    fn test_bad_config_falls_back_to_defaults() {
        let scene = scene_from_toml("tree = \"tall\"").unwrap();
        let stock = SceneDescription::build(&SceneConfig::default()).unwrap();
        assert_eq!(scene.tree_top, stock.tree_top);
        assert_eq!(scene.star.translation, stock.star.translation);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let scene = scene_from_toml("[tree]\nlevels = 1\n").unwrap();
        assert_eq!(scene.foliage.len(), 3);
    }

    #[test]
    fn test_non_finite_values_fall_back_to_defaults() {
        let stock = SceneDescription::build(&SceneConfig::default()).unwrap();
        for text in ["[star]\nsize = nan\n", "[ground]\nsize = nan\n", "[tree]\ntrunk_height = inf\n"] {
            let scene = scene_from_toml(text).unwrap();
            assert_eq!(scene, stock, "{text:?} did not fall back");
        }
    }
}
