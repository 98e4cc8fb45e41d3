//! Evergreen Scene - Bevy rendering of the tree scene
//!
//! This crate turns an `evergreen_core::SceneDescription` into Bevy entities
//! and keeps the camera in step with pointer input and window size. It is
//! shared by the browser build (evergreen-web) and the native binary
//! (evergreen-desktop).

pub mod camera;
pub mod lighting;
pub mod mesh;
pub mod resize;
pub mod scene;

use bevy::prelude::*;
use evergreen_core::SceneDescription;

/// The scene every system works from; inserted once and never replaced
#[derive(Debug, Clone, Resource, Deref)]
pub struct TreeScene(pub SceneDescription);

/// Plugin that sets up the whole tree scene
pub struct EvergreenScenePlugin {
    scene: SceneDescription,
}

impl EvergreenScenePlugin {
    pub fn new(scene: SceneDescription) -> Self {
        Self { scene }
    }
}

impl Plugin for EvergreenScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(TreeScene(self.scene.clone()))
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(resize::ResizePlugin);
    }
}

pub use camera::{MainCamera, OrbitCamera};
pub use scene::{Foliage, StarOrnament};
