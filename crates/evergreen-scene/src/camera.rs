//! Camera controls and orbit navigation

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use evergreen_core::{glam, FrameCounter, OrbitController, PointerButton};

use crate::TreeScene;

/// Pixel-unit wheel deltas per line of scrolling
const PIXELS_PER_SCROLL_LINE: f32 = 100.0;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Orbit controller state for the main camera
#[derive(Debug, Clone, Resource, Deref, DerefMut)]
pub struct OrbitCamera(pub OrbitController);

/// Frames rendered since startup
#[derive(Debug, Clone, Default, Resource, Deref, DerefMut)]
pub struct SceneFrames(pub FrameCounter);

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneFrames>()
            .add_systems(PreStartup, init_orbit_camera)
            .add_systems(Update, update_orbit_camera);
    }
}

fn init_orbit_camera(mut commands: Commands, scene: Res<TreeScene>) {
    let camera = &scene.camera;
    let controller = OrbitController::new(camera.eye, camera.target, &scene.controls);
    commands.insert_resource(OrbitCamera(controller));
}

const BUTTONS: [(MouseButton, PointerButton); 3] = [
    (MouseButton::Left, PointerButton::Primary),
    (MouseButton::Middle, PointerButton::Middle),
    (MouseButton::Right, PointerButton::Secondary),
];

/// Per-frame hook: feed accumulated pointer input to the orbit controller
/// and move the camera to the resulting pose
fn update_orbit_camera(
    mut orbit: ResMut<OrbitCamera>,
    mut frames: ResMut<SceneFrames>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
) {
    let tick = frames.advance(time.delta());

    let viewport_height = windows.single().map(|w| w.height()).unwrap_or(0.0);
    let motion = glam::Vec2::from_array(mouse_motion.delta.to_array());

    if motion != glam::Vec2::ZERO {
        for (mouse, pointer) in BUTTONS {
            if mouse_button.pressed(mouse) {
                orbit.drag(pointer, motion, viewport_height);
            }
        }
    }

    if mouse_scroll.delta.y != 0.0 {
        let lines = match mouse_scroll.unit {
            MouseScrollUnit::Line => mouse_scroll.delta.y,
            MouseScrollUnit::Pixel => mouse_scroll.delta.y / PIXELS_PER_SCROLL_LINE,
        };
        orbit.scroll(lines);
    }

    let pose = orbit.update();

    if let Ok(mut transform) = camera_query.single_mut() {
        let eye = Vec3::from_array(pose.eye.to_array());
        let target = Vec3::from_array(pose.target.to_array());
        if transform.translation != eye {
            tracing::trace!(frame = tick.frame, ?eye, "Camera moved");
        }
        *transform = Transform::from_translation(eye).looking_at(target, Vec3::Y);
    }
}
