//! Orbit camera math
//!
//! The camera rotates and dollies around a fixed focus point. Input is
//! accumulated between frames and applied once per frame by `update`, so the
//! controller behaves the same whatever the input event rate is.

use glam::{Vec2, Vec3};
use serde::Serialize;
use std::f32::consts::{PI, TAU};

use crate::config::ControlsConfig;

/// Keeps the camera from flipping over the poles
const POLAR_EPSILON: f32 = 1e-6;

/// Dolly steps produced per pixel of vertical drag
const DRAG_DOLLY_STEPS_PER_PIXEL: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitAction {
    Rotate,
    Dolly,
}

/// Which drag gesture each pointer button performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseBindings {
    pub primary: Option<OrbitAction>,
    pub middle: Option<OrbitAction>,
    pub secondary: Option<OrbitAction>,
}

impl Default for MouseBindings {
    fn default() -> Self {
        Self {
            primary: Some(OrbitAction::Rotate),
            middle: Some(OrbitAction::Dolly),
            // right-drag is disabled
            secondary: None,
        }
    }
}

impl MouseBindings {
    pub fn action(&self, button: PointerButton) -> Option<OrbitAction> {
        match button {
            PointerButton::Primary => self.primary,
            PointerButton::Middle => self.middle,
            PointerButton::Secondary => self.secondary,
        }
    }
}

/// Camera placement produced by the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone)]
pub struct OrbitController {
    target: Vec3,
    radius: f32,
    /// Azimuth around +Y, measured from +Z towards +X
    theta: f32,
    /// Polar angle from +Y
    phi: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    bindings: MouseBindings,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
}

impl OrbitController {
    pub fn new(eye: Vec3, target: Vec3, controls: &ControlsConfig) -> Self {
        let offset = eye - target;
        let radius = offset.length();
        let theta = offset.x.atan2(offset.z);
        let phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };

        Self {
            target,
            radius,
            theta,
            phi,
            rotate_speed: controls.rotate_speed,
            zoom_speed: controls.zoom_speed,
            min_distance: controls.min_distance,
            max_distance: controls.max_distance,
            bindings: MouseBindings::default(),
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
        }
    }

    pub fn bindings(&self) -> &MouseBindings {
        &self.bindings
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    /// Route a drag to whatever the button is bound to; returns false if unbound
    pub fn drag(&mut self, button: PointerButton, delta: Vec2, viewport_height: f32) -> bool {
        match self.bindings.action(button) {
            Some(OrbitAction::Rotate) => {
                self.rotate(delta, viewport_height);
                true
            }
            Some(OrbitAction::Dolly) => {
                self.dolly(delta.y * DRAG_DOLLY_STEPS_PER_PIXEL);
                true
            }
            None => false,
        }
    }

    /// Dragging the full viewport height turns the camera once around
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.pending_theta -= TAU * delta.x / viewport_height * self.rotate_speed;
        self.pending_phi -= TAU * delta.y / viewport_height * self.rotate_speed;
    }

    /// Positive steps move away from the target, negative steps move closer
    pub fn dolly(&mut self, steps: f32) {
        let step_scale = 0.95f32.powf(self.zoom_speed);
        self.pending_scale *= step_scale.powf(-steps);
    }

    /// Wheel scrolling: scrolling up (positive) zooms in
    pub fn scroll(&mut self, lines: f32) {
        self.dolly(-lines);
    }

    /// Apply input accumulated since the last frame
    pub fn update(&mut self) -> CameraPose {
        self.theta = (self.theta + self.pending_theta).rem_euclid(TAU);
        self.phi = (self.phi + self.pending_phi).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.radius = (self.radius * self.pending_scale).clamp(self.min_distance, self.max_distance);

        self.pending_theta = 0.0;
        self.pending_phi = 0.0;
        self.pending_scale = 1.0;

        self.pose()
    }

    pub fn pose(&self) -> CameraPose {
        let sin_phi = self.phi.sin();
        let offset = Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        );
        CameraPose {
            eye: self.target + offset,
            target: self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> OrbitController {
        OrbitController::new(
            Vec3::new(10.0, 10.0, 20.0),
            Vec3::new(0.0, 5.0, 0.0),
            &ControlsConfig::default(),
        )
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn test_initial_pose_matches_eye() {
        let mut orbit = controller();
        assert!(close(orbit.pose().eye, Vec3::new(10.0, 10.0, 20.0)));
        assert!(close(orbit.update().eye, Vec3::new(10.0, 10.0, 20.0)));
        assert_eq!(orbit.target(), Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_rotation_keeps_distance() {
        let mut orbit = controller();
        let before = orbit.distance();

        orbit.drag(PointerButton::Primary, Vec2::new(120.0, -40.0), 800.0);
        let pose = orbit.update();

        assert!(!close(pose.eye, Vec3::new(10.0, 10.0, 20.0)));
        assert!((pose.eye.distance(pose.target) - before).abs() < 1e-3);
    }

    #[test]
    fn test_full_height_drag_is_full_turn() {
        let mut orbit = controller();
        orbit.rotate(Vec2::new(600.0, 0.0), 600.0);
        assert!(close(orbit.update().eye, Vec3::new(10.0, 10.0, 20.0)));
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut orbit = controller();
        orbit.rotate(Vec2::new(0.0, 10_000.0), 100.0);
        let pose = orbit.update();

        let offset = pose.eye - pose.target;
        assert!(offset.y <= orbit.distance());
        assert!(offset.y > orbit.distance() - 1e-3);
    }

    #[test]
    fn test_scroll_and_dolly() {
        let mut orbit = controller();
        let start = orbit.distance();

        orbit.scroll(1.0);
        orbit.update();
        assert!((orbit.distance() - start * 0.95).abs() < 1e-3);

        orbit.drag(PointerButton::Middle, Vec2::new(0.0, 10.0), 600.0);
        orbit.update();
        assert!((orbit.distance() - start).abs() < 1e-3);
    }

    #[test]
    fn test_distance_limits() {
        let mut orbit = controller();
        orbit.scroll(500.0);
        orbit.update();
        assert_eq!(orbit.distance(), ControlsConfig::default().min_distance);

        orbit.dolly(500.0);
        orbit.update();
        assert_eq!(orbit.distance(), ControlsConfig::default().max_distance);
    }

    #[test]
    fn test_secondary_drag_is_disabled() {
        let mut orbit = controller();
        assert_eq!(orbit.bindings().action(PointerButton::Secondary), None);
        assert!(!orbit.drag(PointerButton::Secondary, Vec2::new(300.0, 300.0), 600.0));
        assert!(close(orbit.update().eye, Vec3::new(10.0, 10.0, 20.0)));
    }
}
