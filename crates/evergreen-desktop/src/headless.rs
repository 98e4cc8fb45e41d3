//! Windowless run: drive the frame loop and camera controls without a GPU

use evergreen_core::{
    CameraPose, FixedStepClock, FrameLoop, LoopSummary, OrbitController, ResizeHandler,
    ResizeOutcome, SceneDescription, Viewport,
};
use serde::Serialize;
use std::ops::ControlFlow;

/// Viewport the headless run pretends to render into
const HEADLESS_VIEWPORT: Viewport = Viewport::new(1280.0, 720.0);

const FRAMES_PER_SECOND: u32 = 60;

#[derive(Debug, Serialize)]
pub struct HeadlessReport {
    #[serde(rename = "loop")]
    pub summary: LoopSummary,
    pub camera: CameraPose,
    pub aspect: f32,
}

/// Run `frames` frames of the per-frame hook at a fixed 60 Hz step
pub fn run(scene: &SceneDescription, frames: u64) -> HeadlessReport {
    let mut orbit = OrbitController::new(scene.camera.eye, scene.camera.target, &scene.controls);

    let mut resize = ResizeHandler::new(Viewport::new(0.0, 0.0));
    let aspect = match resize.apply(HEADLESS_VIEWPORT.width, HEADLESS_VIEWPORT.height) {
        ResizeOutcome::Applied(update) => update.camera_aspect,
        ResizeOutcome::Ignored => resize.current().camera_aspect,
    };

    let mut pose = orbit.pose();
    let summary = FrameLoop::new(FixedStepClock::from_hz(FRAMES_PER_SECOND))
        .with_frame_limit(frames)
        .run(|tick| {
            pose = orbit.update();
            tracing::trace!(frame = tick.frame, eye = ?pose.eye, "Frame");
            ControlFlow::Continue(())
        });

    tracing::info!(
        frames = summary.frames,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "Headless run finished"
    );

    HeadlessReport {
        summary,
        camera: pose,
        aspect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evergreen_core::{SceneConfig, StopReason};
    use std::time::Duration;

    fn stock() -> SceneDescription {
        SceneDescription::build(&SceneConfig::default()).unwrap()
    }

    #[test]
    fn test_runs_requested_frames() {
        let report = run(&stock(), 120);
        assert_eq!(report.summary.frames, 120);
        assert_eq!(report.summary.stopped_by, StopReason::FrameLimit);
        assert!(report.summary.elapsed >= Duration::from_millis(1990));
    }

    #[test]
    fn test_camera_stays_put_without_input() {
        let scene = stock();
        let report = run(&scene, 10);
        assert!(report.camera.eye.distance(scene.camera.eye) < 1e-3);
        assert_eq!(report.camera.target, scene.camera.target);
        assert!((report.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_frames() {
        let report = run(&stock(), 0);
        assert_eq!(report.summary.frames, 0);
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_string(&run(&stock(), 1)).unwrap();
        assert!(json.contains("\"loop\""));
        assert!(json.contains("\"camera\""));
    }
}
