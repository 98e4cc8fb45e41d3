//! Viewport size tracking for window resizes
//!
//! On every resize the renderer surface, the post-processing targets, and
//! the camera aspect ratio must all follow the new size. `ResizeHandler`
//! computes those derived quantities in one place.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// A minimised window reports a zero-sized surface
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Sizes the rest of the frame must be brought in line with
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResizeUpdate {
    pub renderer: Viewport,
    pub post_process: Viewport,
    pub camera_aspect: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeOutcome {
    Applied(ResizeUpdate),
    /// Zero-sized viewport; previous sizes are kept
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ResizeHandler {
    current: ResizeUpdate,
    resize_count: u64,
    ignored_count: u64,
}

impl ResizeHandler {
    pub fn new(initial: Viewport) -> Self {
        let aspect = if initial.is_degenerate() { 1.0 } else { initial.aspect_ratio() };
        Self {
            current: ResizeUpdate {
                renderer: initial,
                post_process: initial,
                camera_aspect: aspect,
            },
            resize_count: 0,
            ignored_count: 0,
        }
    }

    /// Recompute derived sizes for a new viewport
    pub fn apply(&mut self, width: f32, height: f32) -> ResizeOutcome {
        let viewport = Viewport::new(width, height);
        if viewport.is_degenerate() {
            self.ignored_count += 1;
            return ResizeOutcome::Ignored;
        }

        self.current = ResizeUpdate {
            renderer: viewport,
            post_process: viewport,
            camera_aspect: viewport.aspect_ratio(),
        };
        self.resize_count += 1;
        ResizeOutcome::Applied(self.current)
    }

    pub fn current(&self) -> &ResizeUpdate {
        &self.current
    }

    pub fn resize_count(&self) -> u64 {
        self.resize_count
    }

    /// Zero-sized viewports passed to `apply`
    pub fn ignored_count(&self) -> u64 {
        self.ignored_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_is_width_over_height() {
        let mut handler = ResizeHandler::new(Viewport::new(800.0, 600.0));

        let ResizeOutcome::Applied(update) = handler.apply(1920.0, 1080.0) else {
            panic!("resize should apply");
        };
        assert_eq!(update.camera_aspect, 1920.0 / 1080.0);
        assert_eq!(update.renderer, Viewport::new(1920.0, 1080.0));
        assert_eq!(update.post_process, update.renderer);
    }

    #[test]
    fn test_repeated_resize_is_idempotent() {
        let mut handler = ResizeHandler::new(Viewport::new(800.0, 600.0));

        let first = handler.apply(1280.0, 720.0);
        let second = handler.apply(1280.0, 720.0);
        assert_eq!(first, second);
        assert_eq!(handler.resize_count(), 2);
        assert_eq!(handler.current().camera_aspect, 1280.0 / 720.0);
    }

    #[test]
    fn test_every_resize_recomputes() {
        let mut handler = ResizeHandler::new(Viewport::new(800.0, 600.0));
        handler.apply(1000.0, 500.0);
        assert_eq!(handler.current().camera_aspect, 2.0);
        handler.apply(500.0, 1000.0);
        assert_eq!(handler.current().camera_aspect, 0.5);
    }

    #[test]
    fn test_zero_size_keeps_previous_aspect() {
        let mut handler = ResizeHandler::new(Viewport::new(1000.0, 500.0));
        assert_eq!(handler.apply(0.0, 0.0), ResizeOutcome::Ignored);
        assert_eq!(handler.current().camera_aspect, 2.0);
        assert_eq!(handler.resize_count(), 0);
        assert_eq!(handler.ignored_count(), 1);
    }
}
