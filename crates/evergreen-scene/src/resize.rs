//! Keep the camera projection in step with the window size
//!
//! Bevy resizes the surface and the bloom targets itself; this keeps the
//! main camera's aspect ratio derived from the same viewport, through the
//! core `ResizeHandler`.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use evergreen_core::{ResizeHandler, ResizeOutcome, Viewport};

use crate::camera::MainCamera;

/// Resize state of the primary window
#[derive(Debug, Clone, Resource, Deref, DerefMut)]
pub struct ViewportState {
    #[deref]
    handler: ResizeHandler,
    /// Size last reported by the window, applied or not
    last_seen: Option<Viewport>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            handler: ResizeHandler::new(Viewport::new(0.0, 0.0)),
            last_seen: None,
        }
    }
}

/// Plugin for window resize handling
pub struct ResizePlugin;

impl Plugin for ResizePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewportState>()
            .add_systems(Update, handle_window_resize);
    }
}

fn handle_window_resize(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut viewport: ResMut<ViewportState>,
    mut cameras: Query<&mut Projection, With<MainCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let (width, height) = (window.width(), window.height());
    let size = Viewport::new(width, height);
    // cursor moves and focus changes also mark the window as changed
    if viewport.last_seen == Some(size) {
        return;
    }
    viewport.last_seen = Some(size);

    match viewport.apply(width, height) {
        ResizeOutcome::Applied(update) => {
            for mut projection in &mut cameras {
                if let Projection::Perspective(perspective) = projection.as_mut() {
                    perspective.aspect_ratio = update.camera_aspect;
                }
            }
            tracing::debug!(width, height, aspect = update.camera_aspect, "Viewport resized");
        }
        ResizeOutcome::Ignored => {
            tracing::debug!(width, height, "Ignoring zero-sized viewport");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(ResizePlugin);

        let mut window = Window::default();
        window.resolution.set(1280.0, 720.0);
        let window = app.world_mut().spawn((window, PrimaryWindow)).id();
        app.world_mut().spawn((
            Projection::Perspective(PerspectiveProjection::default()),
            MainCamera,
        ));
        (app, window)
    }

    fn aspect(app: &mut App) -> f32 {
        let world = app.world_mut();
        let projection = world
            .query_filtered::<&Projection, With<MainCamera>>()
            .single(world)
            .unwrap();
        match projection {
            Projection::Perspective(p) => p.aspect_ratio,
            _ => panic!("expected a perspective projection"),
        }
    }

    fn resize(app: &mut App, window: Entity, width: f32, height: f32) {
        app.world_mut()
            .get_mut::<Window>(window)
            .unwrap()
            .resolution
            .set(width, height);
        app.update();
    }

    #[test]
    fn test_initial_size_sets_aspect() {
        let (mut app, _) = app();
        app.update();
        assert_eq!(aspect(&mut app), 1280.0 / 720.0);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let (mut app, window) = app();
        app.update();

        resize(&mut app, window, 1000.0, 500.0);
        assert_eq!(aspect(&mut app), 2.0);

        resize(&mut app, window, 600.0, 900.0);
        assert_eq!(aspect(&mut app), 600.0 / 900.0);
    }

    #[test]
    fn test_same_size_twice_is_stable() {
        let (mut app, window) = app();
        app.update();

        resize(&mut app, window, 1000.0, 500.0);
        let first = aspect(&mut app);
        resize(&mut app, window, 1000.0, 500.0);
        assert_eq!(aspect(&mut app), first);
        assert_eq!(app.world().resource::<ViewportState>().resize_count(), 2);
    }

    #[test]
    fn test_zero_sized_window_is_ignored_once() {
        let (mut app, window) = app();
        resize(&mut app, window, 0.0, 0.0);

        // unrelated window changes while still minimised
        for _ in 0..3 {
            app.world_mut().get_mut::<Window>(window).unwrap().focused = false;
            app.update();
        }

        let state = app.world().resource::<ViewportState>();
        assert_eq!(state.resize_count(), 0);
        assert_eq!(state.ignored_count(), 1);

        resize(&mut app, window, 800.0, 400.0);
        assert_eq!(aspect(&mut app), 2.0);
        assert_eq!(app.world().resource::<ViewportState>().resize_count(), 1);
    }

    #[test]
    fn test_restore_after_minimise_reapplies() {
        let (mut app, window) = app();
        app.update();
        resize(&mut app, window, 0.0, 0.0);
        resize(&mut app, window, 0.0, 0.0);
        resize(&mut app, window, 1280.0, 720.0);

        let state = app.world().resource::<ViewportState>();
        assert_eq!(state.ignored_count(), 1);
        assert_eq!(state.resize_count(), 2);
    }
}
