//! Evergreen Core - Renderer-independent scene model
//!
//! This crate holds everything about the tree scene that can be computed
//! without a GPU:
//! - Scene configuration (TOML) with defaults for the stock scene
//! - Star outline generation and beveled extrusion
//! - Foliage stacking and star placement
//! - The assembled scene description and post-processing chain
//! - Orbit camera math, resize handling, and the frame loop

pub mod config;
pub mod frame_loop;
pub mod layout;
pub mod orbit;
pub mod pipeline;
pub mod scene;
pub mod star;
pub mod viewport;

pub use glam;

pub use config::{load_config, ConfigError, Rgb, SceneConfig};
pub use frame_loop::{FixedStepClock, FrameClock, FrameCounter, FrameLoop, FrameTick, LoopSummary, StopReason};
pub use layout::{foliage_layout, star_height, FoliageLayout, FoliageLevel};
pub use orbit::{CameraPose, MouseBindings, OrbitAction, OrbitController, PointerButton};
pub use pipeline::{BloomSettings, PostStage, RenderPipeline};
pub use scene::{MaterialSpec, MeshNode, SceneDescription, ShadowFlags, Shape};
pub use star::{extrude, pentagram_path, star_mesh, ExtrudeSettings, GeometryError, MeshData, Path2d, PathCommand};
pub use viewport::{ResizeHandler, ResizeOutcome, ResizeUpdate, Viewport};
