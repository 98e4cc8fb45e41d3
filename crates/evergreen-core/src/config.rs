//! Scene configuration loading and validation
//!
//! Every field has a default matching the stock scene, so an empty TOML
//! document (or no file at all) yields the canonical tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Upper bound on stacked foliage cones
pub const MAX_TREE_LEVELS: u32 = 64;

/// Upper bound on radial segments of the trunk and cones
pub const MAX_SEGMENTS: u32 = 1024;

pub const MAX_BEVEL_SEGMENTS: u32 = 32;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// An sRGB color stored as `0xRRGGBB`, written as `"#RRGGBB"` in TOML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xffffff);

    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return Err(ConfigError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    }

    /// Channels as `[r, g, b]` in `0.0..=1.0` (still sRGB encoded)
    pub fn to_srgb_f32(self) -> [f32; 3] {
        let r = (self.0 >> 16) & 0xff;
        let g = (self.0 >> 8) & 0xff;
        let b = self.0 & 0xff;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub lights: LightsConfig,
    #[serde(default)]
    pub ground: GroundConfig,
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub star: StarConfig,
    #[serde(default)]
    pub bloom: BloomConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Orbit focus point; the camera looks here at startup
    #[serde(default = "default_camera_target")]
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            position: default_camera_position(),
            target: default_camera_target(),
        }
    }
}

fn default_fov() -> f32 {
    45.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_camera_position() -> [f32; 3] {
    [10.0, 10.0, 20.0]
}

fn default_camera_target() -> [f32; 3] {
    [0.0, 5.0, 0.0]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsConfig {
    #[serde(default = "default_speed")]
    pub rotate_speed: f32,
    #[serde(default = "default_speed")]
    pub zoom_speed: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            rotate_speed: default_speed(),
            zoom_speed: default_speed(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
        }
    }
}

fn default_speed() -> f32 {
    1.0
}

fn default_min_distance() -> f32 {
    1.0
}

fn default_max_distance() -> f32 {
    200.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightsConfig {
    #[serde(default)]
    pub ambient: AmbientConfig,
    #[serde(default)]
    pub spot: SpotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientConfig {
    #[serde(default = "default_white")]
    pub color: Rgb,
    #[serde(default = "default_ambient_intensity")]
    pub intensity: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            color: default_white(),
            intensity: default_ambient_intensity(),
        }
    }
}

fn default_white() -> Rgb {
    Rgb::WHITE
}

fn default_ambient_intensity() -> f32 {
    0.01
}

/// Spot light parameters, fixed at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotConfig {
    #[serde(default = "default_white")]
    pub color: Rgb,
    /// Luminous intensity in candela
    #[serde(default = "default_spot_intensity")]
    pub intensity: f32,
    #[serde(default = "default_spot_position")]
    pub position: [f32; 3],
    /// Half-angle of the outer cone in degrees
    #[serde(default = "default_spot_angle")]
    pub angle_degrees: f32,
    /// Fraction of the cone that is attenuated at the edge (0 = hard edge)
    #[serde(default = "default_penumbra")]
    pub penumbra: f32,
    #[serde(default = "default_decay")]
    pub decay: f32,
    /// Maximum reach of the light
    #[serde(default = "default_spot_distance")]
    pub distance: f32,
    #[serde(default = "default_shadow_map_size")]
    pub shadow_map_size: u32,
    #[serde(default = "default_shadow_near")]
    pub shadow_near: f32,
}

impl Default for SpotConfig {
    fn default() -> Self {
        Self {
            color: default_white(),
            intensity: default_spot_intensity(),
            position: default_spot_position(),
            angle_degrees: default_spot_angle(),
            penumbra: default_penumbra(),
            decay: default_decay(),
            distance: default_spot_distance(),
            shadow_map_size: default_shadow_map_size(),
            shadow_near: default_shadow_near(),
        }
    }
}

fn default_spot_intensity() -> f32 {
    100.0
}

fn default_spot_position() -> [f32; 3] {
    [5.0, 20.0, 5.0]
}

fn default_spot_angle() -> f32 {
    15.0 // π/12
}

fn default_penumbra() -> f32 {
    0.5
}

fn default_decay() -> f32 {
    2.0
}

fn default_spot_distance() -> f32 {
    400.0
}

fn default_shadow_map_size() -> u32 {
    4096
}

fn default_shadow_near() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundConfig {
    /// Edge length of the square ground plane
    #[serde(default = "default_ground_size")]
    pub size: f32,
    #[serde(default = "default_white")]
    pub color: Rgb,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: default_ground_size(),
            color: default_white(),
        }
    }
}

fn default_ground_size() -> f32 {
    50.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Number of stacked foliage cones
    #[serde(default = "default_levels")]
    pub levels: u32,
    #[serde(default = "default_trunk_radius")]
    pub trunk_radius: f32,
    #[serde(default = "default_trunk_height")]
    pub trunk_height: f32,
    #[serde(default = "default_trunk_segments")]
    pub trunk_segments: u32,
    #[serde(default = "default_cone_segments")]
    pub cone_segments: u32,
    #[serde(default = "default_trunk_color")]
    pub trunk_color: Rgb,
    #[serde(default = "default_foliage_color")]
    pub foliage_color: Rgb,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            levels: default_levels(),
            trunk_radius: default_trunk_radius(),
            trunk_height: default_trunk_height(),
            trunk_segments: default_trunk_segments(),
            cone_segments: default_cone_segments(),
            trunk_color: default_trunk_color(),
            foliage_color: default_foliage_color(),
        }
    }
}

fn default_levels() -> u32 {
    3
}

fn default_trunk_radius() -> f32 {
    0.5
}

fn default_trunk_height() -> f32 {
    3.0
}

fn default_trunk_segments() -> u32 {
    16
}

fn default_cone_segments() -> u32 {
    128
}

fn default_trunk_color() -> Rgb {
    Rgb(0x8b4513)
}

fn default_foliage_color() -> Rgb {
    Rgb(0x04ab04)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarConfig {
    /// Outer radius of the pentagram
    #[serde(default = "default_star_size")]
    pub size: f32,
    #[serde(default = "default_star_depth")]
    pub depth: f32,
    #[serde(default = "default_star_bevel")]
    pub bevel_thickness: f32,
    #[serde(default = "default_star_bevel")]
    pub bevel_size: f32,
    #[serde(default = "default_bevel_segments")]
    pub bevel_segments: u32,
    /// Height of the star above the topmost foliage level
    #[serde(default = "default_star_offset")]
    pub offset: f32,
    #[serde(default = "default_star_color")]
    pub color: Rgb,
    #[serde(default = "default_star_color")]
    pub emissive: Rgb,
    #[serde(default = "default_emissive_intensity")]
    pub emissive_intensity: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            size: default_star_size(),
            depth: default_star_depth(),
            bevel_thickness: default_star_bevel(),
            bevel_size: default_star_bevel(),
            bevel_segments: default_bevel_segments(),
            offset: default_star_offset(),
            color: default_star_color(),
            emissive: default_star_color(),
            emissive_intensity: default_emissive_intensity(),
        }
    }
}

fn default_star_size() -> f32 {
    0.25
}

fn default_star_depth() -> f32 {
    0.01
}

fn default_star_bevel() -> f32 {
    0.25
}

fn default_bevel_segments() -> u32 {
    1
}

fn default_star_offset() -> f32 {
    2.0
}

fn default_star_color() -> Rgb {
    Rgb(0xffd966)
}

fn default_emissive_intensity() -> f32 {
    1.25
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloomConfig {
    #[serde(default = "default_bloom_strength")]
    pub strength: f32,
    #[serde(default = "default_bloom_radius")]
    pub radius: f32,
    #[serde(default = "default_bloom_threshold")]
    pub threshold: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            strength: default_bloom_strength(),
            radius: default_bloom_radius(),
            threshold: default_bloom_threshold(),
        }
    }
}

fn default_bloom_strength() -> f32 {
    1.5
}

fn default_bloom_radius() -> f32 {
    0.5
}

fn default_bloom_threshold() -> f32 {
    0.85
}

impl SceneConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Every floating-point parameter, named by its TOML key
    fn numeric_fields(&self) -> Vec<(String, f32)> {
        let camera = &self.camera;
        let controls = &self.controls;
        let ambient = &self.lights.ambient;
        let spot = &self.lights.spot;
        let tree = &self.tree;
        let star = &self.star;
        let bloom = &self.bloom;

        let mut fields: Vec<(String, f32)> = [
            ("camera.fov_degrees", camera.fov_degrees),
            ("camera.near", camera.near),
            ("camera.far", camera.far),
            ("controls.rotate_speed", controls.rotate_speed),
            ("controls.zoom_speed", controls.zoom_speed),
            ("controls.min_distance", controls.min_distance),
            ("controls.max_distance", controls.max_distance),
            ("lights.ambient.intensity", ambient.intensity),
            ("lights.spot.intensity", spot.intensity),
            ("lights.spot.angle_degrees", spot.angle_degrees),
            ("lights.spot.penumbra", spot.penumbra),
            ("lights.spot.decay", spot.decay),
            ("lights.spot.distance", spot.distance),
            ("lights.spot.shadow_near", spot.shadow_near),
            ("ground.size", self.ground.size),
            ("tree.trunk_radius", tree.trunk_radius),
            ("tree.trunk_height", tree.trunk_height),
            ("star.size", star.size),
            ("star.depth", star.depth),
            ("star.bevel_thickness", star.bevel_thickness),
            ("star.bevel_size", star.bevel_size),
            ("star.offset", star.offset),
            ("star.emissive_intensity", star.emissive_intensity),
            ("bloom.strength", bloom.strength),
            ("bloom.radius", bloom.radius),
            ("bloom.threshold", bloom.threshold),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        for (name, point) in [
            ("camera.position", camera.position),
            ("camera.target", camera.target),
            ("lights.spot.position", spot.position),
        ] {
            fields.extend(point.iter().enumerate().map(|(i, v)| (format!("{name}[{i}]"), *v)));
        }
        fields
    }

    /// Reject parameters that would produce a degenerate scene
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((name, value)) = self.numeric_fields().into_iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{name} must be a finite number, got {value}"));
        }

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return invalid(format!("camera.fov_degrees must be in (0, 180), got {}", camera.fov_degrees));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            ));
        }
        if camera.position == camera.target {
            return invalid("camera.position must differ from camera.target".to_string());
        }

        let controls = &self.controls;
        if !(controls.min_distance > 0.0 && controls.min_distance <= controls.max_distance) {
            return invalid(format!(
                "controls distances must satisfy 0 < min <= max, got min={} max={}",
                controls.min_distance, controls.max_distance
            ));
        }
        if controls.rotate_speed < 0.0 || controls.zoom_speed < 0.0 {
            return invalid("controls speeds must not be negative".to_string());
        }

        let spot = &self.lights.spot;
        if !(spot.angle_degrees > 0.0 && spot.angle_degrees <= 90.0) {
            return invalid(format!("lights.spot.angle_degrees must be in (0, 90], got {}", spot.angle_degrees));
        }
        if !(0.0..=1.0).contains(&spot.penumbra) {
            return invalid(format!("lights.spot.penumbra must be in [0, 1], got {}", spot.penumbra));
        }
        if spot.distance <= 0.0 || spot.shadow_near <= 0.0 || spot.shadow_near >= spot.distance {
            return invalid("lights.spot requires 0 < shadow_near < distance".to_string());
        }
        if !spot.shadow_map_size.is_power_of_two() {
            return invalid(format!("lights.spot.shadow_map_size must be a power of two, got {}", spot.shadow_map_size));
        }
        if self.lights.ambient.intensity < 0.0 || spot.intensity < 0.0 {
            return invalid("light intensities must not be negative".to_string());
        }

        if self.ground.size <= 0.0 {
            return invalid(format!("ground.size must be positive, got {}", self.ground.size));
        }

        let tree = &self.tree;
        // the top cone's radius is (levels - 1) / 2
        if !(2..=MAX_TREE_LEVELS).contains(&tree.levels) {
            return invalid(format!("tree.levels must be in [2, {MAX_TREE_LEVELS}], got {}", tree.levels));
        }
        if tree.trunk_radius <= 0.0 || tree.trunk_height <= 0.0 {
            return invalid("tree trunk dimensions must be positive".to_string());
        }
        let segments = 3..=MAX_SEGMENTS;
        if !segments.contains(&tree.trunk_segments) || !segments.contains(&tree.cone_segments) {
            return invalid(format!("tree segment counts must be in [3, {MAX_SEGMENTS}]"));
        }

        let star = &self.star;
        if star.size <= 0.0 || star.depth <= 0.0 {
            return invalid("star.size and star.depth must be positive".to_string());
        }
        if star.bevel_thickness < 0.0 || star.bevel_size < 0.0 || !(1..=MAX_BEVEL_SEGMENTS).contains(&star.bevel_segments) {
            return invalid(format!(
                "star bevel must be non-negative with 1 to {MAX_BEVEL_SEGMENTS} segments"
            ));
        }

        let bloom = &self.bloom;
        if bloom.strength < 0.0 || bloom.threshold < 0.0 || !(0.0..=1.0).contains(&bloom.radius) {
            return invalid(format!(
                "bloom requires strength >= 0, threshold >= 0, radius in [0, 1]; got {}/{}/{}",
                bloom.strength, bloom.radius, bloom.threshold
            ));
        }

        Ok(())
    }
}

fn invalid(message: String) -> Result<(), ConfigError> {
    Err(ConfigError::ValidationError(message))
}

/// Load configuration from file, falling back to defaults when it does not exist
pub fn load_config(path: &Path) -> Result<SceneConfig, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = SceneConfig::from_toml(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(SceneConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_document_is_stock_scene() {
        let config = SceneConfig::from_toml("").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.tree.levels, 3);
        assert_eq!(config.star.offset, 2.0);
        assert_eq!(config.bloom.threshold, 0.85);
        assert_eq!(config.lights.spot.shadow_map_size, 4096);
    }

    #[test]
    fn test_partial_override() {
        let config = SceneConfig::from_toml(
            r##"
[tree]
levels = 5
foliage_color = "#00ff00"

[bloom]
strength = 0.8
"##,
        )
        .unwrap();

        assert_eq!(config.tree.levels, 5);
        assert_eq!(config.tree.foliage_color, Rgb(0x00ff00));
        assert_eq!(config.tree.trunk_radius, 0.5);
        assert_eq!(config.bloom.strength, 0.8);
        assert_eq!(config.bloom.radius, 0.5);
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(Rgb::from_hex("#8B4513").unwrap(), Rgb(0x8b4513));
        assert_eq!(Rgb::from_hex("ffd966").unwrap(), Rgb(0xffd966));
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gggggg").is_err());
        assert_eq!(Rgb(0x04ab04).to_string(), "#04ab04");

        let [r, g, b] = Rgb::WHITE.to_srgb_f32();
        assert_eq!((r, g, b), (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_bad_color_is_parse_error() {
        let err = SceneConfig::from_toml("[ground]\ncolor = \"red\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation_rejects_degenerate_values() {
        let cases = [
            "[tree]\nlevels = 0\n",
            "[tree]\nlevels = 1\n",
            "[star]\nsize = 0.0\n",
            "[star]\nbevel_segments = 0\n",
            "[camera]\nnear = 10.0\nfar = 1.0\n",
            "[camera]\nfov_degrees = 180.0\n",
            "[bloom]\nradius = 1.5\n",
            "[lights.spot]\nshadow_map_size = 1000\n",
            "[controls]\nmin_distance = 50.0\nmax_distance = 10.0\n",
            "[tree]\nlevels = 4294967295\n",
            "[tree]\ncone_segments = 100000\n",
            "[star]\nbevel_segments = 1000\n",
        ];

        for case in cases {
            let err = SceneConfig::from_toml(case).unwrap_err();
            assert!(
                matches!(err, ConfigError::ValidationError(_)),
                "expected validation error for {case:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_validation_rejects_non_finite_values() {
        let cases = [
            ("[star]\nsize = nan\n", "star.size"),
            ("[ground]\nsize = nan\n", "ground.size"),
            ("[tree]\ntrunk_height = inf\n", "tree.trunk_height"),
            ("[controls]\nrotate_speed = nan\n", "controls.rotate_speed"),
            ("[star]\noffset = -inf\n", "star.offset"),
            ("[lights.spot]\ndecay = nan\n", "lights.spot.decay"),
            ("[camera]\nposition = [10.0, inf, 20.0]\n", "camera.position[1]"),
        ];

        for (case, field) in cases {
            match SceneConfig::from_toml(case) {
                Err(ConfigError::ValidationError(message)) => {
                    assert!(message.contains(field), "{case:?} reported {message:?}")
                }
                other => panic!("expected validation error for {case:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_upper_limits_are_accepted() {
        let config = SceneConfig::from_toml(&format!(
            "[tree]\nlevels = {MAX_TREE_LEVELS}\ncone_segments = {MAX_SEGMENTS}\n"
        ))
        .unwrap();
        assert_eq!(config.tree.levels, MAX_TREE_LEVELS);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[star]\noffset = 3.5").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.star.offset, 3.5);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = SceneConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(SceneConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let sample = include_str!("../../../evergreen.toml");
        assert_eq!(SceneConfig::from_toml(sample).unwrap(), SceneConfig::default());
    }
}
