//! Lights, materials, and bloom mapped onto Bevy's physical units
//!
//! Scene intensities are expressed for an unexposed renderer (exposure 1).
//! Bevy's default camera exposure (EV100 9.7) divides incoming light by
//! roughly a thousand, so every luminous quantity is multiplied by
//! `PHOTOMETRIC_SCALE` on the way in.

use bevy::light::{AmbientLight as GlobalAmbientLight, SpotLight};
use bevy::post_process::bloom::{Bloom, BloomCompositeMode, BloomPrefilter};
use bevy::prelude::*;
use evergreen_core::scene::{AmbientLightSpec, MaterialSpec, SpotLightSpec};
use evergreen_core::{BloomSettings, Rgb};
use std::f32::consts::PI;

pub const PHOTOMETRIC_SCALE: f32 = 1000.0;

/// Bevy bloom intensity per unit of bloom strength
const BLOOM_INTENSITY_PER_STRENGTH: f32 = 0.1;

/// Low-frequency boost per unit of bloom radius; radius 0.5 gives Bevy's
/// natural preset
const BLOOM_BOOST_PER_RADIUS: f32 = 1.4;

pub fn srgb(color: Rgb) -> Color {
    let [r, g, b] = color.to_srgb_f32();
    Color::srgb(r, g, b)
}

pub fn standard_material(spec: &MaterialSpec) -> StandardMaterial {
    let emissive = match spec.emissive {
        Some(color) => {
            let linear = srgb(color).to_linear();
            let scale = spec.emissive_intensity * PHOTOMETRIC_SCALE;
            LinearRgba::rgb(linear.red * scale, linear.green * scale, linear.blue * scale)
        }
        None => LinearRgba::BLACK,
    };

    StandardMaterial {
        base_color: srgb(spec.base_color),
        emissive,
        ..default()
    }
}

pub fn ambient_light(spec: &AmbientLightSpec) -> GlobalAmbientLight {
    GlobalAmbientLight {
        color: srgb(spec.color),
        brightness: spec.intensity * PHOTOMETRIC_SCALE,
        ..default()
    }
}

/// Spot light component; Bevy takes lumens and always falls off with the
/// inverse square of distance
pub fn spot_light(spec: &SpotLightSpec) -> SpotLight {
    if (spec.decay - 2.0).abs() > f32::EPSILON {
        tracing::warn!(decay = spec.decay, "Spot light decay other than 2 is not supported, using inverse-square");
    }

    SpotLight {
        color: srgb(spec.color),
        intensity: spec.intensity * 4.0 * PI * PHOTOMETRIC_SCALE,
        range: spec.distance,
        radius: 0.0,
        shadows_enabled: spec.cast_shadows,
        shadow_map_near_z: spec.shadow_near,
        outer_angle: spec.angle_radians,
        inner_angle: spec.inner_angle_radians(),
        ..default()
    }
}

/// Additive bloom over everything brighter than the threshold
pub fn bloom(settings: &BloomSettings) -> Bloom {
    Bloom {
        intensity: settings.strength * BLOOM_INTENSITY_PER_STRENGTH,
        low_frequency_boost: settings.radius * BLOOM_BOOST_PER_RADIUS,
        prefilter: BloomPrefilter {
            threshold: settings.threshold,
            threshold_softness: 0.0,
        },
        composite_mode: BloomCompositeMode::Additive,
        ..Bloom::NATURAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evergreen_core::{SceneConfig, SceneDescription};

    fn stock() -> SceneDescription {
        SceneDescription::build(&SceneConfig::default()).unwrap()
    }

    #[test]
    fn test_spot_light_mapping() {
        let scene = stock();
        let light = spot_light(&scene.spot);

        assert!(light.shadows_enabled);
        assert_eq!(light.range, 400.0);
        assert!((light.outer_angle - PI / 12.0).abs() < 1e-6);
        assert!((light.inner_angle - PI / 24.0).abs() < 1e-6);
        assert!(light.inner_angle < light.outer_angle);
        assert!((light.intensity - 100.0 * 4.0 * PI * PHOTOMETRIC_SCALE).abs() < 1.0);
    }

    #[test]
    fn test_star_material_is_emissive() {
        let scene = stock();

        let star = standard_material(&scene.star.material);
        assert!(star.emissive.red > 0.0 && star.emissive.green > 0.0);

        let trunk = standard_material(&scene.trunk.material);
        assert_eq!(trunk.emissive, LinearRgba::BLACK);
    }

    #[test]
    fn test_bloom_mapping() {
        let scene = stock();
        let settings = bloom(scene.pipeline.bloom().unwrap());

        assert!((settings.intensity - 0.15).abs() < 1e-6);
        assert!((settings.low_frequency_boost - 0.7).abs() < 1e-6);
        assert_eq!(settings.prefilter.threshold, 0.85);
        assert_eq!(settings.composite_mode, BloomCompositeMode::Additive);
    }

    #[test]
    fn test_ambient_is_dim_fill() {
        let ambient = ambient_light(&stock().ambient);
        assert!((ambient.brightness - 10.0).abs() < 1e-4);
    }
}
