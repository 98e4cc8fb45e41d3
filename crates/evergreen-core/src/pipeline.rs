//! Post-processing chain applied every frame

use serde::Serialize;

use crate::config::BloomConfig;

/// Bloom: brighten and blur the regions above `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BloomSettings {
    pub strength: f32,
    /// Spread of the blur, `0.0..=1.0`
    pub radius: f32,
    pub threshold: f32,
}

impl From<&BloomConfig> for BloomSettings {
    fn from(config: &BloomConfig) -> Self {
        Self {
            strength: config.strength,
            radius: config.radius,
            threshold: config.threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PostStage {
    /// Render the scene normally
    BaseRender,
    Bloom(BloomSettings),
}

/// Ordered post-processing stages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPipeline {
    stages: Vec<PostStage>,
}

impl RenderPipeline {
    /// Base render followed by a single bloom stage
    pub fn with_bloom(bloom: BloomSettings) -> Self {
        Self {
            stages: vec![PostStage::BaseRender, PostStage::Bloom(bloom)],
        }
    }

    pub fn stages(&self) -> &[PostStage] {
        &self.stages
    }

    pub fn bloom(&self) -> Option<&BloomSettings> {
        self.stages.iter().find_map(|stage| match stage {
            PostStage::Bloom(settings) => Some(settings),
            PostStage::BaseRender => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_render_runs_first() {
        let pipeline = RenderPipeline::with_bloom(BloomSettings::from(&BloomConfig::default()));

        assert_eq!(pipeline.stages().len(), 2);
        assert_eq!(pipeline.stages()[0], PostStage::BaseRender);

        let bloom = pipeline.bloom().unwrap();
        assert_eq!(bloom.strength, 1.5);
        assert_eq!(bloom.radius, 0.5);
        assert_eq!(bloom.threshold, 0.85);
    }
}
