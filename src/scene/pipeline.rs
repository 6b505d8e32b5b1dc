use crate::config::BloomConfig;
use crate::core::Viewport;

/// Glow parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    /// Luminance below which pixels do not glow
    pub threshold: f32,
}

impl From<BloomConfig> for BloomSettings {
    fn from(config: BloomConfig) -> Self {
        Self {
            strength: config.strength,
            radius: config.radius,
            threshold: config.threshold,
        }
    }
}

/// One stage of post-processing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pass {
    /// Background, shapes, points and trail into the intermediate buffer
    Scene,
    Bloom(BloomSettings),
    /// Tone mapping and color-space conversion to the surface
    Output,
}

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Bloom(_) => "bloom",
            Self::Output => "output",
        }
    }
}

/// Ordered post-processing chain over a shared intermediate buffer
///
/// The chain order is fixed; its size tracks the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePipeline {
    bloom: BloomSettings,
    size: Viewport,
}

impl ImagePipeline {
    pub fn new(bloom: BloomSettings, size: Viewport) -> Self {
        Self { bloom, size }
    }

    pub fn passes(&self) -> [Pass; 3] {
        [Pass::Scene, Pass::Bloom(self.bloom), Pass::Output]
    }

    pub fn bloom(&self) -> BloomSettings {
        self.bloom
    }

    pub fn size(&self) -> Viewport {
        self.size
    }

    pub fn resize(&mut self, size: Viewport) {
        self.size = size;
    }
}
