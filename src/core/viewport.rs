/// Viewport - render surface dimensions in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; a zero height is treated as one pixel
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Dimensions as floats, the form shaders consume
    pub fn resolution(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    /// True when either dimension is zero (minimized window)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Half-size viewport used by the blur targets, never smaller than 1x1
    pub fn halved(&self) -> Self {
        Self::new((self.width / 2).max(1), (self.height / 2).max(1))
    }
}
