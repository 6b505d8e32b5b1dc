use super::background::SurfaceGeometry;
use super::pipeline::ImagePipeline;
use crate::core::Viewport;
use crate::error::Result;
use crate::types::{BackgroundUniform, CameraUniform, Vertex};

/// Everything the GPU needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub camera: CameraUniform,
    pub background: BackgroundUniform,
    /// Object outlines, line list
    pub lines: &'a [Vertex],
    /// Ambient field followed by the trail, point list
    pub points: &'a [Vertex],
}

/// Seam between the CPU scene and whatever draws it
///
/// Meshes returned by `create_surface_mesh` are owned by the caller and must
/// come back through `release_surface_mesh`.
pub trait RenderBackend {
    type Mesh;

    fn create_surface_mesh(&mut self, geometry: &SurfaceGeometry) -> Self::Mesh;

    fn release_surface_mesh(&mut self, mesh: Self::Mesh);

    /// Resize every viewport-dependent buffer
    fn resize(&mut self, viewport: Viewport);

    /// Draw the frame through `pipeline` and present it
    fn render(
        &mut self,
        frame: &FrameSnapshot<'_>,
        surface: &Self::Mesh,
        pipeline: &ImagePipeline,
    ) -> Result<()>;
}
