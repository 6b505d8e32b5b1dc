use scroll_backdrop::core::Viewport;
use scroll_backdrop::scene::{FrameSnapshot, ImagePipeline, RenderBackend, SurfaceGeometry};
use scroll_backdrop::types::BackgroundUniform;

/// Mesh handle issued by the recording backend
#[derive(Debug, PartialEq)]
pub struct MockMesh {
    pub id: usize,
    pub geometry: SurfaceGeometry,
}

/// Backend that records every call instead of drawing
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: usize,
    pub live_meshes: Vec<usize>,
    pub released: Vec<usize>,
    /// Live mesh count observed at each allocation
    pub live_at_create: Vec<usize>,
    pub resizes: Vec<Viewport>,
    pub frames: usize,
    pub last_background: Option<BackgroundUniform>,
    pub last_point_count: usize,
    pub last_line_count: usize,
    pub last_pipeline_size: Option<Viewport>,
}

impl RenderBackend for RecordingBackend {
    type Mesh = MockMesh;

    fn create_surface_mesh(&mut self, geometry: &SurfaceGeometry) -> MockMesh {
        self.live_at_create.push(self.live_meshes.len());
        let id = self.next_id;
        self.next_id += 1;
        self.live_meshes.push(id);
        MockMesh {
            id,
            geometry: *geometry,
        }
    }

    fn release_surface_mesh(&mut self, mesh: MockMesh) {
        self.live_meshes.retain(|&id| id != mesh.id);
        self.released.push(mesh.id);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.resizes.push(viewport);
    }

    fn render(
        &mut self,
        frame: &FrameSnapshot<'_>,
        _surface: &MockMesh,
        pipeline: &ImagePipeline,
    ) -> scroll_backdrop::Result<()> {
        self.frames += 1;
        self.last_background = Some(frame.background);
        self.last_point_count = frame.points.len();
        self.last_line_count = frame.lines.len();
        self.last_pipeline_size = Some(pipeline.size());
        Ok(())
    }
}
