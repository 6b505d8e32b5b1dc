use std::sync::Arc;

use winit::window::Window;

use super::context::GpuContext;
use super::post::{PostChain, HDR_FORMAT};
use super::scene_pass::ScenePass;
use crate::core::Viewport;
use crate::error::Result;
use crate::scene::{FrameSnapshot, ImagePipeline, Pass, RenderBackend, SurfaceGeometry};

/// Render backend that presents to a winit window through wgpu
pub struct WgpuBackend {
    gpu: GpuContext,
    scene: ScenePass,
    post: PostChain,
}

impl WgpuBackend {
    /// Blocks on adapter and device creation
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let gpu = pollster::block_on(GpuContext::new(window))?;
        let scene = ScenePass::new(gpu.device(), HDR_FORMAT);
        let post = PostChain::new(gpu.device(), gpu.format(), gpu.viewport());
        Ok(Self { gpu, scene, post })
    }
}

impl RenderBackend for WgpuBackend {
    type Mesh = wgpu::Buffer;

    fn create_surface_mesh(&mut self, geometry: &SurfaceGeometry) -> wgpu::Buffer {
        log::debug!(
            "background quad {:.2}x{:.2} at z={}",
            geometry.width,
            geometry.height,
            geometry.depth
        );
        ScenePass::create_surface_mesh(self.gpu.device(), geometry)
    }

    fn release_surface_mesh(&mut self, mesh: wgpu::Buffer) {
        mesh.destroy();
    }

    fn resize(&mut self, viewport: Viewport) {
        self.gpu.resize(viewport);
        self.post.resize(self.gpu.device(), viewport);
    }

    fn render(
        &mut self,
        frame: &FrameSnapshot<'_>,
        surface: &wgpu::Buffer,
        pipeline: &ImagePipeline,
    ) -> Result<()> {
        if self.post.size() != pipeline.size() {
            log::debug!("post targets out of date, resizing to {:?}", pipeline.size());
            self.resize(pipeline.size());
        }

        let output = self.gpu.acquire()?;
        let output_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.scene.prepare(self.gpu.device(), self.gpu.queue(), frame);

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backdrop Frame Encoder"),
            });

        for pass in pipeline.passes() {
            match pass {
                Pass::Scene => self.scene.encode(&mut encoder, self.post.scene_view(), surface),
                Pass::Bloom(settings) => self.post.encode_bloom(&mut encoder, self.gpu.queue(), settings),
                Pass::Output => self.post.encode_output(&mut encoder, self.gpu.queue(), &output_view),
            }
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
