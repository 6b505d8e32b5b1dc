use glam::Vec2;

use super::ambient::AmbientField;
use super::backend::{FrameSnapshot, RenderBackend};
use super::background::BackgroundSurface;
use super::objects::{default_objects, DecorativeObject};
use super::pipeline::ImagePipeline;
use super::trail::PointerTrail;
use crate::camera::Camera;
use crate::config::BackdropConfig;
use crate::core::{Clock, Viewport};
use crate::math::Projector;
use crate::types::Vertex;

const TRAIL_COLOR: [f32; 3] = [0.4, 0.9, 1.0];

/// Age fade: newest sample opaque, oldest fully transparent
fn trail_alpha(age: usize, capacity: usize) -> f32 {
    1.0 - age as f32 / capacity.saturating_sub(1).max(1) as f32
}

/// The capability callers hold, whether or not anything is rendered
///
/// Input setters only overwrite state; `update` consumes whatever was set
/// last. Each `update` call is exactly one frame.
pub trait Backdrop {
    /// Advance one frame and submit it
    fn update(&mut self);

    /// Viewport changed; dimensions in render-surface pixels
    fn resize(&mut self, width: u32, height: u32);

    /// Page scroll progress, clamped to [0, 1]
    fn set_scroll(&mut self, progress: f32);

    /// Normalized pointer position, [-1, 1]² with y down
    fn set_pointer(&mut self, x: f32, y: f32);

    /// Latest signed scroll velocity sample
    fn set_scroll_velocity(&mut self, velocity: f32);

    /// Whether this backdrop renders anything
    fn is_active(&self) -> bool;
}

/// Pick the backdrop variant once: active with a backend, disabled without
pub fn create_backdrop<B>(
    backend: Option<B>,
    config: BackdropConfig,
    viewport: Viewport,
) -> Box<dyn Backdrop>
where
    B: RenderBackend + 'static,
    B::Mesh: 'static,
{
    match backend {
        Some(backend) => Box::new(ActiveBackdrop::new(backend, config, viewport)),
        None => {
            log::warn!("no render surface available, backdrop disabled");
            Box::new(DisabledBackdrop)
        }
    }
}

/// Backdrop without a render surface; every operation is a no-op
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBackdrop;

impl Backdrop for DisabledBackdrop {
    fn update(&mut self) {}

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn set_scroll(&mut self, _progress: f32) {}

    fn set_pointer(&mut self, _x: f32, _y: f32) {}

    fn set_scroll_velocity(&mut self, _velocity: f32) {}

    fn is_active(&self) -> bool {
        false
    }
}

/// Backdrop that owns the scene and drives a render backend
pub struct ActiveBackdrop<B: RenderBackend> {
    backend: B,
    config: BackdropConfig,
    camera: Camera,
    viewport: Viewport,
    clock: Clock,
    frame_count: u64,
    scroll: f32,
    pointer: Option<Vec2>,
    trail: PointerTrail,
    objects: Vec<DecorativeObject>,
    ambient: AmbientField,
    background: BackgroundSurface<B::Mesh>,
    pipeline: ImagePipeline,
    lines: Vec<Vertex>,
    points: Vec<Vertex>,
}

impl<B: RenderBackend> ActiveBackdrop<B> {
    pub fn new(mut backend: B, config: BackdropConfig, viewport: Viewport) -> Self {
        let config = config.validated();
        let camera = Camera::new(&config.camera, viewport.aspect());
        let background = BackgroundSurface::new(config.background, &camera, viewport, &mut backend);
        let pipeline = ImagePipeline::new(config.bloom.into(), viewport);
        backend.resize(viewport);

        let objects = default_objects();
        let ambient = AmbientField::new(&config.ambient);
        let trail = PointerTrail::new(config.trail.capacity);

        let line_count = objects.iter().map(DecorativeObject::outline_vertex_count).sum();
        let point_count = ambient.len() + trail.capacity();

        log::info!(
            "backdrop initialized: {}x{}, {} objects, {} ambient points, trail of {}",
            viewport.width,
            viewport.height,
            objects.len(),
            ambient.len(),
            trail.capacity()
        );

        Self {
            backend,
            config,
            camera,
            viewport,
            clock: Clock::new(),
            frame_count: 0,
            scroll: 0.0,
            pointer: None,
            trail,
            objects,
            ambient,
            background,
            pipeline,
            lines: Vec::with_capacity(line_count),
            points: Vec::with_capacity(point_count),
        }
    }

    /// Replace the time source, e.g. with a fixed-step clock
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn sample_trail(&mut self) {
        let Some(pointer) = self.pointer else {
            return;
        };
        let projector = Projector::new(&self.camera);
        let sample = match projector.project(pointer, self.config.trail.depth) {
            Some(position) => position,
            None => {
                log::trace!("pointer ray parallel to trail plane, repeating last sample");
                self.trail.head()
            }
        };
        self.trail.push(sample);
    }

    fn build_vertices(&mut self) {
        self.lines.clear();
        for object in &self.objects {
            object.write_outline(&mut self.lines);
        }

        self.points.clear();
        self.ambient.write_points(&mut self.points);
        let capacity = self.trail.capacity();
        self.points.extend(self.trail.iter().enumerate().map(|(age, position)| {
            let alpha = trail_alpha(age, capacity);
            Vertex::new(
                position.to_array(),
                [TRAIL_COLOR[0], TRAIL_COLOR[1], TRAIL_COLOR[2], alpha],
            )
        }));
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn trail(&self) -> &PointerTrail {
        &self.trail
    }

    pub fn objects(&self) -> &[DecorativeObject] {
        &self.objects
    }

    pub fn ambient(&self) -> &AmbientField {
        &self.ambient
    }

    pub fn background(&self) -> &BackgroundSurface<B::Mesh> {
        &self.background
    }

    pub fn pipeline(&self) -> &ImagePipeline {
        &self.pipeline
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }
}

impl<B: RenderBackend> Backdrop for ActiveBackdrop<B> {
    fn update(&mut self) {
        let delta = self.clock.tick();
        let time = self.clock.elapsed();
        self.frame_count += 1;

        let pointer = self.pointer.unwrap_or(Vec2::ZERO);

        self.sample_trail();
        for object in &mut self.objects {
            object.advance(pointer, time, &self.config.objects);
        }
        self.ambient.advance(time);
        self.background.advance(time, self.scroll, pointer, delta);
        self.build_vertices();

        let Some(mesh) = self.background.mesh() else {
            return;
        };
        let frame = FrameSnapshot {
            camera: self.camera.to_uniform(),
            background: self.background.uniforms(),
            lines: &self.lines,
            points: &self.points,
        };
        if let Err(e) = self.backend.render(&frame, mesh, &self.pipeline) {
            log::warn!("frame {} not rendered: {}", self.frame_count, e);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            log::debug!("ignoring resize to {}x{}", width, height);
            return;
        }
        log::debug!("resize {}x{} -> {}x{}", self.viewport.width, self.viewport.height, width, height);

        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        self.backend.resize(viewport);
        self.pipeline.resize(viewport);
        self.background.set_resolution(viewport);
        self.background.regenerate(&self.camera, &mut self.backend);
    }

    fn set_scroll(&mut self, progress: f32) {
        self.scroll = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    }

    fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Some(Vec2::new(x, y));
    }

    fn set_scroll_velocity(&mut self, velocity: f32) {
        self.background.set_velocity(velocity);
    }

    fn is_active(&self) -> bool {
        true
    }
}

impl<B: RenderBackend> Drop for ActiveBackdrop<B> {
    fn drop(&mut self) {
        self.background.release(&mut self.backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::scene::background::SurfaceGeometry;

    #[derive(Default)]
    struct NullBackend {
        frames: usize,
    }

    impl RenderBackend for NullBackend {
        type Mesh = SurfaceGeometry;

        fn create_surface_mesh(&mut self, geometry: &SurfaceGeometry) -> SurfaceGeometry {
            *geometry
        }

        fn release_surface_mesh(&mut self, _mesh: SurfaceGeometry) {}

        fn resize(&mut self, _viewport: Viewport) {}

        fn render(
            &mut self,
            _frame: &FrameSnapshot<'_>,
            _surface: &SurfaceGeometry,
            _pipeline: &ImagePipeline,
        ) -> Result<()> {
            self.frames += 1;
            Ok(())
        }
    }

    fn backdrop() -> ActiveBackdrop<NullBackend> {
        ActiveBackdrop::new(NullBackend::default(), BackdropConfig::default(), Viewport::new(800, 600))
            .with_clock(Clock::fixed(1.0 / 60.0))
    }

    #[test]
    fn scroll_is_clamped() {
        let mut backdrop = backdrop();
        backdrop.set_scroll(1.7);
        assert_eq!(backdrop.scroll(), 1.0);
        backdrop.set_scroll(-0.3);
        assert_eq!(backdrop.scroll(), 0.0);
        backdrop.set_scroll(f32::NAN);
        assert_eq!(backdrop.scroll(), 0.0);
    }

    #[test]
    fn trail_waits_for_first_pointer_sample() {
        let mut backdrop = backdrop();
        backdrop.update();
        assert!(backdrop
            .trail()
            .iter()
            .all(|p| p == crate::scene::TRAIL_SENTINEL));
    }

    #[test]
    fn each_update_submits_one_frame() {
        let mut backdrop = backdrop();
        backdrop.update();
        backdrop.update();
        assert_eq!(backdrop.backend().frames, 2);
        assert_eq!(backdrop.frame_count(), 2);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut backdrop = backdrop();
        backdrop.resize(0, 400);
        assert_eq!(backdrop.viewport(), Viewport::new(800, 600));
    }

    #[test]
    fn frame_carries_every_vertex() {
        let mut backdrop = backdrop();
        backdrop.update();
        let outline_vertices: usize = backdrop
            .objects()
            .iter()
            .map(DecorativeObject::outline_vertex_count)
            .sum();
        assert_eq!(backdrop.lines.len(), outline_vertices);
        assert_eq!(backdrop.points.len(), 1000 + 100);
    }

    #[test]
    fn trail_fades_from_opaque_to_transparent() {
        let mut backdrop = backdrop();
        backdrop.set_pointer(0.0, 0.0);
        for _ in 0..100 {
            backdrop.update();
        }

        let trail = &backdrop.points[backdrop.ambient().len()..];
        let alphas: Vec<f32> = trail.iter().map(|v| v.color[3]).collect();
        assert_eq!(alphas.len(), 100);
        assert_eq!(alphas[0], 1.0);
        assert_eq!(alphas[99], 0.0);
        assert!(alphas.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn single_slot_trail_stays_opaque() {
        assert_eq!(trail_alpha(0, 1), 1.0);
    }
}
