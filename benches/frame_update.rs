use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use scroll_backdrop::config::BackdropConfig;
use scroll_backdrop::core::{Clock, Viewport};
use scroll_backdrop::math::Projector;
use scroll_backdrop::scene::{FrameSnapshot, ImagePipeline, PointerTrail, RenderBackend, SurfaceGeometry};
use scroll_backdrop::camera::Camera;
use scroll_backdrop::{ActiveBackdrop, Backdrop};

/// Backend that accepts frames without drawing them
struct NullBackend;

impl RenderBackend for NullBackend {
    type Mesh = SurfaceGeometry;

    fn create_surface_mesh(&mut self, geometry: &SurfaceGeometry) -> SurfaceGeometry {
        *geometry
    }

    fn release_surface_mesh(&mut self, _mesh: SurfaceGeometry) {}

    fn resize(&mut self, _viewport: Viewport) {}

    fn render(
        &mut self,
        frame: &FrameSnapshot<'_>,
        _surface: &SurfaceGeometry,
        _pipeline: &ImagePipeline,
    ) -> scroll_backdrop::Result<()> {
        black_box(frame.points.len() + frame.lines.len());
        Ok(())
    }
}

/// Benchmark: one full frame of scene state with no GPU work
fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for count in [1_000usize, 10_000] {
        let mut config = BackdropConfig::default();
        config.ambient.count = count;
        let mut backdrop = ActiveBackdrop::new(NullBackend, config, Viewport::new(1920, 1080))
            .with_clock(Clock::fixed(1.0 / 60.0));

        group.bench_with_input(BenchmarkId::new("ambient_points", count), &count, |b, _| {
            let mut frame = 0u32;
            b.iter(|| {
                frame = frame.wrapping_add(1);
                let t = frame as f32 * 0.01;
                backdrop.set_pointer(t.sin(), t.cos());
                backdrop.set_scroll_velocity(t.cos() * 20.0);
                backdrop.update();
            })
        });
    }

    group.finish();
}

/// Benchmark: pointer unprojection
fn bench_projection(c: &mut Criterion) {
    let camera = Camera::new(&BackdropConfig::default().camera, 16.0 / 9.0);
    let projector = Projector::new(&camera);

    c.bench_function("project_pointer", |b| {
        b.iter(|| black_box(projector.project(black_box(Vec2::new(0.3, -0.7)), black_box(0.0))))
    });
}

/// Benchmark: trail insertion at full capacity
fn bench_trail_push(c: &mut Criterion) {
    let mut trail = PointerTrail::new(100);
    let mut x = 0.0f32;

    c.bench_function("trail_push", |b| {
        b.iter(|| {
            x += 0.001;
            trail.push(black_box(Vec3::new(x, -x, 0.0)));
        })
    });
}

/// Benchmark: resize with surface regeneration
fn bench_resize(c: &mut Criterion) {
    let mut backdrop = ActiveBackdrop::new(NullBackend, BackdropConfig::default(), Viewport::new(1280, 720));
    let sizes = [(1280, 720), (1920, 1080), (800, 600)];
    let mut i = 0;

    c.bench_function("resize", |b| {
        b.iter(|| {
            let (w, h) = sizes[i % sizes.len()];
            i += 1;
            backdrop.resize(black_box(w), black_box(h));
        })
    });
}

criterion_group!(benches, bench_update, bench_projection, bench_trail_push, bench_resize);
criterion_main!(benches);
