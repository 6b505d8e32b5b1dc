use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline, Sampler, Texture, TextureFormat, TextureView};

use crate::core::Viewport;
use crate::scene::BloomSettings;
use crate::types::PostUniform;

/// Format of every intermediate target
pub const HDR_FORMAT: TextureFormat = TextureFormat::Rgba16Float;

struct Target {
    texture: Texture,
    view: TextureView,
}

impl Target {
    fn new(device: &Device, label: &str, size: Viewport) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HDR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Viewport-sized textures shared by the passes
struct Targets {
    scene: Target,
    bright: Target,
    blur: Target,
    composite: Target,
}

impl Targets {
    fn new(device: &Device, size: Viewport) -> Self {
        let half = size.halved();
        Self {
            scene: Target::new(device, "Scene Target", size),
            bright: Target::new(device, "Bloom Bright Target", half),
            blur: Target::new(device, "Bloom Blur Target", half),
            composite: Target::new(device, "Composite Target", size),
        }
    }

    fn destroy(&self) {
        for target in [&self.scene, &self.bright, &self.blur, &self.composite] {
            target.texture.destroy();
        }
    }
}

/// One fullscreen draw: pipeline, its parameters and bound inputs
struct Stage {
    label: &'static str,
    uniform: Buffer,
    bind_group: Option<BindGroup>,
}

impl Stage {
    fn new(device: &Device, label: &'static str) -> Self {
        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<PostUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            label,
            uniform,
            bind_group: None,
        }
    }

    fn bind(
        &mut self,
        device: &Device,
        layout: &BindGroupLayout,
        sampler: &Sampler,
        input: &TextureView,
        secondary: &TextureView,
    ) {
        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(secondary),
                },
            ],
        }));
    }

    fn run(&self, encoder: &mut wgpu::CommandEncoder, pipeline: &RenderPipeline, target: &TextureView) {
        let Some(bind_group) = &self.bind_group else {
            return;
        };
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1); // Fullscreen triangle
    }
}

/// Bloom and output passes plus the intermediate targets they share
///
/// Bloom: bright-pass into a half-size target, separable blur, then
/// composite over the scene. Output: tone map into the surface.
pub struct PostChain {
    layout: BindGroupLayout,
    sampler: Sampler,
    threshold_pipeline: RenderPipeline,
    blur_pipeline: RenderPipeline,
    composite_pipeline: RenderPipeline,
    output_pipeline: RenderPipeline,
    threshold: Stage,
    blur_horizontal: Stage,
    blur_vertical: Stage,
    composite: Stage,
    output: Stage,
    targets: Targets,
    size: Viewport,
}

impl PostChain {
    pub fn new(device: &Device, surface_format: TextureFormat, size: Viewport) -> Self {
        let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Post Bind Group Layout"),
            entries: &[
                texture_entry(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture_entry(3),
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Post Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Post Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/post.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Post Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let pipeline = |label: &str, entry_point: &str, format: TextureFormat| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(entry_point),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let mut chain = Self {
            threshold_pipeline: pipeline("Bloom Threshold Pipeline", "fs_threshold", HDR_FORMAT),
            blur_pipeline: pipeline("Bloom Blur Pipeline", "fs_blur", HDR_FORMAT),
            composite_pipeline: pipeline("Bloom Composite Pipeline", "fs_composite", HDR_FORMAT),
            output_pipeline: pipeline("Output Pipeline", "fs_output", surface_format),
            threshold: Stage::new(device, "Bloom Threshold"),
            blur_horizontal: Stage::new(device, "Bloom Blur Horizontal"),
            blur_vertical: Stage::new(device, "Bloom Blur Vertical"),
            composite: Stage::new(device, "Bloom Composite"),
            output: Stage::new(device, "Output"),
            targets: Targets::new(device, size),
            layout,
            sampler,
            size,
        };
        chain.bind_stages(device);
        chain
    }

    fn bind_stages(&mut self, device: &Device) {
        let t = &self.targets;
        let (layout, sampler) = (&self.layout, &self.sampler);
        self.threshold.bind(device, layout, sampler, &t.scene.view, &t.scene.view);
        self.blur_horizontal.bind(device, layout, sampler, &t.bright.view, &t.bright.view);
        self.blur_vertical.bind(device, layout, sampler, &t.blur.view, &t.blur.view);
        self.composite.bind(device, layout, sampler, &t.scene.view, &t.bright.view);
        self.output.bind(device, layout, sampler, &t.composite.view, &t.composite.view);
    }

    pub fn size(&self) -> Viewport {
        self.size
    }

    /// Where the scene pass renders
    pub fn scene_view(&self) -> &TextureView {
        &self.targets.scene.view
    }

    /// Recreate every target at the new size, destroying the old ones first
    pub fn resize(&mut self, device: &Device, size: Viewport) {
        if size.is_empty() || size == self.size {
            return;
        }
        self.targets.destroy();
        self.targets = Targets::new(device, size);
        self.size = size;
        self.bind_stages(device);
    }

    pub fn encode_bloom(&self, encoder: &mut wgpu::CommandEncoder, queue: &Queue, bloom: BloomSettings) {
        let full = texel_size(self.size);
        let half = texel_size(self.size.halved());
        let params = |texel_size: [f32; 2], direction: [f32; 2]| PostUniform {
            texel_size,
            direction,
            threshold: bloom.threshold,
            strength: bloom.strength,
            radius: bloom.radius,
            _pad: 0.0,
        };

        queue.write_buffer(&self.threshold.uniform, 0, bytemuck::cast_slice(&[params(full, [0.0, 0.0])]));
        queue.write_buffer(&self.blur_horizontal.uniform, 0, bytemuck::cast_slice(&[params(half, [1.0, 0.0])]));
        queue.write_buffer(&self.blur_vertical.uniform, 0, bytemuck::cast_slice(&[params(half, [0.0, 1.0])]));
        queue.write_buffer(&self.composite.uniform, 0, bytemuck::cast_slice(&[params(full, [0.0, 0.0])]));

        let t = &self.targets;
        self.threshold.run(encoder, &self.threshold_pipeline, &t.bright.view);
        self.blur_horizontal.run(encoder, &self.blur_pipeline, &t.blur.view);
        self.blur_vertical.run(encoder, &self.blur_pipeline, &t.bright.view);
        self.composite.run(encoder, &self.composite_pipeline, &t.composite.view);
    }

    pub fn encode_output(&self, encoder: &mut wgpu::CommandEncoder, queue: &Queue, surface: &TextureView) {
        let params = PostUniform {
            texel_size: texel_size(self.size),
            ..PostUniform::default()
        };
        queue.write_buffer(&self.output.uniform, 0, bytemuck::cast_slice(&[params]));
        self.output.run(encoder, &self.output_pipeline, surface);
    }
}

impl Drop for PostChain {
    fn drop(&mut self) {
        self.targets.destroy();
    }
}

fn texel_size(size: Viewport) -> [f32; 2] {
    [1.0 / size.width.max(1) as f32, 1.0 / size.height.max(1) as f32]
}
