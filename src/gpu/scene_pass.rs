use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, Device, Queue, RenderPipeline, TextureFormat, TextureView};

use crate::scene::{FrameSnapshot, SurfaceGeometry};
use crate::types::{BackgroundUniform, CameraUniform, SurfaceVertex, Vertex};

/// Vertex buffer that grows to fit, releasing the old buffer first
struct DynamicVertexBuffer {
    label: &'static str,
    buffer: Option<Buffer>,
    count: u32,
}

impl DynamicVertexBuffer {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            buffer: None,
            count: 0,
        }
    }

    fn upload(&mut self, device: &Device, queue: &Queue, vertices: &[Vertex]) {
        self.count = vertices.len() as u32;
        if vertices.is_empty() {
            return;
        }

        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let needed = bytes.len() as wgpu::BufferAddress;
        let fits = self.buffer.as_ref().is_some_and(|b| b.size() >= needed);
        if !fits {
            if let Some(old) = self.buffer.take() {
                old.destroy();
            }
            self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: needed.next_power_of_two(),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        if let Some(buffer) = &self.buffer {
            queue.write_buffer(buffer, 0, bytes);
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(buffer) = &self.buffer else {
            return;
        };
        if self.count == 0 {
            return;
        }
        let bytes = self.count as wgpu::BufferAddress * std::mem::size_of::<Vertex>() as wgpu::BufferAddress;
        pass.set_vertex_buffer(0, buffer.slice(0..bytes));
        pass.draw(0..self.count, 0..1);
    }
}

/// Draws the background quad, object outlines, ambient points and trail
/// into the intermediate HDR target
pub struct ScenePass {
    camera_buffer: Buffer,
    background_buffer: Buffer,
    bind_group: BindGroup,
    background_pipeline: RenderPipeline,
    line_pipeline: RenderPipeline,
    point_pipeline: RenderPipeline,
    lines: DynamicVertexBuffer,
    points: DynamicVertexBuffer,
}

impl ScenePass {
    pub fn new(device: &Device, target_format: TextureFormat) -> Self {
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let background_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Background Uniform Buffer"),
            size: std::mem::size_of::<BackgroundUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: background_buffer.as_entire_binding(),
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/background.wgsl").into()),
        });
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
        });

        let background_pipeline = Self::create_pipeline(
            device,
            "Background Pipeline",
            &layout,
            &background_shader,
            SurfaceVertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::BlendState::REPLACE,
            target_format,
        );
        let line_pipeline = Self::create_pipeline(
            device,
            "Outline Pipeline",
            &layout,
            &scene_shader,
            Vertex::layout(),
            wgpu::PrimitiveTopology::LineList,
            wgpu::BlendState::ALPHA_BLENDING,
            target_format,
        );
        let point_pipeline = Self::create_pipeline(
            device,
            "Point Pipeline",
            &layout,
            &scene_shader,
            Vertex::layout(),
            wgpu::PrimitiveTopology::PointList,
            wgpu::BlendState::ALPHA_BLENDING,
            target_format,
        );

        Self {
            camera_buffer,
            background_buffer,
            bind_group,
            background_pipeline,
            line_pipeline,
            point_pipeline,
            lines: DynamicVertexBuffer::new("Outline Vertices"),
            points: DynamicVertexBuffer::new("Point Vertices"),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn create_pipeline(
        device: &Device,
        label: &str,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        vertex_layout: wgpu::VertexBufferLayout<'static>,
        topology: wgpu::PrimitiveTopology,
        blend: wgpu::BlendState,
        format: TextureFormat,
    ) -> RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Allocate the background quad's vertex buffer
    pub fn create_surface_mesh(device: &Device, geometry: &SurfaceGeometry) -> Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Background Quad"),
            contents: bytemuck::cast_slice(&geometry.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        })
    }

    /// Upload this frame's uniforms and vertices
    pub fn prepare(&mut self, device: &Device, queue: &Queue, frame: &FrameSnapshot<'_>) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[frame.camera]));
        queue.write_buffer(&self.background_buffer, 0, bytemuck::cast_slice(&[frame.background]));
        self.lines.upload(device, queue, frame.lines);
        self.points.upload(device, queue, frame.points);
    }

    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, target: &TextureView, surface_mesh: &Buffer) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
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

        pass.set_bind_group(0, &self.bind_group, &[]);

        pass.set_pipeline(&self.background_pipeline);
        pass.set_vertex_buffer(0, surface_mesh.slice(..));
        pass.draw(0..6, 0..1);

        pass.set_pipeline(&self.line_pipeline);
        self.lines.draw(&mut pass);

        pass.set_pipeline(&self.point_pipeline);
        self.points.draw(&mut pass);
    }
}
