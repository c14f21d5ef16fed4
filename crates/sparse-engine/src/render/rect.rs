use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::{RenderCommand, RenderCommandKind, RenderState};

/// Color used when a frame's commands start without a clear.
const DEFAULT_CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Executes a frame's [`RenderCommand`]s with one instanced quad pipeline.
///
/// Commands are split into passes at every `Clear`; the rectangles between two
/// clears are drawn with a single instanced call. GPU objects are created once
/// in [`RectRenderer::new`]; only the instance buffer grows on demand.
pub struct RectRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    // Reused every frame.
    instances: Vec<RectInstance>,
    passes: Vec<PassPlan>,
}

impl RectRenderer {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sparse rect shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/rect.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sparse rect bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ViewportUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sparse rect pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sparse rect pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), RectInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            // Painter's order: depth is attached but never tested or written.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sparse rect viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sparse rect bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sparse rect quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sparse rect quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!("rect renderer initialized for {color_format:?} / {depth_format:?}");

        Self {
            pipeline,
            bind_group,
            viewport_ubo,
            quad_vbo,
            quad_ibo,
            instance_vbo: None,
            instance_capacity: 0,
            instances: Vec::new(),
            passes: Vec::new(),
        }
    }

    /// Records every queued command of `render` into `encoder`.
    ///
    /// At least one pass is always recorded so the target is cleared even
    /// when the application queued nothing.
    pub fn encode(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        render: &RenderState<'_>,
    ) {
        plan_passes(render.commands(), &mut self.instances, &mut self.passes);

        let viewport = ViewportUniform {
            viewport: [render.width.max(1) as f32, render.height.max(1) as f32],
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.viewport_ubo, 0, bytemuck::bytes_of(&viewport));

        if !self.instances.is_empty() {
            self.ensure_instance_capacity(device, self.instances.len());
            if let Some(vbo) = self.instance_vbo.as_ref() {
                queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.instances));
            }
        }

        for (i, pass) in self.passes.iter().enumerate() {
            let load = match pass.clear {
                Some([r, g, b, a]) => wgpu::LoadOp::Clear(wgpu::Color {
                    r: r as f64,
                    g: g as f64,
                    b: b as f64,
                    a: a as f64,
                }),
                None => wgpu::LoadOp::Load,
            };
            let depth_load = if i == 0 { wgpu::LoadOp::Clear(1.0) } else { wgpu::LoadOp::Load };

            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sparse rect pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if pass.instances.is_empty() {
                continue;
            }
            let Some(instance_vbo) = self.instance_vbo.as_ref() else { continue };

            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
            rpass.set_vertex_buffer(1, instance_vbo.slice(..));
            rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..6, 0, pass.instances.clone());
        }
    }

    fn ensure_instance_capacity(&mut self, device: &wgpu::Device, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(64);
        self.instance_vbo = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sparse rect instance vbo"),
            size: (new_cap * std::mem::size_of::<RectInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

/// One render pass worth of work.
#[derive(Debug, Clone, PartialEq)]
struct PassPlan {
    /// Color the pass clears to; `None` loads the previous contents.
    clear: Option<[f32; 4]>,
    instances: Range<u32>,
}

/// Splits `commands` into passes at every clear and flattens rectangles into
/// instance data. Empty rectangles and unknown kinds are skipped.
fn plan_passes(
    commands: &[RenderCommand],
    instances: &mut Vec<RectInstance>,
    passes: &mut Vec<PassPlan>,
) {
    instances.clear();
    passes.clear();
    passes.push(PassPlan {
        clear: Some(DEFAULT_CLEAR),
        instances: 0..0,
    });

    for command in commands {
        match command.kind() {
            Some(RenderCommandKind::Clear) => {
                let start = instances.len() as u32;
                let color = Some(command.color.to_array());
                match passes.last_mut() {
                    // Nothing drawn yet in this pass: the new clear replaces it.
                    Some(pass) if pass.instances.is_empty() => pass.clear = color,
                    _ => passes.push(PassPlan {
                        clear: color,
                        instances: start..start,
                    }),
                }
            }
            Some(RenderCommandKind::Rect) => {
                let r = command.rect.normalized();
                if r.is_empty() {
                    continue;
                }
                instances.push(RectInstance {
                    origin: [r.origin.x, r.origin.y],
                    size: [r.size.x, r.size.y],
                    color: command.color.to_array(),
                });
                if let Some(pass) = passes.last_mut() {
                    pass.instances.end = instances.len() as u32;
                }
            }
            None => log::trace!("skipping render command with unknown kind"),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    corner: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 0.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
