//! Decorative background layers behind the page copy: the hero starfield
//! (always on) and the drifting gradient orbs preset.
//!
//! Particle seeding is an explicit pure function of the viewport so it can
//! be unit-tested without a window; the per-frame animation is entirely
//! time-driven on the GPU, the CPU only rewrites one small uniform block.

use rand::Rng;
use wgpu::util::DeviceExt;

use crate::config::{parse_hex_color, ThemeConfig};

/// Uniform block shared by both backdrop pipelines.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct BackdropUniforms {
    /// width, height, time, unused
    res_time: [f32; 4],
    color_a: [f32; 4],
    color_b: [f32; 4],
    color_c: [f32; 4],
}

/// Uniformly random position inside the viewport, in pixels.
pub fn seed_position(viewport_w: f32, viewport_h: f32, rng: &mut impl Rng) -> (f32, f32) {
    (
        rng.random_range(0.0..viewport_w.max(1.0)),
        rng.random_range(0.0..viewport_h.max(1.0)),
    )
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ParticleInstance {
    start: [f32; 2],
    end: [f32; 2],
    /// duration seconds, phase offset seconds
    timing: [f32; 2],
}

/// Build the instance table for `count` particles over the given viewport.
fn seed_particles(count: usize, w: f32, h: f32, rng: &mut impl Rng) -> Vec<ParticleInstance> {
    (0..count)
        .map(|_| {
            let start = seed_position(w, h, rng);
            let end = seed_position(w, h, rng);
            ParticleInstance {
                start: [start.0, start.1],
                end: [end.0, end.1],
                // duration 2-5 s, matching the original transition config.
                timing: [rng.random_range(2.0..5.0), rng.random_range(0.0..5.0)],
            }
        })
        .collect()
}

const STARFIELD_SHADER: &str = r#"
struct BackdropUniforms {
    res_time: vec4<f32>,
    color_a: vec4<f32>,
    color_b: vec4<f32>,
    color_c: vec4<f32>,
};

@group(0) @binding(0) var<uniform> u: BackdropUniforms;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) corner: vec2<f32>,
    @location(1) fade: f32,
};

const POINT_SIZE: f32 = 2.5;
const PI: f32 = 3.14159265;

@vertex
fn vs_main(
    @location(0) corner: vec2<f32>,
    @location(1) start: vec2<f32>,
    @location(2) end: vec2<f32>,
    @location(3) timing: vec2<f32>,
) -> VsOut {
    let time = u.res_time.z;
    let t = fract((time + timing.y) / timing.x);
    let center = mix(start, end, t);
    // Scale pulses 0 -> 1 -> 0 over each loop.
    let pulse = sin(t * PI);
    let px = center + corner * POINT_SIZE * max(pulse, 0.05);
    var out: VsOut;
    out.clip = vec4<f32>(
        px.x / u.res_time.x * 2.0 - 1.0,
        1.0 - px.y / u.res_time.y * 2.0,
        0.0,
        1.0,
    );
    out.corner = corner;
    out.fade = pulse;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let falloff = clamp(1.0 - length(in.corner), 0.0, 1.0);
    let alpha = in.fade * falloff;
    return vec4<f32>(vec3<f32>(alpha), alpha);
}
"#;

const ORBS_SHADER: &str = r#"
struct BackdropUniforms {
    res_time: vec4<f32>,
    color_a: vec4<f32>,
    color_b: vec4<f32>,
    color_c: vec4<f32>,
};

@group(0) @binding(0) var<uniform> u: BackdropUniforms;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VsOut {
    // Oversized fullscreen triangle.
    let x = f32(i32(index & 1u) * 4 - 1);
    let y = f32(i32(index >> 1u) * 4 - 1);
    var out: VsOut;
    out.clip = vec4<f32>(x, y, 0.0, 1.0);
    out.uv = vec2<f32>((x + 1.0) * 0.5, (1.0 - y) * 0.5);
    return out;
}

fn orb(uv: vec2<f32>, center: vec2<f32>, radius: f32) -> f32 {
    return smoothstep(radius, 0.0, distance(uv, center));
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let t = u.res_time.z * 0.15;
    let a = orb(in.uv, vec2<f32>(0.3 + 0.1 * sin(t), 0.35 + 0.08 * cos(t * 1.3)), 0.45);
    let b = orb(in.uv, vec2<f32>(0.7 + 0.08 * cos(t * 0.8), 0.4 + 0.1 * sin(t * 1.1)), 0.4);
    let c = orb(in.uv, vec2<f32>(0.5 + 0.12 * sin(t * 0.6), 0.75 + 0.07 * cos(t)), 0.5);
    let color = u.color_a.rgb * a + u.color_b.rgb * b + u.color_c.rgb * c;
    let alpha = clamp((a + b + c) * 0.2, 0.0, 0.35);
    return vec4<f32>(color * alpha, alpha);
}
"#;

const QUAD_CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];

pub struct Backdrop {
    starfield: wgpu::RenderPipeline,
    orbs: Option<wgpu::RenderPipeline>,
    quad: wgpu::Buffer,
    particles: wgpu::Buffer,
    particle_count: u32,
    particle_capacity: usize,
    uniforms: BackdropUniforms,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Backdrop {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        theme: &ThemeConfig,
        particle_count: usize,
        with_orbs: bool,
        width: u32,
        height: u32,
        rng: &mut impl Rng,
    ) -> Self {
        let gradient: Vec<[f32; 4]> = theme
            .gradient
            .iter()
            .map(|hex| parse_hex_color(hex).unwrap_or([1.0, 1.0, 1.0, 1.0]))
            .collect();
        let uniforms = BackdropUniforms {
            res_time: [width.max(1) as f32, height.max(1) as f32, 0.0, 0.0],
            color_a: gradient[0],
            color_b: gradient[1],
            color_c: gradient[2],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("backdrop-uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("backdrop-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("backdrop-bind-group"),
            layout: &bind_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle-quad"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instances = seed_particles(
            particle_count,
            width.max(1) as f32,
            height.max(1) as f32,
            rng,
        );
        let particles = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle-instances"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let starfield = create_starfield_pipeline(device, format, &bind_layout);
        let orbs = with_orbs.then(|| create_orbs_pipeline(device, format, &bind_layout));

        Self {
            starfield,
            orbs,
            quad,
            particles,
            particle_count: particle_count as u32,
            particle_capacity: particle_count,
            uniforms,
            uniform_buffer,
            bind_group,
        }
    }

    /// Reseed particle positions for a new viewport size.
    pub fn reseed(&mut self, queue: &wgpu::Queue, width: u32, height: u32, rng: &mut impl Rng) {
        let instances = seed_particles(
            self.particle_capacity,
            width.max(1) as f32,
            height.max(1) as f32,
            rng,
        );
        queue.write_buffer(&self.particles, 0, bytemuck::cast_slice(&instances));
    }

    pub fn advance(&mut self, queue: &wgpu::Queue, elapsed: f32, width: u32, height: u32) {
        self.uniforms.res_time = [width.max(1) as f32, height.max(1) as f32, elapsed, 0.0];
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));
    }

    /// First pass of the frame; clears to the page background.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear: wgpu::Color,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("backdrop"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        if let Some(orbs) = &self.orbs {
            pass.set_pipeline(orbs);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
        pass.set_pipeline(&self.starfield);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad.slice(..));
        pass.set_vertex_buffer(1, self.particles.slice(..));
        pass.draw(0..4, 0..self.particle_count);
    }
}

fn additive_target(format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
    wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        }),
        write_mask: wgpu::ColorWrites::ALL,
    }
}

fn create_starfield_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    bind_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("starfield-shader"),
        source: wgpu::ShaderSource::Wgsl(STARFIELD_SHADER.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("starfield-layout"),
        bind_group_layouts: &[bind_layout],
        push_constant_ranges: &[],
    });
    const CORNER: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
    const INSTANCE: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![1 => Float32x2, 2 => Float32x2, 3 => Float32x2];
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("starfield"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &CORNER,
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INSTANCE,
                },
            ],
            compilation_options: Default::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(additive_target(format))],
            compilation_options: Default::default(),
        }),
        multiview: None,
        cache: None,
    })
}

fn create_orbs_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    bind_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("orbs-shader"),
        source: wgpu::ShaderSource::Wgsl(ORBS_SHADER.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("orbs-layout"),
        bind_group_layouts: &[bind_layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("orbs"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(additive_target(format))],
            compilation_options: Default::default(),
        }),
        multiview: None,
        cache: None,
    })
}
