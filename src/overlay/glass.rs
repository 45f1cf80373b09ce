//! The glass material: WGSL program, uniform block and pipeline for the
//! translucent hexagon rings.
//!
//! Per-pixel recipe: fresnel edge brightening, a hollow-ring mask over the
//! local-space distance from center, a time-driven sine noise sampled three
//! times at chromatic offsets, and an alpha that keeps edges more opaque
//! than faces while the noise gate thins the body out.

use wgpu::util::DeviceExt;

use crate::config::OverlayConfig;
use crate::overlay::shape::MeshVertex;

pub const GLASS_SHADER: &str = r#"
struct GlassUniforms {
    mvp: mat4x4<f32>,
    model: mat4x4<f32>,
    eye: vec4<f32>,
    // time, distortion, ring_radius, ring_thickness
    params: vec4<f32>,
    // opacity, refraction_ratio, distortion_scale, temporal_distortion
    effect_a: vec4<f32>,
    // blur_strength, chroma_offset, inv_outer_radius, unused
    effect_b: vec4<f32>,
    // surface width, surface height, unused, unused
    resolution: vec4<f32>,
};

@group(0) @binding(0) var<uniform> u: GlassUniforms;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) local: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> VsOut {
    var out: VsOut;
    out.clip = u.mvp * vec4<f32>(position, 1.0);
    out.world_pos = (u.model * vec4<f32>(position, 1.0)).xyz;
    out.normal = normalize((u.model * vec4<f32>(normal, 0.0)).xyz);
    out.local = position.xy * u.effect_b.z;
    return out;
}

fn wave_noise(p: vec2<f32>, time: f32, temporal: f32) -> f32 {
    let drift = time * temporal;
    let a = sin(p.x * 3.1 + drift) * sin(p.y * 4.3 - drift * 0.7);
    let b = sin((p.x + p.y) * 2.2 - drift * 1.3) * sin(p.x * 5.7 + drift * 0.5);
    return 0.5 + 0.25 * a + 0.25 * b;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let time = u.params.x;
    let distortion = u.params.y;
    let ring_radius = u.params.z;
    let ring_thickness = u.params.w;
    let opacity = u.effect_a.x;
    let refraction = u.effect_a.y;
    let distortion_scale = u.effect_a.z;
    let temporal = u.effect_a.w;
    let blur = u.effect_b.x;
    let chroma = u.effect_b.y;

    // Hollow ring: bright only near the nominal radius.
    let dist = length(in.local);
    let hollow = smoothstep(ring_radius - ring_thickness, ring_radius, dist)
        * (1.0 - smoothstep(ring_radius, ring_radius + ring_thickness, dist));

    // Fresnel, abs() so both faces of the double-sided mesh highlight.
    let view_dir = normalize(u.eye.xyz - in.world_pos);
    let facing = clamp(abs(dot(view_dir, in.normal)), 0.0, 1.0);
    let fresnel = pow(1.0 - facing, 3.0);

    // Screen-space noise, rotated over time and nudged by the surface
    // normal scaled with the refraction ratio.
    let uv = in.clip.xy / u.resolution.xy;
    let angle = time * 0.1;
    let rot = mat2x2<f32>(cos(angle), -sin(angle), sin(angle), cos(angle));
    var p = rot * (uv - vec2<f32>(0.5)) * distortion_scale;
    p = p + in.normal.xy * (1.0 - refraction);
    let n_r = wave_noise(p - vec2<f32>(chroma, 0.0), time, temporal);
    let n_g = wave_noise(p, time, temporal);
    let n_b = wave_noise(p + vec2<f32>(chroma, 0.0), time, temporal);

    var color = mix(vec3<f32>(0.6, 0.8, 1.0), vec3<f32>(1.0), fresnel * 0.5);
    color = color + vec3<f32>(
        sin(time * 0.5) * 0.1,
        cos(time * 0.3) * 0.1,
        sin(time * 0.7) * 0.1,
    );
    color = color + (vec3<f32>(n_r, n_g, n_b) - vec3<f32>(0.5)) * distortion * 0.3;

    let edge = smoothstep(0.0, 1.0, fresnel);
    let body = mix(0.15 * hollow + 0.15, 1.0, edge);
    let gate = mix(smoothstep(0.2, 0.8, n_g), 1.0, blur);
    let alpha = clamp(opacity * body * gate + hollow * opacity * 0.5, 0.0, 1.0);

    return vec4<f32>(color * alpha, alpha);
}
"#;

/// CPU mirror of the shader's uniform block; layout matches the WGSL struct
/// field for field.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlassUniforms {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub params: [f32; 4],
    pub effect_a: [f32; 4],
    pub effect_b: [f32; 4],
    pub resolution: [f32; 4],
}

impl GlassUniforms {
    pub fn from_config(
        config: &OverlayConfig,
        opacity: f32,
        ring_thickness: f32,
        distortion: f32,
    ) -> Self {
        Self {
            mvp: glam::Mat4::IDENTITY.to_cols_array_2d(),
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0, 0.0, 10.0, 0.0],
            params: [0.0, distortion, config.ring_radius, ring_thickness],
            effect_a: [
                opacity,
                config.refraction_ratio,
                config.distortion_scale,
                config.temporal_distortion,
            ],
            effect_b: [
                config.blur_strength,
                config.chromatic_offset,
                1.0 / config.outer_radius,
                0.0,
            ],
            resolution: [1.0, 1.0, 0.0, 0.0],
        }
    }
}

pub fn vertex_layout<'a>() -> wgpu::VertexBufferLayout<'a> {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

pub fn create_bind_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("glass-bind-layout"),
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
    })
}

/// Additive, no depth write, both faces: the original material settings.
pub fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    bind_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("glass-shader"),
        source: wgpu::ShaderSource::Wgsl(GLASS_SHADER.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("glass-layout"),
        bind_group_layouts: &[bind_layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("glass"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout()],
            compilation_options: Default::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
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
            })],
            compilation_options: Default::default(),
        }),
        multiview: None,
        cache: None,
    })
}

pub fn create_uniform_buffer(device: &wgpu::Device, uniforms: &GlassUniforms) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("glass-uniforms"),
        contents: bytemuck::bytes_of(uniforms),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::{mix, smoothstep};

    /// Scalar mirror of the shader's alpha combination.
    fn glass_alpha(fresnel: f32, noise: f32, hollow: f32, opacity: f32, blur: f32) -> f32 {
        let edge = smoothstep(0.0, 1.0, fresnel);
        let body = mix(0.15 * hollow + 0.15, 1.0, edge);
        let gate = mix(smoothstep(0.2, 0.8, noise), 1.0, blur);
        (opacity * body * gate + hollow * opacity * 0.5).clamp(0.0, 1.0)
    }

    #[test]
    fn alpha_stays_in_unit_interval_over_the_whole_domain() {
        for f in 0..=10 {
            for n in 0..=10 {
                for h in 0..=10 {
                    for b in 0..=4 {
                        let alpha = glass_alpha(
                            f as f32 / 10.0,
                            n as f32 / 10.0,
                            h as f32 / 10.0,
                            1.0,
                            b as f32 / 4.0,
                        );
                        assert!((0.0..=1.0).contains(&alpha), "alpha {alpha} escaped");
                    }
                }
            }
        }
    }

    #[test]
    fn edges_are_more_opaque_than_faces() {
        let face = glass_alpha(0.0, 0.5, 0.0, 0.5, 0.0);
        let edge = glass_alpha(1.0, 0.5, 0.0, 0.5, 0.0);
        assert!(edge > face);
    }

    #[test]
    fn noise_gate_can_thin_the_body() {
        let foggy = glass_alpha(0.2, 0.0, 0.0, 0.5, 0.0);
        let clear = glass_alpha(0.2, 1.0, 0.0, 0.5, 0.0);
        assert!(foggy < clear);
    }

    #[test]
    fn blur_bypasses_the_noise_gate() {
        let gated = glass_alpha(0.2, 0.0, 0.0, 0.5, 0.0);
        let blurred = glass_alpha(0.2, 0.0, 0.0, 0.5, 1.0);
        assert!(blurred > gated);
    }

    #[test]
    fn uniform_block_matches_wgsl_size() {
        // 2 mat4 + 5 vec4.
        assert_eq!(std::mem::size_of::<GlassUniforms>(), 2 * 64 + 5 * 16);
    }

    #[test]
    fn hollow_mask_peaks_on_the_ring() {
        let hollow = |dist: f32, r: f32, t: f32| {
            smoothstep(r - t, r, dist) * (1.0 - smoothstep(r, r + t, dist))
        };
        assert_eq!(hollow(0.7, 0.7, 0.05), 1.0);
        assert_eq!(hollow(0.0, 0.7, 0.05), 0.0);
        assert_eq!(hollow(1.0, 0.7, 0.05), 0.0);
        assert!(hollow(0.68, 0.7, 0.05) > 0.0);
    }
}
