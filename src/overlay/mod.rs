//! The decorative glass-hexagon overlay: one extruded ring mesh drawn once
//! per placement, composited over the page content and never receiving
//! input.
//!
//! The mesh is fixed at construction; per frame the driver only rewrites
//! each instance's uniform block (time plus the matrices derived from the
//! absolute spin angle).

pub mod glass;
pub mod instances;
pub mod shape;

use anyhow::Result;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::config::OverlayConfig;
use glass::GlassUniforms;
use instances::{HexInstance, PLACEMENTS};
use shape::{extrude_ring, hexagon_ring, ExtrudeOptions};

const CAMERA_EYE: Vec3 = Vec3::new(0.0, 0.0, 10.0);
// 45 degrees, the original camera fov.
const CAMERA_FOV_Y: f32 = std::f32::consts::FRAC_PI_4;

struct InstanceSlot {
    descriptor: HexInstance,
    uniforms: GlassUniforms,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct GlassOverlay {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    slots: Vec<InstanceSlot>,
}

impl GlassOverlay {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        config: &OverlayConfig,
    ) -> Result<Self> {
        let outline = hexagon_ring(6, config.outer_radius, config.inner_ratio);
        let mesh = extrude_ring(&outline, &ExtrudeOptions::from_config(config))?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hexagon-vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hexagon-indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let bind_layout = glass::create_bind_layout(device);
        let pipeline = glass::create_pipeline(device, format, &bind_layout);

        let slots = PLACEMENTS
            .iter()
            .map(|descriptor| {
                let uniforms = GlassUniforms::from_config(
                    config,
                    descriptor.opacity,
                    descriptor.ring_thickness,
                    descriptor.distortion,
                );
                let buffer = glass::create_uniform_buffer(device, &uniforms);
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("glass-bind-group"),
                    layout: &bind_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                InstanceSlot {
                    descriptor: *descriptor,
                    uniforms,
                    buffer,
                    bind_group,
                }
            })
            .collect();

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            slots,
        })
    }

    /// Per-frame driver step: push elapsed time and the recomputed model
    /// matrices into every instance's uniform block. `elapsed` is seconds
    /// since the overlay mounted.
    pub fn advance(&mut self, queue: &wgpu::Queue, elapsed: f32, width: u32, height: u32) {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let proj = Mat4::perspective_rh(CAMERA_FOV_Y, aspect, 0.1, 100.0);
        let view = Mat4::look_at_rh(CAMERA_EYE, Vec3::ZERO, Vec3::Y);

        for slot in &mut self.slots {
            let model = slot.descriptor.model_matrix(elapsed);
            slot.uniforms.mvp = (proj * view * model).to_cols_array_2d();
            slot.uniforms.model = model.to_cols_array_2d();
            slot.uniforms.eye = [CAMERA_EYE.x, CAMERA_EYE.y, CAMERA_EYE.z, 0.0];
            slot.uniforms.params[0] = elapsed;
            slot.uniforms.resolution = [width.max(1) as f32, height.max(1) as f32, 0.0, 0.0];
            queue.write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&slot.uniforms));
        }
    }

    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glass-overlay"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for slot in &self.slots {
            pass.set_bind_group(0, &slot.bind_group, &[]);
            pass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }
}
