//! Hexagon-ring silhouette and its extruded, beveled prism mesh.
//!
//! The outline is the pure part: a regular polygon boundary plus a scaled
//! concentric hole, both in insertion order. The mesh builder tessellates
//! the flat ring caps with lyon (outer boundary and hole as one even-odd
//! path) and lofts the side walls, approximating the bevel with a
//! quarter-circle profile of `bevel_segments` rings.

use std::f32::consts::{FRAC_PI_2, TAU};

use anyhow::{anyhow, Result};
use lyon::math::point;
use lyon::path::Path as LyonPath;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers,
};

use crate::config::OverlayConfig;

/// Closed outer boundary plus concentric inner hole, shared vertex count and
/// angular offsets. Degenerate inputs (ratio ≥ 1, radius ≤ 0) are a caller
/// contract violation and produce garbage geometry, not an error.
#[derive(Debug, Clone)]
pub struct RingOutline {
    outer: Vec<[f32; 2]>,
    inner: Vec<[f32; 2]>,
}

pub fn hexagon_ring(sides: u32, outer_radius: f32, inner_ratio: f32) -> RingOutline {
    let boundary = |radius: f32| {
        (0..sides)
            .map(|i| {
                let angle = i as f32 / sides as f32 * TAU;
                [angle.cos() * radius, angle.sin() * radius]
            })
            .collect()
    };
    RingOutline {
        outer: boundary(outer_radius),
        inner: boundary(outer_radius * inner_ratio),
    }
}

impl RingOutline {
    pub fn outer(&self) -> &[[f32; 2]] {
        &self.outer
    }

    pub fn inner(&self) -> &[[f32; 2]] {
        &self.inner
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExtrudeOptions {
    pub depth: f32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: u32,
}

impl ExtrudeOptions {
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self {
            depth: config.depth,
            bevel_enabled: config.bevel_enabled,
            bevel_thickness: config.bevel_thickness,
            bevel_size: config.bevel_size,
            bevel_segments: config.bevel_segments,
        }
    }
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            depth: 0.2,
            bevel_enabled: true,
            bevel_thickness: 0.1,
            bevel_size: 0.1,
            bevel_segments: 3,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// One step of the side-wall profile: radial expansion and z position.
#[derive(Debug, Clone, Copy)]
struct ProfilePoint {
    expand: f32,
    z: f32,
    /// Blend from radial (0) toward the cap normal (±1) for the bevel curve.
    tilt: f32,
}

pub fn extrude_ring(outline: &RingOutline, opts: &ExtrudeOptions) -> Result<MeshData> {
    let mut mesh = MeshData::default();
    let half = opts.depth * 0.5;
    let cap_z = if opts.bevel_enabled {
        half + opts.bevel_thickness
    } else {
        half
    };

    tessellate_cap(outline, cap_z, &mut mesh)?;

    let profile = side_profile(opts, half);
    loft_walls(outline.outer(), &profile, 1.0, &mut mesh);
    loft_walls(outline.inner(), &profile, -1.0, &mut mesh);

    Ok(mesh)
}

/// Both flat ring faces: one even-odd lyon path (boundary plus hole),
/// instanced at +cap_z and mirrored at -cap_z.
fn tessellate_cap(outline: &RingOutline, cap_z: f32, mesh: &mut MeshData) -> Result<()> {
    let mut builder = LyonPath::builder();
    for ring in [outline.outer(), outline.inner()] {
        builder.begin(point(ring[0][0], ring[0][1]));
        for p in &ring[1..] {
            builder.line_to(point(p[0], p[1]));
        }
        builder.end(true);
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    tessellator
        .tessellate_path(
            &path,
            &FillOptions::default(),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                vertex.position().to_array()
            }),
        )
        .map_err(|err| anyhow!("cap tessellation failed: {err:?}"))?;

    for z_sign in [1.0f32, -1.0] {
        let base = mesh.vertices.len() as u32;
        for p in &buffers.vertices {
            mesh.vertices.push(MeshVertex {
                position: [p[0], p[1], cap_z * z_sign],
                normal: [0.0, 0.0, z_sign],
            });
        }
        for tri in buffers.indices.chunks_exact(3) {
            if z_sign > 0.0 {
                mesh.indices
                    .extend([base + tri[0], base + tri[1], base + tri[2]]);
            } else {
                // Mirror flips the winding.
                mesh.indices
                    .extend([base + tri[0], base + tri[2], base + tri[1]]);
            }
        }
    }
    Ok(())
}

/// Profile from the front cap over the body to the back cap, symmetric in z.
fn side_profile(opts: &ExtrudeOptions, half: f32) -> Vec<ProfilePoint> {
    let mut profile = Vec::new();
    if opts.bevel_enabled && opts.bevel_segments > 0 {
        let segments = opts.bevel_segments;
        for s in 0..=segments {
            let t = s as f32 / segments as f32;
            let angle = t * FRAC_PI_2;
            profile.push(ProfilePoint {
                expand: opts.bevel_size * angle.sin(),
                z: half + opts.bevel_thickness * angle.cos(),
                tilt: 1.0 - t,
            });
        }
        profile.push(ProfilePoint {
            expand: opts.bevel_size,
            z: -half,
            tilt: 0.0,
        });
        for s in 0..=segments {
            let t = s as f32 / segments as f32;
            let angle = (1.0 - t) * FRAC_PI_2;
            profile.push(ProfilePoint {
                expand: opts.bevel_size * angle.sin(),
                z: -half - opts.bevel_thickness * angle.cos(),
                tilt: -t,
            });
        }
    } else {
        profile.push(ProfilePoint {
            expand: 0.0,
            z: half,
            tilt: 0.0,
        });
        profile.push(ProfilePoint {
            expand: 0.0,
            z: -half,
            tilt: 0.0,
        });
    }
    profile
}

/// Loft one boundary along the profile. `radial_sign` is +1 for the outer
/// boundary (bevel grows outward) and -1 for the hole (bevel grows into it).
fn loft_walls(
    ring: &[[f32; 2]],
    profile: &[ProfilePoint],
    radial_sign: f32,
    mesh: &mut MeshData,
) {
    let count = ring.len() as u32;
    let base = mesh.vertices.len() as u32;

    for step in profile {
        for p in ring {
            let len = (p[0] * p[0] + p[1] * p[1]).sqrt().max(1e-6);
            let radial = [p[0] / len, p[1] / len];
            let expand = step.expand * radial_sign;
            let tilt = step.tilt;
            let planar = (1.0 - tilt.abs()).max(0.0);
            let normal = normalize([
                radial[0] * planar * radial_sign,
                radial[1] * planar * radial_sign,
                tilt,
            ]);
            mesh.vertices.push(MeshVertex {
                position: [p[0] + radial[0] * expand, p[1] + radial[1] * expand, step.z],
                normal,
            });
        }
    }

    let rows = profile.len() as u32;
    for row in 0..rows - 1 {
        for i in 0..count {
            let j = (i + 1) % count;
            let a = base + row * count + i;
            let b = base + row * count + j;
            let c = base + (row + 1) * count + i;
            let d = base + (row + 1) * count + j;
            if radial_sign > 0.0 {
                mesh.indices.extend([a, b, c, b, d, c]);
            } else {
                mesh.indices.extend([a, c, b, b, c, d]);
            }
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len <= 1e-6 {
        [0.0, 0.0, 1.0]
    } else {
        [v[0] / len, v[1] / len, v[2] / len]
    }
}
