//! Unit sphere centred at the origin, poles on the y-axis.
//!
//! Vertex 0 is the north pole, vertex 1 the south pole, followed slice by
//! slice by the `stacks - 1` interior vertices of each of the `slices + 1`
//! meridians (the last meridian duplicates the first for texture wrapping).
//! Each slice is one triangle strip from pole to pole, terminated by the
//! 16-bit restart index.
//!
//! `rings` is ignored and always stored as 0. The stack minimum is 2 on
//! remesh as well as on first tessellation.

use std::f32::consts::{PI, TAU};

use super::{DEFAULT_SLICES, DrawBatch, Resolution, Surface, VertexAttributes, clamp_dim, push_vertex, seam_s};

pub const MIN_SLICES: u32 = 3;
pub const MIN_STACKS: u32 = 2;
pub const DEFAULT_STACKS: u32 = 6;

/// Index value that starts a new triangle strip.
pub const RESTART_INDEX: u16 = u16::MAX;

#[derive(Debug)]
pub struct Sphere;

impl Surface for Sphere {
    type Index = u16;

    const NAME: &'static str = "sphere";
    const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint16;
    const STRIP_INDEX_FORMAT: Option<wgpu::IndexFormat> = Some(wgpu::IndexFormat::Uint16);

    fn clamp(requested: Resolution) -> Resolution {
        Resolution::sphere(
            clamp_dim(requested.slices, MIN_SLICES),
            clamp_dim(requested.stacks, MIN_STACKS),
        )
    }

    fn with_defaults(requested: Resolution) -> Resolution {
        let slices = match requested.slices {
            0 => DEFAULT_SLICES,
            s => s,
        };
        let stacks = match requested.stacks {
            0 => DEFAULT_STACKS,
            s => s,
        };
        Self::clamp(Resolution::sphere(slices, stacks))
    }

    fn normalize(requested: Resolution) -> Resolution {
        Resolution::sphere(requested.slices, requested.stacks)
    }

    fn num_vertices(res: Resolution) -> usize {
        ((res.slices + 1) * res.stacks.saturating_sub(1) + 2) as usize
    }

    fn num_elements(res: Resolution) -> usize {
        (res.slices * (2 * res.stacks + 1)) as usize
    }

    fn write_vertices(res: Resolution, attributes: VertexAttributes, out: &mut Vec<f32>) {
        assert_clamped(res);
        out.reserve(Self::num_vertices(res) * attributes.stride());
        push_vertex(out, attributes, [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.5, 1.0]);
        push_vertex(out, attributes, [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.5, 0.0]);

        for i in 0..=res.slices {
            // theta runs counterclockwise seen from above, starting on -z
            let theta = (i % res.slices) as f32 * TAU / res.slices as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let s = seam_s(i, res.slices);
            for j in 1..res.stacks {
                let frac_j = j as f32 / res.stacks as f32;
                let (sin_phi, cos_phi) = (frac_j * PI).sin_cos();
                let position = [-sin_theta * sin_phi, cos_phi, -cos_theta * sin_phi];
                push_vertex(out, attributes, position, position, [s, 1.0 - frac_j]);
            }
        }
    }

    fn write_indices(res: Resolution, out: &mut Vec<u16>) {
        assert_clamped(res);
        out.reserve(Self::num_elements(res));
        let ring = (res.stacks - 1) as u16;
        for i in 0..res.slices as u16 {
            let mut this_slice = i * ring + 2;
            let mut next_slice = (i + 1) * ring + 2;
            out.push(0);
            for _ in 1..res.stacks {
                out.push(this_slice);
                out.push(next_slice);
                this_slice += 1;
                next_slice += 1;
            }
            out.push(1);
            out.push(RESTART_INDEX);
        }
    }

    fn draw_batch(res: Resolution) -> DrawBatch {
        DrawBatch::single(Self::num_elements(res) as u32)
    }
}

fn assert_clamped(res: Resolution) {
    assert_eq!(
        Sphere::clamp(res),
        Sphere::normalize(res),
        "sphere tessellated at an unclamped resolution"
    );
}
