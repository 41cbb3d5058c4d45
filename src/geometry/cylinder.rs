//! Unit cylinder: radius 1, axis along y from -1 to 1.
//!
//! Vertices come in three disjoint groups: the top cap (centre plus `rings`
//! concentric circles per meridian), the base cap laid out the same way and
//! mirrored in x so its strips face down, and the side wall (`stacks + 1`
//! levels per meridian). Every group samples `slices + 1` meridians.
//!
//! Indices form `3 * slices` strips addressed through the [`DrawBatch`]:
//! `slices` for the top, `slices` for the base, `slices` for the side.

use std::f32::consts::TAU;

use super::{DEFAULT_SLICES, DrawBatch, Resolution, Surface, VertexAttributes, clamp_dim, push_vertex, seam_s};

pub const MIN_SLICES: u32 = 3;
pub const MIN_STACKS: u32 = 1;
pub const MIN_RINGS: u32 = 1;

#[derive(Debug)]
pub struct Cylinder;

impl Cylinder {
    /// Vertices in one cap, centre included.
    fn cap_vertices(res: Resolution) -> u32 {
        (res.slices + 1) * res.rings + 1
    }

    pub fn cap_strip_len(res: Resolution) -> u32 {
        2 * res.rings + 1
    }

    pub fn side_strip_len(res: Resolution) -> u32 {
        2 * res.stacks + 2
    }

    /// Index of the first side-wall vertex.
    pub fn side_start(res: Resolution) -> usize {
        2 * Self::cap_vertices(res) as usize
    }

    pub fn num_draws(res: Resolution) -> usize {
        3 * res.slices as usize
    }
}

impl Surface for Cylinder {
    type Index = u32;

    const NAME: &'static str = "cylinder";
    const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;
    const STRIP_INDEX_FORMAT: Option<wgpu::IndexFormat> = None;

    fn clamp(requested: Resolution) -> Resolution {
        Resolution::new(
            clamp_dim(requested.slices, MIN_SLICES),
            clamp_dim(requested.stacks, MIN_STACKS),
            clamp_dim(requested.rings, MIN_RINGS),
        )
    }

    fn with_defaults(requested: Resolution) -> Resolution {
        let slices = match requested.slices {
            0 => DEFAULT_SLICES,
            s => s,
        };
        Self::clamp(Resolution { slices, ..requested })
    }

    fn num_vertices(res: Resolution) -> usize {
        (2 * Self::cap_vertices(res) + (res.slices + 1) * (res.stacks + 1)) as usize
    }

    fn num_elements(res: Resolution) -> usize {
        (res.slices * (2 * Self::cap_strip_len(res) + Self::side_strip_len(res))) as usize
    }

    fn write_vertices(res: Resolution, attributes: VertexAttributes, out: &mut Vec<f32>) {
        let mut top = Vec::with_capacity(Self::cap_vertices(res) as usize * attributes.stride());
        let mut base = Vec::with_capacity(top.capacity());
        let mut side = Vec::with_capacity((res.slices + 1) as usize * (res.stacks + 1) as usize * attributes.stride());

        push_vertex(&mut top, attributes, [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
        push_vertex(&mut base, attributes, [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.5, 0.5]);

        for i in 0..=res.slices {
            // theta runs counterclockwise seen from above, starting on -z
            let theta = i as f32 * TAU / res.slices as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for j in 0..res.rings {
                let radius = (j + 1) as f32 / res.rings as f32;
                let (x, z) = (-sin_theta * radius, -cos_theta * radius);
                push_vertex(
                    &mut top,
                    attributes,
                    [x, 1.0, z],
                    [0.0, 1.0, 0.0],
                    [x * 0.5 + 0.5, z * 0.5 + 0.5],
                );
                push_vertex(
                    &mut base,
                    attributes,
                    [-x, -1.0, z],
                    [0.0, -1.0, 0.0],
                    [-x * 0.5 + 0.5, z * 0.5 + 0.5],
                );
            }

            let s = seam_s(i, res.slices);
            for j in 0..=res.stacks {
                let frac_j = j as f32 / res.stacks as f32;
                push_vertex(
                    &mut side,
                    attributes,
                    [-sin_theta, 1.0 - 2.0 * frac_j, -cos_theta],
                    [-sin_theta, 0.0, -cos_theta],
                    [s, 1.0 - frac_j],
                );
            }
        }

        out.reserve(top.len() + base.len() + side.len());
        out.extend_from_slice(&top);
        out.extend_from_slice(&base);
        out.extend_from_slice(&side);
    }

    fn write_indices(res: Resolution, out: &mut Vec<u32>) {
        out.reserve(Self::num_elements(res));
        let cap = Self::cap_vertices(res);
        for face in 0..2 {
            let centre = face * cap;
            let mut this_slice = centre + 1;
            let mut next_slice = centre + 1 + res.rings;
            for _ in 0..res.slices {
                out.push(centre);
                for _ in 0..res.rings {
                    out.push(this_slice);
                    out.push(next_slice);
                    this_slice += 1;
                    next_slice += 1;
                }
            }
        }

        let side_start = Self::side_start(res) as u32;
        let mut this_slice = side_start;
        let mut next_slice = side_start + res.stacks + 1;
        for _ in 0..res.slices {
            for _ in 0..=res.stacks {
                out.push(next_slice);
                out.push(this_slice);
                this_slice += 1;
                next_slice += 1;
            }
        }
    }

    fn draw_batch(res: Resolution) -> DrawBatch {
        let slices = res.slices as usize;
        let caps = std::iter::repeat_n(Self::cap_strip_len(res), 2 * slices);
        let sides = std::iter::repeat_n(Self::side_strip_len(res), slices);
        DrawBatch::from_strip_lengths(caps.chain(sides), slices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_cover_the_index_array_exactly() {
        let res = Resolution::new(7, 3, 2);
        let batch = Cylinder::draw_batch(res);
        assert_eq!(batch.len(), Cylinder::num_draws(res));
        let last = batch.len() - 1;
        assert_eq!(batch.index_range(last).end as usize, Cylinder::num_elements(res));
    }

    #[test]
    fn only_slices_default_when_zero() {
        assert_eq!(Cylinder::with_defaults(Resolution::default()), Resolution::new(6, 1, 1));
    }
}
