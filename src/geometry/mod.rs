//! Procedural tessellation of the unit sphere and the unit cylinder.
//!
//! A [`Mesh`] owns the CPU side of a shape: its [`Resolution`], which optional
//! vertex attributes are interleaved into the vertex array, the generated
//! vertex and index arrays and the [`DrawBatch`] describing the triangle-strip
//! runs inside the index array. The GPU side lives in
//! [`crate::resources::shape`].
//!
//! # Key types
//!
//! - [`Surface`] is implemented by [`sphere::Sphere`] and [`cylinder::Cylinder`]
//! - [`Mesh<S>`] holds generated data and performs (re)meshing
//! - [`DrawBatch`] is the per-strip (first index, element count) table
//!

pub mod cylinder;
pub mod sphere;

use std::{fmt::Debug, marker::PhantomData, ops::Range};

pub use cylinder::Cylinder;
pub use sphere::Sphere;

/// Largest value accepted for any resolution dimension.
///
/// Keeping every dimension below 256 lets the sphere address all of its
/// vertices with 16-bit indices while still reserving `u16::MAX` for restarts.
pub const MAX_RESOLUTION: u32 = 255;

/// Slice count used when a shape is initialized with a zero slice count.
pub const DEFAULT_SLICES: u32 = 6;

/// Tessellation parameters shared by all shapes.
///
/// `slices` counts azimuthal samples, `stacks` polar (sphere) or vertical
/// (cylinder) samples and `rings` the concentric radii of the cylinder caps.
/// The sphere ignores `rings` and always stores zero there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub slices: u32,
    pub stacks: u32,
    pub rings: u32,
}

impl Resolution {
    pub fn new(slices: u32, stacks: u32, rings: u32) -> Self {
        Self {
            slices,
            stacks,
            rings,
        }
    }

    /// Sphere resolution; spheres have no rings.
    pub fn sphere(slices: u32, stacks: u32) -> Self {
        Self::new(slices, stacks, 0)
    }

    /// Resolution where slices, stacks and rings are all `res`.
    pub fn uniform(res: u32) -> Self {
        Self::new(res, res, res)
    }
}

/// Which optional per-vertex fields are interleaved after the position.
///
/// Presence is fixed when a mesh is initialized and determines the stride:
/// 3 floats of position, then 3 of normal, then 2 of texture coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VertexAttributes {
    pub normals: bool,
    pub tex_coords: bool,
}

impl VertexAttributes {
    pub const POSITION_ONLY: Self = Self {
        normals: false,
        tex_coords: false,
    };
    pub const WITH_NORMALS: Self = Self {
        normals: true,
        tex_coords: false,
    };
    pub const ALL: Self = Self {
        normals: true,
        tex_coords: true,
    };

    /// Floats per vertex.
    pub fn stride(&self) -> usize {
        3 + if self.normals { 3 } else { 0 } + if self.tex_coords { 2 } else { 0 }
    }

    pub fn normal_offset(&self) -> usize {
        3
    }

    pub fn tex_offset(&self) -> usize {
        3 + if self.normals { 3 } else { 0 }
    }
}

/// A face subset of a shape for selective rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Top,
    Base,
    Side,
    All,
}

/// Explicit draw descriptors for the independent triangle strips of a mesh.
///
/// Two parallel lists sized to the strip count: `counts[i]` elements starting
/// at element `first_indices[i]` of the index array.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawBatch {
    counts: Vec<u32>,
    first_indices: Vec<u32>,
    strips_per_face: Option<usize>,
}

impl DrawBatch {
    /// One draw covering the whole index array (strips separated by restarts).
    pub fn single(count: u32) -> Self {
        Self {
            counts: vec![count],
            first_indices: vec![0],
            strips_per_face: None,
        }
    }

    /// Consecutive strips laid out in face order top, base, side, with
    /// `strips_per_face` strips in each face.
    pub fn from_strip_lengths(lengths: impl IntoIterator<Item = u32>, strips_per_face: usize) -> Self {
        let mut counts = Vec::new();
        let mut first_indices = Vec::new();
        let mut first = 0;
        for count in lengths {
            counts.push(count);
            first_indices.push(first);
            first += count;
        }
        Self {
            counts,
            first_indices,
            strips_per_face: Some(strips_per_face),
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn first_indices(&self) -> &[u32] {
        &self.first_indices
    }

    /// Byte offset of strip `i` inside an index buffer of `index_size`-byte elements.
    pub fn byte_offset(&self, i: usize, index_size: usize) -> wgpu::BufferAddress {
        (self.first_indices[i] as usize * index_size) as wgpu::BufferAddress
    }

    /// Index range of strip `i` inside the index buffer.
    pub fn index_range(&self, i: usize) -> Range<u32> {
        let first = self.first_indices[i];
        first..first + self.counts[i]
    }

    /// Strips covering `face`.
    ///
    /// Panics if a shape without faces is asked for anything but [`Face::All`].
    pub fn strips(&self, face: Face) -> Range<usize> {
        match (face, self.strips_per_face) {
            (Face::All, _) => 0..self.len(),
            (Face::Top, Some(n)) => 0..n,
            (Face::Base, Some(n)) => n..2 * n,
            (Face::Side, Some(n)) => 2 * n..3 * n,
            (face, None) => panic!("{:?} selected on a mesh without separate faces", face),
        }
    }

    /// Indirect draw arguments, one per strip.
    pub fn indirect_args(&self) -> Vec<wgpu::util::DrawIndexedIndirectArgs> {
        self.counts
            .iter()
            .zip(&self.first_indices)
            .map(|(&index_count, &first_index)| wgpu::util::DrawIndexedIndirectArgs {
                index_count,
                instance_count: 1,
                first_index,
                base_vertex: 0,
                first_instance: 0,
            })
            .collect()
    }
}

/// A parametric surface that can be tessellated into triangle strips.
///
/// All functions are pure in the [`Resolution`] and the enabled
/// [`VertexAttributes`], so regenerating with the same inputs reproduces
/// byte-identical arrays.
pub trait Surface {
    /// Element type of the index array.
    type Index: bytemuck::Pod + Copy + Debug + PartialEq;

    const NAME: &'static str;
    const INDEX_FORMAT: wgpu::IndexFormat;
    /// Strip format the pipeline must declare; `Some` enables primitive restart.
    const STRIP_INDEX_FORMAT: Option<wgpu::IndexFormat>;

    /// Saturate every dimension into its legal range.
    fn clamp(requested: Resolution) -> Resolution;

    /// Like [`Surface::clamp`] but replaces unset (zero) dimensions with defaults.
    fn with_defaults(requested: Resolution) -> Resolution;

    /// Zero the dimensions this surface does not tessellate along.
    fn normalize(requested: Resolution) -> Resolution {
        requested
    }

    fn num_vertices(res: Resolution) -> usize;

    fn num_elements(res: Resolution) -> usize;

    /// Append the interleaved vertex data.
    ///
    /// `res` must already be clamped; panics otherwise.
    fn write_vertices(res: Resolution, attributes: VertexAttributes, out: &mut Vec<f32>);

    /// Append the strip indices. `res` must already be clamped; panics otherwise.
    fn write_indices(res: Resolution, out: &mut Vec<Self::Index>);

    fn draw_batch(res: Resolution) -> DrawBatch;
}

/// Generated mesh data for one shape.
///
/// Created uninitialized; [`Mesh::initialize`] fixes the vertex attributes
/// and generates data, [`Mesh::remesh`] regenerates it for a new resolution.
/// `generation` increases every time data is regenerated.
#[derive(Debug)]
pub struct Mesh<S: Surface> {
    resolution: Resolution,
    attributes: Option<VertexAttributes>,
    vertices: Vec<f32>,
    indices: Vec<S::Index>,
    batch: DrawBatch,
    generation: u64,
    _surface: PhantomData<S>,
}

pub type SphereMesh = Mesh<Sphere>;
pub type CylinderMesh = Mesh<Cylinder>;

impl<S: Surface> Mesh<S> {
    /// An uninitialized mesh remembering the requested resolution.
    ///
    /// No clamping happens until [`Mesh::initialize`].
    pub fn new(requested: Resolution) -> Self {
        Self {
            resolution: requested,
            attributes: None,
            vertices: Vec::new(),
            indices: Vec::new(),
            batch: DrawBatch::default(),
            generation: 0,
            _surface: PhantomData,
        }
    }

    /// Fix the attribute set, settle the resolution and generate data.
    pub fn initialize(&mut self, attributes: VertexAttributes) {
        self.attributes = Some(attributes);
        self.resolution = S::with_defaults(self.resolution);
        self.regenerate();
    }

    /// Change the resolution.
    ///
    /// Returns `false` without touching any data when `requested` equals the
    /// current resolution in every dimension the surface uses. Otherwise the
    /// resolution is clamped and, if the mesh is initialized, the data
    /// regenerated.
    pub fn remesh(&mut self, requested: Resolution) -> bool {
        let requested = S::normalize(requested);
        if requested == self.resolution {
            return false;
        }
        self.resolution = S::clamp(requested);
        if self.is_initialized() {
            self.regenerate();
        }
        true
    }

    fn regenerate(&mut self) {
        let attributes = self.attributes.unwrap_or_default();
        self.vertices.clear();
        self.indices.clear();
        S::write_vertices(self.resolution, attributes, &mut self.vertices);
        S::write_indices(self.resolution, &mut self.indices);
        self.batch = S::draw_batch(self.resolution);
        self.generation += 1;
        debug_assert_eq!(self.vertices.len(), self.num_vertices() * attributes.stride());
        debug_assert_eq!(self.indices.len(), self.num_elements());
        log::debug!(
            "{} tessellated at {:?}: {} vertices, {} elements",
            S::NAME,
            self.resolution,
            self.num_vertices(),
            self.num_elements()
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.attributes.is_some()
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn attributes(&self) -> Option<VertexAttributes> {
        self.attributes
    }

    pub fn num_vertices(&self) -> usize {
        S::num_vertices(self.resolution)
    }

    pub fn num_elements(&self) -> usize {
        S::num_elements(self.resolution)
    }

    /// Interleaved vertex data, `stride` floats per vertex.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &[S::Index] {
        &self.indices
    }

    pub fn draw_batch(&self) -> &DrawBatch {
        &self.batch
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Floats of vertex `i`; empty if the mesh has not been generated.
    pub fn vertex(&self, i: usize) -> &[f32] {
        let stride = self.attributes.unwrap_or_default().stride();
        self.vertices.get(i * stride..(i + 1) * stride).unwrap_or(&[])
    }
}

pub(crate) fn clamp_dim(value: u32, min: u32) -> u32 {
    value.clamp(min, MAX_RESOLUTION)
}

/// Writes one interleaved vertex.
pub(crate) fn push_vertex(
    out: &mut Vec<f32>,
    attributes: VertexAttributes,
    position: [f32; 3],
    normal: [f32; 3],
    tex_coords: [f32; 2],
) {
    out.extend_from_slice(&position);
    if attributes.normals {
        out.extend_from_slice(&normal);
    }
    if attributes.tex_coords {
        out.extend_from_slice(&tex_coords);
    }
}

/// Texture `s` coordinate of slice `i`; the seam column gets exactly 1.
pub(crate) fn seam_s(i: u32, slices: u32) -> f32 {
    if i == slices {
        1.0
    } else {
        i as f32 / slices as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_follows_enabled_attributes() {
        assert_eq!(VertexAttributes::POSITION_ONLY.stride(), 3);
        assert_eq!(VertexAttributes::WITH_NORMALS.stride(), 6);
        assert_eq!(
            VertexAttributes {
                normals: false,
                tex_coords: true
            }
            .stride(),
            5
        );
        assert_eq!(VertexAttributes::ALL.stride(), 8);
        assert_eq!(VertexAttributes::ALL.tex_offset(), 6);
    }

    #[test]
    fn batch_faces_split_into_thirds() {
        let batch = DrawBatch::from_strip_lengths([3, 3, 5, 5, 4, 4], 2);
        assert_eq!(batch.strips(Face::Top), 0..2);
        assert_eq!(batch.strips(Face::Base), 2..4);
        assert_eq!(batch.strips(Face::Side), 4..6);
        assert_eq!(batch.strips(Face::All), 0..6);
        assert_eq!(batch.first_indices(), &[0, 3, 6, 11, 16, 20]);
        assert_eq!(batch.index_range(3), 11..16);
        assert_eq!(batch.byte_offset(3, 4), 44);
    }

    #[test]
    #[should_panic]
    fn single_batch_has_no_faces() {
        DrawBatch::single(10).strips(Face::Side);
    }
}
