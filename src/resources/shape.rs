//! GPU storage for a tessellated shape.
//!
//! A [`Shape`] pairs a [`Mesh`] with the buffers the renderer draws from:
//! the interleaved vertex buffer, the index buffer and, on the indirect path,
//! one [`wgpu::util::DrawIndexedIndirectArgs`] per strip. Storage is
//! allocated when attribute locations are first bound; later remeshes write
//! into the same buffers whenever the byte sizes are unchanged and
//! reallocate otherwise.
//!
//! Rendering before binding, and face subsets on the indirect path, are
//! programming errors and panic.

use std::borrow::Cow;

use wgpu::util::DeviceExt;

use crate::{
    config::DrawPath,
    data_structures::vertex::{AttributeSlots, VertexLayout},
    geometry::{Cylinder, Face, Mesh, Resolution, Sphere, Surface},
};

/// Pad `bytes` to [`wgpu::COPY_BUFFER_ALIGNMENT`].
fn aligned(bytes: &[u8]) -> Cow<'_, [u8]> {
    let align = wgpu::COPY_BUFFER_ALIGNMENT as usize;
    let rem = bytes.len() % align;
    if rem == 0 {
        Cow::Borrowed(bytes)
    } else {
        let mut padded = bytes.to_vec();
        padded.resize(bytes.len() + align - rem, 0);
        Cow::Owned(padded)
    }
}

/// Write `contents` into `buffer` if it has exactly the padded size, else
/// replace it by a new buffer. Returns whether a new buffer was created.
fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    buffer: &mut Option<wgpu::Buffer>,
    label: &str,
    contents: &[u8],
    usage: wgpu::BufferUsages,
) -> bool {
    let contents = aligned(contents);
    match buffer {
        Some(existing) if existing.size() == contents.len() as wgpu::BufferAddress => {
            queue.write_buffer(existing, 0, &contents);
            false
        }
        _ => {
            if let Some(old) = buffer.take() {
                old.destroy();
            }
            *buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: &contents,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            }));
            true
        }
    }
}

#[derive(Debug)]
struct GpuStorage {
    layout: VertexLayout,
    vertex: Option<wgpu::Buffer>,
    index: Option<wgpu::Buffer>,
    indirect: Option<wgpu::Buffer>,
    /// Mesh generation last uploaded.
    generation: u64,
}

/// Geometry Buffer Manager for one shape.
///
/// Owns its buffers exclusively and destroys them when dropped. Not `Clone`:
/// a second handle would free the same GPU memory.
#[derive(Debug)]
pub struct Shape<S: Surface> {
    label: String,
    mesh: Mesh<S>,
    draw_path: DrawPath,
    gpu: Option<GpuStorage>,
}

pub type SphereShape = Shape<Sphere>;
pub type CylinderShape = Shape<Cylinder>;

impl<S: Surface> Shape<S> {
    /// An unbound shape; nothing is generated or allocated yet.
    pub fn new(label: impl Into<String>, resolution: Resolution, draw_path: DrawPath) -> Self {
        Self {
            label: label.into(),
            mesh: Mesh::new(resolution),
            draw_path,
            gpu: None,
        }
    }

    /// Generate the mesh for `slots` and allocate its storage.
    ///
    /// Binding the same slots again keeps the existing storage. Binding
    /// different slots regenerates the mesh with the new attribute set.
    pub fn initialize_attrib_locations(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slots: AttributeSlots,
    ) {
        if let Some(gpu) = &self.gpu {
            if gpu.layout.slots() == slots {
                log::debug!("{} already bound to {:?}", self.label, slots);
                return;
            }
        }
        self.mesh.initialize(slots.attributes());
        let mut gpu = self.gpu.take().unwrap_or_else(|| GpuStorage {
            layout: slots.layout(),
            vertex: None,
            index: None,
            indirect: None,
            generation: 0,
        });
        gpu.layout = slots.layout();
        self.gpu = Some(gpu);
        self.upload(device, queue);
        log::info!(
            "{} bound to {:?} at {:?}",
            self.label,
            slots,
            self.mesh.resolution()
        );
    }

    /// Regenerate for `resolution` and re-upload; returns `false` if nothing changed.
    pub fn remesh(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, resolution: Resolution) -> bool {
        if !self.mesh.remesh(resolution) {
            return false;
        }
        if self.gpu.is_some() {
            self.upload(device, queue);
        }
        true
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let mut reallocated = upload(
            device,
            queue,
            &mut gpu.vertex,
            &format!("{} Vertex Buffer", self.label),
            bytemuck::cast_slice(self.mesh.vertices()),
            wgpu::BufferUsages::VERTEX,
        );
        reallocated |= upload(
            device,
            queue,
            &mut gpu.index,
            &format!("{} Index Buffer", self.label),
            bytemuck::cast_slice(self.mesh.indices()),
            wgpu::BufferUsages::INDEX,
        );
        if self.draw_path == DrawPath::Indirect {
            let args: Vec<u8> = self
                .mesh
                .draw_batch()
                .indirect_args()
                .iter()
                .flat_map(|args| args.as_bytes().iter().copied())
                .collect();
            reallocated |= upload(
                device,
                queue,
                &mut gpu.indirect,
                &format!("{} Indirect Buffer", self.label),
                &args,
                wgpu::BufferUsages::INDIRECT,
            );
        }
        gpu.generation = self.mesh.generation();
        log::debug!(
            "{} uploaded generation {}{}",
            self.label,
            gpu.generation,
            if reallocated { " into new storage" } else { "" }
        );
    }

    fn bound(&self) -> (&wgpu::Buffer, &wgpu::Buffer) {
        let gpu = self
            .gpu
            .as_ref()
            .unwrap_or_else(|| panic!("{} rendered before its attribute locations were bound", self.label));
        match (&gpu.vertex, &gpu.index) {
            (Some(vertex), Some(index)) => (vertex, index),
            _ => panic!("{} has no storage", self.label),
        }
    }

    /// Draw every strip of the shape.
    ///
    /// The caller sets the pipeline and bind groups; the pipeline's strip
    /// index format must be [`Surface::STRIP_INDEX_FORMAT`].
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        let (vertex, index) = self.bound();
        pass.set_vertex_buffer(0, vertex.slice(..));
        pass.set_index_buffer(index.slice(..), S::INDEX_FORMAT);
        let batch = self.mesh.draw_batch();
        match (self.draw_path, self.gpu.as_ref().and_then(|gpu| gpu.indirect.as_ref())) {
            (DrawPath::Indirect, Some(indirect)) => {
                pass.multi_draw_indexed_indirect(indirect, 0, batch.len() as u32);
            }
            _ => {
                for strip in batch.strips(Face::All) {
                    pass.draw_indexed(batch.index_range(strip), 0, 0..1);
                }
            }
        }
    }

    /// Draw only the strips of `face`.
    ///
    /// Panics on the indirect path, and for shapes without faces unless
    /// `face` is [`Face::All`].
    pub fn render_subset(&self, pass: &mut wgpu::RenderPass<'_>, face: Face) {
        assert!(
            self.draw_path != DrawPath::Indirect,
            "{}: face subsets need the immediate draw path",
            self.label
        );
        let (vertex, index) = self.bound();
        pass.set_vertex_buffer(0, vertex.slice(..));
        pass.set_index_buffer(index.slice(..), S::INDEX_FORMAT);
        let batch = self.mesh.draw_batch();
        for strip in batch.strips(face) {
            pass.draw_indexed(batch.index_range(strip), 0, 0..1);
        }
    }

    pub fn is_bound(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn mesh(&self) -> &Mesh<S> {
        &self.mesh
    }

    pub fn draw_path(&self) -> DrawPath {
        self.draw_path
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Mesh generation currently in GPU storage, `None` before binding.
    pub fn uploaded_generation(&self) -> Option<u64> {
        self.gpu.as_ref().map(|gpu| gpu.generation)
    }

    /// Byte sizes of the vertex, index and indirect buffers.
    pub fn buffer_sizes(&self) -> Option<[wgpu::BufferAddress; 3]> {
        let gpu = self.gpu.as_ref()?;
        let size = |buffer: &Option<wgpu::Buffer>| buffer.as_ref().map_or(0, |b| b.size());
        Some([size(&gpu.vertex), size(&gpu.index), size(&gpu.indirect)])
    }
}

impl Shape<Cylinder> {
    pub fn render_top(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.render_subset(pass, Face::Top);
    }

    pub fn render_base(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.render_subset(pass, Face::Base);
    }

    pub fn render_side(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.render_subset(pass, Face::Side);
    }
}

impl<S: Surface> Drop for Shape<S> {
    fn drop(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            for buffer in [gpu.vertex, gpu.index, gpu.indirect].into_iter().flatten() {
                buffer.destroy();
            }
        }
    }
}
