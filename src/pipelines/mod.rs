//! Render pipelines for the lit scene.
//!
//! - `phong` builds the Phong/Gouraud pipelines and the per-object uniform
//! - `light` holds the light and material tables and their uniform buffer
//!
//! Every combination of shading model, strip restart format and raster
//! toggles is its own [`wgpu::RenderPipeline`]. [`Pipelines`] creates them on
//! first use and keeps them for the lifetime of the device.

pub mod light;
pub mod phong;

use std::collections::HashMap;

use crate::{config::ShadingModel, data_structures::vertex::VertexLayout};

/// Everything that selects a pipeline variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub shading: ShadingModel,
    /// `Some` enables primitive restart for this index format.
    pub strip_index_format: Option<wgpu::IndexFormat>,
    pub wireframe: bool,
    pub cull_back_faces: bool,
}

#[derive(Debug)]
pub struct Pipelines {
    layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    vertex_layout: VertexLayout,
    supports_wireframe: bool,
    cache: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        vertex_layout: VertexLayout,
        bind_group_layouts: [&wgpu::BindGroupLayout; 3],
    ) -> Self {
        let [camera, light, object] = bind_group_layouts;
        Self {
            layout: phong::mk_pipeline_layout(device, camera, light, object),
            shader: phong::mk_shader(device),
            color_format,
            vertex_layout,
            supports_wireframe: device.features().contains(wgpu::Features::POLYGON_MODE_LINE),
            cache: HashMap::new(),
        }
    }

    pub fn supports_wireframe(&self) -> bool {
        self.supports_wireframe
    }

    /// The key actually used for `key`: wireframe is dropped without device support.
    pub fn effective(&self, mut key: PipelineKey) -> PipelineKey {
        key.wireframe &= self.supports_wireframe;
        key
    }

    /// Create the variant for `key` if needed and return its effective key.
    pub fn prepare(&mut self, device: &wgpu::Device, key: PipelineKey) -> PipelineKey {
        let key = self.effective(key);
        if !self.cache.contains_key(&key) {
            let pipeline = phong::mk_phong_pipeline(
                device,
                &self.layout,
                &self.shader,
                self.color_format,
                &self.vertex_layout,
                key,
            );
            self.cache.insert(key, pipeline);
        }
        key
    }

    /// A variant previously created with [`Pipelines::prepare`].
    pub fn get(&self, key: PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.cache.get(&self.effective(key))
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
