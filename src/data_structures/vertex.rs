//! Attribute-slot binding for interleaved mesh vertices.

use crate::geometry::VertexAttributes;

/// Shader input locations for the per-vertex fields of a shape.
///
/// The position is always bound; normals and texture coordinates only when
/// a location is given. The presence of each optional location decides which
/// attributes the mesh interleaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttributeSlots {
    pub position: u32,
    pub normal: Option<u32>,
    pub tex_coords: Option<u32>,
}

impl AttributeSlots {
    /// The locations used by the Phong shaders.
    pub const PHONG: Self = Self {
        position: 0,
        normal: Some(1),
        tex_coords: None,
    };

    pub fn position_only(position: u32) -> Self {
        Self {
            position,
            normal: None,
            tex_coords: None,
        }
    }

    pub fn attributes(&self) -> VertexAttributes {
        VertexAttributes {
            normals: self.normal.is_some(),
            tex_coords: self.tex_coords.is_some(),
        }
    }

    pub fn layout(&self) -> VertexLayout {
        VertexLayout::new(*self)
    }
}

impl Default for AttributeSlots {
    fn default() -> Self {
        Self::PHONG
    }
}

/**
 * As vertex data is stored directly in GPU memory we need to tell what the bytes refer to:
 *
 * stride: `VertexAttributes::stride` floats
 * offsets: position at 0, normal after the position, texture coordinates last
 */
#[derive(Clone, Debug, PartialEq)]
pub struct VertexLayout {
    slots: AttributeSlots,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    pub fn new(slots: AttributeSlots) -> Self {
        let float = std::mem::size_of::<f32>() as wgpu::BufferAddress;
        let layout = slots.attributes();
        let mut attributes = vec![wgpu::VertexAttribute {
            offset: 0,
            shader_location: slots.position,
            format: wgpu::VertexFormat::Float32x3,
        }];
        if let Some(location) = slots.normal {
            attributes.push(wgpu::VertexAttribute {
                offset: layout.normal_offset() as wgpu::BufferAddress * float,
                shader_location: location,
                format: wgpu::VertexFormat::Float32x3,
            });
        }
        if let Some(location) = slots.tex_coords {
            attributes.push(wgpu::VertexAttribute {
                offset: layout.tex_offset() as wgpu::BufferAddress * float,
                shader_location: location,
                format: wgpu::VertexFormat::Float32x2,
            });
        }
        Self { slots, attributes }
    }

    pub fn slots(&self) -> AttributeSlots {
        self.slots
    }

    /// Bytes per vertex.
    pub fn array_stride(&self) -> wgpu::BufferAddress {
        (self.slots.attributes().stride() * std::mem::size_of::<f32>()) as wgpu::BufferAddress
    }

    pub fn attributes(&self) -> &[wgpu::VertexAttribute] {
        &self.attributes
    }

    pub fn desc(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tex_coords_follow_the_position_without_normals() {
        let layout = VertexLayout::new(AttributeSlots {
            tex_coords: Some(1),
            ..AttributeSlots::position_only(0)
        });
        assert_eq!(layout.array_stride(), 20);
        assert_eq!(layout.attributes()[1].offset, 12);
    }

    #[test]
    fn phong_layout_interleaves_normals() {
        let layout = AttributeSlots::PHONG.layout();
        assert_eq!(layout.array_stride(), 24);
        assert_eq!(layout.attributes().len(), 2);
        assert_eq!(layout.attributes()[1].shader_location, 1);
    }
}
