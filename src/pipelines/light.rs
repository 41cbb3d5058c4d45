use cgmath::{InnerSpace, Point3, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::transform::Transform;

/// Lights the shaders iterate over; must match `MAX_LIGHTS` in `phong.wgsl`.
pub const MAX_LIGHTS: usize = 4;

/// Scene-wide switches of the lighting equation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalLighting {
    pub ambient_colour: [f32; 3],
    pub local_viewer: bool,
    pub emissive: bool,
    pub ambient: bool,
    pub diffuse: bool,
    pub specular: bool,
}

impl Default for GlobalLighting {
    fn default() -> Self {
        Self {
            ambient_colour: [0.1, 0.1, 0.1],
            local_viewer: false,
            emissive: true,
            ambient: true,
            diffuse: true,
            specular: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spot {
    /// World-space direction of the cone axis.
    pub direction: Vector3<f64>,
    pub cos_cutoff: f32,
    pub exponent: f32,
}

/// A positional light in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub enabled: bool,
    pub position: Point3<f64>,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub spot: Option<Spot>,
}

impl Light {
    pub fn point(position: Point3<f64>, ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3]) -> Self {
        Self {
            enabled: true,
            position,
            ambient,
            diffuse,
            specular,
            spot: None,
        }
    }

    /// Position and spot axis moved into view space.
    pub fn to_uniform(&self, view: &Transform) -> LightUniform {
        let position = view.transform_point(self.position);
        let (is_spot, spot_direction, cos_cutoff, exponent) = match self.spot {
            Some(spot) => {
                let direction = view.transform_vector(spot.direction).normalize();
                (1, direction, spot.cos_cutoff, spot.exponent)
            }
            None => (0, Vector3::new(0.0, 0.0, -1.0), 0.0, 0.0),
        };
        LightUniform {
            position: [position.x as f32, position.y as f32, position.z as f32],
            is_enabled: self.enabled as u32,
            ambient: self.ambient,
            is_spot,
            diffuse: self.diffuse,
            _padding: 0,
            specular: self.specular,
            spot_cos_cutoff: cos_cutoff,
            spot_direction: [
                spot_direction.x as f32,
                spot_direction.y as f32,
                spot_direction.z as f32,
            ],
            spot_exponent: exponent,
        }
    }
}

/// The three overhead lights and the spotlight of the drone scene.
pub fn scene_lights() -> [Light; MAX_LIGHTS] {
    let mut spot = Light::point(
        Point3::new(0.0, 6.0, 4.0),
        [0.0; 3],
        [0.3, 0.3, 0.3],
        [0.0; 3],
    );
    spot.spot = Some(Spot {
        direction: Vector3::new(0.0, -1.0, -0.5),
        cos_cutoff: 0.95,
        exponent: 1.0,
    });
    [
        Light::point(
            Point3::new(-5.0, 7.0, 0.0),
            [0.2, 0.2, 0.2],
            [0.8, 0.8, 0.8],
            [0.9, 0.9, 0.9],
        ),
        Light::point(
            Point3::new(0.0, 7.0, 0.0),
            [0.4, 0.4, 0.13],
            [0.7, 0.7, 0.2],
            [0.7, 0.7, 0.0],
        ),
        Light::point(
            Point3::new(5.0, 7.0, 0.0),
            [0.0, 0.4, 0.4],
            [0.3, 0.5, 0.5],
            [0.6, 0.8, 0.8],
        ),
        spot,
    ]
}

/// Global switches plus every light; what the lighting uniform is built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub global: GlobalLighting,
    pub lights: [Light; MAX_LIGHTS],
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            global: GlobalLighting::default(),
            lights: scene_lights(),
        }
    }
}

impl Lighting {
    pub fn toggle_light(&mut self, index: usize) {
        if let Some(light) = self.lights.get_mut(index) {
            light.enabled = !light.enabled;
            log::info!("light {} {}", index + 1, if light.enabled { "on" } else { "off" });
        }
    }

    pub fn to_uniform(&self, view: &Transform) -> LightingUniform {
        let global = &self.global;
        LightingUniform {
            ambient_colour: global.ambient_colour,
            num_lights: MAX_LIGHTS as u32,
            local_viewer: global.local_viewer as u32,
            enable_emissive: global.emissive as u32,
            enable_diffuse: global.diffuse as u32,
            enable_ambient: global.ambient as u32,
            enable_specular: global.specular as u32,
            _padding: [0; 3],
            lights: self.lights.map(|light| light.to_uniform(view)),
        }
    }
}

/// Surface reflectance of one object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub emissive: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub specular_exponent: f32,
}

impl Material {
    pub const DRONE: Self = Self {
        emissive: [0.0; 3],
        ambient: [0.2, 0.45, 0.2],
        diffuse: [0.4, 0.9, 0.4],
        specular: [1.0, 1.0, 1.0],
        specular_exponent: 50.0,
    };
    pub const FLOOR: Self = Self {
        emissive: [0.0; 3],
        ambient: [0.2, 0.2, 0.2],
        diffuse: [0.4, 0.4, 0.4],
        specular: [0.1, 0.1, 0.1],
        specular_exponent: 75.0,
    };
    pub const ROTOR: Self = Self {
        emissive: [0.0; 3],
        ambient: [0.5, 0.4, 0.2],
        diffuse: [1.0, 0.8, 0.4],
        specular: [1.0, 1.0, 1.0],
        specular_exponent: 50.0,
    };

    /// Purely emissive, used for the markers showing where lights are.
    pub fn emissive(colour: [f32; 3]) -> Self {
        Self {
            emissive: colour,
            ambient: [0.0; 3],
            diffuse: [0.0; 3],
            specular: [0.0; 3],
            specular_exponent: 1.0,
        }
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            emissive: self.emissive,
            specular_exponent: self.specular_exponent,
            ambient: self.ambient,
            _padding: 0,
            diffuse: self.diffuse,
            _padding2: 0,
            specular: self.specular,
            _padding3: 0,
        }
    }
}

// vec3 members are 16-byte aligned in WGSL uniforms, hence the interleaved scalars and padding

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub is_enabled: u32,
    pub ambient: [f32; 3],
    pub is_spot: u32,
    pub diffuse: [f32; 3],
    _padding: u32,
    pub specular: [f32; 3],
    pub spot_cos_cutoff: f32,
    pub spot_direction: [f32; 3],
    pub spot_exponent: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub ambient_colour: [f32; 3],
    pub num_lights: u32,
    pub local_viewer: u32,
    pub enable_emissive: u32,
    pub enable_diffuse: u32,
    pub enable_ambient: u32,
    pub enable_specular: u32,
    _padding: [u32; 3],
    pub lights: [LightUniform; MAX_LIGHTS],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub emissive: [f32; 3],
    pub specular_exponent: f32,
    pub ambient: [f32; 3],
    _padding: u32,
    pub diffuse: [f32; 3],
    _padding2: u32,
    pub specular: [f32; 3],
    _padding3: u32,
}

/// GPU side of [`Lighting`]: one uniform buffer bound at group 1.
#[derive(Debug)]
pub struct LightResources {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, lighting: &Lighting, view: &Transform) -> Self {
        let buffer = mk_buffer(device, lighting.to_uniform(view));
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Light positions live in view space, so this runs whenever the view or a switch changes.
    pub fn write(&self, queue: &wgpu::Queue, lighting: &Lighting, view: &Transform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[lighting.to_uniform(view)]));
    }
}

pub fn mk_buffer(device: &wgpu::Device, uniform: LightingUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Lighting Buffer"),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some("lighting_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some("lighting_bind_group"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 80);
        assert_eq!(std::mem::size_of::<LightingUniform>(), 48 + 80 * MAX_LIGHTS);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 64);
    }

    #[test]
    fn toggling_a_light_twice_restores_it() {
        let mut lighting = Lighting::default();
        lighting.toggle_light(2);
        assert!(!lighting.lights[2].enabled);
        lighting.toggle_light(2);
        assert!(lighting.lights[2].enabled);
        lighting.toggle_light(17);
    }

    #[test]
    fn light_positions_move_into_view_space() {
        let lighting = Lighting::default();
        let view = Transform::from_translation(Vector3::new(0.0, 0.0, -10.0));
        let uniform = lighting.to_uniform(&view);
        assert_eq!(uniform.lights[1].position, [0.0, 7.0, -10.0]);
        assert_eq!(uniform.lights[3].is_spot, 1);
    }
}
