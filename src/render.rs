//! Drone scene composition and drawing.
//!
//! Each frame [`drone_scene`] turns the simulation state into a flat draw
//! list: one [`DrawItem`] per primitive with its model-view transform and
//! material. The [`Renderer`] owns the GPU side: the shared shapes, the
//! per-object uniform buffer, camera and lighting uniforms and the pipeline
//! variants. Drawing is split in two steps because a render pass borrows the
//! renderer immutably: [`Renderer::prepare`] uploads uniforms and creates any
//! missing pipelines, [`Renderer::draw`] records the draws.

use cgmath::{EuclideanSpace, InnerSpace, Rad, Vector3};

use crate::{
    camera::{CameraResources, ViewState},
    config::{DrawPath, Settings, ShadingModel},
    data_structures::{transform::Transform, vertex::AttributeSlots},
    geometry::{Resolution, Surface, cylinder::Cylinder, sphere::Sphere},
    pipelines::{
        PipelineKey, Pipelines,
        light::{LightResources, Lighting, Material},
        phong::{self, ObjectUniform},
    },
    resources::shape::{CylinderShape, SphereShape},
    simulation::{Simulation, drone},
};

/// Half-width of the square the floor disc covers.
const FLOOR_EXTENT: f64 = 10.0;
/// Only the overhead lights get a marker; the spotlight hangs in view.
const MARKED_LIGHTS: usize = 3;
const LIGHT_MARKER_SCALE: f64 = 0.2;
const LIGHT_MARKER_RESOLUTION: u32 = 10;

/// Raster and shading switches driven by the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderToggles {
    pub shading: ShadingModel,
    pub wireframe: bool,
    pub cull_back_faces: bool,
    pub mesh_res: u32,
    /// Log pointer diagnostics.
    pub test_info: bool,
}

impl RenderToggles {
    pub fn new(settings: &Settings) -> Self {
        Self {
            shading: settings.shading,
            wireframe: settings.wireframe,
            cull_back_faces: settings.cull_back_faces,
            mesh_res: settings.mesh_res,
            test_info: false,
        }
    }

    pub fn pipeline_key(&self, strip_index_format: Option<wgpu::IndexFormat>) -> PipelineKey {
        PipelineKey {
            shading: self.shading,
            strip_index_format,
            wireframe: self.wireframe,
            cull_back_faces: self.cull_back_faces,
        }
    }
}

/// Which shape, and which part of it, a draw uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Sphere,
    Cylinder,
    Floor,
    LightMarker,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub target: Target,
    pub model_view: Transform,
    pub material: Material,
}

impl DrawItem {
    fn new(target: Target, view: &Transform, model: Transform, material: Material) -> Self {
        Self {
            target,
            model_view: view * &model,
            material,
        }
    }
}

/// Transform taking the unit cylinder's axis onto `direction`.
fn align_y_with(direction: Vector3<f64>) -> Transform {
    let mut transform = Transform::identity();
    let axis = Vector3::unit_y().cross(direction);
    if axis.magnitude2() > 0.0 {
        let angle = Vector3::unit_y().angle(direction);
        transform.mult_rotate(angle, axis);
    }
    transform
}

/// Everything visible this frame, in draw order.
pub fn drone_scene(simulation: &Simulation, view: &Transform, lighting: &Lighting) -> Vec<DrawItem> {
    let mut items = Vec::new();

    let mut floor = Transform::from_translation(Vector3::new(0.0, -1.0, 0.0));
    floor.mult_scale_xyz(FLOOR_EXTENT, 1.0, FLOOR_EXTENT);
    items.push(DrawItem::new(Target::Floor, view, floor, Material::FLOOR));

    let pose = *simulation.pose();
    let mut centre = pose;
    centre.mult_scale(drone::CENTER_SPHERE_RADIUS);
    items.push(DrawItem::new(Target::Sphere, view, centre, Material::DRONE));

    for (rotor, phase) in simulation.rotors.iter().zip(simulation.rotor_phase) {
        let direction = rotor.offset.normalize();
        let arm_end = direction * drone::FRAME_LENGTH;

        let mut arm = pose;
        arm.mult_translate(arm_end / 2.0)
            .mult(&align_y_with(direction))
            .mult_scale_xyz(drone::FRAME_RADIUS, drone::FRAME_LENGTH / 2.0, drone::FRAME_RADIUS);
        items.push(DrawItem::new(Target::Cylinder, view, arm, Material::DRONE));

        let mut joint = pose;
        joint.mult_translate(arm_end).mult_scale(drone::CONNECT_SPHERE_RADIUS);
        items.push(DrawItem::new(Target::Sphere, view, joint, Material::DRONE));

        let mut axle = pose;
        axle.mult_translate(arm_end + Vector3::new(0.0, drone::AXLE_HEIGHT / 2.0, 0.0))
            .mult_scale_xyz(drone::AXLE_RADIUS, drone::AXLE_HEIGHT / 2.0, drone::AXLE_RADIUS);
        items.push(DrawItem::new(Target::Cylinder, view, axle, Material::ROTOR));

        let mut hub = pose;
        hub.mult_translate(arm_end + Vector3::new(0.0, drone::AXLE_HEIGHT, 0.0))
            .mult_rotate(Rad(phase), Vector3::unit_y());
        for side in [-1.0, 1.0] {
            let mut blade = hub;
            blade
                .mult_translate(Vector3::new(side * drone::BLADE_LENGTH / 2.0, 0.0, 0.0))
                .mult_scale_xyz(drone::BLADE_LENGTH / 2.0, drone::BLADE_HEIGHT, drone::BLADE_WIDTH / 2.0);
            items.push(DrawItem::new(Target::Sphere, view, blade, Material::ROTOR));
        }
    }

    for light in lighting.lights.iter().take(MARKED_LIGHTS).filter(|light| light.enabled) {
        let mut marker = Transform::from_translation(light.position.to_vec());
        marker.mult_scale(LIGHT_MARKER_SCALE);
        items.push(DrawItem::new(
            Target::LightMarker,
            view,
            marker,
            Material::emissive(light.diffuse),
        ));
    }

    items
}

/// Resolution of the sphere shapes at mesh resolution `res`.
pub fn sphere_resolution(res: u32) -> Resolution {
    Resolution::sphere(res, res)
}

/// Resolution of the cylinder shapes at mesh resolution `res`.
pub fn cylinder_resolution(res: u32) -> Resolution {
    Resolution::uniform(res)
}

#[derive(Debug)]
pub struct Renderer {
    pub camera: CameraResources,
    pub light: LightResources,
    pub pipelines: Pipelines,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_slot: wgpu::BufferAddress,
    object_capacity: usize,
    sphere: SphereShape,
    cylinder: CylinderShape,
    floor: CylinderShape,
    light_marker: SphereShape,
    frame: Vec<(Target, PipelineKey)>,
}

fn mk_object_storage(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    slot: wgpu::BufferAddress,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Object Uniform Buffer"),
        size: slot * capacity as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(ObjectUniform::SIZE),
            }),
        }],
        label: Some("object_bind_group"),
    });
    (buffer, bind_group)
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        settings: &Settings,
        view: &Transform,
        lighting: &Lighting,
    ) -> Self {
        let slots = settings.attribute_slots();
        let camera_layout = phong::mk_camera_bind_group_layout(device);
        let object_layout = phong::mk_object_bind_group_layout(device);
        let camera = CameraResources::new(device, &camera_layout);
        let light = LightResources::new(device, lighting, view);
        let pipelines = Pipelines::new(
            device,
            color_format,
            slots.layout(),
            [&camera_layout, &light.bind_group_layout, &object_layout],
        );

        let alignment = device.limits().min_uniform_buffer_offset_alignment as wgpu::BufferAddress;
        let object_slot = ObjectUniform::SIZE.div_ceil(alignment) * alignment;
        let object_capacity = 32;
        let (object_buffer, object_bind_group) =
            mk_object_storage(device, &object_layout, object_slot, object_capacity);

        let res = settings.mesh_res;
        let mut renderer = Self {
            camera,
            light,
            pipelines,
            object_layout,
            object_buffer,
            object_bind_group,
            object_slot,
            object_capacity,
            sphere: SphereShape::new("Sphere", sphere_resolution(res), settings.draw_path),
            cylinder: CylinderShape::new("Cylinder", cylinder_resolution(res), settings.draw_path),
            // the floor draws only its top face, which needs the immediate path
            floor: CylinderShape::new("Floor", cylinder_resolution(res), DrawPath::Immediate),
            light_marker: SphereShape::new(
                "Light Marker",
                sphere_resolution(LIGHT_MARKER_RESOLUTION),
                DrawPath::Immediate,
            ),
            frame: Vec::new(),
        };
        renderer.bind(device, queue, slots);
        renderer
    }

    fn bind(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, slots: AttributeSlots) {
        self.sphere.initialize_attrib_locations(device, queue, slots);
        self.cylinder.initialize_attrib_locations(device, queue, slots);
        self.floor.initialize_attrib_locations(device, queue, slots);
        self.light_marker.initialize_attrib_locations(device, queue, slots);
    }

    /// Remesh every resolution-controlled shape.
    pub fn remesh(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, res: u32) {
        let mut changed = self.sphere.remesh(device, queue, sphere_resolution(res));
        changed |= self.cylinder.remesh(device, queue, cylinder_resolution(res));
        changed |= self.floor.remesh(device, queue, cylinder_resolution(res));
        if changed {
            log::info!("mesh resolution {}", res);
        }
    }

    pub fn sphere(&self) -> &SphereShape {
        &self.sphere
    }

    pub fn cylinder(&self) -> &CylinderShape {
        &self.cylinder
    }

    /// Upload this frame's uniforms and create the pipelines it needs.
    #[allow(clippy::too_many_arguments)]
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: (u32, u32),
        view_state: &ViewState,
        toggles: &RenderToggles,
        lighting: &Lighting,
        items: &[DrawItem],
    ) {
        let view = view_state.view_matrix();
        self.camera.write(queue, view_state, size.0, size.1);
        self.light.write(queue, lighting, &view);

        if items.len() > self.object_capacity {
            self.object_capacity = items.len().next_power_of_two();
            self.object_buffer.destroy();
            let (buffer, bind_group) =
                mk_object_storage(device, &self.object_layout, self.object_slot, self.object_capacity);
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
            log::debug!("object uniform buffer grown to {} slots", self.object_capacity);
        }

        let slot = self.object_slot as usize;
        let mut staging = vec![0u8; slot * items.len()];
        for (chunk, item) in staging.chunks_exact_mut(slot).zip(items) {
            let uniform = ObjectUniform {
                transform: item.model_view.to_raw(),
                material: item.material.to_uniform(),
            };
            chunk[..ObjectUniform::SIZE as usize].copy_from_slice(bytemuck::bytes_of(&uniform));
        }
        if !staging.is_empty() {
            queue.write_buffer(&self.object_buffer, 0, &staging);
        }

        let sphere_key = self.pipelines.prepare(device, toggles.pipeline_key(Sphere::STRIP_INDEX_FORMAT));
        let cylinder_key = self.pipelines.prepare(device, toggles.pipeline_key(Cylinder::STRIP_INDEX_FORMAT));
        self.frame = items
            .iter()
            .map(|item| {
                let key = match item.target {
                    Target::Sphere | Target::LightMarker => sphere_key,
                    Target::Cylinder | Target::Floor => cylinder_key,
                };
                (item.target, key)
            })
            .collect();
    }

    /// Record the draws set up by the last [`Renderer::prepare`].
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.camera.bind_group, &[]);
        pass.set_bind_group(1, &self.light.bind_group, &[]);
        let mut current = None;
        for (i, (target, key)) in self.frame.iter().enumerate() {
            if current != Some(*key) {
                let Some(pipeline) = self.pipelines.get(*key) else {
                    log::error!("pipeline {:?} was not prepared", key);
                    return;
                };
                pass.set_pipeline(pipeline);
                current = Some(*key);
            }
            let offset = (i as wgpu::BufferAddress * self.object_slot) as wgpu::DynamicOffset;
            pass.set_bind_group(2, &self.object_bind_group, &[offset]);
            match target {
                Target::Sphere => self.sphere.render(pass),
                Target::Cylinder => self.cylinder.render(pass),
                Target::Floor => self.floor.render_top(pass),
                Target::LightMarker => self.light_marker.render(pass),
            }
        }
    }
}
