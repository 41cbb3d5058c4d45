#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
mod gpu {
    use crate::common::test_utils::gpu;
    use drone_ngin::{
        CylinderShape, DrawPath, Resolution, SphereShape,
        data_structures::vertex::AttributeSlots,
        geometry::{Cylinder, Sphere, Surface},
    };

    #[test]
    fn binding_allocates_storage_sized_by_the_mesh() {
        let (device, queue) = gpu();
        let mut shape = SphereShape::new("sphere", Resolution::sphere(8, 5), DrawPath::Immediate);
        shape.initialize_attrib_locations(&device, &queue, AttributeSlots::PHONG);

        let res = shape.mesh().resolution();
        let [vertex, index, indirect] = shape.buffer_sizes().expect("bound");
        assert_eq!(vertex as usize, Sphere::num_vertices(res) * 6 * 4);
        // 16-bit indices are padded up to a multiple of four bytes
        assert_eq!(index as usize, (Sphere::num_elements(res) * 2).next_multiple_of(4));
        assert_eq!(indirect, 0);
        assert_eq!(shape.uploaded_generation(), Some(1));
    }

    #[test]
    fn rebinding_the_same_slots_keeps_the_upload() {
        let (device, queue) = gpu();
        let mut shape = CylinderShape::new("cylinder", Resolution::uniform(6), DrawPath::Immediate);
        shape.initialize_attrib_locations(&device, &queue, AttributeSlots::PHONG);
        shape.initialize_attrib_locations(&device, &queue, AttributeSlots::PHONG);
        assert_eq!(shape.uploaded_generation(), Some(1));

        let with_tex = AttributeSlots {
            tex_coords: Some(2),
            ..AttributeSlots::PHONG
        };
        shape.initialize_attrib_locations(&device, &queue, with_tex);
        let res = shape.mesh().resolution();
        let [vertex, ..] = shape.buffer_sizes().expect("bound");
        assert_eq!(vertex as usize, Cylinder::num_vertices(res) * 8 * 4);
    }

    #[test]
    fn remesh_uploads_only_on_change() {
        let (device, queue) = gpu();
        let mut shape = SphereShape::new("sphere", Resolution::sphere(4, 4), DrawPath::Immediate);
        shape.initialize_attrib_locations(&device, &queue, AttributeSlots::PHONG);

        assert!(!shape.remesh(&device, &queue, Resolution::sphere(4, 4)));
        assert_eq!(shape.uploaded_generation(), Some(1));

        assert!(shape.remesh(&device, &queue, Resolution::sphere(12, 12)));
        assert_eq!(shape.uploaded_generation(), Some(2));
        assert!(!shape.remesh(&device, &queue, Resolution::uniform(12)));
        assert_eq!(shape.uploaded_generation(), Some(2));
        let res = shape.mesh().resolution();
        let [vertex, ..] = shape.buffer_sizes().expect("bound");
        assert_eq!(vertex as usize, Sphere::num_vertices(res) * 6 * 4);
    }

    #[test]
    fn indirect_path_holds_one_argument_block_per_strip() {
        let (device, queue) = gpu();
        let res = Resolution::uniform(5);
        let mut shape = CylinderShape::new("cylinder", res, DrawPath::Indirect);
        shape.initialize_attrib_locations(&device, &queue, AttributeSlots::PHONG);
        let [_, _, indirect] = shape.buffer_sizes().expect("bound");
        let args = std::mem::size_of::<wgpu::util::DrawIndexedIndirectArgs>();
        assert_eq!(indirect as usize, Cylinder::num_draws(res) * args);
    }

    fn target(device: &wgpu::Device) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test target"),
            size: wgpu::Extent3d {
                width: 4,
                height: 4,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn begin_pass<'e>(encoder: &'e mut wgpu::CommandEncoder, view: &wgpu::TextureView) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
            multiview_mask: None,
        })
    }

    #[test]
    #[should_panic(expected = "immediate draw path")]
    fn face_subsets_are_rejected_on_the_indirect_path() {
        let (device, queue) = gpu();
        let mut shape = CylinderShape::new("cylinder", Resolution::uniform(4), DrawPath::Indirect);
        shape.initialize_attrib_locations(&device, &queue, AttributeSlots::PHONG);

        let view = target(&device);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        let mut pass = begin_pass(&mut encoder, &view);
        shape.render_top(&mut pass);
    }

    #[test]
    #[should_panic(expected = "before its attribute locations were bound")]
    fn rendering_an_unbound_shape_is_rejected() {
        let (device, _queue) = gpu();
        let shape = SphereShape::new("sphere", Resolution::sphere(6, 6), DrawPath::Immediate);

        let view = target(&device);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        let mut pass = begin_pass(&mut encoder, &view);
        shape.render(&mut pass);
    }
}
