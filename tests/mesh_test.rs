mod common;

use approx::assert_abs_diff_eq;
use common::test_utils::mesh;
use drone_ngin::geometry::{
    Cylinder, CylinderMesh, Face, Mesh, Resolution, Sphere, SphereMesh, Surface, VertexAttributes,
    sphere::RESTART_INDEX,
};

const ATTRIBUTE_SETS: [VertexAttributes; 4] = [
    VertexAttributes::POSITION_ONLY,
    VertexAttributes::WITH_NORMALS,
    VertexAttributes {
        normals: false,
        tex_coords: true,
    },
    VertexAttributes::ALL,
];

#[test]
fn sizing_matches_generated_sphere_data() {
    for (slices, stacks) in [(3, 2), (4, 4), (7, 3), (16, 9), (80, 80)] {
        for attributes in ATTRIBUTE_SETS {
            let m: SphereMesh = mesh(Resolution::sphere(slices, stacks), attributes);
            assert_eq!(m.vertices().len(), m.num_vertices() * attributes.stride());
            assert_eq!(m.indices().len(), m.num_elements());
        }
    }
}

#[test]
fn sizing_matches_generated_cylinder_data() {
    for (slices, stacks, rings) in [(3, 1, 1), (4, 4, 4), (9, 2, 5), (80, 80, 80)] {
        for attributes in ATTRIBUTE_SETS {
            let m: CylinderMesh = mesh(Resolution::new(slices, stacks, rings), attributes);
            assert_eq!(m.vertices().len(), m.num_vertices() * attributes.stride());
            assert_eq!(m.indices().len(), m.num_elements());
            assert_eq!(m.draw_batch().len(), Cylinder::num_draws(m.resolution()));
        }
    }
}

#[test]
fn every_index_addresses_a_vertex() {
    let sphere: SphereMesh = mesh(Resolution::sphere(11, 7), VertexAttributes::WITH_NORMALS);
    assert!(
        sphere
            .indices()
            .iter()
            .filter(|&&i| i != RESTART_INDEX)
            .all(|&i| (i as usize) < sphere.num_vertices())
    );

    let cylinder: CylinderMesh = mesh(Resolution::new(11, 3, 4), VertexAttributes::WITH_NORMALS);
    assert!(cylinder.indices().iter().all(|&i| (i as usize) < cylinder.num_vertices()));
}

#[test]
fn sphere_starts_with_both_poles() {
    for res in [Resolution::sphere(3, 2), Resolution::sphere(12, 5), Resolution::sphere(255, 255)] {
        let m: SphereMesh = mesh(res, VertexAttributes::ALL);
        assert_eq!(&m.vertex(0)[..3], &[0.0, 1.0, 0.0]);
        assert_eq!(&m.vertex(1)[..3], &[0.0, -1.0, 0.0]);
    }
}

#[test]
fn sphere_normals_equal_positions() {
    let m: SphereMesh = mesh(Resolution::sphere(8, 6), VertexAttributes::WITH_NORMALS);
    for i in 0..m.num_vertices() {
        let v = m.vertex(i);
        assert_eq!(&v[..3], &v[3..6]);
        let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        assert_abs_diff_eq!(length, 1.0, epsilon = 1e-6);
    }
}

#[test]
fn sphere_seam_column_gets_full_texture_width() {
    let res = Resolution::sphere(5, 4);
    let m: SphereMesh = mesh(res, VertexAttributes::ALL);
    let interior = (res.stacks - 1) as usize;
    let first_seam = 2 + res.slices as usize * interior;
    for j in 0..interior {
        let seam = m.vertex(first_seam + j);
        let start = m.vertex(2 + j);
        assert_eq!(seam[6], 1.0);
        assert_eq!(start[6], 0.0);
        assert_eq!(&seam[..3], &start[..3]);
    }
}

#[test]
fn cylinder_normals_are_axis_aligned_or_radial() {
    let res = Resolution::new(10, 4, 3);
    let m: CylinderMesh = mesh(res, VertexAttributes::WITH_NORMALS);
    let side_start = Cylinder::side_start(res);
    for i in 0..m.num_vertices() {
        let v = m.vertex(i);
        let normal = &v[3..6];
        if i < side_start {
            assert_eq!(normal[0], 0.0);
            assert_eq!(normal[2], 0.0);
            assert_eq!(normal[1].abs(), 1.0);
        } else {
            assert_eq!(normal[1], 0.0);
        }
    }
}

#[test]
fn cylinder_faces_partition_the_strips() {
    let res = Resolution::new(6, 2, 3);
    let m: CylinderMesh = mesh(res, VertexAttributes::WITH_NORMALS);
    let batch = m.draw_batch();
    let total: u32 = [Face::Top, Face::Base, Face::Side]
        .into_iter()
        .flat_map(|face| batch.strips(face))
        .map(|strip| batch.counts()[strip])
        .sum();
    assert_eq!(total as usize, m.num_elements());
    for strip in batch.strips(Face::Top) {
        assert_eq!(batch.counts()[strip], Cylinder::cap_strip_len(res));
    }
    for strip in batch.strips(Face::Side) {
        assert_eq!(batch.counts()[strip], Cylinder::side_strip_len(res));
    }
}

#[test]
fn same_resolution_reproduces_identical_bytes() {
    let res = Resolution::new(9, 4, 2);
    let a: CylinderMesh = mesh(res, VertexAttributes::ALL);
    let b: CylinderMesh = mesh(res, VertexAttributes::ALL);
    assert_eq!(
        bytemuck::cast_slice::<f32, u8>(a.vertices()),
        bytemuck::cast_slice::<f32, u8>(b.vertices())
    );
    assert_eq!(a.indices(), b.indices());
}

#[test]
fn remesh_with_unchanged_resolution_keeps_generation() {
    let mut m: SphereMesh = mesh(Resolution::sphere(8, 8), VertexAttributes::WITH_NORMALS);
    let generation = m.generation();
    assert!(!m.remesh(Resolution::sphere(8, 8)));
    assert_eq!(m.generation(), generation);

    assert!(m.remesh(Resolution::sphere(9, 8)));
    assert_eq!(m.generation(), generation + 1);
    assert_eq!(m.vertices().len(), m.num_vertices() * 6);
}

#[test]
fn sphere_remesh_ignores_rings() {
    let mut m: SphereMesh = mesh(Resolution::sphere(8, 8), VertexAttributes::WITH_NORMALS);
    let generation = m.generation();
    assert!(!m.remesh(Resolution::uniform(8)));
    assert!(!m.remesh(Resolution::new(8, 8, 200)));
    assert_eq!(m.generation(), generation);

    assert!(m.remesh(Resolution::uniform(9)));
    assert!(!m.remesh(Resolution::uniform(9)));
    assert_eq!(m.generation(), generation + 1);
    assert_eq!(m.resolution(), Resolution::sphere(9, 9));
}

#[test]
fn remesh_before_initialize_only_records_resolution() {
    let mut m: CylinderMesh = Mesh::new(Resolution::uniform(4));
    assert!(m.remesh(Resolution::uniform(5)));
    assert_eq!(m.generation(), 0);
    assert!(m.vertices().is_empty());
}

#[test]
fn out_of_range_requests_saturate() {
    let low: SphereMesh = mesh(Resolution::sphere(1, 4), VertexAttributes::WITH_NORMALS);
    let min: SphereMesh = mesh(Resolution::sphere(3, 4), VertexAttributes::WITH_NORMALS);
    assert_eq!(low.resolution(), min.resolution());
    assert_eq!(low.vertices(), min.vertices());

    let high: CylinderMesh = mesh(Resolution::new(1000, 1, 1), VertexAttributes::WITH_NORMALS);
    let max: CylinderMesh = mesh(Resolution::new(255, 1, 1), VertexAttributes::WITH_NORMALS);
    assert_eq!(high.resolution(), max.resolution());
    assert_eq!(high.indices(), max.indices());
}

#[test]
fn clamping_respects_per_shape_minimums() {
    assert_eq!(Sphere::clamp(Resolution::new(0, 0, 7)), Resolution::sphere(3, 2));
    assert_eq!(Cylinder::clamp(Resolution::new(0, 0, 0)), Resolution::new(3, 1, 1));
    assert_eq!(Cylinder::clamp(Resolution::uniform(300)), Resolution::uniform(255));
}
