use approx::assert_abs_diff_eq;
use cgmath::{Deg, Matrix4, Point3, Rad, Vector3};
use drone_ngin::Transform;

fn assert_points_eq(a: Point3<f64>, b: Point3<f64>) {
    assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-12);
    assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-12);
    assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-12);
}

#[test]
fn pivot_rotation_matches_rotation_about_the_pivot() {
    let pivot = Vector3::new(1.0, 2.0, -0.5);
    let axis = Vector3::new(0.3, 1.0, 0.2);
    let angle = Rad(0.7);

    let mut composed = Transform::identity();
    composed
        .mult_translate(pivot)
        .mult_rotate(angle, axis)
        .mult_translate(-pivot);

    let mut rotation = Transform::identity();
    rotation.mult_rotate(angle, axis);

    for point in [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(3.0, -1.0, 4.0),
        Point3::new(1.0, 2.0, -0.5),
    ] {
        let expected = rotation.transform_point(point - pivot) + pivot;
        assert_points_eq(composed.transform_point(point), expected);
    }
}

#[test]
fn last_operation_acts_first() {
    let mut transform = Transform::identity();
    transform
        .mult_translate(Vector3::new(5.0, 0.0, 0.0))
        .mult_scale(2.0);
    // scaled to (2, 0, 0), then moved
    assert_points_eq(
        transform.transform_point(Point3::new(1.0, 0.0, 0.0)),
        Point3::new(7.0, 0.0, 0.0),
    );
}

#[test]
fn primitives_keep_the_transform_affine() {
    let mut transform = Transform::from_translation(Vector3::new(0.0, 3.0, 0.0));
    transform
        .mult_rotate(Deg(30.0), Vector3::unit_y())
        .mult_scale_xyz(0.2, 1.5, 0.2)
        .mult_translate(Vector3::new(1.0, 1.0, 1.0))
        .mult_rotate(Rad(1.0), Vector3::new(1.0, 1.0, 0.0));
    assert!(transform.is_affine());
}

#[test]
fn zero_axis_rotation_is_ignored() {
    let mut transform = Transform::from_translation(Vector3::new(1.0, 0.0, 0.0));
    let before = transform;
    transform.mult_rotate(Rad(1.0), Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(transform, before);
}

#[test]
fn normal_matrix_undoes_non_uniform_scale() {
    let mut transform = Transform::identity();
    transform.mult_scale_xyz(2.0, 1.0, 1.0);
    let normal = transform.normal_matrix();
    assert_abs_diff_eq!(normal.x.x, 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(normal.y.y, 1.0, epsilon = 1e-12);
}

#[test]
fn uploads_are_column_major_f32() {
    let transform = Transform::from_matrix(Matrix4::from_translation(Vector3::new(1.5, -2.0, 3.25)));
    let columns = transform.to_columns();
    assert_eq!(&columns[12..15], &[1.5, -2.0, 3.25]);
    assert_eq!(columns[15], 1.0);
    let raw = transform.to_raw();
    assert_eq!(raw.model_view[3], [1.5, -2.0, 3.25, 1.0]);
    assert_eq!(raw.normal[0], [1.0, 0.0, 0.0, 0.0]);
}
