//! Affine transform composition for poses and model-view matrices.
//!
//! A [`Transform`] is built by post-multiplying primitive operations onto an
//! existing matrix, the way a model-view stack is built: the operation applied
//! last is the first one to act on the object. Only translations, rotations
//! and scales are offered, so the bottom row stays `(0, 0, 0, 1)`.

use std::ops::Mul;

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, One, Point3, Rad, SquareMatrix, Vector3, Vector4};

/// A 4x4 affine transform in double precision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    matrix: Matrix4<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::one(),
        }
    }

    pub fn from_translation(offset: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::from_translation(offset),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn mult_translate(&mut self, offset: Vector3<f64>) -> &mut Self {
        self.matrix = self.matrix * Matrix4::from_translation(offset);
        self
    }

    /// Rotate by `angle` about `axis`; the axis need not be unit length.
    ///
    /// A zero axis leaves the transform untouched.
    pub fn mult_rotate(&mut self, angle: impl Into<Rad<f64>>, axis: Vector3<f64>) -> &mut Self {
        let length = axis.magnitude();
        if length > 0.0 {
            self.matrix = self.matrix * Matrix4::from_axis_angle(axis / length, angle.into());
        }
        self
    }

    pub fn mult_scale(&mut self, factor: f64) -> &mut Self {
        self.matrix = self.matrix * Matrix4::from_scale(factor);
        self
    }

    pub fn mult_scale_xyz(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.matrix = self.matrix * Matrix4::from_nonuniform_scale(x, y, z);
        self
    }

    pub fn mult(&mut self, rhs: &Transform) -> &mut Self {
        self.matrix = self.matrix * rhs.matrix;
        self
    }

    pub fn transform_point(&self, point: Point3<f64>) -> Point3<f64> {
        Point3::from_homogeneous(self.matrix * point.to_homogeneous())
    }

    pub fn transform_vector(&self, vector: Vector3<f64>) -> Vector3<f64> {
        (self.matrix * vector.extend(0.0)).truncate()
    }

    /// Translation column.
    pub fn translation(&self) -> Vector3<f64> {
        self.matrix.w.truncate()
    }

    pub fn is_affine(&self) -> bool {
        self.matrix.row(3) == Vector4::new(0.0, 0.0, 0.0, 1.0)
    }

    fn linear_part(&self) -> Matrix3<f64> {
        Matrix3::from_cols(
            self.matrix.x.truncate(),
            self.matrix.y.truncate(),
            self.matrix.z.truncate(),
        )
    }

    /// Inverse transpose of the upper 3x3 block, for transforming normals.
    ///
    /// Falls back to the block itself when it is singular.
    pub fn normal_matrix(&self) -> Matrix3<f64> {
        let linear = self.linear_part();
        linear
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(linear)
    }

    /// Column-major entries truncated to `f32` for upload.
    pub fn to_columns(&self) -> [f32; 16] {
        let columns: [[f64; 4]; 4] = self.matrix.into();
        let mut out = [0.0f32; 16];
        for (dst, src) in out.iter_mut().zip(columns.iter().flatten()) {
            *dst = *src as f32;
        }
        out
    }

    pub fn to_raw(&self) -> TransformRaw {
        let columns: [[f64; 4]; 4] = self.matrix.into();
        let normal: [[f64; 3]; 3] = self.normal_matrix().into();
        TransformRaw {
            model_view: columns.map(|c| c.map(|v| v as f32)),
            // WGSL mat3x3 columns are padded to 16 bytes
            normal: normal.map(|c| [c[0] as f32, c[1] as f32, c[2] as f32, 0.0]),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul<Transform> for Transform {
    type Output = Self;

    fn mul(self, rhs: Transform) -> Self::Output {
        Transform {
            matrix: self.matrix * rhs.matrix,
        }
    }
}

impl<'a, 'b> Mul<&'b Transform> for &'a Transform {
    type Output = Transform;

    fn mul(self, rhs: &'b Transform) -> Self::Output {
        Transform {
            matrix: self.matrix * rhs.matrix,
        }
    }
}

impl From<Matrix4<f64>> for Transform {
    fn from(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }
}

/**
 * The raw transform is what the shader sees: the model-view matrix and the
 * normal matrix, both as `f32` columns.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformRaw {
    pub model_view: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
}
