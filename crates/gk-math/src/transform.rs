use crate::{DMat4, DQuat, Point3, Vector3};
use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

/// Affine transform stored as a column-major 4x4 matrix.
///
/// Shapes apply it in place through `Shape3::transform`. Rigid transforms
/// (rotation + translation) preserve every shape exactly; scaling is
/// supported by boxes and polylines and approximated by the largest axis
/// scale for round shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub matrix: [f64; 16],
}

impl Transform {
    pub fn identity() -> Self {
        Self::from_mat4(DMat4::IDENTITY)
    }

    pub fn from_translation(t: Vector3) -> Self {
        Self::from_mat4(DMat4::from_translation(t))
    }

    pub fn from_rotation(q: DQuat) -> Self {
        Self::from_mat4(DMat4::from_quat(q))
    }

    /// Rotation around `axis` (need not be normalized) by `angle` radians.
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Self {
        Self::from_rotation(DQuat::from_axis_angle(axis.normalize(), angle))
    }

    pub fn from_scale(s: Vector3) -> Self {
        Self::from_mat4(DMat4::from_scale(s))
    }

    pub fn from_mat4(m: DMat4) -> Self {
        Self {
            matrix: m.to_cols_array(),
        }
    }

    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from_cols_array(&self.matrix)
    }

    pub fn transform_point(&self, p: Point3) -> Point3 {
        self.to_mat4().transform_point3(p)
    }

    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.to_mat4().transform_vector3(v)
    }

    /// Translation part of the transform.
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.matrix[12], self.matrix[13], self.matrix[14])
    }

    /// Largest stretch factor applied to any axis.
    pub fn max_scale(&self) -> f64 {
        let m = self.to_mat4();
        m.x_axis
            .truncate()
            .length()
            .max(m.y_axis.truncate().length())
            .max(m.z_axis.truncate().length())
    }

    pub fn then(&self, other: &Transform) -> Transform {
        Self::from_mat4(other.to_mat4() * self.to_mat4())
    }

    pub fn inverse(&self) -> Option<Transform> {
        let m = self.to_mat4();
        if m.determinant().abs() < 1e-15 {
            None
        } else {
            Some(Self::from_mat4(m.inverse()))
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AbsDiffEq for Transform {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.matrix
            .iter()
            .zip(&other.matrix)
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Transform {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.matrix
            .iter()
            .zip(&other.matrix)
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
