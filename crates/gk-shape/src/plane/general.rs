use std::cell::Cell;

use approx::AbsDiffEq;
use gk_core::error::{GeomError, Result};
use gk_core::traits::Validate;
use gk_core::Tolerance;
use gk_math::{DMat3, DQuat, Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use super::Plane3;
use crate::aabb::AlignedBox3;
use crate::shape::Shape3;
use crate::triangle::is_collinear;

/// Plane stored as the four coefficients of `a*x + b*y + c*z + d = 0`.
///
/// `(a, b, c)` is renormalized by every constructor and mutator. The pivot
/// is a cached point of the plane; it is recomputed on demand and never
/// serialized. The cache uses `Cell`, so a `Plane4` is `Send` but not
/// `Sync`; share it across threads behind a lock.
///
/// Deserialization normalizes the coefficients and rejects a zero or
/// non-finite normal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPlane4")]
pub struct Plane4 {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    #[serde(skip)]
    pivot: Cell<Option<Point3>>,
}

#[derive(Deserialize)]
struct RawPlane4 {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl TryFrom<RawPlane4> for Plane4 {
    type Error = GeomError;

    fn try_from(raw: RawPlane4) -> Result<Self> {
        let coeffs = [raw.a, raw.b, raw.c, raw.d];
        if coeffs.iter().any(|v| !v.is_finite()) {
            return Err(GeomError::InvalidValue(format!("plane has non-finite coefficient: {:?}", coeffs)));
        }
        if raw.a == 0.0 && raw.b == 0.0 && raw.c == 0.0 {
            return Err(GeomError::Degenerate("plane normal has no direction".into()));
        }
        Ok(Plane4::new(raw.a, raw.b, raw.c, raw.d))
    }
}

impl Plane4 {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        let mut plane = Self::raw(a, b, c, d);
        plane.normalize();
        plane
    }

    /// Plane through `point` facing `normal`. The normal is normalized.
    pub fn from_point_normal(point: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.length();
        if len == 0.0 || !len.is_finite() {
            return Err(GeomError::Degenerate(format!("plane normal {:?} has no direction", normal)));
        }
        let n = normal / len;
        let plane = Self::raw(n.x, n.y, n.z, -n.dot(point));
        plane.pivot.set(Some(point));
        Ok(plane)
    }

    /// Plane through three points, front side given by the right-hand rule.
    /// The pivot is their centroid.
    pub fn from_points(p1: Point3, p2: Point3, p3: Point3) -> Result<Self> {
        if is_collinear(p1, p2, p3) {
            return Err(GeomError::Degenerate(format!(
                "points {:?}, {:?}, {:?} are collinear",
                p1, p2, p3
            )));
        }
        Self::from_point_normal((p1 + p2 + p3) / 3.0, (p2 - p1).cross(p3 - p1))
    }

    fn raw(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            a,
            b,
            c,
            d,
            pivot: Cell::new(None),
        }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    /// Scale all four coefficients so the normal has unit length.
    ///
    /// A zero normal cannot be normalized: debug builds panic, release
    /// builds log a warning and leave the plane unchanged.
    pub fn normalize(&mut self) -> &mut Self {
        let len = (self.a * self.a + self.b * self.b + self.c * self.c).sqrt();
        if len == 0.0 {
            log::warn!("cannot normalize plane with zero normal (d = {})", self.d);
            debug_assert!(len != 0.0, "plane normal must not be zero");
            return self;
        }
        if len != 1.0 {
            self.a /= len;
            self.b /= len;
            self.c /= len;
            self.d /= len;
        }
        self.pivot.set(None);
        self
    }

    /// Replace the equation; the normal is renormalized.
    pub fn set(&mut self, a: f64, b: f64, c: f64, d: f64) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.pivot.set(None);
        self.normalize();
    }

    pub fn translate(&mut self, v: Vector3) {
        let p = self.pivot() + v;
        self.set_pivot(p);
    }

    /// Rotate around `center`, or around the pivot when `None`.
    pub fn rotate(&mut self, rotation: DQuat, center: Option<Point3>) {
        let reference = self.pivot();
        let center = center.unwrap_or(reference);
        let normal = rotation * self.normal();
        let reference = center + rotation * (reference - center);
        self.reset(reference, normal);
    }

    /// Apply an affine transform. Normals go through the inverse transpose
    /// so that non-uniform scales keep the plane consistent.
    pub fn transform(&mut self, t: &Transform) {
        let linear = DMat3::from_mat4(t.to_mat4());
        let normal = if linear.determinant() == 0.0 {
            log::debug!("singular transform applied to plane, using direct normal transform");
            t.transform_vector(self.normal())
        } else {
            linear.inverse().transpose() * self.normal()
        };
        let reference = t.transform_point(self.pivot());
        self.reset(reference, normal);
    }

    fn reset(&mut self, point: Point3, normal: Vector3) {
        self.set(normal.x, normal.y, normal.z, -normal.dot(point));
        self.pivot.set(Some(point));
    }
}

impl Default for Plane4 {
    fn default() -> Self {
        Self::raw(1.0, 0.0, 0.0, 0.0)
    }
}

impl Plane3 for Plane4 {
    fn coefficients(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    fn pivot(&self) -> Point3 {
        if let Some(p) = self.pivot.get() {
            return p;
        }
        let p = self.projection(Point3::ZERO);
        self.pivot.set(Some(p));
        p
    }

    fn negate(&mut self) {
        self.a = -self.a;
        self.b = -self.b;
        self.c = -self.c;
        self.d = -self.d;
        self.pivot.set(None);
    }

    fn absolute(&mut self) {
        let p = self.pivot();
        let n = self.normal().abs();
        self.reset(p, n);
    }

    fn set_pivot(&mut self, p: Point3) {
        self.d = -(self.a * p.x + self.b * p.y + self.c * p.z);
        self.pivot.set(Some(p));
    }

    fn set_coefficients(&mut self, a: f64, b: f64, c: f64, d: f64) {
        self.set(a, b, c, d);
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Shape3 for Plane4 {
    /// Infinite, except along an axis the plane is perpendicular to.
    fn to_bounding_box(&self) -> AlignedBox3 {
        let mut bb = AlignedBox3::infinite();
        match (self.a != 0.0, self.b != 0.0, self.c != 0.0) {
            (true, false, false) => bb.set_x(-self.d / self.a, -self.d / self.a),
            (false, true, false) => bb.set_y(-self.d / self.b, -self.d / self.b),
            (false, false, true) => bb.set_z(-self.d / self.c, -self.d / self.c),
            _ => {}
        }
        bb
    }

    fn closest_point(&self, p: Point3) -> Point3 {
        self.projection(p)
    }

    fn distance_squared(&self, p: Point3) -> f64 {
        let d = self.distance_to_point(p);
        d * d
    }

    fn contains(&self, p: Point3) -> bool {
        self.classify_point(p).is_coincident()
    }

    fn translate(&mut self, v: Vector3) {
        Plane4::translate(self, v);
    }

    fn transform(&mut self, t: &Transform) {
        Plane4::transform(self, t);
    }
}

impl Validate for Plane4 {
    fn validate(&self) -> Result<()> {
        let coeffs = self.coefficients();
        if coeffs.iter().any(|v| !v.is_finite()) {
            return Err(GeomError::InvalidValue(format!("plane has non-finite coefficient: {:?}", coeffs)));
        }
        let len = self.normal().length();
        if !Tolerance::default().linear_eq(len, 1.0) {
            return Err(GeomError::Tolerance(format!("plane normal length {} is not 1", len)));
        }
        Ok(())
    }
}

canonical_eq!(Plane4, |p| [p.a, p.b, p.c, p.d]);

impl AbsDiffEq for Plane4 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.coefficients()
            .iter()
            .zip(other.coefficients().iter())
            .all(|(x, y)| x.abs_diff_eq(y, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::PlaneClassification;
    use crate::segment::Segment3;
    use crate::sphere::Sphere3;
    use approx::assert_abs_diff_eq;
    use glam::dvec3;
    use std::f64::consts::FRAC_PI_2;

    fn z_equals_5() -> Plane4 {
        Plane4::new(0.0, 0.0, 1.0, -5.0)
    }

    #[test]
    fn test_new_normalizes() {
        let p = Plane4::new(0.0, 3.0, 4.0, 10.0);
        assert_abs_diff_eq!(p.normal().length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p, Plane4::new(0.0, 0.6, 0.8, 2.0), epsilon = 1e-12);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_default_is_x_zero() {
        let p = Plane4::default();
        assert_eq!(p.coefficients(), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(p.pivot(), Point3::ZERO);
    }

    #[test]
    fn test_signed_distance_and_classification() {
        let p = z_equals_5();
        assert_eq!(p.distance_to_point(dvec3(0.0, 0.0, 10.0)), 5.0);
        assert_eq!(p.classify_point(dvec3(0.0, 0.0, 10.0)), PlaneClassification::InFrontOf);
        assert_eq!(p.distance_to_point(dvec3(1.0, 2.0, 5.0)), 0.0);
        assert_eq!(p.classify_point(dvec3(1.0, 2.0, 5.0)), PlaneClassification::Coincident);
        assert_eq!(p.distance_to_point(Point3::ZERO), -5.0);
        assert_eq!(p.classify_point(Point3::ZERO), PlaneClassification::Behind);
    }

    #[test]
    fn test_pivot_defaults_to_origin_projection() {
        let p = Plane4::new(1.0, 1.0, 0.0, -2.0);
        let pivot = p.pivot();
        assert_abs_diff_eq!(p.distance_to_point(pivot), 0.0, epsilon = 1e-12);
        assert!(pivot.abs_diff_eq(dvec3(1.0, 1.0, 0.0), 1e-12));
    }

    #[test]
    fn test_set_pivot_keeps_normal() {
        let mut p = z_equals_5();
        p.set_pivot(dvec3(7.0, -1.0, 2.0));
        assert_eq!(p.normal(), Vector3::Z);
        assert_eq!(p.distance_to_point(dvec3(7.0, -1.0, 2.0)), 0.0);
        assert_eq!(p.pivot(), dvec3(7.0, -1.0, 2.0));
    }

    #[test]
    fn test_mutators_clear_pivot_cache() {
        let mut p = z_equals_5();
        p.set_pivot(dvec3(3.0, 3.0, 5.0));
        p.set(0.0, 0.0, 2.0, 4.0);
        assert_eq!(p.pivot(), dvec3(0.0, 0.0, -2.0));
        p.negate();
        assert_eq!(p.coefficients(), [0.0, 0.0, -1.0, -2.0]);
        assert_eq!(p.pivot(), dvec3(0.0, 0.0, -2.0));
    }

    #[test]
    fn test_negate_swaps_sides() {
        let mut p = z_equals_5();
        let q = dvec3(0.0, 0.0, 9.0);
        let before = p.classify_point(q);
        p.negate();
        assert_eq!(p.classify_point(q), before.invert());
    }

    #[test]
    fn test_absolute_keeps_pivot_on_plane() {
        let mut p = Plane4::from_point_normal(dvec3(1.0, 2.0, 3.0), dvec3(-1.0, 0.0, -1.0)).unwrap();
        p.absolute();
        assert!(p.normal().cmpge(Vector3::ZERO).all());
        assert_abs_diff_eq!(p.distance_to_point(dvec3(1.0, 2.0, 3.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_points_pivot_is_centroid() {
        let p = Plane4::from_points(
            dvec3(0.0, 0.0, 1.0),
            dvec3(3.0, 0.0, 1.0),
            dvec3(0.0, 3.0, 1.0),
        )
        .unwrap();
        assert_eq!(p.normal(), Vector3::Z);
        assert_eq!(p.pivot(), dvec3(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_from_points_rejects_collinear() {
        let err = Plane4::from_points(Point3::ZERO, Point3::X, Point3::X * 2.0);
        assert!(matches!(err, Err(GeomError::Degenerate(_))));
    }

    #[test]
    fn test_from_point_normal_rejects_zero() {
        assert!(Plane4::from_point_normal(Point3::ZERO, Vector3::ZERO).is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "plane normal must not be zero")]
    fn test_zero_normal_panics_in_debug() {
        let _ = Plane4::new(0.0, 0.0, 0.0, 1.0);
    }

    #[test]
    fn test_translate_moves_pivot() {
        let mut p = z_equals_5();
        p.translate(dvec3(4.0, 0.0, 1.0));
        assert_eq!(p.coefficients(), [0.0, 0.0, 1.0, -6.0]);
        assert_eq!(p.pivot(), dvec3(4.0, 0.0, 6.0));
    }

    #[test]
    fn test_rotate_about_origin() {
        let mut p = z_equals_5();
        p.rotate(DQuat::from_rotation_y(FRAC_PI_2), Some(Point3::ZERO));
        assert!(p.normal().abs_diff_eq(Vector3::X, 1e-12));
        assert_abs_diff_eq!(p.distance_to_point(dvec3(5.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_with_nonuniform_scale() {
        let mut p = Plane4::new(1.0, 1.0, 0.0, -1.0);
        p.transform(&Transform::from_scale(dvec3(2.0, 1.0, 1.0)));
        // x + y = 1 becomes x/2 + y = 1
        assert_abs_diff_eq!(p.distance_to_point(dvec3(2.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.distance_to_point(dvec3(0.0, 1.0, 0.0)), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.normal().length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_projection_lands_on_plane() {
        let p = Plane4::new(1.0, 2.0, 3.0, 4.0);
        let q = p.projection(dvec3(5.0, -2.0, 7.0));
        assert_abs_diff_eq!(p.distance_to_point(q), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sphere_classification_touching_is_coincident() {
        let p = z_equals_5();
        let touching = Sphere3::new(dvec3(0.0, 0.0, 7.0), 2.0);
        let clear = Sphere3::new(dvec3(0.0, 0.0, 7.5), 2.0);
        assert_eq!(p.classify_sphere(&touching), PlaneClassification::Coincident);
        assert_eq!(p.classify_sphere(&clear), PlaneClassification::InFrontOf);
        assert!(p.intersects_sphere(&touching));
    }

    #[test]
    fn test_box_classification() {
        let p = Plane4::new(1.0, 1.0, 1.0, 0.0);
        let front = AlignedBox3::new(dvec3(1.0, 1.0, 1.0), dvec3(2.0, 2.0, 2.0));
        let across = AlignedBox3::new(dvec3(-1.0, -1.0, -1.0), dvec3(1.0, 1.0, 1.0));
        assert_eq!(p.classify_box(&front), PlaneClassification::InFrontOf);
        assert_eq!(p.classify_box(&across), PlaneClassification::Coincident);
        let mut behind = front;
        behind.translate(dvec3(-5.0, -5.0, -5.0));
        assert_eq!(p.classify_box(&behind), PlaneClassification::Behind);
    }

    #[test]
    fn test_segment_intersection_factor() {
        let p = z_equals_5();
        let crossing = Segment3::new(dvec3(0.0, 0.0, 0.0), dvec3(0.0, 0.0, 10.0));
        assert_abs_diff_eq!(p.segment_intersection_factor(&crossing), 0.5, epsilon = 1e-12);
        assert_eq!(p.intersection_with_segment(&crossing), Some(dvec3(0.0, 0.0, 5.0)));

        let short = Segment3::new(dvec3(0.0, 0.0, 0.0), dvec3(0.0, 0.0, 4.0));
        assert!(p.segment_intersection_factor(&short).is_nan());
        assert_eq!(p.intersection_with_segment(&short), None);

        let inside = Segment3::new(dvec3(0.0, 0.0, 5.0), dvec3(3.0, 0.0, 5.0));
        assert_eq!(p.segment_intersection_factor(&inside), f64::INFINITY);

        let parallel = Segment3::new(dvec3(0.0, 0.0, 6.0), dvec3(3.0, 0.0, 6.0));
        assert!(p.segment_intersection_factor(&parallel).is_nan());
    }

    #[test]
    fn test_pivot_cache_ignored_by_equality() {
        let a = z_equals_5();
        let b = z_equals_5();
        let _ = a.pivot();
        assert_eq!(a, b);
        assert_eq!(Plane4::new(0.0, 0.0, -1.0, 0.0), Plane4::new(-0.0, 0.0, -1.0, -0.0));
    }

    #[test]
    fn test_serde_skips_pivot() {
        let p = Plane4::from_point_normal(dvec3(3.0, 4.0, 5.0), Vector3::Z).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("pivot"));
        let back: Plane4 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.pivot(), dvec3(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_deserialize_normalizes() {
        let p: Plane4 = serde_json::from_str(r#"{"a":0.0,"b":0.0,"c":2.0,"d":1.0}"#).unwrap();
        assert_eq!(p.coefficients(), [0.0, 0.0, 1.0, 0.5]);
        p.validate().unwrap();
    }

    #[test]
    fn test_deserialize_rejects_zero_normal() {
        let err = serde_json::from_str::<Plane4>(r#"{"a":0.0,"b":0.0,"c":0.0,"d":1.0}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_validate_rejects_scaled_coefficients() {
        let mut p = z_equals_5();
        p.a = 0.0;
        p.c = 3.0;
        assert!(matches!(p.validate(), Err(GeomError::Tolerance(_))));
    }

    #[test]
    fn test_bounding_box_of_axis_plane_is_flat() {
        let bb = z_equals_5().to_bounding_box();
        assert_eq!(bb.min().z, 5.0);
        assert_eq!(bb.max().z, 5.0);
        assert_eq!(bb.min().x, f64::NEG_INFINITY);
        assert_eq!(Plane4::new(1.0, 1.0, 0.0, 0.0).to_bounding_box(), AlignedBox3::infinite());
    }
}
