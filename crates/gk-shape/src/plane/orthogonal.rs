//! Planes perpendicular to a coordinate axis.
//!
//! Each stores the offset `k` on its axis and which side is the front. The
//! normal is `+axis` when `positive`, `-axis` otherwise; coefficients other
//! than the axis one are exactly zero.

use gk_core::Tolerance;
use gk_math::{Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use super::{classify_distance, Plane3};
use crate::aabb::AlignedBox3;
use crate::classification::PlaneClassification;
use crate::segment::Segment3;
use crate::shape::Shape3;
use crate::sphere::Sphere3;

#[inline]
fn side(positive: bool) -> f64 {
    if positive {
        1.0
    } else {
        -1.0
    }
}

#[inline]
fn axis_distance(positive: bool, k: f64, coord: f64) -> f64 {
    if positive {
        coord - k
    } else {
        k - coord
    }
}

/// Classify the coordinate interval `[lo, hi]` against the plane at `k`.
fn classify_axis_range(positive: bool, k: f64, lo: f64, hi: f64, tol: Tolerance) -> PlaneClassification {
    classify_distance(axis_distance(positive, k, lo), tol)
        .and(classify_distance(axis_distance(positive, k, hi), tol))
}

/// Where a segment with end coordinates `c1`, `c2` crosses `k`; same
/// conventions as [`Plane3::segment_intersection_factor`].
fn axis_segment_factor(k: f64, c1: f64, c2: f64) -> f64 {
    let tol = Tolerance::default();
    if tol.linear_eq(c1, c2) {
        return if tol.linear_eq(c1, k) { f64::INFINITY } else { f64::NAN };
    }
    let t = (k - c1) / (c2 - c1);
    if (0.0..=1.0).contains(&t) {
        t
    } else {
        f64::NAN
    }
}

macro_rules! orthogonal_plane {
    ($(#[$doc:meta])* $name:ident, $coord:ident, $setter:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
        pub struct $name {
            offset: f64,
            positive: bool,
        }

        impl $name {
            /// Plane at `k` facing the positive axis.
            pub fn new(k: f64) -> Self {
                Self::with_side(k, true)
            }

            pub fn with_side(k: f64, positive: bool) -> Self {
                Self { offset: k, positive }
            }

            /// Offset on the fixed axis.
            pub fn $coord(&self) -> f64 {
                self.offset
            }

            pub fn $setter(&mut self, k: f64) {
                self.offset = k;
            }

            pub fn is_positive(&self) -> bool {
                self.positive
            }

            pub fn set_positive(&mut self, positive: bool) {
                self.positive = positive;
            }

            pub fn translate(&mut self, v: Vector3) {
                self.offset += v.$coord;
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new(0.0)
            }
        }

        impl Plane3 for $name {
            fn coefficients(&self) -> [f64; 4] {
                let n = self.normal();
                [n.x, n.y, n.z, -side(self.positive) * self.offset]
            }

            fn normal(&self) -> Vector3 {
                let mut n = Vector3::ZERO;
                n.$coord = side(self.positive);
                n
            }

            fn pivot(&self) -> Point3 {
                let mut p = Point3::ZERO;
                p.$coord = self.offset;
                p
            }

            fn distance_to_point(&self, p: Point3) -> f64 {
                axis_distance(self.positive, self.offset, p.$coord)
            }

            fn projection(&self, p: Point3) -> Point3 {
                let mut q = p;
                q.$coord = self.offset;
                q
            }

            fn classify_sphere_with_tolerance(&self, s: &Sphere3, tol: Tolerance) -> PlaneClassification {
                let c = s.center.$coord;
                classify_axis_range(self.positive, self.offset, c - s.radius, c + s.radius, tol)
            }

            fn classify_box_with_tolerance(&self, b: &AlignedBox3, tol: Tolerance) -> PlaneClassification {
                classify_axis_range(self.positive, self.offset, b.min().$coord, b.max().$coord, tol)
            }

            fn classify_segment_with_tolerance(&self, s: &Segment3, tol: Tolerance) -> PlaneClassification {
                classify_axis_range(self.positive, self.offset, s.p1.$coord, s.p2.$coord, tol)
            }

            fn segment_intersection_factor(&self, s: &Segment3) -> f64 {
                axis_segment_factor(self.offset, s.p1.$coord, s.p2.$coord)
            }

            fn negate(&mut self) {
                self.positive = !self.positive;
            }

            fn absolute(&mut self) {
                self.positive = true;
            }

            fn set_pivot(&mut self, p: Point3) {
                self.offset = p.$coord;
            }

            /// Only the axis coefficient and `d` are read; the other two are
            /// assumed to be zero.
            fn set_coefficients(&mut self, a: f64, b: f64, c: f64, d: f64) {
                let n = Vector3::new(a, b, c);
                let axis = n.$coord;
                self.positive = axis >= 0.0;
                self.offset = -d / axis;
            }

            fn clear(&mut self) {
                *self = Self::default();
            }
        }

        impl Shape3 for $name {
            /// Infinite on the two free axes, flat on the fixed one.
            fn to_bounding_box(&self) -> AlignedBox3 {
                let mut min = Point3::NEG_INFINITY;
                let mut max = Point3::INFINITY;
                min.$coord = self.offset;
                max.$coord = self.offset;
                AlignedBox3::new(min, max)
            }

            fn closest_point(&self, p: Point3) -> Point3 {
                self.projection(p)
            }

            fn distance_squared(&self, p: Point3) -> f64 {
                let d = p.$coord - self.offset;
                d * d
            }

            fn contains(&self, p: Point3) -> bool {
                Tolerance::default().linear_eq(p.$coord, self.offset)
            }

            fn translate(&mut self, v: Vector3) {
                $name::translate(self, v);
            }

            /// Exact for transforms that keep the axis direction; anything
            /// else is projected back onto the axis.
            fn transform(&mut self, t: &Transform) {
                let n = t.transform_vector(self.normal());
                self.positive = n.$coord >= 0.0;
                self.offset = t.transform_point(self.pivot()).$coord;
            }
        }

        canonical_eq!($name, |p| [p.offset, if p.positive { 1.0 } else { 0.0 }]);
    };
}

orthogonal_plane!(
    /// Plane `x = k`, parallel to YZ.
    PlaneYz, x, set_x
);

orthogonal_plane!(
    /// Plane `y = k`, parallel to XZ.
    PlaneXz, y, set_y
);

orthogonal_plane!(
    /// Plane `z = k`, parallel to XY.
    PlaneXy, z, set_z
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::Plane4;
    use approx::assert_abs_diff_eq;
    use glam::dvec3;
    use PlaneClassification::*;

    #[test]
    fn test_xy_positive_scenario() {
        let p = PlaneXy::new(5.0);
        assert_eq!(p.distance_to_point(dvec3(0.0, 0.0, 10.0)), 5.0);
        assert_eq!(p.classify_point(dvec3(0.0, 0.0, 10.0)), InFrontOf);
        assert_eq!(p.distance_to_point(dvec3(0.0, 0.0, 5.0)), 0.0);
        assert_eq!(p.classify_point(dvec3(0.0, 0.0, 5.0)), Coincident);
        assert_eq!(p.distance_to_point(dvec3(0.0, 0.0, 0.0)), -5.0);
        assert_eq!(p.classify_point(dvec3(0.0, 0.0, 0.0)), Behind);
    }

    #[test]
    fn test_negative_side_flips_distance() {
        let p = PlaneYz::with_side(2.0, false);
        assert_eq!(p.distance_to_point(dvec3(5.0, 9.0, 9.0)), -3.0);
        assert_eq!(p.normal(), dvec3(-1.0, 0.0, 0.0));
        assert_eq!(p.coefficients(), [-1.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_coefficients_exact_zero() {
        let c = PlaneXz::with_side(3.0, false).coefficients();
        assert_eq!(c[0].to_bits(), 0.0f64.to_bits());
        assert_eq!(c[2].to_bits(), 0.0f64.to_bits());
        assert_eq!(c[1], -1.0);
    }

    #[test]
    fn test_agrees_with_general_plane() {
        let fast = PlaneXz::with_side(-1.5, false);
        let [a, b, c, d] = fast.coefficients();
        let general = Plane4::new(a, b, c, d);
        for p in [dvec3(1.0, 2.0, 3.0), dvec3(-4.0, -1.5, 0.0), dvec3(0.0, -9.0, 1.0)] {
            assert_abs_diff_eq!(fast.distance_to_point(p), general.distance_to_point(p), epsilon = 1e-12);
            assert_eq!(fast.classify_point(p), general.classify_point(p));
        }
        let b = AlignedBox3::new(dvec3(0.0, -2.0, 0.0), dvec3(1.0, -1.6, 1.0));
        assert_eq!(fast.classify_box(&b), general.classify_box(&b));
    }

    #[test]
    fn test_pivot_projection_and_set_pivot() {
        let mut p = PlaneYz::new(4.0);
        assert_eq!(p.pivot(), dvec3(4.0, 0.0, 0.0));
        assert_eq!(p.projection(dvec3(9.0, 1.0, 2.0)), dvec3(4.0, 1.0, 2.0));
        p.set_pivot(dvec3(-1.0, 7.0, 7.0));
        assert_eq!(p.x(), -1.0);
    }

    #[test]
    fn test_set_coefficients_reads_axis() {
        let mut p = PlaneXy::default();
        p.set_coefficients(0.0, 0.0, -2.0, 6.0);
        assert!(!p.is_positive());
        assert_eq!(p.z(), 3.0);
        assert_eq!(p.distance_to_point(dvec3(0.0, 0.0, 0.0)), 3.0);
    }

    #[test]
    fn test_set_plane_from_general() {
        let mut p = PlaneYz::default();
        p.set_plane(&Plane4::new(1.0, 0.0, 0.0, -2.0));
        assert_eq!(p.x(), 2.0);
        assert!(p.is_positive());
    }

    #[test]
    fn test_negate_absolute_clear() {
        let mut p = PlaneXy::new(1.0);
        p.negate();
        assert!(!p.is_positive());
        p.absolute();
        assert!(p.is_positive());
        p.set_z(8.0);
        p.clear();
        assert_eq!(p, PlaneXy::new(0.0));
    }

    #[test]
    fn test_translate_uses_matching_component() {
        let mut p = PlaneXz::new(1.0);
        p.translate(dvec3(10.0, 2.0, 10.0));
        assert_eq!(p.y(), 3.0);
    }

    #[test]
    fn test_classify_sphere_and_box_fast_paths() {
        let p = PlaneXy::new(0.0);
        assert_eq!(p.classify_sphere(&Sphere3::new(dvec3(9.0, 9.0, 2.0), 1.0)), InFrontOf);
        assert_eq!(p.classify_sphere(&Sphere3::new(dvec3(9.0, 9.0, -1.0), 1.0)), Coincident);
        let b = AlignedBox3::new(dvec3(-1.0, -1.0, -3.0), dvec3(1.0, 1.0, -2.0));
        assert_eq!(p.classify_box(&b), Behind);
        assert_eq!(PlaneXy::with_side(0.0, false).classify_box(&b), InFrontOf);
    }

    #[test]
    fn test_segment_factor_on_axis() {
        let p = PlaneXz::new(2.0);
        let s = Segment3::new(dvec3(0.0, 0.0, 0.0), dvec3(0.0, 4.0, 0.0));
        assert_eq!(p.segment_intersection_factor(&s), 0.5);
        assert_eq!(p.intersection_with_segment(&s), Some(dvec3(0.0, 2.0, 0.0)));
        let flat = Segment3::new(dvec3(0.0, 2.0, 0.0), dvec3(5.0, 2.0, 5.0));
        assert_eq!(p.segment_intersection_factor(&flat), f64::INFINITY);
        let away = Segment3::new(dvec3(0.0, 3.0, 0.0), dvec3(0.0, 9.0, 0.0));
        assert!(p.segment_intersection_factor(&away).is_nan());
    }

    #[test]
    fn test_orthogonal_planes_intersect_along_axis() {
        let line = PlaneXy::new(1.0).intersection_with_plane(&PlaneYz::new(2.0)).unwrap();
        assert!(line.p1.abs_diff_eq(dvec3(2.0, 0.0, 1.0), 1e-12));
        assert_abs_diff_eq!(line.direction().normalize().y.abs(), 1.0, epsilon = 1e-12);
        assert!(PlaneXy::new(1.0).intersection_with_plane(&PlaneXy::new(4.0)).is_none());
    }

    #[test]
    fn test_bounding_box_flat_on_axis() {
        let bb = PlaneYz::new(3.0).to_bounding_box();
        assert_eq!(bb.min().x, 3.0);
        assert_eq!(bb.max().x, 3.0);
        assert_eq!(bb.max().y, f64::INFINITY);
    }

    #[test]
    fn test_transform_translation_and_flip() {
        let mut p = PlaneXy::new(1.0);
        Shape3::transform(&mut p, &Transform::from_translation(dvec3(0.0, 0.0, 2.0)));
        assert_eq!(p.z(), 3.0);
        Shape3::transform(&mut p, &Transform::from_scale(dvec3(1.0, 1.0, -1.0)));
        assert_eq!(p.z(), -3.0);
        assert!(!p.is_positive());
    }

    #[test]
    fn test_distance_unsigned_in_shape_contract() {
        let p = PlaneXy::with_side(1.0, false);
        assert_eq!(p.distance(dvec3(0.0, 0.0, 4.0)), 3.0);
        assert!(p.contains(dvec3(5.0, 5.0, 1.0)));
    }
}
