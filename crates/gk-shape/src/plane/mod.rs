//! Oriented planes and plane classification.
//!
//! Every plane satisfies `a*x + b*y + c*z + d = 0` with `(a, b, c)` of unit
//! length. The signed distance of a point is positive on the side the
//! normal points toward, zero on the plane, and negative behind it.
//!
//! [`Plane4`] stores the four coefficients. [`PlaneYz`], [`PlaneXz`] and
//! [`PlaneXy`] store a single offset and a side flag; their distance and
//! classification queries touch one coordinate only.

mod general;
mod orthogonal;

use gk_core::Tolerance;
use gk_math::{Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use crate::aabb::AlignedBox3;
use crate::capsule::Capsule3;
use crate::classification::PlaneClassification;
use crate::path::Path3;
use crate::segment::Segment3;
use crate::shape::Shape3;
use crate::sphere::Sphere3;
use crate::triangle::Triangle3;

pub use general::Plane4;
pub use orthogonal::{PlaneXy, PlaneXz, PlaneYz};

/// Classify a signed distance: within `tol` of zero is coincident.
#[inline]
pub fn classify_distance(distance: f64, tol: Tolerance) -> PlaneClassification {
    if distance > tol.linear {
        PlaneClassification::InFrontOf
    } else if distance < -tol.linear {
        PlaneClassification::Behind
    } else {
        PlaneClassification::Coincident
    }
}

/// Line through two planes as `(point, direction)`, `None` when parallel.
///
/// Coefficients need not be normalized. The point is the one of the line
/// closest to the origin when both normals are unit length.
pub fn plane_plane_intersection(p1: [f64; 4], p2: [f64; 4]) -> Option<(Point3, Vector3)> {
    let n1 = Vector3::new(p1[0], p1[1], p1[2]);
    let n2 = Vector3::new(p2[0], p2[1], p2[2]);
    let u = n1.cross(n2);
    let u_len_sq = u.length_squared();
    let angular = Tolerance::default().angular;
    if u_len_sq <= angular * angular {
        log::trace!("plane intersection rejected, normals {:?} and {:?} are parallel", n1, n2);
        return None;
    }
    let v = p2[3] * n1 - p1[3] * n2;
    Some((v.cross(u) / u_len_sq, u))
}

/// Contract shared by every plane representation.
///
/// The trait is object safe so that planes of different kinds can be
/// compared through `&dyn Plane3`. Distances assume a unit normal; feeding a
/// non-normalized plane is a caller error and is not checked.
pub trait Plane3 {
    /// Equation coefficients `[a, b, c, d]`.
    fn coefficients(&self) -> [f64; 4];

    /// A point known to lie on the plane.
    fn pivot(&self) -> Point3;

    fn normal(&self) -> Vector3 {
        let [a, b, c, _] = self.coefficients();
        Vector3::new(a, b, c)
    }

    fn distance_to_point(&self, p: Point3) -> f64 {
        let [a, b, c, d] = self.coefficients();
        a * p.x + b * p.y + c * p.z + d
    }

    /// Signed distance of `other`'s pivot along this plane's normal.
    ///
    /// Only meaningful when the two planes are parallel; for intersecting
    /// planes the result is a finite but arbitrary value.
    fn distance_to_plane(&self, other: &dyn Plane3) -> f64 {
        self.distance_to_point(other.pivot())
    }

    /// Orthogonal projection of `p` onto the plane.
    fn projection(&self, p: Point3) -> Point3 {
        p - self.normal() * self.distance_to_point(p)
    }

    /// Normals within the default angular tolerance of each other, in
    /// either direction.
    fn is_parallel_to(&self, other: &dyn Plane3) -> bool {
        let angular = Tolerance::default().angular;
        self.normal().cross(other.normal()).length_squared() <= angular * angular
    }

    fn classify_point_with_tolerance(&self, p: Point3, tol: Tolerance) -> PlaneClassification {
        classify_distance(self.distance_to_point(p), tol)
    }

    fn classify_point(&self, p: Point3) -> PlaneClassification {
        self.classify_point_with_tolerance(p, Tolerance::default())
    }

    /// The sphere is reduced to the interval `[d - r, d + r]` of signed
    /// distances; both ends are classified and merged with `and`.
    fn classify_sphere_with_tolerance(&self, s: &Sphere3, tol: Tolerance) -> PlaneClassification {
        let d = self.distance_to_point(s.center);
        classify_distance(d - s.radius, tol).and(classify_distance(d + s.radius, tol))
    }

    fn classify_sphere(&self, s: &Sphere3) -> PlaneClassification {
        self.classify_sphere_with_tolerance(s, Tolerance::default())
    }

    /// Tests the two corners that are extremal along the normal; every other
    /// corner lies between them.
    fn classify_box_with_tolerance(&self, b: &AlignedBox3, tol: Tolerance) -> PlaneClassification {
        let (near, far) = b.extremal_corners(self.normal());
        self.classify_point_with_tolerance(near, tol)
            .and(self.classify_point_with_tolerance(far, tol))
    }

    fn classify_box(&self, b: &AlignedBox3) -> PlaneClassification {
        self.classify_box_with_tolerance(b, Tolerance::default())
    }

    fn classify_segment_with_tolerance(&self, s: &Segment3, tol: Tolerance) -> PlaneClassification {
        self.classify_point_with_tolerance(s.p1, tol)
            .and(self.classify_point_with_tolerance(s.p2, tol))
    }

    fn classify_segment(&self, s: &Segment3) -> PlaneClassification {
        self.classify_segment_with_tolerance(s, Tolerance::default())
    }

    fn classify_triangle_with_tolerance(&self, t: &Triangle3, tol: Tolerance) -> PlaneClassification {
        self.classify_point_with_tolerance(t.p1, tol)
            .and(self.classify_point_with_tolerance(t.p2, tol))
            .and(self.classify_point_with_tolerance(t.p3, tol))
    }

    fn classify_triangle(&self, t: &Triangle3) -> PlaneClassification {
        self.classify_triangle_with_tolerance(t, Tolerance::default())
    }

    fn classify_capsule_with_tolerance(&self, c: &Capsule3, tol: Tolerance) -> PlaneClassification {
        let ends = [Sphere3::new(c.a, c.radius), Sphere3::new(c.b, c.radius)];
        self.classify_sphere_with_tolerance(&ends[0], tol)
            .and(self.classify_sphere_with_tolerance(&ends[1], tol))
    }

    fn classify_capsule(&self, c: &Capsule3) -> PlaneClassification {
        self.classify_capsule_with_tolerance(c, Tolerance::default())
    }

    fn classify_path_with_tolerance(&self, path: &Path3, tol: Tolerance) -> PlaneClassification {
        PlaneClassification::and_all(
            path.points()
                .iter()
                .map(|p| self.classify_point_with_tolerance(*p, tol)),
        )
        .unwrap_or(PlaneClassification::Coincident)
    }

    fn classify_path(&self, path: &Path3) -> PlaneClassification {
        self.classify_path_with_tolerance(path, Tolerance::default())
    }

    /// Intersecting planes straddle each other; parallel planes are
    /// classified by the other plane's pivot.
    fn classify_plane_with_tolerance(&self, other: &dyn Plane3, tol: Tolerance) -> PlaneClassification {
        if self.is_parallel_to(other) {
            self.classify_point_with_tolerance(other.pivot(), tol)
        } else {
            PlaneClassification::Coincident
        }
    }

    fn classify_plane(&self, other: &dyn Plane3) -> PlaneClassification {
        self.classify_plane_with_tolerance(other, Tolerance::default())
    }

    fn intersects_sphere(&self, s: &Sphere3) -> bool {
        self.classify_sphere(s).is_coincident()
    }

    fn intersects_box(&self, b: &AlignedBox3) -> bool {
        self.classify_box(b).is_coincident()
    }

    fn intersects_segment(&self, s: &Segment3) -> bool {
        self.classify_segment(s).is_coincident()
    }

    fn intersects_triangle(&self, t: &Triangle3) -> bool {
        self.classify_triangle(t).is_coincident()
    }

    fn intersects_capsule(&self, c: &Capsule3) -> bool {
        self.classify_capsule(c).is_coincident()
    }

    fn intersects_path(&self, path: &Path3) -> bool {
        self.classify_path(path).is_coincident()
    }

    fn intersects_plane(&self, other: &dyn Plane3) -> bool {
        self.classify_plane(other).is_coincident()
    }

    /// Line shared with `other` as a segment from a point of the line to
    /// that point plus the line direction; `None` for parallel planes.
    fn intersection_with_plane(&self, other: &dyn Plane3) -> Option<Segment3> {
        plane_plane_intersection(self.coefficients(), other.coefficients())
            .map(|(point, direction)| Segment3::from_point_direction(point, direction))
    }

    /// Parameter of the crossing point along `s`: NaN when the segment does
    /// not reach the plane, `+inf` when it lies in it, otherwise `t` in
    /// `[0, 1]`.
    fn segment_intersection_factor(&self, s: &Segment3) -> f64 {
        let denom = self.normal().dot(s.direction());
        let d1 = self.distance_to_point(s.p1);
        if Tolerance::default().is_zero(denom) {
            return if Tolerance::default().is_zero(d1) {
                f64::INFINITY
            } else {
                f64::NAN
            };
        }
        let t = -d1 / denom;
        if (0.0..=1.0).contains(&t) {
            t
        } else {
            f64::NAN
        }
    }

    /// Crossing point of `s`; its first endpoint when it lies in the plane.
    fn intersection_with_segment(&self, s: &Segment3) -> Option<Point3> {
        let t = self.segment_intersection_factor(s);
        if t.is_nan() {
            None
        } else if t.is_infinite() {
            Some(s.p1)
        } else {
            Some(s.point_at(t))
        }
    }

    /// Flip the orientation; front and back swap.
    fn negate(&mut self);

    /// Make every normal component non-negative, keeping the pivot on the
    /// plane.
    fn absolute(&mut self);

    /// Move the plane so it passes through `p`, keeping its normal.
    fn set_pivot(&mut self, p: Point3);

    /// Replace the equation. The input normal need not be unit length.
    fn set_coefficients(&mut self, a: f64, b: f64, c: f64, d: f64);

    fn set_plane(&mut self, other: &dyn Plane3) {
        let [a, b, c, d] = other.coefficients();
        self.set_coefficients(a, b, c, d);
    }

    /// Reset to the canonical plane of this kind.
    fn clear(&mut self);
}

/// Any plane representation, for storage next to other shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plane {
    General(Plane4),
    Yz(PlaneYz),
    Xz(PlaneXz),
    Xy(PlaneXy),
}

macro_rules! each_plane {
    ($value:expr, $p:ident => $body:expr) => {
        match $value {
            Plane::General($p) => $body,
            Plane::Yz($p) => $body,
            Plane::Xz($p) => $body,
            Plane::Xy($p) => $body,
        }
    };
}

impl Plane3 for Plane {
    fn coefficients(&self) -> [f64; 4] {
        each_plane!(self, p => p.coefficients())
    }

    fn pivot(&self) -> Point3 {
        each_plane!(self, p => p.pivot())
    }

    fn normal(&self) -> Vector3 {
        each_plane!(self, p => p.normal())
    }

    fn distance_to_point(&self, pt: Point3) -> f64 {
        each_plane!(self, p => p.distance_to_point(pt))
    }

    fn projection(&self, pt: Point3) -> Point3 {
        each_plane!(self, p => p.projection(pt))
    }

    fn classify_point_with_tolerance(&self, pt: Point3, tol: Tolerance) -> PlaneClassification {
        each_plane!(self, p => p.classify_point_with_tolerance(pt, tol))
    }

    fn classify_sphere_with_tolerance(&self, s: &Sphere3, tol: Tolerance) -> PlaneClassification {
        each_plane!(self, p => p.classify_sphere_with_tolerance(s, tol))
    }

    fn classify_box_with_tolerance(&self, b: &AlignedBox3, tol: Tolerance) -> PlaneClassification {
        each_plane!(self, p => p.classify_box_with_tolerance(b, tol))
    }

    fn classify_segment_with_tolerance(&self, s: &Segment3, tol: Tolerance) -> PlaneClassification {
        each_plane!(self, p => p.classify_segment_with_tolerance(s, tol))
    }

    fn segment_intersection_factor(&self, s: &Segment3) -> f64 {
        each_plane!(self, p => p.segment_intersection_factor(s))
    }

    fn negate(&mut self) {
        each_plane!(self, p => p.negate())
    }

    fn absolute(&mut self) {
        each_plane!(self, p => p.absolute())
    }

    fn set_pivot(&mut self, pt: Point3) {
        each_plane!(self, p => p.set_pivot(pt))
    }

    fn set_coefficients(&mut self, a: f64, b: f64, c: f64, d: f64) {
        each_plane!(self, p => p.set_coefficients(a, b, c, d))
    }

    fn clear(&mut self) {
        each_plane!(self, p => p.clear())
    }
}

impl Shape3 for Plane {
    fn to_bounding_box(&self) -> AlignedBox3 {
        each_plane!(self, p => p.to_bounding_box())
    }

    fn closest_point(&self, pt: Point3) -> Point3 {
        each_plane!(self, p => p.closest_point(pt))
    }

    fn distance_squared(&self, pt: Point3) -> f64 {
        each_plane!(self, p => p.distance_squared(pt))
    }

    fn contains(&self, pt: Point3) -> bool {
        each_plane!(self, p => p.contains(pt))
    }

    fn translate(&mut self, v: Vector3) {
        each_plane!(self, p => Shape3::translate(p, v))
    }

    fn transform(&mut self, t: &Transform) {
        each_plane!(self, p => Shape3::transform(p, t))
    }
}

impl From<Plane4> for Plane {
    fn from(p: Plane4) -> Self {
        Plane::General(p)
    }
}

impl From<PlaneYz> for Plane {
    fn from(p: PlaneYz) -> Self {
        Plane::Yz(p)
    }
}

impl From<PlaneXz> for Plane {
    fn from(p: PlaneXz) -> Self {
        Plane::Xz(p)
    }
}

impl From<PlaneXy> for Plane {
    fn from(p: PlaneXy) -> Self {
        Plane::Xy(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::dvec3;
    use PlaneClassification::*;

    #[test]
    fn test_classify_distance_bands() {
        let tol = Tolerance::default();
        assert_eq!(classify_distance(1.0, tol), InFrontOf);
        assert_eq!(classify_distance(-1.0, tol), Behind);
        assert_eq!(classify_distance(tol.linear / 2.0, tol), Coincident);
        assert_eq!(classify_distance(-tol.linear * 2.0, tol), Behind);
    }

    #[test]
    fn test_plane_plane_intersection_point_on_both() {
        let p1 = [0.0, 0.0, 1.0, 0.0];
        let p2 = [1.0, 0.0, 0.0, -1.0];
        let (point, dir) = plane_plane_intersection(p1, p2).unwrap();
        assert!((point - dvec3(1.0, 0.0, 0.0)).length() < 1e-12);
        assert!(dir.cross(dvec3(0.0, 1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_parallel_planes_have_no_line() {
        assert!(plane_plane_intersection([0.0, 0.0, 1.0, 0.0], [0.0, 0.0, -2.0, 4.0]).is_none());
    }

    #[test]
    fn test_enum_keeps_orthogonal_fast_path() {
        let plane: Plane = PlaneXy::new(5.0).into();
        assert_eq!(plane.distance_to_point(dvec3(3.0, 4.0, 10.0)), 5.0);
        assert_eq!(plane.coefficients(), [0.0, 0.0, 1.0, -5.0]);
        assert_eq!(plane.classify_point(dvec3(0.0, 0.0, 5.0)), Coincident);
    }

    #[test]
    fn test_enum_mixed_kinds() {
        let general: Plane = Plane4::new(0.0, 0.0, 2.0, -10.0).into();
        let xy: Plane = PlaneXy::new(2.0).into();
        assert!(general.is_parallel_to(&xy));
        assert_abs_diff_eq!(general.distance_to_plane(&xy), -3.0, epsilon = 1e-12);
        assert_eq!(general.classify_plane(&xy), Behind);
        let yz: Plane = PlaneYz::new(0.0).into();
        assert_eq!(general.classify_plane(&yz), Coincident);
        let line = general.intersection_with_plane(&yz).unwrap();
        assert_abs_diff_eq!(general.distance_to_point(line.p1), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(yz.distance_to_point(line.p2), 0.0, epsilon = 1e-12);
    }
}
