//! Common contract of every shape, and a closed sum over all of them.

use gk_math::{Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use crate::aabb::AlignedBox3;
use crate::capsule::Capsule3;
use crate::intersection::Intersects;
use crate::path::Path3;
use crate::plane::Plane;
use crate::segment::Segment3;
use crate::sphere::Sphere3;
use crate::triangle::Triangle3;

/// Queries and rigid motions available on every shape.
///
/// Distances are Euclidean unless named otherwise and are zero for points
/// the shape contains.
pub trait Shape3 {
    /// Smallest axis-aligned box enclosing the shape. Unbounded shapes
    /// report infinite extents.
    fn to_bounding_box(&self) -> AlignedBox3;

    /// Point of the shape nearest to `p`.
    fn closest_point(&self, p: Point3) -> Point3;

    fn distance_squared(&self, p: Point3) -> f64 {
        self.closest_point(p).distance_squared(p)
    }

    fn distance(&self, p: Point3) -> f64 {
        self.distance_squared(p).sqrt()
    }

    /// Manhattan distance to the closest point.
    fn distance_l1(&self, p: Point3) -> f64 {
        (p - self.closest_point(p)).abs().element_sum()
    }

    /// Chebyshev distance to the closest point.
    fn distance_linf(&self, p: Point3) -> f64 {
        (p - self.closest_point(p)).abs().max_element()
    }

    fn contains(&self, p: Point3) -> bool;

    fn translate(&mut self, v: Vector3);

    fn transform(&mut self, t: &Transform);
}

/// Any shape of this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    AlignedBox(AlignedBox3),
    Sphere(Sphere3),
    Capsule(Capsule3),
    Triangle(Triangle3),
    Segment(Segment3),
    Plane(Plane),
    Path(Path3),
}

macro_rules! each_shape {
    ($value:expr, $s:ident => $body:expr) => {
        match $value {
            Shape::AlignedBox($s) => $body,
            Shape::Sphere($s) => $body,
            Shape::Capsule($s) => $body,
            Shape::Triangle($s) => $body,
            Shape::Segment($s) => $body,
            Shape::Plane($s) => $body,
            Shape::Path($s) => $body,
        }
    };
}

/// Resolve the concrete type of `other` once `this` is already concrete.
macro_rules! against {
    ($this:expr, $other:expr) => {
        match $other {
            Shape::AlignedBox(o) => $this.intersects(o),
            Shape::Sphere(o) => $this.intersects(o),
            Shape::Capsule(o) => $this.intersects(o),
            Shape::Triangle(o) => $this.intersects(o),
            Shape::Segment(o) => $this.intersects(o),
            Shape::Plane(o) => $this.intersects(o),
            Shape::Path(o) => $this.intersects(o),
        }
    };
}

impl Shape {
    /// Whether the two shapes share at least one point. Touching counts.
    pub fn intersects(&self, other: &Shape) -> bool {
        each_shape!(self, s => against!(s, other))
    }
}

impl Shape3 for Shape {
    fn to_bounding_box(&self) -> AlignedBox3 {
        each_shape!(self, s => s.to_bounding_box())
    }

    fn closest_point(&self, p: Point3) -> Point3 {
        each_shape!(self, s => s.closest_point(p))
    }

    fn distance_squared(&self, p: Point3) -> f64 {
        each_shape!(self, s => s.distance_squared(p))
    }

    fn distance_l1(&self, p: Point3) -> f64 {
        each_shape!(self, s => s.distance_l1(p))
    }

    fn distance_linf(&self, p: Point3) -> f64 {
        each_shape!(self, s => s.distance_linf(p))
    }

    fn contains(&self, p: Point3) -> bool {
        each_shape!(self, s => s.contains(p))
    }

    fn translate(&mut self, v: Vector3) {
        each_shape!(self, s => Shape3::translate(s, v))
    }

    fn transform(&mut self, t: &Transform) {
        each_shape!(self, s => Shape3::transform(s, t))
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Shape {
                fn from(s: $ty) -> Self {
                    Shape::$variant(s)
                }
            }
        )*
    };
}

impl_from_shape!(
    AlignedBox(AlignedBox3),
    Sphere(Sphere3),
    Capsule(Capsule3),
    Triangle(Triangle3),
    Segment(Segment3),
    Plane(Plane),
    Path(Path3),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::PlaneXy;
    use glam::dvec3;

    #[test]
    fn test_default_l1_and_linf_use_closest_point() {
        let s = Sphere3::new(Point3::ZERO, 1.0);
        let p = dvec3(3.0, 0.0, 0.0);
        assert_eq!(s.distance_l1(p), 2.0);
        assert_eq!(s.distance_linf(p), 2.0);
    }

    #[test]
    fn test_enum_delegates_queries() {
        let shape: Shape = AlignedBox3::new(Point3::ZERO, Point3::ONE).into();
        assert!(shape.contains(dvec3(0.5, 0.5, 0.5)));
        assert_eq!(shape.distance(dvec3(0.5, 0.5, 3.0)), 2.0);
        assert_eq!(shape.to_bounding_box().max(), Point3::ONE);
    }

    #[test]
    fn test_enum_translate_moves_inner_shape() {
        let mut shape: Shape = Sphere3::new(Point3::ZERO, 1.0).into();
        shape.translate(dvec3(0.0, 0.0, 4.0));
        assert_eq!(shape, Shape::Sphere(Sphere3::new(dvec3(0.0, 0.0, 4.0), 1.0)));
    }

    #[test]
    fn test_enum_intersects_dispatches_both_sides() {
        let plane: Shape = Plane::from(PlaneXy::new(0.0)).into();
        let sphere: Shape = Sphere3::new(dvec3(0.0, 0.0, 0.5), 1.0).into();
        let far: Shape = Sphere3::new(dvec3(0.0, 0.0, 5.0), 1.0).into();
        assert!(plane.intersects(&sphere));
        assert!(sphere.intersects(&plane));
        assert!(!plane.intersects(&far));
        assert!(!far.intersects(&plane));
    }
}
