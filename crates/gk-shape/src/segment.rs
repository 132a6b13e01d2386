//! Line segment.

use gk_core::Tolerance;
use gk_math::{Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use crate::aabb::AlignedBox3;
use crate::shape::Shape3;

/// A line segment from `p1` to `p2`, parameterized over `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Segment3 {
    pub p1: Point3,
    pub p2: Point3,
}

impl Segment3 {
    pub fn new(p1: Point3, p2: Point3) -> Self {
        Self { p1, p2 }
    }

    /// Segment starting at `origin` and spanning `direction`.
    pub fn from_point_direction(origin: Point3, direction: Vector3) -> Self {
        Self::new(origin, origin + direction)
    }

    /// Unnormalized direction `p2 - p1`.
    pub fn direction(&self) -> Vector3 {
        self.p2 - self.p1
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    pub fn length_squared(&self) -> f64 {
        self.direction().length_squared()
    }

    pub fn point_at(&self, t: f64) -> Point3 {
        self.p1 + t * self.direction()
    }

    /// Parameter in `[0, 1]` of the point of the segment closest to `p`.
    pub fn closest_parameter(&self, p: Point3) -> f64 {
        let d = self.direction();
        let len_sq = d.length_squared();
        if len_sq == 0.0 {
            return 0.0;
        }
        ((p - self.p1).dot(d) / len_sq).clamp(0.0, 1.0)
    }

    /// Closest points between this segment and `other`, as `(on_self, on_other)`.
    pub fn closest_points(&self, other: &Segment3) -> (Point3, Point3) {
        let d1 = self.direction();
        let d2 = other.direction();
        let r = self.p1 - other.p1;
        let a = d1.length_squared();
        let e = d2.length_squared();
        let f = d2.dot(r);

        let (s, t) = if a <= f64::EPSILON && e <= f64::EPSILON {
            (0.0, 0.0)
        } else if a <= f64::EPSILON {
            (0.0, (f / e).clamp(0.0, 1.0))
        } else {
            let c = d1.dot(r);
            if e <= f64::EPSILON {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else {
                let b = d1.dot(d2);
                let denom = a * e - b * b;
                // Parallel segments: any s works, start from the first endpoint.
                let s = if denom != 0.0 {
                    ((b * f - c * e) / denom).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let t = (b * s + f) / e;
                if t < 0.0 {
                    ((-c / a).clamp(0.0, 1.0), 0.0)
                } else if t > 1.0 {
                    (((b - c) / a).clamp(0.0, 1.0), 1.0)
                } else {
                    (s, t)
                }
            }
        };
        (self.p1 + d1 * s, other.p1 + d2 * t)
    }

    /// Squared distance between the two closest points of the segments.
    pub fn distance_squared_to_segment(&self, other: &Segment3) -> f64 {
        let (a, b) = self.closest_points(other);
        a.distance_squared(b)
    }
}

impl Shape3 for Segment3 {
    fn to_bounding_box(&self) -> AlignedBox3 {
        AlignedBox3::new(self.p1, self.p2)
    }

    fn closest_point(&self, p: Point3) -> Point3 {
        self.point_at(self.closest_parameter(p))
    }

    fn contains(&self, p: Point3) -> bool {
        Tolerance::default().is_zero(self.distance_squared(p).sqrt())
    }

    fn translate(&mut self, v: Vector3) {
        self.p1 += v;
        self.p2 += v;
    }

    fn transform(&mut self, t: &Transform) {
        self.p1 = t.transform_point(self.p1);
        self.p2 = t.transform_point(self.p2);
    }
}

canonical_eq!(Segment3, |s| [s.p1.x, s.p1.y, s.p1.z, s.p2.x, s.p2.y, s.p2.z]);
