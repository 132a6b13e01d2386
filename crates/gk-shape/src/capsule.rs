//! Capsule: a segment swept by a sphere.

use gk_math::{Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use crate::aabb::AlignedBox3;
use crate::segment::Segment3;
use crate::shape::Shape3;

/// A solid capsule given by its medial segment `a`-`b` and its radius.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "RawCapsule3")]
pub struct Capsule3 {
    pub a: Point3,
    pub b: Point3,
    pub radius: f64,
}

#[derive(Deserialize)]
struct RawCapsule3 {
    a: Point3,
    b: Point3,
    radius: f64,
}

impl From<RawCapsule3> for Capsule3 {
    fn from(raw: RawCapsule3) -> Self {
        Capsule3::new(raw.a, raw.b, raw.radius)
    }
}

impl Capsule3 {
    pub fn new(a: Point3, b: Point3, radius: f64) -> Self {
        Self {
            a,
            b,
            radius: radius.abs(),
        }
    }

    pub fn medial_segment(&self) -> Segment3 {
        Segment3::new(self.a, self.b)
    }
}

impl Shape3 for Capsule3 {
    fn to_bounding_box(&self) -> AlignedBox3 {
        let r = Vector3::splat(self.radius);
        AlignedBox3::new(self.a.min(self.b) - r, self.a.max(self.b) + r)
    }

    fn closest_point(&self, p: Point3) -> Point3 {
        let on_axis = self.medial_segment().closest_point(p);
        let offset = p - on_axis;
        let len_sq = offset.length_squared();
        if len_sq <= self.radius * self.radius {
            p
        } else {
            on_axis + offset * (self.radius / len_sq.sqrt())
        }
    }

    fn distance_squared(&self, p: Point3) -> f64 {
        let axis_dist = self.medial_segment().distance_squared(p).sqrt();
        let d = (axis_dist - self.radius).max(0.0);
        d * d
    }

    fn contains(&self, p: Point3) -> bool {
        self.medial_segment().distance_squared(p) <= self.radius * self.radius
    }

    fn translate(&mut self, v: Vector3) {
        self.a += v;
        self.b += v;
    }

    fn transform(&mut self, t: &Transform) {
        self.a = t.transform_point(self.a);
        self.b = t.transform_point(self.b);
        self.radius *= t.max_scale();
    }
}

canonical_eq!(Capsule3, |c| [
    c.a.x, c.a.y, c.a.z, c.b.x, c.b.y, c.b.z, c.radius
]);
