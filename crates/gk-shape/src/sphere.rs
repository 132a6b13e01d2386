//! Solid sphere.

use gk_math::{Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use crate::aabb::AlignedBox3;
use crate::shape::Shape3;

/// A solid sphere; distances are measured to its surface and are zero inside.
///
/// The radius is non-negative after construction and deserialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "RawSphere3")]
pub struct Sphere3 {
    pub center: Point3,
    pub radius: f64,
}

#[derive(Deserialize)]
struct RawSphere3 {
    center: Point3,
    radius: f64,
}

impl From<RawSphere3> for Sphere3 {
    fn from(raw: RawSphere3) -> Self {
        Sphere3::new(raw.center, raw.radius)
    }
}

impl Sphere3 {
    /// Negative radii are stored as their absolute value.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }
}

impl Default for Sphere3 {
    fn default() -> Self {
        Self::new(Point3::ZERO, 1.0)
    }
}

impl Shape3 for Sphere3 {
    fn to_bounding_box(&self) -> AlignedBox3 {
        let r = Vector3::splat(self.radius);
        AlignedBox3::new(self.center - r, self.center + r)
    }

    fn closest_point(&self, p: Point3) -> Point3 {
        let offset = p - self.center;
        let len_sq = offset.length_squared();
        if len_sq <= self.radius * self.radius {
            p
        } else {
            self.center + offset * (self.radius / len_sq.sqrt())
        }
    }

    fn distance_squared(&self, p: Point3) -> f64 {
        let d = (p.distance_squared(self.center).sqrt() - self.radius).max(0.0);
        d * d
    }

    fn contains(&self, p: Point3) -> bool {
        p.distance_squared(self.center) <= self.radius * self.radius
    }

    fn translate(&mut self, v: Vector3) {
        self.center += v;
    }

    fn transform(&mut self, t: &Transform) {
        self.center = t.transform_point(self.center);
        self.radius *= t.max_scale();
    }
}

canonical_eq!(Sphere3, |s| [s.center.x, s.center.y, s.center.z, s.radius]);
