//! Triangle.

use gk_core::error::Result;
use gk_core::Tolerance;
use gk_math::{Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use crate::aabb::AlignedBox3;
use crate::plane::Plane4;
use crate::segment::Segment3;
use crate::shape::Shape3;

/// A triangle with vertices `p1`, `p2`, `p3`; the front face follows the
/// right-hand rule `(p2 - p1) x (p3 - p1)`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Triangle3 {
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
}

impl Triangle3 {
    pub fn new(p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p1, p2, p3 }
    }

    pub fn vertices(&self) -> [Point3; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// Unnormalized normal; its length is twice the area.
    pub fn normal(&self) -> Vector3 {
        (self.p2 - self.p1).cross(self.p3 - self.p1)
    }

    pub fn area(&self) -> f64 {
        0.5 * self.normal().length()
    }

    pub fn centroid(&self) -> Point3 {
        (self.p1 + self.p2 + self.p3) / 3.0
    }

    /// Collinear or coincident vertices, relative to the triangle's size.
    pub fn is_degenerate(&self) -> bool {
        is_collinear(self.p1, self.p2, self.p3)
    }

    /// Edges `p1p2`, `p2p3`, `p3p1`.
    pub fn edges(&self) -> [Segment3; 3] {
        [
            Segment3::new(self.p1, self.p2),
            Segment3::new(self.p2, self.p3),
            Segment3::new(self.p3, self.p1),
        ]
    }

    /// Supporting plane, pivoted on the centroid.
    pub fn plane(&self) -> Result<Plane4> {
        Plane4::from_points(self.p1, self.p2, self.p3)
    }

    fn closest_point_on_edges(&self, p: Point3) -> Point3 {
        self.edges()
            .iter()
            .map(|e| e.closest_point(p))
            .min_by(|a, b| a.distance_squared(p).total_cmp(&b.distance_squared(p)))
            .unwrap_or(self.p1)
    }
}

/// The cross product of the two edges from `p1` vanishes at the scale of
/// those edges.
pub(crate) fn is_collinear(p1: Point3, p2: Point3, p3: Point3) -> bool {
    let ab = p2 - p1;
    let ac = p3 - p1;
    let scale = f64::EPSILON * ab.length_squared().max(ac.length_squared());
    ab.cross(ac).length_squared() <= scale * scale
}

impl Shape3 for Triangle3 {
    fn to_bounding_box(&self) -> AlignedBox3 {
        AlignedBox3::new(self.p1.min(self.p2).min(self.p3), self.p1.max(self.p2).max(self.p3))
    }

    /// Voronoi-region walk over vertices, edges, then the face.
    fn closest_point(&self, p: Point3) -> Point3 {
        if self.is_degenerate() {
            return self.closest_point_on_edges(p);
        }
        let (a, b, c) = (self.p1, self.p2, self.p3);
        let ab = b - a;
        let ac = c - a;

        let ap = p - a;
        let d1 = ab.dot(ap);
        let d2 = ac.dot(ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(bp);
        let d4 = ac.dot(bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            return a + ab * (d1 / (d1 - d3));
        }

        let cp = p - c;
        let d5 = ab.dot(cp);
        let d6 = ac.dot(cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            return a + ac * (d2 / (d2 - d6));
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        a + ab * (vb * denom) + ac * (vc * denom)
    }

    fn contains(&self, p: Point3) -> bool {
        Tolerance::default().is_zero(self.distance_squared(p).sqrt())
    }

    fn translate(&mut self, v: Vector3) {
        self.p1 += v;
        self.p2 += v;
        self.p3 += v;
    }

    fn transform(&mut self, t: &Transform) {
        self.p1 = t.transform_point(self.p1);
        self.p2 = t.transform_point(self.p2);
        self.p3 = t.transform_point(self.p3);
    }
}

canonical_eq!(Triangle3, |t| [
    t.p1.x, t.p1.y, t.p1.z, t.p2.x, t.p2.y, t.p2.z, t.p3.x, t.p3.y, t.p3.z
]);
