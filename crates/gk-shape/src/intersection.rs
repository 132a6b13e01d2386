//! Pairwise intersection tests.
//!
//! Every ordered pair of shape kinds implements [`Intersects`]; the two
//! orders of a pair share one function. All tests are closed: shapes that
//! only touch intersect. Near-contact is decided with the default linear
//! tolerance.

use gk_core::Tolerance;
use gk_math::{Point3, Vector3};

use crate::aabb::AlignedBox3;
use crate::capsule::Capsule3;
use crate::path::Path3;
use crate::plane::{Plane, Plane3};
use crate::segment::Segment3;
use crate::shape::Shape3;
use crate::sphere::Sphere3;
use crate::triangle::Triangle3;

/// Whether `self` and `other` share at least one point.
pub trait Intersects<T: ?Sized> {
    fn intersects(&self, other: &T) -> bool;
}

#[inline]
fn eps() -> f64 {
    Tolerance::default().linear
}

/// `dist_sq` is no more than `reach` away, up to tolerance.
#[inline]
fn within(dist_sq: f64, reach: f64) -> bool {
    let r = reach + eps();
    dist_sq <= r * r
}

pub fn box_box(a: &AlignedBox3, b: &AlignedBox3) -> bool {
    a.intersects_box(b)
}

pub fn box_sphere(b: &AlignedBox3, s: &Sphere3) -> bool {
    within(b.distance_squared(s.center), s.radius)
}

/// Slab test clipping the segment parameter range against each axis.
pub fn box_segment(b: &AlignedBox3, s: &Segment3) -> bool {
    let (min, max) = (b.min(), b.max());
    let d = s.direction();
    let (mut t_enter, mut t_exit) = (0.0_f64, 1.0_f64);
    for i in 0..3 {
        if d[i].abs() <= f64::EPSILON {
            if s.p1[i] < min[i] - eps() || s.p1[i] > max[i] + eps() {
                return false;
            }
            continue;
        }
        let inv = 1.0 / d[i];
        let mut t1 = (min[i] - eps() - s.p1[i]) * inv;
        let mut t2 = (max[i] + eps() - s.p1[i]) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        t_enter = t_enter.max(t1);
        t_exit = t_exit.min(t2);
        if t_enter > t_exit {
            return false;
        }
    }
    true
}

/// Separating axis test over the three box normals, the triangle normal
/// and the nine edge cross products.
pub fn box_triangle(b: &AlignedBox3, t: &Triangle3) -> bool {
    let center = b.center();
    let extents = b.half_extents();
    let v = [t.p1 - center, t.p2 - center, t.p3 - center];
    let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];

    let separated = |axis: Vector3| -> bool {
        if axis.length_squared() <= f64::EPSILON * f64::EPSILON {
            return false;
        }
        let p = [v[0].dot(axis), v[1].dot(axis), v[2].dot(axis)];
        let lo = p[0].min(p[1]).min(p[2]);
        let hi = p[0].max(p[1]).max(p[2]);
        let r = extents.dot(axis.abs());
        let slack = eps() * axis.length();
        lo > r + slack || hi < -r - slack
    };

    for box_axis in [Vector3::X, Vector3::Y, Vector3::Z] {
        if separated(box_axis) {
            return false;
        }
        for e in edges {
            if separated(box_axis.cross(e)) {
                return false;
            }
        }
    }
    !separated(edges[0].cross(edges[1]))
}

/// Minimises the convex function `t -> dist(box, segment(t))` by golden
/// section search.
pub fn box_capsule(b: &AlignedBox3, c: &Capsule3) -> bool {
    let axis = c.medial_segment();
    if box_segment(b, &axis) {
        return true;
    }
    within(min_box_distance_squared(b, &axis), c.radius)
}

fn min_box_distance_squared(b: &AlignedBox3, s: &Segment3) -> f64 {
    const INV_PHI: f64 = 0.618_033_988_749_894_8;
    let f = |t: f64| b.distance_squared(s.point_at(t));
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    let mut x1 = hi - INV_PHI * (hi - lo);
    let mut x2 = lo + INV_PHI * (hi - lo);
    let (mut f1, mut f2) = (f(x1), f(x2));
    for _ in 0..80 {
        if f1 <= f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - INV_PHI * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + INV_PHI * (hi - lo);
            f2 = f(x2);
        }
    }
    f1.min(f2).min(f(0.0)).min(f(1.0))
}

pub fn box_plane(b: &AlignedBox3, p: &Plane) -> bool {
    p.intersects_box(b)
}

pub fn sphere_sphere(a: &Sphere3, b: &Sphere3) -> bool {
    within(a.center.distance_squared(b.center), a.radius + b.radius)
}

pub fn sphere_capsule(s: &Sphere3, c: &Capsule3) -> bool {
    within(c.medial_segment().distance_squared(s.center), s.radius + c.radius)
}

pub fn sphere_triangle(s: &Sphere3, t: &Triangle3) -> bool {
    within(t.distance_squared(s.center), s.radius)
}

pub fn sphere_segment(s: &Sphere3, seg: &Segment3) -> bool {
    within(seg.distance_squared(s.center), s.radius)
}

pub fn sphere_plane(s: &Sphere3, p: &Plane) -> bool {
    p.intersects_sphere(s)
}

pub fn capsule_capsule(a: &Capsule3, b: &Capsule3) -> bool {
    within(
        a.medial_segment().distance_squared_to_segment(&b.medial_segment()),
        a.radius + b.radius,
    )
}

pub fn capsule_triangle(c: &Capsule3, t: &Triangle3) -> bool {
    within(segment_triangle_distance_squared(&c.medial_segment(), t), c.radius)
}

pub fn capsule_segment(c: &Capsule3, s: &Segment3) -> bool {
    within(c.medial_segment().distance_squared_to_segment(s), c.radius)
}

pub fn capsule_plane(c: &Capsule3, p: &Plane) -> bool {
    p.intersects_capsule(c)
}

/// Edge against face both ways; covers crossing and coplanar overlap.
pub fn triangle_triangle(a: &Triangle3, b: &Triangle3) -> bool {
    a.edges().iter().any(|e| triangle_segment(b, e))
        || b.edges().iter().any(|e| triangle_segment(a, e))
}

/// Möller–Trumbore restricted to the segment, with an in-plane fallback
/// for segments parallel to the face.
pub fn triangle_segment(t: &Triangle3, s: &Segment3) -> bool {
    if t.is_degenerate() {
        return t.edges().iter().any(|e| segment_segment(e, s));
    }
    let dir = s.direction();
    let e1 = t.p2 - t.p1;
    let e2 = t.p3 - t.p1;
    let h = dir.cross(e2);
    let det = e1.dot(h);
    if det.abs() <= f64::EPSILON * e1.length() * e2.length() * dir.length() {
        return coplanar_segment_triangle(t, s);
    }
    let inv = 1.0 / det;
    let r = s.p1 - t.p1;
    let u = r.dot(h) * inv;
    let q = r.cross(e1);
    let v = dir.dot(q) * inv;
    let w = e2.dot(q) * inv;
    let slack = 1e-12;
    if u < -slack || v < -slack || u + v > 1.0 + slack || w < -slack || w > 1.0 + slack {
        // Near misses are caught by the distance check.
        return Tolerance::default().is_zero(segment_triangle_distance_squared(s, t).sqrt());
    }
    true
}

fn coplanar_segment_triangle(t: &Triangle3, s: &Segment3) -> bool {
    t.contains(s.p1) || t.contains(s.p2) || t.edges().iter().any(|e| segment_segment(e, s))
}

/// Squared distance between a segment and a triangle; zero when they cross.
fn segment_triangle_distance_squared(s: &Segment3, t: &Triangle3) -> f64 {
    if !t.is_degenerate() && crosses_face(t, s) {
        return 0.0;
    }
    let ends = t.distance_squared(s.p1).min(t.distance_squared(s.p2));
    t.edges()
        .iter()
        .map(|e| e.distance_squared_to_segment(s))
        .fold(ends, f64::min)
}

/// Exact crossing of the open face, without tolerance.
fn crosses_face(t: &Triangle3, s: &Segment3) -> bool {
    let n = t.normal();
    let d1 = n.dot(s.p1 - t.p1);
    let d2 = n.dot(s.p2 - t.p1);
    if d1 * d2 > 0.0 || d1 == d2 {
        return false;
    }
    let hit = s.point_at(d1 / (d1 - d2));
    let inside = |a: Point3, b: Point3| n.dot((b - a).cross(hit - a)) >= 0.0;
    inside(t.p1, t.p2) && inside(t.p2, t.p3) && inside(t.p3, t.p1)
}

pub fn triangle_plane(t: &Triangle3, p: &Plane) -> bool {
    p.intersects_triangle(t)
}

pub fn segment_segment(a: &Segment3, b: &Segment3) -> bool {
    within(a.distance_squared_to_segment(b), 0.0)
}

pub fn segment_plane(s: &Segment3, p: &Plane) -> bool {
    p.intersects_segment(s)
}

pub fn plane_plane(a: &Plane, b: &Plane) -> bool {
    a.intersects_plane(b)
}

pub fn path_plane(path: &Path3, p: &Plane) -> bool {
    p.intersects_path(path)
}

/// Any element of the path meets `other`.
pub fn path_any<T: ?Sized>(path: &Path3, other: &T) -> bool
where
    Segment3: Intersects<T>,
{
    path.segments().any(|s| s.intersects(other))
}

pub fn path_path(a: &Path3, b: &Path3) -> bool {
    a.segments().any(|s| path_any(b, &s))
}

macro_rules! reflexive {
    ($ty:ty, $f:path) => {
        impl Intersects<$ty> for $ty {
            fn intersects(&self, other: &$ty) -> bool {
                $f(self, other)
            }
        }
    };
}

macro_rules! symmetric {
    ($a:ty, $b:ty, $f:path) => {
        impl Intersects<$b> for $a {
            fn intersects(&self, other: &$b) -> bool {
                $f(self, other)
            }
        }

        impl Intersects<$a> for $b {
            fn intersects(&self, other: &$a) -> bool {
                $f(other, self)
            }
        }
    };
}

reflexive!(AlignedBox3, box_box);
reflexive!(Sphere3, sphere_sphere);
reflexive!(Capsule3, capsule_capsule);
reflexive!(Triangle3, triangle_triangle);
reflexive!(Segment3, segment_segment);
reflexive!(Plane, plane_plane);
reflexive!(Path3, path_path);

symmetric!(AlignedBox3, Sphere3, box_sphere);
symmetric!(AlignedBox3, Capsule3, box_capsule);
symmetric!(AlignedBox3, Triangle3, box_triangle);
symmetric!(AlignedBox3, Segment3, box_segment);
symmetric!(AlignedBox3, Plane, box_plane);
symmetric!(Sphere3, Capsule3, sphere_capsule);
symmetric!(Sphere3, Triangle3, sphere_triangle);
symmetric!(Sphere3, Segment3, sphere_segment);
symmetric!(Sphere3, Plane, sphere_plane);
symmetric!(Capsule3, Triangle3, capsule_triangle);
symmetric!(Capsule3, Segment3, capsule_segment);
symmetric!(Capsule3, Plane, capsule_plane);
symmetric!(Triangle3, Segment3, triangle_segment);
symmetric!(Triangle3, Plane, triangle_plane);
symmetric!(Segment3, Plane, segment_plane);
symmetric!(Path3, Plane, path_plane);
symmetric!(Path3, AlignedBox3, path_any);
symmetric!(Path3, Sphere3, path_any);
symmetric!(Path3, Capsule3, path_any);
symmetric!(Path3, Triangle3, path_any);
symmetric!(Path3, Segment3, path_any);
