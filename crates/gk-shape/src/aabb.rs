//! Axis-aligned bounding box.

use approx::AbsDiffEq;
use gk_core::error::{GeomError, Result};
use gk_core::traits::Validate;
use gk_math::{Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use crate::shape::Shape3;

/// Axis-aligned box in 3D space.
///
/// The corners satisfy `min.c <= max.c` on every axis after every public
/// mutator returns. A box whose corners coincide is degenerate ("empty"),
/// which is also the cleared and default state.
///
/// Deserialized corners are re-sorted like [`AlignedBox3::new`] does.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "RawAlignedBox3")]
pub struct AlignedBox3 {
    min: Point3,
    max: Point3,
}

#[derive(Deserialize)]
struct RawAlignedBox3 {
    min: Point3,
    max: Point3,
}

impl From<RawAlignedBox3> for AlignedBox3 {
    fn from(raw: RawAlignedBox3) -> Self {
        AlignedBox3::new(raw.min, raw.max)
    }
}

impl AlignedBox3 {
    /// Box spanning two arbitrary corners, in any order.
    pub fn new(p1: Point3, p2: Point3) -> Self {
        let mut b = Self::default();
        b.set_from_corners(p1, p2);
        b
    }

    /// Box with lower corner `origin` and extent `size`; negative sizes are
    /// folded back so the invariant still holds.
    pub fn from_origin_size(origin: Point3, size: Vector3) -> Self {
        Self::new(origin, origin + size)
    }

    /// Smallest box enclosing all points, `None` for an empty slice.
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    /// Box covering the whole space.
    pub fn infinite() -> Self {
        Self {
            min: Point3::NEG_INFINITY,
            max: Point3::INFINITY,
        }
    }

    #[inline]
    pub fn min(&self) -> Point3 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Point3 {
        self.max
    }

    /// Set the box from two corners given in any order.
    ///
    /// Every other mutator funnels through here.
    pub fn set_from_corners(&mut self, p1: Point3, p2: Point3) {
        self.min = p1.min(p2);
        self.max = p1.max(p2);
    }

    /// Set the box from its center and one of its corners; the opposite
    /// corner is the reflection of `corner` through `center`.
    pub fn set_from_center(&mut self, center: Point3, corner: Point3) {
        let opposite = center + (center - corner);
        self.set_from_corners(corner, opposite);
    }

    /// Move each bound independently by the given deltas.
    ///
    /// Positive deltas on `min` or negative deltas on `max` shrink the box;
    /// an axis that ends up inverted is re-sorted.
    pub fn inflate(&mut self, dmin: Vector3, dmax: Vector3) {
        let lo = self.min + dmin;
        let hi = self.max + dmax;
        if lo.cmpgt(hi).any() {
            log::debug!("inflate inverted box {:?} -> ({:?}, {:?}), re-sorting", self, lo, hi);
        }
        self.set_from_corners(lo, hi);
    }

    /// Shift both corners by `delta`.
    pub fn translate(&mut self, delta: Vector3) {
        self.set_from_corners(self.min + delta, self.max + delta);
    }

    /// Collapse to the degenerate box at the origin.
    pub fn clear(&mut self) {
        self.set_from_corners(Point3::ZERO, Point3::ZERO);
    }

    /// `true` iff min equals max on all three axes.
    pub fn is_empty(&self) -> bool {
        self.min == self.max
    }

    pub fn set_x(&mut self, min: f64, max: f64) {
        self.set_from_corners(
            Point3::new(min, self.min.y, self.min.z),
            Point3::new(max, self.max.y, self.max.z),
        );
    }

    pub fn set_y(&mut self, min: f64, max: f64) {
        self.set_from_corners(
            Point3::new(self.min.x, min, self.min.z),
            Point3::new(self.max.x, max, self.max.z),
        );
    }

    pub fn set_z(&mut self, min: f64, max: f64) {
        self.set_from_corners(
            Point3::new(self.min.x, self.min.y, min),
            Point3::new(self.max.x, self.max.y, max),
        );
    }

    // Single-bound setters: the moved bound may cross the other one, in
    // which case the two are swapped.

    pub fn set_min_x(&mut self, x: f64) {
        self.set_x(x, self.max.x);
    }

    pub fn set_min_y(&mut self, y: f64) {
        self.set_y(y, self.max.y);
    }

    pub fn set_min_z(&mut self, z: f64) {
        self.set_z(z, self.max.z);
    }

    pub fn set_max_x(&mut self, x: f64) {
        self.set_x(self.min.x, x);
    }

    pub fn set_max_y(&mut self, y: f64) {
        self.set_y(self.min.y, y);
    }

    pub fn set_max_z(&mut self, z: f64) {
        self.set_z(self.min.z, z);
    }

    pub fn center(&self) -> Point3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Half of the size on every axis.
    pub fn half_extents(&self) -> Vector3 {
        self.size() * 0.5
    }

    /// The eight corners; bit 0 selects x, bit 1 y, bit 2 z (0 = min, 1 = max).
    pub fn corners(&self) -> [Point3; 8] {
        std::array::from_fn(|i| {
            Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }

    /// The corners nearest and farthest along `direction`.
    pub fn extremal_corners(&self, direction: Vector3) -> (Point3, Point3) {
        let pick = |d: f64, lo: f64, hi: f64| if d >= 0.0 { (lo, hi) } else { (hi, lo) };
        let (nx, fx) = pick(direction.x, self.min.x, self.max.x);
        let (ny, fy) = pick(direction.y, self.min.y, self.max.y);
        let (nz, fz) = pick(direction.z, self.min.z, self.max.z);
        (Point3::new(nx, ny, nz), Point3::new(fx, fy, fz))
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow uniformly by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        let offset = Vector3::splat(amount);
        Self::new(self.min - offset, self.max + offset)
    }

    pub fn farthest_point(&self, p: Point3) -> Point3 {
        let far = |v: f64, lo: f64, hi: f64| if (v - lo).abs() > (v - hi).abs() { lo } else { hi };
        Point3::new(
            far(p.x, self.min.x, self.max.x),
            far(p.y, self.min.y, self.max.y),
            far(p.z, self.min.z, self.max.z),
        )
    }

    /// Closed-interval overlap test.
    pub fn intersects_box(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    #[inline]
    fn outside_deltas(&self, p: Point3) -> Vector3 {
        (self.min - p).max(Vector3::ZERO) + (p - self.max).max(Vector3::ZERO)
    }
}

impl Shape3 for AlignedBox3 {
    fn to_bounding_box(&self) -> AlignedBox3 {
        *self
    }

    fn closest_point(&self, p: Point3) -> Point3 {
        p.clamp(self.min, self.max)
    }

    fn distance_squared(&self, p: Point3) -> f64 {
        self.outside_deltas(p).length_squared()
    }

    fn distance_l1(&self, p: Point3) -> f64 {
        self.outside_deltas(p).element_sum()
    }

    fn distance_linf(&self, p: Point3) -> f64 {
        self.outside_deltas(p).max_element()
    }

    fn contains(&self, p: Point3) -> bool {
        self.min.cmple(p).all() && p.cmple(self.max).all()
    }

    fn translate(&mut self, v: Vector3) {
        AlignedBox3::translate(self, v);
    }

    fn transform(&mut self, t: &Transform) {
        let corners = self.corners().map(|c| t.transform_point(c));
        if let Some(b) = Self::from_points(&corners) {
            *self = b;
        }
    }
}

impl Validate for AlignedBox3 {
    fn validate(&self) -> Result<()> {
        if self.min.is_nan() || self.max.is_nan() {
            return Err(GeomError::InvalidValue(format!("box has NaN corner: {:?}", self)));
        }
        if self.min.cmpgt(self.max).any() {
            return Err(GeomError::InvalidValue(format!(
                "box corners out of order: min={:?} max={:?}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

canonical_eq!(AlignedBox3, |b| [
    b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
]);

impl AbsDiffEq for AlignedBox3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.min.abs_diff_eq(other.min, epsilon) && self.max.abs_diff_eq(other.max, epsilon)
    }
}
