//! Polyline path.

use std::hash::{Hash, Hasher};

use gk_core::error::{GeomError, Result};
use gk_core::{float, Tolerance};
use gk_math::{Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use crate::aabb::AlignedBox3;
use crate::segment::Segment3;
use crate::shape::Shape3;

/// An open or closed polyline through at least one point.
///
/// Only straight elements are modelled; a single-point path behaves like
/// that point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPath3")]
pub struct Path3 {
    points: Vec<Point3>,
    closed: bool,
}

#[derive(Deserialize)]
struct RawPath3 {
    points: Vec<Point3>,
    closed: bool,
}

impl TryFrom<RawPath3> for Path3 {
    type Error = GeomError;

    fn try_from(raw: RawPath3) -> Result<Self> {
        Path3::new(raw.points, raw.closed)
    }
}

impl Path3 {
    pub fn new(points: Vec<Point3>, closed: bool) -> Result<Self> {
        if points.is_empty() {
            return Err(GeomError::Degenerate("path needs at least one point".into()));
        }
        Ok(Self { points, closed })
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn push(&mut self, p: Point3) {
        self.points.push(p);
    }

    /// Straight elements of the path, including the closing one.
    ///
    /// A single-point path yields one zero-length segment so that every
    /// pairwise test sees it.
    pub fn segments(&self) -> impl Iterator<Item = Segment3> + '_ {
        let n = self.points.len();
        let count = match (n, self.closed) {
            (1, _) => 1,
            (2, _) | (_, false) => n - 1,
            (_, true) => n,
        };
        (0..count).map(move |i| Segment3::new(self.points[i], self.points[(i + 1) % n]))
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }
}

impl Shape3 for Path3 {
    fn to_bounding_box(&self) -> AlignedBox3 {
        AlignedBox3::from_points(&self.points).unwrap_or_default()
    }

    fn closest_point(&self, p: Point3) -> Point3 {
        self.segments()
            .map(|s| s.closest_point(p))
            .min_by(|a, b| a.distance_squared(p).total_cmp(&b.distance_squared(p)))
            .unwrap_or_else(|| self.points[0])
    }

    fn contains(&self, p: Point3) -> bool {
        Tolerance::default().is_zero(self.distance_squared(p).sqrt())
    }

    fn translate(&mut self, v: Vector3) {
        for p in &mut self.points {
            *p += v;
        }
    }

    fn transform(&mut self, t: &Transform) {
        for p in &mut self.points {
            *p = t.transform_point(*p);
        }
    }
}

impl PartialEq for Path3 {
    fn eq(&self, other: &Self) -> bool {
        self.closed == other.closed
            && self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| float::bits_eq(&a.to_array(), &b.to_array()))
    }
}

impl Eq for Path3 {}

impl Hash for Path3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.closed.hash(state);
        for p in &self.points {
            float::hash_f64s(&p.to_array(), state);
        }
    }
}
