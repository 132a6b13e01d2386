//! Geokernel shapes: oriented planes, bounded primitives, and the pairwise
//! intersection tests between them.

/// Bitwise equality and hashing over a fixed list of float fields, with
/// `-0.0` folded onto `0.0`.
macro_rules! canonical_eq {
    ($ty:ty, |$s:ident| $fields:expr) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                let key = |$s: &$ty| $fields;
                ::gk_core::float::bits_eq(&key(self), &key(other))
            }
        }

        impl Eq for $ty {}

        impl ::std::hash::Hash for $ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                let key = |$s: &$ty| $fields;
                ::gk_core::float::hash_f64s(&key(self), state);
            }
        }
    };
}

pub mod aabb;
pub mod capsule;
pub mod classification;
pub mod intersection;
pub mod path;
pub mod plane;
pub mod segment;
pub mod shape;
pub mod sphere;
pub mod triangle;

pub use aabb::AlignedBox3;
pub use capsule::Capsule3;
pub use classification::PlaneClassification;
pub use intersection::Intersects;
pub use path::Path3;
pub use plane::{Plane, Plane3, Plane4, PlaneXy, PlaneXz, PlaneYz};
pub use segment::Segment3;
pub use shape::{Shape, Shape3};
pub use sphere::Sphere3;
pub use triangle::Triangle3;
