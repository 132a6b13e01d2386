//! GeoKernel math primitives.
//!
//! Points and vectors are plain `glam` double-precision vectors; the kernel
//! treats them as opaque value types with `x`, `y`, `z` fields.

pub mod transform;

pub use glam::{DAffine3, DMat3, DMat4, DQuat, DVec3, DVec4};
pub use transform::Transform;

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
