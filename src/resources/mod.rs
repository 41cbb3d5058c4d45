//! GPU resources built from generated geometry.
//!
//! - `shape` owns the vertex, index and indirect buffers of one tessellated shape

pub mod shape;

pub use shape::{CylinderShape, Shape, SphereShape};
