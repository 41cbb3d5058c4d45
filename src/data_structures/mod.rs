//! Engine data structures: transforms, vertex layouts and textures.
//!
//! - `transform` composes the affine model-view and pose matrices
//! - `vertex` maps attribute slots onto wgpu vertex buffer layouts
//! - `texture` holds the depth buffer

pub mod texture;
pub mod transform;
pub mod vertex;
