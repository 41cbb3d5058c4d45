//! drone-ngin
//!
//! A small wgpu demo engine: a quadrotor built from procedurally tessellated
//! spheres and cylinders flies under simplified rotor lift, integrated with
//! explicit Euler steps, and is drawn with Phong or Gouraud shading.
//!
//! High-level modules
//! - `geometry`: sphere and cylinder tessellation into triangle strips
//! - `resources`: GPU buffers for tessellated shapes, remeshing and drawing
//! - `simulation`: drone constants, rigid-body integrator and simulation context
//! - `data_structures`: affine transforms, vertex layouts, depth texture
//! - `camera`: orbiting view and aspect-corrected projection
//! - `pipelines`: Phong/Gouraud pipelines, lights and materials
//! - `render`: drone scene composition and batched drawing
//! - `controls`: keyboard commands and the interactive state
//! - `context`: GPU and window context
//! - `flow`: winit event loop and `run()`
//! - `config`: start-up settings
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod flow;
pub mod geometry;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod simulation;

// Re-exports commonly used types for convenience in downstream code.
pub use config::{DrawPath, Settings, ShadingModel};
pub use data_structures::transform::Transform;
pub use flow::run;
pub use geometry::{Face, Resolution, VertexAttributes};
pub use resources::shape::{CylinderShape, SphereShape};
pub use simulation::Simulation;
