#![allow(dead_code)]

use drone_ngin::{
    geometry::{Mesh, Resolution, Surface, VertexAttributes},
    simulation::{DroneParams, Rotor},
};

/// A freshly initialized mesh.
pub(crate) fn mesh<S: Surface>(res: Resolution, attributes: VertexAttributes) -> Mesh<S> {
    let mut mesh = Mesh::new(res);
    mesh.initialize(attributes);
    mesh
}

/// The four rotors with the given spin velocities.
pub(crate) fn rotors(spins: [f64; 4]) -> [Rotor; 4] {
    let mut rotors = Rotor::quad();
    for (rotor, spin) in rotors.iter_mut().zip(spins) {
        rotor.spin_velocity = spin;
    }
    rotors
}

pub(crate) fn params() -> DroneParams {
    DroneParams::default()
}

/// Headless device for tests that bind GPU buffers.
#[cfg(feature = "integration-tests")]
pub(crate) fn gpu() -> (wgpu::Device, wgpu::Queue) {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create a tokio runtime");
    runtime
        .block_on(drone_ngin::context::headless_device())
        .expect("No GPU adapter available for integration tests")
}
