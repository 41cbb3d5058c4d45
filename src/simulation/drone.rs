//! Physical description of the quadrotor.
//!
//! The frame is four arms of length [`FRAME_LENGTH`] and radius
//! [`FRAME_RADIUS`] meeting at the centre; a rotor sits at the end of each
//! arm. Mass and the diagonal inertia tensor follow from the frame geometry
//! and material density.

use std::f64::consts::{PI, TAU};

use cgmath::{Matrix3, SquareMatrix, Vector3};

pub const FLOATING_HEIGHT: f64 = 3.0;
pub const AXLE_HEIGHT: f64 = 1.0;
pub const AXLE_RADIUS: f64 = 0.1;
pub const CENTER_SPHERE_RADIUS: f64 = 0.3;
pub const BLADE_LENGTH: f64 = 1.5;
pub const BLADE_WIDTH: f64 = 0.2;
pub const BLADE_HEIGHT: f64 = 0.05;
pub const FRAME_LENGTH: f64 = 3.0;
pub const FRAME_RADIUS: f64 = 0.2;
pub const CONNECT_SPHERE_RADIUS: f64 = 0.25;
pub const DENSITY: f64 = 3.0;

pub const LIFT_COEFFICIENT: f64 = 1.0;
/// kg/m^3 at sea level.
pub const AIR_DENSITY: f64 = 1.225;

/// Rotor mounting points in the body frame, in rotor order.
pub const ROTOR_OFFSETS: [[f64; 3]; 4] = [
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
];

/// One propeller: where it is mounted and how fast it spins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotor {
    pub offset: Vector3<f64>,
    /// Angular speed in rad per unit time; the sign selects the spin direction.
    pub spin_velocity: f64,
}

impl Rotor {
    pub fn new(offset: Vector3<f64>) -> Self {
        Self {
            offset,
            spin_velocity: 0.0,
        }
    }

    /// The four rotors at rest, mounted at [`ROTOR_OFFSETS`].
    pub fn quad() -> [Rotor; 4] {
        ROTOR_OFFSETS.map(|offset| Rotor::new(offset.into()))
    }
}

/// Constants consumed by the integrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DroneParams {
    pub blade_length: f64,
    pub blade_width: f64,
    pub lift_coefficient: f64,
    pub air_density: f64,
    pub total_mass: f64,
    pub inertia: Matrix3<f64>,
}

impl DroneParams {
    /// Parameters of a frame built from four solid cylindrical arms.
    pub fn from_frame(frame_length: f64, frame_radius: f64, density: f64) -> Self {
        let total_mass = density * frame_length * PI * frame_radius * frame_radius * 4.0;
        let per_mass_axle = frame_radius * frame_radius / 2.0;
        let per_mass_end = (3.0 * frame_radius * frame_radius + 4.0 * frame_length * frame_length) / 12.0;
        let ix = per_mass_axle * total_mass / 2.0 + per_mass_end * total_mass / 2.0;
        let iy = per_mass_end * total_mass;
        Self {
            blade_length: BLADE_LENGTH,
            blade_width: BLADE_WIDTH,
            lift_coefficient: LIFT_COEFFICIENT,
            air_density: AIR_DENSITY,
            total_mass,
            inertia: Matrix3::from_diagonal(Vector3::new(ix, iy, ix)),
        }
    }

    pub fn blade_area(&self) -> f64 {
        TAU * self.blade_length * self.blade_width
    }

    pub fn inertia_inverse(&self) -> Matrix3<f64> {
        // the tensor is diagonal with positive entries
        self.inertia.invert().unwrap_or(Matrix3::from_value(0.0))
    }
}

impl Default for DroneParams {
    fn default() -> Self {
        Self::from_frame(FRAME_LENGTH, FRAME_RADIUS, DENSITY)
    }
}
