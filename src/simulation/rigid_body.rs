//! Forward Euler integration of the drone's rigid-body motion.
//!
//! Each rotor contributes a vertical lift force that grows with the square of
//! its blade-tip speed and keeps the sign of the spin. The forces are summed
//! into a net force and a net torque about the centre; one step then updates
//! the linear and angular velocity and composes the resulting translation and
//! rotation onto the pose.

use cgmath::{InnerSpace, Rad, Vector3, Zero};

use super::drone::{DroneParams, Rotor};
use crate::data_structures::transform::Transform;

/// Below this angular speed no rotation is applied.
pub const ANGULAR_EPSILON: f64 = 1e-6;

/// Velocities and pose of a rigid body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidBodyState {
    pub velocity: Vector3<f64>,
    pub angular_velocity: Vector3<f64>,
    pub pose: Transform,
}

impl RigidBodyState {
    pub fn at_rest(pose: Transform) -> Self {
        Self {
            velocity: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            pose,
        }
    }

    /// Advance by one Euler step of length `dt`.
    pub fn step(&mut self, params: &DroneParams, rotors: &[Rotor; 4], dt: f64) {
        euler_step(
            params,
            rotors,
            &mut self.pose,
            &mut self.velocity,
            &mut self.angular_velocity,
            dt,
        );
    }
}

impl Default for RigidBodyState {
    fn default() -> Self {
        Self::at_rest(Transform::identity())
    }
}

/// Net force and torque about the body centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Forces {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
}

/// Lift produced by a rotor spinning at `spin_velocity`.
///
/// The blade tip moves at `v = spin * blade_length / 2`; the lift is
/// `C_L * 0.5 * rho * |v| * v / 3 * A_blade`, so it is quadratic in speed and
/// signed like the spin.
pub fn lift_force(params: &DroneParams, spin_velocity: f64) -> f64 {
    let tip_speed = spin_velocity * params.blade_length / 2.0;
    params.lift_coefficient * 0.5 * params.air_density * tip_speed.abs() * tip_speed / 3.0
        * params.blade_area()
}

pub fn rotor_forces(params: &DroneParams, rotors: &[Rotor; 4]) -> Forces {
    rotors.iter().fold(
        Forces {
            force: Vector3::zero(),
            torque: Vector3::zero(),
        },
        |acc, rotor| {
            let lift = Vector3::new(0.0, lift_force(params, rotor.spin_velocity), 0.0);
            Forces {
                force: acc.force + lift,
                torque: acc.torque + rotor.offset.cross(lift),
            }
        },
    )
}

/// One explicit Euler step.
///
/// Velocities are updated from the rotor forces first, then the pose is
/// translated by `velocity * dt` and, if the body spins faster than
/// [`ANGULAR_EPSILON`], rotated by `|angular_velocity| * dt` about the angular
/// velocity axis. Total for finite inputs; `dt == 0` leaves everything as is.
pub fn euler_step(
    params: &DroneParams,
    rotors: &[Rotor; 4],
    pose: &mut Transform,
    velocity: &mut Vector3<f64>,
    angular_velocity: &mut Vector3<f64>,
    dt: f64,
) {
    let Forces { force, torque } = rotor_forces(params, rotors);
    let acceleration = force / params.total_mass;
    let angular_acceleration = params.inertia_inverse() * torque;

    *velocity += acceleration * dt;
    *angular_velocity += angular_acceleration * dt;

    pose.mult_translate(*velocity * dt);
    let angular_speed = angular_velocity.magnitude();
    if angular_speed > ANGULAR_EPSILON {
        pose.mult_rotate(Rad(angular_speed * dt), *angular_velocity);
    }
}
