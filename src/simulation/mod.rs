//! Drone simulation state and stepping.
//!
//! [`Simulation`] is the explicit context that the event loop mutates from
//! input and advances once per frame: rotor spin velocities, run/pause, the
//! animation time step and the drone's rigid-body state.
//!
//! - `drone` holds physical constants, [`Rotor`] and [`DroneParams`]
//! - `rigid_body` holds the Euler integrator

pub mod drone;
pub mod rigid_body;

use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2, TAU};

use cgmath::Vector3;

pub use drone::{DroneParams, Rotor};
pub use rigid_body::{Forces, RigidBodyState, euler_step, lift_force, rotor_forces};

use crate::{config::Settings, data_structures::transform::Transform};

/// Where the drone's centre of gravity starts: hovering above the floor.
pub fn start_pose() -> Transform {
    Transform::from_translation(Vector3::new(0.0, drone::FLOATING_HEIGHT, 0.0))
}

#[derive(Clone, Debug, PartialEq)]
pub struct Simulation {
    pub params: DroneParams,
    pub rotors: [Rotor; 4],
    pub body: RigidBodyState,
    /// Blade angle of each rotor, for drawing.
    pub rotor_phase: [f64; 4],
    pub running: bool,
    single_step: bool,
    pub animate_increment: f64,
    pub current_time: f64,
    pub spin_increment: f64,
}

impl Simulation {
    pub fn new(settings: &Settings) -> Self {
        Self {
            params: DroneParams::default(),
            rotors: Rotor::quad(),
            body: RigidBodyState::at_rest(start_pose()),
            rotor_phase: [0.0; 4],
            running: settings.start_running,
            single_step: false,
            animate_increment: settings.animate_increment,
            current_time: 0.0,
            spin_increment: settings.spin_increment,
        }
    }

    /// Run one animation tick if running or a single step is pending.
    ///
    /// Returns whether the state changed.
    pub fn advance(&mut self) -> bool {
        if !self.running && !self.single_step {
            return false;
        }
        self.single_step = false;
        let dt = self.animate_increment;
        for (phase, rotor) in self.rotor_phase.iter_mut().zip(&self.rotors) {
            *phase = (*phase + rotor.spin_velocity * dt).rem_euclid(TAU);
        }
        self.body.step(&self.params, &self.rotors, dt);
        self.current_time += dt;
        true
    }

    /// Put the drone back at its start pose with all rotors stopped.
    pub fn reset(&mut self) {
        self.rotors = Rotor::quad();
        self.body = RigidBodyState::at_rest(start_pose());
        self.rotor_phase = [0.0; 4];
        self.current_time = 0.0;
        log::info!("simulation reset");
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
        log::info!("animation {}", if self.running { "running" } else { "paused" });
    }

    /// Schedule one tick while paused; pauses a running animation.
    pub fn request_single_step(&mut self) {
        self.running = false;
        self.single_step = true;
    }

    pub fn spin_up(&mut self, rotor: usize) {
        if let Some(rotor) = self.rotors.get_mut(rotor) {
            rotor.spin_velocity += self.spin_increment;
        }
    }

    pub fn spin_down(&mut self, rotor: usize) {
        if let Some(rotor) = self.rotors.get_mut(rotor) {
            rotor.spin_velocity -= self.spin_increment;
        }
    }

    /// Two presses double the time step.
    pub fn speed_up(&mut self) {
        self.animate_increment *= SQRT_2;
    }

    /// Two presses halve the time step.
    pub fn slow_down(&mut self) {
        self.animate_increment *= FRAC_1_SQRT_2;
    }

    pub fn pose(&self) -> &Transform {
        &self.body.pose
    }
}
