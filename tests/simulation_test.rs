mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use cgmath::{Vector3, Zero};
use common::test_utils::{params, rotors};
use drone_ngin::{
    Settings, Simulation, Transform,
    simulation::{euler_step, lift_force, rotor_forces, start_pose},
};

const DT: f64 = 0.01;

#[test]
fn resting_rotors_leave_the_state_unchanged() {
    let params = params();
    let rotors = rotors([0.0; 4]);
    let mut pose = start_pose();
    let mut velocity = Vector3::zero();
    let mut angular_velocity = Vector3::zero();
    euler_step(&params, &rotors, &mut pose, &mut velocity, &mut angular_velocity, DT);
    assert_eq!(pose, start_pose());
    assert_eq!(velocity, Vector3::zero());
    assert_eq!(angular_velocity, Vector3::zero());
}

#[test]
fn lift_is_quadratic_and_signed() {
    let params = params();
    let f1 = lift_force(&params, 2.0);
    let f2 = lift_force(&params, 4.0);
    assert!(f1 > 0.0);
    assert_relative_eq!(f2, 4.0 * f1, max_relative = 1e-12);
    assert_relative_eq!(lift_force(&params, -2.0), -f1, max_relative = 1e-12);
    assert_eq!(lift_force(&params, 0.0), 0.0);
}

#[test]
fn opposite_pair_at_equal_spin_lifts_without_torque() {
    let params = params();
    let rotors = rotors([3.0, 0.0, 3.0, 0.0]);
    let forces = rotor_forces(&params, &rotors);
    assert_abs_diff_eq!(forces.torque.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(forces.torque.y, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(forces.torque.z, 0.0, epsilon = 1e-12);
    assert_relative_eq!(forces.force.y, 2.0 * lift_force(&params, 3.0), max_relative = 1e-12);

    let mut pose = start_pose();
    let mut velocity = Vector3::zero();
    let mut angular_velocity = Vector3::zero();
    euler_step(&params, &rotors, &mut pose, &mut velocity, &mut angular_velocity, DT);
    assert!(velocity.y > 0.0);
    assert_eq!(velocity.x, 0.0);
    assert_eq!(velocity.z, 0.0);
    assert_eq!(angular_velocity, Vector3::zero());
    assert!(pose.translation().y > start_pose().translation().y);
}

#[test]
fn differential_pair_torques_about_the_perpendicular_axis() {
    let params = params();
    let lift = lift_force(&params, 3.0);
    // rotor 0 sits on -x, rotor 2 on +x
    let forces = rotor_forces(&params, &rotors([3.0, 0.0, -3.0, 0.0]));
    assert_abs_diff_eq!(forces.force.y, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(forces.torque.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(forces.torque.y, 0.0, epsilon = 1e-12);
    assert_relative_eq!(forces.torque.z, -2.0 * lift, max_relative = 1e-12);

    let mut pose = Transform::identity();
    let mut velocity = Vector3::zero();
    let mut angular_velocity = Vector3::zero();
    euler_step(
        &params,
        &rotors([3.0, 0.0, -3.0, 0.0]),
        &mut pose,
        &mut velocity,
        &mut angular_velocity,
        DT,
    );
    assert!(angular_velocity.z < 0.0);
    // the -x arm goes up
    let tip = pose.transform_point(cgmath::Point3::new(-1.0, 0.0, 0.0));
    assert!(tip.y > 0.0);
}

#[test]
fn zero_time_step_is_motionless() {
    let params = params();
    let rotors = rotors([5.0, 1.0, -2.0, 4.0]);
    let mut pose = start_pose();
    let mut velocity = Vector3::new(0.1, 0.2, 0.3);
    let mut angular_velocity = Vector3::new(0.0, 0.5, 0.0);
    euler_step(&params, &rotors, &mut pose, &mut velocity, &mut angular_velocity, 0.0);
    assert_eq!(pose, start_pose());
    assert_eq!(velocity, Vector3::new(0.1, 0.2, 0.3));
}

#[test]
fn paused_simulation_only_moves_on_single_step() {
    let mut simulation = Simulation::new(&Settings::default().with_start_running(false));
    simulation.spin_up(0);
    simulation.spin_up(2);
    assert!(!simulation.advance());
    assert_eq!(simulation.current_time, 0.0);

    simulation.request_single_step();
    assert!(simulation.advance());
    assert!(!simulation.advance());
    assert_relative_eq!(simulation.current_time, simulation.animate_increment);
    assert!(simulation.body.velocity.y > 0.0);
}

#[test]
fn blade_phase_follows_spin() {
    let mut simulation = Simulation::new(&Settings::default());
    for _ in 0..4 {
        simulation.spin_up(1);
    }
    simulation.advance();
    assert_relative_eq!(simulation.rotor_phase[1], 2.0 * simulation.animate_increment);
    assert_eq!(simulation.rotor_phase[0], 0.0);
}

#[test]
fn reset_returns_to_the_start_pose() {
    let mut simulation = Simulation::new(&Settings::default());
    simulation.spin_up(0);
    simulation.spin_down(2);
    for _ in 0..10 {
        simulation.advance();
    }
    assert_ne!(simulation.pose(), &start_pose());
    simulation.reset();
    assert_eq!(simulation.pose(), &start_pose());
    assert!(simulation.rotors.iter().all(|rotor| rotor.spin_velocity == 0.0));
}

#[test]
fn two_speed_changes_double_or_halve_the_time_step() {
    let mut simulation = Simulation::new(&Settings::default());
    let dt = simulation.animate_increment;
    simulation.speed_up();
    simulation.speed_up();
    assert_relative_eq!(simulation.animate_increment, 2.0 * dt, max_relative = 1e-12);
    simulation.slow_down();
    simulation.slow_down();
    simulation.slow_down();
    simulation.slow_down();
    assert_relative_eq!(simulation.animate_increment, 0.5 * dt, max_relative = 1e-12);
}
