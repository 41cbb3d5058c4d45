//! Interactive quadrotor demo.
//!
//! Rotors: 1/2, 3/4, 7/8, 9/0 spin rotor 0..3 up/down. R runs or pauses,
//! Space steps once, Backspace resets, F/f changes the time step.
//! M/m refines or coarsens the meshes, P switches Phong/Gouraud shading,
//! W wireframe, C back-face culling, A/E/D/S/V the global lighting terms,
//! keypad 1-4 the lights, T pointer diagnostics. Arrow keys or a left-button
//! drag turn the view, the wheel zooms, Escape quits.

use drone_ngin::{DrawPath, Settings};

fn main() -> anyhow::Result<()> {
    let indirect = std::env::args().any(|arg| arg == "--indirect");
    let settings = Settings::default().with_draw_path(if indirect {
        DrawPath::Indirect
    } else {
        DrawPath::Immediate
    });
    drone_ngin::run(settings)
}
