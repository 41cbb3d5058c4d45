//! Keyboard commands and the interactive demo state they act on.
//!
//! Keys are first mapped to a [`Command`] by [`command_for_key`] so the
//! bindings can be tested without a window. [`DemoState::apply`] then mutates
//! the simulation, view, lighting and render toggles and reports any
//! [`Effect`] that needs the GPU side.

use winit::keyboard::KeyCode;

use crate::{
    camera::ViewState,
    config::{MESH_RES_RANGE, Settings},
    pipelines::light::Lighting,
    render::RenderToggles,
    simulation::Simulation,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    SpinUp(usize),
    SpinDown(usize),
    ToggleRunning,
    SingleStep,
    Reset,
    SpeedUp,
    SlowDown,
    MeshFiner,
    MeshCoarser,
    ToggleShading,
    ToggleWireframe,
    ToggleCulling,
    ToggleTestInfo,
    ToggleAmbient,
    ToggleEmissive,
    ToggleDiffuse,
    ToggleSpecular,
    ToggleLocalViewer,
    ToggleLight(usize),
    View(KeyCode),
    Exit,
}

/// What the caller has to do after a command was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Remesh every shape at this resolution.
    Remesh(u32),
    /// Wireframe was switched; the renderer may not support it.
    Wireframe(bool),
    Exit,
}

/// Binding of a pressed key; `shift` selects the upper-case variants of `M` and `F`.
pub fn command_for_key(key: KeyCode, shift: bool) -> Option<Command> {
    use Command::*;
    let command = match key {
        KeyCode::Escape => Exit,
        KeyCode::Digit1 => SpinUp(0),
        KeyCode::Digit2 => SpinDown(0),
        KeyCode::Digit3 => SpinUp(1),
        KeyCode::Digit4 => SpinDown(1),
        KeyCode::Digit7 => SpinUp(2),
        KeyCode::Digit8 => SpinDown(2),
        KeyCode::Digit9 => SpinUp(3),
        KeyCode::Digit0 => SpinDown(3),
        KeyCode::Numpad1 => ToggleLight(0),
        KeyCode::Numpad2 => ToggleLight(1),
        KeyCode::Numpad3 => ToggleLight(2),
        KeyCode::Numpad4 => ToggleLight(3),
        KeyCode::KeyR => ToggleRunning,
        KeyCode::Space => SingleStep,
        KeyCode::Backspace => Reset,
        KeyCode::KeyF if shift => SpeedUp,
        KeyCode::KeyF => SlowDown,
        KeyCode::KeyM if shift => MeshFiner,
        KeyCode::KeyM => MeshCoarser,
        KeyCode::KeyP => ToggleShading,
        KeyCode::KeyW => ToggleWireframe,
        KeyCode::KeyC => ToggleCulling,
        KeyCode::KeyT => ToggleTestInfo,
        KeyCode::KeyA => ToggleAmbient,
        KeyCode::KeyE => ToggleEmissive,
        KeyCode::KeyD => ToggleDiffuse,
        KeyCode::KeyS => ToggleSpecular,
        KeyCode::KeyV => ToggleLocalViewer,
        KeyCode::ArrowUp | KeyCode::ArrowDown | KeyCode::ArrowLeft | KeyCode::ArrowRight => View(key),
        _ => return None,
    };
    Some(command)
}

/// Next finer mesh resolution.
pub fn finer(res: u32) -> u32 {
    if res < MESH_RES_RANGE.end() - 1 {
        res + 1
    } else {
        *MESH_RES_RANGE.end()
    }
}

/// Next coarser mesh resolution.
pub fn coarser(res: u32) -> u32 {
    if res > MESH_RES_RANGE.start() + 1 {
        res - 1
    } else {
        *MESH_RES_RANGE.start()
    }
}

/// Everything the input handlers mutate.
#[derive(Clone, Debug)]
pub struct DemoState {
    pub simulation: Simulation,
    pub view: ViewState,
    pub toggles: RenderToggles,
    pub lighting: Lighting,
}

impl DemoState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            simulation: Simulation::new(settings),
            view: ViewState::default(),
            toggles: RenderToggles::new(settings),
            lighting: Lighting::default(),
        }
    }

    pub fn apply(&mut self, command: Command) -> Effect {
        match command {
            Command::SpinUp(rotor) => self.simulation.spin_up(rotor),
            Command::SpinDown(rotor) => self.simulation.spin_down(rotor),
            Command::ToggleRunning => self.simulation.toggle_running(),
            Command::SingleStep => self.simulation.request_single_step(),
            Command::Reset => self.simulation.reset(),
            Command::SpeedUp => self.simulation.speed_up(),
            Command::SlowDown => self.simulation.slow_down(),
            Command::MeshFiner => {
                self.toggles.mesh_res = finer(self.toggles.mesh_res);
                return Effect::Remesh(self.toggles.mesh_res);
            }
            Command::MeshCoarser => {
                self.toggles.mesh_res = coarser(self.toggles.mesh_res);
                return Effect::Remesh(self.toggles.mesh_res);
            }
            Command::ToggleShading => {
                self.toggles.shading = self.toggles.shading.toggled();
                log::info!("{:?} shading", self.toggles.shading);
            }
            Command::ToggleWireframe => {
                self.toggles.wireframe = !self.toggles.wireframe;
                return Effect::Wireframe(self.toggles.wireframe);
            }
            Command::ToggleCulling => self.toggles.cull_back_faces = !self.toggles.cull_back_faces,
            Command::ToggleTestInfo => self.toggles.test_info = !self.toggles.test_info,
            Command::ToggleAmbient => self.lighting.global.ambient = !self.lighting.global.ambient,
            Command::ToggleEmissive => self.lighting.global.emissive = !self.lighting.global.emissive,
            Command::ToggleDiffuse => self.lighting.global.diffuse = !self.lighting.global.diffuse,
            Command::ToggleSpecular => self.lighting.global.specular = !self.lighting.global.specular,
            Command::ToggleLocalViewer => self.lighting.global.local_viewer = !self.lighting.global.local_viewer,
            Command::ToggleLight(light) => self.lighting.toggle_light(light),
            Command::View(key) => {
                self.view.handle_arrow(key);
            }
            Command::Exit => return Effect::Exit,
        }
        Effect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_resolution_steps_saturate() {
        assert_eq!(finer(4), 5);
        assert_eq!(finer(79), 80);
        assert_eq!(finer(80), 80);
        assert_eq!(coarser(5), 4);
        assert_eq!(coarser(4), 3);
        assert_eq!(coarser(3), 3);
    }

    #[test]
    fn shift_selects_upper_case_bindings() {
        assert_eq!(command_for_key(KeyCode::KeyM, true), Some(Command::MeshFiner));
        assert_eq!(command_for_key(KeyCode::KeyM, false), Some(Command::MeshCoarser));
        assert_eq!(command_for_key(KeyCode::KeyF, true), Some(Command::SpeedUp));
        assert_eq!(command_for_key(KeyCode::KeyZ, false), None);
    }
}
