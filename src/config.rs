//! Start-up configuration.
//!
//! [`Settings`] gathers every externally supplied value. Defaults reproduce
//! the demo as shipped; the `with_*` setters override single fields:
//!
//! ```
//! use drone_ngin::config::{DrawPath, Settings};
//!
//! let settings = Settings::default()
//!     .with_mesh_res(12)
//!     .with_draw_path(DrawPath::Immediate);
//! assert_eq!(settings.mesh_res, 12);
//! ```

use crate::data_structures::vertex::AttributeSlots;

/// Smallest and largest mesh resolution reachable from the keyboard.
pub const MESH_RES_RANGE: std::ops::RangeInclusive<u32> = 3..=80;

/// How a multi-strip shape submits its strips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrawPath {
    /// One `draw_indexed` per strip, recorded back to back.
    #[default]
    Immediate,
    /// A single multi-draw over precomputed indirect arguments.
    ///
    /// Unverified on some backends and does not support drawing a face subset.
    Indirect,
}

/// Lighting evaluation frequency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShadingModel {
    /// Phong lighting evaluated per fragment.
    #[default]
    Phong,
    /// Phong lighting evaluated per vertex and interpolated.
    Gouraud,
}

impl ShadingModel {
    pub fn toggled(self) -> Self {
        match self {
            ShadingModel::Phong => ShadingModel::Gouraud,
            ShadingModel::Gouraud => ShadingModel::Phong,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Slices, stacks and rings of every shape.
    pub mesh_res: u32,
    /// Interleave texture coordinates after the normals.
    pub use_tex_coords: bool,
    pub draw_path: DrawPath,
    pub shading: ShadingModel,
    pub wireframe: bool,
    pub cull_back_faces: bool,
    pub start_running: bool,
    /// Simulated time advanced per frame.
    pub animate_increment: f64,
    /// Change of a rotor's spin velocity per key press.
    pub spin_increment: f64,
    pub clear_colour: wgpu::Color,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Drone Phong Demo".to_string(),
            width: 800,
            height: 600,
            mesh_res: 4,
            use_tex_coords: false,
            draw_path: DrawPath::Immediate,
            shading: ShadingModel::Phong,
            wireframe: false,
            cull_back_faces: true,
            start_running: true,
            animate_increment: 0.01,
            spin_increment: 0.5,
            clear_colour: wgpu::Color::BLACK,
        }
    }
}

impl Settings {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Out-of-range values saturate into [`MESH_RES_RANGE`].
    pub fn with_mesh_res(mut self, mesh_res: u32) -> Self {
        self.mesh_res = mesh_res.clamp(*MESH_RES_RANGE.start(), *MESH_RES_RANGE.end());
        self
    }

    /// Texture coordinates may be toggled; normals are always generated
    /// because the Phong shaders read them.
    pub fn with_tex_coords(mut self, enabled: bool) -> Self {
        self.use_tex_coords = enabled;
        self
    }

    /// Shader locations for the configured vertex layout.
    pub fn attribute_slots(&self) -> AttributeSlots {
        AttributeSlots {
            tex_coords: self.use_tex_coords.then_some(2),
            ..AttributeSlots::PHONG
        }
    }

    pub fn with_draw_path(mut self, draw_path: DrawPath) -> Self {
        self.draw_path = draw_path;
        self
    }

    pub fn with_shading(mut self, shading: ShadingModel) -> Self {
        self.shading = shading;
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    pub fn with_cull_back_faces(mut self, cull: bool) -> Self {
        self.cull_back_faces = cull;
        self
    }

    pub fn with_start_running(mut self, running: bool) -> Self {
        self.start_running = running;
        self
    }

    pub fn with_animate_increment(mut self, dt: f64) -> Self {
        self.animate_increment = dt;
        self
    }

    pub fn with_spin_increment(mut self, increment: f64) -> Self {
        self.spin_increment = increment;
        self
    }

    pub fn with_clear_colour(mut self, colour: wgpu::Color) -> Self {
        self.clear_colour = colour;
        self
    }
}
