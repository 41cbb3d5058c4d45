//! View and projection for the drone scene.
//!
//! The viewer orbits the scene: [`ViewState`] keeps an azimuth (tilt about
//! the x axis), a direction (turn about the y axis) and an extra zoom
//! distance, and turns them into a view matrix. The projection is a
//! perspective frustum sized so that the box `[-XMAX, XMAX] x [-YMAX, YMAX] x
//! [ZMIN, ZMAX]` stays visible at any window aspect ratio.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use cgmath::{Matrix4, Rad, Vector3};
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalPosition, keyboard::KeyCode};

use crate::data_structures::transform::Transform;

pub const XMAX: f64 = 8.0;
pub const YMAX: f64 = 6.0;
pub const ZMIN: f64 = -9.0;
pub const ZMAX: f64 = 9.0;
/// Distance from the camera to the `z = ZMAX` plane before zooming.
pub const Z_DISTANCE: f64 = 20.0;

const Z_EXTRA_DELTA: f64 = 0.2;
const Z_EXTRA_MIN: f64 = -15.0;
const SCROLL_SENSITIVITY: f64 = 5.0;
const ARROW_STEP: f64 = 0.01;
const DRAG_RADIANS_PER_PIXEL: f64 = 0.01;
const AZIMUTH_LIMIT: f64 = FRAC_PI_2 - 0.05;
/// The ground lies in the xz plane; lower the scene so its middle is near the origin.
const SCENE_CENTRE_HEIGHT: f64 = 3.5;

/// wgpu clip space has z in `[0, 1]` where the GL-style frustum produces `[-1, 1]`.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f64> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragAnchor {
    position: PhysicalPosition<f64>,
    azimuth: f64,
    direction: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub azimuth: f64,
    pub direction: f64,
    pub z_extra: f64,
    drag: Option<DragAnchor>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            azimuth: 0.25,
            direction: 0.0,
            z_extra: 0.0,
            drag: None,
        }
    }
}

/// Wrap an angle into `(-PI, PI]` assuming it left the range by less than a turn.
fn wrap_angle(angle: f64) -> f64 {
    if angle > PI {
        angle - TAU
    } else if angle <= -PI {
        angle + TAU
    } else {
        angle
    }
}

impl ViewState {
    pub fn view_matrix(&self) -> Transform {
        let mut view = Transform::from_translation(Vector3::new(0.0, 0.0, -(ZMAX + Z_DISTANCE + self.z_extra)));
        view.mult_rotate(Rad(self.azimuth), Vector3::unit_x())
            .mult_rotate(Rad(-self.direction), Vector3::unit_y())
            .mult_translate(Vector3::new(0.0, -SCENE_CENTRE_HEIGHT, 0.0));
        view
    }

    /// Perspective projection for a `width` x `height` surface, in wgpu clip space.
    pub fn projection(&self, width: u32, height: u32) -> Matrix4<f64> {
        let w = width.max(1) as f64;
        let h = height.max(1) as f64;
        let aspect = w * YMAX / (h * XMAX);
        let (window_xmax, window_ymax) = if aspect > 1.0 {
            (XMAX * aspect, YMAX)
        } else {
            (XMAX, YMAX / aspect)
        };
        let near = Z_DISTANCE + self.z_extra;
        let far = near + ZMAX - ZMIN;
        let scale = near / Z_DISTANCE;
        OPENGL_TO_WGPU_MATRIX
            * cgmath::frustum(
                -window_xmax * scale,
                window_xmax * scale,
                -window_ymax * scale,
                window_ymax * scale,
                near,
                far,
            )
    }

    /// Arrow keys tilt and turn the view; returns whether `key` was handled.
    pub fn handle_arrow(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::ArrowUp => self.azimuth = (self.azimuth + ARROW_STEP).min(AZIMUTH_LIMIT),
            KeyCode::ArrowDown => self.azimuth = (self.azimuth - ARROW_STEP).max(-AZIMUTH_LIMIT),
            KeyCode::ArrowRight => self.direction = wrap_angle(self.direction + ARROW_STEP),
            KeyCode::ArrowLeft => self.direction = wrap_angle(self.direction - ARROW_STEP),
            _ => return false,
        }
        true
    }

    pub fn begin_drag(&mut self, position: PhysicalPosition<f64>) {
        self.drag = Some(DragAnchor {
            position,
            azimuth: self.azimuth,
            direction: self.direction,
        });
    }

    /// Rotate relative to where the drag started; no-op without a drag.
    pub fn drag_to(&mut self, position: PhysicalPosition<f64>) -> bool {
        let Some(anchor) = self.drag else {
            return false;
        };
        let dx = position.x - anchor.position.x;
        let dy = position.y - anchor.position.y;
        self.direction = wrap_angle(anchor.direction - dx * DRAG_RADIANS_PER_PIXEL);
        self.azimuth = wrap_angle(anchor.azimuth + dy * DRAG_RADIANS_PER_PIXEL);
        true
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Positive `lines` moves closer.
    pub fn scroll(&mut self, lines: f64) {
        self.z_extra = (self.z_extra - Z_EXTRA_DELTA * lines * SCROLL_SENSITIVITY).max(Z_EXTRA_MIN);
    }
}

/// Projection matrix as the shaders see it.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub projection: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            projection: Transform::identity().to_raw().model_view,
        }
    }

    pub fn update_projection(&mut self, view: &ViewState, width: u32, height: u32) {
        self.projection = Transform::from_matrix(view.projection(width, height))
            .to_raw()
            .model_view;
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, bind_group_layout: &wgpu::BindGroupLayout) -> Self {
        let uniform = CameraUniform::new();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, view: &ViewState, width: u32, height: u32) {
        self.uniform.update_projection(view, width, height);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_clamp_azimuth() {
        let mut view = ViewState::default();
        for _ in 0..1000 {
            view.handle_arrow(KeyCode::ArrowUp);
        }
        assert_eq!(view.azimuth, AZIMUTH_LIMIT);
        assert!(!view.handle_arrow(KeyCode::KeyQ));
    }

    #[test]
    fn direction_wraps() {
        let mut view = ViewState {
            direction: PI - 0.005,
            ..Default::default()
        };
        view.handle_arrow(KeyCode::ArrowRight);
        assert!(view.direction < 0.0);
    }

    #[test]
    fn scroll_stops_at_minimum() {
        let mut view = ViewState::default();
        view.scroll(100.0);
        assert_eq!(view.z_extra, Z_EXTRA_MIN);
    }
}
