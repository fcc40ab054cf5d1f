//! Camera controllers stepped by the scene once per frame

use cgmath::{InnerSpace, Rad};

use super::Camera;

/// Drives a [`Camera`] over time.
///
/// The scene calls [`CameraController::update`] at the start of every
/// rendered frame with the seconds elapsed since the previous one.
pub trait CameraController {
    /// Advance the controller and move the camera accordingly
    fn update(&mut self, camera: &mut Camera, delta_time: f32);
}

/// Limits for [`OrbitController`]
#[derive(Debug, Clone, Copy)]
pub struct OrbitBounds {
    /// Closest the eye may zoom toward the target
    pub min_distance: Option<f32>,
    /// Farthest the eye may zoom away from the target
    pub max_distance: Option<f32>,
    /// Lowest elevation angle in radians
    pub min_pitch: f32,
    /// Highest elevation angle in radians
    pub max_pitch: f32,
}

impl Default for OrbitBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: None,
            // Stop just short of the poles so the view axis never
            // becomes parallel to the up vector
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.001,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.001,
        }
    }
}

/// Orbit-and-zoom camera control around the camera's target.
///
/// Host applications feed yaw, pitch and zoom deltas with the `add_*`
/// methods as their input events arrive; the accumulated input is
/// consumed on the next [`CameraController::update`]. An optional
/// steady spin keeps the camera moving with no input at all.
#[derive(Debug, Clone)]
pub struct OrbitController {
    /// Scale on incoming yaw and pitch input, radians per input unit
    pub rotate_speed: f32,
    /// Scale on incoming zoom input, world units per input unit
    pub zoom_speed: f32,
    /// Steady yaw in radians per second, applied on every update
    pub auto_orbit: f32,
    pub bounds: OrbitBounds,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            auto_orbit: 0.0,
            bounds: OrbitBounds::default(),
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
        }
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Set the steady spin in radians per second
    pub fn with_auto_orbit(mut self, radians_per_second: f32) -> Self {
        self.auto_orbit = radians_per_second;
        self
    }

    /// Builder pattern: Set the orbit limits
    pub fn with_bounds(mut self, bounds: OrbitBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Queue a yaw rotation around the up axis
    pub fn add_yaw(&mut self, amount: f32) {
        self.pending_yaw += amount;
    }

    /// Queue a pitch change toward or away from the poles
    pub fn add_pitch(&mut self, amount: f32) {
        self.pending_pitch += amount;
    }

    /// Queue a zoom along the view axis; negative moves closer
    pub fn add_zoom(&mut self, amount: f32) {
        self.pending_zoom += amount;
    }
}

impl CameraController for OrbitController {
    fn update(&mut self, camera: &mut Camera, delta_time: f32) {
        let yaw = self.pending_yaw * self.rotate_speed + self.auto_orbit * delta_time;
        let pitch = self.pending_pitch * self.rotate_speed;
        let zoom = self.pending_zoom * self.zoom_speed;
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_zoom = 0.0;

        // A camera running on a raw view matrix has no pose to steer
        if !camera.has_pose() {
            return;
        }

        if yaw != 0.0 {
            camera.orbit(Rad(yaw), camera.up());
        }

        let offset = camera.position() - camera.target();
        let distance = offset.magnitude();
        if distance == 0.0 {
            return;
        }

        if pitch != 0.0 {
            let current_pitch = (offset.y / distance).asin();
            let clamped = (current_pitch + pitch).clamp(self.bounds.min_pitch, self.bounds.max_pitch);
            let pitch_delta = clamped - current_pitch;
            if pitch_delta != 0.0 {
                let forward = -offset / distance;
                let right = forward.cross(camera.up());
                if right.magnitude2() > 0.0 {
                    camera.orbit(Rad(-pitch_delta), right.normalize());
                }
            }
        }

        if zoom != 0.0 {
            let offset = camera.position() - camera.target();
            let distance = offset.magnitude();
            let mut next = (distance + zoom).max(self.bounds.min_distance.unwrap_or(1e-3));
            if let Some(max) = self.bounds.max_distance {
                next = next.min(max);
            }
            camera.set_position(camera.target() + offset / distance * next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Matrix4;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_auto_orbit_revolves_camera() {
        let mut camera = Camera::default();
        let mut controller = OrbitController::new().with_auto_orbit(FRAC_PI_2);
        let before = (camera.position() - camera.target()).magnitude();

        controller.update(&mut camera, 1.0);

        let position = camera.position();
        assert!((position.x - 5.0).abs() < 1e-4);
        assert!((position.y - 4.0).abs() < 1e-4);
        assert!((position.z + 3.0).abs() < 1e-4);

        let after = (camera.position() - camera.target()).magnitude();
        assert!((before - after).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_clamps_at_limit() {
        let mut camera = Camera::default();
        let mut controller = OrbitController::new();
        controller.add_pitch(10.0);

        controller.update(&mut camera, 0.016);

        let offset = camera.position() - camera.target();
        let elevation = (offset.y / offset.magnitude()).asin();
        assert!((elevation - controller.bounds.max_pitch).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_respects_min_distance() {
        let mut camera = Camera::default();
        let mut controller = OrbitController::new();
        controller.bounds.min_distance = Some(2.0);
        controller.add_zoom(-100.0);

        controller.update(&mut camera, 0.016);

        let distance = (camera.position() - camera.target()).magnitude();
        assert!((distance - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_pending_input_is_consumed() {
        let mut camera = Camera::default();
        let mut controller = OrbitController::new();
        controller.add_yaw(0.5);

        controller.update(&mut camera, 0.016);
        let after_first = camera.position();
        controller.update(&mut camera, 0.016);

        assert_eq!(camera.position(), after_first);
    }

    #[test]
    fn test_ignores_camera_without_pose() {
        let mut camera = Camera::default();
        camera.set_view_matrix(Matrix4::from_scale(2.0));
        let mut controller = OrbitController::new().with_auto_orbit(1.0);

        controller.update(&mut camera, 1.0);

        assert_eq!(camera.view(), Matrix4::from_scale(2.0));
    }
}
