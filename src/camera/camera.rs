//! The camera pose and its derived view matrix

use cgmath::{
    EuclideanSpace, InnerSpace, Matrix4, Point3, Quaternion, Rad, Rotation, Rotation3, Vector3,
};

/// Viewpoint of a scene
///
/// The pose is position, target and up vector; the view matrix is
/// recomputed whenever one of them changes. The matrix can also be set
/// directly with [`Camera::set_view_matrix`], which abandons the pose
/// until the next pose setter runs.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vector3<f32>,
    target: Vector3<f32>,
    up: Vector3<f32>,
    view: Matrix4<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Vector3::new(3.0, 4.0, 5.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        )
    }
}

impl Camera {
    /// Creates a camera at `position` looking toward `target`
    pub fn new(position: Vector3<f32>, target: Vector3<f32>, up: Vector3<f32>) -> Self {
        let mut camera = Self {
            position,
            target,
            up,
            view: Matrix4::from_scale(1.0),
        };
        camera.recompute();
        camera
    }

    /// Current eye position
    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    /// Point the camera is looking at
    pub fn target(&self) -> Vector3<f32> {
        self.target
    }

    /// Up direction used to orient the view
    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// View matrix for the current pose
    pub fn view(&self) -> Matrix4<f32> {
        self.view
    }

    /// Whether the pose still backs the view matrix.
    ///
    /// Returns false after [`Camera::set_view_matrix`] until a pose
    /// setter re-establishes it.
    pub fn has_pose(&self) -> bool {
        [self.position, self.target, self.up]
            .iter()
            .all(|v| v.x.is_finite() && v.y.is_finite() && v.z.is_finite())
    }

    /// Moves the eye, keeping the current target
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.restore_pose();
        self.position = position;
        self.recompute();
    }

    /// Same as [`Camera::set_position`] with individual components
    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) {
        self.set_position(Vector3::new(x, y, z));
    }

    /// Aims the camera at a new target
    pub fn look_at(&mut self, target: Vector3<f32>) {
        self.restore_pose();
        self.target = target;
        self.recompute();
    }

    /// Same as [`Camera::look_at`] with individual components
    pub fn look_at_xyz(&mut self, x: f32, y: f32, z: f32) {
        self.look_at(Vector3::new(x, y, z));
    }

    /// Changes the up direction
    pub fn set_up(&mut self, up: Vector3<f32>) {
        self.restore_pose();
        self.up = up;
        self.recompute();
    }

    /// Same as [`Camera::set_up`] with individual components
    pub fn set_up_xyz(&mut self, x: f32, y: f32, z: f32) {
        self.set_up(Vector3::new(x, y, z));
    }

    /// Moves eye and target together
    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.restore_pose();
        self.position += delta;
        self.target += delta;
        self.recompute();
    }

    /// Same as [`Camera::translate`] with individual components
    pub fn translate_xyz(&mut self, dx: f32, dy: f32, dz: f32) {
        self.translate(Vector3::new(dx, dy, dz));
    }

    /// Revolves the eye around the target. A zero axis is ignored, and
    /// so is the call while the pose is invalidated.
    pub fn orbit<A: Into<Rad<f32>>>(&mut self, angle: A, axis: Vector3<f32>) {
        if axis.magnitude2() == 0.0 || !self.has_pose() {
            return;
        }
        let rotation = Quaternion::from_axis_angle(axis.normalize(), angle);
        self.position = rotation.rotate_vector(self.position - self.target) + self.target;
        self.recompute();
    }

    /// Revolves the target around the eye, turning the camera in place.
    /// A zero axis is ignored, and so is the call while the pose is
    /// invalidated.
    pub fn turn<A: Into<Rad<f32>>>(&mut self, angle: A, axis: Vector3<f32>) {
        if axis.magnitude2() == 0.0 || !self.has_pose() {
            return;
        }
        let rotation = Quaternion::from_axis_angle(axis.normalize(), angle);
        self.target = rotation.rotate_vector(self.target - self.position) + self.position;
        self.recompute();
    }

    /// [`Camera::orbit`] around the X axis
    pub fn orbit_x<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.orbit(angle, Vector3::unit_x());
    }

    /// [`Camera::orbit`] around the Y axis
    pub fn orbit_y<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.orbit(angle, Vector3::unit_y());
    }

    /// [`Camera::orbit`] around the Z axis
    pub fn orbit_z<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.orbit(angle, Vector3::unit_z());
    }

    /// [`Camera::turn`] around the X axis
    pub fn turn_x<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.turn(angle, Vector3::unit_x());
    }

    /// [`Camera::turn`] around the Y axis
    pub fn turn_y<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.turn(angle, Vector3::unit_y());
    }

    /// [`Camera::turn`] around the Z axis
    pub fn turn_z<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.turn(angle, Vector3::unit_z());
    }

    /// Replaces the view matrix outright.
    ///
    /// The stored pose becomes meaningless, so it is invalidated; pose
    /// based helpers like [`Camera::orbit`] stay inert until a pose
    /// setter such as [`Camera::set_position`] runs again.
    pub fn set_view_matrix(&mut self, view: Matrix4<f32>) {
        self.view = view;
        self.position = Vector3::new(f32::NAN, f32::NAN, f32::NAN);
        self.target = Vector3::new(f32::NAN, f32::NAN, f32::NAN);
    }

    /// Composes an extra transform onto the view matrix. The pose is
    /// left alone and will overwrite the result on its next change.
    pub fn transform_view(&mut self, transform: Matrix4<f32>) {
        self.view = transform * self.view;
    }

    /// Brings an invalidated pose back to the default one so a single
    /// setter is enough to resume pose-based control.
    fn restore_pose(&mut self) {
        if !self.has_pose() {
            self.position = Vector3::new(3.0, 4.0, 5.0);
            self.target = Vector3::new(0.0, 0.0, 0.0);
            self.up = Vector3::unit_y();
        }
    }

    fn recompute(&mut self) {
        if !self.has_pose() {
            return;
        }
        self.view = Matrix4::look_at_rh(
            Point3::from_vec(self.position),
            Point3::from_vec(self.target),
            self.up,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    #[test]
    fn test_default_pose_looks_at_origin() {
        let camera = Camera::default();

        assert_eq!(camera.position(), Vector3::new(3.0, 4.0, 5.0));
        assert_eq!(camera.target(), Vector3::new(0.0, 0.0, 0.0));

        // The target lands straight ahead on the view axis
        let in_view = camera.view() * camera.target().extend(1.0);
        assert!(in_view.x.abs() < 1e-5);
        assert!(in_view.y.abs() < 1e-5);
        assert!((in_view.z + 50.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_orbit_y_quarter_turn() {
        let mut camera = Camera::default();

        camera.orbit_y(Deg(90.0));

        let position = camera.position();
        assert!((position.x - 5.0).abs() < 1e-5);
        assert!((position.y - 4.0).abs() < 1e-5);
        assert!((position.z + 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_preserves_distance() {
        let mut camera = Camera::default();
        let before = (camera.position() - camera.target()).magnitude();

        camera.orbit(Deg(33.0), Vector3::new(1.0, 1.0, 0.0));

        let after = (camera.position() - camera.target()).magnitude();
        assert!((before - after).abs() < 1e-5);
    }

    #[test]
    fn test_turn_keeps_position() {
        let mut camera = Camera::default();

        camera.turn_y(Deg(45.0));

        assert_eq!(camera.position(), Vector3::new(3.0, 4.0, 5.0));
        assert!((camera.target() - Vector3::new(0.0, 0.0, 0.0)).magnitude() > 1e-3);
    }

    #[test]
    fn test_translate_moves_eye_and_target() {
        let mut camera = Camera::default();

        camera.translate_xyz(1.0, 0.0, -1.0);

        assert_eq!(camera.position(), Vector3::new(4.0, 4.0, 4.0));
        assert_eq!(camera.target(), Vector3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn test_set_view_matrix_invalidates_pose() {
        let mut camera = Camera::default();
        let view = Matrix4::from_scale(1.0);

        camera.set_view_matrix(view);

        assert!(!camera.has_pose());
        assert_eq!(camera.view(), view);

        // Pose helpers become no-ops until the pose is set again
        camera.orbit_y(Deg(90.0));
        assert_eq!(camera.view(), view);

        camera.set_position_xyz(0.0, 0.0, 5.0);
        assert!(camera.has_pose());
    }

    #[test]
    fn test_zero_axis_is_ignored() {
        let mut camera = Camera::default();
        let view = camera.view();

        camera.orbit(Deg(90.0), Vector3::new(0.0, 0.0, 0.0));

        assert_eq!(camera.view(), view);
    }
}
