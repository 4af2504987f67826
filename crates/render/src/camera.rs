use notdoom_ecs::TransformComponent;
use notdoom_kernel::World;
use notdoom_kernel::config::CameraConfig;
use notdoom_math::{Matrix4x4f, Transformf, Vector3f};

use crate::RenderError;

/// Perspective lens. The camera looks down -Z in its own space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub near: f32,
    pub far: f32,
    pub fov_degrees: f32,
    pub aspect_ratio: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 800.0 / 600.0)
    }
}

impl Camera {
    pub fn from_config(config: &CameraConfig, aspect_ratio: f32) -> Self {
        Self {
            near: config.near,
            far: config.far,
            fov_degrees: config.fov_degrees,
            aspect_ratio,
        }
    }

    pub fn projection(&self) -> Matrix4x4f {
        Matrix4x4f::perspective_matrix(self.near, self.far, self.aspect_ratio, self.fov_degrees)
    }

    /// Whether camera-space depth `z` lies between the clip planes.
    pub fn in_depth_range(&self, z: f32) -> bool {
        (-self.far..=-self.near).contains(&z)
    }
}

/// Where the frame is seen from: the camera's world transform and the matching view matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub eye: Transformf,
    pub view: Matrix4x4f,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_eye(Transformf::default())
    }
}

impl RenderView {
    /// View for a rigid camera: its scale is ignored.
    pub fn from_eye(eye: Transformf) -> Self {
        Self {
            eye,
            view: Matrix4x4f::from_transform(&eye.rigid_inverse()),
        }
    }

    /// View through the player entity.
    pub fn from_world(world: &World) -> Result<Self, RenderError> {
        let eye = world
            .components()
            .get::<TransformComponent>()?
            .require(world.player())?;
        Ok(Self::from_eye(eye.transform()))
    }

    pub fn to_camera_space(&self, point: Vector3f) -> Vector3f {
        self.view.rotate_point(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use notdoom_math::Quaternionf;

    #[test]
    fn identity_camera_leaves_points_unchanged() {
        let view = RenderView::default();
        for p in [
            Vector3f::new(1.0, 2.0, 3.0),
            Vector3f::new(-7.5, 0.0, -40.0),
        ] {
            assert_eq!(view.to_camera_space(p), p);
        }
        assert_eq!(view.view, Matrix4x4f::identity());
    }

    #[test]
    fn translated_camera_shifts_world() {
        let view = RenderView::from_eye(Transformf::from_position(Vector3f::new(0.0, 0.0, 5.0)));
        assert_eq!(
            view.to_camera_space(Vector3f::zero()),
            Vector3f::new(0.0, 0.0, -5.0)
        );
    }

    #[test]
    fn turned_camera_sees_right_side_ahead() {
        let eye = Transformf::new(
            Vector3f::zero(),
            Quaternionf::from_axis_angle(Vector3f::new(0.0, 1.0, 0.0), -std::f32::consts::FRAC_PI_2),
            Vector3f::one(),
        );
        let p = RenderView::from_eye(eye).to_camera_space(Vector3f::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn view_ignores_camera_scale() {
        let mut eye = Transformf::from_position(Vector3f::new(1.0, 0.0, 0.0));
        eye.scale = Vector3f::one() * 3.0;
        let view = RenderView::from_eye(eye);
        assert_eq!(
            view.to_camera_space(Vector3f::new(2.0, 0.0, 0.0)),
            Vector3f::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn view_from_world_needs_player_transform() {
        let world = World::with_builtin_components().unwrap();
        assert!(matches!(
            RenderView::from_world(&world),
            Err(RenderError::Ecs(_))
        ));
    }

    #[test]
    fn clip_planes() {
        let camera = Camera::default();
        assert!(camera.in_depth_range(-0.5));
        assert!(camera.in_depth_range(-500.0));
        assert!(!camera.in_depth_range(-0.4));
        assert!(!camera.in_depth_range(1.0));
        let projected = camera
            .projection()
            .rotate_point(Vector3f::new(0.0, 0.0, -camera.near));
        assert_abs_diff_eq!(projected.z, -1.0, epsilon = 1e-5);
    }
}
