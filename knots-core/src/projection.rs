/// Perspective camera and screen projection
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config;

/// Perspective camera.
///
/// The projection matrix is cached and only rebuilt by
/// [`Camera::update_projection_matrix`], so changing `aspect` or `fov` has no
/// effect until that call.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view (radians)
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Matrix4<f32>,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: Point3::from(config::CAMERA_POSITION),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: config::CAMERA_FOV_DEGREES.to_radians(),
            aspect: aspect_ratio(width, height),
            near: config::CAMERA_NEAR,
            far: config::CAMERA_FAR,
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Point the camera at `target`
    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Rebuild the cached projection from `fov`, `aspect`, `near` and `far`
    pub fn update_projection_matrix(&mut self) {
        self.projection = Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// The cached projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }

    /// Project a 3D point to screen space.
    ///
    /// Returns `(x, y, depth)` with `x`/`y` in pixels from the top-left corner
    /// and `depth` the normalized device depth, or `None` when the point is
    /// behind the camera or outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.view_projection() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Behind the eye, or too close to the eye plane to divide by
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let ndc_z = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&ndc_x)
            || !(-1.0..=1.0).contains(&ndc_y)
            || !(-1.0..=1.0).contains(&ndc_z)
        {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc_z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert!((camera.fov - 75f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn test_projection_is_cached_until_update() {
        let mut camera = Camera::new(800, 600);
        let before = camera.projection_matrix();
        camera.aspect = 2.0;
        assert_eq!(camera.projection_matrix(), before);
        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(400, 300);
        let (x, y, _) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 400, 300)
            .unwrap();
        assert!((x - 200.0).abs() < 1e-3);
        assert!((y - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_positive_x_lands_on_left_half() {
        // The camera looks down +z from z = -2, which mirrors world x on screen.
        let camera = Camera::new(400, 300);
        let (x, _, _) = camera
            .project_to_screen(&Point3::new(1.0, 0.0, 0.0), &Matrix4::identity(), 400, 300)
            .unwrap();
        assert!(x < 200.0);
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let camera = Camera::new(400, 300);
        let behind = Point3::new(0.0, 0.0, -5.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 400, 300)
            .is_none());
    }
}
