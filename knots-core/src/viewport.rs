/// Camera, output surface and scene, kept in step with the window size
use nalgebra::Point3;

use crate::projection::{aspect_ratio, Camera};
use crate::scene::Scene;

/// Something that can draw a scene: a WebGL canvas, a terminal grid, ...
pub trait RenderTarget {
    /// Resize the output buffer
    fn set_size(&mut self, width: u32, height: u32);

    /// Draw one frame. Absent models are simply not drawn.
    fn render(&mut self, scene: &Scene, camera: &Camera);
}

/// Orbit-style camera controls with every interaction switched off.
///
/// Only [`OrbitControls::update`] has an effect: it aims the camera at
/// `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub enable_zoom: bool,
    pub enable_rotate: bool,
    pub enable_pan: bool,
}

impl OrbitControls {
    pub fn disabled(target: Point3<f32>) -> Self {
        Self {
            target,
            enable_zoom: false,
            enable_rotate: false,
            enable_pan: false,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.enable_zoom || self.enable_rotate || self.enable_pan
    }

    pub fn update(&self, camera: &mut Camera) {
        camera.look_at(self.target);
    }
}

/// Owns the camera, the renderer and the scene
pub struct Viewport<R> {
    camera: Camera,
    renderer: R,
    controls: OrbitControls,
    scene: Scene,
    width: u32,
    height: u32,
}

impl<R: RenderTarget> Viewport<R> {
    pub fn new(mut renderer: R, width: u32, height: u32) -> Self {
        // Same zero-height rule as `resize`: keep a finite aspect
        let mut camera = if height > 0 {
            Camera::new(width, height)
        } else {
            log::debug!("viewport created with zero height, default aspect used");
            Camera::default()
        };
        let controls = OrbitControls::disabled(Point3::origin());
        controls.update(&mut camera);
        renderer.set_size(width, height);

        Self {
            camera,
            renderer,
            controls,
            scene: Scene::new(),
            width,
            height,
        }
    }

    /// Match camera and renderer to a new window size.
    ///
    /// A zero height would give a non-finite aspect ratio, so the camera is
    /// left alone in that case; the renderer is still resized.
    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("viewport resized to {width}x{height}");
        if height > 0 {
            self.camera.aspect = aspect_ratio(width, height);
            self.camera.update_projection_matrix();
        }
        self.renderer.set_size(width, height);
        self.width = width;
        self.height = height;
    }

    /// Draw the current scene through the camera
    pub fn render(&mut self) {
        self.renderer.render(&self.scene, &self.camera);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records what the viewport asked of it
    #[derive(Debug, Default)]
    pub(crate) struct RecordingTarget {
        pub size: Option<(u32, u32)>,
        pub frames: usize,
        pub models_drawn: usize,
    }

    impl RenderTarget for RecordingTarget {
        fn set_size(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
        }

        fn render(&mut self, scene: &Scene, _camera: &Camera) {
            self.frames += 1;
            self.models_drawn += scene.models().count();
        }
    }

    #[test]
    fn test_new_sizes_renderer() {
        let viewport = Viewport::new(RecordingTarget::default(), 800, 600);
        assert_eq!(viewport.renderer().size, Some((800, 600)));
        assert!((viewport.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_updates_camera_and_renderer() {
        let mut viewport = Viewport::new(RecordingTarget::default(), 800, 600);
        let before = viewport.camera().projection_matrix();

        viewport.resize(1024, 512);

        assert_eq!(viewport.camera().aspect, 1024.0 / 512.0);
        assert_ne!(viewport.camera().projection_matrix(), before);
        assert_eq!(viewport.renderer().size, Some((1024, 512)));
        assert_eq!(viewport.size(), (1024, 512));
    }

    #[test]
    fn test_zero_height_keeps_camera() {
        let mut viewport = Viewport::new(RecordingTarget::default(), 800, 600);
        viewport.resize(800, 0);
        assert!(viewport.camera().aspect.is_finite());
        assert_eq!(viewport.renderer().size, Some((800, 0)));
    }

    #[test]
    fn test_zero_height_start_has_finite_aspect() {
        let mut viewport = Viewport::new(RecordingTarget::default(), 640, 0);
        assert!(viewport.camera().aspect.is_finite());
        assert_eq!(viewport.renderer().size, Some((640, 0)));

        viewport.resize(640, 320);
        assert_eq!(viewport.camera().aspect, 2.0);
    }

    #[test]
    fn test_controls_are_inert() {
        let viewport = Viewport::new(RecordingTarget::default(), 800, 600);
        assert!(!viewport.controls().is_interactive());
        assert_eq!(viewport.camera().target, Point3::origin());
    }

    #[test]
    fn test_render_with_empty_scene() {
        let mut viewport = Viewport::new(RecordingTarget::default(), 800, 600);
        viewport.render();
        viewport.render();
        assert_eq!(viewport.renderer().frames, 2);
        assert_eq!(viewport.renderer().models_drawn, 0);
    }
}
