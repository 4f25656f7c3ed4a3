/// The one controller a host drives: load completions, input, resize, frames
use crate::error::LoadResult;
use crate::projection::Camera;
use crate::scene::{Model, Scene, Side};
use crate::touch::{TouchPoint, TouchTracker};
use crate::viewport::{RenderTarget, Viewport};

/// Viewer state for one page (or terminal) session
pub struct Session<R> {
    viewport: Viewport<R>,
    touch: TouchTracker,
}

impl<R: RenderTarget> Session<R> {
    pub fn new(renderer: R, width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(renderer, width, height),
            touch: TouchTracker::new(),
        }
    }

    /// A model load finished. Failures are logged and the slot stays empty.
    pub fn model_loaded(&mut self, side: Side, result: LoadResult<Model>) {
        match result {
            Ok(model) => self.viewport.scene_mut().insert(model),
            Err(e) => log::error!("failed to load {side:?} model: {e}"),
        }
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) {
        self.touch.start(touches);
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint]) {
        let width = f64::from(self.viewport.size().0);
        self.touch.moved(touches, width, self.viewport.scene_mut());
    }

    pub fn touch_end(&mut self) {
        self.touch.end();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.resize(width, height);
    }

    /// One tick of the render loop
    pub fn render_frame(&mut self) {
        self.viewport.render();
    }

    pub fn scene(&self) -> &Scene {
        self.viewport.scene()
    }

    pub fn camera(&self) -> &Camera {
        self.viewport.camera()
    }

    pub fn viewport(&self) -> &Viewport<R> {
        &self.viewport
    }

    pub fn touch(&self) -> &TouchTracker {
        &self.touch
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        self.viewport.renderer_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::viewport::tests::RecordingTarget;

    fn session() -> Session<RecordingTarget> {
        Session::new(RecordingTarget::default(), 400, 300)
    }

    #[test]
    fn test_input_before_any_load() {
        let mut session = session();
        session.touch_start(&[TouchPoint::new(100.0, 10.0)]);
        session.touch_move(&[TouchPoint::new(150.0, 10.0)]);
        session.touch_end();
        session.render_frame();
        assert_eq!(session.scene().models().count(), 0);
    }

    #[test]
    fn test_failed_load_leaves_slot_empty() {
        let mut session = session();
        session.model_loaded(
            Side::Left,
            Err(LoadError::Fetch {
                path: "public/chiral_trefoil_knots_left.obj".into(),
                message: "HTTP 404 Not Found".into(),
            }),
        );
        assert!(session.scene().get(Side::Left).is_none());
    }

    #[test]
    fn test_drag_uses_current_width() {
        let mut session = session();
        session.model_loaded(Side::Left, Ok(Model::placed(Side::Left, Vec::new())));
        session.model_loaded(Side::Right, Ok(Model::placed(Side::Right, Vec::new())));
        let right_before = session.scene().get(Side::Right).unwrap().rotation;

        // x = 250 is on the right of a 400 wide viewport, but left of 800
        session.resize(800, 300);
        session.touch_start(&[TouchPoint::new(250.0, 10.0)]);
        session.touch_move(&[TouchPoint::new(260.0, 10.0)]);

        assert_eq!(session.scene().get(Side::Right).unwrap().rotation, right_before);
        assert!(session.touch().is_active());
    }

    #[test]
    fn test_frames_draw_loaded_models() {
        let mut session = session();
        session.render_frame();
        session.model_loaded(Side::Right, Ok(Model::placed(Side::Right, Vec::new())));
        session.render_frame();
        assert_eq!(session.viewport().renderer().frames, 2);
        assert_eq!(session.viewport().renderer().models_drawn, 1);
    }
}
