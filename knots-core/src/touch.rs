//! Touch drag to model rotation.
//!
//! Up to two touch points are tracked. On every move each point is assigned
//! to whichever knot owns the screen half it is currently over, so a finger
//! that crosses the midline starts turning the other knot.

use crate::config::ROTATION_SPEED;
use crate::scene::{Scene, Side};

/// Number of simultaneous touch points that drive rotation
pub const MAX_TOUCHES: usize = 2;

/// Screen position of one touch point, in CSS pixels (or terminal cells)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Interaction state between touch events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchTracker {
    active: bool,
    last: [Option<TouchPoint>; MAX_TOUCHES],
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an interaction is in progress
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last recorded position of touch `index`
    pub fn last(&self, index: usize) -> Option<TouchPoint> {
        self.last.get(index).copied().flatten()
    }

    /// `touchstart`: remember where each tracked finger is and begin an
    /// interaction. A start with no touch points is ignored.
    pub fn start(&mut self, touches: &[TouchPoint]) {
        if touches.is_empty() {
            return;
        }
        for (slot, touch) in self.last.iter_mut().zip(touches) {
            *slot = Some(*touch);
        }
        self.active = true;
    }

    /// `touchmove`: turn the knot under each finger by how far that finger
    /// moved since the last event.
    ///
    /// Returns how many rotation updates were applied. A move aimed at a
    /// knot that has not loaded yet changes nothing, not even the recorded
    /// position of that finger.
    pub fn moved(&mut self, touches: &[TouchPoint], viewport_width: f64, scene: &mut Scene) -> usize {
        if !self.active {
            return 0;
        }

        let mut applied = 0;
        for (index, (slot, touch)) in self.last.iter_mut().zip(touches).enumerate() {
            // A finger the start event never reported only sets its baseline
            let Some(previous) = *slot else {
                log::debug!("touch {index} moved without a recorded start, baseline set");
                *slot = Some(*touch);
                continue;
            };

            let side = Side::for_screen_x(touch.x, viewport_width);
            let Some(model) = scene.get_mut(side) else {
                log::trace!("touch {index} over {side:?}, model not loaded yet");
                continue;
            };

            *slot = Some(*touch);
            let dx = (touch.x - previous.x) as f32;
            let dy = (touch.y - previous.y) as f32;
            model.rotation.rotate(-dy * ROTATION_SPEED, dx * ROTATION_SPEED, 0.0);
            applied += 1;
        }
        applied
    }

    /// `touchend`: stop applying moves. Recorded positions are kept until
    /// the next start overwrites them.
    pub fn end(&mut self) {
        self.active = false;
    }
}
