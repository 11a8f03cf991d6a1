//! Per-frame render step
//!
//! The engine calls [`RenderLoop::step`] once per display refresh. The step
//! only runs while a session is active; it animates and orients the active
//! object when its marker is in view and then requests exactly one draw.

use crate::session::{SessionController, SessionState, TrackerBackend};

/// Receives the result of one render step
pub trait FrameSink {
    /// Set the yaw of the mesh attached to anchor `index`
    fn apply_yaw(&mut self, index: usize, yaw: f32);
    /// Draw the scene once
    fn draw(&mut self);
}

/// Frame counter for the render step
#[derive(Debug, Default, Clone)]
pub struct RenderLoop {
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame. Returns false when no session is active and the loop
    /// is detached.
    pub fn step<T: TrackerBackend>(
        &mut self,
        session: &mut SessionController<T>,
        sink: &mut dyn FrameSink,
    ) -> bool {
        if session.state() != SessionState::Active {
            return false;
        }

        if let Some(index) = session.visible_active() {
            let rotation = session.rotation_mut();
            rotation.tick();
            sink.apply_yaw(index, rotation.angle);
        }

        sink.draw();
        self.frames += 1;
        true
    }

    /// Frames drawn since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
