//! Rendering abstraction.
//!
//! This crate intentionally does not depend on a graphics backend. A renderer
//! receives, once per frame, the ship's model-to-world matrix and the
//! camera's world-to-view matrix as flattened column-major slices that can be
//! loaded directly (e.g. as a model-view matrix pair).

use tracing::trace;

/// A minimal rendering API.
pub trait RenderBackend {
    fn begin_frame(&mut self);
    fn submit(&mut self, model: &[f32], view: &[f32]);
    fn end_frame(&mut self);
}

/// A no-op renderer useful for headless tests.
#[derive(Default)]
pub struct NullRenderer;

impl RenderBackend for NullRenderer {
    fn begin_frame(&mut self) {}
    fn submit(&mut self, _model: &[f32], _view: &[f32]) {}
    fn end_frame(&mut self) {}
}

/// Logs the translation columns of each submitted pair and counts frames.
#[derive(Default)]
pub struct TracingRenderer {
    frames: u64,
}

impl TracingRenderer {
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderBackend for TracingRenderer {
    fn begin_frame(&mut self) {}

    fn submit(&mut self, model: &[f32], view: &[f32]) {
        trace!(
            frame = self.frames,
            model_translation = ?model.get(12..15),
            view_translation = ?view.get(12..15),
            "Frame submitted"
        );
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}
