//! Follow camera.
//!
//! The camera sits where the target was `follow_delay_s` ago rather than
//! easing toward where it is now. Each tick the target's world matrix is
//! recorded and the view is rebuilt from the oldest record kept.
//!
//! Until the history fills, the oldest record is the first pose ever
//! recorded, so the camera holds its starting pose and the delay grows to its
//! full length over the first `history_len` ticks.

use tracing::debug;

use crate::{
    config::CameraConfig,
    history::PoseHistory,
    matrix::Mat4,
    ship::WorldTransform,
    vector::Vec4,
};

#[derive(Debug, Clone)]
pub struct FollowCamera {
    separation_m: f32,
    view_height_m: f32,
    history: PoseHistory,
    view: Mat4,
}

impl FollowCamera {
    pub fn new(cfg: &CameraConfig, tick_delta_s: f32) -> Self {
        let history_len = cfg.history_len(tick_delta_s);
        debug!(history_len, separation_m = cfg.separation_m, "Follow camera created");
        Self {
            separation_m: cfg.separation_m,
            view_height_m: cfg.view_height_m,
            history: PoseHistory::with_capacity(history_len),
            view: Mat4::identity(),
        }
    }

    /// Records the target's current pose and rebuilds the view from the
    /// oldest one kept. Run after the target's own tick for the same step.
    pub fn tick(&mut self, target: &impl WorldTransform) {
        let was_full = self.history.is_full();
        self.history.record(target.world_matrix());
        if !was_full && self.history.is_full() {
            debug!(capacity = self.history.capacity(), "Follow delay fully in effect");
        }

        let Some(delayed) = self.history.oldest() else {
            return;
        };

        let eye = delayed * Vec4::point(0.0, self.view_height_m, self.separation_m);
        let x = delayed * Vec4::X;
        let y = delayed * Vec4::Y;
        let z = delayed * Vec4::Z;

        self.view = Mat4::world_to_view_from_basis(x, y, z, eye);
    }

    /// World-to-view transform. Identity until the first tick.
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    pub fn history(&self) -> &PoseHistory {
        &self.history
    }

    pub fn separation_m(&self) -> f32 {
        self.separation_m
    }

    pub fn view_height_m(&self) -> f32 {
        self.view_height_m
    }
}
