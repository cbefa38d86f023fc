//! Ship rigid-body model.
//!
//! Orientation is held as two world-space unit directions, `front` (where the
//! nose points) and `right`, never as Euler angles. Each tick a small
//! rotation is applied directly to them: rolling turns `right` about `front`,
//! pitching turns `front` about `right`. Each rotation leaves its axis
//! untouched and keeps the rotated vector perpendicular to it, so the pair
//! stays orthonormal without being rebuilt from stored angles.
//!
//! Roll and pitch are independent state machines. The commanded direction
//! sets a target angular velocity (`+max` for CCW, `-max` for CW, zero for
//! none) and the current velocity ramps toward it by a fixed step per tick.
//! The one-tick rotation matrices for each axis are cached as a CCW/CW pair
//! and rebuilt only when the velocity or the axis they turn about changes.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    config::{AngularConfig, ShipConfig},
    matrix::Mat4,
    vector::Vec4,
};

/// Rotation command for one axis. Positive angles are counter-clockwise
/// looking down the axis toward the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    None,
    Ccw,
    Cw,
}

/// Linear speed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boost {
    Reverse,
    #[default]
    None,
    Forward,
}

impl Boost {
    fn sign(self) -> f32 {
        match self {
            Boost::Reverse => -1.0,
            Boost::None => 0.0,
            Boost::Forward => 1.0,
        }
    }
}

/// Anything that exposes a model-to-world transform for a camera to follow.
pub trait WorldTransform {
    fn world_matrix(&self) -> &Mat4;
}

impl WorldTransform for Mat4 {
    fn world_matrix(&self) -> &Mat4 {
        self
    }
}

/// Angular velocity state of one rotation axis.
#[derive(Debug, Clone)]
struct AngularAxis {
    command: Rotation,
    velocity_deg_per_s: f32,
    max_velocity_deg_per_s: f32,
    /// Velocity change per tick (acceleration * tick duration).
    delta_velocity_deg_per_s: f32,
    tick_delta_s: f32,
    /// One tick's rotation: `[0]` CCW, `[1]` CW (the transpose of `[0]`).
    matrices: [Mat4; 2],
}

impl AngularAxis {
    fn new(cfg: &AngularConfig, tick_delta_s: f32) -> Self {
        Self {
            command: Rotation::None,
            velocity_deg_per_s: 0.0,
            max_velocity_deg_per_s: cfg.max_velocity_deg_per_s,
            delta_velocity_deg_per_s: cfg.acceleration_deg_per_s2 * tick_delta_s,
            tick_delta_s,
            matrices: [Mat4::identity(); 2],
        }
    }

    /// Steps the velocity toward the commanded target; returns whether it
    /// changed.
    fn accelerate(&mut self) -> bool {
        let target = match self.command {
            Rotation::None => 0.0,
            Rotation::Ccw => self.max_velocity_deg_per_s,
            Rotation::Cw => -self.max_velocity_deg_per_s,
        };
        let v = self.velocity_deg_per_s;
        if v == target {
            return false;
        }
        self.velocity_deg_per_s = if v < target {
            (v + self.delta_velocity_deg_per_s).min(target)
        } else {
            (v - self.delta_velocity_deg_per_s).max(target)
        };
        self.velocity_deg_per_s != v
    }

    fn rebuild(&mut self, axis: Vec4) {
        let angle_deg = self.velocity_deg_per_s.abs() * self.tick_delta_s;
        let ccw = Mat4::rotation_axis(angle_deg, axis.xyz());
        self.matrices = [ccw, ccw.transposed()];
    }

    /// This tick's rotation, if the axis is turning.
    fn step(&self) -> Option<&Mat4> {
        if self.velocity_deg_per_s > 0.0 {
            Some(&self.matrices[0])
        } else if self.velocity_deg_per_s < 0.0 {
            Some(&self.matrices[1])
        } else {
            None
        }
    }
}

/// The single moving body.
#[derive(Debug, Clone)]
pub struct Ship {
    position: Vec4,
    front: Vec4,
    right: Vec4,

    roll: AngularAxis,
    pitch: AngularAxis,

    boost: Boost,
    /// Distance covered along `front` each tick (meters). The config names
    /// it per second; it is applied once per tick without scaling.
    speed: f32,
    delta_speed: f32,
    min_speed: f32,
    max_speed: f32,

    reorthonormalize_interval: Option<u32>,
    ticks: u64,

    world: Mat4,
}

impl Ship {
    /// Places the ship at `position` with its nose pointing at `look_at`.
    /// `world_up` fixes the initial roll.
    ///
    /// Panics if `position`/`look_at` are not points, `world_up` is not a
    /// direction, the speed limits are inverted, or the view direction is
    /// parallel to `world_up`.
    pub fn new(
        cfg: &ShipConfig,
        tick_delta_s: f32,
        position: Vec4,
        look_at: Vec4,
        world_up: Vec4,
    ) -> Self {
        assert!(position.is_point(), "ship position must be a point: {position:?}");
        assert!(look_at.is_point(), "ship look-at must be a point: {look_at:?}");
        assert!(world_up.is_direction(), "world up must be a direction: {world_up:?}");
        assert!(tick_delta_s > 0.0, "tick duration must be positive");
        assert!(
            cfg.min_speed_m_per_s <= cfg.max_speed_m_per_s,
            "min speed {} exceeds max speed {}",
            cfg.min_speed_m_per_s,
            cfg.max_speed_m_per_s
        );

        let front = (look_at - position).normalise();
        let right = front.cross(world_up);
        assert!(
            right.length() > 0.0,
            "world up {world_up:?} is parallel to the view direction {front:?}"
        );
        let right = right.normalise();

        let mut ship = Self {
            position,
            front,
            right,
            roll: AngularAxis::new(&cfg.roll, tick_delta_s),
            pitch: AngularAxis::new(&cfg.pitch, tick_delta_s),
            boost: Boost::None,
            speed: cfg.min_speed_m_per_s,
            delta_speed: cfg.boost_acceleration_m_per_s2 * tick_delta_s,
            min_speed: cfg.min_speed_m_per_s,
            max_speed: cfg.max_speed_m_per_s,
            reorthonormalize_interval: cfg.reorthonormalize_interval_ticks,
            ticks: 0,
            world: Mat4::identity(),
        };
        ship.roll.rebuild(ship.front);
        ship.pitch.rebuild(ship.right);
        ship.rebuild_world();

        debug!(
            position = ?ship.position,
            front = ?ship.front,
            right = ?ship.right,
            "Ship created"
        );
        ship
    }

    pub fn set_roll(&mut self, rotation: Rotation) {
        self.roll.command = rotation;
    }

    pub fn set_pitch(&mut self, rotation: Rotation) {
        self.pitch.command = rotation;
    }

    pub fn set_boost(&mut self, boost: Boost) {
        self.boost = boost;
    }

    /// Advances one fixed step.
    pub fn tick(&mut self) {
        let mut pitch_axis_moved = false;

        if self.roll.accelerate() {
            self.roll.rebuild(self.front);
        }
        if let Some(r) = self.roll.step() {
            self.right = r * self.right;
            pitch_axis_moved = true;
        }

        if self.pitch.accelerate() || pitch_axis_moved {
            self.pitch.rebuild(self.right);
        }
        if let Some(p) = self.pitch.step() {
            self.front = p * self.front;
            self.roll.rebuild(self.front);
        }

        if self.boost != Boost::None {
            self.speed = (self.speed + self.delta_speed * self.boost.sign())
                .clamp(self.min_speed, self.max_speed);
        }

        self.position += self.front * self.speed;

        self.ticks += 1;
        if let Some(n) = self.reorthonormalize_interval {
            if self.ticks % u64::from(n) == 0 {
                self.reorthonormalize();
            }
        }

        self.rebuild_world();
    }

    /// Gram-Schmidt on the basis pair, keeping `front`'s direction.
    fn reorthonormalize(&mut self) {
        let front = self.front.normalise();
        let right = (self.right - front * self.right.dot(front)).normalise();
        trace!(
            front_error = (self.front.length() - 1.0).abs(),
            skew = self.right.dot(self.front).abs(),
            "Re-orthonormalising ship basis"
        );
        self.front = front;
        self.right = right;
        self.roll.rebuild(self.front);
        self.pitch.rebuild(self.right);
    }

    fn rebuild_world(&mut self) {
        let back = self.front.scale(-1.0);
        let up = back.cross(self.right);
        self.world = Mat4::basis_to_matrix(self.right, up, back, self.position);
    }

    pub fn position(&self) -> Vec4 {
        self.position
    }

    pub fn front(&self) -> Vec4 {
        self.front
    }

    pub fn right(&self) -> Vec4 {
        self.right
    }

    /// Ship-local up in world space, derived from `front` and `right`.
    pub fn up(&self) -> Vec4 {
        self.front.scale(-1.0).cross(self.right)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn roll(&self) -> Rotation {
        self.roll.command
    }

    pub fn pitch(&self) -> Rotation {
        self.pitch.command
    }

    pub fn boost(&self) -> Boost {
        self.boost
    }

    pub fn roll_velocity_deg_per_s(&self) -> f32 {
        self.roll.velocity_deg_per_s
    }

    pub fn pitch_velocity_deg_per_s(&self) -> f32 {
        self.pitch.velocity_deg_per_s
    }

    /// Ticks run since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl WorldTransform for Ship {
    fn world_matrix(&self) -> &Mat4 {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const DT: f32 = 1.0 / 60.0;

    fn default_ship(cfg: &ShipConfig) -> Ship {
        Ship::new(
            cfg,
            DT,
            Vec4::point(0.0, 0.0, 0.0),
            Vec4::point(0.0, 0.0, -1.0),
            Vec4::Y,
        )
    }

    /// Angular velocity reaches its limit in a single tick.
    fn instant_config() -> ShipConfig {
        let axis = AngularConfig {
            max_velocity_deg_per_s: 60.0,
            acceleration_deg_per_s2: 1.0e6,
        };
        ShipConfig {
            roll: axis,
            pitch: axis,
            ..Default::default()
        }
    }

    fn assert_orthonormal(ship: &Ship, eps: f32) {
        assert_abs_diff_eq!(ship.front().length(), 1.0, epsilon = eps);
        assert_abs_diff_eq!(ship.right().length(), 1.0, epsilon = eps);
        assert_abs_diff_eq!(ship.front().dot(ship.right()), 0.0, epsilon = eps);
        assert!(ship.front().is_direction() && ship.right().is_direction());
    }

    #[test]
    fn spawn_looking_down_negative_z() {
        let ship = default_ship(&ShipConfig::default());
        assert_eq!(ship.front(), Vec4::direction(0.0, 0.0, -1.0));
        assert_eq!(ship.right(), Vec4::direction(1.0, 0.0, 0.0));
        assert_eq!(ship.up(), Vec4::Y);
        assert_abs_diff_eq!(*ship.world_matrix(), Mat4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn idle_tick_keeps_pose() {
        let mut ship = default_ship(&ShipConfig::default());
        ship.tick();
        assert_eq!(ship.position(), Vec4::point(0.0, 0.0, 0.0));
        assert_eq!(ship.world_matrix().translation_column(), Vec4::point(0.0, 0.0, 0.0));
        assert_eq!(ship.ticks(), 1);
    }

    #[test]
    fn random_spawns_are_orthonormal() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let position = Vec4::point(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );
            let look_at = position
                + Vec4::direction(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
            if (look_at - position).length() < 0.05 {
                continue;
            }
            let ship = Ship::new(&ShipConfig::default(), DT, position, look_at, Vec4::Y);
            assert_orthonormal(&ship, 1e-5);
        }
    }

    #[test]
    #[should_panic(expected = "world up must be a direction")]
    fn point_as_up_panics() {
        let _ = Ship::new(
            &ShipConfig::default(),
            DT,
            Vec4::point(0.0, 0.0, 0.0),
            Vec4::point(0.0, 0.0, -1.0),
            Vec4::point(0.0, 1.0, 0.0),
        );
    }

    #[test]
    #[should_panic(expected = "exceeds max speed")]
    fn inverted_speed_limits_panic_at_spawn() {
        let cfg = ShipConfig {
            min_speed_m_per_s: 5.0,
            max_speed_m_per_s: 1.0,
            ..Default::default()
        };
        let _ = default_ship(&cfg);
    }

    #[test]
    #[should_panic(expected = "parallel")]
    fn up_parallel_to_view_panics() {
        let _ = Ship::new(
            &ShipConfig::default(),
            DT,
            Vec4::point(0.0, 0.0, 0.0),
            Vec4::point(0.0, 5.0, 0.0),
            Vec4::Y,
        );
    }

    #[test]
    fn ccw_roll_turns_right_about_front() {
        let mut ship = default_ship(&instant_config());
        ship.set_roll(Rotation::Ccw);
        for _ in 0..90 {
            ship.tick();
        }
        // 60 deg/s for 1.5 s about -z
        assert_abs_diff_eq!(ship.right(), Vec4::direction(0.0, -1.0, 0.0), epsilon = 1e-4);
        assert_abs_diff_eq!(ship.front(), Vec4::direction(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn cw_roll_undoes_ccw_roll() {
        let mut ship = default_ship(&instant_config());
        ship.set_roll(Rotation::Ccw);
        for _ in 0..40 {
            ship.tick();
        }
        ship.set_roll(Rotation::Cw);
        for _ in 0..40 {
            ship.tick();
        }
        assert_abs_diff_eq!(ship.right(), Vec4::X, epsilon = 1e-4);
    }

    #[test]
    fn ccw_pitch_raises_the_nose() {
        let mut ship = default_ship(&instant_config());
        ship.set_pitch(Rotation::Ccw);
        for _ in 0..90 {
            ship.tick();
        }
        // rotating -z about +x by +90 deg gives +y
        assert_abs_diff_eq!(ship.front(), Vec4::Y, epsilon = 1e-4);
        assert_abs_diff_eq!(ship.right(), Vec4::X, epsilon = 1e-6);
    }

    #[test]
    fn rolling_preserves_orthonormality() {
        let mut ship = default_ship(&ShipConfig::default());
        ship.set_roll(Rotation::Cw);
        for _ in 0..5_000 {
            ship.tick();
            assert_orthonormal(&ship, 1e-3);
        }
    }

    #[test]
    fn combined_rotation_preserves_orthonormality() {
        let mut ship = default_ship(&ShipConfig::default());
        let mut rng = StdRng::seed_from_u64(21);
        let dirs = [Rotation::None, Rotation::Ccw, Rotation::Cw];
        for i in 0..3_000 {
            if i % 50 == 0 {
                ship.set_roll(dirs[rng.gen_range(0..3)]);
                ship.set_pitch(dirs[rng.gen_range(0..3)]);
            }
            ship.tick();
        }
        assert_orthonormal(&ship, 1e-3);
    }

    #[test]
    fn reorthonormalising_keeps_basis_tight() {
        let cfg = ShipConfig {
            reorthonormalize_interval_ticks: Some(10),
            ..instant_config()
        };
        let mut ship = default_ship(&cfg);
        ship.set_roll(Rotation::Ccw);
        ship.set_pitch(Rotation::Cw);
        for _ in 0..10_000 {
            ship.tick();
        }
        assert_orthonormal(&ship, 1e-5);
    }

    #[test]
    fn angular_velocity_ramps_and_decays() {
        let mut ship = default_ship(&ShipConfig::default());
        ship.set_roll(Rotation::Ccw);
        ship.tick();
        assert_abs_diff_eq!(ship.roll_velocity_deg_per_s(), 4.0, epsilon = 1e-4);
        for _ in 0..100 {
            ship.tick();
        }
        assert_eq!(ship.roll_velocity_deg_per_s(), 60.0);

        ship.set_roll(Rotation::None);
        for _ in 0..100 {
            ship.tick();
        }
        assert_eq!(ship.roll_velocity_deg_per_s(), 0.0);

        let before = ship.right();
        ship.tick();
        assert_eq!(ship.right(), before);
    }

    #[test]
    fn speed_stays_within_limits() {
        let cfg = ShipConfig::default();
        let mut ship = default_ship(&cfg);
        let mut rng = StdRng::seed_from_u64(5);
        let boosts = [Boost::Reverse, Boost::None, Boost::Forward];
        for i in 0..20_000 {
            if i % 37 == 0 {
                ship.set_boost(boosts[rng.gen_range(0..3)]);
            }
            ship.tick();
            assert!(ship.speed() >= cfg.min_speed_m_per_s);
            assert!(ship.speed() <= cfg.max_speed_m_per_s);
        }
    }

    #[test]
    fn boost_from_rest_flies_straight() {
        let cfg = ShipConfig::default();
        let mut ship = default_ship(&cfg);
        ship.set_boost(Boost::Forward);
        let step = cfg.boost_acceleration_m_per_s2 * DT;
        let mut last_speed = ship.speed();
        for _ in 0..400 {
            ship.tick();
            let expected = (last_speed + step).min(cfg.max_speed_m_per_s);
            assert_abs_diff_eq!(ship.speed(), expected, epsilon = 1e-4);
            last_speed = ship.speed();

            let p = ship.position();
            assert_eq!(p.x(), 0.0);
            assert_eq!(p.y(), 0.0);
            assert!(p.z() < 0.0);
        }
        assert_eq!(ship.speed(), cfg.max_speed_m_per_s);

        ship.set_boost(Boost::Reverse);
        for _ in 0..1_000 {
            ship.tick();
        }
        assert_eq!(ship.speed(), cfg.min_speed_m_per_s);
    }

    #[test]
    fn speed_is_distance_per_tick() {
        let cfg = ShipConfig {
            min_speed_m_per_s: 10.0,
            max_speed_m_per_s: 10.0,
            ..Default::default()
        };
        let mut ship = default_ship(&cfg);
        ship.tick();
        assert_eq!(ship.position(), Vec4::point(0.0, 0.0, -10.0));
        ship.tick();
        assert_eq!(ship.position(), Vec4::point(0.0, 0.0, -20.0));
    }

    #[test]
    fn world_matrix_tracks_basis_and_position() {
        let mut ship = default_ship(&instant_config());
        ship.set_boost(Boost::Forward);
        ship.set_pitch(Rotation::Ccw);
        for _ in 0..30 {
            ship.tick();
        }
        let w = *ship.world_matrix();
        assert_eq!(w.column(0), ship.right());
        assert_abs_diff_eq!(w.column(2), ship.front().scale(-1.0), epsilon = 1e-7);
        assert_eq!(w.translation_column(), ship.position());
        // the nose is local -z
        assert_abs_diff_eq!(w * Vec4::direction(0.0, 0.0, -1.0), ship.front(), epsilon = 1e-6);
    }
}
