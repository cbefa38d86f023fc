//! Simulation driver.
//!
//! Owns the ship and its follow camera and steps them in the one valid order:
//! ship first, then camera, within the same tick. Running the camera first
//! would make it trail by an extra tick.
//!
//! Determinism notes:
//! - Each tick integrates a fixed duration; wall-clock time only decides how
//!   many ticks a frame runs (see [`FixedStepLoop`]).
//! - Commands take effect on the next tick and persist until replaced.

use flight_core::{
    camera::FollowCamera,
    config::FlightConfig,
    matrix::Mat4,
    render::RenderBackend,
    ship::{Ship, WorldTransform},
    vector::Vec4,
};
use flight_input::{
    console::{self, ConsoleCommand},
    script::FlightScript,
    Command,
};
use serde::Serialize;
use tracing::{debug, info, warn};

pub struct Simulation {
    cfg: FlightConfig,
    ship: Ship,
    camera: FollowCamera,
    tick: u64,
}

impl Simulation {
    /// Spawns the ship from `cfg.spawn` and attaches the camera.
    pub fn new(cfg: &FlightConfig) -> Self {
        let cfg = cfg.clone();
        let ship = Ship::new(
            &cfg.ship,
            cfg.tick_delta_s,
            cfg.spawn.position,
            cfg.spawn.look_at,
            cfg.spawn.world_up,
        );
        let camera = FollowCamera::new(&cfg.camera, cfg.tick_delta_s);
        info!(
            tick_delta_s = cfg.tick_delta_s,
            history_len = camera.history().capacity(),
            "Simulation ready"
        );
        Self {
            cfg,
            ship,
            camera,
            tick: 0,
        }
    }

    pub fn apply(&mut self, cmd: Command) {
        debug!(tick = self.tick, ?cmd, "Command");
        cmd.apply(&mut self.ship);
    }

    /// Executes one fixed simulation step.
    pub fn step(&mut self) {
        self.ship.tick();
        self.camera.tick(&self.ship);
        self.tick += 1;
    }

    /// Applies the script entries due at the current tick, then steps.
    pub fn step_scripted(&mut self, script: &mut FlightScript) {
        for entry in script.due(self.tick) {
            self.apply(entry.command);
        }
        self.step();
    }

    /// Hands this frame's two matrices to the renderer.
    pub fn frame(&self, renderer: &mut impl RenderBackend) {
        renderer.begin_frame();
        renderer.submit(
            self.ship.world_matrix().flatten(),
            self.camera.view_matrix().flatten(),
        );
        renderer.end_frame();
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &FlightConfig {
        &self.cfg
    }

    /// Simulated time (seconds).
    pub fn sim_time_s(&self) -> f64 {
        self.tick as f64 * f64::from(self.cfg.tick_delta_s)
    }

    pub fn report(&self) -> PoseReport {
        PoseReport {
            tick: self.tick,
            position: self.ship.position(),
            front: self.ship.front(),
            right: self.ship.right(),
            speed: self.ship.speed(),
            world: *self.ship.world_matrix(),
            view: *self.camera.view_matrix(),
        }
    }

    /// Executes one console line. Returns the lines to print, or `None` when
    /// the user asked to quit.
    pub fn exec_console(&mut self, line: &str) -> anyhow::Result<Option<Vec<String>>> {
        let out = match console::parse_line(line)? {
            Some(ConsoleCommand::Ship(cmd)) => {
                self.apply(cmd);
                Vec::new()
            }
            Some(ConsoleCommand::Status) => self.status(),
            Some(ConsoleCommand::Help) => {
                console::HELP.iter().map(|l| l.to_string()).collect()
            }
            Some(ConsoleCommand::Quit) => {
                info!(tick = self.tick, "Quit requested");
                return Ok(None);
            }
            None => Vec::new(),
        };
        Ok(Some(out))
    }

    pub fn status(&self) -> Vec<String> {
        let s = &self.ship;
        let p = s.position();
        vec![
            format!("Tick: {} ({:.2}s simulated)", self.tick, self.sim_time_s()),
            format!("Position: ({:.2}, {:.2}, {:.2})", p.x(), p.y(), p.z()),
            format!("Speed: {:.2} m/tick ({:?})", s.speed(), s.boost()),
            format!(
                "Roll: {:?} at {:.1} deg/s, pitch: {:?} at {:.1} deg/s",
                s.roll(),
                s.roll_velocity_deg_per_s(),
                s.pitch(),
                s.pitch_velocity_deg_per_s()
            ),
            format!(
                "Camera history: {}/{}",
                self.camera.history().len(),
                self.camera.history().capacity()
            ),
        ]
    }
}

/// Snapshot of the state a renderer consumes, for logs and `--ticks` output.
#[derive(Debug, Clone, Serialize)]
pub struct PoseReport {
    pub tick: u64,
    pub position: Vec4,
    pub front: Vec4,
    pub right: Vec4,
    pub speed: f32,
    pub world: Mat4,
    pub view: Mat4,
}

/// Decides how many fixed ticks a frame runs to catch up with real time.
///
/// At most `max_ticks_per_frame` ticks run per frame. When that cap is hit
/// the backlog is kept, not skipped, so after a long stall simulated time
/// trails real time and catches up only as fast as the cap allows.
#[derive(Debug, Clone)]
pub struct FixedStepLoop {
    tick_delta_s: f64,
    max_ticks_per_frame: u32,
    next_tick_s: f64,
    capped: bool,
}

impl FixedStepLoop {
    pub fn new(cfg: &FlightConfig) -> Self {
        let tick_delta_s = f64::from(cfg.tick_delta_s);
        Self {
            tick_delta_s,
            max_ticks_per_frame: cfg.max_ticks_per_frame,
            next_tick_s: tick_delta_s,
            capped: false,
        }
    }

    /// Ticks to run for a frame at `now_s` seconds since the loop started.
    pub fn due_ticks(&mut self, now_s: f64) -> u32 {
        let mut due = 0;
        while now_s > self.next_tick_s && due < self.max_ticks_per_frame {
            self.next_tick_s += self.tick_delta_s;
            due += 1;
        }

        let capped = now_s > self.next_tick_s;
        if capped && !self.capped {
            warn!(
                behind_s = now_s - self.next_tick_s,
                max_ticks_per_frame = self.max_ticks_per_frame,
                "Tick cap hit, simulation falling behind real time"
            );
        }
        self.capped = capped;
        due
    }

    /// Time of the next tick boundary (seconds since start).
    pub fn next_tick_s(&self) -> f64 {
        self.next_tick_s
    }

    /// Whether the last frame left ticks pending.
    pub fn is_behind(&self) -> bool {
        self.capped
    }
}
