//! `flight_sim`
//!
//! Runs the ship and its follow camera:
//! - Fixed timestep simulation steps (ship, then camera)
//! - Frame pacing with a per-frame tick cap
//! - Commands from keys, the console or a JSON script
//! - One model/view matrix pair handed to the renderer per frame

pub mod sim;

pub use sim::{FixedStepLoop, PoseReport, Simulation};
