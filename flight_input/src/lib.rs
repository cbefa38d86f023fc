//! `flight_input`
//!
//! Input-side collaborators of the flight core:
//! - Key transitions resolved into roll/pitch/boost commands
//! - Console lines parsed into commands
//! - Scripted command timelines for headless runs
//!
//! Commands are issued once per transition, never per tick.

pub mod console;
pub mod input;
pub mod script;

pub use input::{Command, Key, KeyState};
pub use script::FlightScript;
