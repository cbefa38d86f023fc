//! Console commands.
//!
//! Text front-end for the command setters, used by the `flight` binary's
//! stdin reader:
//!
//! ```text
//! roll ccw|cw|none
//! pitch ccw|cw|none      (aliases: up = ccw, down = cw)
//! boost forward|reverse|none
//! status
//! quit
//! ```

use anyhow::{bail, Context};
use flight_core::ship::{Boost, Rotation};

use crate::input::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Ship(Command),
    Status,
    Help,
    Quit,
}

pub const HELP: &[&str] = &[
    "roll ccw|cw|none",
    "pitch ccw|cw|none (up = ccw, down = cw)",
    "boost forward|reverse|none",
    "status",
    "quit",
];

/// Parses one console line. Empty lines parse to `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<ConsoleCommand>> {
    let tokens: Vec<String> = line
        .split_whitespace()
        .map(|t| t.to_ascii_lowercase())
        .collect();
    let Some(verb) = tokens.first() else {
        return Ok(None);
    };
    let arg = tokens.get(1).map(String::as_str);

    let cmd = match verb.as_str() {
        "roll" => ConsoleCommand::Ship(Command::Roll(
            parse_rotation(arg).context("usage: roll ccw|cw|none")?,
        )),
        "pitch" => ConsoleCommand::Ship(Command::Pitch(
            parse_rotation(arg).context("usage: pitch ccw|cw|none")?,
        )),
        "boost" => ConsoleCommand::Ship(Command::Boost(
            parse_boost(arg).context("usage: boost forward|reverse|none")?,
        )),
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => bail!("unknown command '{other}', try 'help'"),
    };
    Ok(Some(cmd))
}

fn parse_rotation(arg: Option<&str>) -> anyhow::Result<Rotation> {
    Ok(match arg {
        Some("ccw" | "up") => Rotation::Ccw,
        Some("cw" | "down") => Rotation::Cw,
        Some("none" | "stop") | None => Rotation::None,
        Some(other) => bail!("unknown rotation '{other}'"),
    })
}

fn parse_boost(arg: Option<&str>) -> anyhow::Result<Boost> {
    Ok(match arg {
        Some("forward" | "fwd") => Boost::Forward,
        Some("reverse" | "rev") => Boost::Reverse,
        Some("none" | "stop") | None => Boost::None,
        Some(other) => bail!("unknown boost '{other}'"),
    })
}
