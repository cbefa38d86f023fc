//! Input handling.
//!
//! In a real demo this would sit behind the windowing layer's key events.
//! Here it only tracks which keys are held and turns each press/release into
//! at most one ship command, so the ship's setters see one call per change
//! of intent rather than one per tick.

use flight_core::ship::{Boost, Rotation, Ship};
use serde::{Deserialize, Serialize};

/// Physical controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    RollLeft,
    RollRight,
    PitchUp,
    PitchDown,
    BoostForward,
    BoostReverse,
}

/// One call to a ship command setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Roll(Rotation),
    Pitch(Rotation),
    Boost(Boost),
}

impl Command {
    pub fn apply(self, ship: &mut Ship) {
        match self {
            Command::Roll(r) => ship.set_roll(r),
            Command::Pitch(r) => ship.set_pitch(r),
            Command::Boost(b) => ship.set_boost(b),
        }
    }
}

/// Held keys and the commands they currently resolve to.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    roll_left: bool,
    roll_right: bool,
    pitch_up: bool,
    pitch_down: bool,
    boost_forward: bool,
    boost_reverse: bool,
}

impl KeyState {
    pub fn press(&mut self, key: Key) -> Option<Command> {
        self.transition(key, true)
    }

    pub fn release(&mut self, key: Key) -> Option<Command> {
        self.transition(key, false)
    }

    /// Rolling right dips the right wing, which is a counter-clockwise turn
    /// about `front` as seen from ahead of the nose.
    pub fn roll(&self) -> Rotation {
        resolve(self.roll_right, self.roll_left, Rotation::Ccw, Rotation::Cw, Rotation::None)
    }

    /// Nose up is counter-clockwise about `right`.
    pub fn pitch(&self) -> Rotation {
        resolve(self.pitch_up, self.pitch_down, Rotation::Ccw, Rotation::Cw, Rotation::None)
    }

    pub fn boost(&self) -> Boost {
        resolve(
            self.boost_forward,
            self.boost_reverse,
            Boost::Forward,
            Boost::Reverse,
            Boost::None,
        )
    }

    fn transition(&mut self, key: Key, down: bool) -> Option<Command> {
        let before = (self.roll(), self.pitch(), self.boost());
        match key {
            Key::RollLeft => self.roll_left = down,
            Key::RollRight => self.roll_right = down,
            Key::PitchUp => self.pitch_up = down,
            Key::PitchDown => self.pitch_down = down,
            Key::BoostForward => self.boost_forward = down,
            Key::BoostReverse => self.boost_reverse = down,
        }
        match key {
            Key::RollLeft | Key::RollRight => {
                (self.roll() != before.0).then(|| Command::Roll(self.roll()))
            }
            Key::PitchUp | Key::PitchDown => {
                (self.pitch() != before.1).then(|| Command::Pitch(self.pitch()))
            }
            Key::BoostForward | Key::BoostReverse => {
                (self.boost() != before.2).then(|| Command::Boost(self.boost()))
            }
        }
    }
}

/// Opposing keys held together cancel out.
fn resolve<T>(positive: bool, negative: bool, pos: T, neg: T, none: T) -> T {
    match (positive, negative) {
        (true, false) => pos,
        (false, true) => neg,
        _ => none,
    }
}
