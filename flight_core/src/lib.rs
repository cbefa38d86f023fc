//! `flight_core`
//!
//! Orientation/transform engine for the flight camera demo.
//!
//! Design goals:
//! - Column vectors and column-major matrices throughout, so matrices can be
//!   handed to a graphics API without reformatting.
//! - Orientation carried as rotating basis vectors, not stored angles.
//! - No allocation while ticking and no `unsafe`.
//! - Contract violations (wrong homogeneous tags, bad constructor input)
//!   panic; only configuration loading returns errors.

pub mod camera;
pub mod config;
pub mod history;
pub mod matrix;
pub mod render;
pub mod scalar;
pub mod ship;
pub mod vector;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::camera::*;
    pub use crate::config::*;
    pub use crate::history::*;
    pub use crate::matrix::*;
    pub use crate::render::*;
    pub use crate::scalar::*;
    pub use crate::ship::*;
    pub use crate::vector::*;
}
