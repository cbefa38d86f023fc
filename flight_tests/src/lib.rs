//! Shared helpers for the flight integration tests.

use flight_core::config::{AngularConfig, FlightConfig};

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

/// Quarter-second ticks with a one-second follow delay: four history slots,
/// all values exact in binary floating point.
pub fn coarse_config() -> FlightConfig {
    let mut cfg = FlightConfig {
        tick_delta_s: 0.25,
        ..Default::default()
    };
    cfg.camera.follow_delay_s = 1.0;
    cfg
}

/// Axis limits that reach `deg_per_tick` of rotation within a single tick.
pub fn snap_axis(deg_per_tick: f32, tick_delta_s: f32) -> AngularConfig {
    AngularConfig {
        max_velocity_deg_per_s: deg_per_tick / tick_delta_s,
        acceleration_deg_per_s2: 1.0e6,
    }
}
