#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core balance-control logic (hardware-agnostic).
//!
//! This crate turns noisy, wrap-prone 14-bit angle samples into a stable
//! multi-turn estimate and drives a velocity-controlled actuator through a
//! two-phase strategy: open-loop energy injection, then closed-loop
//! PID-with-damping stabilization. All hardware interactions go through the
//! `pendulum_traits::AngleSensor` and `pendulum_traits::MotorPort` traits.
//!
//! ## Architecture
//!
//! - **Tracking**: multi-turn unwrap + rest-position recalibration
//!   (`tracker` module)
//! - **Bootstrap**: log-decaying open-loop pulse train (`bootstrap` module)
//! - **Stabilization**: amplitude-ramped PID with velocity damping
//!   (`stabilizer`, `pid`, `schedule` modules)
//! - **Supervision**: Calibrating -> Bootstrap -> Stabilizing ->
//!   ShuttingDown state machine (`core` module), built through a type-state
//!   builder (`builder` module)
//! - **Resource safety**: `MotorSession` guarantees a final zero-velocity
//!   command on every exit path (`session` module)

// Module declarations
pub mod bootstrap;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod core;
pub mod error;
pub mod hw_error;
pub mod mocks;
pub mod pid;
pub mod schedule;
pub mod session;
pub mod stabilizer;
pub mod status;
pub mod tracker;
pub mod util;

pub use crate::bootstrap::{BootstrapOscillator, BootstrapOutcome};
pub use crate::builder::{Supervisor, SupervisorBuilder, SupervisorG, build_supervisor};
pub use crate::config::{
    BootstrapCfg, PidCfg, SafetyCfg, ScheduleCfg, Timeouts, TrackerCfg, TrialCfg,
};
pub use crate::core::SupervisorCore;
pub use crate::error::{BuildError, ControlError, Report, Result};
pub use crate::pid::PidState;
pub use crate::schedule::AmplitudeSchedule;
pub use crate::session::MotorSession;
pub use crate::stabilizer::{SegmentEvent, StabilizeStep, StabilizingController};
pub use crate::status::{ControlPhase, SessionOutcome};
pub use crate::tracker::AngleTracker;
