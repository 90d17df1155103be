//! framepace core
//!
//! Frame-pacing, fixed-timestep driver. `FrameScheduler` runs the
//! initialize → {simulate, render, delay} → shutdown cycle against anything
//! implementing `Engine`; `StandardEngine` is the stock implementation.

pub mod config;
pub mod device;
pub mod engine;
pub mod error;
pub mod frame;
pub mod log;
pub mod module;
pub mod phase;
pub mod schedule;
pub mod signals;
pub mod telemetry;
pub mod time;

pub use config::EngineConfig;
pub use engine::{Engine, StandardEngine};
pub use error::{ConfigError, EngineError, EngineResult};
pub use module::Game;
pub use schedule::{FrameScheduler, RunSummary};
pub use time::{FrameBudget, Ticks};
