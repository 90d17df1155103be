mod demo;

use std::process::ExitCode;

use anyhow::Context;
use framepace_core::{
    log::{init_logger, LoggerConfig},
    signals::ExitSignal,
    time::{Clock, SystemClock},
    EngineConfig, FrameScheduler, RunSummary, StandardEngine,
};

use crate::demo::BouncingBall;

fn main() -> ExitCode {
    if let Err(e) = init_logger(&LoggerConfig::from_env()) {
        eprintln!("{e}");
    }

    ExitCode::from(exit_status(&run()))
}

/// 0 when the loop ended on its done flag, 1 for any config, init or runtime failure.
fn exit_status(result: &anyhow::Result<RunSummary>) -> u8 {
    match result {
        Ok(summary) => {
            log::info!(
                "done: {} frames, logic clock {} at {} per frame",
                summary.frames,
                summary.logic_ticks,
                summary.budget
            );
            0
        }
        Err(e) => {
            log::error!("{e:#}");
            1
        }
    }
}

fn run() -> anyhow::Result<RunSummary> {
    let cfg = match std::env::var_os("FRAMEPACE_CONFIG") {
        Some(path) => EngineConfig::load_toml(&path)?,
        None => EngineConfig::default(),
    };

    let exit = ExitSignal::new();
    if let Err(e) = exit.install_ctrlc_handler() {
        log::warn!("{e}");
    }

    run_with(&cfg, SystemClock::new(), exit)
}

fn run_with<C: Clock>(cfg: &EngineConfig, clock: C, exit: ExitSignal) -> anyhow::Result<RunSummary> {
    // Rate and backend are checked here, before the engine exists.
    let scheduler = FrameScheduler::from_config(cfg).context("invalid configuration")?;

    let game = BouncingBall::new(cfg.demo.run_seconds);
    let mut engine = StandardEngine::new(clock, Box::new(game), &cfg.frame).with_exit_signal(exit);

    scheduler.run(&mut engine).context("frame loop failed")
}
