use std::ops::{Deref, DerefMut};

use crate::{
    config::EngineConfig,
    engine::Engine,
    error::{ConfigError, EngineError, EngineResult},
    phase::FramePhase,
    time::{FrameBudget, Ticks},
};

/// Drives an `Engine` through initialize, the paced loop, and shutdown.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    backend: String,
    budget: FrameBudget,
}

/// What a finished run looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub logic_ticks: Ticks,
    pub budget: FrameBudget,
}

impl FrameScheduler {
    /// Fails on a non-positive rate or an empty backend name, before any engine is touched.
    pub fn new(backend: impl Into<String>, target_rate: f64) -> Result<Self, ConfigError> {
        let backend = backend.into();
        if backend.trim().is_empty() {
            return Err(ConfigError::EmptyBackend);
        }
        let budget = FrameBudget::from_rate(target_rate)?;
        Ok(Self { backend, budget })
    }

    pub fn from_config(cfg: &EngineConfig) -> Result<Self, ConfigError> {
        let budget = cfg.validate()?;
        Ok(Self {
            backend: cfg.device.backend.clone(),
            budget,
        })
    }

    #[inline]
    pub fn budget(&self) -> FrameBudget {
        self.budget
    }

    #[inline]
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Runs until the engine reports done or a phase fails.
    ///
    /// `shutdown` is called exactly once on every exit path, including a
    /// failed `initialize` and unwinding panics.
    pub fn run<E: Engine + ?Sized>(&self, engine: &mut E) -> EngineResult<RunSummary> {
        let budget = self.budget;
        let mut engine = ShutdownGuard::new(engine);

        engine.initialize(&self.backend)?;
        log::info!("device '{}' up, frame budget {}", self.backend, budget);

        let mut logic_ticks = engine.current_ticks();
        let mut frames: u64 = 0;

        while !engine.is_done() {
            let sample = engine.current_ticks();
            // render and delay must see the instant simulate started from
            let prev_sample = sample;

            logic_ticks = engine
                .simulate(logic_ticks, budget)
                .map_err(|e| EngineError::in_phase(FramePhase::Simulate, e))?;

            engine
                .render(prev_sample, budget)
                .map_err(|e| EngineError::in_phase(FramePhase::Render, e))?;

            engine.delay(prev_sample, budget);
            frames += 1;
        }

        log::info!("loop finished after {frames} frames, logic clock at {logic_ticks}");

        Ok(RunSummary {
            frames,
            logic_ticks,
            budget,
        })
    }
}

/// Holds the engine for the duration of a run and shuts it down on drop.
pub struct ShutdownGuard<'a, E: Engine + ?Sized> {
    engine: &'a mut E,
}

impl<'a, E: Engine + ?Sized> ShutdownGuard<'a, E> {
    #[inline]
    pub fn new(engine: &'a mut E) -> Self {
        Self { engine }
    }
}

impl<E: Engine + ?Sized> Deref for ShutdownGuard<'_, E> {
    type Target = E;

    #[inline]
    fn deref(&self) -> &E {
        self.engine
    }
}

impl<E: Engine + ?Sized> DerefMut for ShutdownGuard<'_, E> {
    #[inline]
    fn deref_mut(&mut self) -> &mut E {
        self.engine
    }
}

impl<E: Engine + ?Sized> Drop for ShutdownGuard<'_, E> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            log::error!("frame loop panicked, shutting engine down");
        }
        self.engine.shutdown();
    }
}
