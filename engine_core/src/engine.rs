use crate::{
    config::FrameConfig,
    device::{create_device, RenderDevice},
    error::{EngineError, EngineResult},
    frame::FrameContext,
    module::Game,
    signals::ExitSignal,
    telemetry::Telemetry,
    time::{pacing_wait, Clock, FrameBudget, Ticks},
};

/// Everything `FrameScheduler` needs from the engine underneath it.
///
/// The scheduler never looks inside the logic clock: whatever `simulate`
/// returns is handed back on the next call.
pub trait Engine {
    fn initialize(&mut self, backend: &str) -> EngineResult<()>;
    fn is_done(&self) -> bool;
    fn current_ticks(&self) -> Ticks;

    /// Advances the game up to `now` and returns the new logic clock.
    fn simulate(&mut self, logic_ticks: Ticks, budget: FrameBudget) -> EngineResult<Ticks>;
    fn render(&mut self, sample: Ticks, budget: FrameBudget) -> EngineResult<()>;
    /// Blocks for whatever is left of `budget` since `sample`. Never a negative wait.
    fn delay(&mut self, sample: Ticks, budget: FrameBudget);

    fn shutdown(&mut self);
}

/// Reference engine: fixed-step catch-up over a `Game`, one `RenderDevice`,
/// and a `Clock`.
pub struct StandardEngine<C: Clock> {
    clock: C,
    game: Box<dyn Game>,
    device: Option<Box<dyn RenderDevice>>,

    exit_signal: ExitSignal,
    exit_requested: bool,

    telemetry: Telemetry,
    max_logic_steps: u32,
    frame_index: u64,

    initialized: bool,
    shutdown_done: bool,
}

impl<C: Clock> StandardEngine<C> {
    pub fn new(clock: C, game: Box<dyn Game>, frame: &FrameConfig) -> Self {
        let mut telemetry = Telemetry::new();
        telemetry.configure_fps_logging(frame.log_fps, frame.fps_log_period_ms);

        Self {
            clock,
            game,
            device: None,
            exit_signal: ExitSignal::new(),
            exit_requested: false,
            telemetry,
            max_logic_steps: frame.max_logic_steps_per_frame.max(1),
            frame_index: 0,
            initialized: false,
            shutdown_done: false,
        }
    }

    pub fn with_exit_signal(mut self, signal: ExitSignal) -> Self {
        self.exit_signal = signal;
        self
    }

    #[inline]
    pub fn exit_signal(&self) -> &ExitSignal {
        &self.exit_signal
    }

    #[inline]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    #[inline]
    pub fn device_name(&self) -> Option<&'static str> {
        self.device.as_ref().map(|d| d.name())
    }

    #[inline]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown_done
    }

    fn require_initialized(&self, what: &str) -> EngineResult<()> {
        if !self.initialized || self.shutdown_done {
            return Err(EngineError::other(format!("{what} called outside of a live engine")));
        }
        Ok(())
    }
}

impl<C: Clock> Engine for StandardEngine<C> {
    fn initialize(&mut self, backend: &str) -> EngineResult<()> {
        if self.initialized {
            return Err(EngineError::AlreadyInitialized);
        }

        let mut device = create_device(backend)?;
        device.create_context()?;
        log::info!("render device '{}' ready, game '{}'", device.name(), self.game.id());

        self.device = Some(device);
        self.initialized = true;

        self.game.on_start()
    }

    fn is_done(&self) -> bool {
        self.exit_requested || self.game.is_done() || self.exit_signal.is_exit_requested()
    }

    #[inline]
    fn current_ticks(&self) -> Ticks {
        self.clock.now_ticks()
    }

    fn simulate(&mut self, mut logic_ticks: Ticks, budget: FrameBudget) -> EngineResult<Ticks> {
        self.require_initialized("simulate")?;

        let now = self.clock.now_ticks();
        let mut steps: u32 = 0;

        while now > logic_ticks && steps < self.max_logic_steps {
            // Loading takes long enough to look like lag; skip the catch-up it would cause.
            if self.game.is_loading_frame() {
                logic_ticks = now;
                break;
            }

            let mut ctx = FrameContext::new(
                logic_ticks,
                budget,
                self.frame_index,
                &mut self.exit_requested,
            );
            ctx.step_in_frame = steps;
            self.game.logic(&mut ctx)?;

            logic_ticks = logic_ticks.saturating_add(budget.as_millis());
            steps += 1;
        }

        if steps == self.max_logic_steps && now > logic_ticks {
            log::debug!(
                "logic step cap ({}) reached, {}ms behind",
                self.max_logic_steps,
                now - logic_ticks
            );
        }

        self.telemetry.record_logic_steps(steps);
        Ok(logic_ticks)
    }

    fn render(&mut self, sample: Ticks, budget: FrameBudget) -> EngineResult<()> {
        self.require_initialized("render")?;
        let Some(device) = self.device.as_mut() else {
            return Err(EngineError::other("render device missing"));
        };

        device.blank_screen();

        let mut ctx = FrameContext::new(sample, budget, self.frame_index, &mut self.exit_requested);
        self.game.render(&mut ctx, &mut **device)?;

        self.telemetry.frame_tick(self.clock.now_ticks(), sample, budget);
        device.commit_frame();
        self.frame_index += 1;
        Ok(())
    }

    fn delay(&mut self, sample: Ticks, budget: FrameBudget) {
        let wait = pacing_wait(sample, self.clock.now_ticks(), budget);
        self.clock.sleep_ms(wait);
    }

    fn shutdown(&mut self) {
        if self.shutdown_done {
            return;
        }
        self.shutdown_done = true;

        if self.initialized {
            self.game.on_shutdown();
        }
        if let Some(mut device) = self.device.take() {
            device.destroy_context();
        }

        log::info!("shutdown after {} frames", self.frame_index);
    }
}
