use framepace_core::{device::RenderDevice, frame::FrameContext, EngineResult, Game, Ticks};

/// Ball bouncing between two walls, integrated once per logic step.
pub struct BouncingBall {
    run_ms: u64,
    first_tick: Option<Ticks>,
    simulated_ms: u64,

    pos: f32,
    vel: f32,
    bounces: u32,
    last_report: u64,
}

const WALL: f32 = 10.0;
const SPEED: f32 = 7.5;

impl BouncingBall {
    /// `run_seconds == 0` keeps the ball going until interrupted.
    pub fn new(run_seconds: u32) -> Self {
        Self {
            run_ms: u64::from(run_seconds) * 1000,
            first_tick: None,
            simulated_ms: 0,
            pos: 0.0,
            vel: SPEED,
            bounces: 0,
            last_report: 0,
        }
    }
}

impl Game for BouncingBall {
    fn id(&self) -> &'static str {
        "bouncing-ball"
    }

    fn on_start(&mut self) -> EngineResult<()> {
        log::info!("bouncing ball started, running for {}ms of game time", self.run_ms);
        Ok(())
    }

    fn logic(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<()> {
        let first = *self.first_tick.get_or_insert(ctx.logic_ticks);
        let dt = ctx.budget.as_millis() as f32 / 1000.0;

        self.pos += self.vel * dt;
        if self.pos.abs() > WALL {
            self.pos = self.pos.clamp(-WALL, WALL);
            self.vel = -self.vel;
            self.bounces += 1;
        }

        self.simulated_ms = ctx.logic_ticks + ctx.budget.as_millis() - first;
        if self.run_ms > 0 && self.simulated_ms >= self.run_ms {
            ctx.request_exit();
        }
        Ok(())
    }

    fn render(&mut self, ctx: &mut FrameContext<'_>, device: &mut dyn RenderDevice) -> EngineResult<()> {
        let second = self.simulated_ms / 1000;
        if second != self.last_report {
            self.last_report = second;
            log::debug!(
                "[{}] frame {} pos={:+.2} bounces={}",
                device.name(),
                ctx.frame_index,
                self.pos,
                self.bounces
            );
        }
        Ok(())
    }

    fn on_shutdown(&mut self) {
        log::info!(
            "bouncing ball stopped after {}ms of game time, {} bounces",
            self.simulated_ms,
            self.bounces
        );
    }
}
