//! Loop contract tests: drive `FrameScheduler` with a scripted engine.

use std::{
    cell::Cell,
    panic::{catch_unwind, AssertUnwindSafe},
};

use framepace_core::{
    config::FrameConfig,
    device::RenderDevice,
    frame::FrameContext,
    phase::FramePhase,
    time::{pacing_wait, Clock, ManualClock},
    Engine, EngineError, EngineResult, FrameBudget, FrameScheduler, Game, StandardEngine, Ticks,
};

#[derive(Default)]
struct Script {
    start: Ticks,
    frames_until_done: u64,
    simulate_cost: u64,
    render_cost: u64,
    fail_simulate_at: Option<u64>,
    fail_render_at: Option<u64>,
    panic_render_at: Option<u64>,
    fail_initialize: bool,
}

#[derive(Default)]
struct ScriptedEngine {
    script: Script,
    now: Cell<Ticks>,
    frames: u64,

    initialized_with: Option<String>,
    simulate_inputs: Vec<Ticks>,
    simulate_outputs: Vec<Ticks>,
    simulate_starts: Vec<Ticks>,
    render_samples: Vec<Ticks>,
    delay_samples: Vec<Ticks>,
    waits: Vec<u64>,
    budgets: Vec<FrameBudget>,
    shutdowns: u32,
    calls: Vec<&'static str>,
}

impl ScriptedEngine {
    fn new(script: Script) -> Self {
        let now = Cell::new(script.start);
        Self {
            script,
            now,
            ..Self::default()
        }
    }
}

impl Engine for ScriptedEngine {
    fn initialize(&mut self, backend: &str) -> EngineResult<()> {
        self.calls.push("initialize");
        if self.script.fail_initialize {
            return Err(EngineError::Init {
                backend: backend.to_string(),
                reason: "no such device".to_string(),
            });
        }
        self.initialized_with = Some(backend.to_string());
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.frames >= self.script.frames_until_done
    }

    fn current_ticks(&self) -> Ticks {
        self.now.get()
    }

    fn simulate(&mut self, logic_ticks: Ticks, budget: FrameBudget) -> EngineResult<Ticks> {
        self.calls.push("simulate");
        self.budgets.push(budget);
        if self.script.fail_simulate_at == Some(self.frames) {
            return Err("world fell over".into());
        }
        self.simulate_inputs.push(logic_ticks);
        self.simulate_starts.push(self.now.get());

        self.now.set(self.now.get() + self.script.simulate_cost);
        // Deliberately odd so any reinterpretation by the loop would show.
        let next = logic_ticks * 3 + 7;
        self.simulate_outputs.push(next);
        Ok(next)
    }

    fn render(&mut self, sample: Ticks, budget: FrameBudget) -> EngineResult<()> {
        self.calls.push("render");
        self.budgets.push(budget);
        if self.script.panic_render_at == Some(self.frames) {
            panic!("renderer panicked");
        }
        if self.script.fail_render_at == Some(self.frames) {
            return Err("device lost".into());
        }
        self.render_samples.push(sample);
        self.now.set(self.now.get() + self.script.render_cost);
        Ok(())
    }

    fn delay(&mut self, sample: Ticks, budget: FrameBudget) {
        self.calls.push("delay");
        self.budgets.push(budget);
        self.delay_samples.push(sample);

        let wait = pacing_wait(sample, self.now.get(), budget);
        self.waits.push(wait);
        self.now.set(self.now.get() + wait);
        self.frames += 1;
    }

    fn shutdown(&mut self) {
        self.calls.push("shutdown");
        self.shutdowns += 1;
    }
}

fn scheduler() -> FrameScheduler {
    FrameScheduler::new("headless", 60.0).unwrap()
}

// ============================================================================
// Loop contract
// ============================================================================

#[test]
fn test_calls_follow_the_loop_order() {
    let mut engine = ScriptedEngine::new(Script {
        frames_until_done: 2,
        ..Script::default()
    });

    let summary = scheduler().run(&mut engine).unwrap();

    assert_eq!(summary.frames, 2);
    assert_eq!(engine.initialized_with.as_deref(), Some("headless"));
    assert_eq!(
        engine.calls,
        vec![
            "initialize",
            "simulate",
            "render",
            "delay",
            "simulate",
            "render",
            "delay",
            "shutdown",
        ]
    );
}

#[test]
fn test_logic_clock_is_carried_forward_untouched() {
    let mut engine = ScriptedEngine::new(Script {
        start: 500,
        frames_until_done: 5,
        simulate_cost: 3,
        ..Script::default()
    });

    let summary = scheduler().run(&mut engine).unwrap();

    // first call is seeded from the time source, not from zero
    assert_eq!(engine.simulate_inputs[0], 500);
    for n in 1..engine.simulate_inputs.len() {
        assert_eq!(engine.simulate_inputs[n], engine.simulate_outputs[n - 1]);
    }
    assert_eq!(summary.logic_ticks, *engine.simulate_outputs.last().unwrap());
}

#[test]
fn test_render_and_delay_share_the_iteration_sample() {
    let mut engine = ScriptedEngine::new(Script {
        start: 1_000,
        frames_until_done: 4,
        simulate_cost: 9,
        render_cost: 2,
        ..Script::default()
    });

    scheduler().run(&mut engine).unwrap();

    assert_eq!(engine.render_samples, engine.simulate_starts);
    assert_eq!(engine.delay_samples, engine.simulate_starts);
    assert_eq!(engine.simulate_starts, vec![1_000, 1_017, 1_034, 1_051]);
}

#[test]
fn test_budget_is_fixed_for_every_call() {
    let mut engine = ScriptedEngine::new(Script {
        frames_until_done: 3,
        ..Script::default()
    });

    let summary = scheduler().run(&mut engine).unwrap();

    assert_eq!(summary.budget, FrameBudget::from_millis(17));
    assert!(engine.budgets.iter().all(|b| b.as_millis() == 17));
    assert_eq!(engine.budgets.len(), 9);
}

// ============================================================================
// Pacing
// ============================================================================

#[test]
fn test_fast_frame_waits_out_the_budget() {
    let mut engine = ScriptedEngine::new(Script {
        frames_until_done: 3,
        simulate_cost: 3,
        render_cost: 2,
        ..Script::default()
    });

    scheduler().run(&mut engine).unwrap();

    assert_eq!(engine.waits, vec![12, 12, 12]);
}

#[test]
fn test_slow_frame_does_not_wait() {
    let mut engine = ScriptedEngine::new(Script {
        frames_until_done: 3,
        simulate_cost: 15,
        render_cost: 10,
        ..Script::default()
    });

    scheduler().run(&mut engine).unwrap();

    assert_eq!(engine.waits, vec![0, 0, 0]);
    // next iteration starts as soon as the previous one ended
    assert_eq!(engine.simulate_starts, vec![0, 25, 50]);
}

#[test]
fn test_exactly_on_budget_does_not_wait() {
    let mut engine = ScriptedEngine::new(Script {
        frames_until_done: 1,
        simulate_cost: 17,
        ..Script::default()
    });

    scheduler().run(&mut engine).unwrap();

    assert_eq!(engine.waits, vec![0]);
}

// ============================================================================
// Shutdown on every exit path
// ============================================================================

#[test]
fn test_done_before_first_iteration() {
    let mut engine = ScriptedEngine::new(Script {
        frames_until_done: 0,
        ..Script::default()
    });

    let summary = scheduler().run(&mut engine).unwrap();

    assert_eq!(summary.frames, 0);
    assert!(engine.simulate_inputs.is_empty());
    assert_eq!(engine.shutdowns, 1);
    assert_eq!(engine.calls, vec!["initialize", "shutdown"]);
}

#[test]
fn test_simulate_failure_still_shuts_down() {
    let mut engine = ScriptedEngine::new(Script {
        frames_until_done: 10,
        fail_simulate_at: Some(2),
        ..Script::default()
    });

    let err = scheduler().run(&mut engine).unwrap_err();

    assert_eq!(err.phase(), Some(FramePhase::Simulate));
    assert_eq!(engine.frames, 2);
    assert_eq!(engine.shutdowns, 1);
    assert_eq!(engine.calls.last(), Some(&"shutdown"));
}

#[test]
fn test_render_failure_still_shuts_down() {
    let mut engine = ScriptedEngine::new(Script {
        frames_until_done: 10,
        fail_render_at: Some(0),
        ..Script::default()
    });

    let err = scheduler().run(&mut engine).unwrap_err();

    assert_eq!(err.phase(), Some(FramePhase::Render));
    assert!(err.to_string().contains("device lost"));
    assert_eq!(engine.shutdowns, 1);
    assert!(engine.delay_samples.is_empty());
}

#[test]
fn test_initialize_failure_enters_no_loop() {
    let mut engine = ScriptedEngine::new(Script {
        frames_until_done: 10,
        fail_initialize: true,
        ..Script::default()
    });

    let err = scheduler().run(&mut engine).unwrap_err();

    assert!(matches!(err, EngineError::Init { .. }));
    assert_eq!(engine.calls, vec!["initialize", "shutdown"]);
}

#[test]
fn test_panic_in_loop_still_shuts_down() {
    let mut engine = ScriptedEngine::new(Script {
        frames_until_done: 10,
        panic_render_at: Some(1),
        ..Script::default()
    });

    let result = catch_unwind(AssertUnwindSafe(|| scheduler().run(&mut engine)));

    assert!(result.is_err());
    assert_eq!(engine.shutdowns, 1);
}

#[test]
fn test_bad_rate_never_touches_the_engine() {
    assert!(FrameScheduler::new("headless", 0.0).is_err());

    let cfg = framepace_core::EngineConfig {
        frame: FrameConfig {
            max_frames_per_sec: -1.0,
            ..FrameConfig::default()
        },
        ..Default::default()
    };
    assert!(FrameScheduler::from_config(&cfg).is_err());
}

// ============================================================================
// End to end with the reference engine
// ============================================================================

struct Countdown {
    steps_left: u32,
}

impl Game for Countdown {
    fn id(&self) -> &'static str {
        "countdown"
    }

    fn logic(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<()> {
        self.steps_left = self.steps_left.saturating_sub(1);
        if self.steps_left == 0 {
            ctx.request_exit();
        }
        Ok(())
    }

    fn render(&mut self, _ctx: &mut FrameContext<'_>, device: &mut dyn RenderDevice) -> EngineResult<()> {
        assert_eq!(device.name(), "headless");
        Ok(())
    }
}

#[test]
fn test_standard_engine_runs_paced_frames() {
    let clock = ManualClock::new(0);
    let frame = FrameConfig {
        log_fps: false,
        ..FrameConfig::default()
    };
    let game = Countdown { steps_left: 10 };
    let mut engine = StandardEngine::new(clock.clone(), Box::new(game), &frame);

    let summary = scheduler().run(&mut engine).unwrap();

    // the first frame has nothing to catch up, every later frame runs one step
    assert_eq!(summary.frames, 11);
    assert_eq!(summary.logic_ticks, 170);
    assert_eq!(clock.now_ticks(), 11 * 17);
    assert_eq!(engine.telemetry().frames, 11);
    assert!(engine.is_shut_down());
}
