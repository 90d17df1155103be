use crate::{device::RenderDevice, error::EngineResult, frame::FrameContext};

/// Game logic hosted by `StandardEngine`.
///
/// The engine owns timing; the game only reacts to steps and render calls.
pub trait Game {
    fn id(&self) -> &'static str;

    fn on_start(&mut self) -> EngineResult<()> {
        Ok(())
    }

    /// One fixed logic step of exactly `ctx.budget`.
    fn logic(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<()>;

    fn render(&mut self, _ctx: &mut FrameContext<'_>, _device: &mut dyn RenderDevice) -> EngineResult<()> {
        Ok(())
    }

    /// True while state switching or map loading is in progress. Time spent in
    /// such frames is not caught up.
    fn is_loading_frame(&self) -> bool {
        false
    }

    fn is_done(&self) -> bool {
        false
    }

    fn on_shutdown(&mut self) {}
}
