use crate::time::{FrameBudget, Ticks};

/// What a game sees during one logic step or one render.
pub struct FrameContext<'a> {
    /// Logic clock value at the start of this step.
    pub logic_ticks: Ticks,
    pub budget: FrameBudget,
    /// 0-based index of the logic step within the current `simulate` call.
    pub step_in_frame: u32,
    /// Completed render frames so far.
    pub frame_index: u64,
    pub(crate) exit_requested: &'a mut bool,
}

impl<'a> FrameContext<'a> {
    #[inline]
    pub fn new(
        logic_ticks: Ticks,
        budget: FrameBudget,
        frame_index: u64,
        exit_requested: &'a mut bool,
    ) -> Self {
        Self {
            logic_ticks,
            budget,
            step_in_frame: 0,
            frame_index,
            exit_requested,
        }
    }

    /// Asks the engine to report done at the next iteration boundary.
    #[inline]
    pub fn request_exit(&mut self) {
        *self.exit_requested = true;
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        *self.exit_requested
    }
}
