use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::error::{EngineError, EngineResult};

/// Process-wide "please stop" flag, settable from any thread.
///
/// The loop only sees it through `Engine::is_done`, at iteration boundaries.
#[derive(Clone, Debug, Default)]
pub struct ExitSignal {
    flag: Arc<AtomicBool>,
}

impl ExitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn request_exit(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_exit_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Routes Ctrl-C into this signal. Only one handler may be installed per process.
    pub fn install_ctrlc_handler(&self) -> EngineResult<()> {
        let s = self.clone();
        ctrlc::set_handler(move || {
            log::info!("interrupt received, finishing current frame");
            s.request_exit();
        })
        .map_err(|e| EngineError::other(format!("failed to install Ctrl-C handler: {e}")))
    }
}
