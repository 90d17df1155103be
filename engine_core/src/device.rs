use crate::error::{EngineError, EngineResult};

/// Backend that owns the drawing surface.
///
/// Drawing itself happens in `Game::render`; the device only brackets a frame.
pub trait RenderDevice {
    fn name(&self) -> &'static str;

    fn create_context(&mut self) -> EngineResult<()>;
    fn blank_screen(&mut self);
    fn commit_frame(&mut self);
    fn destroy_context(&mut self);
}

/// Resolves a backend name to a device. The empty name selects the default.
pub fn create_device(backend: &str) -> EngineResult<Box<dyn RenderDevice>> {
    match backend.trim().to_ascii_lowercase().as_str() {
        "" | "headless" => Ok(Box::new(HeadlessDevice::new())),
        "null" => Ok(Box::new(NullDevice)),
        other => Err(EngineError::Init {
            backend: other.to_string(),
            reason: "unknown render device backend".to_string(),
        }),
    }
}

/// Offscreen device. Tracks committed frames and logs them at trace level.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    context: bool,
    frames_committed: u64,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn frames_committed(&self) -> u64 {
        self.frames_committed
    }
}

impl RenderDevice for HeadlessDevice {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn create_context(&mut self) -> EngineResult<()> {
        if self.context {
            return Err(EngineError::Init {
                backend: self.name().to_string(),
                reason: "context already created".to_string(),
            });
        }
        self.context = true;
        log::debug!("headless context created");
        Ok(())
    }

    fn blank_screen(&mut self) {}

    fn commit_frame(&mut self) {
        if !self.context {
            return;
        }
        self.frames_committed += 1;
        log::trace!("frame {} committed", self.frames_committed);
    }

    fn destroy_context(&mut self) {
        if self.context {
            self.context = false;
            log::debug!("headless context destroyed after {} frames", self.frames_committed);
        }
    }
}

#[derive(Debug, Default)]
pub struct NullDevice;

impl RenderDevice for NullDevice {
    fn name(&self) -> &'static str {
        "null"
    }

    fn create_context(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn blank_screen(&mut self) {}
    fn commit_frame(&mut self) {}
    fn destroy_context(&mut self) {}
}
