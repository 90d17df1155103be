/// Stage of a loop iteration, used to attribute runtime failures.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FramePhase {
    Simulate,
    Render,
}

impl FramePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            FramePhase::Simulate => "Simulate",
            FramePhase::Render => "Render",
        }
    }
}

impl std::fmt::Display for FramePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
