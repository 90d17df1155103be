use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, time::FrameBudget};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

impl EngineConfig {
    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: "<inline>".into(),
            source,
        })
    }

    /// Checks everything that must hold before the engine is touched.
    pub fn validate(&self) -> Result<FrameBudget, ConfigError> {
        if self.device.backend.trim().is_empty() {
            return Err(ConfigError::EmptyBackend);
        }
        if self.frame.max_logic_steps_per_frame == 0 {
            return Err(ConfigError::ZeroStepCap);
        }
        self.frame.budget()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// "headless" or "null"
    #[serde(default = "default_backend")]
    pub backend: String,
}

fn default_backend() -> String { "headless".to_string() }

impl Default for DeviceConfig {
    fn default() -> Self {
        Self { backend: default_backend() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    #[serde(default = "default_max_fps")]
    pub max_frames_per_sec: f64,
    /// Upper bound on catch-up logic steps run inside one `simulate` call.
    #[serde(default = "default_max_logic_steps")]
    pub max_logic_steps_per_frame: u32,
    #[serde(default = "default_log_fps")]
    pub log_fps: bool,
    #[serde(default = "default_fps_period_ms")]
    pub fps_log_period_ms: u32,
}

fn default_max_fps() -> f64 { 60.0 }
fn default_max_logic_steps() -> u32 { 60 }
fn default_log_fps() -> bool { true }
fn default_fps_period_ms() -> u32 { 1000 }

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frames_per_sec: default_max_fps(),
            max_logic_steps_per_frame: default_max_logic_steps(),
            log_fps: default_log_fps(),
            fps_log_period_ms: default_fps_period_ms(),
        }
    }
}

impl FrameConfig {
    #[inline]
    pub fn budget(&self) -> Result<FrameBudget, ConfigError> {
        FrameBudget::from_rate(self.max_frames_per_sec)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Simulated seconds before the demo game reports done. 0 runs until Ctrl-C.
    #[serde(default = "default_run_seconds")]
    pub run_seconds: u32,
}

fn default_run_seconds() -> u32 { 5 }

impl Default for DemoConfig {
    fn default() -> Self {
        Self { run_seconds: default_run_seconds() }
    }
}
