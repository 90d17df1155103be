use std::{
    io::Write,
    sync::OnceLock,
    time::{Duration, Instant},
};

use env_logger::{Builder, WriteStyle};
use log::LevelFilter;

use crate::error::{EngineError, EngineResult};

static BOOT: OnceLock<Instant> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: LevelFilter,
    pub colors: bool,
}

impl LoggerConfig {
    pub fn from_env() -> Self {
        let level = std::env::var("FRAMEPACE_LOG")
            .ok()
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let colors = std::env::var("FRAMEPACE_LOG_COLORS")
            .ok()
            .map(|v| v != "0")
            .unwrap_or(true);

        Self { level, colors }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Installs the process logger. Lines look like `[+mm:ss.mmm] [LEVEL] target message`.
pub fn init_logger(config: &LoggerConfig) -> EngineResult<()> {
    // Single reference point for the whole process.
    BOOT.get_or_init(Instant::now);

    let mut builder = Builder::new();
    builder.filter_level(config.level);
    builder.write_style(if config.colors {
        WriteStyle::Auto
    } else {
        WriteStyle::Never
    });

    builder.format(|buf, record| {
        let boot = *BOOT.get_or_init(Instant::now);
        let level_style = buf.default_level_style(record.level());
        writeln!(
            buf,
            "[{}] {level_style}[{:<5}]{level_style:#} {} {}",
            fmt_uptime(boot.elapsed()),
            record.level(),
            record.target(),
            record.args()
        )
    });

    builder
        .try_init()
        .map_err(|e| EngineError::other(format!("logger init failed: {e}")))
}

/// mm:ss.mmm, or hh:mm:ss.mmm past the first hour
fn fmt_uptime(d: Duration) -> String {
    let total_ms = d.as_millis() as u64;

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    let s = total_s % 60;
    let total_m = total_s / 60;

    let m = total_m % 60;
    let h = total_m / 60;

    if h > 0 {
        format!("+{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
    } else {
        format!("+{:02}:{:02}.{:03}", m, s, ms)
    }
}
