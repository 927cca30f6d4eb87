//! Application configuration management.
//!
//! All settings come from the environment (a `.env` file is loaded in
//! `main` before this module runs). The configuration is read once at
//! startup into an immutable `Config` value that is passed explicitly to
//! the fetch, cache, and display components.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use tracing::warn;

/// Default display time for the league header screen (seconds)
const DEFAULT_LEAGUE_DISPLAY_SECS: u64 = 60;

/// Default display time for each event screen (seconds)
const DEFAULT_EVENT_DISPLAY_SECS: u64 = 60;

/// Default wait before retrying a failed fetch (seconds)
const DEFAULT_TRY_AGAIN_SECS: u64 = 120;

/// Default timezone for the sleep schedule.
/// DST transitions are handled by timezone-aware arithmetic.
const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

const DEFAULT_SLEEP_START: &str = "23:00";
const DEFAULT_SLEEP_END: &str = "07:00";

const DEFAULT_IMAGES_DIR: &str = "assets/images";
const DEFAULT_MATRIX_FONT: &str = "assets/fonts/5x7.bdf";

/// Which render target to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Console,
    Matrix,
}

impl DisplayMode {
    fn from_env_value(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "matrix" => DisplayMode::Matrix,
            "console" => DisplayMode::Console,
            other => {
                warn!(mode = other, "Unknown DISPLAY_MODE, falling back to console");
                DisplayMode::Console
            }
        }
    }
}

/// Physical panel geometry and driver parameters, matrix mode only.
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "matrix"), allow(dead_code))]
pub struct MatrixConfig {
    pub brightness: u8,
    pub rows: u32,
    pub cols: u32,
    pub chain_length: u32,
    pub parallel: u32,
    pub hardware_mapping: String,
    pub gpio_slowdown: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Score API endpoint. Absent here is tolerated; the fetcher reports
    /// it as a configuration error on each attempt.
    pub api_url: Option<String>,
    pub display_mode: DisplayMode,
    pub league_display_time: Duration,
    pub event_display_time: Duration,
    pub try_again_interval: Duration,
    pub timezone: Tz,
    pub sleep_start: NaiveTime,
    pub sleep_end: NaiveTime,
    /// Root of the badge image cache (`teams/`, `leagues/`, `other/`)
    pub images_dir: PathBuf,
    /// BDF font used by the matrix renderer
    #[cfg_attr(not(feature = "matrix"), allow(dead_code))]
    pub matrix_font: PathBuf,
    pub matrix: MatrixConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: env_var("API_URL"),
            display_mode: env_var("DISPLAY_MODE")
                .map(|v| DisplayMode::from_env_value(&v))
                .unwrap_or(DisplayMode::Console),
            league_display_time: Duration::from_secs(env_parse(
                "LEAGUE_DISPLAY_TIME",
                DEFAULT_LEAGUE_DISPLAY_SECS,
            )?),
            event_display_time: Duration::from_secs(env_parse(
                "EVENT_DISPLAY_TIME",
                DEFAULT_EVENT_DISPLAY_SECS,
            )?),
            try_again_interval: Duration::from_secs(env_parse(
                "TRY_AGAIN_INTERVAL",
                DEFAULT_TRY_AGAIN_SECS,
            )?),
            timezone: env_var("TIMEZONE")
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("Invalid TIMEZONE: {}", e))?,
            sleep_start: parse_military_time(
                &env_var("SLEEP_START_TIME").unwrap_or_else(|| DEFAULT_SLEEP_START.to_string()),
            )
            .context("Invalid SLEEP_START_TIME")?,
            sleep_end: parse_military_time(
                &env_var("SLEEP_END_TIME").unwrap_or_else(|| DEFAULT_SLEEP_END.to_string()),
            )
            .context("Invalid SLEEP_END_TIME")?,
            images_dir: env_var("IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_DIR)),
            matrix_font: env_var("MATRIX_FONT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MATRIX_FONT)),
            matrix: MatrixConfig {
                brightness: env_parse("DISPLAY_BRIGHTNESS", 70)?,
                rows: env_parse("MATRIX_ROWS", 32)?,
                cols: env_parse("MATRIX_COLS", 64)?,
                chain_length: env_parse("MATRIX_CHAIN_LENGTH", 1)?,
                parallel: env_parse("MATRIX_PARALLEL", 1)?,
                hardware_mapping: env_var("MATRIX_HARDWARE_MAPPING")
                    .unwrap_or_else(|| "adafruit-hat-pwm".to_string()),
                gpio_slowdown: env_parse("MATRIX_GPIO_SLOWDOWN", 2)?,
            },
        })
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse an environment variable, falling back to a default when unset.
fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(name) {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", name, e)),
        None => Ok(default),
    }
}

/// Parse a 24-hour "HH:MM" time string.
pub fn parse_military_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .with_context(|| format!("Expected HH:MM, got {:?}", value))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_military_time() {
        let t = parse_military_time("23:00").unwrap();
        assert_eq!((t.hour(), t.minute()), (23, 0));

        let t = parse_military_time("07:30").unwrap();
        assert_eq!((t.hour(), t.minute()), (7, 30));
    }

    #[test]
    fn test_parse_military_time_rejects_garbage() {
        assert!(parse_military_time("25:00").is_err());
        assert!(parse_military_time("noon").is_err());
        assert!(parse_military_time("").is_err());
    }

    #[test]
    fn test_display_mode_fallback() {
        assert_eq!(DisplayMode::from_env_value("matrix"), DisplayMode::Matrix);
        assert_eq!(DisplayMode::from_env_value("MATRIX"), DisplayMode::Matrix);
        assert_eq!(DisplayMode::from_env_value("console"), DisplayMode::Console);
        assert_eq!(DisplayMode::from_env_value("hologram"), DisplayMode::Console);
    }
}
