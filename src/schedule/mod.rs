//! Nightly sleep schedule for the display.
//!
//! The display is suspended inside a configured daily window, evaluated
//! against the wall clock of the configured IANA timezone so daylight
//! saving transitions need no special handling here.

pub mod sleep;

pub use sleep::SleepSchedule;
