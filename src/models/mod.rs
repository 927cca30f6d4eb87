//! Data models for sports scores.
//!
//! Everything here is an immutable value record built fresh on each fetch
//! cycle and discarded after rendering:
//!
//! - `Team`: one side of a matchup, with its cached badge path
//! - `Event`, `StatusType`: one game and its lifecycle state
//! - `SportsData`: all events returned by a single fetch

pub mod event;
pub mod team;

pub use event::{Event, SportsData, StatusType};
pub use team::Team;
