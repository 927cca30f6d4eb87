//! Rendering of fetched scores to the configured output.
//!
//! The render target is a capability: `Renderer` has a console
//! implementation and, behind the `matrix` cargo feature, an RGB panel
//! implementation. The target is chosen once at startup from the
//! configuration; matrix mode falls back to the console when the panel is
//! unavailable, so rendering never hard-fails the poll loop.

pub mod console;
#[cfg_attr(not(feature = "matrix"), allow(dead_code))]
pub mod layout;
#[cfg(feature = "matrix")]
pub mod matrix;

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{Config, DisplayMode};
use crate::models::Event;
use crate::schedule::SleepSchedule;

pub use console::ConsoleRenderer;

/// One render target. Implementations draw complete screens; pacing and
/// sleep checks stay in the driving loop.
pub trait Renderer {
    /// Show the league header screen.
    fn show_league(&mut self, league: &str, badge_path: Option<&Path>) -> Result<()>;

    /// Show one event screen.
    fn show_event(&mut self, event: &Event) -> Result<()>;

    /// Shown once when the sleep window begins.
    fn show_goodnight(&mut self) -> Result<()>;

    /// Shown once when the sleep window ends.
    fn show_goodmorning(&mut self) -> Result<()>;

    /// Blank the output (no-op on the console).
    fn blank(&mut self) -> Result<()>;
}

/// Build the renderer selected by the configuration.
///
/// Matrix mode degrades to the console renderer when the binary was built
/// without matrix support or the panel cannot be opened.
pub fn build_renderer(config: &Config) -> Box<dyn Renderer> {
    match config.display_mode {
        DisplayMode::Console => Box::new(ConsoleRenderer::new()),
        DisplayMode::Matrix => build_matrix_renderer(config),
    }
}

#[cfg(feature = "matrix")]
fn build_matrix_renderer(config: &Config) -> Box<dyn Renderer> {
    match matrix::MatrixRenderer::new(config) {
        Ok(renderer) => Box::new(renderer),
        Err(e) => {
            warn!(error = %e, "Matrix panel unavailable, falling back to console");
            Box::new(ConsoleRenderer::new())
        }
    }
}

#[cfg(not(feature = "matrix"))]
fn build_matrix_renderer(_config: &Config) -> Box<dyn Renderer> {
    warn!("Built without matrix support, falling back to console");
    Box::new(ConsoleRenderer::new())
}

/// Group events by league, preserving first-seen league order.
pub fn group_by_league(events: &[Event]) -> Vec<(&str, Vec<&Event>)> {
    let mut leagues: Vec<(&str, Vec<&Event>)> = Vec::new();
    for event in events {
        match leagues.iter_mut().find(|(name, _)| *name == event.league) {
            Some((_, bucket)) => bucket.push(event),
            None => leagues.push((event.league.as_str(), vec![event])),
        }
    }
    leagues
}

/// Display all events grouped by league, pacing each screen with the
/// configured durations. The sleep window is re-checked before every event
/// so a window starting mid-cycle halts output immediately.
pub async fn show_scores(
    renderer: &mut dyn Renderer,
    schedule: &SleepSchedule,
    config: &Config,
    events: &[Event],
) -> Result<()> {
    if events.is_empty() {
        info!("No events to display");
        return Ok(());
    }

    for (league, league_events) in group_by_league(events) {
        if schedule.is_sleep_time() {
            info!("Sleep time reached, stopping display");
            renderer.blank()?;
            return Ok(());
        }

        let badge_path = league_events
            .first()
            .and_then(|event| event.league_badge_path.as_deref());
        renderer.show_league(league, badge_path)?;
        tokio::time::sleep(config.league_display_time).await;

        for event in league_events {
            if schedule.is_sleep_time() {
                info!("Sleep time reached, stopping display");
                renderer.blank()?;
                return Ok(());
            }

            renderer.show_event(event)?;
            tokio::time::sleep(config.event_display_time).await;
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn event_in(league: &str, id: &str) -> Event {
        Event {
            id: id.to_string(),
            league: league.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_group_by_league_preserves_first_seen_order() {
        let events = vec![
            event_in("NFL", "1"),
            event_in("NBA", "2"),
            event_in("NFL", "3"),
            event_in("NHL", "4"),
        ];
        let grouped = group_by_league(&events);
        let names: Vec<&str> = grouped.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["NFL", "NBA", "NHL"]);

        let nfl_ids: Vec<&str> = grouped[0].1.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(nfl_ids, vec!["1", "3"]);
    }

    #[test]
    fn test_group_by_league_empty() {
        assert!(group_by_league(&[]).is_empty());
    }
}
