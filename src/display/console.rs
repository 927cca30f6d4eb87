//! Console renderer, used for testing on a desk and as the fallback when
//! no panel is available. Output goes to stdout; logging stays on stderr.

use std::path::Path;

use anyhow::Result;

use crate::models::Event;

use super::Renderer;

pub struct ConsoleRenderer;

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for ConsoleRenderer {
    fn show_league(&mut self, league: &str, badge_path: Option<&Path>) -> Result<()> {
        println!("\n{}", "=".repeat(60));
        println!("LEAGUE: {}", league);
        if let Some(path) = badge_path {
            println!("Badge: {}", path.display());
        }
        println!("{}", "=".repeat(60));
        Ok(())
    }

    fn show_event(&mut self, event: &Event) -> Result<()> {
        println!("\n{}", "-".repeat(60));
        println!(
            "{} vs {}",
            event.team_one.full_name(),
            event.team_two.full_name()
        );
        println!("Status: {}", event.status);
        if event.is_final() {
            println!(
                "Score: {} - {} ({})",
                event.team_one.score,
                event.team_two.score,
                event.winner_text()
            );
        } else {
            println!("Score: {} - {}", event.team_one.score, event.team_two.score);
        }
        println!("Date/Time: {} at {}", event.date, event.time);

        if let Some(path) = &event.team_one.badge_path {
            println!("Team 1 Badge: {}", path.display());
        }
        if let Some(path) = &event.team_two.badge_path {
            println!("Team 2 Badge: {}", path.display());
        }
        println!("{}", "-".repeat(60));
        Ok(())
    }

    fn show_goodnight(&mut self) -> Result<()> {
        println!("\nGoodnight!");
        Ok(())
    }

    fn show_goodmorning(&mut self) -> Result<()> {
        println!("\nGood morning!");
        Ok(())
    }

    fn blank(&mut self) -> Result<()> {
        Ok(())
    }
}
