use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use super::Team;

/// Date format used by the API, e.g. "Dec 7 2025"
pub const EVENT_DATE_FORMAT: &str = "%b %d %Y";

/// Event lifecycle state reported by the API.
/// Anything outside the known set collapses to `Other` rather than failing
/// the parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum StatusType {
    #[serde(rename = "STATUS_SCHEDULED")]
    Scheduled,
    #[serde(rename = "STATUS_IN_PROGRESS")]
    InProgress,
    #[serde(rename = "STATUS_FINAL")]
    Final,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: String,
    /// Raw date string from the API ("Dec 7 2025")
    #[serde(default)]
    pub date: String,
    /// Raw local start time string from the API ("7:30 PM")
    #[serde(default)]
    pub time: String,
    /// Human-readable status text ("Final", "10:00 - 1st Quarter")
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub status_type: StatusType,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub league_badge: String,
    #[serde(default)]
    pub team_one: Team,
    #[serde(default)]
    pub team_two: Team,
    /// Local cache path for the league badge, filled in after download
    #[serde(skip)]
    pub league_badge_path: Option<PathBuf>,
}

#[allow(dead_code)] // Status helpers - each render target uses a subset
impl Event {
    pub fn is_scheduled(&self) -> bool {
        self.status_type == StatusType::Scheduled
    }

    pub fn is_in_progress(&self) -> bool {
        self.status_type == StatusType::InProgress
    }

    pub fn is_final(&self) -> bool {
        self.status_type == StatusType::Final
    }

    /// The event date, if the API string parses.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), EVENT_DATE_FORMAT).ok()
    }

    /// Compact date for small screens: "Dec 7".
    /// Falls back to the raw string when the date does not parse.
    pub fn formatted_date(&self) -> String {
        match self.parsed_date() {
            Some(date) => date.format("%b %-d").to_string(),
            None => self.date.clone(),
        }
    }

    /// One-line result summary using team short names: "Bears win!" or "Tie!"
    pub fn winner_text(&self) -> String {
        if self.team_one.score > self.team_two.score {
            format!("{} win!", self.team_one.name)
        } else if self.team_two.score > self.team_one.score {
            format!("{} win!", self.team_two.name)
        } else {
            "Tie!".to_string()
        }
    }
}

/// All events from one fetch cycle, in API order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SportsData {
    #[serde(default)]
    pub events: Vec<Event>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_scores(one: i64, two: i64) -> Event {
        Event {
            team_one: Team {
                name: "Bears".to_string(),
                score: one,
                ..Default::default()
            },
            team_two: Team {
                name: "Packers".to_string(),
                score: two,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_winner_text_team_one_wins() {
        assert_eq!(event_with_scores(3, 1).winner_text(), "Bears win!");
    }

    #[test]
    fn test_winner_text_team_two_wins() {
        assert_eq!(event_with_scores(10, 24).winner_text(), "Packers win!");
    }

    #[test]
    fn test_winner_text_tie() {
        assert_eq!(event_with_scores(2, 2).winner_text(), "Tie!");
    }

    #[test]
    fn test_status_type_from_wire() {
        let event: Event =
            serde_json::from_str(r#"{"status_type": "STATUS_IN_PROGRESS"}"#).unwrap();
        assert!(event.is_in_progress());

        let event: Event = serde_json::from_str(r#"{"status_type": "STATUS_FINAL"}"#).unwrap();
        assert!(event.is_final());

        // Unknown status strings collapse to Other instead of failing
        let event: Event =
            serde_json::from_str(r#"{"status_type": "STATUS_RAIN_DELAY"}"#).unwrap();
        assert_eq!(event.status_type, StatusType::Other);
        assert!(!event.is_scheduled() && !event.is_in_progress() && !event.is_final());
    }

    #[test]
    fn test_parsed_date() {
        let event = Event {
            date: "Dec 7 2025".to_string(),
            ..Default::default()
        };
        assert_eq!(
            event.parsed_date(),
            NaiveDate::from_ymd_opt(2025, 12, 7)
        );
        assert_eq!(event.formatted_date(), "Dec 7");
    }

    #[test]
    fn test_formatted_date_falls_back_to_raw() {
        let event = Event {
            date: "someday".to_string(),
            ..Default::default()
        };
        assert!(event.parsed_date().is_none());
        assert_eq!(event.formatted_date(), "someday");
    }

    #[test]
    fn test_sports_data_from_wire() {
        let json = r#"{
            "events": [{
                "id": "401",
                "date": "Dec 7 2025",
                "time": "7:30 PM",
                "status": "Final",
                "status_type": "STATUS_FINAL",
                "league": "NFL",
                "league_badge": "https://cdn.example.com/nfl.png",
                "team_one": {"id": "1", "badge": "", "location": "Chicago", "name": "Bears", "score": 20},
                "team_two": {"id": "2", "badge": "", "location": "Green Bay", "name": "Packers", "score": 17}
            }]
        }"#;
        let data: SportsData = serde_json::from_str(json).unwrap();
        assert_eq!(data.events.len(), 1);
        let event = &data.events[0];
        assert_eq!(event.league, "NFL");
        assert_eq!(event.team_one.full_name(), "Chicago Bears");
        assert_eq!(event.winner_text(), "Bears win!");
    }
}
