//! Client for fetching scores from the upstream sports API.
//!
//! The API exposes a single GET endpoint returning a JSON `events` array.
//! Each fetch produces a fresh `SportsData`; badge images referenced by the
//! payload are resolved through the local image cache as a best effort.

use chrono::{Days, Local, NaiveDate};
use reqwest::Client;
use tracing::{debug, info};

use crate::cache::ImageCache;
use crate::config::Config;
use crate::models::{Event, SportsData};

use super::ApiError;

/// Events further out than this are not worth panel time yet.
const MAX_DAYS_AHEAD: u64 = 7;

/// Cache subdirectories for the two badge kinds
const TEAMS_SUBDIR: &str = "teams";
const LEAGUES_SUBDIR: &str = "leagues";

/// Client for the score API.
pub struct ScoreClient {
    client: Client,
    api_url: Option<String>,
}

impl ScoreClient {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
        }
    }

    /// Fetch the current scoreboard.
    ///
    /// Returns an error without touching the network when no API URL is
    /// configured. A malformed response is an error as a whole; this never
    /// returns partially-populated data. Retry policy belongs to the caller.
    pub async fn fetch_scores(&self, images: &ImageCache) -> Result<SportsData, ApiError> {
        let url = self.api_url.as_deref().ok_or(ApiError::NotConfigured)?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body = response.text().await?;
        let mut data = parse_body(&body)?;

        let today = Local::now().date_naive();
        data.events.retain(|event| {
            let keep = within_display_horizon(event, today);
            if !keep {
                debug!(
                    id = %event.id,
                    date = %event.date,
                    "Skipping event more than a week away"
                );
            }
            keep
        });

        for event in &mut data.events {
            self.resolve_badges(event, images).await;
        }

        info!(events = data.events.len(), "Fetched scoreboard");
        Ok(data)
    }

    /// Pull team and league badges through the cache. Best effort: a badge
    /// that cannot be fetched leaves its path unset and the event intact.
    async fn resolve_badges(&self, event: &mut Event, images: &ImageCache) {
        event.team_one.badge_path = images
            .get_or_download(&event.team_one.badge, TEAMS_SUBDIR)
            .await;
        event.team_two.badge_path = images
            .get_or_download(&event.team_two.badge, TEAMS_SUBDIR)
            .await;
        event.league_badge_path = images
            .get_or_download(&event.league_badge, LEAGUES_SUBDIR)
            .await;
    }
}

/// Parse a response body into `SportsData`. A body that is not valid JSON
/// or not the expected shape is rejected as a whole.
fn parse_body(body: &str) -> Result<SportsData, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// An event is displayable if its date is within a week of `today`.
/// Events with unparsable dates are kept (fail open).
fn within_display_horizon(event: &Event, today: NaiveDate) -> bool {
    match event.parsed_date() {
        Some(date) => match today.checked_add_days(Days::new(MAX_DAYS_AHEAD)) {
            Some(horizon) => date <= horizon,
            None => true,
        },
        None => true,
    }
}

// ============================================================================
// Tests
// ============================================================================
