//! Sports score display for an RGB LED matrix panel.
//!
//! Polls a score API on a fixed interval, caches badge images locally,
//! and renders league-by-league score screens to the configured output,
//! going dark during the nightly sleep window.

mod api;
mod cache;
mod config;
mod display;
mod models;
mod schedule;

use std::io;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::ScoreClient;
use cache::ImageCache;
use config::Config;
use display::Renderer;
use schedule::SleepSchedule;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// Every network call is blocking for the whole loop, so it must be bounded.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// How long the goodnight/goodmorning screens stay up (seconds)
const SLEEP_SCREEN_HOLD_SECS: u64 = 15;

/// Initialize the tracing subscriber for logging.
/// Rendered output goes to stdout; logs stay on stderr.
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g. RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::from_env()?;
    info!(mode = ?config.display_mode, "Starting sports score display");

    let http = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;
    let images = ImageCache::new(config.images_dir.clone(), http.clone());
    let scores = ScoreClient::new(&config, http);
    let schedule = SleepSchedule::from_config(&config);
    let mut renderer = display::build_renderer(&config);

    let result = tokio::select! {
        result = run(&config, &scores, &images, &schedule, renderer.as_mut()) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            Ok(())
        }
    };

    // Leave the panel dark whichever way the loop ended
    if let Err(e) = renderer.blank() {
        warn!(error = %e, "Failed to blank display on shutdown");
    }

    info!("Sports score display stopped");
    result
}

/// The poll/sleep/wake loop. Fetch failures and display errors degrade to
/// a retry wait; only an external interrupt stops the process.
async fn run(
    config: &Config,
    scores: &ScoreClient,
    images: &ImageCache,
    schedule: &SleepSchedule,
    renderer: &mut dyn Renderer,
) -> Result<()> {
    loop {
        if schedule.is_sleep_time() {
            sleep_until_wake(schedule, renderer).await;
            continue;
        }

        info!("Fetching latest scores");
        match scores.fetch_scores(images).await {
            Ok(data) if data.events.is_empty() => {
                info!("No events to display, waiting before next poll");
                tokio::time::sleep(config.try_again_interval).await;
            }
            Ok(data) => {
                if let Err(e) =
                    display::show_scores(renderer, schedule, config, &data.events).await
                {
                    warn!(error = %e, "Display cycle failed, retrying after interval");
                    tokio::time::sleep(config.try_again_interval).await;
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch scores, retrying after interval");
                tokio::time::sleep(config.try_again_interval).await;
            }
        }
    }
}

/// Show the goodnight screen, stay dark for the rest of the window, then
/// greet the morning. No fetches happen while sleeping.
async fn sleep_until_wake(schedule: &SleepSchedule, renderer: &mut dyn Renderer) {
    let total = schedule.seconds_until_wake();
    info!(
        hours = total / 3600,
        minutes = (total % 3600) / 60,
        "Sleep mode - display off until wake time"
    );

    if let Err(e) = renderer.show_goodnight() {
        warn!(error = %e, "Failed to show goodnight screen");
    }
    let hold = SLEEP_SCREEN_HOLD_SECS.min(total);
    tokio::time::sleep(Duration::from_secs(hold)).await;
    if let Err(e) = renderer.blank() {
        warn!(error = %e, "Failed to blank display for sleep");
    }
    tokio::time::sleep(Duration::from_secs(total.saturating_sub(hold))).await;

    info!("Wake time - resuming display");
    if let Err(e) = renderer.show_goodmorning() {
        warn!(error = %e, "Failed to show goodmorning screen");
    }
    tokio::time::sleep(Duration::from_secs(SLEEP_SCREEN_HOLD_SECS)).await;
}
