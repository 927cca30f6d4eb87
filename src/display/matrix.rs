//! RGB LED matrix renderer.
//!
//! Only compiled with the `matrix` feature, which links the panel driver
//! library; desk builds use the console renderer instead. Every screen is
//! composed on an offscreen canvas and swapped on vsync, so the panel
//! never shows a partially-drawn frame.

use std::path::{Path, PathBuf};

use anyhow::Result;
use image::imageops::FilterType;
use image::RgbImage;
use rpi_led_matrix::{LedCanvas, LedColor, LedFont, LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use tracing::debug;

use crate::config::Config;
use crate::models::Event;

use super::layout::{centered_x, fit_within, right_aligned_x, CHAR_WIDTH};
use super::Renderer;

/// Largest badge size on the league and sleep screens
const HEADER_BADGE_MAX: u32 = 28;

/// Badge size on the game screen
const GAME_BADGE_SIZE: u32 = 16;

/// Horizontal padding between a badge and its text
const BADGE_TEXT_GAP: u32 = 4;

/// Live status text wider than this overflows a 64px panel
const STATUS_MAX_CHARS: usize = 10;

const WHITE: LedColor = LedColor {
    red: 255,
    green: 255,
    blue: 255,
};
const GREEN: LedColor = LedColor {
    red: 0,
    green: 255,
    blue: 0,
};

pub struct MatrixRenderer {
    matrix: LedMatrix,
    canvas: Option<LedCanvas>,
    font: LedFont,
    /// `other/` holds the local moon/sun icons for the sleep screens
    images_dir: PathBuf,
    width: u32,
    height: u32,
}

impl MatrixRenderer {
    /// Open the panel. Fails (and the caller falls back to the console)
    /// when the driver cannot claim the hardware.
    pub fn new(config: &Config) -> Result<Self> {
        let mut options = LedMatrixOptions::new();
        options.set_rows(config.matrix.rows);
        options.set_cols(config.matrix.cols);
        options.set_chain_length(config.matrix.chain_length);
        options.set_parallel(config.matrix.parallel);
        options.set_hardware_mapping(&config.matrix.hardware_mapping);
        options
            .set_brightness(config.matrix.brightness)
            .map_err(|e| anyhow::anyhow!("Invalid brightness: {}", e))?;

        let mut runtime = LedRuntimeOptions::new();
        runtime.set_gpio_slowdown(config.matrix.gpio_slowdown);

        let matrix = LedMatrix::new(Some(options), Some(runtime))
            .map_err(|e| anyhow::anyhow!("Failed to open matrix panel: {}", e))?;
        let font = LedFont::new(&config.matrix_font)
            .map_err(|e| anyhow::anyhow!("Failed to load font: {}", e))?;

        let canvas = matrix.offscreen_canvas();
        let width = config.matrix.cols * config.matrix.chain_length;
        let height = config.matrix.rows * config.matrix.parallel;

        debug!(width, height, "Matrix panel initialized");
        Ok(Self {
            matrix,
            canvas: Some(canvas),
            font,
            images_dir: config.images_dir.clone(),
            width,
            height,
        })
    }

    fn with_canvas(&mut self, draw: impl FnOnce(&mut MatrixFrame<'_>)) {
        if let Some(mut canvas) = self.canvas.take() {
            canvas.clear();
            {
                let mut frame = MatrixFrame {
                    canvas: &mut canvas,
                    font: &self.font,
                    width: self.width,
                    height: self.height,
                };
                draw(&mut frame);
            }
            self.canvas = Some(self.matrix.swap(canvas));
        }
    }

    /// Badge on the left, text block on the right, both vertically
    /// centered. Returns the x where text should start. Shared by the
    /// league and sleep screens.
    fn badge_and_lines(&mut self, badge: Option<RgbImage>, lines: &[&str]) {
        let height = self.height;
        let width = self.width;
        self.with_canvas(|frame| {
            let text_x = match badge {
                Some(badge) => {
                    let max = HEADER_BADGE_MAX.min(height.saturating_sub(4));
                    let resized = resize_to_fit(&badge, max);
                    let x = 2;
                    let y = (height - resized.height()) / 2;
                    frame.blit(&resized, x, y);
                    x + resized.width() + BADGE_TEXT_GAP
                }
                None => match lines.len() {
                    // Single line with no badge is centered on the panel
                    1 => centered_x(lines[0], width),
                    _ => 2,
                },
            };

            match lines {
                [line] => {
                    // Single line sits on the vertical center, adjusted for
                    // the font baseline
                    frame.text(line, text_x, height / 2 + 4, &WHITE);
                }
                lines => {
                    let line_height = 8;
                    let block = line_height * lines.len() as u32;
                    let mut y = height.saturating_sub(block) / 2 + 7;
                    for line in lines {
                        frame.text(line, text_x, y, &WHITE);
                        y += line_height;
                    }
                }
            }
        });
    }

    fn load_icon(&self, name: &str) -> Option<RgbImage> {
        load_badge(&self.images_dir.join("other").join(name))
    }
}

impl Renderer for MatrixRenderer {
    fn show_league(&mut self, league: &str, badge_path: Option<&Path>) -> Result<()> {
        let badge = badge_path.and_then(load_badge);
        self.badge_and_lines(badge, &[league]);
        Ok(())
    }

    fn show_event(&mut self, event: &Event) -> Result<()> {
        let badge_one = event.team_one.badge_path.as_deref().and_then(load_badge);
        let badge_two = event.team_two.badge_path.as_deref().and_then(load_badge);

        let width = self.width;
        self.with_canvas(|frame| {
            // Team badges in the top corners
            if let Some(badge) = badge_one {
                let resized = resize_to_fit(&badge, GAME_BADGE_SIZE);
                frame.blit(&resized, 2, 1);
            }
            if let Some(badge) = badge_two {
                let resized = resize_to_fit(&badge, GAME_BADGE_SIZE);
                frame.blit(&resized, right_aligned_x(resized.width(), width, 2), 1);
            }

            let y_text = 24;
            let y_status = 31;

            let last_line = if event.is_scheduled() {
                // Date on the score line, start time on the bottom line
                let date = event.formatted_date();
                frame.text(&date, centered_x(&date, width), y_text, &WHITE);
                event.time.clone()
            } else {
                let score_one = event.team_one.score.to_string();
                let score_two = event.team_two.score.to_string();
                let full = format!("{} - {}", score_one, score_two);

                let start_x = centered_x(&full, width);
                let dash_x = start_x + score_one.chars().count() as u32 * CHAR_WIDTH;
                let score_two_x = dash_x + 3 * CHAR_WIDTH;

                frame.text(&score_one, start_x, y_text, &GREEN);
                frame.text(" - ", dash_x, y_text, &WHITE);
                frame.text(&score_two, score_two_x, y_text, &GREEN);

                if event.is_final() {
                    event.winner_text()
                } else {
                    event.status.chars().take(STATUS_MAX_CHARS).collect()
                }
            };

            frame.text(&last_line, centered_x(&last_line, width), y_status, &WHITE);
        });
        Ok(())
    }

    fn show_goodnight(&mut self) -> Result<()> {
        let moon = self.load_icon("moon.png");
        self.badge_and_lines(moon, &["Good", "Night!"]);
        Ok(())
    }

    fn show_goodmorning(&mut self) -> Result<()> {
        let sun = self.load_icon("sun.png");
        self.badge_and_lines(sun, &["Hello!"]);
        Ok(())
    }

    fn blank(&mut self) -> Result<()> {
        self.with_canvas(|_| {});
        Ok(())
    }
}

/// One screen being composed. Wraps the raw canvas with the panel
/// dimensions and font so drawing code stays short.
struct MatrixFrame<'a> {
    canvas: &'a mut LedCanvas,
    font: &'a LedFont,
    width: u32,
    height: u32,
}

impl MatrixFrame<'_> {
    fn text(&mut self, text: &str, x: u32, y: u32, color: &LedColor) {
        self.canvas
            .draw_text(self.font, text, x as i32, y as i32, color, 0, false);
    }

    fn blit(&mut self, badge: &RgbImage, x: u32, y: u32) {
        for (px, py, pixel) in badge.enumerate_pixels() {
            let dx = x + px;
            let dy = y + py;
            if dx < self.width && dy < self.height {
                let [red, green, blue] = pixel.0;
                self.canvas.set(dx as i32, dy as i32, &LedColor { red, green, blue });
            }
        }
    }
}

fn load_badge(path: &Path) -> Option<RgbImage> {
    match image::open(path) {
        Ok(loaded) => Some(loaded.to_rgb8()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Could not load badge image");
            None
        }
    }
}

fn resize_to_fit(badge: &RgbImage, max_size: u32) -> RgbImage {
    let (width, height) = fit_within(badge.width(), badge.height(), max_size);
    image::imageops::resize(badge, width, height, FilterType::Lanczos3)
}
