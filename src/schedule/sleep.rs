use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::Config;

/// Fallback wake delay if no valid wake instant can be constructed.
/// Only reachable at the far edge of the calendar; keeps the loop from
/// spinning if it ever happens.
const FALLBACK_WAKE_SECS: u64 = 3600;

/// A daily sleep window with timezone-aware evaluation.
///
/// Windows may wrap midnight (23:00 to 07:00) or stay within one day
/// (14:00 to 16:00).
#[derive(Debug, Clone)]
pub struct SleepSchedule {
    start: NaiveTime,
    end: NaiveTime,
    tz: Tz,
}

impl SleepSchedule {
    pub fn new(start: NaiveTime, end: NaiveTime, tz: Tz) -> Self {
        Self { start, end, tz }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sleep_start, config.sleep_end, config.timezone)
    }

    /// True if the display should currently be sleeping.
    pub fn is_sleep_time(&self) -> bool {
        self.is_sleep_time_at(self.now())
    }

    /// Seconds until the next wake instant, never negative.
    pub fn seconds_until_wake(&self) -> u64 {
        self.seconds_until_wake_at(self.now())
    }

    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    pub fn is_sleep_time_at(&self, now: DateTime<Tz>) -> bool {
        let current = now.time();
        if self.start > self.end {
            // Overnight window, e.g. 23:00 to 07:00
            current >= self.start || current < self.end
        } else {
            // Same-day window, e.g. 14:00 to 16:00
            self.start <= current && current < self.end
        }
    }

    /// Whole seconds from `now` to the next wall-clock instant matching the
    /// window's end time. If today's end time is not strictly in the future
    /// (or falls into a DST gap), the next day's is used.
    pub fn seconds_until_wake_at(&self, now: DateTime<Tz>) -> u64 {
        for days_ahead in 0..3 {
            let Some(date) = now.date_naive().checked_add_days(Days::new(days_ahead)) else {
                break;
            };
            // A DST gap can make the local end time nonexistent for a day;
            // an ambiguous time resolves to its earlier occurrence.
            let Some(wake) = self.tz.from_local_datetime(&date.and_time(self.end)).earliest()
            else {
                continue;
            };
            if wake > now {
                return (wake - now).num_seconds().max(0) as u64;
            }
        }
        FALLBACK_WAKE_SECS
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Los_Angeles;

    fn hhmm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Tz> {
        Los_Angeles.with_ymd_and_hms(2025, 12, 7, h, m, 0).unwrap()
    }

    fn overnight() -> SleepSchedule {
        SleepSchedule::new(hhmm(23, 0), hhmm(7, 0), Los_Angeles)
    }

    #[test]
    fn test_overnight_window() {
        let schedule = overnight();
        assert!(schedule.is_sleep_time_at(at(23, 30)));
        assert!(schedule.is_sleep_time_at(at(6, 30)));
        assert!(!schedule.is_sleep_time_at(at(12, 0)));
        // Boundaries: start inclusive, end exclusive
        assert!(schedule.is_sleep_time_at(at(23, 0)));
        assert!(!schedule.is_sleep_time_at(at(7, 0)));
    }

    #[test]
    fn test_same_day_window() {
        let schedule = SleepSchedule::new(hhmm(14, 0), hhmm(16, 0), Los_Angeles);
        assert!(schedule.is_sleep_time_at(at(15, 0)));
        assert!(!schedule.is_sleep_time_at(at(17, 0)));
        assert!(!schedule.is_sleep_time_at(at(13, 59)));
    }

    #[test]
    fn test_wake_countdown_overnight() {
        let schedule = overnight();
        // 23:30 -> 07:00 next day is 7.5 hours
        assert_eq!(schedule.seconds_until_wake_at(at(23, 30)), 7 * 3600 + 1800);
        // 06:30 -> 07:00 same day is 30 minutes
        assert_eq!(schedule.seconds_until_wake_at(at(6, 30)), 1800);
    }

    #[test]
    fn test_wake_countdown_never_negative_and_monotonic() {
        let schedule = overnight();
        let now = at(6, 30);
        let later = now + chrono::Duration::seconds(1);
        let first = schedule.seconds_until_wake_at(now);
        let second = schedule.seconds_until_wake_at(later);
        assert_eq!(first - 1, second);
    }

    #[test]
    fn test_wake_exactly_at_end_rolls_to_next_day() {
        let schedule = overnight();
        // At exactly 07:00 the wake instant is tomorrow's 07:00
        assert_eq!(schedule.seconds_until_wake_at(at(7, 0)), 24 * 3600);
    }

    #[test]
    fn test_wake_countdown_across_dst_fall_back() {
        // 2025-11-02 02:00 PST: clocks fall back, the night is 25 hours
        let schedule = overnight();
        let now = Los_Angeles.with_ymd_and_hms(2025, 11, 1, 23, 30, 0).unwrap();
        let seconds = schedule.seconds_until_wake_at(now);
        assert_eq!(seconds, 8 * 3600 + 1800);
    }
}
