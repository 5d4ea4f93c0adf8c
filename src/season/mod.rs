//! Season numbering.
//!
//! A season is three 30-day months counted from a fixed epoch. Nothing is
//! persisted: the label is recomputed from the clock on every call.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Length of one scoring month.
pub const MONTH_DAYS: i64 = 30;
/// Months per season.
pub const MONTHS_PER_SEASON: i64 = 3;

/// Maps wall-clock time to season labels.
#[derive(Debug, Clone, Copy)]
pub struct SeasonClock {
    start: DateTime<Utc>,
}

/// Current season, as returned by `GET /api/season`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonInfo {
    pub season_id: String,
    pub number: i64,
    pub starts_at: String,
    pub ends_at: String,
}

impl SeasonClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { start }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Season number for `now`. Instants before the epoch count as season 1.
    pub fn season_number_at(&self, now: DateTime<Utc>) -> i64 {
        let elapsed_ms = (now - self.start).num_milliseconds();
        if elapsed_ms < 0 {
            return 1;
        }
        let months = elapsed_ms / Duration::days(MONTH_DAYS).num_milliseconds();
        months / MONTHS_PER_SEASON + 1
    }

    pub fn season_id_at(&self, now: DateTime<Utc>) -> String {
        season_id(self.season_number_at(now))
    }

    pub fn current_season_id(&self) -> String {
        self.season_id_at(Utc::now())
    }

    /// Half-open `[start, end)` window covered by season `number`.
    pub fn season_window(&self, number: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let span = Duration::days(MONTH_DAYS * MONTHS_PER_SEASON);
        let starts_at = self.start + span * (number.max(1) - 1) as i32;
        (starts_at, starts_at + span)
    }

    pub fn info_at(&self, now: DateTime<Utc>) -> SeasonInfo {
        let number = self.season_number_at(now);
        let (starts_at, ends_at) = self.season_window(number);
        SeasonInfo {
            season_id: season_id(number),
            number,
            starts_at: starts_at.to_rfc3339(),
            ends_at: ends_at.to_rfc3339(),
        }
    }
}

fn season_id(number: i64) -> String {
    format!("season-{}", number)
}
