//! Rolling hour/weekday cursor for hourly forecast steps.

use chrono::{DateTime, Datelike, TimeZone, Timelike};

pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_WEEK: u32 = 7;

/// Calendar position of a forecast step.
///
/// `weekday` counts from Monday (0) to Sunday (6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeCursor {
    hour: u32,
    weekday: u32,
}

impl TimeCursor {
    /// Out-of-range values are reduced modulo 24 / 7.
    pub fn new(hour: u32, weekday: u32) -> Self {
        debug_assert!(hour < HOURS_PER_DAY && weekday < DAYS_PER_WEEK);
        Self {
            hour: hour % HOURS_PER_DAY,
            weekday: weekday % DAYS_PER_WEEK,
        }
    }

    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self::new(at.hour(), at.weekday().num_days_from_monday())
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn weekday(&self) -> u32 {
        self.weekday
    }

    /// Saturday (5) or Sunday (6).
    pub fn is_weekend(&self) -> bool {
        self.weekday >= 5
    }

    /// Move forward one hour, rolling the weekday when the hour wraps to 0.
    pub fn advance(&mut self) {
        self.hour = (self.hour + 1) % HOURS_PER_DAY;
        if self.hour == 0 {
            self.weekday = (self.weekday + 1) % DAYS_PER_WEEK;
        }
    }

    /// Closed form of `k` calls to [`advance`](Self::advance).
    pub fn at_step(&self, k: u64) -> Self {
        let hours_per_day = u64::from(HOURS_PER_DAY);
        let days_per_week = u64::from(DAYS_PER_WEEK);
        // Reduce `k` first so the sum cannot overflow.
        let total = u64::from(self.hour) + k % hours_per_day;
        let days = k / hours_per_day + total / hours_per_day;
        Self {
            hour: (total % hours_per_day) as u32,
            weekday: ((u64::from(self.weekday) + days % days_per_week) % days_per_week) as u32,
        }
    }
}

impl Iterator for TimeCursor {
    type Item = TimeCursor;

    /// Yields the current position, then advances.
    fn next(&mut self) -> Option<Self::Item> {
        let current = *self;
        self.advance();
        Some(current)
    }
}
