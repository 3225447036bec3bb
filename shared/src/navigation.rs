//! View routing and the displayed date
//!
//! Routes follow the web paths of the calendar (`/`, `/today`, `/week`,
//! `/options`, `/<YYYY-MM-DD>`). The displayed date only ever changes through
//! `ViewState`, which reports each change so the caller can reset selection.

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::dates::{add_days, parse_iso_date};

/// Which view is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Two-ring clock face for one day
    Clock,
    /// Two-row timeline for one day
    Linear,
    /// Monday-to-Sunday list
    Week,
    /// Theme and preference settings
    Options,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Clock,
        ViewMode::Linear,
        ViewMode::Week,
        ViewMode::Options,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Clock => "Clock",
            ViewMode::Linear => "Timeline",
            ViewMode::Week => "Week",
            ViewMode::Options => "Options",
        }
    }

    /// Days moved by one "next"/"previous" step
    fn step_days(self) -> i64 {
        match self {
            ViewMode::Week => 7,
            _ => 1,
        }
    }
}

/// A parsed navigation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Today,
    Week,
    Options,
    Day(NaiveDate),
}

impl Route {
    /// Parse a path; unknown or malformed paths fall back to today
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_matches('/');
        match trimmed {
            "" | "today" => Route::Today,
            "week" => Route::Week,
            "options" => Route::Options,
            other => match parse_iso_date(other) {
                Some(date) => Route::Day(date),
                None => {
                    warn!("Unrecognized route {:?}, showing today", path);
                    Route::Today
                }
            },
        }
    }
}

/// Current view and date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub date: NaiveDate,
    /// Day view to return to from week/options
    day_mode: ViewMode,
}

impl ViewState {
    pub fn new(mode: ViewMode, date: NaiveDate) -> Self {
        let day_mode = match mode {
            ViewMode::Linear => ViewMode::Linear,
            _ => ViewMode::Clock,
        };
        Self {
            mode,
            date,
            day_mode,
        }
    }

    /// Apply a route relative to `today`
    pub fn open(&mut self, route: Route, today: NaiveDate) -> bool {
        match route {
            Route::Today => {
                self.set_mode(self.day_mode);
                self.go_to(today)
            }
            Route::Week => {
                self.set_mode(ViewMode::Week);
                false
            }
            Route::Options => {
                self.set_mode(ViewMode::Options);
                false
            }
            Route::Day(date) => {
                self.set_mode(self.day_mode);
                self.go_to(date)
            }
        }
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        if matches!(mode, ViewMode::Clock | ViewMode::Linear) {
            self.day_mode = mode;
        }
        self.mode = mode;
    }

    pub fn is_day_view(&self) -> bool {
        matches!(self.mode, ViewMode::Clock | ViewMode::Linear)
    }

    /// Move to `date`; returns whether the date changed
    pub fn go_to(&mut self, date: NaiveDate) -> bool {
        let changed = self.date != date;
        self.date = date;
        changed
    }

    pub fn next(&mut self) -> bool {
        self.go_to(add_days(self.date, self.mode.step_days()))
    }

    pub fn previous(&mut self) -> bool {
        self.go_to(add_days(self.date, -self.mode.step_days()))
    }

    pub fn today(&mut self, today: NaiveDate) -> bool {
        self.go_to(today)
    }

    /// Path that would reopen this state
    pub fn path(&self) -> String {
        match self.mode {
            ViewMode::Week => "/week".to_string(),
            ViewMode::Options => "/options".to_string(),
            _ => format!("/{}", crate::dates::format_iso_date(self.date)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Route::Today);
        assert_eq!(Route::parse("/today"), Route::Today);
        assert_eq!(Route::parse("/week"), Route::Week);
        assert_eq!(Route::parse("/options/"), Route::Options);
        assert_eq!(Route::parse("/2025-01-01"), Route::Day(date(2025, 1, 1)));
        assert_eq!(Route::parse("/2025-02-30"), Route::Today);
        assert_eq!(Route::parse("/garbage"), Route::Today);
    }

    #[test]
    fn test_step_sizes() {
        let mut state = ViewState::new(ViewMode::Clock, date(2025, 1, 1));
        assert!(state.next());
        assert_eq!(state.date, date(2025, 1, 2));

        state.set_mode(ViewMode::Week);
        assert!(state.previous());
        assert_eq!(state.date, date(2024, 12, 26));
    }

    #[test]
    fn test_open_returns_to_last_day_view() {
        let today = date(2025, 1, 10);
        let mut state = ViewState::new(ViewMode::Linear, date(2025, 1, 1));
        assert!(!state.open(Route::Week, today));
        assert_eq!(state.mode, ViewMode::Week);

        assert!(state.open(Route::Today, today));
        assert_eq!(state.mode, ViewMode::Linear);
        assert_eq!(state.date, today);

        // Same date again reports no change
        assert!(!state.today(today));
        assert_eq!(state.path(), "/2025-01-10");
    }

    #[test]
    fn test_view_mode_serde() {
        let json = serde_json::to_string(&ViewMode::Linear).unwrap();
        assert_eq!(json, "\"linear\"");
    }
}
