//! Calendar event model
//!
//! Events carry local wall-clock timestamps. Day and week collections are
//! projections over a user's event set and are rebuilt on every fetch.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::dates::{add_days, get_monday, week_days};

/// Opaque event identifier, unique within one user's event set
pub type EventId = String;

/// Color tag attached to an event
///
/// Stored and transmitted as its integer code. Codes outside 0..=4 decode to
/// `Blue` so a bad payload never breaks rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum EventColor {
    Red,
    #[default]
    Blue,
    Green,
    Yellow,
    Purple,
}

impl EventColor {
    pub const ALL: [EventColor; 5] = [
        EventColor::Red,
        EventColor::Blue,
        EventColor::Green,
        EventColor::Yellow,
        EventColor::Purple,
    ];

    pub fn from_code(code: u8) -> Self {
        match code {
            0 => EventColor::Red,
            1 => EventColor::Blue,
            2 => EventColor::Green,
            3 => EventColor::Yellow,
            4 => EventColor::Purple,
            _ => EventColor::Blue,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            EventColor::Red => 0,
            EventColor::Blue => 1,
            EventColor::Green => 2,
            EventColor::Yellow => 3,
            EventColor::Purple => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventColor::Red => "red",
            EventColor::Blue => "blue",
            EventColor::Green => "green",
            EventColor::Yellow => "yellow",
            EventColor::Purple => "purple",
        }
    }
}

impl From<u8> for EventColor {
    fn from(code: u8) -> Self {
        EventColor::from_code(code)
    }
}

impl From<EventColor> for u8 {
    fn from(color: EventColor) -> Self {
        color.code()
    }
}

/// A single time-boxed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: EventColor,
}

impl CalendarEvent {
    /// Whether `[start, end)` overlaps the 24 hours of `date`
    pub fn intersects_day(&self, date: NaiveDate) -> bool {
        let day_start = date.and_time(NaiveTime::MIN);
        let day_end = add_days(date, 1).and_time(NaiveTime::MIN);
        self.start < day_end && self.end > day_start
    }
}

/// Events for one calendar day, in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEvents {
    pub date: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

impl DayEvents {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            events: Vec::new(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }
}

/// One Monday-to-Sunday week of events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekEvents {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DayEvents>,
}

impl WeekEvents {
    /// Build a week around `date` from whatever days were supplied
    ///
    /// The start is normalized to Monday, days outside the week are dropped and
    /// any missing day becomes an empty one, so the result always has exactly
    /// seven entries in order.
    pub fn from_days(date: NaiveDate, mut supplied: Vec<DayEvents>) -> Self {
        let week_start = get_monday(date);
        let days = week_days(week_start)
            .into_iter()
            .map(|d| match supplied.iter().position(|day| day.date == d) {
                Some(pos) => supplied.swap_remove(pos),
                None => DayEvents::empty(d),
            })
            .collect();

        Self {
            week_start,
            week_end: add_days(week_start, 6),
            days,
        }
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayEvents> {
        self.days.iter().find(|d| d.date == date)
    }

    pub fn total_events(&self) -> usize {
        self.days.iter().map(|d| d.events.len()).sum()
    }
}

/// Event contents before the store assigns an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: EventColor,
}

/// Rejection reasons for a draft coming out of the create/update form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// Title is empty or whitespace
    EmptyTitle,
    /// End is not strictly after start
    EndNotAfterStart,
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftError::EmptyTitle => write!(f, "Title must not be empty"),
            DraftError::EndNotAfterStart => write!(f, "End must be after start"),
        }
    }
}

impl std::error::Error for DraftError {}

impl EventDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.end <= self.start {
            return Err(DraftError::EndNotAfterStart);
        }
        Ok(())
    }

    pub fn into_event(self, id: EventId) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title,
            start: self.start,
            end: self.end,
            color: self.color,
        }
    }
}

impl From<&CalendarEvent> for EventDraft {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            color: event.color,
        }
    }
}
