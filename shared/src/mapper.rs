//! Event API wire format and its mapping onto the client model
//!
//! The API sends timestamps as RFC 3339 strings and colors as integer codes.
//! Timestamps become wall-clock times in the user's zone; plain dates are parsed
//! component-wise so they never drift across midnight.
//!
//! The same shape is used to export a day as JSON.

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use log::info;
use serde::{Deserialize, Serialize};

use crate::dates::{format_iso_date, parse_iso_date};
use crate::event::{CalendarEvent, DayEvents, EventColor, EventId, WeekEvents};
use crate::ticker::WallClock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventApiResponse {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub color: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEventApiResponse {
    pub date: String,
    pub events: Vec<EventApiResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekEventsApiResponse {
    pub week_start: String,
    pub week_end: String,
    pub days: Vec<DayEventApiResponse>,
}

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequest {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<EventId>,
    pub title: String,
    pub start: String,
    pub end: String,
    pub color: u8,
}

/// Error type for wire mapping
#[derive(Debug)]
pub enum MapError {
    /// Timestamp is neither RFC 3339 nor a plain local date-time
    InvalidTimestamp(String),
    /// Date is not a valid "YYYY-MM-DD" (or timestamp) value
    InvalidDate(String),
    /// Wall-clock time does not exist in the zone (DST gap)
    NonexistentLocalTime(NaiveDateTime),
    /// Payload is not valid JSON for the expected shape
    Json(serde_json::Error),
    /// Writing an export failed
    Io(io::Error),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::InvalidTimestamp(s) => write!(f, "Invalid timestamp: {}", s),
            MapError::InvalidDate(s) => write!(f, "Invalid date: {}", s),
            MapError::NonexistentLocalTime(t) => write!(f, "Local time {} does not exist", t),
            MapError::Json(e) => write!(f, "JSON error: {}", e),
            MapError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for MapError {}

impl From<serde_json::Error> for MapError {
    fn from(e: serde_json::Error) -> Self {
        MapError::Json(e)
    }
}

impl From<io::Error> for MapError {
    fn from(e: io::Error) -> Self {
        MapError::Io(e)
    }
}

/// Convert an API timestamp to wall-clock time in `tz`
///
/// Offset-less timestamps are taken as already being wall-clock time.
pub fn parse_timestamp(s: &str, tz: Tz) -> Result<NaiveDateTime, MapError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&tz).naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| MapError::InvalidTimestamp(s.to_string()))
}

/// Render a wall-clock time in `tz` as RFC 3339
///
/// Ambiguous times (DST fold) take the earlier instant.
pub fn format_timestamp<Z>(t: NaiveDateTime, tz: Z) -> Result<String, MapError>
where
    Z: TimeZone,
    Z::Offset: Display,
{
    tz.from_local_datetime(&t)
        .earliest()
        .map(|dt| dt.to_rfc3339())
        .ok_or(MapError::NonexistentLocalTime(t))
}

fn parse_date(s: &str, tz: Tz) -> Result<NaiveDate, MapError> {
    if let Some(date) = parse_iso_date(s) {
        return Ok(date);
    }
    parse_timestamp(s, tz)
        .map(|t| t.date())
        .map_err(|_| MapError::InvalidDate(s.to_string()))
}

pub fn map_event(e: &EventApiResponse, tz: Tz) -> Result<CalendarEvent, MapError> {
    Ok(CalendarEvent {
        id: e.id.clone(),
        title: e.title.clone(),
        start: parse_timestamp(&e.start, tz)?,
        end: parse_timestamp(&e.end, tz)?,
        color: EventColor::from_code(e.color),
    })
}

pub fn map_event_list(list: &[EventApiResponse], tz: Tz) -> Result<Vec<CalendarEvent>, MapError> {
    list.iter().map(|e| map_event(e, tz)).collect()
}

pub fn map_day(day: &DayEventApiResponse, tz: Tz) -> Result<DayEvents, MapError> {
    Ok(DayEvents {
        date: parse_date(&day.date, tz)?,
        events: map_event_list(&day.events, tz)?,
    })
}

/// Map a week payload, normalizing it to seven Monday-first days
pub fn map_week(week: &WeekEventsApiResponse, tz: Tz) -> Result<WeekEvents, MapError> {
    let week_start = parse_date(&week.week_start, tz)?;
    let days = week
        .days
        .iter()
        .map(|d| map_day(d, tz))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(WeekEvents::from_days(week_start, days))
}

pub fn map_request<Z>(e: &CalendarEvent, tz: Z) -> Result<EventRequest, MapError>
where
    Z: TimeZone,
    Z::Offset: Display,
{
    Ok(EventRequest {
        id: Some(e.id.clone()),
        title: e.title.clone(),
        start: format_timestamp(e.start, tz.clone())?,
        end: format_timestamp(e.end, tz)?,
        color: e.color.code(),
    })
}

/// Day projection in the API's response shape
pub fn day_response<Z>(day: &DayEvents, tz: Z) -> Result<DayEventApiResponse, MapError>
where
    Z: TimeZone,
    Z::Offset: Display,
{
    let events = day
        .events
        .iter()
        .map(|e| {
            let request = map_request(e, tz.clone())?;
            Ok(EventApiResponse {
                id: e.id.clone(),
                title: request.title,
                start: request.start,
                end: request.end,
                color: request.color,
            })
        })
        .collect::<Result<Vec<_>, MapError>>()?;
    Ok(DayEventApiResponse {
        date: format_iso_date(day.date),
        events,
    })
}

/// Pretty JSON for a day, timestamps offset for `clock`
pub fn day_to_json(day: &DayEvents, clock: WallClock) -> Result<String, MapError> {
    let payload = match clock {
        WallClock::System => day_response(day, Local)?,
        WallClock::Zone(tz) => day_response(day, tz)?,
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Write `day` to `<dir>/<iso date>.json`, creating `dir` if needed
pub fn export_day(dir: &Path, day: &DayEvents, clock: WallClock) -> Result<PathBuf, MapError> {
    let json = day_to_json(day, clock)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", format_iso_date(day.date)));
    fs::write(&path, json)?;
    info!("Exported {} events to {}", day.events.len(), path.display());
    Ok(path)
}

pub fn parse_day_json(json: &str, tz: Tz) -> Result<DayEvents, MapError> {
    let payload: DayEventApiResponse = serde_json::from_str(json)?;
    map_day(&payload, tz)
}

pub fn parse_week_json(json: &str, tz: Tz) -> Result<WeekEvents, MapError> {
    let payload: WeekEventsApiResponse = serde_json::from_str(json)?;
    map_week(&payload, tz)
}
