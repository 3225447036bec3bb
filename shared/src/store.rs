//! Event storage
//!
//! `EventService` is the seam between the views and wherever events live. The
//! only implementation is a TOML file in the user's config directory, which
//! stands in for a remote event API.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{read_toml, write_toml, ConfigError};
use crate::dates::week_days;
use crate::event::{CalendarEvent, DayEvents, DraftError, EventDraft, WeekEvents};

/// Error type for event storage
#[derive(Debug)]
pub enum StoreError {
    /// No event with this id
    NotFound(String),
    /// Draft failed validation
    Invalid(DraftError),
    /// The store file could not be read or written
    Storage(ConfigError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Event not found: {}", id),
            StoreError::Invalid(e) => write!(f, "Invalid event: {}", e),
            StoreError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<ConfigError> for StoreError {
    fn from(e: ConfigError) -> Self {
        StoreError::Storage(e)
    }
}

impl From<DraftError> for StoreError {
    fn from(e: DraftError) -> Self {
        StoreError::Invalid(e)
    }
}

/// Read and write access to one user's events
pub trait EventService {
    /// Events intersecting `date`, in arrival order
    fn day_events(&self, date: NaiveDate) -> Result<DayEvents, StoreError>;

    /// The Monday-to-Sunday week containing `date`
    fn week_events(&self, date: NaiveDate) -> Result<WeekEvents, StoreError> {
        let days = week_days(date)
            .into_iter()
            .map(|d| self.day_events(d))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(WeekEvents::from_days(date, days))
    }

    fn create(&mut self, draft: EventDraft) -> Result<CalendarEvent, StoreError>;

    fn update(&mut self, event: CalendarEvent) -> Result<CalendarEvent, StoreError>;

    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    next_id: u64,
    #[serde(default)]
    events: Vec<CalendarEvent>,
}

/// Events kept in memory and mirrored to a TOML file after every write
#[derive(Debug)]
pub struct LocalEventStore {
    path: Option<PathBuf>,
    data: StoreFile,
}

impl LocalEventStore {
    /// A store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoreFile::default(),
        }
    }

    /// Open the store file at `path`, starting empty if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data: StoreFile = read_toml(&path)?.unwrap_or_default();
        debug!("Loaded {} events from {}", data.events.len(), path.display());
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.data.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.events.is_empty()
    }

    fn persist(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => Ok(write_toml(path, &self.data)?),
            None => Ok(()),
        }
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.data
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl EventService for LocalEventStore {
    fn day_events(&self, date: NaiveDate) -> Result<DayEvents, StoreError> {
        let events = self
            .data
            .events
            .iter()
            .filter(|e| e.intersects_day(date))
            .cloned()
            .collect();
        Ok(DayEvents { date, events })
    }

    fn create(&mut self, draft: EventDraft) -> Result<CalendarEvent, StoreError> {
        draft.validate()?;
        self.data.next_id += 1;
        let event = draft.into_event(format!("evt-{}", self.data.next_id));
        self.data.events.push(event.clone());
        if let Err(e) = self.persist() {
            warn!("Failed to persist new event {}: {}", event.id, e);
            self.data.events.pop();
            self.data.next_id -= 1;
            return Err(e);
        }
        debug!("Created event {}", event.id);
        Ok(event)
    }

    fn update(&mut self, event: CalendarEvent) -> Result<CalendarEvent, StoreError> {
        EventDraft::from(&event).validate()?;
        let pos = self.position(&event.id)?;
        let previous = std::mem::replace(&mut self.data.events[pos], event.clone());
        if let Err(e) = self.persist() {
            warn!("Failed to persist update of {}: {}", event.id, e);
            self.data.events[pos] = previous;
            return Err(e);
        }
        debug!("Updated event {}", event.id);
        Ok(event)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let pos = self.position(id)?;
        let removed = self.data.events.remove(pos);
        if let Err(e) = self.persist() {
            warn!("Failed to persist delete of {}: {}", id, e);
            self.data.events.insert(pos, removed);
            return Err(e);
        }
        debug!("Deleted event {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventColor;
    use chrono::NaiveDateTime;
    use std::fs;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn draft(title: &str, start: NaiveDateTime, end: NaiveDateTime) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            start,
            end,
            color: EventColor::Red,
        }
    }

    fn temp_file(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("{}_{}", name, std::process::id()));
        path
    }

    #[test]
    fn test_day_query_keeps_arrival_order() {
        let mut store = LocalEventStore::in_memory();
        store.create(draft("late", at(1, 18, 0), at(1, 19, 0))).unwrap();
        store.create(draft("early", at(1, 8, 0), at(1, 9, 0))).unwrap();
        store.create(draft("other day", at(2, 8, 0), at(2, 9, 0))).unwrap();
        store.create(draft("overnight", at(1, 23, 0), at(2, 1, 0))).unwrap();

        let day = store.day_events(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap();
        let titles: Vec<&str> = day.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["late", "early", "overnight"]);

        let next = store.day_events(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()).unwrap();
        assert_eq!(next.events.len(), 2);
    }

    #[test]
    fn test_week_query_has_seven_days() {
        let mut store = LocalEventStore::in_memory();
        store.create(draft("gym", at(4, 7, 0), at(4, 8, 0))).unwrap();

        let week = store.week_events(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()).unwrap();
        assert_eq!(week.week_start, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.days[5].events.len(), 1);
        assert_eq!(week.total_events(), 1);
    }

    #[test]
    fn test_rejects_invalid_and_unknown() {
        let mut store = LocalEventStore::in_memory();
        let err = store.create(draft("backwards", at(1, 9, 0), at(1, 8, 0)));
        assert!(matches!(err, Err(StoreError::Invalid(DraftError::EndNotAfterStart))));
        assert!(store.is_empty());

        assert!(matches!(store.delete("evt-99"), Err(StoreError::NotFound(_))));

        let ghost = draft("ghost", at(1, 9, 0), at(1, 10, 0)).into_event("nope".to_string());
        assert!(matches!(store.update(ghost), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_persists_across_reopen() {
        let path = temp_file("dayring_store_roundtrip.toml");
        let _ = fs::remove_file(&path);

        let mut store = LocalEventStore::open(&path).unwrap();
        let keep = store.create(draft("keep", at(1, 9, 0), at(1, 10, 0))).unwrap();
        let dropped = store.create(draft("drop", at(1, 11, 0), at(1, 12, 0))).unwrap();

        let mut renamed = keep.clone();
        renamed.title = "kept".to_string();
        renamed.color = EventColor::Purple;
        store.update(renamed).unwrap();
        store.delete(&dropped.id).unwrap();

        let reopened = LocalEventStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        let day = reopened.day_events(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap();
        assert_eq!(day.events[0].title, "kept");
        assert_eq!(day.events[0].color, EventColor::Purple);

        // Ids keep counting after a reload
        let mut reopened = reopened;
        let next = reopened.create(draft("next", at(1, 13, 0), at(1, 14, 0))).unwrap();
        assert_eq!(next.id, "evt-3");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let path = temp_file("dayring_store_corrupt.toml");
        fs::write(&path, "next_id = \"many\"").unwrap();

        let opened = LocalEventStore::open(&path);
        assert!(matches!(opened, Err(StoreError::Storage(ConfigError::Parse(_)))));

        let _ = fs::remove_file(path);
    }
}
