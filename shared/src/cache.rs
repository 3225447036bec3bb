//! Day/week projection cache
//!
//! Fetched projections are kept per query key until a write invalidates them
//! or navigation moves more than [`KEEP_DAYS`] away from them.
//! Keys mirror the event API paths: `["events", "day", "<iso date>"]` and
//! `["events", "week", "<iso monday>"]`.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;

use crate::dates::{add_days, format_iso_date, get_monday};
use crate::event::{CalendarEvent, DayEvents, EventDraft, WeekEvents};
use crate::store::{EventService, StoreError};

/// Cached projections further than this from the date being fetched are dropped
pub const KEEP_DAYS: i64 = 62;

/// Identifies one cached projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Day(NaiveDate),
    /// Always holds the Monday of the week
    Week(NaiveDate),
}

impl QueryKey {
    pub fn day(date: NaiveDate) -> Self {
        QueryKey::Day(date)
    }

    pub fn week(date: NaiveDate) -> Self {
        QueryKey::Week(get_monday(date))
    }

    pub fn segments(&self) -> [String; 3] {
        match self {
            QueryKey::Day(date) => ["events".into(), "day".into(), format_iso_date(*date)],
            QueryKey::Week(monday) => ["events".into(), "week".into(), format_iso_date(*monday)],
        }
    }

    /// Every key whose projection could contain `event`
    pub fn for_event(event: &CalendarEvent) -> Vec<QueryKey> {
        let mut keys = Vec::new();
        let mut date = event.start.date();
        let last = event.end.date().max(date);
        while date <= last {
            keys.push(QueryKey::day(date));
            let week = QueryKey::week(date);
            if !keys.contains(&week) {
                keys.push(week);
            }
            date = add_days(date, 1);
        }
        keys
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments().join("/"))
    }
}

#[derive(Debug, Default)]
pub struct ProjectionCache {
    days: HashMap<NaiveDate, DayEvents>,
    weeks: HashMap<NaiveDate, WeekEvents>,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: QueryKey) -> bool {
        match key {
            QueryKey::Day(date) => self.days.contains_key(&date),
            QueryKey::Week(monday) => self.weeks.contains_key(&monday),
        }
    }

    /// Cached day projection, fetched through `service` on a miss
    pub fn day(
        &mut self,
        date: NaiveDate,
        service: &dyn EventService,
    ) -> Result<&DayEvents, StoreError> {
        if !self.days.contains_key(&date) {
            debug!("Cache miss for {}", QueryKey::day(date));
            self.evict_far_from(date);
            let fetched = service.day_events(date)?;
            self.days.insert(date, fetched);
        }
        Ok(&self.days[&date])
    }

    /// Cached week projection, fetched through `service` on a miss
    pub fn week(
        &mut self,
        date: NaiveDate,
        service: &dyn EventService,
    ) -> Result<&WeekEvents, StoreError> {
        let monday = get_monday(date);
        if !self.weeks.contains_key(&monday) {
            debug!("Cache miss for {}", QueryKey::week(monday));
            self.evict_far_from(monday);
            let fetched = service.week_events(monday)?;
            self.weeks.insert(monday, fetched);
        }
        Ok(&self.weeks[&monday])
    }

    pub fn invalidate(&mut self, key: QueryKey) {
        let removed = match key {
            QueryKey::Day(date) => self.days.remove(&date).is_some(),
            QueryKey::Week(monday) => self.weeks.remove(&monday).is_some(),
        };
        if removed {
            debug!("Invalidated {}", key);
        }
    }

    pub fn invalidate_for_event(&mut self, event: &CalendarEvent) {
        for key in QueryKey::for_event(event) {
            self.invalidate(key);
        }
    }

    /// Drop projections more than [`KEEP_DAYS`] away from `center`
    pub fn evict_far_from(&mut self, center: NaiveDate) {
        let near = |date: &NaiveDate| (*date - center).num_days().abs() <= KEEP_DAYS;
        let before = self.len();
        self.days.retain(|date, _| near(date));
        self.weeks.retain(|monday, _| near(monday));
        let evicted = before - self.len();
        if evicted > 0 {
            debug!("Evicted {} projections far from {}", evicted, center);
        }
    }

    /// Number of cached projections, days and weeks together
    pub fn len(&self) -> usize {
        self.days.len() + self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything under the `["events"]` prefix
    pub fn invalidate_all(&mut self) {
        self.days.clear();
        self.weeks.clear();
    }

    /// Cached copy of an event, from any cached day
    fn find_cached(&self, id: &str) -> Option<CalendarEvent> {
        self.days
            .values()
            .find_map(|day| day.find(id))
            .or_else(|| {
                self.weeks
                    .values()
                    .flat_map(|w| w.days.iter())
                    .find_map(|day| day.find(id))
            })
            .cloned()
    }
}

/// An event service fronted by a projection cache
///
/// Successful writes invalidate the keys of every date the event touched,
/// before and after the write. Failed writes leave the cache alone. Selection
/// is not touched; callers clear it when a delete succeeds.
pub struct EventClient<S> {
    service: S,
    cache: ProjectionCache,
}

impl<S: EventService> EventClient<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            cache: ProjectionCache::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn cache(&self) -> &ProjectionCache {
        &self.cache
    }

    pub fn day(&mut self, date: NaiveDate) -> Result<&DayEvents, StoreError> {
        self.cache.day(date, &self.service)
    }

    pub fn week(&mut self, date: NaiveDate) -> Result<&WeekEvents, StoreError> {
        self.cache.week(date, &self.service)
    }

    pub fn create(&mut self, draft: EventDraft) -> Result<CalendarEvent, StoreError> {
        let created = self.service.create(draft)?;
        self.cache.invalidate_for_event(&created);
        Ok(created)
    }

    pub fn update(&mut self, event: CalendarEvent) -> Result<CalendarEvent, StoreError> {
        let previous = self.cache.find_cached(&event.id);
        let updated = self.service.update(event)?;
        if let Some(previous) = previous {
            self.cache.invalidate_for_event(&previous);
        }
        self.cache.invalidate_for_event(&updated);
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let previous = self.cache.find_cached(id);
        self.service.delete(id)?;
        match previous {
            Some(previous) => self.cache.invalidate_for_event(&previous),
            None => self.cache.invalidate_all(),
        }
        Ok(())
    }
}
