//! Selected-event state for one day view
//!
//! A single id is shared by every rendered segment of the same event, so an
//! event split across both tracks lights up (and dims the rest) as one unit.

use chrono::NaiveDate;

use crate::event::{CalendarEvent, DayEvents, EventId};
use crate::navigation::ViewMode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected_id: Option<EventId>,
    date: Option<NaiveDate>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn select(&mut self, id: impl Into<EventId>) {
        self.selected_id = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.selected_id = None;
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id.as_deref() == Some(id)
    }

    /// Apply a pointer press in `mode`
    ///
    /// A hit selects the event. A miss clears the selection only on the
    /// timeline; on the dial an empty stretch of ring keeps it.
    pub fn click(&mut self, hit: Option<&str>, mode: ViewMode) {
        match hit {
            Some(id) => self.select(id),
            None if mode == ViewMode::Linear => self.clear(),
            None => {}
        }
    }

    /// True when some other event holds the selection
    pub fn is_dimmed(&self, id: &str) -> bool {
        matches!(self.selected_id.as_deref(), Some(selected) if selected != id)
    }

    /// Track the displayed date; clears the selection when it changes
    ///
    /// Returns whether the selection was reset.
    pub fn on_date_changed(&mut self, date: NaiveDate) -> bool {
        if self.date == Some(date) {
            return false;
        }
        let had_selection = self.selected_id.is_some();
        self.date = Some(date);
        self.selected_id = None;
        had_selection
    }

    /// Resolve the selected id against the day currently shown
    ///
    /// Yields `None` when the id no longer exists, e.g. right after a delete and
    /// before the caller has cleared the selection.
    pub fn selected_event<'a>(&self, day: &'a DayEvents) -> Option<&'a CalendarEvent> {
        self.selected_id.as_deref().and_then(|id| day.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventColor;

    fn day_with(ids: &[&str]) -> DayEvents {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        DayEvents {
            date,
            events: ids
                .iter()
                .map(|id| CalendarEvent {
                    id: id.to_string(),
                    title: id.to_string(),
                    start: date.and_hms_opt(9, 0, 0).unwrap(),
                    end: date.and_hms_opt(13, 0, 0).unwrap(),
                    color: EventColor::Blue,
                })
                .collect(),
        }
    }

    #[test]
    fn test_select_and_dim() {
        let mut selection = Selection::new();
        assert!(!selection.is_dimmed("a"));

        selection.select("a");
        assert!(selection.is_selected("a"));
        assert!(!selection.is_dimmed("a"));
        assert!(selection.is_dimmed("b"));

        selection.select("b");
        assert!(selection.is_selected("b"));

        selection.clear();
        assert_eq!(selection.selected_id(), None);
    }

    #[test]
    fn test_click_miss_clears_only_on_timeline() {
        let mut selection = Selection::new();
        selection.click(Some("a"), ViewMode::Clock);
        assert!(selection.is_selected("a"));

        selection.click(None, ViewMode::Clock);
        assert!(selection.is_selected("a"));

        selection.click(Some("b"), ViewMode::Linear);
        assert!(selection.is_selected("b"));

        selection.click(None, ViewMode::Linear);
        assert_eq!(selection.selected_id(), None);
    }

    #[test]
    fn test_date_change_clears() {
        let first = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut selection = Selection::new();
        selection.on_date_changed(first);
        selection.select("a");

        // Same date keeps the selection
        assert!(!selection.on_date_changed(first));
        assert!(selection.is_selected("a"));

        assert!(selection.on_date_changed(first.succ_opt().unwrap()));
        assert_eq!(selection.selected_id(), None);
    }

    #[test]
    fn test_stale_selection_resolves_to_none() {
        let day = day_with(&["a", "b"]);
        let mut selection = Selection::new();
        selection.select("b");
        assert_eq!(selection.selected_event(&day).map(|e| e.id.as_str()), Some("b"));

        let after_delete = day_with(&["a"]);
        assert!(selection.selected_event(&after_delete).is_none());
        assert!(selection.is_selected("b"));
    }
}
