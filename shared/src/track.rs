//! Track projection
//!
//! A day is split into two fixed 720-minute tracks. The inner track holds
//! 00:00-11:59 and the outer track 12:00-23:59; the clock draws them as two
//! concentric rings and the linear view as two rows. An event is clipped to each
//! track independently, so one event yields at most two segments per day.

use chrono::{NaiveDate, NaiveDateTime};

use crate::dates::{minutes_from_midnight, DAY_MINUTES};
use crate::event::{CalendarEvent, DayEvents};

/// Length of one track in minutes
pub const TRACK_MINUTES: u32 = 12 * 60;

/// One of the two half-day tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    /// 00:00 to 11:59
    Inner,
    /// 12:00 to 23:59
    Outer,
}

impl Track {
    pub const BOTH: [Track; 2] = [Track::Inner, Track::Outer];

    /// First minute of the track, counted from midnight
    pub fn start_minutes(self) -> u32 {
        match self {
            Track::Inner => 0,
            Track::Outer => TRACK_MINUTES,
        }
    }

    /// Exclusive end of the track, counted from midnight
    pub fn end_minutes(self) -> u32 {
        self.start_minutes() + TRACK_MINUTES
    }

    /// Hour printed at the top of the track (0 or 12)
    pub fn hour_offset(self) -> u32 {
        self.start_minutes() / 60
    }

    fn from_start(start: u32) -> Self {
        if start < TRACK_MINUTES {
            Track::Inner
        } else {
            Track::Outer
        }
    }
}

/// The part of one event that falls inside one track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSegment<'a> {
    pub event: &'a CalendarEvent,
    /// Fixed track holding the window start
    pub track: Track,
    /// Start of the projection window, counted from midnight
    pub track_start_minutes: u32,
    /// Offset from the track start, 0..720
    pub start_minutes_in_track: u32,
    /// Offset from the track start, 1..=720 and always above the start
    pub end_minutes_in_track: u32,
}

impl<'a> TrackSegment<'a> {
    pub fn duration_minutes(&self) -> u32 {
        self.end_minutes_in_track - self.start_minutes_in_track
    }

    /// Stable key for the renderer, "<event id>-<window start minute>"
    pub fn key(&self) -> String {
        format!("{}-{}", self.event.id, self.track_start_minutes)
    }

    /// Absolute minute range from midnight
    pub fn absolute_range(&self) -> (u32, u32) {
        let base = self.track_start_minutes;
        (
            base + self.start_minutes_in_track,
            base + self.end_minutes_in_track,
        )
    }
}

/// Position of a timestamp on `day`, in minutes from that day's midnight
///
/// Timestamps on an earlier day pin to 0 and on a later day pin to 1440, which
/// lets an event that runs past midnight reach the end of the outer track.
fn minutes_on_day(t: &NaiveDateTime, day: NaiveDate) -> u32 {
    let date = t.date();
    if date < day {
        0
    } else if date > day {
        DAY_MINUTES
    } else {
        minutes_from_midnight(t)
    }
}

/// Clip `event` to `[track_start, track_end)` on the day the event starts
///
/// Returns `None` when the clipped interval is empty, including zero-length
/// events and events that only touch the track boundary.
pub fn project_to_track(
    event: &CalendarEvent,
    track_start: u32,
    track_end: u32,
) -> Option<TrackSegment<'_>> {
    project_to_track_on(event, event.start.date(), track_start, track_end)
}

/// Clip `event` to a track window of a specific `day`
pub fn project_to_track_on(
    event: &CalendarEvent,
    day: NaiveDate,
    track_start: u32,
    track_end: u32,
) -> Option<TrackSegment<'_>> {
    debug_assert!(track_start < track_end && track_end <= DAY_MINUTES);

    let start = minutes_on_day(&event.start, day);
    let end = minutes_on_day(&event.end, day);

    let seg_start = start.max(track_start);
    let seg_end = end.min(track_end);
    if seg_end <= seg_start {
        return None;
    }

    Some(TrackSegment {
        event,
        track: Track::from_start(track_start),
        track_start_minutes: track_start,
        start_minutes_in_track: seg_start - track_start,
        end_minutes_in_track: seg_end - track_start,
    })
}

/// Segments of a day's events for a single track, in arrival order
pub fn project_track(day: &DayEvents, track: Track) -> Vec<TrackSegment<'_>> {
    day.events
        .iter()
        .filter_map(|e| {
            project_to_track_on(e, day.date, track.start_minutes(), track.end_minutes())
        })
        .collect()
}

/// All segments of a day, inner track first
pub fn project_day(day: &DayEvents) -> Vec<TrackSegment<'_>> {
    Track::BOTH
        .into_iter()
        .flat_map(|track| project_track(day, track))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventColor;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn event(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: id.to_string(),
            start,
            end,
            color: EventColor::Red,
        }
    }

    fn project(e: &CalendarEvent, track: Track) -> Option<(u32, u32)> {
        project_to_track(e, track.start_minutes(), track.end_minutes())
            .map(|s| (s.start_minutes_in_track, s.end_minutes_in_track))
    }

    #[test]
    fn test_workday_splits_at_noon() {
        let e = event("work", at(1, 9, 0), at(1, 17, 0));
        assert_eq!(project(&e, Track::Inner), Some((540, 720)));
        assert_eq!(project(&e, Track::Outer), Some((0, 300)));
    }

    #[test]
    fn test_late_event_clamps_at_day_end() {
        let e = event("late", at(1, 23, 30), at(2, 0, 15));
        assert_eq!(project(&e, Track::Inner), None);
        let seg = project_to_track(&e, 720, 1440).unwrap();
        assert_eq!(seg.absolute_range(), (1410, 1440));
    }

    #[test]
    fn test_custom_window_keeps_absolute_position() {
        let e = event("w", at(1, 9, 0), at(1, 17, 0));
        let seg = project_to_track(&e, 300, 900).unwrap();
        assert_eq!((seg.start_minutes_in_track, seg.end_minutes_in_track), (240, 600));
        assert_eq!(seg.absolute_range(), (540, 900));
        assert_eq!(seg.key(), "w-300");

        // A window starting after noon belongs to the outer track
        let seg = project_to_track(&e, 780, 1000).unwrap();
        assert_eq!(seg.track, Track::Outer);
        assert_eq!(seg.absolute_range(), (780, 1000));
    }

    #[test]
    fn test_continuation_on_next_day() {
        let e = event("late", at(1, 23, 30), at(2, 0, 15));
        let day2 = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let seg = project_to_track_on(&e, day2, 0, TRACK_MINUTES).unwrap();
        assert_eq!((seg.start_minutes_in_track, seg.end_minutes_in_track), (0, 15));
        assert!(project_to_track_on(&e, day2, TRACK_MINUTES, DAY_MINUTES).is_none());
    }

    #[test]
    fn test_zero_length_produces_nothing() {
        for (h, m) in [(0, 0), (11, 59), (12, 0), (18, 30)] {
            let e = event("zero", at(1, h, m), at(1, h, m));
            assert_eq!(project(&e, Track::Inner), None);
            assert_eq!(project(&e, Track::Outer), None);
        }
    }

    #[test]
    fn test_touching_boundary_produces_nothing() {
        let morning = event("m", at(1, 10, 0), at(1, 12, 0));
        assert_eq!(project(&morning, Track::Inner), Some((600, 720)));
        assert_eq!(project(&morning, Track::Outer), None);
    }

    #[test]
    fn test_clamp_and_coverage_invariants() {
        // Sweep starts and durations across the day in 35-minute steps
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let midnight = day.and_hms_opt(0, 0, 0).unwrap();
        for start in (0..DAY_MINUTES).step_by(35) {
            for duration in (0..DAY_MINUTES - start).step_by(35) {
                let e = event(
                    "sweep",
                    midnight + chrono::Duration::minutes(start as i64),
                    midnight + chrono::Duration::minutes((start + duration) as i64),
                );
                let mut covered = 0;
                let mut ranges = Vec::new();
                for track in Track::BOTH {
                    if let Some(seg) =
                        project_to_track(&e, track.start_minutes(), track.end_minutes())
                    {
                        assert!(seg.start_minutes_in_track < seg.end_minutes_in_track);
                        assert!(seg.end_minutes_in_track <= TRACK_MINUTES);
                        covered += seg.duration_minutes();
                        ranges.push(seg.absolute_range());
                    }
                }
                assert_eq!(covered, duration);
                if duration > 0 {
                    assert_eq!(ranges.first().unwrap().0, start);
                    assert_eq!(ranges.last().unwrap().1, start + duration);
                }
            }
        }
    }

    #[test]
    fn test_project_day_orders_inner_first() {
        let day = DayEvents {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            events: vec![
                event("pm", at(1, 14, 0), at(1, 15, 0)),
                event("span", at(1, 11, 0), at(1, 13, 0)),
                event("am", at(1, 8, 0), at(1, 9, 0)),
            ],
        };
        let keys: Vec<String> = project_day(&day).iter().map(|s| s.key()).collect();
        assert_eq!(keys, vec!["span-0", "am-0", "pm-720", "span-720"]);
    }
}
