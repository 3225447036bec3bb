//! Arc geometry - segments to drawable ring and bar parameters
//!
//! Two mappings share the clipped segments from [`crate::track`]:
//! - circular: a dash pattern on a full circle per track, minute 0 at 12 o'clock
//! - linear: left/width percentages inside a row per track
//!
//! Renderer helpers at the bottom work in a y-up coordinate space with angles
//! advancing clockwise from 12 o'clock.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::dates::format_time;
use crate::event::CalendarEvent;
use crate::track::{TrackSegment, TRACK_MINUTES};

const TRACK: f32 = TRACK_MINUTES as f32;

/// Stroke dash parameters for one arc on a ring
#[derive(Debug, Clone, PartialEq)]
pub struct DashProps {
    /// "<visible> <gap>" dash pattern
    pub dash_array: String,
    /// Negative offset that rotates the dash to the segment start
    pub dash_offset: f32,
    pub dash_length: f32,
    pub circumference: f32,
}

/// Dash pattern for a segment drawn on a ring of `radius`
///
/// Durations shorter than one minute are widened to one minute so the dash
/// never collapses to nothing.
pub fn dash_props(segment: &TrackSegment<'_>, radius: f32) -> DashProps {
    debug_assert!(radius.is_finite() && radius > 0.0, "ring radius must be positive");

    let circumference = TAU * radius;
    let duration = segment.duration_minutes().max(1) as f32;

    let start_fraction = segment.start_minutes_in_track as f32 / TRACK;
    let duration_fraction = duration / TRACK;

    let dash_length = duration_fraction * circumference;
    let dash_offset = -start_fraction * circumference;

    DashProps {
        dash_array: format!("{} {}", dash_length, circumference - dash_length),
        dash_offset,
        dash_length,
        circumference,
    }
}

/// Position of a bar inside a linear track row, in percent of the row width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPosition {
    pub left_percent: f32,
    pub width_percent: f32,
}

pub fn bar_position(segment: &TrackSegment<'_>) -> BarPosition {
    BarPosition {
        left_percent: segment.start_minutes_in_track as f32 / TRACK * 100.0,
        width_percent: segment.duration_minutes() as f32 / TRACK * 100.0,
    }
}

/// How much text fits on a bar of a given width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarLabel {
    None,
    TitleOnly,
    TitleAndTime,
}

impl BarLabel {
    pub fn for_width(width_percent: f32) -> Self {
        if width_percent < 4.0 {
            BarLabel::None
        } else if width_percent < 8.0 {
            BarLabel::TitleOnly
        } else {
            BarLabel::TitleAndTime
        }
    }

    /// Text drawn on the bar, `None` when nothing fits
    ///
    /// The time part is the event's full start-end range, even for a segment
    /// clipped to one track.
    pub fn text(self, event: &CalendarEvent) -> Option<String> {
        match self {
            BarLabel::None => None,
            BarLabel::TitleOnly => Some(event.title.clone()),
            BarLabel::TitleAndTime => Some(format!(
                "{}  {} - {}",
                event.title,
                format_time(&event.start),
                format_time(&event.end)
            )),
        }
    }
}

/// Angle (radians, y-up) of a track minute, clockwise from 12 o'clock
pub fn minute_angle(minute_in_track: f32) -> f32 {
    FRAC_PI_2 - (minute_in_track / TRACK) * TAU
}

/// Sample points along the visible dash of `dash`, for polyline drawing
///
/// The dash starts `-dash_offset` along the circumference from 12 o'clock and
/// runs clockwise for `dash_length`.
pub fn arc_points(
    center: (f32, f32),
    radius: f32,
    dash: &DashProps,
    samples: usize,
) -> Vec<(f32, f32)> {
    let start = -dash.dash_offset / dash.circumference * TRACK;
    let span = dash.dash_length / dash.circumference * TRACK;
    let samples = samples.max(2);

    (0..samples)
        .map(|i| {
            let minute = start + span * i as f32 / (samples - 1) as f32;
            let angle = minute_angle(minute);
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

/// Position of the `index`-th of 12 hour labels on a ring
pub fn hour_label_position(center: (f32, f32), radius: f32, index: u32) -> (f32, f32) {
    let angle = minute_angle(index as f32 * 60.0);
    (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
}

/// Find the event whose arc on this ring lies under `point`
///
/// Overlapping arcs are drawn in order, so the last match is the one on top.
pub fn hit_test_ring<'a>(
    center: (f32, f32),
    point: (f32, f32),
    radius: f32,
    stroke_width: f32,
    segments: &[TrackSegment<'a>],
) -> Option<&'a CalendarEvent> {
    let dx = point.0 - center.0;
    let dy = point.1 - center.1;
    let dist = (dx * dx + dy * dy).sqrt();
    if (dist - radius).abs() > stroke_width / 2.0 {
        return None;
    }

    let fraction = ((FRAC_PI_2 - dy.atan2(dx)) / TAU).rem_euclid(1.0);
    let minute = fraction * TRACK;

    hit_test_bar(segments, minute)
}

/// Find the event whose bar covers `minute_in_track`, last drawn wins
pub fn hit_test_bar<'a>(
    segments: &[TrackSegment<'a>],
    minute_in_track: f32,
) -> Option<&'a CalendarEvent> {
    segments
        .iter()
        .rev()
        .find(|seg| {
            let start = seg.start_minutes_in_track as f32;
            let end = start + seg.duration_minutes().max(1) as f32;
            minute_in_track >= start && minute_in_track < end
        })
        .map(|seg| seg.event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventColor;
    use crate::track::Track;
    use chrono::NaiveDate;

    fn sample_event(id: &str) -> CalendarEvent {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        CalendarEvent {
            id: id.to_string(),
            title: id.to_string(),
            start: day.and_hms_opt(0, 0, 0).unwrap(),
            end: day.and_hms_opt(1, 0, 0).unwrap(),
            color: EventColor::Purple,
        }
    }

    fn segment(event: &CalendarEvent, start: u32, end: u32) -> TrackSegment<'_> {
        TrackSegment {
            event,
            track: Track::Inner,
            track_start_minutes: 0,
            start_minutes_in_track: start,
            end_minutes_in_track: end,
        }
    }

    #[test]
    fn test_dash_props_quarter_arc() {
        let e = sample_event("q");
        let props = dash_props(&segment(&e, 180, 360), 100.0);
        let circ = TAU * 100.0;
        assert!((props.circumference - circ).abs() < 1e-3);
        assert!((props.dash_length - circ / 4.0).abs() < 1e-3);
        assert!((props.dash_offset + circ / 4.0).abs() < 1e-3);
        assert_eq!(
            props.dash_array,
            format!("{} {}", props.dash_length, circ - props.dash_length)
        );
    }

    #[test]
    fn test_dash_length_monotonic_and_full() {
        let e = sample_event("m");
        let mut previous = 0.0;
        for duration in 1..=TRACK_MINUTES {
            let props = dash_props(&segment(&e, 0, duration), 95.0);
            assert!(props.dash_length > previous);
            previous = props.dash_length;
        }
        let full = dash_props(&segment(&e, 0, TRACK_MINUTES), 95.0);
        assert!((full.dash_length - full.circumference).abs() < 1e-3);
    }

    #[test]
    fn test_bar_position() {
        let e = sample_event("b");
        let bar = bar_position(&segment(&e, 540, 720));
        assert!((bar.left_percent - 75.0).abs() < 1e-4);
        assert!((bar.width_percent - 25.0).abs() < 1e-4);

        // No floor on tiny bars
        let tiny = bar_position(&segment(&e, 0, 1));
        assert!(tiny.width_percent < 0.2);
        assert_eq!(BarLabel::for_width(tiny.width_percent), BarLabel::None);
        assert_eq!(BarLabel::for_width(5.0), BarLabel::TitleOnly);
        assert_eq!(BarLabel::for_width(25.0), BarLabel::TitleAndTime);
    }

    #[test]
    fn test_bar_label_text_shows_range() {
        let e = sample_event("Standup");
        assert_eq!(BarLabel::None.text(&e), None);
        assert_eq!(BarLabel::TitleOnly.text(&e).as_deref(), Some("Standup"));
        assert_eq!(
            BarLabel::TitleAndTime.text(&e).as_deref(),
            Some("Standup  00:00 - 01:00")
        );
    }

    #[test]
    fn test_arc_points_start_at_top_and_run_clockwise() {
        let e = sample_event("a");
        let dash = dash_props(&segment(&e, 0, 180), 10.0);
        let points = arc_points((0.0, 0.0), 10.0, &dash, 3);
        assert_eq!(points.len(), 3);
        assert!(points[0].0.abs() < 1e-4 && (points[0].1 - 10.0).abs() < 1e-4);
        // A quarter of the track later we are at 3 o'clock
        assert!((points[2].0 - 10.0).abs() < 1e-4 && points[2].1.abs() < 1e-4);
    }

    #[test]
    fn test_arc_points_follow_dash_offset() {
        let e = sample_event("d");
        // 06:00 to 09:00 runs from 6 o'clock to 9 o'clock
        let dash = dash_props(&segment(&e, 360, 540), 50.0);
        let points = arc_points((10.0, 10.0), 50.0, &dash, 5);
        let first = points[0];
        let last = points[points.len() - 1];
        assert!((first.0 - 10.0).abs() < 1e-3 && (first.1 + 40.0).abs() < 1e-3);
        assert!((last.0 + 40.0).abs() < 1e-3 && (last.1 - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_hit_test_ring() {
        let first = sample_event("first");
        let second = sample_event("second");
        let segments = vec![segment(&first, 0, 360), segment(&second, 300, 400)];

        // 3 o'clock on the ring is minute 180
        let hit = hit_test_ring((0.0, 0.0), (100.0, 0.0), 100.0, 20.0, &segments);
        assert_eq!(hit.map(|e| e.id.as_str()), Some("first"));

        // Overlap resolves to the last drawn segment
        let angle = minute_angle(330.0);
        let p = (100.0 * angle.cos(), 100.0 * angle.sin());
        let hit = hit_test_ring((0.0, 0.0), p, 100.0, 20.0, &segments);
        assert_eq!(hit.map(|e| e.id.as_str()), Some("second"));

        // Off the stroke
        assert!(hit_test_ring((0.0, 0.0), (50.0, 0.0), 100.0, 20.0, &segments).is_none());
        // On the stroke but in an empty part of the ring
        assert!(hit_test_ring((0.0, 0.0), (-100.0, 0.0), 100.0, 20.0, &segments).is_none());
    }

    #[test]
    fn test_hour_labels() {
        let (x, y) = hour_label_position((0.0, 0.0), 10.0, 6);
        assert!(x.abs() < 1e-4 && (y + 10.0).abs() < 1e-4);
    }
}
