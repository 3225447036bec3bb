//! Stage geometry for the Day Ring
//!
//! Places the dial and the two timeline rows inside the window area left free
//! by the egui panels, and maps pointer positions back to events.

use nannou::prelude::*;
use shared::{
    hit_test_bar, hit_test_ring, CalendarEvent, DialLayout, ScaleAdapter, Track, TrackSegment,
    TRACK_MINUTES,
};

/// Height reserved for the navigation bar
pub const NAV_BAR_HEIGHT: f32 = 40.0;
/// Height reserved for the selected-event card
pub const CARD_HEIGHT: f32 = 70.0;
/// Space around the dial and the timeline
pub const STAGE_PADDING: f32 = 24.0;

/// Free drawing area between the panels
pub fn stage_rect(window_rect: Rect) -> Rect {
    let h = (window_rect.h() - NAV_BAR_HEIGHT - CARD_HEIGHT).max(0.0);
    let y = window_rect.bottom() + CARD_HEIGHT + h / 2.0;
    Rect::from_x_y_w_h(window_rect.x(), y, window_rect.w(), h)
}

/// Clock face placement
#[derive(Debug, Clone, Copy)]
pub struct DialGeometry {
    pub cx: f32,
    pub cy: f32,
    pub layout: DialLayout,
}

impl DialGeometry {
    pub fn calculate(window_rect: Rect, scale: &ScaleAdapter) -> Self {
        let stage = stage_rect(window_rect);
        Self {
            cx: stage.x(),
            cy: stage.y(),
            layout: scale.layout(),
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.cx, self.cy)
    }

    /// Ring radius for a track
    pub fn ring_radius(&self, track: Track) -> f32 {
        match track {
            Track::Inner => self.layout.inner_ring_radius,
            Track::Outer => self.layout.outer_ring_radius,
        }
    }

    /// Event under the pointer, outer ring checked first
    pub fn hit_test<'a>(
        &self,
        x: f32,
        y: f32,
        segments: &[TrackSegment<'a>],
    ) -> Option<&'a CalendarEvent> {
        [Track::Outer, Track::Inner].into_iter().find_map(|track| {
            let on_track: Vec<TrackSegment<'a>> = segments
                .iter()
                .filter(|seg| seg.track == track)
                .copied()
                .collect();
            hit_test_ring(
                self.center(),
                (x, y),
                self.ring_radius(track),
                self.layout.ring_stroke,
                &on_track,
            )
        })
    }
}

/// Two-row timeline placement
#[derive(Debug, Clone, Copy)]
pub struct TimelineGeometry {
    pub left: f32,
    pub width: f32,
    pub row_height: f32,
    /// Vertical center of the AM row
    pub inner_y: f32,
    /// Vertical center of the PM row
    pub outer_y: f32,
}

impl TimelineGeometry {
    pub fn calculate(window_rect: Rect) -> Self {
        let stage = stage_rect(window_rect);
        let width = (stage.w() - 2.0 * STAGE_PADDING - 40.0).max(1.0);
        let left = stage.left() + STAGE_PADDING + 40.0;
        let row_height = (stage.h() / 6.0).clamp(24.0, 64.0);
        let gap = row_height;

        Self {
            left,
            width,
            row_height,
            inner_y: stage.y() + (row_height + gap) / 2.0,
            outer_y: stage.y() - (row_height + gap) / 2.0,
        }
    }

    pub fn row_y(&self, track: Track) -> f32 {
        match track {
            Track::Inner => self.inner_y,
            Track::Outer => self.outer_y,
        }
    }

    /// X coordinate of a percentage along a row
    pub fn x_at_percent(&self, percent: f32) -> f32 {
        self.left + self.width * percent / 100.0
    }

    /// Row under `y`, if any
    pub fn row_at(&self, y: f32) -> Option<Track> {
        Track::BOTH
            .into_iter()
            .find(|&track| (y - self.row_y(track)).abs() <= self.row_height / 2.0)
    }

    /// Minute in track under `x`, if inside the row span
    pub fn minute_at(&self, x: f32) -> Option<f32> {
        let fraction = (x - self.left) / self.width;
        (0.0..1.0)
            .contains(&fraction)
            .then(|| fraction * TRACK_MINUTES as f32)
    }

    /// Event under the pointer
    pub fn hit_test<'a>(
        &self,
        x: f32,
        y: f32,
        segments: &[TrackSegment<'a>],
    ) -> Option<&'a CalendarEvent> {
        let track = self.row_at(y)?;
        let minute = self.minute_at(x)?;
        let on_track: Vec<TrackSegment<'a>> = segments
            .iter()
            .filter(|seg| seg.track == track)
            .copied()
            .collect();
        hit_test_bar(&on_track, minute)
    }
}
