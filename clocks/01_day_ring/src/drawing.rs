//! Drawing module for the Day Ring
//!
//! Renders the two-ring dial with its event arcs and live hands, the two-row
//! timeline, and the error banner. All colors come from the active theme.

use chrono::NaiveDateTime;
use nannou::prelude::*;
use shared::{
    arc_points, bar_position, dash_props, format_time, hour_hand_pos, hour_label_position,
    minute_hand_pos, parse_hex, resolve_color, BarLabel, HandPos, Selection, Theme, Track,
    TrackSegment,
};

use crate::stage::{DialGeometry, TimelineGeometry};

/// Samples per full ring; arcs use a share of these
const RING_SAMPLES: f32 = 240.0;
/// Alpha of segments that are not selected while something is
const DIMMED_ALPHA: u8 = 90;

/// Fallback for malformed theme colors
const FALLBACK: (u8, u8, u8) = (128, 128, 128);

/// Theme hex color with alpha
pub fn hex_color(hex: &str, alpha: u8) -> Srgba<u8> {
    let (r, g, b) = parse_hex(hex).unwrap_or(FALLBACK);
    srgba(r, g, b, alpha)
}

/// Window background: the theme's background if it is a color, else its UI background
pub fn background_color(theme: &Theme) -> Srgba<u8> {
    let hex = if parse_hex(&theme.background).is_some() {
        &theme.background
    } else {
        &theme.ui_color_scheme.background_color
    };
    hex_color(hex, 255)
}

fn segment_alpha(segment: &TrackSegment<'_>, selection: &Selection) -> u8 {
    if selection.is_dimmed(&segment.event.id) {
        DIMMED_ALPHA
    } else {
        255
    }
}

/// Draw the glass dial, both rings with their arcs, and the hour numbers
pub fn draw_dial(
    draw: &Draw,
    geometry: &DialGeometry,
    segments: &[TrackSegment<'_>],
    selection: &Selection,
    theme: &Theme,
) {
    let layout = &geometry.layout;
    let ui = &theme.ui_color_scheme;
    let center = pt2(geometry.cx, geometry.cy);

    // Glass face with a soft shadow
    draw.ellipse()
        .xy(center + vec2(0.0, -3.0 * layout.scale))
        .radius(layout.dial_radius)
        .color(hex_color(&ui.glass_shadow, 120));
    draw.ellipse()
        .xy(center)
        .radius(layout.dial_radius)
        .color(hex_color(&ui.glass_highlight, 200))
        .stroke(hex_color(&ui.tick_secondary, 255))
        .stroke_weight(1.0);

    // Empty tracks
    for track in Track::BOTH {
        draw.ellipse()
            .xy(center)
            .radius(geometry.ring_radius(track))
            .no_fill()
            .stroke(hex_color(&ui.tick_secondary, 110))
            .stroke_weight(layout.ring_stroke);
    }

    // Event arcs, in arrival order so the last one is on top
    for segment in segments {
        let radius = geometry.ring_radius(segment.track);
        let color = resolve_color(segment.event.color, &theme.color_scheme);
        draw_arc(
            draw,
            geometry.center(),
            radius,
            layout.ring_stroke,
            segment,
            hex_color(color, segment_alpha(segment, selection)),
        );
    }

    // Hole
    draw.ellipse()
        .xy(center)
        .radius(layout.hole_radius)
        .color(hex_color(&ui.center_fill, 235))
        .stroke(hex_color(&ui.center_stroke, 255))
        .stroke_weight(1.0);

    draw_hour_numbers(draw, geometry, theme);
}

/// Stroke one segment along its ring with rounded ends
fn draw_arc(
    draw: &Draw,
    center: (f32, f32),
    radius: f32,
    weight: f32,
    segment: &TrackSegment<'_>,
    color: Srgba<u8>,
) {
    let dash = dash_props(segment, radius);
    let samples = (RING_SAMPLES * dash.dash_length / dash.circumference).ceil() as usize + 2;
    let points = arc_points(center, radius, &dash, samples);

    draw.polyline()
        .weight(weight)
        .color(color)
        .points(points.iter().map(|&(x, y)| pt2(x, y)));

    // Round caps
    for &(x, y) in [points.first(), points.last()].into_iter().flatten() {
        draw.ellipse().x_y(x, y).radius(weight / 2.0).color(color);
    }
}

/// 0-11 inside the inner ring and 12-23 outside the outer ring
fn draw_hour_numbers(draw: &Draw, geometry: &DialGeometry, theme: &Theme) {
    let layout = &geometry.layout;
    let ui = &theme.ui_color_scheme;
    let inner_radius = layout.hole_radius - layout.hour_font as f32;
    let outer_radius =
        layout.outer_ring_radius + layout.ring_stroke / 2.0 + layout.hour_font as f32;

    for index in 0..12 {
        let (x, y) = hour_label_position(geometry.center(), inner_radius, index);
        draw.text(&index.to_string())
            .x_y(x, y)
            .color(hex_color(&ui.text_secondary, 255))
            .font_size(layout.hour_font);

        let (x, y) = hour_label_position(geometry.center(), outer_radius, index);
        draw.text(&(index + 12).to_string())
            .x_y(x, y)
            .color(hex_color(&ui.text_primary, 255))
            .font_size(layout.hour_font);
    }
}

/// Core hand positions grow downwards; nannou grows upwards
fn flip(geometry: &DialGeometry, pos: HandPos) -> Point2 {
    pt2(geometry.cx + pos.x, geometry.cy - pos.y)
}

/// Draw the hour and minute hands for `now` plus the center cap
pub fn draw_hands(draw: &Draw, geometry: &DialGeometry, now: &NaiveDateTime, theme: &Theme) {
    let layout = &geometry.layout;
    let ui = &theme.ui_color_scheme;
    let center = pt2(geometry.cx, geometry.cy);
    let origin = (0.0, 0.0);

    let hour = flip(geometry, hour_hand_pos(now, origin, layout.outer_ring_radius));
    let minute = flip(geometry, minute_hand_pos(now, origin, layout.outer_ring_radius));

    draw.line()
        .start(center)
        .end(hour)
        .stroke_weight(layout.hour_hand_width)
        .caps_round()
        .color(hex_color(&ui.clock_hand_primary, 255));
    draw.line()
        .start(center)
        .end(minute)
        .stroke_weight(layout.minute_hand_width)
        .caps_round()
        .color(hex_color(&ui.clock_hand_secondary, 255));

    draw.ellipse()
        .xy(center)
        .radius(layout.center_cap)
        .color(hex_color(&ui.center_fill, 255))
        .stroke(hex_color(&ui.center_stroke, 255))
        .stroke_weight(2.0);

    // Digital readout below the cap
    draw.text(&format_time(now))
        .xy(center + vec2(0.0, -layout.hole_radius * 0.45))
        .color(hex_color(&ui.text_secondary, 255))
        .font_size((layout.hour_font as f32 * 1.2) as u32);
}

/// Draw the AM and PM rows with their bars
pub fn draw_timeline(
    draw: &Draw,
    geometry: &TimelineGeometry,
    segments: &[TrackSegment<'_>],
    selection: &Selection,
    theme: &Theme,
) {
    let ui = &theme.ui_color_scheme;

    for track in Track::BOTH {
        let y = geometry.row_y(track);

        // Row background
        draw.rect()
            .x_y(geometry.left + geometry.width / 2.0, y)
            .w_h(geometry.width, geometry.row_height)
            .color(hex_color(&ui.glass_highlight, 160))
            .stroke(hex_color(&ui.tick_secondary, 255))
            .stroke_weight(1.0);

        let label = match track {
            Track::Inner => "AM",
            Track::Outer => "PM",
        };
        draw.text(label)
            .x_y(geometry.left - 24.0, y)
            .color(hex_color(&ui.text_primary, 255))
            .font_size(13);

        // Hour ticks with numbers above the row
        for hour in 0..=12u32 {
            let x = geometry.x_at_percent(hour as f32 / 12.0 * 100.0);
            let top = y + geometry.row_height / 2.0;
            draw.line()
                .start(pt2(x, top))
                .end(pt2(x, top + 5.0))
                .stroke_weight(1.0)
                .color(hex_color(&ui.tick_primary, 255));
            if hour < 12 {
                draw.text(&(hour + track.hour_offset()).to_string())
                    .x_y(x, top + 14.0)
                    .color(hex_color(&ui.text_secondary, 255))
                    .font_size(10);
            }
        }
    }

    for segment in segments {
        draw_bar(draw, geometry, segment, selection, theme);
    }
}

fn draw_bar(
    draw: &Draw,
    geometry: &TimelineGeometry,
    segment: &TrackSegment<'_>,
    selection: &Selection,
    theme: &Theme,
) {
    let position = bar_position(segment);
    let left = geometry.x_at_percent(position.left_percent);
    let width = geometry.width * position.width_percent / 100.0;
    let y = geometry.row_y(segment.track);
    let height = geometry.row_height - 6.0;
    let alpha = segment_alpha(segment, selection);

    let color = resolve_color(segment.event.color, &theme.color_scheme);
    draw.rect()
        .x_y(left + width / 2.0, y)
        .w_h(width.max(1.0), height)
        .color(hex_color(color, alpha));

    if selection.is_selected(&segment.event.id) {
        draw.rect()
            .x_y(left + width / 2.0, y)
            .w_h(width.max(1.0), height)
            .no_fill()
            .stroke(hex_color(&theme.ui_color_scheme.accent, 255))
            .stroke_weight(2.0);
    }

    let text_color = hex_color(&theme.ui_color_scheme.text_primary, alpha);
    let Some(label) = BarLabel::for_width(position.width_percent).text(segment.event) else {
        return;
    };
    draw.text(&label)
        .x_y(left + width / 2.0, y)
        .w(width - 6.0)
        .color(text_color)
        .font_size(11);
}

/// Draw an error banner under the navigation bar
pub fn draw_error_banner(draw: &Draw, window_rect: Rect, message: &str) {
    let banner_height = 32.0;
    let banner_y = window_rect.top() - crate::stage::NAV_BAR_HEIGHT - banner_height / 2.0;

    draw.rect()
        .x_y(0.0, banner_y)
        .w_h(window_rect.w(), banner_height)
        .color(srgba(120u8, 40u8, 40u8, 220u8));

    draw.text(&format!("⚠ {}", message))
        .x_y(0.0, banner_y)
        .color(srgba(255u8, 255u8, 255u8, 255u8))
        .font_size(13)
        .w(window_rect.w() - 40.0);
}
