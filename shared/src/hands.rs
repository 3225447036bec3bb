//! Clock hand endpoints
//!
//! Angles follow screen convention (y grows downwards) with a -90° offset so
//! that 12:00 points straight up. Renderers with a y-up space flip `y` around
//! the center.

use std::f32::consts::{FRAC_PI_2, TAU};

use chrono::Timelike;

/// Hour hand length relative to the outer ring radius
pub const HOUR_HAND_RATIO: f32 = 0.55;
/// Minute hand length relative to the outer ring radius
pub const MINUTE_HAND_RATIO: f32 = 0.85;

/// Endpoint of a hand in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPos {
    pub x: f32,
    pub y: f32,
}

/// Hour hand angle in radians; advances smoothly with the minutes
pub fn hour_hand_angle<T: Timelike>(now: &T) -> f32 {
    let hour = (now.hour() % 12) as f32;
    let minute = now.minute() as f32;
    ((hour + minute / 60.0) / 12.0) * TAU - FRAC_PI_2
}

/// Minute hand angle in radians
pub fn minute_hand_angle<T: Timelike>(now: &T) -> f32 {
    (now.minute() as f32 / 60.0) * TAU - FRAC_PI_2
}

fn endpoint(center: (f32, f32), angle: f32, length: f32) -> HandPos {
    HandPos {
        x: center.0 + angle.cos() * length,
        y: center.1 + angle.sin() * length,
    }
}

pub fn hour_hand_pos<T: Timelike>(now: &T, center: (f32, f32), outer_radius: f32) -> HandPos {
    endpoint(center, hour_hand_angle(now), outer_radius * HOUR_HAND_RATIO)
}

pub fn minute_hand_pos<T: Timelike>(now: &T, center: (f32, f32), outer_radius: f32) -> HandPos {
    endpoint(center, minute_hand_angle(now), outer_radius * MINUTE_HAND_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn close(a: HandPos, b: HandPos) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_noon_points_up() {
        let hour = hour_hand_pos(&t(12, 0), (180.0, 180.0), 120.0);
        assert!(close(hour, HandPos { x: 180.0, y: 180.0 - 66.0 }));
        let minute = minute_hand_pos(&t(12, 0), (180.0, 180.0), 120.0);
        assert!(close(minute, HandPos { x: 180.0, y: 180.0 - 102.0 }));
    }

    #[test]
    fn test_three_oclock_points_right() {
        let hour = hour_hand_pos(&t(3, 0), (0.0, 0.0), 100.0);
        assert!(close(hour, HandPos { x: 55.0, y: 0.0 }));
        let minute = minute_hand_pos(&t(3, 15), (0.0, 0.0), 100.0);
        assert!(close(minute, HandPos { x: 85.0, y: 0.0 }));
    }

    #[test]
    fn test_minute_hand_period() {
        // Minute 0 of consecutive hours lands on the same spot
        for h in 0..23 {
            let a = minute_hand_pos(&t(h, 0), (0.0, 0.0), 100.0);
            let b = minute_hand_pos(&t(h + 1, 0), (0.0, 0.0), 100.0);
            assert!(close(a, b));
        }
    }

    #[test]
    fn test_hour_hand_twelve_hour_period() {
        for h in 0..12 {
            for m in [0, 17, 45] {
                let a = hour_hand_pos(&t(h, m), (0.0, 0.0), 100.0);
                let b = hour_hand_pos(&t(h + 12, m), (0.0, 0.0), 100.0);
                assert!(close(a, b));
            }
        }
    }

    #[test]
    fn test_hour_hand_advances_with_minutes() {
        let on_the_hour = hour_hand_angle(&t(2, 0));
        let half_past = hour_hand_angle(&t(2, 30));
        let step = TAU / 24.0;
        assert!((half_past - on_the_hour - step).abs() < 1e-5);
    }
}
