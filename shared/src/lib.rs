//! Shared core for the Day Ring calendar
//!
//! Turns a day's events into clipped half-day segments and from there into
//! ring and bar geometry, computes live clock hands, and keeps the small bits
//! of state the views share: selection, scale, navigation, cache and options.

pub mod arc;
pub mod cache;
pub mod config;
pub mod dates;
pub mod event;
pub mod hands;
pub mod mapper;
pub mod navigation;
pub mod scale;
pub mod selection;
pub mod store;
pub mod theme;
pub mod ticker;
pub mod track;

pub use arc::{
    arc_points, bar_position, dash_props, hit_test_bar, hit_test_ring, hour_label_position,
    BarLabel, BarPosition, DashProps,
};
pub use cache::{EventClient, ProjectionCache, QueryKey, KEEP_DAYS};
pub use config::{
    config_dir, config_path, delete_config, events_path, exports_dir, load_config, save_config,
    ConfigError, DayRingConfig,
};
pub use dates::{
    add_days, day_label, format_iso_date, format_time, get_monday, minutes_from_midnight,
    parse_iso_date, week_days,
};
pub use event::{CalendarEvent, DayEvents, DraftError, EventColor, EventDraft, EventId, WeekEvents};
pub use hands::{hour_hand_pos, minute_hand_pos, HandPos};
pub use mapper::{day_to_json, export_day, MapError};
pub use navigation::{Route, ViewMode, ViewState};
pub use scale::{DialLayout, ScaleAdapter};
pub use selection::Selection;
pub use store::{EventService, LocalEventStore, StoreError};
pub use theme::{builtin_themes, parse_hex, resolve_color, theme_by_id, Theme};
pub use ticker::{ClockTicker, WallClock, TICK_INTERVAL};
pub use track::{project_day, project_to_track, project_track, Track, TrackSegment, TRACK_MINUTES};
