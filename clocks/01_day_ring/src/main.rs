//! Day Ring
//!
//! A personal calendar drawn as a 24-hour clock: the inner ring holds the
//! morning (00:00-11:59) and the outer ring the afternoon and evening
//! (12:00-23:59). A two-row timeline and a week list show the same events.

mod drawing;
mod stage;
mod ui;

use chrono::NaiveDateTime;
use log::{info, warn};
use nannou::prelude::*;
use nannou_egui::{self, Egui};
use shared::{
    delete_config, events_path, export_day, exports_dir, project_day, theme_by_id, ClockTicker,
    DayEvents, DayRingConfig, EventClient, LocalEventStore, Route, ScaleAdapter, Selection, Theme,
    ViewMode, ViewState, WallClock, WeekEvents, TICK_INTERVAL,
};

use crate::stage::{DialGeometry, TimelineGeometry, STAGE_PADDING};
use crate::ui::{DeleteResult, EventForm, FormResult, NavState, OptionsState};

fn main() {
    env_logger::init();
    nannou::app(model).update(update).run();
}

/// Application state
pub struct Model {
    client: EventClient<LocalEventStore>,
    config: DayRingConfig,
    theme: Theme,
    wall_clock: WallClock,
    /// Running only while the clock view is shown
    ticker: Option<ClockTicker>,
    now: NaiveDateTime,
    view: ViewState,
    selection: Selection,
    scale: ScaleAdapter,
    /// Snapshot of the displayed day
    day: Option<DayEvents>,
    /// Snapshot of the displayed week
    week: Option<WeekEvents>,
    nav_state: NavState,
    form: EventForm,
    options_state: OptionsState,
    /// Id of the event awaiting delete confirmation
    pending_delete: Option<String>,
    error_message: Option<String>,
    /// egui wants the pointer; suppress stage clicks
    pointer_over_ui: bool,
    /// A text field has focus; suppress shortcuts
    keyboard_over_ui: bool,
    egui: Egui,
}

impl Model {
    /// Reload the snapshots for the displayed date
    fn refresh(&mut self) {
        let date = self.view.date;
        self.day = match self.client.day(date) {
            Ok(day) => Some(day.clone()),
            Err(e) => {
                warn!("Failed to load {}: {}", date, e);
                self.error_message = Some(format!("Could not load events: {}", e));
                None
            }
        };
        self.week = match self.client.week(date) {
            Ok(week) => Some(week.clone()),
            Err(e) => {
                warn!("Failed to load week of {}: {}", date, e);
                None
            }
        };
    }

    /// Apply a date change to the selection and reload
    fn after_navigation(&mut self, changed: bool) {
        if changed {
            self.selection.on_date_changed(self.view.date);
        }
        self.sync_ticker();
        self.refresh();
    }

    fn set_mode(&mut self, mode: ViewMode) {
        self.view.set_mode(mode);
        self.sync_ticker();
    }

    fn open_route(&mut self, route: Route) {
        let today = self.wall_clock.today();
        let changed = self.view.open(route, today);
        self.after_navigation(changed);
    }

    /// Start the ticker in clock view and stop it everywhere else
    fn sync_ticker(&mut self) {
        let wanted = self.view.mode == ViewMode::Clock;
        match (wanted, self.ticker.is_some()) {
            (true, false) => match ClockTicker::start(self.wall_clock, TICK_INTERVAL) {
                Ok(ticker) => {
                    self.now = ticker.now();
                    self.ticker = Some(ticker);
                }
                Err(e) => {
                    warn!("Failed to start clock ticker: {}", e);
                    self.error_message = Some("Live clock unavailable".to_string());
                }
            },
            // Dropping the ticker joins its thread
            (false, true) => self.ticker = None,
            _ => {}
        }
    }

    fn open_create_form(&mut self) {
        self.form.open_create(self.view.date, self.now);
    }

    fn submit_form(&mut self, draft: shared::EventDraft, editing: Option<String>) {
        let result = match editing {
            Some(id) => self.client.update(draft.into_event(id)),
            None => self.client.create(draft),
        };
        match result {
            Ok(event) => {
                info!("Saved event {} ({})", event.id, event.title);
                self.form.close();
                self.error_message = None;
                self.refresh();
            }
            Err(e) => {
                warn!("Failed to save event: {}", e);
                self.form.error = Some(e.to_string());
            }
        }
    }

    fn confirm_delete(&mut self, id: &str) {
        match self.client.delete(id) {
            Ok(()) => {
                info!("Deleted event {}", id);
                if self.selection.is_selected(id) {
                    self.selection.clear();
                }
                self.error_message = None;
                self.refresh();
            }
            Err(e) => {
                warn!("Failed to delete event {}: {}", id, e);
                self.error_message = Some(format!("Could not delete event: {}", e));
            }
        }
        self.pending_delete = None;
    }

    /// Write the displayed day to the exports directory as JSON
    fn export_displayed_day(&mut self) {
        let Some(day) = self.day.as_ref().filter(|_| self.view.is_day_view()) else {
            return;
        };
        let result = exports_dir()
            .map_err(|e| e.to_string())
            .and_then(|dir| export_day(&dir, day, self.wall_clock).map_err(|e| e.to_string()));
        match result {
            Ok(_) => self.error_message = None,
            Err(e) => {
                warn!("Failed to export {}: {}", day.date, e);
                self.error_message = Some(format!("Could not export day: {}", e));
            }
        }
    }

    fn apply_config(&mut self) {
        self.theme = theme_by_id(&self.config.theme_id);
        let clock = self.config.wall_clock();
        if clock != self.wall_clock {
            self.wall_clock = clock;
            // Restart so ticks come from the new zone
            self.ticker = None;
            self.now = clock.now();
            self.sync_ticker();
        }
    }

    fn save_config(&mut self) {
        self.apply_config();
        if let Err(e) = self.config.save() {
            warn!("Failed to save options: {}", e);
            self.error_message = Some(format!("Could not save options: {}", e));
        }
    }

    fn reset_config(&mut self) {
        if let Err(e) = delete_config(shared::config::OPTIONS_NAME) {
            warn!("Failed to delete options: {}", e);
        }
        self.config = DayRingConfig::default();
        self.apply_config();
    }
}

fn open_store() -> (LocalEventStore, Option<String>) {
    let opened = events_path()
        .map_err(|e| e.to_string())
        .and_then(|path| LocalEventStore::open(path).map_err(|e| e.to_string()));
    match opened {
        Ok(store) => {
            info!("Loaded {} events", store.len());
            (store, None)
        }
        Err(e) => {
            warn!("Event store unavailable, changes will not be saved: {}", e);
            (
                LocalEventStore::in_memory(),
                Some("Events are not being saved".to_string()),
            )
        }
    }
}

fn model(app: &App) -> Model {
    // Escape clears selection instead of quitting
    app.set_exit_on_escape(false);

    let window_id = app
        .new_window()
        .title("Day Ring")
        .size(900, 760)
        .min_size(480, 520)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .resized(resized)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let config = DayRingConfig::load_or_default();
    let wall_clock = config.wall_clock();
    let theme = theme_by_id(&config.theme_id);
    let (store, error_message) = open_store();
    let now = wall_clock.now();

    let mut model = Model {
        client: EventClient::new(store),
        theme,
        wall_clock,
        ticker: None,
        now,
        view: ViewState::new(config.default_view, now.date()),
        config,
        selection: Selection::new(),
        scale: ScaleAdapter::new(),
        day: None,
        week: None,
        nav_state: NavState::default(),
        form: EventForm::default(),
        options_state: OptionsState::default(),
        pending_delete: None,
        error_message,
        pointer_over_ui: false,
        keyboard_over_ui: false,
        egui,
    };

    let rect = window.rect();
    resize_stage(&mut model, rect);
    model.after_navigation(true);
    model
}

fn resize_stage(model: &mut Model, window_rect: Rect) {
    let stage = stage::stage_rect(window_rect);
    model.scale.measure(
        stage.w() - 2.0 * STAGE_PADDING,
        stage.h() - 2.0 * STAGE_PADDING,
    );
}

fn update(_app: &App, model: &mut Model, update: Update) {
    if let Some(ticker) = model.ticker.as_mut() {
        if let Some(now) = ticker.poll() {
            model.now = now;
        }
    }

    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let nav = ui::draw_nav_bar(&ctx, &mut model.nav_state, &model.view);

    let selected = model
        .day
        .as_ref()
        .and_then(|day| model.selection.selected_event(day));
    let card = match selected {
        Some(event) if model.view.is_day_view() => {
            Some((event.clone(), ui::draw_event_card(&ctx, event, &model.theme)))
        }
        _ => None,
    };

    let week = match (model.view.mode, model.week.as_ref()) {
        (ViewMode::Week, Some(week)) => Some(ui::draw_week_list(
            &ctx,
            week,
            &model.theme,
            model.wall_clock.today(),
        )),
        _ => None,
    };

    let options = if model.view.mode == ViewMode::Options {
        Some(ui::draw_options(
            &ctx,
            &mut model.options_state,
            &mut model.config,
        ))
    } else {
        None
    };

    let form = ui::draw_event_form(&ctx, &mut model.form, &model.theme);

    let pending = model
        .pending_delete
        .as_deref()
        .and_then(|id| model.day.as_ref().and_then(|day| day.find(id)));
    let pending_missing = model.pending_delete.is_some() && pending.is_none();
    let delete = ui::draw_delete_confirm(&ctx, pending);

    model.pointer_over_ui = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
    model.keyboard_over_ui = ctx.wants_keyboard_input();
    drop(ctx);

    // The event went away underneath the dialog
    if pending_missing {
        model.pending_delete = None;
    }

    // Apply UI results
    if let Some(mode) = nav.set_mode {
        model.set_mode(mode);
        model.refresh();
    }
    if nav.previous {
        let changed = model.view.previous();
        model.after_navigation(changed);
    }
    if nav.next {
        let changed = model.view.next();
        model.after_navigation(changed);
    }
    if nav.today {
        let today = model.wall_clock.today();
        let changed = model.view.today(today);
        model.after_navigation(changed);
    }
    if let Some(route) = nav.open_route {
        model.open_route(route);
    }
    if nav.new_event {
        model.open_create_form();
    }
    if nav.export {
        model.export_displayed_day();
    }

    if let Some((event, card)) = card {
        if card.close {
            model.selection.clear();
        }
        if card.edit {
            model.form.open_edit(&event);
        }
        if card.delete {
            model.pending_delete = Some(event.id.clone());
        }
    }

    if let Some(week) = week {
        if let Some(date) = week.open_day {
            model.open_route(Route::Day(date));
        }
        if let Some(event) = week.edit_event {
            model.form.open_edit(&event);
        }
    }

    if let Some(options) = options {
        if options.reset {
            model.reset_config();
        } else if options.changed {
            model.save_config();
        }
    }

    match form {
        FormResult::Submit { draft, editing } => model.submit_form(draft, editing),
        FormResult::Cancel => model.form.close(),
        FormResult::None => {}
    }

    match delete {
        DeleteResult::Confirm(id) => model.confirm_delete(&id),
        DeleteResult::Cancel => model.pending_delete = None,
        DeleteResult::None => {}
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    draw.background().color(drawing::background_color(&model.theme));

    if let Some(day) = model.day.as_ref() {
        let segments = project_day(day);
        match model.view.mode {
            ViewMode::Clock => {
                let geometry = DialGeometry::calculate(window_rect, &model.scale);
                drawing::draw_dial(&draw, &geometry, &segments, &model.selection, &model.theme);
                drawing::draw_hands(&draw, &geometry, &model.now, &model.theme);
            }
            ViewMode::Linear => {
                let geometry = TimelineGeometry::calculate(window_rect);
                drawing::draw_timeline(&draw, &geometry, &segments, &model.selection, &model.theme);
            }
            ViewMode::Week | ViewMode::Options => {}
        }
    }

    if let Some(ref message) = model.error_message {
        drawing::draw_error_banner(&draw, window_rect, message);
    }

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    if model.keyboard_over_ui {
        return;
    }
    let dialog_open = model.form.is_open || model.pending_delete.is_some();

    match key {
        Key::Left if !dialog_open => {
            let changed = model.view.previous();
            model.after_navigation(changed);
        }
        Key::Right if !dialog_open => {
            let changed = model.view.next();
            model.after_navigation(changed);
        }
        Key::T if !dialog_open => model.open_route(Route::Today),
        Key::C if !dialog_open => {
            model.set_mode(ViewMode::Clock);
            model.refresh();
        }
        Key::L if !dialog_open => {
            model.set_mode(ViewMode::Linear);
            model.refresh();
        }
        Key::W if !dialog_open => {
            model.set_mode(ViewMode::Week);
            model.refresh();
        }
        Key::N if !dialog_open => model.open_create_form(),
        Key::E if !dialog_open => model.export_displayed_day(),
        Key::Delete | Key::Back if !dialog_open => {
            if let Some(id) = model.selection.selected_id() {
                model.pending_delete = Some(id.to_string());
            }
        }
        Key::Escape => {
            if model.form.is_open {
                model.form.close();
            } else if model.pending_delete.is_some() {
                model.pending_delete = None;
            } else {
                model.selection.clear();
            }
        }
        Key::Q if app.keys.mods.ctrl() => app.quit(),
        _ => {}
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left || model.pointer_over_ui || !model.view.is_day_view() {
        return;
    }
    let Some(day) = model.day.as_ref() else {
        return;
    };

    let pos = app.mouse.position();
    let window_rect = app.window_rect();
    let segments = project_day(day);

    let hit = match model.view.mode {
        ViewMode::Clock => {
            DialGeometry::calculate(window_rect, &model.scale).hit_test(pos.x, pos.y, &segments)
        }
        _ => TimelineGeometry::calculate(window_rect).hit_test(pos.x, pos.y, &segments),
    };

    let hit = hit.map(|event| event.id.clone());
    model.selection.click(hit.as_deref(), model.view.mode);
}

fn resized(app: &App, model: &mut Model, _size: Vec2) {
    resize_stage(model, app.window_rect());
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);

    // Catch up on the clock after the window regains focus
    if let nannou::winit::event::WindowEvent::Focused(true) = event {
        model.now = model.wall_clock.now();
    }
}
