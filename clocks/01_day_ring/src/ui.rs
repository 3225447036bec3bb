//! UI module - egui panels for navigation, event details, forms, week list and options
//!
//! Every panel returns a small result struct; `main.rs` applies the results after
//! the egui frame ends.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use nannou_egui::egui;
use shared::{
    builtin_themes, day_label, format_iso_date, format_time, parse_hex, parse_iso_date,
    resolve_color, CalendarEvent, DayRingConfig, EventColor, EventDraft, EventId, Route, Theme,
    ViewMode, ViewState, WeekEvents,
};

/// Convert a theme hex color for egui, gray when malformed
pub fn to_color32(hex: &str) -> egui::Color32 {
    match parse_hex(hex) {
        Some((r, g, b)) => egui::Color32::from_rgb(r, g, b),
        None => egui::Color32::GRAY,
    }
}

/// State for the navigation bar
#[derive(Default)]
pub struct NavState {
    /// Text of the "go to" field
    pub path_input: String,
}

/// Result of navigation bar interactions
#[derive(Default)]
pub struct NavResult {
    pub set_mode: Option<ViewMode>,
    pub previous: bool,
    pub next: bool,
    pub today: bool,
    pub open_route: Option<Route>,
    pub new_event: bool,
    pub export: bool,
}

/// Draw the navigation bar (top)
pub fn draw_nav_bar(ctx: &egui::Context, nav: &mut NavState, view: &ViewState) -> NavResult {
    let mut result = NavResult::default();

    egui::TopBottomPanel::top("nav_bar")
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for mode in ViewMode::ALL {
                    if ui.selectable_label(view.mode == mode, mode.label()).clicked() {
                        result.set_mode = Some(mode);
                    }
                }

                ui.separator();

                if view.mode != ViewMode::Options {
                    if ui.button("◀").on_hover_text("Previous (←)").clicked() {
                        result.previous = true;
                    }
                    if ui.button("Today").on_hover_text("T").clicked() {
                        result.today = true;
                    }
                    if ui.button("▶").on_hover_text("Next (→)").clicked() {
                        result.next = true;
                    }

                    let heading = if view.mode == ViewMode::Week {
                        format!("Week of {}", format_iso_date(shared::get_monday(view.date)))
                    } else {
                        day_label(view.date)
                    };
                    ui.label(egui::RichText::new(heading).strong());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("+ New event").on_hover_text("N").clicked() {
                        result.new_event = true;
                    }
                    if view.is_day_view()
                        && ui.button("Export").on_hover_text("Save day as JSON (E)").clicked()
                    {
                        result.export = true;
                    }
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut nav.path_input)
                            .hint_text(view.path())
                            .desired_width(110.0),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        result.open_route = Some(Route::parse(&nav.path_input));
                        nav.path_input.clear();
                    }
                    ui.label("Go to:");
                });
            });
        });

    result
}

/// Result of event card interactions
#[derive(Default)]
pub struct CardResult {
    pub edit: bool,
    pub delete: bool,
    pub close: bool,
}

/// Draw the detail card for the selected event (bottom)
pub fn draw_event_card(ctx: &egui::Context, event: &CalendarEvent, theme: &Theme) -> CardResult {
    let mut result = CardResult::default();
    let text_color = to_color32(&theme.ui_color_scheme.text_primary);

    egui::TopBottomPanel::bottom("event_card")
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let swatch = to_color32(resolve_color(event.color, &theme.color_scheme));
                ui.label(egui::RichText::new("●").size(20.0).color(swatch));

                ui.vertical(|ui| {
                    ui.label(
                        egui::RichText::new(&event.title)
                            .size(16.0)
                            .strong()
                            .color(text_color),
                    );
                    ui.label(
                        egui::RichText::new(format!(
                            "{} - {}",
                            format_time(&event.start),
                            format_time(&event.end)
                        ))
                        .size(13.0)
                        .color(to_color32(&theme.ui_color_scheme.text_secondary)),
                    );
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("✕").on_hover_text("Close (Esc)").clicked() {
                        result.close = true;
                    }
                    if ui.button("Delete").clicked() {
                        result.delete = true;
                    }
                    if ui.button("Edit").clicked() {
                        result.edit = true;
                    }
                });
            });
            ui.add_space(6.0);
        });

    result
}

/// Create/update form state
#[derive(Default)]
pub struct EventForm {
    pub is_open: bool,
    /// Id of the event being edited; `None` when creating
    pub editing: Option<EventId>,
    pub title: String,
    pub date: String,
    pub start: String,
    pub end_date: String,
    pub end: String,
    pub color: EventColor,
    pub error: Option<String>,
    should_focus_title: bool,
}

impl EventForm {
    /// Open an empty form on `date`, starting at the next full hour after `now`
    pub fn open_create(&mut self, date: NaiveDate, now: NaiveDateTime) {
        // Keep the default hour inside the day
        let hour = (now.hour() + 1).min(22);
        let start = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
        let end = start + Duration::hours(1);

        *self = Self {
            is_open: true,
            editing: None,
            title: String::new(),
            date: format_iso_date(date),
            start: format_time(&start),
            end_date: format_iso_date(date),
            end: format_time(&end),
            color: EventColor::default(),
            error: None,
            should_focus_title: true,
        };
    }

    pub fn open_edit(&mut self, event: &CalendarEvent) {
        *self = Self {
            is_open: true,
            editing: Some(event.id.clone()),
            title: event.title.clone(),
            date: format_iso_date(event.start.date()),
            start: format_time(&event.start),
            end_date: format_iso_date(event.end.date()),
            end: format_time(&event.end),
            color: event.color,
            error: None,
            should_focus_title: true,
        };
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Validate the fields into a draft
    pub fn to_draft(&self) -> Result<EventDraft, String> {
        let date = parse_iso_date(self.date.trim())
            .ok_or_else(|| "Date must be YYYY-MM-DD".to_string())?;
        let start = parse_clock(&self.start).ok_or_else(|| "Start must be HH:MM".to_string())?;
        // An empty end date means the same day
        let end_date = match self.end_date.trim() {
            "" => date,
            text => parse_iso_date(text).ok_or_else(|| "End date must be YYYY-MM-DD".to_string())?,
        };
        let end = parse_clock(&self.end).ok_or_else(|| "End must be HH:MM".to_string())?;

        let draft = EventDraft {
            title: self.title.trim().to_string(),
            start: date.and_time(start),
            end: end_date.and_time(end),
            color: self.color,
        };
        draft.validate().map_err(|e| e.to_string())?;
        Ok(draft)
    }
}

fn parse_clock(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

/// Result of form interactions
pub enum FormResult {
    None,
    Submit {
        draft: EventDraft,
        editing: Option<EventId>,
    },
    Cancel,
}

/// Draw the create/update form window
pub fn draw_event_form(ctx: &egui::Context, form: &mut EventForm, theme: &Theme) -> FormResult {
    let mut result = FormResult::None;

    if !form.is_open {
        return result;
    }

    let title = if form.editing.is_some() {
        "Update Event"
    } else {
        "New Event"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(320.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::Grid::new("event_form_grid")
                .num_columns(2)
                .spacing([10.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Title");
                    let response = ui.text_edit_singleline(&mut form.title);
                    if form.should_focus_title {
                        response.request_focus();
                        form.should_focus_title = false;
                    }
                    ui.end_row();

                    ui.label("Date");
                    ui.add(egui::TextEdit::singleline(&mut form.date).hint_text("YYYY-MM-DD"));
                    ui.end_row();

                    ui.label("Start");
                    ui.add(egui::TextEdit::singleline(&mut form.start).hint_text("HH:MM"));
                    ui.end_row();

                    ui.label("End date");
                    ui.add(egui::TextEdit::singleline(&mut form.end_date).hint_text("YYYY-MM-DD"));
                    ui.end_row();

                    ui.label("End");
                    ui.add(egui::TextEdit::singleline(&mut form.end).hint_text("HH:MM"));
                    ui.end_row();

                    ui.label("Color");
                    ui.horizontal(|ui| {
                        for color in EventColor::ALL {
                            let swatch = to_color32(resolve_color(color, &theme.color_scheme));
                            let marker = if form.color == color { "◉" } else { "●" };
                            if ui
                                .add(egui::Label::new(
                                    egui::RichText::new(marker).size(20.0).color(swatch),
                                )
                                .sense(egui::Sense::click()))
                                .on_hover_text(color.name())
                                .clicked()
                            {
                                form.color = color;
                            }
                        }
                    });
                    ui.end_row();
                });

            if let Some(ref error) = form.error {
                ui.add_space(6.0);
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), error);
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let submit_label = if form.editing.is_some() { "Save" } else { "Create" };
                if ui.button(submit_label).clicked() {
                    match form.to_draft() {
                        Ok(draft) => {
                            result = FormResult::Submit {
                                draft,
                                editing: form.editing.clone(),
                            };
                        }
                        Err(message) => form.error = Some(message),
                    }
                }
                if ui.button("Cancel").clicked() {
                    result = FormResult::Cancel;
                }
            });
        });

    result
}

/// Result of the delete confirmation dialog
pub enum DeleteResult {
    None,
    Confirm(EventId),
    Cancel,
}

/// Draw the delete confirmation window for `target`
pub fn draw_delete_confirm(ctx: &egui::Context, target: Option<&CalendarEvent>) -> DeleteResult {
    let mut result = DeleteResult::None;

    let Some(event) = target else {
        return result;
    };

    egui::Window::new("Delete Event")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!(
                "Delete \"{}\" ({} - {})?",
                event.title,
                format_time(&event.start),
                format_time(&event.end)
            ));
            ui.label(
                egui::RichText::new("This cannot be undone.")
                    .size(12.0)
                    .color(egui::Color32::from_rgb(160, 165, 175)),
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    result = DeleteResult::Confirm(event.id.clone());
                }
                if ui.button("Cancel").clicked() {
                    result = DeleteResult::Cancel;
                }
            });
        });

    result
}

/// Result of week list interactions
#[derive(Default)]
pub struct WeekResult {
    /// Open this day in the last used day view
    pub open_day: Option<NaiveDate>,
    /// Open the edit form for this event
    pub edit_event: Option<CalendarEvent>,
}

/// Draw the Monday-to-Sunday list
pub fn draw_week_list(
    ctx: &egui::Context,
    week: &WeekEvents,
    theme: &Theme,
    today: NaiveDate,
) -> WeekResult {
    let mut result = WeekResult::default();
    let secondary = to_color32(&theme.ui_color_scheme.text_secondary);

    egui::Window::new(format!(
        "{} – {}",
        format_iso_date(week.week_start),
        format_iso_date(week.week_end)
    ))
    .id(egui::Id::new("week_list"))
    .collapsible(false)
    .resizable(true)
    .default_width(420.0)
    .default_height(520.0)
    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
    .show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            for day in &week.days {
                let mut heading = egui::RichText::new(day_label(day.date)).size(15.0).strong();
                if day.date == today {
                    heading = heading.color(to_color32(&theme.ui_color_scheme.accent));
                }
                if ui
                    .add(egui::Label::new(heading).sense(egui::Sense::click()))
                    .on_hover_text("Open day")
                    .clicked()
                {
                    result.open_day = Some(day.date);
                }

                if day.events.is_empty() {
                    ui.label(egui::RichText::new("No events").size(12.0).color(secondary));
                }

                for event in &day.events {
                    ui.horizontal(|ui| {
                        let swatch = to_color32(resolve_color(event.color, &theme.color_scheme));
                        ui.label(egui::RichText::new("●").color(swatch));
                        ui.label(
                            egui::RichText::new(format!(
                                "{} - {}",
                                format_time(&event.start),
                                format_time(&event.end)
                            ))
                            .monospace()
                            .color(secondary),
                        );
                        if ui
                            .add(egui::Label::new(event.title.as_str()).sense(egui::Sense::click()))
                            .on_hover_text("Edit event")
                            .clicked()
                        {
                            result.edit_event = Some(event.clone());
                        }
                    });
                }
                ui.separator();
            }
        });
    });

    result
}

/// State for the options panel
#[derive(Default)]
pub struct OptionsState {
    /// Text of the timezone field
    pub timezone_input: String,
}

/// Result of options panel interactions
#[derive(Default)]
pub struct OptionsResult {
    /// Something in the config changed and should be saved
    pub changed: bool,
    /// Wipe the options file and restore defaults
    pub reset: bool,
}

/// Draw the options panel
pub fn draw_options(
    ctx: &egui::Context,
    state: &mut OptionsState,
    config: &mut DayRingConfig,
) -> OptionsResult {
    let mut result = OptionsResult::default();

    egui::Window::new("Options")
        .collapsible(false)
        .resizable(false)
        .default_width(320.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.heading("Theme");
            for theme in builtin_themes() {
                ui.horizontal(|ui| {
                    if ui
                        .radio(config.theme_id == theme.id, theme.name.as_str())
                        .clicked()
                        && config.theme_id != theme.id
                    {
                        config.theme_id = theme.id.clone();
                        result.changed = true;
                    }
                    for color in EventColor::ALL {
                        let swatch = to_color32(resolve_color(color, &theme.color_scheme));
                        ui.label(egui::RichText::new("●").color(swatch));
                    }
                });
            }

            ui.add_space(10.0);
            ui.heading("Start in");
            ui.horizontal(|ui| {
                for mode in [ViewMode::Clock, ViewMode::Linear, ViewMode::Week] {
                    if ui
                        .selectable_value(&mut config.default_view, mode, mode.label())
                        .changed()
                    {
                        result.changed = true;
                    }
                }
            });

            ui.add_space(10.0);
            ui.heading("Time zone");
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut state.timezone_input)
                        .hint_text(config.timezone.as_deref().unwrap_or("System"))
                        .desired_width(180.0),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if submitted || ui.button("Set").clicked() {
                    let input = state.timezone_input.trim();
                    config.timezone = if input.is_empty() || input.eq_ignore_ascii_case("system") {
                        None
                    } else {
                        Some(input.to_string())
                    };
                    state.timezone_input.clear();
                    result.changed = true;
                }
            });
            ui.label(
                egui::RichText::new("IANA name, e.g. Europe/Stockholm. Empty follows the system.")
                    .size(11.0)
                    .color(egui::Color32::from_rgb(160, 165, 175)),
            );

            ui.add_space(10.0);
            ui.separator();
            if ui.button("Reset to defaults").clicked() {
                result.reset = true;
            }
        });

    result
}
