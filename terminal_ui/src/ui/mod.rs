//! Drawing. Nothing here changes state.

mod dashboard;
mod filters;
mod modal;
mod settings;
mod theme;

use tui::backend::Backend;
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::text::{Span, Spans};
use tui::widgets::Paragraph;
use tui::Frame;

use crate::app::{App, InputMode, Overlay, Screen};
use theme::Palette;

pub fn draw<B: Backend>(f: &mut Frame<B>, app: &App) {
    let palette = theme::palette(app.settings.general.theme);
    let show_hints = app.settings.shortcuts.show_shortcut_hints;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(u16::from(show_hints)),
            ]
            .as_ref(),
        )
        .split(f.size());

    match app.screen {
        Screen::Dashboard => dashboard::draw(f, chunks[0], app, &palette),
        Screen::Filters => filters::draw(f, chunks[0], app, &palette),
        Screen::Settings => settings::draw(f, chunks[0], app, &palette),
    }
    draw_status(f, chunks[1], app, &palette);
    if show_hints {
        draw_hints(f, chunks[2], app, &palette);
    }

    match &app.overlay {
        Some(Overlay::Form(form)) => modal::draw_form(f, form, app.settings.tasks.task_templates, &palette),
        Some(Overlay::Confirm(confirm)) => modal::draw_confirm(f, &confirm.message(), &palette),
        Some(Overlay::Help) => modal::draw_help(f, &palette),
        None => {}
    }
}

fn draw_status<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let line = match &app.status {
        Some(status) if status.error => Span::styled(status.text.clone(), palette.error()),
        Some(status) => Span::styled(status.text.clone(), palette.accent()),
        None => Span::styled(format!("API {}", app.service.base_url()), palette.muted()),
    };
    f.render_widget(Paragraph::new(Spans::from(line)), area);
}

fn draw_hints<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let hints: &[(&str, &str)] = match (&app.overlay, app.screen, app.mode) {
        (Some(Overlay::Form(_)), _, _) => &[
            ("Tab", "next field"),
            ("←/→", "change"),
            ("Enter", "add tag"),
            ("Ctrl+S", "save"),
            ("Esc", "cancel"),
        ],
        (Some(Overlay::Confirm(_)), _, _) => &[("y", "confirm"), ("n", "cancel")],
        (Some(Overlay::Help), _, _) => &[("any key", "close")],
        (None, Screen::Dashboard, InputMode::QuickAdd) => &[("Enter", "add"), ("Esc", "stop typing")],
        (None, Screen::Dashboard, InputMode::Search) => &[("Enter", "done"), ("Esc", "done")],
        (None, Screen::Dashboard, InputMode::Normal) => &[
            ("i", "quick add"),
            ("n", "new"),
            ("e", "edit"),
            ("space", "toggle"),
            ("d", "delete"),
            ("/", "search"),
            ("Tab", "tab"),
            ("f", "filters"),
            ("s", "settings"),
            ("?", "help"),
            ("q", "quit"),
        ],
        (None, Screen::Filters, _) => &[
            ("j/k", "move"),
            ("Enter", "toggle"),
            ("x", "clear all"),
            ("Esc", "back"),
        ],
        (None, Screen::Settings, _) => &[
            ("j/k", "move"),
            ("Enter", "open/change"),
            ("←", "back"),
            ("Ctrl+S", "save"),
            ("R", "reset section"),
            ("Esc", "back"),
        ],
    };

    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (key, action) in hints {
        spans.push(Span::styled(*key, palette.accent()));
        spans.push(Span::styled(format!(" {action}"), palette.muted()));
        spans.push(Span::raw("  "));
    }
    f.render_widget(Paragraph::new(Spans::from(spans)), area);
}

/// A box `percent_x` wide and `height` rows tall in the middle of `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    // never wider than `area`, so the narrowing is lossless
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
