use tui::backend::Backend;
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use tui::Frame;

use super::theme::Palette;
use crate::app::App;
use crate::settings::Section;

pub fn draw<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(20)].as_ref())
        .split(area);

    draw_sections(f, columns[0], app, palette);
    draw_items(f, columns[1], app, palette);
}

fn draw_sections<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let page = &app.settings_page;
    let items: Vec<ListItem> = Section::ALL
        .iter()
        .map(|section| ListItem::new(Span::raw(section.title())))
        .collect();
    let mut title = String::from("Settings");
    if page.unsaved {
        title.push_str(" *");
    }
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(!page.in_items))
                .title(title),
        )
        .highlight_style(palette.selected())
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(page.section));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_items<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let page = &app.settings_page;
    let section = page.current_section();
    let extra = if section == Section::Data { 4 } else { 2 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(extra)].as_ref())
        .split(area);

    let items: Vec<ListItem> = section
        .keys()
        .iter()
        .map(|key| {
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{:<26}", key.label()), palette.text()),
                Span::styled(page.draft.value_label(*key), palette.accent()),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(page.in_items))
                .title(section.title()),
        )
        .highlight_style(palette.selected());
    let mut state = ListState::default();
    if page.in_items {
        state.select(Some(page.item));
    }
    f.render_stateful_widget(list, rows[0], &mut state);

    let mut lines = vec![Spans::from(Span::styled(section.description(), palette.muted()))];
    if section == Section::Data {
        lines.push(Spans::from(format!("Local storage usage: {:.2} KB", app.storage_usage())));
        lines.push(Spans::from(vec![
            Span::styled("E", palette.accent()),
            Span::raw(format!(" export to {}   ", app.export_dir.display())),
            Span::styled("X", palette.error()),
            Span::raw(" clear all local data"),
        ]));
    }
    if page.unsaved {
        lines.push(Spans::from(Span::styled(
            "Unsaved changes (Ctrl+S to save)",
            palette.error(),
        )));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[1]);
}
