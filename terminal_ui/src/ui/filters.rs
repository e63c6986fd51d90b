use tui::backend::Backend;
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use tui::Frame;

use super::theme::Palette;
use crate::app::App;
use crate::filter_page::{self, FilterRow};

pub fn draw<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(area);

    draw_rows(f, columns[0], app, palette);
    draw_summary(f, columns[1], app, palette);
}

fn row_text(row: FilterRow, app: &App) -> String {
    let filter = &app.dashboard.filter;
    let page = &app.filter_page;
    let mark = if filter_page::is_selected(row, filter) { "[x]" } else { "[ ]" };
    match row {
        FilterRow::Search => {
            let cursor = if page.editing && page.current() == row { "_" } else { "" };
            format!("Search: {}{cursor}", filter.query)
        }
        FilterRow::Tags => {
            let cursor = if page.editing && page.current() == row { "_" } else { "" };
            let tags: Vec<String> = filter.tags.iter().map(|t| format!("#{t}")).collect();
            format!("Tags: {} {}{cursor}", tags.join(" "), page.tag_input)
        }
        FilterRow::Status(status) => format!("{mark} {}", status.label()),
        FilterRow::Priority(priority) => format!("{mark} {}", priority.label()),
        FilterRow::Category(category) => format!("{mark} {category}"),
        FilterRow::Date(range) => format!("{mark} {}", range.label()),
        FilterRow::SortKey => format!("Sort by: {}", filter_page::sort_label(&app.dashboard.sort).0),
        FilterRow::SortOrder => format!("Order: {}", filter_page::sort_label(&app.dashboard.sort).1),
    }
}

fn draw_rows<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let rows = filter_page::rows();
    let mut items = Vec::new();
    let mut selected = 0;
    let mut section = "";
    for (index, row) in rows.iter().enumerate() {
        if row.section() != section {
            section = row.section();
            items.push(ListItem::new(Span::styled(section, palette.title())));
        }
        if index == app.filter_page.cursor {
            selected = items.len();
        }
        let style = if row.is_text() { palette.text() } else { palette.muted() };
        items.push(ListItem::new(Span::styled(format!("  {}", row_text(*row, app)), style)));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.accent())
                .title("Advanced Filters"),
        )
        .highlight_style(palette.selected());
    let mut state = ListState::default();
    state.select(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_summary<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let chips = app.dashboard.filter.chips();
    let results = app.visible().len();

    let mut lines = vec![
        Spans::from(Span::styled(
            format!("{results} of {} tasks shown", app.counts().all),
            palette.title(),
        )),
        Spans::from(""),
        Spans::from(Span::styled("Active filters", palette.accent())),
    ];
    if chips.is_empty() && app.dashboard.filter.query.is_empty() {
        lines.push(Spans::from(Span::styled("  none", palette.muted())));
    }
    if !app.dashboard.filter.query.is_empty() {
        lines.push(Spans::from(format!("  Search: \"{}\"", app.dashboard.filter.query)));
    }
    for chip in chips {
        lines.push(Spans::from(format!("  {chip}")));
    }
    lines.push(Spans::from(""));
    let (key, order) = filter_page::sort_label(&app.dashboard.sort);
    lines.push(Spans::from(vec![
        Span::styled("Sort: ", palette.accent()),
        Span::raw(format!("{key} ({order})")),
    ]));
    lines.push(Spans::from(vec![
        Span::styled("Tab: ", palette.accent()),
        Span::raw(app.dashboard.filter.tab.label()),
    ]));

    let summary = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_style(palette.muted()).title("Results"))
        .wrap(Wrap { trim: true });
    f.render_widget(summary, area);
}
