use chrono::{Duration, NaiveDate};
use todomaster_shared::{Tab, Task};
use tui::backend::Backend;
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::style::Modifier;
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Tabs};
use tui::Frame;

use super::theme::Palette;
use crate::app::{App, InputMode};

const QUICK_ADD_PLACEHOLDER: &str = "Press i to add a task: Call mom !high @personal #family due:2025-08-01";

pub fn draw<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    draw_header(f, chunks[0], app, palette);
    draw_input(f, chunks[1], app, palette);
    draw_tabs(f, chunks[2], app, palette);
    draw_list(f, chunks[3], app, palette);
    draw_progress(f, chunks[4], app, palette);
}

fn draw_header<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let header = Spans::from(vec![
        Span::styled("TodoMaster", palette.title()),
        Span::raw("  "),
        Span::styled(app.today().format("%A, %B %-d, %Y").to_string(), palette.muted()),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn draw_input<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let (title, text, focused) = match app.mode {
        InputMode::Search => ("Search", app.dashboard.filter.query.as_str(), true),
        InputMode::QuickAdd => ("Quick add", app.quick_input.as_str(), true),
        InputMode::Normal if !app.dashboard.filter.query.is_empty() => {
            ("Search", app.dashboard.filter.query.as_str(), false)
        }
        InputMode::Normal => ("Quick add", app.quick_input.as_str(), false),
    };
    let content = if text.is_empty() && !focused {
        Span::styled(QUICK_ADD_PLACEHOLDER, palette.muted())
    } else if focused {
        Span::styled(format!("{text}_"), palette.text())
    } else {
        Span::styled(text.to_string(), palette.text())
    };
    let input = Paragraph::new(Spans::from(content)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border(focused))
            .title(title),
    );
    f.render_widget(input, area);
}

fn draw_tabs<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let counts = app.counts();
    let titles = Tab::ALL
        .iter()
        .map(|tab| {
            let count = match tab {
                Tab::All => counts.all,
                Tab::Active => counts.active,
                Tab::Completed => counts.completed,
            };
            let label = if app.settings.general.show_task_count {
                format!("{} ({count})", tab.label())
            } else {
                tab.label().to_string()
            };
            Spans::from(label)
        })
        .collect();
    let selected = Tab::ALL.iter().position(|t| *t == app.dashboard.filter.tab).unwrap_or(0);
    let mut title = String::from("Tasks");
    if app.dashboard.filter.has_advanced() {
        title.push_str(" (filtered)");
    }
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).border_style(palette.muted()).title(title))
        .select(selected)
        .style(palette.muted())
        .highlight_style(palette.title());
    f.render_widget(tabs, area);
}

fn due_label(due: NaiveDate, today: NaiveDate) -> String {
    if due == today {
        "Today".to_string()
    } else if due == today + Duration::days(1) {
        "Tomorrow".to_string()
    } else if due < today {
        format!("Overdue {}", due.format("%b %-d"))
    } else {
        due.format("%b %-d").to_string()
    }
}

fn task_item<'a>(task: &'a Task, today: NaiveDate, compact: bool, palette: &Palette) -> ListItem<'a> {
    let done = task.is_completed();
    let title_style = if done {
        palette.muted().add_modifier(Modifier::CROSSED_OUT)
    } else {
        palette.text()
    };

    let mut line = vec![
        Span::styled(if done { "[x] " } else { "[ ] " }, palette.accent()),
        Span::styled(task.title.as_str(), title_style),
        Span::raw("  "),
        Span::styled(task.priority.label(), palette.priority(task.priority)),
    ];
    if let Some(category) = &task.category_name {
        line.push(Span::styled(format!("  {category}"), palette.accent()));
    }
    if let Some(due) = task.due_date {
        let style = if task.is_overdue(today) {
            palette.error()
        } else {
            palette.muted()
        };
        line.push(Span::styled(format!("  {}", due_label(due, today)), style));
    }
    for tag in &task.tags {
        line.push(Span::styled(format!(" #{tag}"), palette.muted()));
    }

    let mut lines = vec![Spans::from(line)];
    if !compact && !task.description.is_empty() {
        lines.push(Spans::from(Span::styled(format!("    {}", task.description), palette.muted())));
    }
    ListItem::new(lines)
}

fn empty_message(app: &App) -> &'static str {
    if !app.dashboard.filter.query.is_empty() || app.dashboard.filter.has_advanced() {
        return "No tasks match your filters";
    }
    match app.dashboard.filter.tab {
        Tab::All => "No tasks yet. Press i to add your first one.",
        Tab::Active => "Nothing left to do!",
        Tab::Completed => "No completed tasks yet",
    }
}

fn draw_list<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let today = app.today();
    let visible = app.visible();
    let block = Block::default().borders(Borders::ALL).border_style(palette.muted());

    if visible.is_empty() {
        let empty = Paragraph::new(Span::styled(empty_message(app), palette.muted())).block(block);
        f.render_widget(empty, area);
        return;
    }

    let compact = app.settings.general.compact_view;
    let items: Vec<ListItem> = visible
        .iter()
        .map(|task| task_item(task, today, compact, palette))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(palette.selected())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected.min(visible.len() - 1)));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_progress<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, palette: &Palette) {
    let counts = app.counts();
    let percent = counts.completion_percentage();
    let label = format!("{} of {} completed ({percent}%)", counts.completed, counts.all);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(palette.muted()).title("Progress"))
        .gauge_style(palette.accent())
        .percent(percent.min(100))
        .label(label);
    f.render_widget(gauge, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_labels() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 23).unwrap();
        assert_eq!(due_label(today, today), "Today");
        assert_eq!(due_label(today + Duration::days(1), today), "Tomorrow");
        assert_eq!(due_label(today - Duration::days(2), today), "Overdue Jul 21");
        assert_eq!(due_label(today + Duration::days(9), today), "Aug 1");
    }
}
