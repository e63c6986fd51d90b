use tui::backend::Backend;
use tui::layout::Alignment;
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tui::Frame;

use super::centered_rect;
use super::theme::Palette;
use crate::form::{self, FormField, TaskForm, TEMPLATES};

fn field_value(form: &TaskForm, field: FormField) -> String {
    match field {
        FormField::Title => form.title.clone(),
        FormField::Description => form.description.clone(),
        FormField::Priority => format!("< {} >", form.priority.label()),
        FormField::Category => format!("< {} >", form.category.as_deref().unwrap_or("No Category")),
        FormField::DueDate => form.due_date.clone(),
        FormField::DueTime => form.due_time.clone(),
        FormField::Tags => {
            let tags: Vec<String> = form.tags.iter().map(|t| format!("#{t}")).collect();
            format!("{} {}", tags.join(" "), form.tag_input).trim_start().to_string()
        }
        FormField::Reminder => match (form.reminder, form.kept_reminder) {
            (Some(minutes), _) => format!("< {} >", form::reminder_label(minutes)),
            (None, Some(at)) => format!("< {} >", at.format("%b %-d %H:%M")),
            (None, None) => "< Off >".to_string(),
        },
    }
}

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::Title => "What needs to be done?",
        FormField::Description => "Add more details (optional)",
        FormField::DueDate => "YYYY-MM-DD",
        FormField::DueTime => "HH:MM",
        FormField::Tags => "type a tag, Enter to add",
        _ => "",
    }
}

pub fn draw_form<B: Backend>(f: &mut Frame<B>, form: &TaskForm, templates: bool, palette: &Palette) {
    let mut lines = Vec::new();
    if templates && form.is_new() {
        let mut spans = vec![Span::styled("Templates: ", palette.muted())];
        for (index, template) in TEMPLATES.iter().enumerate() {
            spans.push(Span::styled(format!("F{} ", index + 1), palette.accent()));
            spans.push(Span::raw(format!("{}  ", template.label)));
        }
        lines.push(Spans::from(spans));
        lines.push(Spans::from(""));
    }

    for field in FormField::ORDER {
        let focused = form.focus == field;
        let label_style = if focused { palette.title() } else { palette.muted() };
        let value = field_value(form, field);
        let value_span = if value.is_empty() && !focused {
            Span::styled(placeholder(field), palette.muted())
        } else if focused && !field.is_choice() {
            Span::styled(format!("{value}_"), palette.text())
        } else {
            Span::styled(value, palette.text())
        };
        let marker = if focused { "> " } else { "  " };
        lines.push(Spans::from(vec![
            Span::styled(format!("{marker}{:<12}", field.label()), label_style),
            value_span,
        ]));
        if let Some(error) = form.error(field) {
            lines.push(Spans::from(Span::styled(format!("{:14}{error}", ""), palette.error())));
        }
    }

    let height = lines.len() as u16 + 2;
    let area = centered_rect(70, height, f.size());
    let modal = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.accent())
                .title(Span::styled(form.heading(), palette.title())),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(modal, area);
}

pub fn draw_confirm<B: Backend>(f: &mut Frame<B>, message: &str, palette: &Palette) {
    let area = centered_rect(50, 5, f.size());
    let lines = vec![
        Spans::from(message.to_string()),
        Spans::from(""),
        Spans::from(vec![
            Span::styled("y", palette.error()),
            Span::raw(" yes   "),
            Span::styled("n", palette.accent()),
            Span::raw(" no"),
        ]),
    ];
    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.error())
                .title("Confirm"),
        );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

const HELP: [(&str, &str); 16] = [
    ("i", "Quick add (!priority @category #tag due:YYYY-MM-DD)"),
    ("n / Ctrl+N", "New task"),
    ("e / Enter", "Edit selected task"),
    ("space / x", "Toggle completed"),
    ("d / Del", "Delete selected task"),
    ("/", "Search"),
    ("Tab", "Next tab"),
    ("j / k", "Move selection"),
    ("A", "Complete or reopen all"),
    ("C", "Clear completed"),
    ("E", "Export tasks"),
    ("r", "Sync with server"),
    ("f", "Advanced filters"),
    ("s", "Settings"),
    ("?", "This help"),
    ("q", "Quit"),
];

pub fn draw_help<B: Backend>(f: &mut Frame<B>, palette: &Palette) {
    let area = centered_rect(70, HELP.len() as u16 + 2, f.size());
    let lines: Vec<Spans> = HELP
        .iter()
        .map(|(key, action)| {
            Spans::from(vec![
                Span::styled(format!("{key:<14}"), palette.accent()),
                Span::styled(*action, palette.text()),
            ])
        })
        .collect();
    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.accent())
            .title("Keyboard Shortcuts"),
    );
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}
