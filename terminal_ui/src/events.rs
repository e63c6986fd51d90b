use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Confirm, InputMode, Overlay, Screen};
use crate::form::{FormField, TEMPLATES};
use crate::settings::Section;

/// Routes one key press: overlays first, then the active screen.
pub async fn handle_key(app: &mut App, key: KeyEvent) {
    match app.overlay {
        Some(Overlay::Form(_)) => return handle_form_key(app, key).await,
        Some(Overlay::Confirm(_)) => return handle_confirm_key(app, key).await,
        Some(Overlay::Help) => {
            app.overlay = None;
            return;
        }
        None => {}
    }

    match app.screen {
        Screen::Dashboard => handle_dashboard_key(app, key).await,
        Screen::Filters => handle_filters_key(app, key),
        Screen::Settings => handle_settings_key(app, key),
    }
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Single-letter actions that the keyboard shortcut setting switches off.
fn is_shortcut(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Char('n' | 'e' | 'd' | 'A' | 'C' | 'E' | 'f' | 's' | 'r')
    )
}

async fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    match app.mode {
        InputMode::QuickAdd => {
            match key.code {
                KeyCode::Enter => app.submit_quick_add().await,
                KeyCode::Esc => app.mode = InputMode::Normal,
                KeyCode::Backspace => {
                    app.quick_input.pop();
                }
                KeyCode::Char(c) => app.quick_input.push(c),
                _ => {}
            }
            return;
        }
        InputMode::Search => {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => app.mode = InputMode::Normal,
                KeyCode::Backspace => {
                    app.dashboard.filter.query.pop();
                }
                KeyCode::Char(c) => app.dashboard.filter.query.push(c),
                _ => {}
            }
            app.clamp_selection();
            return;
        }
        InputMode::Normal => {}
    }

    if is_ctrl(&key, 'n') {
        return app.open_create();
    }
    if !app.settings.shortcuts.keyboard_shortcuts && is_shortcut(key.code) {
        return app.info("Keyboard shortcuts are turned off in Settings");
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('i') => app.mode = InputMode::QuickAdd,
        KeyCode::Char('/') => app.mode = InputMode::Search,
        KeyCode::Char('n') => app.open_create(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit(),
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected().await,
        KeyCode::Char('d') | KeyCode::Delete => app.ask_delete_selected(),
        KeyCode::Char('A') => app.toggle_all().await,
        KeyCode::Char('C') => app.ask_clear_completed(),
        KeyCode::Char('E') => app.export(),
        KeyCode::Char('r') => app.refresh().await,
        KeyCode::Char('f') => app.screen = Screen::Filters,
        KeyCode::Char('s') => app.open_settings(),
        KeyCode::Char('?') => app.overlay = Some(Overlay::Help),
        KeyCode::Tab => app.next_tab(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Esc => {
            app.dashboard.filter.query.clear();
            app.clamp_selection();
        }
        _ => {}
    }
}

fn handle_filters_key(app: &mut App, key: KeyEvent) {
    let page = &mut app.filter_page;
    let filter = &mut app.dashboard.filter;

    if page.editing {
        match key.code {
            KeyCode::Esc => page.finish_editing(filter),
            KeyCode::Enter => page.activate(filter, &mut app.dashboard.sort),
            KeyCode::Backspace => page.backspace(filter),
            KeyCode::Char(c) => page.input(c, filter),
            _ => {}
        }
    } else {
        match key.code {
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => app.screen = Screen::Dashboard,
            KeyCode::Down | KeyCode::Char('j') => page.down(),
            KeyCode::Up | KeyCode::Char('k') => page.up(),
            KeyCode::Enter | KeyCode::Char(' ') => page.activate(filter, &mut app.dashboard.sort),
            KeyCode::Backspace => page.backspace(filter),
            KeyCode::Char('x') => page.clear_all(filter, &mut app.dashboard.sort),
            _ => {}
        }
    }
    app.clamp_selection();
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    if is_ctrl(&key, 's') || key.code == KeyCode::Char('w') {
        return app.save_settings();
    }
    let page = &mut app.settings_page;
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_settings(),
        KeyCode::Down | KeyCode::Char('j') => page.down(),
        KeyCode::Up | KeyCode::Char('k') => page.up(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if page.in_items {
                app.change_setting(true);
            } else {
                page.enter_items();
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if page.in_items && key.code == KeyCode::Left {
                app.change_setting(false);
            } else {
                page.leave_items();
            }
        }
        KeyCode::Tab => page.leave_items(),
        KeyCode::Char('R') => {
            let section = page.current_section();
            app.overlay = Some(Overlay::Confirm(Confirm::ResetSection(section)));
        }
        KeyCode::Char('E') if page.current_section() == Section::Data => app.export(),
        KeyCode::Char('X') if page.current_section() == Section::Data => {
            app.overlay = Some(Overlay::Confirm(Confirm::ClearData));
        }
        _ => {}
    }
}

async fn handle_form_key(app: &mut App, key: KeyEvent) {
    if is_ctrl(&key, 's') {
        return app.save_form().await;
    }
    let templates = app.settings.tasks.task_templates;
    let Some(Overlay::Form(form)) = app.overlay.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.overlay = None,
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left if form.focus.is_choice() => form.cycle(false),
        KeyCode::Right if form.focus.is_choice() => form.cycle(true),
        KeyCode::Enter if form.focus == FormField::Tags && !form.tag_input.trim().is_empty() => form.add_tag(),
        KeyCode::Enter if form.focus == FormField::Reminder => app.save_form().await,
        KeyCode::Enter => form.next_field(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::F(n) if templates && (1..=TEMPLATES.len() as u8).contains(&n) => {
            form.apply_template(&TEMPLATES[usize::from(n - 1)]);
        }
        KeyCode::Char(c) => form.input(c),
        _ => {}
    }
}

async fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm().await,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.overlay = None,
        _ => {}
    }
}
