use todomaster_shared::Priority;
use tui::style::{Color, Modifier, Style};

use crate::settings::Theme;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub selection: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
}

/// `Auto` leaves colours to the terminal's own scheme.
pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            text: Color::Black,
            muted: Color::DarkGray,
            accent: Color::Blue,
            selection: Color::Gray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        },
        Theme::Dark => Palette {
            text: Color::White,
            muted: Color::Gray,
            accent: Color::Cyan,
            selection: Color::DarkGray,
            success: Color::LightGreen,
            warning: Color::LightYellow,
            danger: Color::LightRed,
        },
        Theme::Auto => Palette {
            text: Color::Reset,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            selection: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        },
    }
}

impl Palette {
    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn title(&self) -> Style {
        self.accent().add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default().bg(self.selection).add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.danger)
    }

    pub fn priority(&self, priority: Priority) -> Style {
        let color = match priority {
            Priority::Low => self.success,
            Priority::Medium => self.warning,
            Priority::High => self.danger,
            Priority::Urgent => Color::Magenta,
        };
        Style::default().fg(color)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.accent()
        } else {
            self.muted()
        }
    }
}
