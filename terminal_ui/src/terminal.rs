use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use tui::backend::CrosstermBackend;
use tui::{Frame, Terminal};

use crate::app::App;
use crate::{events, ui};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(250);

type Backend = CrosstermBackend<io::Stdout>;

/// Raw mode and the alternate screen for as long as it lives.
struct TerminalGuard {
    terminal: Terminal<Backend>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;
        Ok(Self { terminal })
    }

    fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame<Backend>),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let _ = io::stdout().execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub async fn run(app: &mut App) -> Result<()> {
    let mut terminal = TerminalGuard::new()?;
    app.dashboard.load_local();
    terminal.draw(|f| ui::draw(f, app))?;
    app.refresh().await;

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;
        if event::poll(INPUT_POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too.
                if key.kind == KeyEventKind::Press {
                    events::handle_key(app, key).await;
                }
            }
        }
    }
    Ok(())
}
