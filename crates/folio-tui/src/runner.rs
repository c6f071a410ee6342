// TUI event loop and terminal management
use crate::{Action, App};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// How long to wait for a key before checking on the feed again
const TICK: Duration = Duration::from_millis(100);

/// Show the Projects page until the user leaves it.
///
/// Activates the page on entry; leaving drops the session, so a fetch
/// still in flight is abandoned.
pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.activate();
    let result = event_loop(&mut terminal, &mut app).await;

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| crate::ui::render(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = Action::from_key(key.code) {
                        app.apply(action);
                    }
                }
            }
        } else {
            // let the fetch task make progress on this worker too
            tokio::task::yield_now().await;
        }
    }
}
