pub mod app;
pub mod tabs;

use anyhow::Result;
use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

pub async fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // First paint needs data
    app.refresh().await?;

    // Run the application
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    let mut last_refresh = Instant::now();

    loop {
        terminal.draw(|f| app.render(f))?;

        // Check for events with timeout
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Tab => app.next_tab(),
                    KeyCode::BackTab => app.previous_tab(),
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        app.refresh().await?;
                        last_refresh = Instant::now();
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => {
                        // Cycle the selected policy's mode (Policies tab)
                        app.cycle_mode().await?;
                    }
                    KeyCode::Char('a') | KeyCode::Char('A') => {
                        // Apply the selected policy (Policies tab)
                        app.apply_selected().await?;
                    }
                    KeyCode::Char('3') => {
                        // Toggle the blocked-requests filter (Logs tab)
                        app.toggle_blocked_filter().await?;
                    }
                    KeyCode::Char('c') | KeyCode::Char('C') => {
                        app.clear_filter().await?;
                    }
                    KeyCode::Up => app.scroll_up(),
                    KeyCode::Down => app.scroll_down(),
                    _ => {}
                }
            }
        } else if last_refresh.elapsed() >= app.refresh_interval {
            // Auto-refresh once the configured interval has passed
            app.refresh().await?;
            last_refresh = Instant::now();
        }
    }
}
