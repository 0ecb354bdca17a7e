use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::constants::{UI_REFRESH_INTERVAL_MS, UI_SCROLL_LINES};
use crate::engine::Answer;
use crate::models::MessageRole;
use crate::session::ChatSession;
use crate::tui::app::ChatApp;
use crate::tui::render::render_ui;
use crate::utils::TableTalkError;

/// A finished background turn, carrying the session back to the UI
struct TurnOutcome {
    session: ChatSession,
    result: Result<Answer, TableTalkError>,
}

/// Run the terminal UI
pub async fn run_ui(mut app: ChatApp) -> Result<()> {
    // Check if we have an interactive terminal
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("TableTalk requires an interactive terminal.");
        eprintln!("   Cannot run in non-interactive mode (pipes, redirects, etc.)");
        eprintln!("   For scripted use try: tabletalk --ask \"<question>\"");
        return Err(anyhow::anyhow!("No interactive terminal available"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Clear terminal
    terminal.clear()?;

    // Channel carrying finished turns back from the worker
    let (tx, mut rx) = mpsc::channel::<TurnOutcome>(1);

    // Run the UI loop
    let res = run_app(&mut terminal, &mut app, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ChatApp,
    tx: mpsc::Sender<TurnOutcome>,
    rx: &mut mpsc::Receiver<TurnOutcome>,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render_ui(f, app))?;

        // Handle input events
        if event::poll(Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C quits from any state
                if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
                    app.quit();
                    break;
                }

                match key.code {
                    KeyCode::Enter => submit_input(app, &tx),
                    KeyCode::Char(c) => {
                        if !app.is_thinking {
                            app.input.push(c);
                        }
                    }
                    KeyCode::Backspace => {
                        app.input.pop();
                    }
                    KeyCode::Esc => app.clear_input(),
                    KeyCode::Tab => app.toggle_schema(),
                    KeyCode::Up => app.scroll_up(UI_SCROLL_LINES),
                    KeyCode::Down => app.scroll_down(UI_SCROLL_LINES),
                    KeyCode::PageUp => app.scroll_up(10),
                    KeyCode::PageDown => app.scroll_down(10),
                    _ => {}
                }
            }
        }

        // Collect a finished turn, if any
        if app.is_thinking {
            if let Ok(outcome) = rx.try_recv() {
                app.is_thinking = false;
                app.session = Some(outcome.session);
                app.refresh_transcript();
                match outcome.result {
                    Ok(_) => app.set_status("Ready"),
                    Err(e) => app.set_error(e.to_string()),
                }
            }
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}

/// Submit the current input
///
/// Slash commands run inline; questions move the session into a worker
/// task for the duration of the turn so the UI keeps drawing.
fn submit_input(app: &mut ChatApp, tx: &mpsc::Sender<TurnOutcome>) {
    if app.input.is_empty() || app.is_thinking {
        return;
    }

    let input = app.input.clone();
    app.clear_input();

    if input.starts_with('/') {
        app.handle_slash_command(&input);
        return;
    }

    let Some(mut session) = app.session.take() else {
        return;
    };

    // Mirror the question right away; the authoritative transcript copy
    // arrives with the outcome
    app.push_ephemeral(MessageRole::User, input.clone());
    app.is_thinking = true;
    app.set_status("Thinking...");

    let tx = tx.clone();
    tokio::spawn(async move {
        let result = session.handle_message(&input).await;
        let _ = tx.send(TurnOutcome { session, result }).await;
    });
}
