use std::io::{self, Stdout};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use passo_core::query_executor::QueryBackend;
use passo_core::session::{InputEvent, Session, SessionOutcome};
use ratatui::backend::CrosstermBackend;
use ratatui::text::Text;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use thiserror::Error;
use tokio::runtime::Runtime;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Runs the session until it exits, restoring the terminal on every path.
pub fn run<B: QueryBackend>(session: Session<B>) -> Result<(), TuiError> {
    let runtime = Runtime::new()?;
    let mut terminal = setup_terminal()?;
    let run_result = run_loop(&mut terminal, &runtime, session);
    let restore_result = restore_terminal(&mut terminal);

    if let Err(error) = run_result {
        restore_result?;
        return Err(error);
    }

    restore_result?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), TuiError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_loop<B: QueryBackend>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    runtime: &Runtime,
    mut session: Session<B>,
) -> Result<(), TuiError> {
    loop {
        terminal.draw(|frame| render(frame, &session))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(input) = map_key_event(key) else {
            continue;
        };

        // One event is fully handled, database round trip included, before
        // the next one is read.
        // No final draw on exit; the alternate screen is torn down right
        // after the loop returns.
        if runtime.block_on(session.handle_event(input)) == SessionOutcome::Exit {
            return Ok(());
        }
    }
}

fn render<B: QueryBackend>(frame: &mut Frame<'_>, session: &Session<B>) {
    let paragraph = Paragraph::new(Text::raw(session.view()));
    frame.render_widget(paragraph, frame.area());
}

fn map_key_event(key: KeyEvent) -> Option<InputEvent> {
    match key.code {
        KeyCode::Enter => Some(InputEvent::Confirm),
        KeyCode::Char(character) => Some(InputEvent::Append(character.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use passo_core::session::InputEvent;

    use super::map_key_event;

    #[test]
    fn enter_confirms_the_pending_input() {
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            Some(InputEvent::Confirm)
        );
    }

    #[test]
    fn character_keys_append_their_text() {
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)),
            Some(InputEvent::Append("s".to_string()))
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE)),
            Some(InputEvent::Append("1".to_string()))
        );
    }

    #[test]
    fn non_text_keys_are_ignored() {
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)),
            None
        );
    }
}
