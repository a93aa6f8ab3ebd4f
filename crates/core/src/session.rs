use crate::connection_manager::ConnectionManager;
use crate::credentials::Credentials;
use crate::query_executor::{self, QueryBackend};

/// Typing this while connected (case-insensitive, trimmed) closes the
/// connection and ends the session.
pub const EXIT_KEYWORD: &str = "sair";

pub const NO_CONNECTION_MESSAGE: &str = "error: no active database connection";

const USER_PROMPT: &str = "enter the database user:";
const PASSWORD_PROMPT: &str = "enter the password:";
const DATABASE_PROMPT: &str = "enter the database name:";
const CONNECTED_MESSAGE: &str =
    "connection successful! type SQL statements or 'sair' to disconnect.";

/// Position in the fixed prompt sequence. Confirmed input is interpreted
/// according to the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStep {
    AwaitUser,
    AwaitPassword,
    AwaitDatabase,
    Ready,
}

/// One event from the terminal: text appended to the pending input, or the
/// confirmation that accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Append(String),
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Continue,
    Exit,
}

/// The single mutable entity for the process lifetime: prompt step, pending
/// input, collected credentials, the owned connection, and the text shown
/// on the next draw. One event is fully handled, including any blocking
/// database round trip, before the next is accepted.
pub struct Session<B: QueryBackend> {
    manager: ConnectionManager<B>,
    step: PromptStep,
    input: String,
    user: String,
    password: String,
    last_output: String,
}

impl<B: QueryBackend> Session<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            manager: ConnectionManager::new(backend),
            step: PromptStep::AwaitUser,
            input: String::new(),
            user: String::new(),
            password: String::new(),
            last_output: USER_PROMPT.to_string(),
        }
    }

    #[must_use]
    pub fn step(&self) -> PromptStep {
        self.step
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn last_output(&self) -> &str {
        &self.last_output
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.manager.is_connected()
    }

    /// Text for the next draw: the last status or result, then the prompt
    /// line with the pending input.
    #[must_use]
    pub fn view(&self) -> String {
        format!("{}\n> {}", self.last_output, self.input)
    }

    pub async fn handle_event(&mut self, event: InputEvent) -> SessionOutcome {
        match event {
            InputEvent::Append(text) => {
                self.input.push_str(&text);
                SessionOutcome::Continue
            }
            InputEvent::Confirm => self.confirm().await,
        }
    }

    async fn confirm(&mut self) -> SessionOutcome {
        let input = self.input.trim().to_string();
        self.input.clear();

        match self.step {
            PromptStep::AwaitUser => {
                self.user = input;
                self.last_output = PASSWORD_PROMPT.to_string();
                self.step = PromptStep::AwaitPassword;
            }
            PromptStep::AwaitPassword => {
                self.password = input;
                self.last_output = DATABASE_PROMPT.to_string();
                self.step = PromptStep::AwaitDatabase;
            }
            PromptStep::AwaitDatabase => {
                let credentials =
                    Credentials::new(self.user.clone(), self.password.clone(), input);
                match self.manager.connect(&credentials).await {
                    Ok(()) => {
                        self.last_output = CONNECTED_MESSAGE.to_string();
                        self.step = PromptStep::Ready;
                    }
                    Err(error) => {
                        // Keep the collected user and password; only the
                        // database name is collected again.
                        self.last_output =
                            format!("error connecting to database: {error}\n{DATABASE_PROMPT}");
                    }
                }
            }
            PromptStep::Ready => return self.confirm_ready(input).await,
        }

        SessionOutcome::Continue
    }

    async fn confirm_ready(&mut self, input: String) -> SessionOutcome {
        if input.eq_ignore_ascii_case(EXIT_KEYWORD) {
            if let Err(error) = self.manager.disconnect().await {
                self.last_output = format!("error closing connection: {error}");
            }
            return SessionOutcome::Exit;
        }

        let (backend, connection) = self.manager.split_mut();
        let Some(connection) = connection else {
            self.last_output = NO_CONNECTION_MESSAGE.to_string();
            return SessionOutcome::Continue;
        };

        self.last_output = query_executor::execute_statement(backend, connection, &input).await;
        SessionOutcome::Continue
    }

    #[cfg(test)]
    fn force_step(&mut self, step: PromptStep) {
        self.step = step;
    }
}
