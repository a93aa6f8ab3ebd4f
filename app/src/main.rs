use passo_adapters::mysql::MysqlBackend;
use passo_core::session::Session;

fn run_app(
    run_tui: impl FnOnce(Session<MysqlBackend>) -> Result<(), passo_tui::TuiError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::new(MysqlBackend);
    run_tui(session)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_app(passo_tui::run)
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::run_app;

    #[test]
    fn run_app_returns_ok_when_tui_runner_succeeds() {
        let result = run_app(|_session| Ok(()));
        assert!(result.is_ok());
    }

    #[test]
    fn run_app_propagates_tui_errors() {
        let result = run_app(|_session| Err(passo_tui::TuiError::Io(io::Error::other("boom"))));
        assert!(result.is_err());
    }
}
