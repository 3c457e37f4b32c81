//! CLI error type carrying an exit code and an optional hint.

use std::fmt;

use sealnotes_core::NoteError;

use crate::constants::exit_codes;

/// An error to report to the user before exiting with `code`.
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub hint: Option<String>,
    pub code: i32,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
            code,
        }
    }

    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::new(exit_codes::NOT_FOUND, message).with_hint(hint)
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(exit_codes::AUTH_FAILED, message)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Exit code for a core error.
pub fn note_error_code(err: &NoteError) -> i32 {
    match err {
        NoteError::NotFound(_) => exit_codes::NOT_FOUND,
        NoteError::InvalidInput(_) | NoteError::Format(_) => exit_codes::INVALID_INPUT,
        NoteError::AuthenticationFailure => exit_codes::AUTH_FAILED,
        NoteError::DecryptionRequired => exit_codes::DECRYPTION_REQUIRED,
        _ => exit_codes::FAILURE,
    }
}

/// Print an error chain and return the process exit code for it.
pub fn report(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        eprintln!("Error: {}", cli_err.message);
        if let Some(hint) = &cli_err.hint {
            eprintln!("{}", hint);
        }
        return cli_err.code;
    }

    eprintln!("Error: {:#}", err);
    err.chain()
        .find_map(|cause| cause.downcast_ref::<NoteError>())
        .map(note_error_code)
        .unwrap_or(exit_codes::FAILURE)
}
