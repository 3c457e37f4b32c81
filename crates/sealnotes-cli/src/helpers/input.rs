use std::io::{self, IsTerminal, Read};

use dialoguer::Password;
use secrecy::SecretString;

use crate::cli::PasswordArgs;

/// Resolve a password from an explicit value or an interactive prompt.
///
/// Empty values count as "no password".
pub fn resolve_secret(
    value: Option<&str>,
    ask: bool,
    prompt: &str,
) -> anyhow::Result<Option<SecretString>> {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        return Ok(Some(SecretString::from(value.to_string())));
    }
    if !ask {
        return Ok(None);
    }
    if !io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "Cannot prompt for a password without a TTY. Set SEALNOTES_PASSWORD."
        ));
    }
    let entered = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
    if entered.is_empty() {
        return Ok(None);
    }
    Ok(Some(SecretString::from(entered)))
}

/// Resolve the note password from `--password`, `SEALNOTES_PASSWORD` or
/// `--ask-password`.
pub fn resolve_password(args: &PasswordArgs, prompt: &str) -> anyhow::Result<Option<SecretString>> {
    resolve_secret(args.password.as_deref(), args.ask_password, prompt)
}

/// Content from a flag, else from piped stdin.
pub fn read_content(content: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = content {
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No content provided. Use --content or pipe it on stdin."
        ));
    }
    read_stdin_content()
}

/// Read all of stdin, dropping trailing newlines.
pub fn read_stdin_content() -> anyhow::Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    Ok(buffer.trim_end_matches(['\n', '\r']).to_string())
}
