use sealnotes_core::notes::{is_sentinel, SENTINEL_PREFIX};

use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::errors::CliError;
use crate::helpers::resolve_password;
use crate::output::{note_json, print_json, print_note};

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let password = resolve_password(&args.password, "Note password")?;

    let session = ctx.open_session()?;
    let note = session
        .service
        .get_note(&args.id, &session.owner, password.as_ref())?;
    session.close()?;

    let note = note.ok_or_else(|| {
        CliError::not_found(
            format!("Note {} not found", args.id),
            "Hint: Run `sealnotes list` to find note IDs.",
        )
    })?;

    // Without a password a sentinel is the expected answer; with one it is a failure.
    if note.is_encrypted && password.is_some() && is_sentinel(&note.content) {
        return Err(CliError::auth_failed(format!(
            "Failed to decrypt note: {}",
            sentinel_detail(&note.content)
        ))
        .into());
    }

    if args.json {
        print_json(&note_json(&note)?)?;
    } else {
        print_note(&note, ctx.quiet());
    }
    Ok(())
}

fn sentinel_detail(content: &str) -> &str {
    content
        .strip_prefix(SENTINEL_PREFIX)
        .map(|rest| rest.trim_start_matches(" - "))
        .map(|rest| rest.strip_suffix(']').unwrap_or(rest))
        .unwrap_or(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_detail() {
        assert_eq!(
            sentinel_detail("[Encrypted content - Invalid decryption password]"),
            "Invalid decryption password"
        );
        assert_eq!(sentinel_detail("plain"), "plain");
    }
}
