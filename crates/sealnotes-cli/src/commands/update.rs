use sealnotes_core::NoteUpdate;

use crate::app::AppContext;
use crate::cli::UpdateArgs;
use crate::helpers::{read_stdin_content, resolve_password, resolve_secret};
use crate::output::{note_json, print_json};

pub fn handle_update(ctx: &AppContext, args: &UpdateArgs) -> anyhow::Result<()> {
    let content = if args.stdin {
        Some(read_stdin_content()?)
    } else {
        args.content.clone()
    };

    let update = NoteUpdate {
        title: args.title.clone(),
        content,
        is_encrypted: args.target_encryption(),
        encryption_password: resolve_password(&args.password, "Note password")?,
        old_encryption_password: resolve_secret(
            args.old_password.as_deref(),
            args.ask_old_password,
            "Current password",
        )?,
    };

    let session = ctx.open_session()?;
    let note = session.service.update_note(&args.id, &session.owner, update)?;
    session.close()?;

    if args.json {
        print_json(&note_json(&note)?)?;
    } else if !ctx.quiet() {
        println!("Updated note {}", note.id);
    }
    Ok(())
}
