use sealnotes_core::NoteCreate;

use crate::app::AppContext;
use crate::cli::CreateArgs;
use crate::helpers::{read_content, resolve_password};
use crate::output::{note_json, print_json};

pub fn handle_create(ctx: &AppContext, args: &CreateArgs) -> anyhow::Result<()> {
    let content = read_content(args.content.clone())?;
    let encryption_password = if args.encrypt {
        resolve_password(&args.password, "Encryption password")?
    } else {
        None
    };

    let session = ctx.open_session()?;
    let note = session.service.create_note(
        &session.owner,
        NoteCreate {
            title: args.title.clone(),
            content,
            is_encrypted: args.encrypt,
            encryption_password,
        },
    )?;
    session.close()?;

    if args.json {
        print_json(&note_json(&note)?)?;
    } else if ctx.quiet() {
        println!("{}", note.id);
    } else {
        println!("Created note {}", note.id);
    }
    Ok(())
}
