use sealnotes_core::NoteRecreate;
use secrecy::{ExposeSecret, SecretString};

use crate::app::AppContext;
use crate::cli::RecreateArgs;
use crate::helpers::{resolve_password, resolve_secret};
use crate::output::{note_json, print_json};

pub fn handle_recreate(ctx: &AppContext, args: &RecreateArgs) -> anyhow::Result<()> {
    let password = resolve_password(&args.password, "Password for the copy")?;
    let old_password = resolve_secret(
        args.old_password.as_deref(),
        args.ask_old_password,
        "Password of the original",
    )?;
    let decrypt_password = old_password.or_else(|| {
        password
            .as_ref()
            .map(|secret| SecretString::from(secret.expose_secret().to_string()))
    });

    let request = NoteRecreate {
        title: args.title.clone(),
        content: args.content.clone(),
        is_encrypted: args.encrypt,
        encryption_password: if args.encrypt { password } else { None },
    };

    let session = ctx.open_session()?;
    let note = session.service.recreate_note(
        &args.id,
        &session.owner,
        request,
        decrypt_password.as_ref(),
        args.delete_original,
    )?;
    session.close()?;

    if args.json {
        print_json(&note_json(&note)?)?;
    } else if ctx.quiet() {
        println!("{}", note.id);
    } else {
        println!("Recreated note {} as {}", args.id, note.id);
        if args.delete_original {
            println!("Deleted original {}", args.id);
        }
    }
    Ok(())
}
