use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::errors::CliError;

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let deleted = session.service.delete_note(&args.id, &session.owner)?;
    session.close()?;

    if !deleted {
        return Err(CliError::not_found(
            format!("Note {} not found", args.id),
            "Hint: Run `sealnotes list` to find note IDs.",
        )
        .into());
    }

    if !ctx.quiet() {
        println!("Deleted note {}", args.id);
    }
    Ok(())
}
