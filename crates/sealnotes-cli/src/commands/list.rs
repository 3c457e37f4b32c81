use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::output::{notes_json, print_json, print_note_list};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let limit = ctx.page_size(args.limit);

    let session = ctx.open_session()?;
    let notes = session.service.list_notes(&session.owner, args.skip, limit)?;
    session.close()?;

    if args.json {
        print_json(&notes_json(&notes)?)?;
    } else {
        print_note_list(&notes, ctx.quiet());
    }
    Ok(())
}
