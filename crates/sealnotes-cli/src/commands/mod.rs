//! Command handlers, one module per subcommand.

mod create;
mod delete;
mod list;
mod misc;
mod recreate;
mod show;
mod update;

pub use create::handle_create;
pub use delete::handle_delete;
pub use list::handle_list;
pub use misc::handle_completions;
pub use recreate::handle_recreate;
pub use show::handle_show;
pub use update::handle_update;
