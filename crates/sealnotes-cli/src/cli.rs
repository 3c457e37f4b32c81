use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use sealnotes_core::VERSION;

/// Sealnotes - notes with optional per-note encryption at rest
#[derive(Parser)]
#[command(name = "sealnotes")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the note store
    #[arg(short, long, global = true, env = "SEALNOTES_STORE")]
    pub store: Option<String>,

    /// Owner whose notes are managed
    #[arg(short, long, global = true, env = "SEALNOTES_OWNER")]
    pub owner: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a note
    Create(CreateArgs),

    /// Show a note, decrypting it when a password is given
    Show(ShowArgs),

    /// List notes, most recently updated first
    List(ListArgs),

    /// Update a note's title, content or encryption
    Update(UpdateArgs),

    /// Delete a note
    Delete(DeleteArgs),

    /// Copy a note under a new encryption setting
    Recreate(RecreateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Password sources shared by commands that take the note's password.
#[derive(Args, Default)]
pub struct PasswordArgs {
    /// Note password
    #[arg(long, env = "SEALNOTES_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Prompt for the note password
    #[arg(long, conflicts_with = "password")]
    pub ask_password: bool,
}

/// Arguments for the `create` command
#[derive(Args)]
pub struct CreateArgs {
    /// Note title
    #[arg(short, long)]
    pub title: String,

    /// Note content (read from stdin when omitted)
    #[arg(short, long)]
    pub content: Option<String>,

    /// Encrypt the note with a password
    #[arg(long)]
    pub encrypt: bool,

    #[command(flatten)]
    pub password: PasswordArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: String,

    #[command(flatten)]
    pub password: PasswordArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Number of notes to skip
    #[arg(long, default_value_t = 0)]
    pub skip: usize,

    /// Page size (1-100)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `update` command
#[derive(Args)]
pub struct UpdateArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New content
    #[arg(short, long, conflicts_with = "stdin")]
    pub content: Option<String>,

    /// Read new content from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Encrypt the note
    #[arg(long, conflicts_with = "decrypt")]
    pub encrypt: bool,

    /// Store the note as plaintext
    #[arg(long)]
    pub decrypt: bool,

    #[command(flatten)]
    pub password: PasswordArgs,

    /// Current password when changing to a new one
    #[arg(long, env = "SEALNOTES_OLD_PASSWORD", hide_env_values = true)]
    pub old_password: Option<String>,

    /// Prompt for the current password
    #[arg(long, conflicts_with = "old_password")]
    pub ask_old_password: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl UpdateArgs {
    /// Requested encryption disposition, if any.
    pub fn target_encryption(&self) -> Option<bool> {
        match (self.encrypt, self.decrypt) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `recreate` command
#[derive(Args)]
pub struct RecreateArgs {
    /// Note ID of the original
    #[arg(value_name = "ID")]
    pub id: String,

    /// Title for the copy (defaults to the original's)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Content for the copy (defaults to the original's)
    #[arg(short, long)]
    pub content: Option<String>,

    /// Encrypt the copy
    #[arg(long)]
    pub encrypt: bool,

    #[command(flatten)]
    pub password: PasswordArgs,

    /// Password of the original (defaults to --password)
    #[arg(long, env = "SEALNOTES_OLD_PASSWORD", hide_env_values = true)]
    pub old_password: Option<String>,

    /// Prompt for the original's password
    #[arg(long, conflicts_with = "old_password")]
    pub ask_old_password: bool,

    /// Delete the original once the copy is stored
    #[arg(long)]
    pub delete_original: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_update_target_encryption() {
        let cli = Cli::try_parse_from(["sealnotes", "update", "abc", "--encrypt"]).unwrap();
        match cli.command {
            Commands::Update(args) => assert_eq!(args.target_encryption(), Some(true)),
            _ => panic!("expected update"),
        }

        let cli = Cli::try_parse_from(["sealnotes", "update", "abc"]).unwrap();
        match cli.command {
            Commands::Update(args) => assert_eq!(args.target_encryption(), None),
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn test_encrypt_and_decrypt_conflict() {
        let result = Cli::try_parse_from(["sealnotes", "update", "abc", "--encrypt", "--decrypt"]);
        assert!(result.is_err());
    }
}
