//! Application context for the Sealnotes CLI.
//!
//! Bundles CLI arguments with the loaded configuration, and opens the note
//! store once for the duration of a command.

use std::path::PathBuf;
use std::sync::Arc;

use sealnotes_core::storage::SqliteNoteStore;
use sealnotes_core::NoteService;
use tracing::debug;

use crate::cli::Cli;
use crate::config::SealnotesConfig;

use super::resolver::{resolve_owner, resolve_page_size, resolve_store_path};

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: SealnotesConfig,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli, config: SealnotesConfig) -> Self {
        Self { cli, config }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn owner(&self) -> String {
        resolve_owner(self.cli, &self.config)
    }

    pub fn page_size(&self, requested: Option<usize>) -> usize {
        resolve_page_size(requested, &self.config)
    }

    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        resolve_store_path(self.cli, &self.config)
    }

    /// Open the note store and build a service over it.
    pub fn open_session(&self) -> anyhow::Result<Session> {
        let path = self.store_path()?;
        debug!(path = %path.display(), "opening note store");
        let store = Arc::new(SqliteNoteStore::open(&path)?);
        Ok(Session {
            service: NoteService::new(store.clone()),
            store,
            owner: self.owner(),
        })
    }
}

/// An open store plus the service and owner a command works with.
pub struct Session {
    pub service: NoteService,
    pub owner: String,
    store: Arc<SqliteNoteStore>,
}

impl Session {
    /// Release the store.
    pub fn close(self) -> anyhow::Result<()> {
        let Session { service, store, .. } = self;
        drop(service);
        match Arc::try_unwrap(store) {
            Ok(store) => store.close()?,
            Err(_) => debug!("note store still shared; closing on drop"),
        }
        Ok(())
    }
}
