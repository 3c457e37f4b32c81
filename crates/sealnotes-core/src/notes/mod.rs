//! Notes: encryption transitions, read-path decryption and the service that
//! ties them to a store.

pub mod read;
mod seal;
pub mod service;
pub mod transition;
pub mod types;

pub use read::{is_sentinel, resolve_content, ContentView, SENTINEL_PREFIX};
pub use service::{NoteService, MAX_PAGE_SIZE};
pub use transition::{plan_create, plan_update, CreatePlan, Transition, UpdatePlan};
pub use types::{Note, NoteCreate, NoteRecreate, NoteUpdate};
