//! Store - Persistence, layout preference, settings, and PDF writing
//!
//! This crate handles key-value storage backends, persisted state with
//! schema migration, the observable state store, the download layout
//! preference and its notification channel, export settings, and the
//! image-only PDF writer.

mod error;
mod storage;
mod persisted;
mod state_store;
mod notifications;
mod layout_pref;
mod settings;
pub mod pdf;

pub use error::*;
pub use storage::*;
pub use persisted::*;
pub use state_store::*;
pub use notifications::*;
pub use layout_pref::*;
pub use settings::*;
