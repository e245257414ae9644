//! Document storage for nfa-graph projects.
//!
//! Independent of the automaton crates: stores arbitrary serde documents as
//! JSON text with optional [`Validator`] and [`Refactor`] hooks, and packs
//! files or directories into zip archives.
//!
//! ## Example
//!
//! ```no_run
//! use nfa_graph_store::{DocumentStore, StoreConfig};
//!
//! # fn main() -> nfa_graph_store::StoreResult<()> {
//! let store = DocumentStore::new(StoreConfig::load()?);
//! store.save(&vec!["a", "b"], "alphabet", None)?;
//!
//! let not_empty = |text: &str| !text.trim().is_empty();
//! let alphabet: Vec<String> = store.load("alphabet", Some(&not_empty), None)?;
//! assert_eq!(alphabet.len(), 2);
//!
//! store.archive(&["alphabet"])?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
mod config;
mod document;
mod error;

pub use archive::{archive_dir, archive_file, archive_files};
pub use config::{StoreConfig, ENV_ARCHIVE_DIR, ENV_EXTENSION, ENV_PRETTY, ENV_ROOT};
pub use document::{DocumentStore, Refactor, ValidateAndRefactor, Validator};
pub use error::{StoreError, StoreResult};
