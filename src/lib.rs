//! Postwash - Clean and consolidate posts exported from Facebook
//!
//! This library turns the raw JSON of Facebook's post archive into a clean,
//! deduplicated, chronological timeline. It supports:
//!
//! - Repairing the archive's mojibake, i.e. UTF-8 bytes exported as `\u00XX`
//!   escape sequences
//! - Strict, fail-fast validation of the raw JSON with filename-rooted paths
//!   in every error
//! - Hoisting the archive's singleton-list pseudo-fields into a flat record
//!   model
//! - Folding the per-photo duplicate posts the archive exports into single
//!   posts with all their media
//!
//! # Example
//!
//! ```no_run
//! use postwash::{PostHistory, Validator, ingest_all, read_archive};
//!
//! let value = read_archive("your_posts_1.json".as_ref())?;
//! let mut history = PostHistory::new();
//! let errors = ingest_all(&Validator::new(&value, "your_posts_1.json"), &mut history);
//! println!("{} posts, {} errors", history.len(), errors.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod codec;
pub mod error;
pub mod ingest;
pub mod models;
pub mod validator;

// Re-export commonly used types
pub use codec::{parse_archive, read_archive, restore_utf8};
pub use error::{IngestError, MergeError, RepairError, ValidationError};
pub use ingest::{ingest_all, ingest_post};
pub use models::{Post, PostHistory, find_simultaneous_posts};
pub use validator::Validator;
