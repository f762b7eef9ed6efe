//! Error types for the normalization pipeline.
//!
//! Three failure classes exist, matching the three stages that can reject
//! input:
//!
//! - [`RepairError`] - the byte-level encoding repair reassembled an escape
//!   run that is not valid UTF-8; fatal for the whole document
//! - [`ValidationError`] - raw JSON at a given path does not match the
//!   expected shape, type, or key set; attributable to a single post
//! - [`MergeError`] - two records deemed mergeable could not be reconciled on
//!   some field; the merge attempt is abandoned and both records are kept
//!
//! Per-post errors are collected and reported without aborting the batch,
//! file-level errors are fatal for that file only. The CLI boundary wraps
//! everything in `anyhow` for display.

use thiserror::Error;

/// Raw input at `path` does not match the expected shape or type.
///
/// The path locates the offending value within the document, starting with
/// the filename, e.g. `posts.json[3].attachments[0].data[0].media.uri`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path} {message}")]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

/// Two records could not be reconciled on `field`.
///
/// Both conflicting values are captured verbatim so that no information
/// silently disappears when the merge attempt is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to merge {kind} records: field `{field}` has conflicting values {left} and {right}")]
pub struct MergeError {
    /// The record kind being merged, e.g. `post` or `media`.
    pub kind: &'static str,
    /// The field that could not be reconciled.
    pub field: &'static str,
    pub left: String,
    pub right: String,
}

impl MergeError {
    pub fn conflict(
        kind: &'static str,
        field: &'static str,
        left: &impl std::fmt::Debug,
        right: &impl std::fmt::Debug,
    ) -> Self {
        MergeError {
            kind,
            field,
            left: format!("{left:?}"),
            right: format!("{right:?}"),
        }
    }
}

/// An escape run did not decode back to valid UTF-8 during text repair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("escape sequence run at byte offset {offset} decodes to invalid UTF-8: {bytes:02x?}")]
pub struct RepairError {
    /// Byte offset of the first escape sequence of the run.
    pub offset: usize,
    /// The bytes named by the run of `\u00XX` escapes.
    pub bytes: Vec<u8>,
}

/// A per-post ingestion failure: either the raw post failed validation or a
/// merge attempt against an already ingested post could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Merge(#[from] MergeError),
}
