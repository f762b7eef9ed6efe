//! The target record model for normalized posts.
//!
//! These types capture everything the raw archive encodes, in a much simpler
//! shape. The main type is [`Post`]; it depends on [`Comment`], [`Event`],
//! [`ExternalContext`], [`Location`], [`Media`], and [`MediaMetaData`].
//! [`PostHistory`] accumulates ingested posts and folds redundant copies of
//! the same logical post into one.
//!
//! Records are immutable once constructed: merging never mutates in place but
//! returns a new record. Each mergeable type exposes an `is_mergeable_with`
//! predicate and a `merge` operation that agree with each other; `merge`
//! re-validates every field and fails with a [`MergeError`](crate::error::MergeError)
//! naming the conflicting field and both values rather than discarding
//! information.
//!
//! Serialization drops absent options and empty lists, so the JSON output
//! stays compact; `#[serde(default)]` fills them back in on deserialization.

pub mod history;
pub mod location;
pub mod media;
pub mod post;

pub use history::{PostHistory, find_simultaneous_posts};
pub use location::Location;
pub use media::{Comment, Media, MediaMetaData, MediaType};
pub use post::{Event, ExternalContext, Post};

use std::fmt::Debug;

use crate::error::MergeError;

/// Field policy: both sides must hold the identical value.
pub(crate) fn require_equal<T: Clone + PartialEq + Debug>(
    kind: &'static str,
    field: &'static str,
    left: &T,
    right: &T,
) -> Result<T, MergeError> {
    if left == right {
        Ok(left.clone())
    } else {
        Err(MergeError::conflict(kind, field, left, right))
    }
}

/// Field policy: identical values are kept, an absent side is filled from the
/// present one, divergent present values are a conflict.
pub(crate) fn merge_scalar<T: Clone + PartialEq + Debug>(
    kind: &'static str,
    field: &'static str,
    left: &Option<T>,
    right: &Option<T>,
) -> Result<Option<T>, MergeError> {
    match (left, right) {
        (Some(a), Some(b)) if a != b => Err(MergeError::conflict(kind, field, a, b)),
        (Some(a), _) => Ok(Some(a.clone())),
        (None, b) => Ok(b.clone()),
    }
}

/// Field policy for automatically generated title-like text: in addition to
/// the scalar policy, when one value is a textual prefix of the other the
/// longer value wins.
pub(crate) fn merge_generated_text(
    kind: &'static str,
    field: &'static str,
    left: &Option<String>,
    right: &Option<String>,
) -> Result<Option<String>, MergeError> {
    match (left, right) {
        (Some(a), Some(b)) => {
            if a.len() >= b.len() && a.starts_with(b.as_str()) {
                Ok(Some(a.clone()))
            } else if b.starts_with(a.as_str()) {
                Ok(Some(b.clone()))
            } else {
                Err(MergeError::conflict(kind, field, a, b))
            }
        }
        (Some(a), None) => Ok(Some(a.clone())),
        (None, b) => Ok(b.clone()),
    }
}

/// Field policy for ordered lists: identical lists are kept and an empty list
/// never beats a non-empty one; divergent non-empty lists are a conflict.
pub(crate) fn merge_list<T: Clone + PartialEq + Debug>(
    kind: &'static str,
    field: &'static str,
    left: &[T],
    right: &[T],
) -> Result<Vec<T>, MergeError> {
    if left == right || right.is_empty() {
        Ok(left.to_vec())
    } else if left.is_empty() {
        Ok(right.to_vec())
    } else {
        Err(MergeError::conflict(kind, field, &left, &right))
    }
}
