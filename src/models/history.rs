//! Accumulation of ingested posts into a deduplicated timeline.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::MergeError;
use crate::models::Post;

/// The history of posts across one or more archive files.
///
/// Posts are organized by timestamp, which makes it cheap to fold the
/// archive's per-photo duplicates into one post and to eliminate the exact
/// duplicates that arise when ingesting overlapping archives. Ingestion adds
/// posts one at a time, in input order; once all posts have been added,
/// [`timeline`](PostHistory::timeline) yields the unique posts sorted by
/// timestamp.
#[derive(Debug, Default)]
pub struct PostHistory {
    posts: BTreeMap<i64, Vec<Post>>,
}

impl PostHistory {
    pub fn new() -> Self {
        PostHistory::default()
    }

    /// Number of distinct posts currently held.
    pub fn len(&self) -> usize {
        self.posts.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Add a post to the history.
    ///
    /// If the history already holds a mergeable post with the same timestamp,
    /// that entry is replaced by the merge result. The incoming post is
    /// always retained: when a post looks mergeable but its media cannot be
    /// reconciled, both posts are kept unmerged and the [`MergeError`] is
    /// returned as a diagnostic.
    pub fn add(&mut self, post: Post) -> Option<MergeError> {
        let entries = self.posts.entry(post.timestamp).or_default();
        for existing in entries.iter_mut() {
            if existing.is_mergeable_with(&post) {
                match existing.merge(&post) {
                    Ok(merged) => {
                        *existing = merged;
                        return None;
                    }
                    Err(err) => {
                        entries.push(post);
                        return Some(err);
                    }
                }
            }
        }
        entries.push(post);
        None
    }

    /// All unique posts in chronological order, ties in input order.
    pub fn timeline(&self) -> Vec<Post> {
        self.posts.values().flatten().cloned().collect()
    }
}

/// Find all runs of simultaneous posts on the given timeline and return the
/// index ranges of those runs.
///
/// Distinct posts sharing a second-resolution timestamp do occur, so this is
/// a diagnostic signal rather than an error; it is nonetheless rare enough
/// that each run deserves manual review for an unhandled merge case.
pub fn find_simultaneous_posts(timeline: &[Post]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();

    let mut index = 0;
    while index < timeline.len() {
        let start = index;
        while index + 1 < timeline.len() && timeline[start].is_simultaneous(&timeline[index + 1]) {
            index += 1;
        }
        if start != index {
            runs.push(start..index + 1);
        }
        index += 1;
    }

    runs
}
