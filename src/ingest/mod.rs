//! Ingestion of raw archive JSON into the normalized post model.
//!
//! The archive wraps almost everything in lists of single-key objects, one
//! key/value pair per list element; ingestion validates each layer strictly
//! and hoists those pseudo-fields into ordinary record fields. A defective
//! post aborts ingestion of that post only; the rest of the archive is still
//! processed.

mod attachment;
mod media;
mod post;

pub use attachment::{ingest_comment, ingest_event, ingest_external_context, ingest_location};
pub use media::ingest_media;
pub use post::ingest_post;

use crate::error::IngestError;
use crate::models::PostHistory;
use crate::validator::Validator;

/// Ingest all posts of an archive into the history.
///
/// Returns the diagnostics accumulated along the way: one per defective post
/// and one per post pair whose media could not be reconciled during
/// deduplication. Well-formed posts are added to the history regardless of
/// how many of their siblings fail.
pub fn ingest_all(data: &Validator, history: &mut PostHistory) -> Vec<IngestError> {
    let items = match data.to_list() {
        Ok(items) => items,
        Err(err) => return vec![err.into()],
    };

    let mut errors = Vec::new();
    for item in &items {
        match ingest_post(item) {
            Ok(post) => {
                if let Some(err) = history.add(post) {
                    errors.push(err.into());
                }
            }
            Err(err) => errors.push(err),
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_ingest_many_posts() {
        let value = json!([
            {"timestamp": 3, "data": [{"post": "three"}]},
            {"timestamp": 1, "data": [{"post": "one"}]},
            {"timestamp": 2, "data": [{"post": "two"}]},
            {"timestamp": 1, "data": [{"post": "one"}]},
            {"timestamp": 4, "data": [{"post": "four"}]},
            {"timestamp": 5, "data": [{"post": "five"}]},
            {"timestamp": 2, "data": [{"post": "two"}]}
        ]);
        let mut history = PostHistory::new();
        let errors = ingest_all(&Validator::new(&value, "posts"), &mut history);

        assert!(errors.is_empty());
        let timeline = history.timeline();
        assert_eq!(timeline.len(), 5);
        let bodies: Vec<_> = timeline.iter().map(|p| p.post.as_deref().unwrap()).collect();
        assert_eq!(bodies, vec!["one", "two", "three", "four", "five"]);
    }

    #[test]
    fn test_defective_post_does_not_poison_the_rest() {
        let mut items: Vec<serde_json::Value> =
            (0..10).map(|n| json!({"timestamp": n, "data": [{"post": n.to_string()}]})).collect();
        items[6] = json!({"timestamp": "six"});
        let value = serde_json::Value::Array(items);

        let mut history = PostHistory::new();
        let errors = ingest_all(&Validator::new(&value, "posts"), &mut history);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "posts[6].timestamp is not an integer");
        assert_eq!(history.len(), 9);
    }

    #[test]
    fn test_non_list_archive_rejected() {
        let value = json!({"timestamp": 1});
        let mut history = PostHistory::new();
        let errors = ingest_all(&Validator::new(&value, "posts"), &mut history);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "posts is not a list");
        assert!(history.is_empty());
    }

    #[test]
    fn test_unreconcilable_media_reported_but_both_posts_kept() {
        let media = |ts: i64| {
            json!({"media": {"uri": "one.jpg", "creation_timestamp": ts}})
        };
        let value = json!([
            {"timestamp": 665, "attachments": [{"data": [media(1)]}]},
            {"timestamp": 665, "attachments": [{"data": [media(2)]}]}
        ]);

        let mut history = PostHistory::new();
        let errors = ingest_all(&Validator::new(&value, "posts"), &mut history);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("creation_timestamp"));
        assert_eq!(history.len(), 2);
    }
}
