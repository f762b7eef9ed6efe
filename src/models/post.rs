use serde::{Deserialize, Serialize};

use crate::error::MergeError;
use crate::models::location::{Location, add_place};
use crate::models::media::{Media, add_media};
use crate::models::{merge_generated_text, merge_list, merge_scalar, require_equal};

/// An event a post is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub start_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<i64>,
}

/// The external context of a post, typically a link to shared content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalContext {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A normalized post.
///
/// The archive frequently exports the same logical post several times, one
/// copy per attached photo or video, and with field subsets that vary by
/// export vintage. [`Post::merge`] reconciles such copies: all scalar fields
/// follow the per-field merge policy, `media` is unioned by URI, and `places`
/// is unioned with redundant locations folded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Seconds since the Unix epoch at which the post was made.
    pub timestamp: i64,
    /// A backdated timestamp; its semantics in the archive are unclear.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdated_timestamp: Option<i64>,
    /// Nominally the time of an update; in practice it mirrors `timestamp`
    /// and has devolved into a was-updated flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_timestamp: Option<i64>,
    /// The post's textual body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<String>,
    /// Automatically generated title, e.g. `Alice updated her status.`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The name of a recommendation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Text fragments introducing a shared memory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    /// The photos and videos attached to the post; no two share a `uri`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Media>,
    /// The minimal set of non-redundant locations for the post.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub places: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_context: Option<ExternalContext>,
    /// Tagged friends and pages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Post {
    /// Whether this post and the other share their second-resolution
    /// timestamp.
    pub fn is_simultaneous(&self, other: &Post) -> bool {
        self.timestamp == other.timestamp
    }

    /// Whether this post can be merged with the other: every field except
    /// `media` and `places` must be merge-compatible under the per-field
    /// policy. `media` may diverge entirely (it is unioned by [`Post::merge`])
    /// and `places` always unions.
    pub fn is_mergeable_with(&self, other: &Post) -> bool {
        self.merge_scalars(other).is_ok()
    }

    /// Merge this post with the other.
    ///
    /// Fails with a [`MergeError`] if a scalar field cannot be reconciled or
    /// if the two posts hold conflicting media records for the same URI.
    pub fn merge(&self, other: &Post) -> Result<Post, MergeError> {
        let mut merged = self.merge_scalars(other)?;

        let mut media = Vec::with_capacity(self.media.len() + other.media.len());
        for item in self.media.iter().chain(&other.media) {
            add_media(&mut media, item.clone())?;
        }
        merged.media = media;

        let mut places = Vec::with_capacity(self.places.len() + other.places.len());
        for place in self.places.iter().chain(&other.places) {
            add_place(&mut places, place.clone());
        }
        merged.places = places;

        Ok(merged)
    }

    /// Merge everything but `media` and `places`, which union separately.
    fn merge_scalars(&self, other: &Post) -> Result<Post, MergeError> {
        const KIND: &str = "post";
        Ok(Post {
            timestamp: require_equal(KIND, "timestamp", &self.timestamp, &other.timestamp)?,
            backdated_timestamp: merge_scalar(
                KIND,
                "backdated_timestamp",
                &self.backdated_timestamp,
                &other.backdated_timestamp,
            )?,
            update_timestamp: merge_scalar(
                KIND,
                "update_timestamp",
                &self.update_timestamp,
                &other.update_timestamp,
            )?,
            post: merge_scalar(KIND, "post", &self.post, &other.post)?,
            title: merge_generated_text(KIND, "title", &self.title, &other.title)?,
            name: merge_scalar(KIND, "name", &self.name, &other.name)?,
            text: merge_list(KIND, "text", &self.text, &other.text)?,
            media: Vec::new(),
            places: Vec::new(),
            event: merge_scalar(KIND, "event", &self.event, &other.event)?,
            external_context: merge_scalar(
                KIND,
                "external_context",
                &self.external_context,
                &other.external_context,
            )?,
            tags: merge_list(KIND, "tags", &self.tags, &other.tags)?,
        })
    }
}
