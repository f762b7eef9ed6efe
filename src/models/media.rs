use serde::{Deserialize, Serialize};

use crate::error::MergeError;
use crate::models::{merge_generated_text, merge_list, merge_scalar, require_equal};

/// The kind of a media record, derived from the metadata key in the raw
/// archive (`photo_metadata` or `video_metadata`) or, failing that, from the
/// file suffix of the `uri`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
}

/// A comment on a post, photo, or video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub comment: String,
    pub timestamp: i64,
}

/// Camera and exposure metadata attached to a photo or video.
///
/// Purely descriptive; the `upload_ip` and `upload_timestamp` the archive
/// stores alongside these fields describe the use of the media on the
/// platform, not the media itself, and are hoisted onto [`Media`] during
/// ingestion. Every remaining attribute is optional and, even when present,
/// often the empty string or zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f_stop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_speed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_height: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_timestamp: Option<i64>,
}

impl MediaMetaData {
    pub fn is_empty(&self) -> bool {
        *self == MediaMetaData::default()
    }

    pub fn is_mergeable_with(&self, other: &MediaMetaData) -> bool {
        self.merge(other).is_ok()
    }

    /// Merge field-wise: equal values kept, absences filled from the present
    /// side, divergent present values rejected.
    pub fn merge(&self, other: &MediaMetaData) -> Result<MediaMetaData, MergeError> {
        const KIND: &str = "media metadata";
        Ok(MediaMetaData {
            camera_make: merge_scalar(KIND, "camera_make", &self.camera_make, &other.camera_make)?,
            camera_model: merge_scalar(
                KIND,
                "camera_model",
                &self.camera_model,
                &other.camera_model,
            )?,
            exposure: merge_scalar(KIND, "exposure", &self.exposure, &other.exposure)?,
            focal_length: merge_scalar(
                KIND,
                "focal_length",
                &self.focal_length,
                &other.focal_length,
            )?,
            f_stop: merge_scalar(KIND, "f_stop", &self.f_stop, &other.f_stop)?,
            iso_speed: merge_scalar(KIND, "iso_speed", &self.iso_speed, &other.iso_speed)?,
            latitude: merge_scalar(KIND, "latitude", &self.latitude, &other.latitude)?,
            longitude: merge_scalar(KIND, "longitude", &self.longitude, &other.longitude)?,
            modified_timestamp: merge_scalar(
                KIND,
                "modified_timestamp",
                &self.modified_timestamp,
                &other.modified_timestamp,
            )?,
            orientation: merge_scalar(KIND, "orientation", &self.orientation, &other.orientation)?,
            original_height: merge_scalar(
                KIND,
                "original_height",
                &self.original_height,
                &other.original_height,
            )?,
            original_width: merge_scalar(
                KIND,
                "original_width",
                &self.original_width,
                &other.original_width,
            )?,
            taken_timestamp: merge_scalar(
                KIND,
                "taken_timestamp",
                &self.taken_timestamp,
                &other.taken_timestamp,
            )?,
        })
    }
}

/// A posted photo or video.
///
/// The `uri` is the media's identity: a relative path into the personal data
/// archive, resolved from the archive root. Two media records with the same
/// `uri` describe the same photo or video; the archive exports the same media
/// with different field subsets depending on export vintage, which merging
/// reconciles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub uri: String,
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub creation_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_ip: Option<String>,
    /// Thumbnail URI, hoisted out of the raw `{"uri": …}` wrapper. Like
    /// `uri`, a relative path resolved from the archive root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MediaMetaData>,
}

impl Media {
    /// Whether this media record can be merged with the other: same `uri`,
    /// `media_type`, and `creation_timestamp`, with every remaining field
    /// equal or absent on one side.
    pub fn is_mergeable_with(&self, other: &Media) -> bool {
        self.merge(other).is_ok()
    }

    /// Merge this media record with the other. A non-empty comment list is
    /// preferred over an empty one, and generated titles merge by the
    /// longest-prefix rule.
    pub fn merge(&self, other: &Media) -> Result<Media, MergeError> {
        const KIND: &str = "media";
        let metadata = match (&self.metadata, &other.metadata) {
            (Some(a), Some(b)) => Some(a.merge(b)?),
            (a, b) => a.as_ref().or(b.as_ref()).cloned(),
        };
        Ok(Media {
            uri: require_equal(KIND, "uri", &self.uri, &other.uri)?,
            media_type: require_equal(KIND, "media_type", &self.media_type, &other.media_type)?,
            description: merge_scalar(KIND, "description", &self.description, &other.description)?,
            title: merge_generated_text(KIND, "title", &self.title, &other.title)?,
            creation_timestamp: require_equal(
                KIND,
                "creation_timestamp",
                &self.creation_timestamp,
                &other.creation_timestamp,
            )?,
            upload_timestamp: merge_scalar(
                KIND,
                "upload_timestamp",
                &self.upload_timestamp,
                &other.upload_timestamp,
            )?,
            upload_ip: merge_scalar(KIND, "upload_ip", &self.upload_ip, &other.upload_ip)?,
            thumbnail: merge_scalar(KIND, "thumbnail", &self.thumbnail, &other.thumbnail)?,
            comments: merge_list(KIND, "comments", &self.comments, &other.comments)?,
            metadata,
        })
    }
}

/// Fold a media record into a list keyed by `uri`: records sharing a `uri`
/// must merge, anything else is appended in order.
///
/// This maintains the invariant that no two media records of one post share
/// a `uri`.
pub(crate) fn add_media(all_media: &mut Vec<Media>, media: Media) -> Result<(), MergeError> {
    for existing in all_media.iter_mut() {
        if existing.uri == media.uri {
            *existing = existing.merge(&media)?;
            return Ok(());
        }
    }
    all_media.push(media);
    Ok(())
}
