//! Ingestion of media descriptors and their nested metadata.

use crate::error::ValidationError;
use crate::ingest::attachment::ingest_comment;
use crate::models::{Media, MediaMetaData, MediaType};
use crate::validator::Validator;

const MEDIA_KEYS: &[&str] = &[
    "comments",
    "creation_timestamp",
    "description",
    "media_metadata",
    "thumbnail",
    "title",
    "uri",
];
const METADATA_WRAPPER_KEYS: &[&str] = &["photo_metadata", "video_metadata"];
const THUMBNAIL_KEYS: &[&str] = &["uri"];
const MEDIA_METADATA_KEYS: &[&str] = &[
    "camera_make",
    "camera_model",
    "exposure",
    "focal_length",
    "f_stop",
    "iso",
    "iso_speed",
    "latitude",
    "longitude",
    "modified_timestamp",
    "orientation",
    "original_width",
    "original_height",
    "taken_timestamp",
    "upload_ip",
    "upload_timestamp",
];

/// Ingest the wrapped JSON value as a media descriptor.
///
/// The media type is decided by the singleton key of `media_metadata`
/// (`photo_metadata` or `video_metadata`); when no metadata is present it
/// falls back to the `.mp4` suffix test on the `uri`. The metadata's
/// `upload_ip` and `upload_timestamp` describe the use of the media on the
/// platform rather than the media itself and are hoisted onto the media
/// record; a thumbnail's `{"uri": …}` wrapper is likewise flattened.
pub fn ingest_media(data: &Validator) -> Result<Media, ValidationError> {
    let media_data = data.to_object(MEDIA_KEYS)?;

    let mut comments = Vec::new();
    if let Some(comments_data) = media_data.optional("comments") {
        for comment_data in comments_data.to_list()? {
            comments.push(ingest_comment(&comment_data)?);
        }
    }

    let uri = media_data.required("uri")?.to_str()?.to_string();

    let mut upload_ip = None;
    let mut upload_timestamp = None;
    let (media_type, metadata) = match media_data.optional("media_metadata") {
        Some(wrapper_data) => {
            let (wrapper_key, inner) = wrapper_data.to_singleton_object(METADATA_WRAPPER_KEYS)?;
            let media_type = if wrapper_key == "video_metadata" {
                MediaType::Video
            } else {
                MediaType::Photo
            };
            let metadata =
                ingest_metadata(&inner, &mut upload_ip, &mut upload_timestamp)?;
            (media_type, metadata)
        }
        None => {
            let media_type =
                if uri.ends_with(".mp4") { MediaType::Video } else { MediaType::Photo };
            (media_type, None)
        }
    };

    let thumbnail = match media_data.optional("thumbnail") {
        Some(thumbnail_data) => {
            let (_, thumbnail_uri) = thumbnail_data.to_singleton_object(THUMBNAIL_KEYS)?;
            Some(thumbnail_uri.to_str()?.to_string())
        }
        None => None,
    };

    Ok(Media {
        uri,
        media_type,
        description: media_data
            .optional("description")
            .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
            .transpose()?,
        title: media_data
            .optional("title")
            .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
            .transpose()?,
        creation_timestamp: media_data.required("creation_timestamp")?.to_integer()?,
        upload_timestamp,
        upload_ip,
        thumbnail,
        comments,
        metadata: metadata.filter(|m| !m.is_empty()),
    })
}

/// Ingest a `photo_metadata` or `video_metadata` object, hoisting the
/// `upload_ip` and `upload_timestamp` fields into the caller's slots.
///
/// Some exports nest the real attributes one level further down as
/// `{"exif_data": [<object>]}`; that wrapper is unwrapped first. The raw key
/// `iso` is an alias for `iso_speed`.
fn ingest_metadata(
    data: &Validator,
    upload_ip: &mut Option<String>,
    upload_timestamp: &mut Option<i64>,
) -> Result<Option<MediaMetaData>, ValidationError> {
    let mut metadata_data = data.clone();
    let exif_wrapped = metadata_data
        .value()
        .as_object()
        .is_some_and(|object| object.len() == 1 && object.contains_key("exif_data"));
    if exif_wrapped {
        let (_, exif_data) = metadata_data.to_singleton_object(&["exif_data"])?;
        let mut items = exif_data.to_list()?;
        if items.len() != 1 {
            return Err(exif_data.invalid("is not a list with a single element"));
        }
        metadata_data = items.remove(0);
    }

    let metadata = metadata_data.to_object(MEDIA_METADATA_KEYS)?;

    if let Some(value) = metadata.optional("upload_ip") {
        *upload_ip = Some(value.to_str()?.to_string());
    }
    if let Some(value) = metadata.optional("upload_timestamp") {
        *upload_timestamp = Some(value.to_integer()?);
    }

    let iso_speed = match (metadata.optional("iso"), metadata.optional("iso_speed")) {
        (Some(value), _) => Some(value.to_integer()?),
        (None, Some(value)) => Some(value.to_integer()?),
        (None, None) => None,
    };

    let fields = MediaMetaData {
        camera_make: metadata
            .optional("camera_make")
            .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
            .transpose()?,
        camera_model: metadata
            .optional("camera_model")
            .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
            .transpose()?,
        exposure: metadata
            .optional("exposure")
            .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
            .transpose()?,
        focal_length: metadata
            .optional("focal_length")
            .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
            .transpose()?,
        f_stop: metadata
            .optional("f_stop")
            .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
            .transpose()?,
        iso_speed,
        latitude: metadata.optional("latitude").map(|v| v.to_float()).transpose()?,
        longitude: metadata.optional("longitude").map(|v| v.to_float()).transpose()?,
        modified_timestamp: metadata
            .optional("modified_timestamp")
            .map(|v| v.to_integer())
            .transpose()?,
        orientation: metadata.optional("orientation").map(|v| v.to_integer()).transpose()?,
        original_height: metadata
            .optional("original_height")
            .map(|v| v.to_integer())
            .transpose()?,
        original_width: metadata
            .optional("original_width")
            .map(|v| v.to_integer())
            .transpose()?,
        taken_timestamp: metadata
            .optional("taken_timestamp")
            .map(|v| v.to_integer())
            .transpose()?,
    };

    Ok(Some(fields))
}
