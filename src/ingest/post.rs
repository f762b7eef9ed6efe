//! Ingestion of raw posts.

use crate::error::{IngestError, ValidationError};
use crate::ingest::attachment::{ingest_event, ingest_external_context, ingest_location};
use crate::ingest::media::ingest_media;
use crate::models::location::add_place;
use crate::models::media::add_media;
use crate::models::{Event, ExternalContext, Location, Media, Post};
use crate::validator::Validator;

const POST_KEYS: &[&str] = &["attachments", "data", "tags", "timestamp", "title"];
const ATTACHMENT_WRAPPER_KEYS: &[&str] = &["data"];
const ATTACHMENT_KEYS: &[&str] =
    &["event", "external_context", "media", "name", "place", "text"];
const DATA_KEYS: &[&str] = &["backdated_timestamp", "post", "update_timestamp"];

/// The attachment payloads collected while walking a post's `attachments`.
#[derive(Default)]
struct Attachments {
    media: Vec<Media>,
    places: Vec<Location>,
    text: Vec<String>,
    event: Option<Event>,
    external_context: Option<ExternalContext>,
    name: Option<String>,
}

/// Ingest the wrapped JSON value as a post.
///
/// Both singleton-list pseudo-fields are hoisted here: every element of
/// `attachments[*].data` and of `data` is a single-key object whose sole
/// key/value pair becomes a field of the post. Media accumulate in order
/// (unioned by URI), places fold into a minimal location set, and text
/// fragments append; `event`, `external_context`, and `name` may repeat only
/// with identical values, while the `data` keys may not repeat at all.
pub fn ingest_post(data: &Validator) -> Result<Post, IngestError> {
    let post_data = data.to_object(POST_KEYS)?;

    let mut attachments = Attachments::default();
    if let Some(attachments_data) = post_data.optional("attachments") {
        ingest_attachments(&attachments_data, &mut attachments)?;
    }

    let mut backdated_timestamp = None;
    let mut update_timestamp = None;
    let mut body = None;
    if let Some(data_list) = post_data.optional("data") {
        for item in data_list.to_list()? {
            let (key, value) = item.to_singleton_object(DATA_KEYS)?;
            let slot_taken = match key {
                "post" => {
                    let taken = body.is_some();
                    if !taken {
                        body = Some(value.to_str()?.to_string());
                    }
                    taken
                }
                "backdated_timestamp" => {
                    let taken = backdated_timestamp.is_some();
                    if !taken {
                        backdated_timestamp = Some(value.to_integer()?);
                    }
                    taken
                }
                _ => {
                    let taken = update_timestamp.is_some();
                    if !taken {
                        update_timestamp = Some(value.to_integer()?);
                    }
                    taken
                }
            };
            if slot_taken {
                return Err(item.invalid(format!("has redundant field \"{key}\"")).into());
            }
        }
    }

    let mut tags = Vec::new();
    if let Some(tags_data) = post_data.optional("tags") {
        for tag_data in tags_data.to_list()? {
            tags.push(tag_data.to_str()?.to_string());
        }
    }

    let timestamp = post_data.required("timestamp")?.to_integer()?;
    let title = post_data
        .optional("title")
        .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
        .transpose()?;

    let mut all_media = attachments.media;

    // Adjust media descriptions, giving the post body priority:
    //  1. Remove a media description that duplicates the post body.
    //  2. Hoist the description to the post body if all media share the same
    //     one and there is no post body.
    if let Some(body_text) = &body {
        for media in all_media.iter_mut() {
            if media.description.as_ref() == Some(body_text) {
                media.description = None;
            }
        }
    } else if let Some(shared) = all_media.first().and_then(|m| m.description.clone())
        && all_media.iter().all(|m| m.description.as_ref() == Some(&shared))
    {
        body = Some(shared);
        for media in all_media.iter_mut() {
            media.description = None;
        }
    }

    Ok(Post {
        timestamp,
        backdated_timestamp,
        update_timestamp,
        post: body,
        title,
        name: attachments.name,
        text: attachments.text,
        media: all_media,
        places: attachments.places,
        event: attachments.event,
        external_context: attachments.external_context,
        tags,
    })
}

/// Walk `attachments`, a list of `{"data": [...]}` wrappers around
/// single-key attachment objects.
fn ingest_attachments(data: &Validator, attachments: &mut Attachments) -> Result<(), IngestError> {
    for outer_item in data.to_list()? {
        let (_, inner_list) = outer_item.to_singleton_object(ATTACHMENT_WRAPPER_KEYS)?;
        for inner_item in inner_list.to_list()? {
            let (key, value) = inner_item.to_singleton_object(ATTACHMENT_KEYS)?;
            match key {
                "media" => add_media(&mut attachments.media, ingest_media(&value)?)?,
                "place" => add_place(&mut attachments.places, ingest_location(&value)?),
                "text" => attachments.text.push(value.to_str()?.to_string()),
                // The remaining attachment kinds may repeat, but only with
                // identical values.
                "event" => {
                    let event = ingest_event(&value)?;
                    set_repeatable(&inner_item, key, &mut attachments.event, event)?;
                }
                "external_context" => {
                    let context = ingest_external_context(&value)?;
                    set_repeatable(&inner_item, key, &mut attachments.external_context, context)?;
                }
                _ => {
                    let name = value.to_str()?.to_string();
                    set_repeatable(&inner_item, key, &mut attachments.name, name)?;
                }
            }
        }
    }
    Ok(())
}

fn set_repeatable<T: PartialEq>(
    item: &Validator,
    key: &str,
    slot: &mut Option<T>,
    value: T,
) -> Result<(), ValidationError> {
    match slot {
        Some(existing) if *existing != value => {
            Err(item.invalid(format!("has repeated, divergent value for field \"{key}\"")))
        }
        _ => {
            *slot = Some(value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::models::MediaType;

    use super::*;

    fn ingest(value: &serde_json::Value, filename: &str) -> Result<Post, IngestError> {
        ingest_post(&Validator::new(value, filename))
    }

    #[test]
    fn test_ingest_full_post() {
        let value = json!({
            "timestamp": 665,
            "attachments": [
                {"data": [
                    {"external_context": {"name": "Apparebit", "url": "https://apparebit.com"}}
                ]},
                {"data": [
                    {"place": {
                        "name": "Somewhere",
                        "coordinate": {"latitude": 665, "longitude": 42},
                        "address": "1 Nowhere Place"
                    }},
                    {"place": {
                        "name": "Somewhere",
                        "coordinate": {"latitude": 665, "longitude": 42},
                        "address": "1 Nowhere Place",
                        "url": "https://apparebit.com"
                    }}
                ]},
                {"data": [
                    {"media": {
                        "uri": "photo.jpg",
                        "creation_timestamp": 111,
                        "media_metadata": {"photo_metadata": {
                            "camera_make": "",
                            "orientation": 1,
                            "upload_ip": "2600:1010:b00f::a301"
                        }},
                        "thumbnail": {"uri": "thumbnail.jpg"},
                        "title": "Mobile Uploads",
                        "description": "Ooh pretty!"
                    }},
                    {"media": {
                        "uri": "video.mp4",
                        "creation_timestamp": 222,
                        "media_metadata": {"video_metadata": {
                            "upload_ip": "2600:1010:b00f::a301"
                        }},
                        "title": "Mobile Uploads",
                        "comments": [
                            {"author": "Robert", "comment": "Pretty!", "timestamp": 444},
                            {"author": "Otto", "comment": "Ugly!", "timestamp": 445}
                        ],
                        "description": "A contested video"
                    }}
                ]}
            ],
            "data": [{"post": "Ooh pretty!"}],
            "title": "Photo and Video",
            "tags": ["pretty", "ugly"]
        });

        let post = ingest(&value, "valid-post").unwrap();

        assert_eq!(post.timestamp, 665);
        assert_eq!(post.title.as_deref(), Some("Photo and Video"));
        assert_eq!(post.post.as_deref(), Some("Ooh pretty!"));
        assert_eq!(post.tags, vec!["pretty", "ugly"]);
        assert!(post.text.is_empty());
        assert_eq!(post.name, None);
        assert_eq!(post.backdated_timestamp, None);
        assert_eq!(post.update_timestamp, None);
        assert_eq!(post.event, None);

        let context = post.external_context.as_ref().unwrap();
        assert_eq!(context.url.as_deref(), Some("https://apparebit.com"));

        // The two copies of the place fold into one, keeping the url.
        assert_eq!(post.places.len(), 1);
        assert_eq!(post.places[0].name, "Somewhere");
        assert_eq!(post.places[0].latitude, Some(665.0));
        assert_eq!(post.places[0].url.as_deref(), Some("https://apparebit.com"));

        assert_eq!(post.media.len(), 2);
        let photo = &post.media[0];
        assert_eq!(photo.media_type, MediaType::Photo);
        // Removed because it duplicates the post body.
        assert_eq!(photo.description, None);
        assert_eq!(photo.thumbnail.as_deref(), Some("thumbnail.jpg"));
        assert_eq!(photo.upload_ip.as_deref(), Some("2600:1010:b00f::a301"));
        let metadata = photo.metadata.as_ref().unwrap();
        assert_eq!(metadata.camera_make.as_deref(), Some(""));
        assert_eq!(metadata.orientation, Some(1));

        let video = &post.media[1];
        assert_eq!(video.media_type, MediaType::Video);
        assert_eq!(video.description.as_deref(), Some("A contested video"));
        assert!(video.metadata.is_none());
        assert_eq!(video.comments.len(), 2);
        assert_eq!(video.comments[0].author, "Robert");
        assert_eq!(video.comments[1].comment, "Ugly!");
    }

    #[test]
    fn test_description_hoisted_to_absent_body() {
        let media = |uri: &str| {
            json!({"media": {
                "uri": uri,
                "creation_timestamp": 1,
                "description": "Shared caption"
            }})
        };
        let value = json!({
            "timestamp": 665,
            "attachments": [{"data": [media("one.jpg"), media("two.jpg")]}]
        });

        let post = ingest(&value, "doc").unwrap();
        assert_eq!(post.post.as_deref(), Some("Shared caption"));
        assert!(post.media.iter().all(|m| m.description.is_none()));
    }

    #[test]
    fn test_description_not_hoisted_over_existing_body() {
        let value = json!({
            "timestamp": 665,
            "data": [{"post": "The body"}],
            "attachments": [{"data": [
                {"media": {"uri": "one.jpg", "creation_timestamp": 1, "description": "Caption"}}
            ]}]
        });

        let post = ingest(&value, "doc").unwrap();
        assert_eq!(post.post.as_deref(), Some("The body"));
        assert_eq!(post.media[0].description.as_deref(), Some("Caption"));
    }

    #[test]
    fn test_unexpected_top_level_key_rejected() {
        let value = json!({"answer": 42});
        let err = ingest(&value, "malformed").unwrap_err();
        assert_eq!(err.to_string(), "malformed contains unexpected field answer");
    }

    #[test]
    fn test_wrong_timestamp_type_rejected() {
        let value = json!({"timestamp": "665"});
        let err = ingest(&value, "malformed").unwrap_err();
        assert_eq!(err.to_string(), "malformed.timestamp is not an integer");
    }

    #[test]
    fn test_attachment_paths_in_errors() {
        let value = json!({"attachments": [{"data": [{"event": {"name": 42}}]}]});
        let err = ingest(&value, "malformed").unwrap_err();
        assert_eq!(err.to_string(), "malformed.attachments[0].data[0].event.name is not a string");

        let value = json!({"attachments": {"data": []}});
        let err = ingest(&value, "malformed").unwrap_err();
        assert_eq!(err.to_string(), "malformed.attachments is not a list");
    }

    #[test]
    fn test_redundant_data_field_rejected() {
        let value = json!({
            "timestamp": 1,
            "data": [{"post": "one"}, {"post": "two"}]
        });
        let err = ingest(&value, "malformed").unwrap_err();
        assert_eq!(err.to_string(), "malformed.data[1] has redundant field \"post\"");
    }

    #[test]
    fn test_repeated_attachment_tolerated_only_when_identical() {
        let name = |value: &str| json!({"name": value});
        let identical = json!({
            "timestamp": 1,
            "attachments": [{"data": [name("Rob"), name("Rob")]}]
        });
        let post = ingest(&identical, "doc").unwrap();
        assert_eq!(post.name.as_deref(), Some("Rob"));

        let divergent = json!({
            "timestamp": 1,
            "attachments": [{"data": [name("Rob"), name("Bob")]}]
        });
        let err = ingest(&divergent, "doc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "doc.attachments[0].data[1] has repeated, divergent value for field \"name\""
        );
    }

    #[test]
    fn test_text_fragments_accumulate() {
        let value = json!({
            "timestamp": 1,
            "attachments": [{"data": [{"text": "textual"}, {"text": "texture"}]}]
        });
        let post = ingest(&value, "doc").unwrap();
        assert_eq!(post.text, vec!["textual", "texture"]);
    }

    #[test]
    fn test_data_scalars_ingested() {
        let value = json!({
            "timestamp": 1,
            "data": [{"backdated_timestamp": 665}, {"update_timestamp": 42}, {"post": "body"}]
        });
        let post = ingest(&value, "doc").unwrap();
        assert_eq!(post.backdated_timestamp, Some(665));
        assert_eq!(post.update_timestamp, Some(42));
        assert_eq!(post.post.as_deref(), Some("body"));
    }
}
