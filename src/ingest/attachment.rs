//! Ingestion of the small attachment record kinds: comments, events,
//! external contexts, and locations.

use crate::error::ValidationError;
use crate::models::{Comment, Event, ExternalContext, Location};
use crate::validator::Validator;

const COMMENT_KEYS: &[&str] = &["author", "comment", "timestamp"];
const EVENT_KEYS: &[&str] = &["name", "start_timestamp", "end_timestamp"];
const EXTERNAL_CONTEXT_KEYS: &[&str] = &["name", "source", "url"];
const LOCATION_KEYS: &[&str] = &["address", "coordinate", "name", "url"];
const COORDINATE_KEYS: &[&str] = &["latitude", "longitude"];

/// Ingest the wrapped JSON value as a comment.
pub fn ingest_comment(data: &Validator) -> Result<Comment, ValidationError> {
    let comment_data = data.to_object(COMMENT_KEYS)?;
    Ok(Comment {
        author: comment_data.required("author")?.to_str()?.to_string(),
        comment: comment_data.required("comment")?.to_str()?.to_string(),
        timestamp: comment_data.required("timestamp")?.to_integer()?,
    })
}

/// Ingest the wrapped JSON value as an event.
pub fn ingest_event(data: &Validator) -> Result<Event, ValidationError> {
    let event_data = data.to_object(EVENT_KEYS)?;
    Ok(Event {
        name: event_data.required("name")?.to_str()?.to_string(),
        start_timestamp: event_data.required("start_timestamp")?.to_integer()?,
        end_timestamp: event_data
            .optional("end_timestamp")
            .map(|v| v.to_integer())
            .transpose()?,
    })
}

/// Ingest the wrapped JSON value as an external context.
pub fn ingest_external_context(data: &Validator) -> Result<ExternalContext, ValidationError> {
    let context_data = data.to_object(EXTERNAL_CONTEXT_KEYS)?;
    Ok(ExternalContext {
        name: context_data.required("name")?.to_str()?.to_string(),
        source: context_data
            .optional("source")
            .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
            .transpose()?,
        url: context_data
            .optional("url")
            .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
            .transpose()?,
    })
}

/// Ingest the wrapped JSON value as a location, hoisting the nested
/// `coordinate` object's `latitude` and `longitude` into the record.
pub fn ingest_location(data: &Validator) -> Result<Location, ValidationError> {
    let location_data = data.to_object(LOCATION_KEYS)?;

    let (latitude, longitude) = match location_data.optional("coordinate") {
        Some(coordinate_data) => {
            let coordinate = coordinate_data.to_object(COORDINATE_KEYS)?;
            (
                Some(coordinate.required("latitude")?.to_float()?),
                Some(coordinate.required("longitude")?.to_float()?),
            )
        }
        None => (None, None),
    };

    Ok(Location {
        name: location_data.required("name")?.to_str()?.to_string(),
        address: location_data
            .optional("address")
            .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
            .transpose()?,
        latitude,
        longitude,
        url: location_data
            .optional("url")
            .map(|v| Ok::<_, ValidationError>(v.to_str()?.to_string()))
            .transpose()?,
    })
}
