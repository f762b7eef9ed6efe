//! Reading of archive files into parsed JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::codec::repair::restore_utf8;

/// Name of the field wrapping the post list in older archive exports.
const LEGACY_WRAPPER_KEY: &str = "status_updates";

/// Read an archive file, repair its encoding, and parse it as JSON.
///
/// The raw bytes are run through [`restore_utf8`] before parsing, since
/// archive files are not guaranteed to be valid UTF-8 as exported.
pub fn read_archive(path: &Path) -> Result<Value> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read archive file: {}", path.display()))?;
    parse_archive(&bytes).with_context(|| format!("in archive file: {}", path.display()))
}

/// Repair and parse archive bytes, unwrapping the legacy top-level shape.
///
/// Newer exports hold a bare list of posts at the top level; older ones wrap
/// that list in an object under `status_updates`. Both are accepted and both
/// yield the inner list. Anything else is returned as parsed for the
/// ingestion layer to reject with a located error.
pub fn parse_archive(bytes: &[u8]) -> Result<Value> {
    let repaired = restore_utf8(bytes)?;
    let mut value: Value =
        serde_json::from_slice(&repaired).context("failed to parse archive as JSON")?;

    if let Value::Object(ref mut object) = value
        && let Some(inner) = object.remove(LEGACY_WRAPPER_KEY)
    {
        return Ok(inner);
    }
    Ok(value)
}
