//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for creating directories of test archive files
pub struct ArchiveDirBuilder {
    temp_dir: TempDir,
}

impl ArchiveDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a JSON value as an archive file and return its path
    pub fn with_archive(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, serde_json::to_vec(value).expect("Failed to serialize archive"))
            .expect("Failed to write archive");
        path
    }

    /// Write raw bytes as an archive file and return its path
    pub fn with_raw_archive(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, bytes).expect("Failed to write archive");
        path
    }
}

/// A minimal raw post with just a timestamp and a body
pub fn raw_post(timestamp: i64, body: &str) -> Value {
    json!({"timestamp": timestamp, "data": [{"post": body}]})
}

/// A raw post carrying a single photo attachment
pub fn raw_post_with_photo(timestamp: i64, uri: &str) -> Value {
    json!({
        "timestamp": timestamp,
        "attachments": [{"data": [{"media": {"uri": uri, "creation_timestamp": timestamp}}]}]
    })
}
