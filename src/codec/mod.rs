//! Byte-level text repair and archive file reading.
//!
//! Control flow through this module is strictly forward: raw bytes are
//! repaired by [`repair::restore_utf8`], then parsed into `serde_json::Value`
//! by [`archive::parse_archive`], which also accepts both top-level archive
//! shapes (a bare post list or the legacy `status_updates` wrapper).

pub mod archive;
pub mod repair;

pub use archive::{parse_archive, read_archive};
pub use repair::restore_utf8;
