//! Data models for records and API payloads.

/// Snippet record, create payload, and partial update patch.
pub mod snippet;
