//! Shared constants used across Code Stash crates.

use std::time::Duration;

/// Default port of the snippet backend.
pub const DEFAULT_PORT: u16 = 8080;

/// Default base URL for API clients.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Default request timeout for API clients, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Path segments of the snippet collection resource below the server URL.
pub const SNIPPETS_PATH: &[&str] = &["api", "v1", "snippets"];

/// Path segments of the tag listing resource below the server URL.
pub const TAGS_PATH: &[&str] = &["api", "v1", "tags"];

/// Delay between a picker losing focus and its popover closing.
pub const PICKER_BLUR_CLOSE_DELAY: Duration = Duration::from_millis(300);
