//! List query parameters and query-string encoding.

use crate::picker::MultiSelect;
use url::form_urlencoded::byte_serialize;

/// Encode `values` as repeated `key=value` pairs joined with `&`.
///
/// `encode_query_array("tags", &["a", "b"])` yields `"tags=a&tags=b"`; an
/// empty slice yields `""`. Keys and values are form-urlencoded.
pub fn encode_query_array<S: AsRef<str>>(key: &str, values: &[S]) -> String {
    let key: String = byte_serialize(key.as_bytes()).collect();
    values
        .iter()
        .map(|value| {
            let value: String = byte_serialize(value.as_ref().as_bytes()).collect();
            format!("{}={}", key, value)
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Search text and tag filter sent with a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    search: String,
    tags: MultiSelect,
}

impl ListQuery {
    pub fn new(search: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            search: search.into(),
            tags: MultiSelect::new(tags),
        }
    }

    /// Search text with surrounding whitespace removed.
    pub fn search(&self) -> &str {
        self.search.trim()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn tags(&self) -> &[String] {
        self.tags.values()
    }

    pub fn tag_selection(&self) -> &MultiSelect {
        &self.tags
    }

    /// Add `tag` to the filter when absent, remove it when present.
    ///
    /// # Returns
    /// `true` when the tag is part of the filter afterwards.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        self.tags.toggle(tag)
    }

    pub fn set_tags(&mut self, tags: MultiSelect) {
        self.tags = tags;
    }

    /// `q=<search>` (omitted when blank) followed by one `tags=` pair per tag.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if !self.search().is_empty() {
            parts.push(encode_query_array("q", &[self.search()]));
        }
        if !self.tags.is_empty() {
            parts.push(encode_query_array("tags", self.tags()));
        }
        parts.join("&")
    }
}
