//! Snippet record, create/update payloads, and tag helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A code snippet as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a snippet. The backend assigns id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Partial update of a snippet's mutable fields.
///
/// Absent fields are left untouched and omitted from the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl Snippet {
    /// Number of lines in the content, counting an empty content as one line.
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Number of characters in the content.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

impl SnippetPatch {
    /// Patch that only sets the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Patch that only sets the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Patch that only sets the favorite flag.
    pub fn favorite(is_favorite: bool) -> Self {
        Self {
            is_favorite: Some(is_favorite),
            ..Self::default()
        }
    }

    /// `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.content.is_none()
            && self.language.is_none()
            && self.tags.is_none()
            && self.is_favorite.is_none()
    }

    /// Whether applying this patch would alter any field of `snippet`.
    pub fn changes(&self, snippet: &Snippet) -> bool {
        fn differs<T: PartialEq + ?Sized>(next: Option<&T>, current: &T) -> bool {
            next.is_some_and(|value| value != current)
        }

        differs(self.title.as_deref(), snippet.title.as_str())
            || differs(self.description.as_deref(), snippet.description.as_str())
            || differs(self.content.as_deref(), snippet.content.as_str())
            || differs(self.language.as_deref(), snippet.language.as_str())
            || differs(self.tags.as_deref(), snippet.tags.as_slice())
            || differs(self.is_favorite.as_ref(), &snippet.is_favorite)
    }

    /// Merge this patch over `snippet`. Id and timestamps are never touched.
    ///
    /// # Returns
    /// A new [`Snippet`] with the patched fields replaced.
    pub fn apply_to(&self, snippet: &Snippet) -> Snippet {
        let mut merged = snippet.clone();
        if let Some(title) = &self.title {
            merged.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            merged.description.clone_from(description);
        }
        if let Some(content) = &self.content {
            merged.content.clone_from(content);
        }
        if let Some(language) = &self.language {
            merged.language.clone_from(language);
        }
        if let Some(tags) = &self.tags {
            merged.tags.clone_from(tags);
        }
        if let Some(is_favorite) = self.is_favorite {
            merged.is_favorite = is_favorite;
        }
        merged
    }
}

/// Trim, drop blanks, and dedupe tags case-insensitively, keeping the first spelling.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let trimmed = tag.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if out
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(trimmed))
        {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

/// Parse a comma-separated tag list with [`normalize_tags`] semantics.
pub fn parse_tags_csv(input: &str) -> Vec<String> {
    normalize_tags(input.split(','))
}
