//! Field-driven record comparison and stable sorting.
//!
//! Values are compared by their runtime type: text with [`locale_cmp`],
//! timestamps by instant, booleans with `false < true`, numbers numerically,
//! tag lists by their joined text. Values of different kinds are ordered by
//! kind, so comparison never fails and stays a total order.

use crate::models::snippet::Snippet;
use crate::picker::{Picker, SingleSelect};
use chrono::{DateTime, SecondsFormat, Utc};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;


/// Record attribute a list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Title,
    Description,
    Content,
    Language,
    Tags,
    Favorite,
    CreatedAt,
    UpdatedAt,
    /// Content length in characters.
    Length,
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Active `(field, direction)` pair for a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::UpdatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Sort picker listing every field label, with this spec's field selected.
    pub fn field_picker(self) -> Picker<SingleSelect> {
        let options = SortField::all()
            .iter()
            .map(|field| field.label().to_string())
            .collect();
        Picker::new(
            options,
            SingleSelect::new(Some(self.field.label().to_string())),
        )
    }

    /// Order picker with both directions, this spec's direction selected.
    pub fn direction_picker(self) -> Picker<SingleSelect> {
        let options = [SortDirection::Ascending, SortDirection::Descending]
            .iter()
            .map(|direction| direction.label().to_string())
            .collect();
        Picker::new(
            options,
            SingleSelect::new(Some(self.direction.label().to_string())),
        )
    }

    /// Read the current choice of a sort picker and an order picker.
    ///
    /// # Returns
    /// `None` when either picker has no recognizable selection.
    pub fn from_pickers(
        field: &Picker<SingleSelect>,
        direction: &Picker<SingleSelect>,
    ) -> Option<Self> {
        let field = field.selection().value()?.parse().ok()?;
        let direction = direction.selection().value()?.parse().ok()?;
        Some(Self::new(field, direction))
    }
}

impl SortField {
    pub fn all() -> &'static [SortField] {
        use SortField::*;
        &[
            Title,
            Description,
            Content,
            Language,
            Tags,
            Favorite,
            CreatedAt,
            UpdatedAt,
            Length,
        ]
    }

    /// Human-facing label, as shown in the sort picker.
    pub fn label(self) -> &'static str {
        match self {
            SortField::Title => "Title",
            SortField::Description => "Description",
            SortField::Content => "Content",
            SortField::Language => "Language",
            SortField::Tags => "Tags",
            SortField::Favorite => "Favorites",
            SortField::CreatedAt => "Date Created",
            SortField::UpdatedAt => "Last Modified",
            SortField::Length => "Length",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            SortField::Title => &["title", "name"],
            SortField::Description => &["description", "desc"],
            SortField::Content => &["content"],
            SortField::Language => &["language", "lang"],
            SortField::Tags => &["tags", "tag"],
            SortField::Favorite => &["favorites", "favorite", "fav", "isfavorite"],
            SortField::CreatedAt => &["date created", "created", "createdat", "created-at"],
            SortField::UpdatedAt => &[
                "last modified",
                "date updated",
                "updated",
                "updatedat",
                "updated-at",
                "modified",
            ],
            SortField::Length => &["length", "len", "size"],
        }
    }
}

impl SortDirection {
    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }

    /// Orient an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognized sort field or direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort {kind} '{value}'")]
pub struct ParseSortError {
    kind: &'static str,
    value: String,
}

impl FromStr for SortField {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        SortField::all()
            .iter()
            .copied()
            .find(|field| field.aliases().contains(&normalized.as_str()))
            .ok_or_else(|| ParseSortError {
                kind: "field",
                value: s.to_string(),
            })
    }
}

impl FromStr for SortDirection {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "ascending order" => Ok(SortDirection::Ascending),
            "desc" | "descending" | "descending order" => Ok(SortDirection::Descending),
            _ => Err(ParseSortError {
                kind: "direction",
                value: s.to_string(),
            }),
        }
    }
}

/// A record attribute read for comparison, tagged with its runtime type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Text(Cow<'a, str>),
    Timestamp(DateTime<Utc>),
    Bool(bool),
    Number(f64),
    List(&'a [String]),
}

impl FieldValue<'_> {
    /// Text representation; tag lists compare through it.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Missing => Cow::Borrowed(""),
            FieldValue::Text(text) => Cow::Borrowed(text.as_ref()),
            FieldValue::Timestamp(at) => {
                Cow::Owned(at.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            FieldValue::Bool(value) => Cow::Borrowed(if *value { "true" } else { "false" }),
            FieldValue::Number(value) => Cow::Owned(value.to_string()),
            FieldValue::List(items) => Cow::Owned(items.join(", ")),
        }
    }

    /// Position of this value's kind when two kinds meet. `Missing` comes first.
    fn rank(&self) -> u8 {
        match self {
            FieldValue::Missing => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Number(_) => 2,
            FieldValue::Timestamp(_) => 3,
            FieldValue::Text(_) => 4,
            FieldValue::List(_) => 5,
        }
    }
}

/// Records that expose their attributes to the comparator.
pub trait Sortable {
    fn sort_value(&self, field: SortField) -> FieldValue<'_>;
}

impl Sortable for Snippet {
    fn sort_value(&self, field: SortField) -> FieldValue<'_> {
        match field {
            SortField::Title => FieldValue::Text(Cow::Borrowed(&self.title)),
            SortField::Description => FieldValue::Text(Cow::Borrowed(&self.description)),
            SortField::Content => FieldValue::Text(Cow::Borrowed(&self.content)),
            SortField::Language => FieldValue::Text(Cow::Borrowed(&self.language)),
            SortField::Tags => FieldValue::List(&self.tags),
            SortField::Favorite => FieldValue::Bool(self.is_favorite),
            SortField::CreatedAt => FieldValue::Timestamp(self.created_at),
            SortField::UpdatedAt => FieldValue::Timestamp(self.updated_at),
            SortField::Length => FieldValue::Number(self.char_count() as f64),
        }
    }
}

/// Locale-style text ordering.
///
/// Compares case-folded text first, then prefers lowercase over uppercase at
/// the first differing letter, then raw code points, so `"apple" < "Zebra"`
/// and the result is a total order. Empty text sorts before any other text.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Compare two field values in ascending order.
///
/// Equal kinds use their own ordering. Different kinds never compare equal:
/// they are ordered by kind alone, which keeps the result transitive when a
/// field mixes kinds across records.
pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Missing, FieldValue::Missing) => Ordering::Equal,
        (FieldValue::Text(left), FieldValue::Text(right)) => locale_cmp(left, right),
        (FieldValue::Timestamp(left), FieldValue::Timestamp(right)) => left.cmp(right),
        (FieldValue::Bool(left), FieldValue::Bool(right)) => left.cmp(right),
        (FieldValue::Number(left), FieldValue::Number(right)) => left.total_cmp(right),
        (FieldValue::List(_), FieldValue::List(_)) => locale_cmp(&a.as_text(), &b.as_text()),
        _ => a.rank().cmp(&b.rank()),
    }
}

/// Compare two records by `spec.field`, oriented by `spec.direction`.
pub fn compare<R: Sortable + ?Sized>(a: &R, b: &R, spec: SortSpec) -> Ordering {
    let ordering = compare_values(&a.sort_value(spec.field), &b.sort_value(spec.field));
    spec.direction.apply(ordering)
}

/// Return a new, stably sorted copy of `records`. The input is left untouched.
pub fn sort_all<R: Sortable + Clone>(records: &[R], spec: SortSpec) -> Vec<R> {
    let mut sorted = records.to_vec();
    sort_in_place(&mut sorted, spec);
    sorted
}

/// Stable in-place sort used by owners of a collection.
pub(crate) fn sort_in_place<R: Sortable>(records: &mut [R], spec: SortSpec) {
    records.sort_by(|a, b| compare(a, b, spec));
}
