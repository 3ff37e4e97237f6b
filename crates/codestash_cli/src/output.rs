//! Text and JSON rendering for CLI results.

use codestash_core::picker::{Picker, Selection, SingleSelect};
use codestash_core::Snippet;
use serde::Serialize;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("response encoding error: {}", err))
}

fn summary_row(snippet: &Snippet) -> String {
    let marker = if snippet.is_favorite { '*' } else { ' ' };
    format!(
        "{} {:<36} {:<30} {:<12} {:>5} {}",
        marker,
        snippet.id,
        snippet.title,
        snippet.language,
        snippet.line_count(),
        snippet.tags.join(",")
    )
}

/// One row per snippet: favorite marker, id, title, language, line count, tags.
pub fn format_list_output(snippets: &[Snippet], json: bool) -> Result<String, String> {
    if json {
        return to_json(snippets);
    }
    Ok(snippets
        .iter()
        .map(summary_row)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Raw content in text mode, the full record in JSON mode.
pub fn format_get_output(snippet: &Snippet, json: bool) -> Result<String, String> {
    if json {
        return to_json(snippet);
    }
    Ok(snippet.content.clone())
}

pub fn format_saved_output(action: &str, snippet: &Snippet, json: bool) -> Result<String, String> {
    if json {
        return to_json(snippet);
    }
    Ok(format!("{}: {} ({})", action, snippet.title, snippet.id))
}

pub fn format_delete_output(id: &str, json: bool) -> Result<String, String> {
    if json {
        return to_json(&serde_json::json!({ "id": id, "deleted": true }));
    }
    Ok(format!("Deleted snippet: {}", id))
}

#[derive(Serialize)]
struct PickerRow<'a> {
    option: &'a str,
    selected: bool,
}

fn picker_rows<S: Selection>(picker: &Picker<S>) -> Vec<PickerRow<'_>> {
    picker
        .entries()
        .map(|entry| PickerRow {
            option: entry.option,
            selected: entry.selected,
        })
        .collect()
}

fn checklist<S: Selection>(picker: &Picker<S>) -> String {
    picker
        .entries()
        .map(|entry| format!("[{}] {}", if entry.selected { 'x' } else { ' ' }, entry.option))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render every option with a checkbox reflecting the picker's selection.
pub fn format_picker_output<S: Selection>(picker: &Picker<S>, json: bool) -> Result<String, String> {
    if json {
        return to_json(&picker_rows(picker));
    }
    Ok(checklist(picker))
}

/// Both sort pickers, field first.
pub fn format_sort_output(
    fields: &Picker<SingleSelect>,
    directions: &Picker<SingleSelect>,
    json: bool,
) -> Result<String, String> {
    if json {
        return to_json(&serde_json::json!({
            "sort": picker_rows(fields),
            "order": picker_rows(directions),
        }));
    }
    Ok(format!(
        "Sort by:\n{}\nOrder:\n{}",
        checklist(fields),
        checklist(directions)
    ))
}
