//! Headless selectable-list popover.
//!
//! Single-choice pickers back the sort field and order controls
//! (see `SortSpec::field_picker`); the tag filter uses a multi-choice one.

use crate::constants::PICKER_BLUR_CLOSE_DELAY;
use std::time::Instant;

/// Selection policy of a [`Picker`].
pub trait Selection {
    /// Whether `option` is currently selected.
    fn is_selected(&self, option: &str) -> bool;

    /// Apply a user choice.
    ///
    /// # Returns
    /// `true` when the popover should close after the choice.
    fn choose(&mut self, option: &str) -> bool;
}

/// At most one selected option; choosing closes the popover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleSelect {
    value: Option<String>,
}

impl SingleSelect {
    pub fn new(value: Option<String>) -> Self {
        Self { value }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Selection for SingleSelect {
    fn is_selected(&self, option: &str) -> bool {
        self.value.as_deref() == Some(option)
    }

    fn choose(&mut self, option: &str) -> bool {
        self.value = Some(option.to_string());
        true
    }
}

/// Any number of selected options; choosing toggles membership and keeps the popover open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelect {
    values: Vec<String>,
}

impl MultiSelect {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Selected options in the order they were chosen.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Add `option` when absent, remove it when present.
    ///
    /// # Returns
    /// `true` when the option is selected afterwards.
    pub fn toggle(&mut self, option: &str) -> bool {
        if let Some(index) = self.values.iter().position(|value| value == option) {
            self.values.remove(index);
            return false;
        }
        self.values.push(option.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl Selection for MultiSelect {
    fn is_selected(&self, option: &str) -> bool {
        self.values.iter().any(|value| value == option)
    }

    fn choose(&mut self, option: &str) -> bool {
        self.toggle(option);
        false
    }
}

/// One row of an open picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerEntry<'a> {
    pub option: &'a str,
    pub selected: bool,
}

/// Popover state: options, selection, and open/closed flag with delayed close on blur.
#[derive(Debug, Clone)]
pub struct Picker<S: Selection> {
    options: Vec<String>,
    selection: S,
    open: bool,
    close_at: Option<Instant>,
}

impl<S: Selection> Picker<S> {
    pub fn new(options: Vec<String>, selection: S) -> Self {
        Self {
            options,
            selection,
            open: false,
            close_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.close_at = None;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.close_at = None;
    }

    /// Flip between open and closed.
    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Focus left the picker: schedule a close after [`PICKER_BLUR_CLOSE_DELAY`].
    pub fn blur(&mut self, now: Instant) {
        if self.open {
            self.close_at = Some(now + PICKER_BLUR_CLOSE_DELAY);
        }
    }

    /// Apply a pending blur close once its deadline has passed.
    ///
    /// # Returns
    /// `true` when this call closed the popover.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.close_at {
            Some(deadline) if now >= deadline => {
                self.close();
                true
            }
            _ => false,
        }
    }

    /// Apply a choice. Options not offered by this picker are ignored.
    ///
    /// # Returns
    /// `true` when the choice was applied.
    pub fn choose(&mut self, option: &str) -> bool {
        if !self.options.iter().any(|candidate| candidate == option) {
            return false;
        }
        if self.selection.choose(option) {
            self.close();
        }
        true
    }

    pub fn entries(&self) -> impl Iterator<Item = PickerEntry<'_>> + '_ {
        self.options.iter().map(|option| PickerEntry {
            option: option.as_str(),
            selected: self.selection.is_selected(option),
        })
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selection(&self) -> &S {
        &self.selection
    }

    pub fn into_selection(self) -> S {
        self.selection
    }
}
