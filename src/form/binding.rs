//! Abstract form controls addressed by logical field name.
//!
//! Panels never touch a renderer directly; they read and write through this
//! trait. Selects hold `(text, value)` options and at most one selection,
//! text inputs hold a string, sub-panel slots hold which item2 editor is shown,
//! and tables hold rows keyed by an id.

use serde::Serialize;

/// One entry of a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub text: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }

    /// Option whose label and value are the same string.
    pub fn same(s: impl Into<String>) -> Self {
        let s = s.into();
        Self {
            text: s.clone(),
            value: s,
        }
    }
}

/// Interchangeable item2 editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubPanel {
    /// ON/OFF selector for binary endpoints.
    State,
    /// Free value input for numeric and other endpoints.
    Value,
    /// Another network endpoint as the comparison target.
    Network,
}

/// One table row: a stable id, its cells and an optional link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<String>,
    pub link: Option<String>,
}

pub trait FormBinding {
    fn clear_options(&mut self, field: &str);
    fn push_option(&mut self, field: &str, option: SelectOption);
    fn options(&self, field: &str) -> Vec<SelectOption>;

    fn selected_index(&self, field: &str) -> Option<usize>;
    /// Out-of-range indices clear the selection.
    fn select_index(&mut self, field: &str, index: Option<usize>);

    fn text(&self, field: &str) -> Option<String>;
    fn set_text(&mut self, field: &str, text: &str);

    fn show_subpanel(&mut self, field: &str, panel: SubPanel);
    fn subpanel(&self, field: &str) -> Option<SubPanel>;

    fn append_row(&mut self, table: &str, row: TableRow);
    fn rows(&self, table: &str) -> Vec<TableRow>;
    /// Returns false when no row carries `row_id` or the column is out of range.
    fn set_cell(&mut self, table: &str, row_id: &str, column: usize, text: &str) -> bool;

    fn selected_option(&self, field: &str) -> Option<SelectOption> {
        let index = self.selected_index(field)?;
        self.options(field).into_iter().nth(index)
    }

    fn selected_value(&self, field: &str) -> Option<String> {
        self.selected_option(field).map(|o| o.value)
    }

    fn selected_text(&self, field: &str) -> Option<String> {
        self.selected_option(field).map(|o| o.text)
    }

    /// Select the first option with this value; clears the selection if none matches.
    fn select_by_value(&mut self, field: &str, value: &str) -> bool {
        let index = self.options(field).iter().position(|o| o.value == value);
        self.select_index(field, index);
        index.is_some()
    }

    /// Select the first option with this label; clears the selection if none matches.
    fn select_by_text(&mut self, field: &str, text: &str) -> bool {
        let index = self.options(field).iter().position(|o| o.text == text);
        self.select_index(field, index);
        index.is_some()
    }

    /// Replace all options with a single entry and select it.
    fn reset_to(&mut self, field: &str, option: SelectOption) {
        self.clear_options(field);
        self.push_option(field, option);
        self.select_index(field, Some(0));
    }
}
