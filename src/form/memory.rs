//! In-memory [`FormBinding`] used by the CLI and the tests.

use crate::form::binding::{FormBinding, SelectOption, SubPanel, TableRow};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    Select {
        options: Vec<SelectOption>,
        selected: Option<usize>,
    },
    Text {
        text: String,
    },
    Subpanel {
        panel: Option<SubPanel>,
    },
    Table {
        rows: Vec<TableRow>,
    },
}

/// Controls keyed by field name. A field springs into existence on first write
/// with the control kind implied by that write; a write of a different kind
/// replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryForm {
    pub fields: BTreeMap<String, Control>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn select_mut(&mut self, field: &str) -> (&mut Vec<SelectOption>, &mut Option<usize>) {
        let control = self
            .fields
            .entry(field.to_string())
            .or_insert_with(|| Control::Select {
                options: Vec::new(),
                selected: None,
            });
        if !matches!(control, Control::Select { .. }) {
            *control = Control::Select {
                options: Vec::new(),
                selected: None,
            };
        }
        match control {
            Control::Select { options, selected } => (options, selected),
            _ => unreachable!("control was just replaced by a select"),
        }
    }

    fn rows_mut(&mut self, table: &str) -> &mut Vec<TableRow> {
        let control = self
            .fields
            .entry(table.to_string())
            .or_insert_with(|| Control::Table { rows: Vec::new() });
        if !matches!(control, Control::Table { .. }) {
            *control = Control::Table { rows: Vec::new() };
        }
        match control {
            Control::Table { rows } => rows,
            _ => unreachable!("control was just replaced by a table"),
        }
    }
}

impl FormBinding for MemoryForm {
    fn clear_options(&mut self, field: &str) {
        let (options, selected) = self.select_mut(field);
        options.clear();
        *selected = None;
    }

    fn push_option(&mut self, field: &str, option: SelectOption) {
        let (options, selected) = self.select_mut(field);
        options.push(option);
        // A select that gains its first option shows it, like a browser would.
        if selected.is_none() && options.len() == 1 {
            *selected = Some(0);
        }
    }

    fn options(&self, field: &str) -> Vec<SelectOption> {
        match self.fields.get(field) {
            Some(Control::Select { options, .. }) => options.clone(),
            _ => Vec::new(),
        }
    }

    fn selected_index(&self, field: &str) -> Option<usize> {
        match self.fields.get(field) {
            Some(Control::Select { selected, .. }) => *selected,
            _ => None,
        }
    }

    fn select_index(&mut self, field: &str, index: Option<usize>) {
        let (options, selected) = self.select_mut(field);
        *selected = index.filter(|i| *i < options.len());
    }

    fn text(&self, field: &str) -> Option<String> {
        match self.fields.get(field) {
            Some(Control::Text { text }) => Some(text.clone()),
            _ => None,
        }
    }

    fn set_text(&mut self, field: &str, text: &str) {
        self.fields.insert(
            field.to_string(),
            Control::Text {
                text: text.to_string(),
            },
        );
    }

    fn show_subpanel(&mut self, field: &str, panel: SubPanel) {
        self.fields
            .insert(field.to_string(), Control::Subpanel { panel: Some(panel) });
    }

    fn subpanel(&self, field: &str) -> Option<SubPanel> {
        match self.fields.get(field) {
            Some(Control::Subpanel { panel }) => *panel,
            _ => None,
        }
    }

    fn append_row(&mut self, table: &str, row: TableRow) {
        self.rows_mut(table).push(row);
    }

    fn rows(&self, table: &str) -> Vec<TableRow> {
        match self.fields.get(table) {
            Some(Control::Table { rows }) => rows.clone(),
            _ => Vec::new(),
        }
    }

    fn set_cell(&mut self, table: &str, row_id: &str, column: usize, text: &str) -> bool {
        let Some(Control::Table { rows }) = self.fields.get_mut(table) else {
            return false;
        };
        match rows
            .iter_mut()
            .find(|row| row.id == row_id)
            .and_then(|row| row.cells.get_mut(column))
        {
            Some(cell) => {
                *cell = text.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn select_by_value_and_text() {
        let mut form = MemoryForm::new();
        form.push_option("server", SelectOption::new("SWAP-network", "10.0.0.2:8001"));
        form.push_option("server", SelectOption::new("speech", "10.0.0.3:8002"));
        assert_eq!(form.selected_index("server"), Some(0));

        assert!(form.select_by_text("server", "speech"));
        assert_eq!(form.selected_value("server").as_deref(), Some("10.0.0.3:8002"));

        assert!(!form.select_by_value("server", "nowhere"));
        assert_eq!(form.selected_index("server"), None);
        assert_eq!(form.selected_text("server"), None);
    }

    #[test]
    fn out_of_range_index_clears_selection() {
        let mut form = MemoryForm::new();
        form.reset_to("endp", SelectOption::same("garden.temp"));
        form.select_index("endp", Some(3));
        assert_eq!(form.selected_index("endp"), None);
    }

    #[test]
    fn set_cell_targets_row_by_id() {
        let mut form = MemoryForm::new();
        form.append_row(
            "nettable",
            TableRow {
                id: "7".to_string(),
                cells: vec!["7".into(), "SWAP".into(), "Binary 6".into(), "OFF".into()],
                link: None,
            },
        );
        assert!(form.set_cell("nettable", "7", 3, "ON"));
        assert!(!form.set_cell("nettable", "8", 3, "ON"));
        assert!(!form.set_cell("nettable", "7", 9, "ON"));
        assert_eq!(form.rows("nettable")[0].cells[3], "ON");
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let form = MemoryForm::new();
        assert_eq!(form.text("apikey"), None);
        assert!(form.options("endp").is_empty());
        assert_eq!(form.subpanel("item2box"), None);
    }
}
