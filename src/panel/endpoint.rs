//! Endpoint config form and live endpoint status table.

use crate::diagnostics;
use crate::doc::{Endpoint, StatusDoc};
use crate::form::{FormBinding, TableRow};

pub const FIELD_LOCATION: &str = "location";
pub const FIELD_NAME: &str = "name";
pub const FIELD_ID: &str = "id";
pub const TABLE_NETWORK: &str = "nettable";

/// Column of the value cell in [`TABLE_NETWORK`] rows.
const VALUE_COLUMN: usize = 3;

/// Edits location and name of the endpoint given by `id`.
#[derive(Debug, Clone)]
pub struct EndpointConfigPanel {
    pub id: String,
}

impl EndpointConfigPanel {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Fill the form from the document's `network` list. Returns false and
    /// leaves the fields alone when the id is not listed.
    pub fn update_values(&self, form: &mut dyn FormBinding, doc: &StatusDoc) -> bool {
        match doc.network.iter().find(|endpoint| endpoint.id == self.id) {
            Some(endpoint) => {
                form.set_text(FIELD_LOCATION, &endpoint.location);
                form.set_text(FIELD_NAME, &endpoint.name);
                form.set_text(FIELD_ID, &endpoint.id);
                true
            }
            None => {
                diagnostics::warn(format!("endpoint id '{}' not in network list", self.id));
                false
            }
        }
    }
}

/// One row per endpoint, value cell refreshed on every status poll.
#[derive(Debug, Clone, Default)]
pub struct EndpointStatusPanel;

impl EndpointStatusPanel {
    pub fn create_values(&self, form: &mut dyn FormBinding, doc: &StatusDoc) {
        for endpoint in doc.status() {
            form.append_row(TABLE_NETWORK, status_row(endpoint));
        }
    }

    /// Refresh value cells; endpoints without a row are ignored. Returns the
    /// number of rows updated.
    pub fn update_values(&self, form: &mut dyn FormBinding, doc: &StatusDoc) -> usize {
        doc.status()
            .iter()
            .filter(|endpoint| {
                form.set_cell(TABLE_NETWORK, &endpoint.id, VALUE_COLUMN, &endpoint.value)
            })
            .count()
    }
}

fn status_row(endpoint: &Endpoint) -> TableRow {
    TableRow {
        id: endpoint.id.clone(),
        cells: vec![
            endpoint.id.clone(),
            endpoint.location.clone(),
            endpoint.name.clone(),
            endpoint.value.clone(),
        ],
        link: Some(format!("config_endpoint.html/?id={}", endpoint.id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::MemoryForm;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_fills_matching_endpoint() {
        let doc = StatusDoc::parse(
            r#"{ "network": [
                { "id": "3", "location": "kitchen", "name": "light" },
                { "id": "4", "location": "hall", "name": "door" }
            ] }"#,
        )
        .unwrap();
        let mut form = MemoryForm::new();

        assert!(EndpointConfigPanel::new("4").update_values(&mut form, &doc));
        assert_eq!(form.text(FIELD_LOCATION).as_deref(), Some("hall"));
        assert_eq!(form.text(FIELD_NAME).as_deref(), Some("door"));
        assert_eq!(form.text(FIELD_ID).as_deref(), Some("4"));

        let mut untouched = MemoryForm::new();
        assert!(!EndpointConfigPanel::new("99").update_values(&mut untouched, &doc));
        assert_eq!(untouched, MemoryForm::new());
    }

    #[test]
    fn status_table_rows_and_refresh() {
        let first = StatusDoc::parse(
            r#"{ "lagarto": { "status": [
                { "id": "1", "location": "garden", "name": "temp", "type": "num", "value": 17.5 },
                { "id": "2", "location": "SWAP", "name": "Binary 6", "type": "bin", "value": "OFF" }
            ] } }"#,
        )
        .unwrap();
        let panel = EndpointStatusPanel;
        let mut form = MemoryForm::new();
        panel.create_values(&mut form, &first);

        let rows = form.rows(TABLE_NETWORK);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            TableRow {
                id: "2".to_string(),
                cells: vec!["2".into(), "SWAP".into(), "Binary 6".into(), "OFF".into()],
                link: Some("config_endpoint.html/?id=2".to_string()),
            }
        );

        let poll = StatusDoc::parse(
            r#"{ "lagarto": { "status": [
                { "id": "2", "location": "SWAP", "name": "Binary 6", "type": "bin", "value": "ON" },
                { "id": "5", "location": "new", "name": "one", "type": "num", "value": 1 }
            ] } }"#,
        )
        .unwrap();
        assert_eq!(panel.update_values(&mut form, &poll), 1);
        let rows = form.rows(TABLE_NETWORK);
        assert_eq!(rows[0].cells[3], "17.5");
        assert_eq!(rows[1].cells[3], "ON");
    }
}
