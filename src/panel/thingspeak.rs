//! Thingspeak upload editor (item2 of a `cloud.push_thingspeak` action).
//!
//! Picks a network endpoint plus the channel's API key and field id, and
//! emits the three call arguments.

use crate::diagnostics;
use crate::doc::{NetworkRef, ServerRegistry, StatusDoc};
use crate::form::FormBinding;
use crate::panel::common::{self, EndpointTypes, FIELD_ENDPOINT, FIELD_SERVER};
use crate::panel::{EndpointListConsumer, EndpointListRequest, FetchTarget};
use crate::statement::{Fragment, Statement};

pub const FIELD_API_KEY: &str = "apikey";
pub const FIELD_FIELD_ID: &str = "fieldid";

#[derive(Debug, Clone)]
pub struct ThingspeakPanel {
    pub statement: Statement,
    /// Full source line being edited, e.g.
    /// `cloud.push_thingspeak("srv.loc.name", "KEY", "field1")`.
    pub code_line: String,
    pub servers: ServerRegistry,
    pub endpoint_types: EndpointTypes,
}

impl ThingspeakPanel {
    pub fn new(statement: Statement, code_line: impl Into<String>) -> Self {
        Self {
            statement,
            code_line: code_line.into(),
            servers: ServerRegistry::new(),
            endpoint_types: EndpointTypes::new(),
        }
    }

    fn current_target(&self) -> NetworkRef {
        NetworkRef::parse(self.statement.item2())
    }

    pub fn update_values(
        &mut self,
        form: &mut dyn FormBinding,
        snapshot: &StatusDoc,
    ) -> Option<EndpointListRequest> {
        self.servers = snapshot.http_servers.clone();
        let current = self.current_target();
        common::fill_servers(form, FIELD_SERVER, &self.servers, &current.server, false);

        self.fill_channel(form);
        self.on_server_change(form)
    }

    /// Copy API key and field id out of an existing code line.
    fn fill_channel(&self, form: &mut dyn FormBinding) {
        if self.code_line.trim().is_empty() {
            return;
        }
        match Fragment::parse(&self.code_line) {
            Ok(Fragment::Thingspeak {
                api_key, field_id, ..
            }) => {
                form.set_text(FIELD_API_KEY, &api_key);
                form.set_text(FIELD_FIELD_ID, &field_id);
            }
            Ok(_) | Err(_) => diagnostics::warn(format!(
                "code line is not a Thingspeak upload: {:?}",
                self.code_line
            )),
        }
    }

    /// Without a selected server the endpoint list is left as it is.
    pub fn on_server_change(&mut self, form: &mut dyn FormBinding) -> Option<EndpointListRequest> {
        common::endpoint_list_request(form, FIELD_SERVER, FetchTarget::Endpoints)
    }

    /// The three call arguments, or None without a server and endpoint selection.
    pub fn item2(&self, form: &dyn FormBinding) -> Option<String> {
        let server = common::non_empty(form.selected_text(FIELD_SERVER))?;
        let endpoint = common::non_empty(form.selected_value(FIELD_ENDPOINT))?;
        let fragment = Fragment::Thingspeak {
            target: NetworkRef::new(server, endpoint),
            api_key: form.text(FIELD_API_KEY).unwrap_or_default(),
            field_id: form.text(FIELD_FIELD_ID).unwrap_or_default(),
        };
        Some(fragment.to_string())
    }
}

impl EndpointListConsumer for ThingspeakPanel {
    fn on_endpoint_list(
        &mut self,
        form: &mut dyn FormBinding,
        _request: &EndpointListRequest,
        doc: &StatusDoc,
    ) -> Option<EndpointListRequest> {
        let current = self.current_target();
        common::fill_endpoints(
            form,
            FIELD_ENDPOINT,
            doc.status(),
            &mut self.endpoint_types,
            &current.endpoint,
            false,
        );
        None
    }
}
