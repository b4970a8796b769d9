//! Network action and network condition editors.
//!
//! Both pick a server, then one of its endpoints (item1), then hand the
//! right-hand side to an item2 sub-editor chosen by the endpoint's type:
//!
//!   Uninitialized -> ServerChosen -> EndpointChosen -> Subpanel(State|Value|Network)
//!
//! The condition editor also carries a comparison operator and, when item2
//! already points at another known server, compares network to network.

use crate::diagnostics;
use crate::doc::{EndpointType, NetworkRef, ServerRegistry, StatusDoc};
use crate::form::{FormBinding, SubPanel};
use crate::panel::common::{
    self, EndpointTypes, FIELD_ENDPOINT, FIELD_ITEM2BOX, FIELD_OPERATOR, FIELD_SERVER,
};
use crate::panel::{EndpointListConsumer, EndpointListRequest, FetchTarget, PanelPhase, item2};
use crate::statement::{Fragment, RuleKind, Statement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkVariant {
    /// `network.set_value(item1, item2)`
    Action,
    /// `network.get_value(item1) op item2`, or the event form for triggers.
    Condition(RuleKind),
}

#[derive(Debug, Clone)]
pub struct NetworkPanel {
    pub variant: NetworkVariant,
    pub statement: Statement,
    pub servers: ServerRegistry,
    pub endpoint_types: EndpointTypes,
    pub phase: PanelPhase,
}

impl NetworkPanel {
    pub fn new(variant: NetworkVariant, statement: Statement) -> Self {
        Self {
            variant,
            statement,
            servers: ServerRegistry::new(),
            endpoint_types: EndpointTypes::new(),
            phase: PanelPhase::Uninitialized,
        }
    }

    pub fn action(statement: Statement) -> Self {
        Self::new(NetworkVariant::Action, statement)
    }

    pub fn condition(statement: Statement, kind: RuleKind) -> Self {
        Self::new(NetworkVariant::Condition(kind), statement)
    }

    fn current_item1(&self) -> NetworkRef {
        NetworkRef::parse(self.statement.item1())
    }

    /// Populate every control from the statement and the server snapshot.
    pub fn update_values(
        &mut self,
        form: &mut dyn FormBinding,
        snapshot: &StatusDoc,
    ) -> Option<EndpointListRequest> {
        self.servers = snapshot.http_servers.clone();
        let current = self.current_item1();
        common::fill_servers(form, FIELD_SERVER, &self.servers, &current.server, true);

        if let NetworkVariant::Condition(_) = self.variant {
            form.set_text(FIELD_OPERATOR, self.statement.operator());
        }

        self.on_server_change(form)
    }

    /// Server selector changed.
    ///
    /// A server with an address needs its endpoint list; anything else falls
    /// back to a single placeholder endpoint taken from the statement.
    pub fn on_server_change(&mut self, form: &mut dyn FormBinding) -> Option<EndpointListRequest> {
        if let Some(request) =
            common::endpoint_list_request(form, FIELD_SERVER, FetchTarget::Endpoints)
        {
            self.phase = PanelPhase::ServerChosen;
            return Some(request);
        }

        let current = self.current_item1();
        form.clear_options(FIELD_ENDPOINT);
        common::push_placeholder(
            form,
            FIELD_ENDPOINT,
            &mut self.endpoint_types,
            &current.endpoint,
        );
        form.select_index(FIELD_ENDPOINT, Some(0));
        self.on_endpoint_change(form)
    }

    /// Endpoint selector changed: choose and fill the item2 sub-editor.
    pub fn on_endpoint_change(
        &mut self,
        form: &mut dyn FormBinding,
    ) -> Option<EndpointListRequest> {
        self.phase = PanelPhase::EndpointChosen;
        let endpoint = form.selected_value(FIELD_ENDPOINT).unwrap_or_default();

        if let NetworkVariant::Condition(_) = self.variant {
            if let Some(server) = form.selected_text(FIELD_SERVER) {
                self.statement
                    .set_item1(NetworkRef::new(server, endpoint.clone()).to_string());
            }
        }

        let panel = self.choose_subpanel(&endpoint);
        form.show_subpanel(FIELD_ITEM2BOX, panel);
        self.phase = PanelPhase::Subpanel(panel);
        item2::show(form, panel, self.statement.item2(), &self.servers)
    }

    /// Server selector of the network sub-editor changed.
    pub fn on_item2_server_change(
        &mut self,
        form: &mut dyn FormBinding,
    ) -> Option<EndpointListRequest> {
        common::endpoint_list_request(form, item2::FIELD_ITEM2_SERVER, FetchTarget::Item2Endpoints)
    }

    fn choose_subpanel(&self, endpoint: &str) -> SubPanel {
        if let NetworkVariant::Condition(_) = self.variant {
            let compares_network = NetworkRef::server_of(self.statement.item2())
                .is_some_and(|server| self.servers.contains_key(server));
            if compares_network {
                return SubPanel::Network;
            }
        }

        match self.endpoint_type(endpoint) {
            Some(EndpointType::Bin) => SubPanel::State,
            _ => SubPanel::Value,
        }
    }

    /// Declared type of an endpoint offered by the selector.
    pub fn endpoint_type(&self, endpoint: &str) -> Option<&EndpointType> {
        self.endpoint_types.get(endpoint)
    }

    /// Current selection as a fragment; None if any required control is unset.
    pub fn fragment(&self, form: &dyn FormBinding) -> Option<Fragment> {
        let server = common::non_empty(form.selected_text(FIELD_SERVER))?;
        let endpoint = common::non_empty(form.selected_value(FIELD_ENDPOINT))?;
        let panel = form.subpanel(FIELD_ITEM2BOX)?;
        let item2 = item2::read(form, panel)?;
        let target = NetworkRef::new(server, endpoint);

        Some(match self.variant {
            NetworkVariant::Action => Fragment::SetValue { target, item2 },
            NetworkVariant::Condition(kind) => {
                let operator = common::non_empty(form.text(FIELD_OPERATOR))?;
                match kind {
                    RuleKind::Trigger => Fragment::Event {
                        target,
                        operator,
                        item2,
                    },
                    RuleKind::Condition => Fragment::GetValue {
                        target,
                        operator,
                        item2,
                    },
                }
            }
        })
    }

    /// Python source for the outer rule editor, or None to block submission.
    pub fn statement_fragment(&self, form: &dyn FormBinding) -> Option<String> {
        let fragment = self.fragment(form);
        if fragment.is_none() {
            diagnostics::note("incomplete selection, rule fragment withheld");
        }
        fragment.map(|f| f.to_string())
    }
}

impl EndpointListConsumer for NetworkPanel {
    fn on_endpoint_list(
        &mut self,
        form: &mut dyn FormBinding,
        request: &EndpointListRequest,
        doc: &StatusDoc,
    ) -> Option<EndpointListRequest> {
        match request.target {
            FetchTarget::Endpoints => {
                let current = self.current_item1();
                common::fill_endpoints(
                    form,
                    FIELD_ENDPOINT,
                    doc.status(),
                    &mut self.endpoint_types,
                    &current.endpoint,
                    true,
                );
                self.on_endpoint_change(form)
            }
            FetchTarget::Item2Endpoints => {
                item2::on_endpoint_list(form, self.statement.item2(), doc);
                None
            }
        }
    }
}
