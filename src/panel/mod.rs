//! Editor panels: each one projects a document onto form fields and, for the
//! rule-editing panels, turns the fields back into a source fragment.
//!
//! Panels are driven by control-change events only. Loading an endpoint list
//! is the one asynchronous step: a handler hands back an [`EndpointListRequest`],
//! the host resolves it through a [`Loader`] and feeds the document back in.
//! Superseded requests are not cancelled, so a late answer can still overwrite
//! a newer list.

pub mod common;
pub mod endpoint;
pub mod item2;
pub mod loader;
pub mod network;
pub mod settings;
pub mod thingspeak;

pub use endpoint::{EndpointConfigPanel, EndpointStatusPanel};
pub use loader::{DirLoader, Loader};
pub use network::{NetworkPanel, NetworkVariant};
pub use settings::SettingsPanel;
pub use thingspeak::ThingspeakPanel;

use crate::diagnostics;
use crate::doc::StatusDoc;
use crate::form::{FormBinding, SubPanel};
use serde::Serialize;

/// Which selector a fetched endpoint list is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchTarget {
    /// The panel's own endpoint selector (item1).
    Endpoints,
    /// The network sub-editor's endpoint selector (item2).
    Item2Endpoints,
}

/// A pending `get_endpoint_list` call for one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointListRequest {
    pub server: String,
    pub address: String,
    pub target: FetchTarget,
}

impl EndpointListRequest {
    pub fn url(&self) -> String {
        format!("/command/get_endpoint_list/?server={}", self.address)
    }
}

/// Progress of a server/endpoint panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelPhase {
    #[default]
    Uninitialized,
    ServerChosen,
    EndpointChosen,
    Subpanel(SubPanel),
}

/// Anything that owns a selector fed by endpoint-list fetches.
pub trait EndpointListConsumer {
    fn on_endpoint_list(
        &mut self,
        form: &mut dyn FormBinding,
        request: &EndpointListRequest,
        doc: &StatusDoc,
    ) -> Option<EndpointListRequest>;
}

/// Resolve a chain of endpoint-list requests synchronously.
///
/// A failed load is reported and leaves the form as it was. Returns the number
/// of lists that were applied.
pub fn complete_fetches<P>(
    panel: &mut P,
    form: &mut dyn FormBinding,
    loader: &mut dyn Loader,
    mut request: Option<EndpointListRequest>,
) -> usize
where
    P: EndpointListConsumer + ?Sized,
{
    let mut applied = 0;
    while let Some(req) = request.take() {
        let url = req.url();
        match loader.load(&url) {
            Ok(doc) => {
                applied += 1;
                request = panel.on_endpoint_list(form, &req, &doc);
            }
            Err(e) => {
                diagnostics::warn(format!(
                    "endpoint list for server '{}' not loaded ({}): {:#}",
                    req.server, url, e
                ));
            }
        }
    }
    applied
}
