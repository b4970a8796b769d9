//! Selector filling shared by the server/endpoint panels.

use crate::diagnostics;
use crate::doc::{Endpoint, EndpointType, ServerRegistry};
use crate::form::{FormBinding, SelectOption};
use crate::panel::{EndpointListRequest, FetchTarget};

use std::collections::BTreeMap;

pub const FIELD_SERVER: &str = "server";
pub const FIELD_ENDPOINT: &str = "endp";
pub const FIELD_OPERATOR: &str = "operator";
pub const FIELD_ITEM2BOX: &str = "item2box";

/// Declared type per `location.name`, rebuilt on every endpoint-list load.
pub type EndpointTypes = BTreeMap<String, EndpointType>;

/// Fill a server selector (label = name, value = address) and select `current` by name.
///
/// With `placeholder`, an unknown `current` gets its own option with an empty
/// address so it is still shown and can be written back unchanged.
pub fn fill_servers(
    form: &mut dyn FormBinding,
    field: &str,
    servers: &ServerRegistry,
    current: &str,
    placeholder: bool,
) -> bool {
    form.clear_options(field);
    let mut found = false;
    for (name, address) in servers {
        found |= name == current;
        form.push_option(field, SelectOption::new(name.clone(), address.clone()));
    }
    if !found && placeholder {
        diagnostics::warn(format!("server '{}' is not known to lagarto", current));
        form.push_option(field, SelectOption::new(current, ""));
    }
    form.select_by_text(field, current);
    found
}

/// Fill an endpoint selector from a status list and select `current` by value.
///
/// With `placeholder`, an unknown `current` is added verbatim and typed numeric.
pub fn fill_endpoints(
    form: &mut dyn FormBinding,
    field: &str,
    endpoints: &[Endpoint],
    types: &mut EndpointTypes,
    current: &str,
    placeholder: bool,
) -> bool {
    form.clear_options(field);
    types.clear();

    let mut found = false;
    for endpoint in endpoints {
        let id = endpoint.endpoint_id().to_string();
        found |= id == current;
        form.push_option(field, SelectOption::same(id.clone()));
        types.insert(id, endpoint.kind.clone());
    }
    if !found && placeholder {
        push_placeholder(form, field, types, current);
    }
    form.select_by_value(field, current);
    found
}

/// Add a synthetic option for an endpoint the server did not report.
pub fn push_placeholder(
    form: &mut dyn FormBinding,
    field: &str,
    types: &mut EndpointTypes,
    current: &str,
) {
    if !current.is_empty() {
        diagnostics::warn(format!(
            "endpoint '{}' not reported by server, keeping it as typed",
            current
        ));
    }
    form.push_option(field, SelectOption::same(current));
    types.insert(current.to_string(), EndpointType::Num);
}

/// Build the endpoint-list request for the server currently selected in `field`.
///
/// None when nothing is selected or the selected server has no address (a
/// placeholder).
pub fn endpoint_list_request(
    form: &dyn FormBinding,
    field: &str,
    target: FetchTarget,
) -> Option<EndpointListRequest> {
    let option = form.selected_option(field)?;
    if option.value.is_empty() {
        return None;
    }
    Some(EndpointListRequest {
        server: option.text,
        address: option.value,
        target,
    })
}

/// Selected value, treating an empty string as no selection.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
