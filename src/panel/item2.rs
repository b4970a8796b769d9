//! Item2 sub-editors: the right-hand side of an action or condition.
//!
//! Only one is visible at a time (see [`SubPanel`]). Each reads its initial
//! state from the statement's item2 token, which holds either a bare value
//! (`17.5`), a state (`ON`, optionally quoted) or a network reference
//! (`srv.loc.name`).

use crate::doc::{NetworkRef, ServerRegistry, StatusDoc};
use crate::form::{FormBinding, SelectOption, SubPanel};
use crate::panel::common::{self, EndpointTypes};
use crate::panel::{EndpointListRequest, FetchTarget};
use crate::statement::Item2;

pub const FIELD_STATE: &str = "state";
pub const FIELD_VALUE: &str = "value";
pub const FIELD_ITEM2_SERVER: &str = "item2_server";
pub const FIELD_ITEM2_ENDPOINT: &str = "item2_endp";

const STATE_ON: &str = "ON";
const STATE_OFF: &str = "OFF";

/// Populate the fields of `panel` from the item2 token.
///
/// The network editor needs the target server's endpoint list; the returned
/// request (if any) must be completed with [`on_endpoint_list`].
pub fn show(
    form: &mut dyn FormBinding,
    panel: SubPanel,
    token: &str,
    servers: &ServerRegistry,
) -> Option<EndpointListRequest> {
    let token = strip_quotes(token);
    match panel {
        SubPanel::State => {
            form.clear_options(FIELD_STATE);
            form.push_option(FIELD_STATE, SelectOption::same(STATE_ON));
            form.push_option(FIELD_STATE, SelectOption::same(STATE_OFF));
            if !form.select_by_value(FIELD_STATE, &token.to_ascii_uppercase()) {
                form.select_by_value(FIELD_STATE, STATE_OFF);
            }
            None
        }
        SubPanel::Value => {
            form.set_text(FIELD_VALUE, token);
            None
        }
        SubPanel::Network => {
            let target = NetworkRef::parse(token);
            common::fill_servers(form, FIELD_ITEM2_SERVER, servers, &target.server, true);
            let request = common::endpoint_list_request(
                form,
                FIELD_ITEM2_SERVER,
                FetchTarget::Item2Endpoints,
            );
            if request.is_none() {
                let mut scratch = EndpointTypes::new();
                form.clear_options(FIELD_ITEM2_ENDPOINT);
                common::push_placeholder(
                    form,
                    FIELD_ITEM2_ENDPOINT,
                    &mut scratch,
                    &target.endpoint,
                );
                form.select_index(FIELD_ITEM2_ENDPOINT, Some(0));
            }
            request
        }
    }
}

/// Fill the network editor's endpoint selector once its list arrives.
pub fn on_endpoint_list(form: &mut dyn FormBinding, token: &str, doc: &StatusDoc) {
    let target = NetworkRef::parse(strip_quotes(token));
    let mut scratch = EndpointTypes::new();
    common::fill_endpoints(
        form,
        FIELD_ITEM2_ENDPOINT,
        doc.status(),
        &mut scratch,
        &target.endpoint,
        true,
    );
}

/// Read the active editor. None when it has nothing usable selected or typed.
pub fn read(form: &dyn FormBinding, panel: SubPanel) -> Option<Item2> {
    match panel {
        SubPanel::State => match common::non_empty(form.selected_value(FIELD_STATE))?.as_str() {
            STATE_ON => Some(Item2::State(true)),
            STATE_OFF => Some(Item2::State(false)),
            _ => None,
        },
        SubPanel::Value => {
            let text = form.text(FIELD_VALUE)?;
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(Item2::Value(text.to_string()))
            }
        }
        SubPanel::Network => {
            let server = common::non_empty(form.selected_text(FIELD_ITEM2_SERVER))?;
            let endpoint = common::non_empty(form.selected_value(FIELD_ITEM2_ENDPOINT))?;
            Some(Item2::Network(NetworkRef::new(server, endpoint)))
        }
    }
}

fn strip_quotes(token: &str) -> &str {
    let token = token.trim();
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::MemoryForm;
    use pretty_assertions::assert_eq;

    #[test]
    fn state_editor_defaults_to_off() {
        let mut form = MemoryForm::new();
        show(&mut form, SubPanel::State, "\"on\"", &ServerRegistry::new());
        assert_eq!(read(&form, SubPanel::State), Some(Item2::State(true)));

        show(&mut form, SubPanel::State, "", &ServerRegistry::new());
        assert_eq!(read(&form, SubPanel::State), Some(Item2::State(false)));
    }

    #[test]
    fn empty_value_reads_as_none() {
        let mut form = MemoryForm::new();
        show(&mut form, SubPanel::Value, "  ", &ServerRegistry::new());
        assert_eq!(read(&form, SubPanel::Value), None);

        form.set_text(FIELD_VALUE, "21");
        assert_eq!(read(&form, SubPanel::Value), Some(Item2::Value("21".to_string())));
    }

    #[test]
    fn network_editor_fetches_known_server() {
        let servers = ServerRegistry::from([("speech".to_string(), "10.0.0.3:8002".to_string())]);
        let mut form = MemoryForm::new();
        let req = show(&mut form, SubPanel::Network, "speech.hall.temp", &servers).unwrap();
        assert_eq!(req.target, FetchTarget::Item2Endpoints);

        let doc = StatusDoc::parse(
            r#"{ "lagarto": { "status": [
                { "id": "1", "location": "hall", "name": "temp", "type": "num", "value": 20 }
            ] } }"#,
        )
        .unwrap();
        on_endpoint_list(&mut form, "speech.hall.temp", &doc);
        assert_eq!(
            read(&form, SubPanel::Network),
            Some(Item2::Network(NetworkRef::new("speech", "hall.temp")))
        );
    }

    #[test]
    fn network_editor_keeps_unknown_server() {
        let mut form = MemoryForm::new();
        let req = show(&mut form, SubPanel::Network, "gone.hall.temp", &ServerRegistry::new());
        assert_eq!(req, None);
        assert_eq!(
            read(&form, SubPanel::Network),
            Some(Item2::Network(NetworkRef::new("gone", "hall.temp")))
        );
    }
}
