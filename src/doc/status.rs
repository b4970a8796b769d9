//! Status document served by lagarto (`/command/get_endpoint_list/`, `/status.json`).
//!
//! JSON shape:
//! {
//!   "http_servers": { "SWAP-network": "192.168.1.20:8001" },
//!   "lagarto": {
//!     "procname": "SWAP-network",
//!     "status": [
//!       { "id": "2.11.0", "location": "garden", "name": "temp",
//!         "type": "num", "direction": "inp", "value": 17.5 },
//!       ...
//!     ]
//!   },
//!   "network": [ ...same endpoint shape... ]
//! }
//!
//! Every section is optional: a panel only reads the part it needs and leaves
//! its controls unset when that part is absent.

use crate::Result;
use crate::diagnostics;
use crate::doc::id::EndpointId;

use anyhow::Context;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

/// Server (process) name -> HTTP address.
pub type ServerRegistry = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusDoc {
    #[serde(default)]
    pub http_servers: ServerRegistry,

    #[serde(default)]
    pub lagarto: Option<LagartoSection>,

    /// Flat endpoint list used by the speech front-end's config page.
    #[serde(default)]
    pub network: Vec<Endpoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LagartoSection {
    #[serde(default)]
    pub status: Vec<Endpoint>,
}

/// An addressable data point on a lagarto server.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Endpoint {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub id: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, rename = "type")]
    pub kind: EndpointType,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub value: String,
}

impl Endpoint {
    pub fn endpoint_id(&self) -> EndpointId {
        EndpointId::new(self.location.clone(), self.name.clone())
    }
}

/// Declared endpoint type. Drives which item2 sub-editor a panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum EndpointType {
    Bin,
    #[default]
    Num,
    Str,
    Other(String),
}

impl EndpointType {
    pub fn as_str(&self) -> &str {
        match self {
            EndpointType::Bin => "bin",
            EndpointType::Num => "num",
            EndpointType::Str => "str",
            EndpointType::Other(s) => s,
        }
    }
}

impl From<String> for EndpointType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "bin" => EndpointType::Bin,
            "num" => EndpointType::Num,
            "str" => EndpointType::Str,
            _ => EndpointType::Other(s),
        }
    }
}

impl From<EndpointType> for String {
    fn from(t: EndpointType) -> Self {
        t.as_str().to_string()
    }
}

impl StatusDoc {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .with_context(|| diagnostics::error_message("malformed status document"))
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| {
            diagnostics::error_message(format!("read status document {}", path))
        })?;
        Self::parse(&text)
            .with_context(|| diagnostics::error_message(format!("parse status document {}", path)))
    }

    /// Endpoints reported under `lagarto.status`, empty when the section is missing.
    pub fn status(&self) -> &[Endpoint] {
        self.lagarto
            .as_ref()
            .map(|section| section.status.as_slice())
            .unwrap_or(&[])
    }
}

/// Accept strings, numbers and booleans; lagarto is not consistent about which
/// one it sends for ids and values.
fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    match v {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(diagnostics::error_message(
            format!("expected scalar, found {}", other),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"{
        "http_servers": { "SWAP-network": "192.168.1.20:8001" },
        "lagarto": {
            "procname": "SWAP-network",
            "status": [
                { "id": "2.11.0", "location": "garden", "name": "temp", "type": "num", "value": 17.5 },
                { "id": 7, "location": "SWAP", "name": "Binary 6", "type": "bin", "value": "OFF" },
                { "id": "9", "location": "hall", "name": "msg", "type": "text", "value": null }
            ]
        }
    }"#;

    #[test]
    fn parses_servers_and_status() {
        let doc = StatusDoc::parse(DOC).unwrap();
        assert_eq!(
            doc.http_servers.get("SWAP-network").map(String::as_str),
            Some("192.168.1.20:8001")
        );

        let status = doc.status();
        assert_eq!(status.len(), 3);
        assert_eq!(status[0].value, "17.5");
        assert_eq!(status[1].id, "7");
        assert_eq!(status[1].kind, EndpointType::Bin);
        assert_eq!(status[2].kind, EndpointType::Other("text".to_string()));
        assert_eq!(status[2].value, "");
        assert_eq!(status[0].endpoint_id().to_string(), "garden.temp");
        assert!(doc.network.is_empty());
    }

    #[test]
    fn missing_sections_are_empty() {
        let doc = StatusDoc::parse("{}").unwrap();
        assert!(doc.http_servers.is_empty());
        assert!(doc.status().is_empty());
    }

    #[test]
    fn rejects_non_scalar_values() {
        let err = StatusDoc::parse(
            r#"{ "network": [ { "id": "1", "location": "a", "name": "b", "value": [1] } ] }"#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("malformed status document"));
    }
}
