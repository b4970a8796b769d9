//! Document layer: inbound JSON/XML documents and the typed ids derived from them.
//!
//! Kept apart from the form layer so panels only see parsed, owned data.

pub mod id;
pub mod settings;
pub mod status;

pub use id::{EndpointId, NetworkRef};
pub use settings::SettingsDoc;
pub use status::{Endpoint, EndpointType, ServerRegistry, StatusDoc};
