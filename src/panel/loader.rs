//! Host-side document loading.

use crate::Result;
use crate::diagnostics;
use crate::doc::StatusDoc;

use anyhow::bail;
use regex::Regex;
use std::path::PathBuf;

/// Fetches a status document for a server-relative URL.
pub trait Loader {
    fn load(&mut self, url: &str) -> Result<StatusDoc>;
}

/// Serves `get_endpoint_list` from `<root>/<address>.json`.
///
/// Stands in for the lagarto HTTP server when panels are driven from the CLI.
#[derive(Debug, Clone)]
pub struct DirLoader {
    pub root: PathBuf,
}

impl DirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Loader for DirLoader {
    fn load(&mut self, url: &str) -> Result<StatusDoc> {
        let re = Regex::new(r#"^/command/get_endpoint_list/\?server=([^&]+)$"#)?;
        let Some(caps) = re.captures(url) else {
            bail!(
                "{}",
                diagnostics::error_message(format!("unsupported url: {}", url))
            );
        };
        let address = &caps[1];
        if address.contains('/') || address.starts_with('.') {
            bail!(
                "{}",
                diagnostics::error_message(format!("refusing server address {:?}", address))
            );
        }

        let path = self.root.join(format!("{}.json", address));
        StatusDoc::from_file(&path.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_other_urls() {
        let mut loader = DirLoader::new("/nonexistent");
        let err = loader.load("/status.json").unwrap_err();
        assert!(err.to_string().contains("unsupported url"));

        let err = loader
            .load("/command/get_endpoint_list/?server=../etc")
            .unwrap_err();
        assert!(err.to_string().contains("refusing server address"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut loader = DirLoader::new("/nonexistent");
        assert!(loader
            .load("/command/get_endpoint_list/?server=10.0.0.2:8001")
            .is_err());
    }
}
