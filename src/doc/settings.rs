//! Settings document (XML) read by the settings panel.
//!
//! Shape:
//! <settings>
//!   <recordcmd>arecord -d 4 /tmp/rec.wav</recordcmd>
//!   <language>en</language>
//!   ...
//! </settings>
//!
//! The `<settings>` element may sit anywhere in the tree; the first one wins.

use crate::Result;
use crate::diagnostics;

use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;

/// Flat key -> text view of every element under the first `<settings>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDoc {
    /// None when the document has no `<settings>` element at all.
    pub entries: Option<BTreeMap<String, String>>,
}

impl SettingsDoc {
    pub fn parse(xml_text: &str) -> Result<Self> {
        let document = roxmltree::Document::parse(xml_text)
            .with_context(|| diagnostics::error_message("malformed settings XML"))?;

        let Some(settings) = document
            .descendants()
            .find(|node| is_element_named(*node, "settings"))
        else {
            return Ok(Self { entries: None });
        };

        // Nested elements count too; in document order the first occurrence of a tag wins.
        let mut entries = BTreeMap::new();
        for node in settings.descendants().skip(1).filter(|node| node.is_element()) {
            let key = node.tag_name().name().to_string();
            entries
                .entry(key)
                .or_insert_with(|| extract_text_content(node));
        }

        Ok(Self {
            entries: Some(entries),
        })
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| diagnostics::error_message(format!("read settings file {}", path)))?;
        Self::parse(&text)
            .with_context(|| diagnostics::error_message(format!("parse settings file {}", path)))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .as_ref()
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }
}

fn is_element_named(node: roxmltree::Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn extract_text_content(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter(|entry| entry.is_text())
        .filter_map(|entry| entry.text())
        .collect::<String>()
        .trim()
        .to_string()
}
