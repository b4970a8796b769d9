//! General settings form of the speech front-end.

use crate::doc::SettingsDoc;
use crate::form::FormBinding;

/// Settings keys, each shown in a text field of the same name.
pub const SETTINGS_FIELDS: [&str; 6] = [
    "recordcmd",
    "playcmd",
    "language",
    "welcomemsg",
    "keyword",
    "reply",
];

#[derive(Debug, Clone, Default)]
pub struct SettingsPanel;

impl SettingsPanel {
    /// Copy every known key present in the document; returns how many were set.
    pub fn update_values(&self, form: &mut dyn FormBinding, doc: &SettingsDoc) -> usize {
        let mut filled = 0;
        for key in SETTINGS_FIELDS {
            if let Some(value) = doc.get(key) {
                form.set_text(key, value);
                filled += 1;
            }
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::MemoryForm;
    use pretty_assertions::assert_eq;

    #[test]
    fn copies_known_keys_only() {
        let doc = SettingsDoc::parse(
            r#"<settings>
                 <language>en</language>
                 <keyword>lagarto</keyword>
                 <debug>1</debug>
               </settings>"#,
        )
        .unwrap();
        let mut form = MemoryForm::new();
        form.set_text("reply", "yes?");

        assert_eq!(SettingsPanel.update_values(&mut form, &doc), 2);
        assert_eq!(form.text("language").as_deref(), Some("en"));
        assert_eq!(form.text("keyword").as_deref(), Some("lagarto"));
        assert_eq!(form.text("reply").as_deref(), Some("yes?"));
        assert_eq!(form.text("debug"), None);
    }

    #[test]
    fn document_without_settings_changes_nothing() {
        let doc = SettingsDoc::parse("<config/>").unwrap();
        let mut form = MemoryForm::new();
        assert_eq!(SettingsPanel.update_values(&mut form, &doc), 0);
        assert_eq!(form, MemoryForm::new());
    }
}
