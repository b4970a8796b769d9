//! Rule statements being edited and the source fragments panels emit for them.

pub mod fragment;

pub use fragment::{Fragment, Item2};

use crate::Result;
use crate::diagnostics;

use anyhow::Context;
use serde::Serialize;

/// Token positions within a statement clause.
const SUBJECT: usize = 0;
const ITEM1: usize = 1;
const OPERATOR: usize = 2;
const ITEM2: usize = 3;

/// One rule clause: `[subject, item1, operator, item2]`.
///
/// Owned by the outer rule-composition frame and handed to a panel, which
/// reads every token but only writes back the slice it edits. Missing tokens
/// read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub tokens: Vec<String>,
}

impl Statement {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a JSON token array, e.g. `["network", "SWAP-network.garden.temp", "<", "17.5"]`.
    pub fn from_json(text: &str) -> Result<Self> {
        let tokens: Vec<String> = serde_json::from_str(text).with_context(|| {
            diagnostics::error_message(format!("statement must be a JSON string array: {}", text))
        })?;
        Ok(Self { tokens })
    }

    fn token(&self, index: usize) -> &str {
        self.tokens.get(index).map(String::as_str).unwrap_or("")
    }

    fn set_token(&mut self, index: usize, value: String) {
        if self.tokens.len() <= index {
            self.tokens.resize(index + 1, String::new());
        }
        self.tokens[index] = value;
    }

    pub fn subject(&self) -> &str {
        self.token(SUBJECT)
    }

    pub fn item1(&self) -> &str {
        self.token(ITEM1)
    }

    pub fn operator(&self) -> &str {
        self.token(OPERATOR)
    }

    pub fn item2(&self) -> &str {
        self.token(ITEM2)
    }

    pub fn set_item1(&mut self, value: impl Into<String>) {
        self.set_token(ITEM1, value.into());
    }
}

/// Rule type chosen in the outer editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// The clause fires the rule: compare against the incoming network event.
    Trigger,
    /// The clause only guards it: compare against the current value.
    #[default]
    Condition,
}

impl RuleKind {
    /// Map the outer frame's `type` selector value; anything but "trigger" is a condition.
    pub fn from_selector(value: &str) -> Self {
        if value == "trigger" {
            RuleKind::Trigger
        } else {
            RuleKind::Condition
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_tokens_by_position() {
        let st = Statement::from_json(r#"["network", "SWAP-network.garden.temp", "<", "17.5"]"#)
            .unwrap();
        assert_eq!(st.subject(), "network");
        assert_eq!(st.item1(), "SWAP-network.garden.temp");
        assert_eq!(st.operator(), "<");
        assert_eq!(st.item2(), "17.5");
    }

    #[test]
    fn short_statement_grows_on_write() {
        let mut st = Statement::new(["network"]);
        assert_eq!(st.item2(), "");
        st.set_item1("srv.a.b");
        assert_eq!(st.tokens, vec!["network".to_string(), "srv.a.b".to_string()]);
    }

    #[test]
    fn rule_kind_from_selector() {
        assert_eq!(RuleKind::from_selector("trigger"), RuleKind::Trigger);
        assert_eq!(RuleKind::from_selector("condition"), RuleKind::Condition);
        assert_eq!(RuleKind::from_selector(""), RuleKind::Condition);
    }

    #[test]
    fn rejects_non_array_statement() {
        assert!(Statement::from_json(r#"{"a": 1}"#).is_err());
    }
}
