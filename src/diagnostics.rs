//! Stderr diagnostics shared by the panels and the CLI.

use std::fmt::Display;

/// Tag prepended to error messages surfaced through `anyhow`.
const ERROR_TAG: &str = "lagarto-forms";

/// Emit a non-fatal warning on stderr.
pub fn warn(msg: impl Display) {
    eprintln!("WARN: {}", msg);
}

/// Emit an informational line on stderr (never on stdout, which carries CLI output).
pub fn note(msg: impl Display) {
    eprintln!("NOTE: {}", msg);
}

/// Build a tagged error message for `bail!` / `with_context`.
pub fn error_message(msg: impl Display) -> String {
    format!("{}: {}", ERROR_TAG, msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_message_is_tagged() {
        assert_eq!(
            error_message("bad fragment"),
            "lagarto-forms: bad fragment".to_string()
        );
    }
}
