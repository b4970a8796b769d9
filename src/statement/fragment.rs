//! Python source fragments spliced into lagarto rule scripts.
//!
//! Outbound patterns:
//!   network.set_value("srv.loc.name", <item2>)
//!   network.get_value("srv.loc.name") <op> <item2>
//!   network.event[0] == "srv.loc.name" and network.event[1] <op> <item2>
//!   "srv.loc.name", "<apiKey>", "<fieldId>"            (Thingspeak arguments)
//!
//! `parse` accepts exactly what `Display` writes, plus a full
//! `cloud.push_thingspeak(...)` call around the Thingspeak arguments.

use crate::Result;
use crate::diagnostics;
use crate::doc::NetworkRef;

use anyhow::{anyhow, bail};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// A double-quoted Python string literal with backslash escapes.
const QUOTED: &str = r#""((?:[^"\\]|\\.)*)""#;
/// Python comparison operators, longest first so `<=` is not read as `<`.
const OPERATOR: &str = r#"(==|!=|<=|>=|<|>)"#;

/// Patterns are constants; one that fails to compile panics on first use.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("fragment pattern {:?}: {}", pattern, e))
}

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| compile(r#"^-?[0-9]+(?:\.[0-9]+)?$"#));
static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| compile(&format!("^{}$", QUOTED)));
static NETWORK_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r#"^network\.get_value\(\s*{}\s*\)$"#, QUOTED))
});
static SET_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"^network\.set_value\(\s*{}\s*,\s*(.+?)\s*\)$"#,
        QUOTED
    ))
});
static GET_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"^network\.get_value\(\s*{}\s*\)\s*{}\s*(.+?)$"#,
        QUOTED, OPERATOR
    ))
});
static EVENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"^network\.event\[0\]\s*==\s*{}\s+and\s+network\.event\[1\]\s*{}\s*(.+?)$"#,
        QUOTED, OPERATOR
    ))
});
static THINGSPEAK_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"^cloud\.push_thi(?:ng|nk)speak\(\s*(.*?)\s*\)$"#));
static THINGSPEAK_ARGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"^{}\s*,\s*{}\s*,\s*{}$"#,
        QUOTED, QUOTED, QUOTED
    ))
});

/// Right-hand side of a clause, as produced by one of the item2 sub-editors.
///
/// The written form is lossy for `Value("ON")` / `Value("OFF")`: they print
/// exactly like the two states and parse back as `State`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item2 {
    /// Binary state, written as `"ON"` / `"OFF"`.
    State(bool),
    /// Literal value. Numbers are written bare, anything else quoted.
    Value(String),
    /// Current value of another network endpoint.
    Network(NetworkRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    SetValue {
        target: NetworkRef,
        item2: Item2,
    },
    GetValue {
        target: NetworkRef,
        operator: String,
        item2: Item2,
    },
    Event {
        target: NetworkRef,
        operator: String,
        item2: Item2,
    },
    Thingspeak {
        target: NetworkRef,
        api_key: String,
        field_id: String,
    },
}

impl Item2 {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();

        if let Some(caps) = NETWORK_RE.captures(text) {
            let target = unquote(&caps[1]);
            return Ok(Item2::Network(NetworkRef::parse(&target)));
        }

        if let Some(caps) = QUOTED_RE.captures(text) {
            let inner = unquote(&caps[1]);
            return Ok(match inner.as_str() {
                "ON" => Item2::State(true),
                "OFF" => Item2::State(false),
                _ => Item2::Value(inner),
            });
        }

        if NUMBER_RE.is_match(text) {
            return Ok(Item2::Value(text.to_string()));
        }

        bail!(
            "{}",
            diagnostics::error_message(format!("cannot parse item2: {:?}", text))
        );
    }
}

impl fmt::Display for Item2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item2::State(true) => f.write_str(r#""ON""#),
            Item2::State(false) => f.write_str(r#""OFF""#),
            Item2::Value(v) if is_number(v) => f.write_str(v),
            Item2::Value(v) => write!(f, "\"{}\"", quote(v)),
            Item2::Network(target) => {
                write!(f, "network.get_value(\"{}\")", quote(&target.to_string()))
            }
        }
    }
}

impl Fragment {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();

        if let Some(caps) = SET_RE.captures(text) {
            return Ok(Fragment::SetValue {
                target: NetworkRef::parse(&unquote(&caps[1])),
                item2: Item2::parse(&caps[2])?,
            });
        }
        if let Some(caps) = GET_RE.captures(text) {
            return Ok(Fragment::GetValue {
                target: NetworkRef::parse(&unquote(&caps[1])),
                operator: caps[2].to_string(),
                item2: Item2::parse(&caps[3])?,
            });
        }
        if let Some(caps) = EVENT_RE.captures(text) {
            return Ok(Fragment::Event {
                target: NetworkRef::parse(&unquote(&caps[1])),
                operator: caps[2].to_string(),
                item2: Item2::parse(&caps[3])?,
            });
        }

        let args = THINGSPEAK_CALL_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(text);
        if let Some(caps) = THINGSPEAK_ARGS_RE.captures(args) {
            return Ok(Fragment::Thingspeak {
                target: NetworkRef::parse(&unquote(&caps[1])),
                api_key: unquote(&caps[2]),
                field_id: unquote(&caps[3]),
            });
        }

        Err(anyhow!(diagnostics::error_message(format!(
            "unrecognised rule fragment: {:?}",
            text
        ))))
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::SetValue { target, item2 } => write!(
                f,
                "network.set_value(\"{}\", {})",
                quote(&target.to_string()),
                item2
            ),
            Fragment::GetValue {
                target,
                operator,
                item2,
            } => write!(
                f,
                "network.get_value(\"{}\") {} {}",
                quote(&target.to_string()),
                operator,
                item2
            ),
            Fragment::Event {
                target,
                operator,
                item2,
            } => write!(
                f,
                "network.event[0] == \"{}\" and network.event[1] {} {}",
                quote(&target.to_string()),
                operator,
                item2
            ),
            Fragment::Thingspeak {
                target,
                api_key,
                field_id,
            } => write!(
                f,
                "\"{}\", \"{}\", \"{}\"",
                quote(&target.to_string()),
                quote(api_key),
                quote(field_id)
            ),
        }
    }
}

fn is_number(s: &str) -> bool {
    NUMBER_RE.is_match(s)
}

fn quote(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unquote(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_set_value() {
        let frag = Fragment::SetValue {
            target: NetworkRef::parse("SWAP-network.SWAP.Binary 6"),
            item2: Item2::State(false),
        };
        assert_eq!(
            frag.to_string(),
            r#"network.set_value("SWAP-network.SWAP.Binary 6", "OFF")"#
        );
    }

    #[test]
    fn writes_trigger_form() {
        let frag = Fragment::Event {
            target: NetworkRef::parse("SWAP-network.garden.temp"),
            operator: "<".to_string(),
            item2: Item2::Value("17.5".to_string()),
        };
        assert_eq!(
            frag.to_string(),
            r#"network.event[0] == "SWAP-network.garden.temp" and network.event[1] < 17.5"#
        );
    }

    #[test]
    fn parses_condition_against_other_endpoint() {
        let frag = Fragment::parse(
            r#"network.get_value("SWAP-network.garden.temp") >= network.get_value("speech.hall.temp")"#,
        )
        .unwrap();
        assert_eq!(
            frag,
            Fragment::GetValue {
                target: NetworkRef::new("SWAP-network", "garden.temp"),
                operator: ">=".to_string(),
                item2: Item2::Network(NetworkRef::new("speech", "hall.temp")),
            }
        );
    }

    #[test]
    fn parses_thingspeak_call_and_bare_args() {
        let expected = Fragment::Thingspeak {
            target: NetworkRef::new("SWAP-network", "SWAP.Temperature"),
            api_key: "VTPX8MN9BFZ7M8MZ".to_string(),
            field_id: "field1".to_string(),
        };
        let call = r#"cloud.push_thinkspeak("SWAP-network.SWAP.Temperature", "VTPX8MN9BFZ7M8MZ", "field1")"#;
        assert_eq!(Fragment::parse(call).unwrap(), expected);
        assert_eq!(Fragment::parse(&expected.to_string()).unwrap(), expected);
    }

    #[test]
    fn round_trips_quoted_text() {
        let frag = Fragment::SetValue {
            target: NetworkRef::parse("speech.hall.msg"),
            item2: Item2::Value(r#"say "hi" \o/"#.to_string()),
        };
        assert_eq!(Fragment::parse(&frag.to_string()).unwrap(), frag);
    }

    #[test]
    fn item2_kinds() {
        assert_eq!(Item2::parse(r#""ON""#).unwrap(), Item2::State(true));
        assert_eq!(Item2::parse("-3").unwrap(), Item2::Value("-3".to_string()));
        assert_eq!(Item2::Value("NaN".to_string()).to_string(), r#""NaN""#);
        assert!(Item2::parse("open_door()").is_err());
    }

    #[test]
    fn on_off_text_reads_back_as_state() {
        let frag = Fragment::SetValue {
            target: NetworkRef::parse("srv.a.b"),
            item2: Item2::Value("ON".to_string()),
        };
        assert_eq!(frag.to_string(), r#"network.set_value("srv.a.b", "ON")"#);
        assert_eq!(
            Fragment::parse(&frag.to_string()).unwrap(),
            Fragment::SetValue {
                target: NetworkRef::parse("srv.a.b"),
                item2: Item2::State(true),
            }
        );
    }

    #[test]
    fn number_pattern_is_anchored() {
        assert!(is_number("17.5"));
        assert!(!is_number("1.2.3"));
        assert!(!is_number("12a"));
        assert_eq!(Item2::Value("1.2.3".to_string()).to_string(), r#""1.2.3""#);
        // Repeated parses reuse the compiled patterns.
        for _ in 0..3 {
            assert_eq!(Item2::parse("4").unwrap(), Item2::Value("4".to_string()));
        }
    }

    #[test]
    fn rejects_unknown_fragment() {
        let err = Fragment::parse("clock.time() == clock.sunrise()").unwrap_err();
        assert!(err.to_string().contains("unrecognised rule fragment"));
    }
}
