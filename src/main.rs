use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

mod diagnostics;
mod doc;
mod form;
mod panel;
mod statement;

use anyhow::{Context, anyhow, bail};
use form::{FormBinding, MemoryForm};
use panel::{
    DirLoader, EndpointConfigPanel, EndpointListRequest, EndpointStatusPanel, NetworkPanel,
    PanelPhase, SettingsPanel, ThingspeakPanel, complete_fetches,
};
use statement::{Fragment, RuleKind, Statement};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "lagarto-forms")]
#[command(about = "Headless lagarto rule-editor panels", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a rule-editing panel, replay field changes and print the form plus its fragment.
    Panel {
        #[arg(long, value_enum)]
        kind: PanelKind,

        /// Status snapshot carrying `http_servers`.
        #[arg(long)]
        status: String,

        /// Directory of endpoint lists, one `<address>.json` per server.
        #[arg(long)]
        endpoints: Option<String>,

        /// Statement tokens as a JSON array.
        #[arg(long)]
        statement: String,

        /// Value of the outer editor's rule type selector.
        #[arg(long, default_value = "condition")]
        rule_type: String,

        /// Existing source line (Thingspeak panel only).
        #[arg(long, default_value = "")]
        code_line: String,

        /// Field change to replay, in order: `field=value`.
        #[arg(long = "set", value_parser = parse_field_change)]
        changes: Vec<(String, String)>,
    },
    /// Print the endpoint status table, optionally refreshed from a later poll.
    Status {
        #[arg(long)]
        status: String,

        #[arg(long)]
        poll: Option<String>,
    },
    /// Print the endpoint config form for one endpoint id.
    Config {
        #[arg(long)]
        status: String,

        #[arg(long)]
        id: String,
    },
    /// Print the settings form filled from a settings XML file.
    Settings {
        #[arg(long)]
        xml: String,
    },
    /// Parse a rule fragment and print it back in canonical form.
    Parse {
        #[arg(long)]
        fragment: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PanelKind {
    Action,
    Condition,
    Thingspeak,
}

#[derive(Serialize)]
struct PanelReport<'a> {
    phase: Option<PanelPhase>,
    statement: &'a Statement,
    form: &'a MemoryForm,
    fragment: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Panel {
            kind,
            status,
            endpoints,
            statement,
            rule_type,
            code_line,
            changes,
        } => {
            let snapshot = doc::StatusDoc::from_file(&status)?;
            let statement = Statement::from_json(&statement)?;
            let mut loader = DirLoader::new(endpoints.unwrap_or_else(|| ".".to_string()));
            let mut form = MemoryForm::new();

            let report = match kind {
                PanelKind::Action | PanelKind::Condition => {
                    let mut panel = if kind == PanelKind::Action {
                        NetworkPanel::action(statement)
                    } else {
                        NetworkPanel::condition(statement, RuleKind::from_selector(&rule_type))
                    };
                    let request = panel.update_values(&mut form, &snapshot);
                    complete_fetches(&mut panel, &mut form, &mut loader, request);
                    for (field, value) in &changes {
                        let request = apply_network_change(&mut panel, &mut form, field, value)?;
                        complete_fetches(&mut panel, &mut form, &mut loader, request);
                    }
                    let fragment = panel.statement_fragment(&form);
                    serde_json::to_string_pretty(&PanelReport {
                        phase: Some(panel.phase),
                        statement: &panel.statement,
                        form: &form,
                        fragment,
                    })?
                }
                PanelKind::Thingspeak => {
                    let mut panel = ThingspeakPanel::new(statement, code_line);
                    let request = panel.update_values(&mut form, &snapshot);
                    complete_fetches(&mut panel, &mut form, &mut loader, request);
                    for (field, value) in &changes {
                        let request = apply_thingspeak_change(&mut panel, &mut form, field, value)?;
                        complete_fetches(&mut panel, &mut form, &mut loader, request);
                    }
                    let fragment = panel.item2(&form);
                    serde_json::to_string_pretty(&PanelReport {
                        phase: None,
                        statement: &panel.statement,
                        form: &form,
                        fragment,
                    })?
                }
            };
            println!("{}", report);
        }
        Commands::Status { status, poll } => {
            let first = doc::StatusDoc::from_file(&status)?;
            let panel = EndpointStatusPanel;
            let mut form = MemoryForm::new();
            panel.create_values(&mut form, &first);
            if let Some(poll) = poll {
                let later = doc::StatusDoc::from_file(&poll)?;
                let updated = panel.update_values(&mut form, &later);
                diagnostics::note(format!("{} endpoint values refreshed", updated));
            }
            println!("{}", serde_json::to_string_pretty(&form)?);
        }
        Commands::Config { status, id } => {
            let doc = doc::StatusDoc::from_file(&status)?;
            let mut form = MemoryForm::new();
            if !EndpointConfigPanel::new(id.clone()).update_values(&mut form, &doc) {
                bail!(
                    "{}",
                    diagnostics::error_message(format!("no endpoint with id {} in {}", id, status))
                );
            }
            println!("{}", serde_json::to_string_pretty(&form)?);
        }
        Commands::Settings { xml } => {
            let doc = doc::SettingsDoc::from_file(&xml)?;
            let mut form = MemoryForm::new();
            SettingsPanel.update_values(&mut form, &doc);
            println!("{}", serde_json::to_string_pretty(&form)?);
        }
        Commands::Parse { fragment } => {
            let parsed = Fragment::parse(&fragment)
                .with_context(|| diagnostics::error_message("parse rule fragment"))?;
            println!("{:#?}", parsed);
            println!("{}", parsed);
        }
    }

    Ok(())
}

/// Replay one user edit on a network panel, firing the matching change handler.
fn apply_network_change(
    panel: &mut NetworkPanel,
    form: &mut MemoryForm,
    field: &str,
    value: &str,
) -> Result<Option<EndpointListRequest>> {
    use crate::panel::common::{FIELD_ENDPOINT, FIELD_OPERATOR, FIELD_SERVER};
    use crate::panel::item2::{FIELD_ITEM2_ENDPOINT, FIELD_ITEM2_SERVER, FIELD_STATE, FIELD_VALUE};

    match field {
        FIELD_SERVER => {
            form.select_by_text(field, value);
            Ok(panel.on_server_change(form))
        }
        FIELD_ENDPOINT => {
            form.select_by_value(field, value);
            Ok(panel.on_endpoint_change(form))
        }
        FIELD_ITEM2_SERVER => {
            form.select_by_text(field, value);
            Ok(panel.on_item2_server_change(form))
        }
        FIELD_STATE | FIELD_ITEM2_ENDPOINT => {
            form.select_by_value(field, value);
            Ok(None)
        }
        FIELD_OPERATOR | FIELD_VALUE => {
            form.set_text(field, value);
            Ok(None)
        }
        _ => bail!(
            "{}",
            diagnostics::error_message(format!("field {:?} is not on this panel", field))
        ),
    }
}

fn apply_thingspeak_change(
    panel: &mut ThingspeakPanel,
    form: &mut MemoryForm,
    field: &str,
    value: &str,
) -> Result<Option<EndpointListRequest>> {
    use crate::panel::common::{FIELD_ENDPOINT, FIELD_SERVER};
    use crate::panel::thingspeak::{FIELD_API_KEY, FIELD_FIELD_ID};

    match field {
        FIELD_SERVER => {
            form.select_by_text(field, value);
            Ok(panel.on_server_change(form))
        }
        FIELD_ENDPOINT => {
            form.select_by_value(field, value);
            Ok(None)
        }
        FIELD_API_KEY | FIELD_FIELD_ID => {
            form.set_text(field, value);
            Ok(None)
        }
        _ => bail!(
            "{}",
            diagnostics::error_message(format!("field {:?} is not on this panel", field))
        ),
    }
}

fn parse_field_change(s: &str) -> Result<(String, String)> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected field=value, got {:?}", s))?;
    Ok((field.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_change_splits_at_first_equals() {
        assert_eq!(
            parse_field_change("value=a=b").unwrap(),
            ("value".to_string(), "a=b".to_string())
        );
        assert!(parse_field_change("server").is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut panel = NetworkPanel::action(Statement::new(["network", "srv.a.b", "", "1"]));
        let mut form = MemoryForm::new();
        assert!(apply_network_change(&mut panel, &mut form, "apikey", "x").is_err());

        let request = apply_network_change(&mut panel, &mut form, "value", "42").unwrap();
        assert_eq!(request, None);
        assert_eq!(form.text("value").as_deref(), Some("42"));
    }
}
