use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use crate::error::SqlSugarError;
use crate::query_builder::{BoundParams, QueryAndParams};

/// Per-connection statement echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugMode {
    #[default]
    Off,
    /// Emit statements through `tracing` at debug level.
    Log,
    /// Print statements to stdout.
    Echo,
}

impl DebugMode {
    #[must_use]
    pub fn is_enabled(self) -> bool {
        !matches!(self, DebugMode::Off)
    }

    /// Parse a mode name: `off`/`false`/`0`/empty, `log`, or anything else as `echo`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "off" | "false" | "0" | "no" => DebugMode::Off,
            "log" => DebugMode::Log,
            _ => DebugMode::Echo,
        }
    }
}

static NAMED_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").expect("named placeholder pattern is valid")
});

/// The statement with placeholders replaced by raw values.
///
/// Values are neither quoted nor escaped, so the output is for reading only and
/// must never be executed.
#[must_use]
pub fn render(statement: &QueryAndParams) -> String {
    match &statement.params {
        BoundParams::Positional(values) => {
            let mut out = String::with_capacity(statement.query.len());
            let mut rest = statement.query.as_str();
            for value in values {
                let Some(pos) = rest.find('?') else { break };
                out.push_str(&rest[..pos]);
                out.push_str(&value.to_string());
                rest = &rest[pos + 1..];
            }
            out.push_str(rest);
            out
        }
        BoundParams::Named(pairs) => NAMED_PLACEHOLDER
            .replace_all(&statement.query, |caps: &Captures<'_>| {
                let name = &caps[1];
                pairs
                    .iter()
                    .find(|(k, _)| k == name)
                    .map_or_else(|| caps[0].to_string(), |(_, v)| v.to_string())
            })
            .into_owned(),
    }
}

pub(crate) fn emit_statement(mode: DebugMode, statement: &QueryAndParams) {
    match mode {
        DebugMode::Off => {}
        DebugMode::Log => tracing::debug!(sql = %render(statement), "executing statement"),
        DebugMode::Echo => println!("{}", render(statement)),
    }
}

pub(crate) fn emit_failure(mode: DebugMode, err: &SqlSugarError, sql: &str) {
    match mode {
        DebugMode::Off => {}
        DebugMode::Log => tracing::error!(error = %err, sql, "statement failed"),
        DebugMode::Echo => println!("statement failed: {err}\n{sql}"),
    }
}
