use serde::Serialize;
use serde_json::Value;
use tickscope_core::FieldValue;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Placeholder shown in tables for values that could not be obtained.
pub const NO_DATA: &str = "no data";

/// Metadata printed alongside every result.
#[derive(Debug, Serialize)]
pub struct ReportMeta {
    pub command: &'static str,
    pub source: &'static str,
    pub mock: bool,
    pub cache_mode: &'static str,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    pub cached_history: usize,
    pub cached_fundamentals: usize,
}

/// A rendered command result: JSON payload plus its tabular form.
#[derive(Debug, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub data: Value,
    #[serde(skip)]
    pub table: Table,
}

/// Rows of optional cells; `None` cells print as [`NO_DATA`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Two-column `field | value` table from a name → value mapping.
    pub fn key_value(fields: Vec<(&'static str, Option<FieldValue>)>) -> Self {
        Self {
            headers: vec![String::from("field"), String::from("value")],
            rows: fields
                .into_iter()
                .map(|(name, value)| {
                    vec![Some(name.to_owned()), value.as_ref().map(format_value)]
                })
                .collect(),
        }
    }

    /// One row per mapping, columns taken from the first one.
    pub fn wide(rows: Vec<Vec<(&'static str, Option<FieldValue>)>>) -> Self {
        let headers = rows
            .first()
            .map(|fields| fields.iter().map(|(name, _)| (*name).to_owned()).collect())
            .unwrap_or_default();

        Self {
            headers,
            rows: rows
                .into_iter()
                .map(|fields| {
                    fields
                        .into_iter()
                        .map(|(_, value)| value.as_ref().map(format_value))
                        .collect()
                })
                .collect(),
        }
    }

    pub fn to_text(&self) -> String {
        let cell = |value: &Option<String>| value.clone().unwrap_or_else(|| NO_DATA.to_owned());
        let mut widths = self.headers.iter().map(String::len).collect::<Vec<_>>();
        for row in &self.rows {
            for (index, value) in row.iter().enumerate() {
                let len = cell(value).len();
                match widths.get_mut(index) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }

        let line = |cells: Vec<String>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(text, width)| format!("{text:<width$}", width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_owned()
        };

        let mut out = vec![line(self.headers.clone())];
        out.push(line(widths.iter().map(|width| "-".repeat(*width)).collect()));
        for row in &self.rows {
            out.push(line(row.iter().map(cell).collect()));
        }
        out.join("\n")
    }
}

pub fn render(report: &Report, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(report),
    }

    Ok(())
}

fn render_table(report: &Report) {
    let meta = &report.meta;
    match meta.round {
        Some(round) => println!("{} (round {round})", meta.command),
        None => println!("{}", meta.command),
    }
    println!("source      : {}{}", meta.source, if meta.mock { " (mock)" } else { "" });
    println!("cache       : {}", meta.cache_mode);
    println!("generated_at: {}", meta.generated_at);
    println!();
    println!("{}", report.table.to_text());
}

/// Numbers print without trailing zeros; very large ones are abbreviated.
pub fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Number(number) => {
            let magnitude = number.abs();
            let (scaled, suffix) = if magnitude >= 1e12 {
                (number / 1e12, "T")
            } else if magnitude >= 1e9 {
                (number / 1e9, "B")
            } else if magnitude >= 1e6 {
                (number / 1e6, "M")
            } else {
                (*number, "")
            };

            let text = format!("{scaled:.4}");
            let text = text.trim_end_matches('0').trim_end_matches('.');
            format!("{text}{suffix}")
        }
    }
}
