use crate::models::{Answer, Cell};
use anyhow::{Context, Result};
use clap::ValueEnum;
use csv::WriterBuilder;
use serde_json::Value;
use std::io::Write;

/// How an [`Answer`] is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated, pasteable straight into a spreadsheet
    #[default]
    Tsv,
    Csv,
    Json,
}

/// Writes an answer in the given format. `Empty` writes nothing for the
/// delimited formats and `""` for JSON.
pub fn render<W: Write>(answer: &Answer, format: OutputFormat, mut out: W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut out, answer).context("Failed to encode JSON")?;
            writeln!(out)?;
            Ok(())
        }
        OutputFormat::Tsv => write_delimited(answer, b'\t', out),
        OutputFormat::Csv => write_delimited(answer, b',', out),
    }
}

fn write_delimited<W: Write>(answer: &Answer, delimiter: u8, out: W) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_writer(out);

    for record in records(answer) {
        writer.write_record(&record)?;
    }
    writer.flush().context("Failed to flush output")?;
    Ok(())
}

/// Flattens an answer into rows of strings. Object entries become
/// `[key, value...]` rows.
fn records(answer: &Answer) -> Vec<Vec<String>> {
    match answer {
        Answer::Empty => Vec::new(),
        Answer::Table(table) => table
            .rows()
            .iter()
            .map(|row| row.iter().map(Cell::to_string).collect())
            .collect(),
        Answer::Object(map) => map
            .iter()
            .map(|(key, value)| {
                let mut record = vec![key.clone()];
                match value {
                    Value::Array(items) => record.extend(items.iter().map(scalar)),
                    other => record.push(scalar(other)),
                }
                record
            })
            .collect(),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
