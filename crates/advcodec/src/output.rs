use std::io::{IsTerminal, Write};

use advcodec_profile::values_to_json;
use advcodec_wire::{DecodedValues, Format};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub const SCHEMA_BASE: &str = "https://schemas.3leaps.dev/advcodec/cli/v1";

#[derive(Serialize)]
struct DecodedOutput<'a> {
    schema_id: String,
    profile: &'a str,
    identifier: Option<String>,
    payload_size: usize,
    values: serde_json::Value,
}

/// Print values decoded from `payload` with `format`.
pub fn print_values(
    profile: &str,
    format: &Format,
    payload: &[u8],
    values: &DecodedValues,
    output: OutputFormat,
) {
    match output {
        OutputFormat::Json => {
            let out = DecodedOutput {
                schema_id: format!("{SCHEMA_BASE}/decoded-values.schema.json"),
                profile,
                identifier: format.identifier().map(identifier_hex),
                payload_size: payload.len(),
                values: values_to_json(values),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE", "UNIT"]);
            for (name, value) in values {
                let unit = format.field(name).map_or("", |field| field.unit.as_str());
                table.add_row(vec![name.clone(), value.to_string(), unit.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{profile} ({} bytes)", payload.len());
            for (name, value) in values {
                let unit = format.field(name).map_or("", |field| field.unit.as_str());
                println!("  {name} = {value} {unit}");
            }
        }
        OutputFormat::Raw => {
            print_raw(values_to_json(values).to_string().as_bytes());
            println!();
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn identifier_hex(identifier: u16) -> String {
    format!("0x{identifier:04X}")
}

/// Upper-case hex with a space between bytes, e.g. `01 10 57`.
pub fn spaced_hex(data: &[u8]) -> String {
    data.iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_helpers() {
        assert_eq!(identifier_hex(0x1001), "0x1001");
        assert_eq!(identifier_hex(0xFF), "0x00FF");
        assert_eq!(spaced_hex(&[0x01, 0x10, 0x57, 0x09, 0x29]), "01 10 57 09 29");
        assert_eq!(spaced_hex(&[]), "");
    }
}
