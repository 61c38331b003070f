use advcodec_profile::{sensors_from_json, GroupRegistry, SensorGroup};
use serde::Serialize;
use tracing::info;

use crate::cmd::PackArgs;
use crate::exit::{profile_error, CliResult, SUCCESS};
use crate::output::{
    identifier_hex, new_table, print_json, print_raw, spaced_hex, OutputFormat, SCHEMA_BASE,
};

#[derive(Serialize)]
struct PacketOutput<'a> {
    group: SensorGroup,
    identifier: String,
    service_id: &'a str,
    payload_size: usize,
    payload: String,
}

#[derive(Serialize)]
struct PackOutput<'a> {
    schema_id: String,
    packets: Vec<PacketOutput<'a>>,
}

pub fn run(args: PackArgs, groups: &GroupRegistry, format: OutputFormat) -> CliResult<i32> {
    let sensors =
        sensors_from_json(&args.input.read()?).map_err(|err| profile_error("sensors", err))?;
    let grouped = groups.organize_by_group(&sensors);
    let packets = groups.pack_all_groups(&grouped);
    info!(sensors = sensors.len(), packets = packets.len(), "packed sensor values");

    match format {
        OutputFormat::Json => print_json(&PackOutput {
            schema_id: format!("{SCHEMA_BASE}/group-packets.schema.json"),
            packets: packets
                .iter()
                .map(|packet| PacketOutput {
                    group: packet.group,
                    identifier: identifier_hex(packet.identifier),
                    service_id: &packet.service_id,
                    payload_size: packet.payload.len(),
                    payload: hex::encode(&packet.payload),
                })
                .collect(),
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["GROUP", "IDENTIFIER", "SERVICE", "PAYLOAD"]);
            for packet in &packets {
                table.add_row(vec![
                    packet.group.to_string(),
                    identifier_hex(packet.identifier),
                    packet.service_id.clone(),
                    spaced_hex(&packet.payload),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for packet in &packets {
                println!(
                    "{} {} {}",
                    packet.group,
                    identifier_hex(packet.identifier),
                    spaced_hex(&packet.payload)
                );
            }
        }
        OutputFormat::Raw => {
            for packet in &packets {
                print_raw(&packet.payload);
            }
        }
    }

    Ok(SUCCESS)
}
