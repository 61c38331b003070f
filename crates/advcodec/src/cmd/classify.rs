use advcodec_profile::{GroupRegistry, SensorGroup};
use serde::Serialize;

use crate::cmd::ClassifyArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat, SCHEMA_BASE};

#[derive(Serialize)]
struct Classification<'a> {
    sensor: &'a str,
    group: SensorGroup,
    service_id: Option<&'a str>,
}

#[derive(Serialize)]
struct ClassifyOutput<'a> {
    schema_id: String,
    sensors: Vec<Classification<'a>>,
}

pub fn run(args: ClassifyArgs, groups: &GroupRegistry, format: OutputFormat) -> CliResult<i32> {
    let sensors: Vec<Classification<'_>> = args
        .sensors
        .iter()
        .map(|sensor| {
            let group = groups.classify(sensor);
            Classification {
                sensor,
                group,
                service_id: groups.service_id_for(group),
            }
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&ClassifyOutput {
            schema_id: format!("{SCHEMA_BASE}/classification.schema.json"),
            sensors,
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["SENSOR", "GROUP", "SERVICE"]);
            for entry in &sensors {
                table.add_row(vec![
                    entry.sensor.to_string(),
                    entry.group.to_string(),
                    entry.service_id.unwrap_or("-").to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for entry in &sensors {
                println!("{}\t{}", entry.sensor, entry.group);
            }
        }
    }

    Ok(SUCCESS)
}
