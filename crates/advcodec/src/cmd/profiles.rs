use advcodec_profile::{GroupRegistry, Profile, ProfileRegistry};
use serde::Serialize;

use crate::cmd::{ProfilesArgs, ShowArgs};
use crate::exit::{profile_error, CliResult, SUCCESS};
use crate::output::{identifier_hex, new_table, print_json, OutputFormat, SCHEMA_BASE};

#[derive(Serialize)]
struct ProfileSummary<'a> {
    name: &'a str,
    device_name_pattern: &'a str,
    identifier: String,
    total_length: usize,
    fields: usize,
    aux: usize,
    service_ids: Vec<&'a str>,
}

#[derive(Serialize)]
struct ProfilesOutput<'a> {
    schema_id: String,
    profiles: Vec<ProfileSummary<'a>>,
}

pub fn run(args: ProfilesArgs, groups: &GroupRegistry, format: OutputFormat) -> CliResult<i32> {
    let selected: Vec<&Profile> = match args.group {
        Some(group) => groups.profiles_for_group(group),
        None => ProfileRegistry::builtin().iter().collect(),
    };
    let summaries: Vec<ProfileSummary<'_>> = selected.into_iter().map(summarize).collect();

    match format {
        OutputFormat::Json => print_json(&ProfilesOutput {
            schema_id: format!("{SCHEMA_BASE}/profiles.schema.json"),
            profiles: summaries,
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["NAME", "PATTERN", "IDENTIFIER", "LENGTH", "FIELDS"]);
            for summary in &summaries {
                table.add_row(vec![
                    summary.name.to_string(),
                    summary.device_name_pattern.to_string(),
                    summary.identifier.clone(),
                    summary.total_length.to_string(),
                    summary.fields.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for summary in &summaries {
                println!(
                    "{} pattern={:?} identifier={} length={} fields={}",
                    summary.name,
                    summary.device_name_pattern,
                    summary.identifier,
                    summary.total_length,
                    summary.fields
                );
            }
        }
    }

    Ok(SUCCESS)
}

pub fn show(args: ShowArgs, format: OutputFormat) -> CliResult<i32> {
    let profile = ProfileRegistry::builtin()
        .get(&args.profile)
        .map_err(|err| profile_error("show", err))?;

    match format {
        OutputFormat::Json => print_json(profile),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "OFFSET", "TYPE", "SCALE", "UNIT"]);
            for field in profile.primary().fields() {
                table.add_row(vec![
                    field.name.clone(),
                    field.offset.to_string(),
                    field.wire_type.to_string(),
                    field.scale.to_string(),
                    field.unit.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            let primary = profile.primary();
            println!(
                "{} identifier={} length={}",
                profile.name(),
                identifier_hex(profile.identifier()),
                primary.total_length()
            );
            for field in primary.fields() {
                println!(
                    "  {:<16} @{:<3} {:<6} x{} {}",
                    field.name,
                    field.offset,
                    field.wire_type.to_string(),
                    field.scale,
                    field.unit
                );
            }
        }
    }

    Ok(SUCCESS)
}

fn summarize(profile: &Profile) -> ProfileSummary<'_> {
    ProfileSummary {
        name: profile.name(),
        device_name_pattern: profile.device_name_pattern(),
        identifier: identifier_hex(profile.identifier()),
        total_length: profile.primary().total_length(),
        fields: profile.primary().fields().len(),
        aux: profile.aux().len(),
        service_ids: profile.service_ids().iter().map(String::as_str).collect(),
    }
}
