use advcodec_profile::{values_from_json, GroupRegistry};
use serde::Serialize;
use tracing::warn;

use crate::cmd::EncodeArgs;
use crate::exit::{profile_error, CliResult, SUCCESS};
use crate::output::{
    identifier_hex, print_json, print_raw, spaced_hex, OutputFormat, SCHEMA_BASE,
};

#[derive(Serialize)]
struct EncodedOutput<'a> {
    schema_id: String,
    profile: &'a str,
    identifier: String,
    payload_size: usize,
    payload: String,
}

pub fn run(args: EncodeArgs, groups: &GroupRegistry, format: OutputFormat) -> CliResult<i32> {
    let profile = args.selector.resolve(groups, None)?;
    let values =
        values_from_json(&args.input.read()?).map_err(|err| profile_error("values", err))?;

    for name in values.keys() {
        if profile.primary().field(name).is_none() {
            warn!(
                profile = profile.name(),
                field = %name,
                "value has no field in profile, ignored"
            );
        }
    }

    let payload = profile.encode(&values);

    match format {
        OutputFormat::Json => print_json(&EncodedOutput {
            schema_id: format!("{SCHEMA_BASE}/encoded-payload.schema.json"),
            profile: profile.name(),
            identifier: identifier_hex(profile.identifier()),
            payload_size: payload.len(),
            payload: hex::encode(&payload),
        }),
        OutputFormat::Table | OutputFormat::Pretty => println!("{}", spaced_hex(&payload)),
        OutputFormat::Raw => print_raw(&payload),
    }

    Ok(SUCCESS)
}
