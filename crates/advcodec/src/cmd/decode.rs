use advcodec_profile::GroupRegistry;
use tracing::debug;

use crate::cmd::{parse_hex, DecodeArgs};
use crate::exit::{profile_error, CliError, CliResult, NOT_FOUND, SUCCESS};
use crate::output::{print_values, OutputFormat};

pub fn run(args: DecodeArgs, groups: &GroupRegistry, format: OutputFormat) -> CliResult<i32> {
    let payload = parse_hex(&args.payload)?;
    let profile = args.selector.resolve(groups, Some(&payload))?;
    debug!(profile = profile.name(), len = payload.len(), "decoding payload");

    let (layout, values) = match args.aux {
        Some(index) => {
            let layout = profile.aux().get(index).ok_or_else(|| {
                CliError::new(
                    NOT_FOUND,
                    format!("profile {} has no auxiliary format {index}", profile.name()),
                )
            })?;
            let values = profile
                .decode_aux(index, &payload)
                .map_err(|err| profile_error("decode", err))?;
            (layout, values)
        }
        None => {
            let values = profile
                .decode(&payload)
                .map_err(|err| profile_error("decode", err.into()))?;
            (profile.primary(), values)
        }
    };

    print_values(profile.name(), layout, &payload, &values, format);
    Ok(SUCCESS)
}
