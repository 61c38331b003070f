use std::path::PathBuf;

use advcodec_profile::{GroupConfig, GroupRegistry, Profile, ProfileRegistry, SensorGroup};
use advcodec_wire::peek_identifier;
use clap::{ArgGroup, Args, Subcommand};
use tracing::debug;

use crate::exit::{
    io_error, profile_error, CliError, CliResult, DATA_INVALID, NOT_FOUND, USAGE,
};
use crate::output::OutputFormat;

pub mod classify;
pub mod decode;
pub mod encode;
pub mod pack;
pub mod profiles;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered profiles.
    Profiles(ProfilesArgs),
    /// Show the field layout of one profile.
    Show(ShowArgs),
    /// Decode a hex payload into named values.
    Decode(DecodeArgs),
    /// Encode named values into a hex payload.
    Encode(EncodeArgs),
    /// Classify sensor names into groups.
    Classify(ClassifyArgs),
    /// Bucket per-sensor values by group and encode one payload per group.
    Pack(PackArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, config: GroupConfig) -> CliResult<i32> {
    let groups = GroupRegistry::builtin().with_config(config);
    match command {
        Command::Profiles(args) => profiles::run(args, &groups, format),
        Command::Show(args) => profiles::show(args, format),
        Command::Decode(args) => decode::run(args, &groups, format),
        Command::Encode(args) => encode::run(args, &groups, format),
        Command::Classify(args) => classify::run(args, &groups, format),
        Command::Pack(args) => pack::run(args, &groups, format),
        Command::Version(args) => version::run(args),
    }
}

/// Ways to pick a profile. At most one may be given.
#[derive(Args, Debug, Default)]
pub struct ProfileSelector {
    /// Profile name.
    #[arg(long, short = 'p', conflicts_with_all = ["device", "service", "group"])]
    pub profile: Option<String>,
    /// Observed device name, matched against profile name patterns.
    #[arg(long, conflicts_with_all = ["profile", "service", "group"])]
    pub device: Option<String>,
    /// Advertised service identifier.
    #[arg(long, conflicts_with_all = ["profile", "device", "group"])]
    pub service: Option<String>,
    /// Sensor group; selects its canonical profile.
    #[arg(long, short = 'g', conflicts_with_all = ["profile", "device", "service"])]
    pub group: Option<SensorGroup>,
}

impl ProfileSelector {
    /// Resolve the selected profile.
    ///
    /// Without a selector, the identifier at the start of `payload` picks
    /// the group's canonical profile, or the first profile using it.
    pub fn resolve<'a>(
        &self,
        groups: &'a GroupRegistry,
        payload: Option<&[u8]>,
    ) -> CliResult<&'a Profile> {
        let profiles = ProfileRegistry::builtin();

        if let Some(name) = &self.profile {
            return profiles.get(name).map_err(|err| profile_error("profile", err));
        }
        if let Some(device) = &self.device {
            return profiles.find_by_device_name(device).ok_or_else(|| {
                CliError::new(NOT_FOUND, format!("no profile matches device name: {device}"))
            });
        }
        if let Some(service) = &self.service {
            return profiles.find_by_service_id(service).ok_or_else(|| {
                CliError::new(NOT_FOUND, format!("no profile uses service id: {service}"))
            });
        }
        if let Some(group) = self.group {
            return groups.profile_for(group).ok_or_else(|| {
                CliError::new(NOT_FOUND, format!("no canonical profile for group {group}"))
            });
        }

        let payload = payload.ok_or_else(|| {
            CliError::new(
                USAGE,
                "one of --profile, --device, --service or --group is required",
            )
        })?;
        let identifier = peek_identifier(payload).ok_or_else(|| {
            CliError::new(DATA_INVALID, "payload is too short to carry an identifier")
        })?;

        let group = groups.group_for_identifier(identifier);
        debug!(identifier, %group, "selecting profile by identifier");
        groups
            .profile_for(group)
            .or_else(|| profiles.find_by_identifier(identifier))
            .ok_or_else(|| {
                CliError::new(
                    NOT_FOUND,
                    format!("no profile uses identifier 0x{identifier:04X}"),
                )
            })
    }
}

/// JSON input, given inline or as a file.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["json", "file"])))]
pub struct JsonInput {
    /// Inline JSON.
    #[arg(long)]
    pub json: Option<String>,
    /// Read JSON from file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl JsonInput {
    pub fn read(&self) -> CliResult<String> {
        match (&self.json, &self.file) {
            (Some(json), _) => Ok(json.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map_err(|err| io_error(&format!("reading {}", path.display()), err)),
            (None, None) => Err(CliError::new(USAGE, "one of --json or --file is required")),
        }
    }
}

#[derive(Args, Debug)]
pub struct ProfilesArgs {
    /// Only profiles carrying this group's data.
    #[arg(long, short = 'g')]
    pub group: Option<SensorGroup>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Profile name.
    pub profile: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Payload as hex. Spaces, colons and a 0x prefix are ignored.
    pub payload: String,
    #[command(flatten)]
    pub selector: ProfileSelector,
    /// Decode with the auxiliary format at this index instead of the primary.
    #[arg(long, value_name = "INDEX")]
    pub aux: Option<usize>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub selector: ProfileSelector,
    #[command(flatten)]
    pub input: JsonInput,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Sensor names.
    #[arg(required = true)]
    pub sensors: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PackArgs {
    /// `{"sensor": {"value": number, ...}, ...}`
    #[command(flatten)]
    pub input: JsonInput,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse hex, ignoring whitespace, colons and an optional `0x` prefix.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&digits)
        .map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex payload: {err}")))
}
