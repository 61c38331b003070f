use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("advcodec {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: advcodec");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target: {}", option_env!("ADVCODEC_BUILD_TARGET").unwrap_or("unknown"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "profiles: {}",
        advcodec_profile::ProfileRegistry::builtin().len()
    );

    Ok(SUCCESS)
}
