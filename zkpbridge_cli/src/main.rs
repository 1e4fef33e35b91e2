use clap::Parser;
use log::*;
use zkpbridge_cli::commands::{exec_digest, exec_proof};
use zkpbridge_cli::config::{CliCommand, Config};

fn main() {
    env_logger::init();
    let config: Config = Config::parse();
    let (global_options, command) = config.to_parts();

    let result = global_options.resolve_settings().map_err(anyhow::Error::from).and_then(|settings| {
        trace!("Resolved settings: {settings:?}");
        let output = match command {
            CliCommand::Digest(cmd) => exec_digest(cmd, &settings)?,
            CliCommand::Proof(cmd) => exec_proof(cmd, &settings)?,
        };
        Ok::<_, anyhow::Error>(output)
    });

    match result {
        Ok(output) => {
            println!("{}", output.trim_end());
        }
        Err(err) => {
            eprintln!("** Error ** \n {err}");
            std::process::exit(1);
        }
    }
}
