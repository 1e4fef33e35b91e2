use crate::error::CliError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// secp256k1-zkp bridge utilities.
///
/// Compute SHA-256 and tagged digests, and inspect or convert surjection proofs.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Config {
    /// Path to an optional YAML settings file.
    #[arg(long = "config-file", short = 'c')]
    pub config_file: Option<PathBuf>,
    /// Output format. Overrides the settings file.
    #[arg(long = "format", short = 'f', value_enum)]
    pub format: Option<OutputFormat>,
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Compute the SHA-256 digest of some input.
    #[command(name = "digest", alias = "sha256")]
    Digest(DigestCommand),
    /// Inspect, encode or decode surjection proofs.
    #[command(subcommand, name = "proof")]
    Proof(ProofCommand),
}

#[derive(Debug, Args)]
pub struct DigestCommand {
    /// Compute a BIP-340 tagged hash with this tag.
    #[arg(long = "tag", short = 't')]
    pub tag: Option<String>,
    /// Hex-encoded input bytes.
    #[arg(long = "hex", conflicts_with_all = ["file", "text"])]
    pub hex: Option<String>,
    /// Read the input from a file.
    #[arg(long = "file", conflicts_with = "text")]
    pub file: Option<PathBuf>,
    /// UTF-8 text input. If no input is given, stdin is read.
    pub text: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ProofCommand {
    /// Parse a hex-encoded proof and print a summary.
    #[command(name = "inspect", alias = "info")]
    Inspect {
        /// The canonical proof bytes, hex-encoded.
        hex: String,
    },
    /// Read a proof in JSON form and print its canonical encoding as hex.
    #[command(name = "encode")]
    Encode {
        /// Path to the JSON file.
        path: PathBuf,
    },
    /// Parse a hex-encoded proof and print it as JSON.
    #[command(name = "decode")]
    Decode {
        /// The canonical proof bytes, hex-encoded.
        hex: String,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings that can be kept in the YAML settings file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub format: OutputFormat,
    /// Tag used by `digest` when `--tag` is not given.
    pub default_tag: Option<String>,
}

impl Settings {
    /// Load settings from `path`. With no path the defaults are returned; a path that can't be read is an error.
    pub fn try_load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, CliError> {
        match path {
            Some(path) => {
                debug!("Loading settings from {}", path.as_ref().display());
                let file = std::fs::File::open(path)?;
                let reader = std::io::BufReader::new(file);
                let settings = serde_yml::from_reader(reader)?;
                Ok(settings)
            }
            None => Ok(Settings::default()),
        }
    }
}

pub struct GlobalOptions {
    pub config_file: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

impl GlobalOptions {
    /// Load the settings file, then apply command-line overrides.
    pub fn resolve_settings(&self) -> Result<Settings, CliError> {
        let mut settings = Settings::try_load(self.config_file.as_ref())?;
        if let Some(format) = self.format {
            settings.format = format;
        }
        Ok(settings)
    }
}

impl Config {
    pub fn to_parts(self) -> (GlobalOptions, CliCommand) {
        let global = GlobalOptions { config_file: self.config_file, format: self.format };
        (global, self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_a_file() {
        let options = GlobalOptions { config_file: None, format: None };
        assert_eq!(options.resolve_settings().unwrap(), Settings::default());
    }

    #[test]
    fn file_settings_and_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format: json\ndefault_tag: TapLeaf").unwrap();
        let options = GlobalOptions { config_file: Some(file.path().to_path_buf()), format: None };
        let settings = options.resolve_settings().unwrap();
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.default_tag.as_deref(), Some("TapLeaf"));

        let options = GlobalOptions { config_file: Some(file.path().to_path_buf()), format: Some(OutputFormat::Text) };
        assert_eq!(options.resolve_settings().unwrap().format, OutputFormat::Text);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = GlobalOptions { config_file: Some(dir.path().join("nope.yml")), format: None };
        assert!(matches!(options.resolve_settings(), Err(CliError::IoError(_))));
    }

    #[test]
    fn bad_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format: [1, 2").unwrap();
        let options = GlobalOptions { config_file: Some(file.path().to_path_buf()), format: None };
        assert!(matches!(options.resolve_settings(), Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn parses_command_line() {
        let config = Config::parse_from(["zkpbridge", "-f", "json", "digest", "--tag", "BIP0340/challenge", "abc"]);
        let (global, command) = config.to_parts();
        assert_eq!(global.format, Some(OutputFormat::Json));
        match command {
            CliCommand::Digest(cmd) => {
                assert_eq!(cmd.tag.as_deref(), Some("BIP0340/challenge"));
                assert_eq!(cmd.text.as_deref(), Some("abc"));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Config::try_parse_from(["zkpbridge", "digest", "--hex", "61", "abc"]).is_err());
    }
}
