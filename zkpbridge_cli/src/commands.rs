use crate::config::{DigestCommand, OutputFormat, ProofCommand, Settings};
use crate::error::CliError;
use libzkpbridge::{sha256, tagged_sha256, SecretBuffer, SurjectionProof};
use log::{debug, info};
use serde_json::json;
use std::fmt::Write as _;
use std::io::Read;

/// Run `digest` and return the text to print.
pub fn exec_digest(cmd: DigestCommand, settings: &Settings) -> Result<String, CliError> {
    let input = read_digest_input(&cmd)?;
    let tag = cmd.tag.or_else(|| settings.default_tag.clone());
    debug!("Hashing {} bytes of input", input.len());
    let digest = match &tag {
        Some(tag) => tagged_sha256(tag.as_bytes(), &input),
        None => sha256(&input),
    };
    let hex_digest = hex::encode(digest.as_bytes());
    let output = match settings.format {
        OutputFormat::Text => hex_digest,
        OutputFormat::Json => json!({ "algorithm": "sha256", "tag": tag, "digest": hex_digest }).to_string(),
    };
    Ok(output)
}

fn read_digest_input(cmd: &DigestCommand) -> Result<SecretBuffer, CliError> {
    let bytes = match (&cmd.hex, &cmd.file, &cmd.text) {
        (Some(hex_input), _, _) => hex::decode(hex_input.trim())?,
        (None, Some(path), _) => std::fs::read(path)?,
        (None, None, Some(text)) => text.as_bytes().to_vec(),
        (None, None, None) => {
            info!("Reading digest input from stdin");
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(SecretBuffer::new(bytes))
}

/// Run one of the `proof` subcommands and return the text to print.
pub fn exec_proof(cmd: ProofCommand, settings: &Settings) -> Result<String, CliError> {
    match cmd {
        ProofCommand::Inspect { hex } => {
            let proof = parse_hex_proof(&hex)?;
            match settings.format {
                OutputFormat::Text => Ok(describe_proof(&proof)),
                OutputFormat::Json => Ok(serde_json::to_string_pretty(&proof)?),
            }
        }
        ProofCommand::Encode { path } => {
            let file = std::fs::File::open(&path)?;
            let proof: SurjectionProof = serde_json::from_reader(std::io::BufReader::new(file))?;
            debug!("Encoding proof with {} inputs from {}", proof.n_inputs(), path.display());
            Ok(hex::encode(proof.serialize()))
        }
        ProofCommand::Decode { hex } => {
            let proof = parse_hex_proof(&hex)?;
            Ok(serde_json::to_string_pretty(&proof)?)
        }
    }
}

fn parse_hex_proof(hex_proof: &str) -> Result<SurjectionProof, CliError> {
    let bytes = hex::decode(hex_proof.trim())?;
    Ok(SurjectionProof::parse(&bytes)?)
}

fn describe_proof(proof: &SurjectionProof) -> String {
    let indices = proof.used_indices().iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
    let mut out = String::new();
    let _ = writeln!(out, "Surjection proof ({} bytes)", proof.serialized_len());
    let _ = writeln!(out, "  inputs:      {}", proof.n_inputs());
    let _ = writeln!(out, "  ring size:   {}", proof.n_used_inputs());
    let _ = writeln!(out, "  used inputs: [{indices}]");
    let _ = writeln!(out, "  challenge:   {}", proof.challenge());
    for (i, s) in proof.responses().iter().enumerate() {
        let _ = writeln!(out, "  s[{i}]:        {s}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use libzkpbridge::ProofScalar;
    use std::io::Write;

    const LETTER_A: &str = "ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb";

    fn digest_cmd(tag: Option<&str>, hex: Option<&str>, text: Option<&str>) -> DigestCommand {
        DigestCommand {
            tag: tag.map(String::from),
            hex: hex.map(String::from),
            file: None,
            text: text.map(String::from),
        }
    }

    fn sample_proof() -> SurjectionProof {
        SurjectionProof::from_used_indices(
            5,
            &[1, 4],
            ProofScalar::from([0x11; 32]),
            vec![ProofScalar::from([0x22; 32]), ProofScalar::from([0x33; 32])],
        )
        .unwrap()
    }

    #[test]
    fn digest_text_and_hex_agree() {
        let settings = Settings::default();
        assert_eq!(exec_digest(digest_cmd(None, None, Some("a")), &settings).unwrap(), LETTER_A);
        assert_eq!(exec_digest(digest_cmd(None, Some("61"), None), &settings).unwrap(), LETTER_A);
    }

    #[test]
    fn digest_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a").unwrap();
        let cmd = DigestCommand { tag: None, hex: None, file: Some(file.path().to_path_buf()), text: None };
        assert_eq!(exec_digest(cmd, &Settings::default()).unwrap(), LETTER_A);
    }

    #[test]
    fn digest_uses_default_tag_from_settings() {
        let settings = Settings { format: OutputFormat::Text, default_tag: Some("TapLeaf".into()) };
        let expected = hex::encode(tagged_sha256(b"TapLeaf", b"a").as_bytes());
        assert_eq!(exec_digest(digest_cmd(None, None, Some("a")), &settings).unwrap(), expected);

        let explicit = hex::encode(tagged_sha256(b"TapBranch", b"a").as_bytes());
        assert_eq!(exec_digest(digest_cmd(Some("TapBranch"), None, Some("a")), &settings).unwrap(), explicit);
    }

    #[test]
    fn digest_json_output() {
        let settings = Settings { format: OutputFormat::Json, default_tag: None };
        let out = exec_digest(digest_cmd(None, None, Some("a")), &settings).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["digest"], LETTER_A);
        assert!(value["tag"].is_null());
    }

    #[test]
    fn digest_rejects_bad_hex() {
        let err = exec_digest(digest_cmd(None, Some("6"), None), &Settings::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidHex(_)));
    }

    #[test]
    fn inspect_and_decode() {
        let hex_proof = hex::encode(sample_proof().serialize());
        let summary = exec_proof(ProofCommand::Inspect { hex: hex_proof.clone() }, &Settings::default()).unwrap();
        assert!(summary.contains("ring size:   2"));
        assert!(summary.contains("used inputs: [1, 4]"));

        let json = exec_proof(ProofCommand::Decode { hex: hex_proof }, &Settings::default()).unwrap();
        let back: SurjectionProof = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample_proof());
    }

    #[test]
    fn encode_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, &sample_proof()).unwrap();
        file.flush().unwrap();
        let out = exec_proof(ProofCommand::Encode { path: file.path().to_path_buf() }, &Settings::default()).unwrap();
        assert_eq!(out, hex::encode(sample_proof().serialize()));
    }

    #[test]
    fn inspect_rejects_truncated_proof() {
        let mut bytes = sample_proof().serialize();
        bytes.pop();
        let err = exec_proof(ProofCommand::Inspect { hex: hex::encode(bytes) }, &Settings::default()).unwrap_err();
        match err {
            CliError::Bridge(e) => assert!(e.is_malformed_input()),
            other => panic!("unexpected error {other}"),
        }
    }
}
