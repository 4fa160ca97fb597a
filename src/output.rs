use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{CodeChallenge, CodeVerifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct PkcePair<'a> {
    code_verifier: &'a CodeVerifier,
    code_challenge: &'a CodeChallenge,
    code_challenge_method: &'static str,
}

/// Two-line report. The `code_challange` label is kept as-is since scripts
/// parse this output.
pub fn render_text(verifier: &CodeVerifier, challenge: &CodeChallenge) -> String {
    format!("code_verifier  : {}\ncode_challange : {}\n", verifier, challenge)
}

pub fn render_json(verifier: &CodeVerifier, challenge: &CodeChallenge) -> Result<String> {
    let pair = PkcePair {
        code_verifier: verifier,
        code_challenge: challenge,
        code_challenge_method: challenge.method(),
    };
    Ok(serde_json::to_string_pretty(&pair)? + "\n")
}

pub fn render(format: OutputFormat, verifier: &CodeVerifier, challenge: &CodeChallenge) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(verifier, challenge)),
        OutputFormat::Json => render_json(verifier, challenge),
    }
}
