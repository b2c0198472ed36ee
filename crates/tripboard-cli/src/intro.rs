//! `intro` command handlers: offline normalization and the field catalogue.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use tripboard_tour::{field_mappings, normalize, CanonicalField, ContentType, RawIntroRecord};

/// Sub-commands available under `intro`.
#[derive(Debug, Subcommand)]
pub enum IntroCommands {
    /// Normalize a raw intro record (JSON object) read from a file or stdin
    Normalize {
        /// Content type id of the record (e.g., 12, 39)
        #[arg(long)]
        content_type_id: String,
        /// Path to the JSON file; stdin is read when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List canonical fields with their labels and source content types
    Fields,
}

/// Reads a raw intro record, normalizes it, and prints the result as JSON.
///
/// # Errors
///
/// Returns an error if the input cannot be read, is not valid JSON, or is not
/// a JSON object.
pub(crate) fn run_intro_normalize(content_type_id: &str, file: Option<&Path>) -> anyhow::Result<()> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    println!("{}", normalize_input(&input, content_type_id)?);
    Ok(())
}

/// Normalizes one raw record and renders it as pretty JSON. Unknown content
/// type ids render as an empty object; the normalizer logs them.
pub(crate) fn normalize_input(input: &str, content_type_id: &str) -> anyhow::Result<String> {
    let raw = parse_raw_record(input)?;
    let normalized = normalize(&raw, content_type_id);
    Ok(serde_json::to_string_pretty(&normalized)?)
}

/// Parses CLI input into a raw intro record. The input must be a JSON object.
pub(crate) fn parse_raw_record(input: &str) -> anyhow::Result<RawIntroRecord> {
    let value: serde_json::Value =
        serde_json::from_str(input).map_err(|e| anyhow::anyhow!("input is not valid JSON: {e}"))?;
    RawIntroRecord::from_json(&value)
        .ok_or_else(|| anyhow::anyhow!("input must be a JSON object of intro fields"))
}

/// Prints every canonical field with its label and the content types that
/// populate it.
pub(crate) fn run_intro_fields() {
    let mappings: Vec<(ContentType, Vec<CanonicalField>)> = ContentType::ALL
        .iter()
        .map(|ct| {
            let fields = field_mappings(*ct).into_iter().map(|m| m.canonical).collect();
            (*ct, fields)
        })
        .collect();

    println!("{:<22}{:<16}CONTENT TYPES", "FIELD", "LABEL");
    for field in CanonicalField::ALL {
        let sources = sources_for(*field, &mappings);
        println!("{:<22}{:<16}{}", field.as_str(), field.label(), sources.join(","));
    }
}

fn sources_for(field: CanonicalField, mappings: &[(ContentType, Vec<CanonicalField>)]) -> Vec<&'static str> {
    mappings
        .iter()
        .filter(|(_, fields)| fields.contains(&field))
        .map(|(ct, _)| ct.code())
        .collect()
}
