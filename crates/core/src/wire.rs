//! Shared parsing helpers for on-disk registration inputs.
//!
//! Catalog, configuration and form files are parsed strictly: unknown keys are rejected by the
//! wire structs, and a schema mismatch is reported with the path of the failing field (for
//! example `identifierTypeOverrides[0].required`).

use crate::{RegistrationError, RegistrationResult};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Text format of an input file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireFormat {
    Json,
    Yaml,
}

impl WireFormat {
    /// Pick the format from a file extension: `.yaml`/`.yml` is YAML, anything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                WireFormat::Yaml
            }
            _ => WireFormat::Json,
        }
    }
}

/// Deserialize `text` into `T`, naming `what` and the failing path on mismatch.
pub(crate) fn parse<T: DeserializeOwned>(
    text: &str,
    format: WireFormat,
    what: &str,
) -> RegistrationResult<T> {
    match format {
        WireFormat::Json => {
            let mut deserializer = serde_json::Deserializer::from_str(text);
            let parsed = serde_path_to_error::deserialize(&mut deserializer)
                .map_err(|err| schema_mismatch(what, err.path().to_string(), err.into_inner()))?;
            deserializer.end()?;
            Ok(parsed)
        }
        WireFormat::Yaml => {
            let deserializer = serde_yaml::Deserializer::from_str(text);
            serde_path_to_error::deserialize(deserializer)
                .map_err(|err| schema_mismatch(what, err.path().to_string(), err.into_inner()))
        }
    }
}

/// Read a file and parse it with the format implied by its extension.
pub(crate) fn load<T: DeserializeOwned>(path: &Path, what: &str) -> RegistrationResult<T> {
    let text = std::fs::read_to_string(path).map_err(RegistrationError::FileRead)?;
    parse(&text, WireFormat::from_path(path), what)
}

fn schema_mismatch(what: &str, path: String, source: impl std::fmt::Display) -> RegistrationError {
    let path = if path.is_empty() || path == "." {
        "<root>"
    } else {
        path.as_str()
    };
    RegistrationError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}
