//! Registration configuration.
//!
//! Configuration is resolved once by the host (see the `vpr-registration` binary) and passed
//! into the synchroniser. Library code never reads environment variables.
//!
//! Two settings affect identifier fields:
//! - `defaultPatientIdentifierTypes`: identifier types shown on the form even when the catalog
//!   does not mark them primary or required
//! - `identifierTypeOverrides`: per-type adjustments of required-ness

use crate::wire::{self, WireFormat};
use crate::RegistrationResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vpr_registration_types::IdentifierTypeUuid;

/// Per-deployment adjustment of one identifier type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IdentifierTypeOverride {
    pub identifier_type_uuid: IdentifierTypeUuid,

    /// Replaces the catalog's required-ness when set, including an explicit `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Identifier-related registration configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistrationConfig {
    #[serde(default)]
    pub default_patient_identifier_types: Vec<IdentifierTypeUuid>,

    #[serde(default)]
    pub identifier_type_overrides: Vec<IdentifierTypeOverride>,
}

impl RegistrationConfig {
    pub fn new(
        default_patient_identifier_types: Vec<IdentifierTypeUuid>,
        identifier_type_overrides: Vec<IdentifierTypeOverride>,
    ) -> Self {
        Self {
            default_patient_identifier_types,
            identifier_type_overrides,
        }
    }

    /// Parse configuration text.
    ///
    /// Duplicate overrides are accepted (the first one wins) but logged as a warning.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Translation`](crate::RegistrationError::Translation) when the
    /// text does not match the schema, including unknown keys and empty uuids.
    pub fn parse(text: &str, format: WireFormat) -> RegistrationResult<Self> {
        let config: Self = wire::parse(text, format, "Registration config")?;
        for uuid in config.duplicate_overrides() {
            tracing::warn!(
                "multiple identifier type overrides for {}; the first one applies",
                uuid
            );
        }
        Ok(config)
    }

    /// Load configuration from a YAML or JSON file.
    pub fn load(path: &Path) -> RegistrationResult<Self> {
        let text = std::fs::read_to_string(path).map_err(crate::RegistrationError::FileRead)?;
        Self::parse(&text, WireFormat::from_path(path))
    }

    /// Whether `uuid` is listed as a default identifier type.
    pub fn is_default_identifier_type(&self, uuid: &IdentifierTypeUuid) -> bool {
        self.default_patient_identifier_types.contains(uuid)
    }

    /// Identifier type uuids with more than one override, in first-seen order.
    pub fn duplicate_overrides(&self) -> Vec<&IdentifierTypeUuid> {
        let mut duplicates: Vec<&IdentifierTypeUuid> = Vec::new();
        for (index, rule) in self.identifier_type_overrides.iter().enumerate() {
            let uuid = &rule.identifier_type_uuid;
            let seen_before = self.identifier_type_overrides[..index]
                .iter()
                .any(|earlier| earlier.identifier_type_uuid == *uuid);
            if seen_before && !duplicates.contains(&uuid) {
                duplicates.push(uuid);
            }
        }
        duplicates
    }
}
