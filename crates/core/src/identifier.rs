//! Identifier domain types.
//!
//! This module defines the descriptors read from the identifier-type catalog and the
//! per-field records held in registration form state.
//!
//! Responsibilities:
//! - Describe identifier types and their candidate sources (read-only catalog data)
//! - Represent an identifier value as either auto-generated or manually entered
//! - Define the form-state record for one identifier field, plus its partial form used for
//!   shallow merges
//!
//! Notes:
//! - Form-state types derive serde so a form snapshot can be loaded and rendered as JSON.
//! - Catalog types are built from a separate wire model in [`crate::catalog`].

use crate::constants::AUTO_GENERATED_SENTINEL;
use crate::source::resolve_identifier_source;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vpr_registration_types::{FieldName, IdentifierTypeUuid};

// ============================================================================
// Catalog descriptors
// ============================================================================

/// Auto-generation capabilities of an identifier source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AutoGenerationOption {
    /// The source can generate a value on save.
    #[serde(default)]
    pub automatic_generation_enabled: bool,

    /// The user may type a value even though the source can generate one.
    #[serde(default)]
    pub manual_entry_enabled: bool,
}

/// A configured mechanism for obtaining an identifier's value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IdentifierSource {
    pub uuid: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_generation_option: Option<AutoGenerationOption>,
}

impl IdentifierSource {
    /// Whether the source generates values automatically.
    pub fn automatic_generation_enabled(&self) -> bool {
        self.auto_generation_option
            .is_some_and(|opt| opt.automatic_generation_enabled)
    }

    /// Whether the source accepts a manually entered value.
    pub fn manual_entry_enabled(&self) -> bool {
        self.auto_generation_option
            .is_some_and(|opt| opt.manual_entry_enabled)
    }
}

/// A category of patient identifier, as described by the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentifierType {
    /// Catalog uuid of the identifier type.
    pub uuid: IdentifierTypeUuid,

    /// Display name (for example "OpenMRS ID").
    pub name: String,

    /// Form key the identifier's record is stored under.
    pub field_name: FieldName,

    /// The preferred identifier of the patient.
    pub is_primary: bool,

    /// Every patient must carry this identifier.
    pub required: bool,

    /// Candidate sources in configured order; the first is the default.
    pub identifier_sources: Vec<IdentifierSource>,
}

impl IdentifierType {
    /// The source a new record starts with.
    pub fn default_source(&self) -> Option<&IdentifierSource> {
        self.identifier_sources.first()
    }

    /// Look up one of this type's sources by uuid.
    pub fn source(&self, source_uuid: &str) -> Option<&IdentifierSource> {
        self.identifier_sources
            .iter()
            .find(|source| source.uuid == source_uuid)
    }
}

// ============================================================================
// Form state
// ============================================================================

/// The value of an identifier field.
///
/// On the wire `AutoGenerated` is the literal string `"auto-generated"`, and that literal
/// always decodes back to `AutoGenerated`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentifierValue {
    /// The value will be generated by the source when the patient is saved.
    AutoGenerated,
    /// A value entered by the user or carried over from an existing record.
    Manual(String),
}

impl IdentifierValue {
    pub fn manual(value: impl Into<String>) -> Self {
        Self::Manual(value.into())
    }

    pub fn is_auto_generated(&self) -> bool {
        matches!(self, Self::AutoGenerated)
    }

    /// The wire string for this value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AutoGenerated => AUTO_GENERATED_SENTINEL,
            Self::Manual(value) => value,
        }
    }
}

impl Default for IdentifierValue {
    fn default() -> Self {
        Self::Manual(String::new())
    }
}

impl std::fmt::Display for IdentifierValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for IdentifierValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IdentifierValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == AUTO_GENERATED_SENTINEL {
            Ok(Self::AutoGenerated)
        } else {
            Ok(Self::Manual(s))
        }
    }
}

/// Form-state record for one identifier field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IdentifierFieldRecord {
    pub identifier_type_uuid: String,

    pub identifier_name: String,

    pub preferred: bool,

    /// Value the field falls back to when it stops being auto-generated.
    pub initial_value: String,

    pub required: bool,

    pub identifier_value: IdentifierValue,

    pub auto_generation: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_source: Option<IdentifierSource>,

    /// Uuid of the persisted identifier when editing an existing patient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_uuid: Option<String>,
}

impl IdentifierFieldRecord {
    /// Switch this field to another source.
    ///
    /// The current value is kept unless the new source forces auto-generation. A field leaving
    /// auto-generation falls back to its initial value.
    pub fn select_source(&mut self, source: Option<IdentifierSource>) {
        let resolved =
            resolve_identifier_source(source.as_ref(), &self.identifier_value, &self.initial_value);
        self.identifier_value = resolved.identifier_value;
        self.auto_generation = resolved.auto_generation;
        self.selected_source = resolved.selected_source;
    }
}

/// Partial [`IdentifierFieldRecord`]: every field optional.
///
/// Set fields win over the base record when merged by
/// [`initialise_identifier`](crate::initialiser::initialise_identifier).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IdentifierFieldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_type_uuid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_value: Option<IdentifierValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_generation: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_source: Option<IdentifierSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_uuid: Option<String>,
}

impl From<&IdentifierFieldRecord> for IdentifierFieldPatch {
    fn from(record: &IdentifierFieldRecord) -> Self {
        Self {
            identifier_type_uuid: Some(record.identifier_type_uuid.clone()),
            identifier_name: Some(record.identifier_name.clone()),
            preferred: Some(record.preferred),
            initial_value: Some(record.initial_value.clone()),
            required: Some(record.required),
            identifier_value: Some(record.identifier_value.clone()),
            auto_generation: Some(record.auto_generation),
            selected_source: record.selected_source.clone(),
            identifier_uuid: record.identifier_uuid.clone(),
        }
    }
}

/// Identifier records of the live form, keyed by field name.
pub type FormIdentifiersMap = BTreeMap<FieldName, IdentifierFieldRecord>;

/// Identifier values the form was opened with, keyed by identifier type uuid.
pub type InitialIdentifiers = BTreeMap<IdentifierTypeUuid, IdentifierFieldPatch>;
