//! Identifier-type catalog wire model and translation helpers.
//!
//! The catalog is a list of identifier types as served by the patient registry. This module
//! parses a catalog file into [`IdentifierType`] descriptors.
//!
//! Responsibilities:
//! - Define a strict wire model (`camelCase` keys, unknown keys rejected)
//! - Validate uuids and field names through the types crate
//! - Reject catalogs where two identifier types share a uuid or a field name, since form
//!   fields are keyed by field name
//!
//! Notes:
//! - An entry without `identifierSources` is accepted with an empty source list; records for
//!   it start without a selected source.

use crate::identifier::{IdentifierSource, IdentifierType};
use crate::wire::{self, WireFormat};
use crate::{RegistrationError, RegistrationResult};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use vpr_registration_types::{FieldName, IdentifierTypeUuid};

/// Identifier-type catalog operations.
///
/// This is a zero-sized type used for namespacing catalog operations.
pub struct IdentifierCatalog;

impl IdentifierCatalog {
    /// Parse a catalog from YAML or JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Translation`] if the text does not match the wire schema,
    /// and [`RegistrationError::InvalidInput`] if an entry has an invalid uuid or field name or
    /// duplicates another entry.
    pub fn parse(text: &str, format: WireFormat) -> RegistrationResult<Vec<IdentifierType>> {
        let wire: Vec<IdentifierTypeWire> = wire::parse(text, format, "Identifier catalog")?;
        wire_to_domain(wire)
    }

    /// Load a catalog file, choosing the format from its extension.
    pub fn load(path: &Path) -> RegistrationResult<Vec<IdentifierType>> {
        let wire: Vec<IdentifierTypeWire> = wire::load(path, "Identifier catalog")?;
        wire_to_domain(wire)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct IdentifierTypeWire {
    uuid: String,

    name: String,

    field_name: String,

    #[serde(default)]
    is_primary: bool,

    #[serde(default)]
    required: bool,

    #[serde(default)]
    identifier_sources: Vec<IdentifierSource>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn wire_to_domain(wire: Vec<IdentifierTypeWire>) -> RegistrationResult<Vec<IdentifierType>> {
    let mut uuids = BTreeSet::new();
    let mut field_names = BTreeSet::new();

    wire.into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let uuid = IdentifierTypeUuid::new(&entry.uuid).map_err(|e| {
                RegistrationError::InvalidInput(format!(
                    "identifier type {index} has an invalid uuid: {e}"
                ))
            })?;
            let field_name = FieldName::new(&entry.field_name).map_err(|e| {
                RegistrationError::InvalidInput(format!(
                    "identifier type {uuid} has an invalid field name: {e}"
                ))
            })?;

            if !uuids.insert(uuid.clone()) {
                return Err(RegistrationError::InvalidInput(format!(
                    "identifier type {uuid} appears more than once"
                )));
            }
            if !field_names.insert(field_name.clone()) {
                return Err(RegistrationError::InvalidInput(format!(
                    "field name {field_name} is used by more than one identifier type"
                )));
            }

            Ok(IdentifierType {
                uuid,
                name: entry.name,
                field_name,
                is_primary: entry.is_primary,
                required: entry.required,
                identifier_sources: entry.identifier_sources,
            })
        })
        .collect()
}
