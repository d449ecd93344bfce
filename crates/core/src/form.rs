//! Registration form session.
//!
//! The synchroniser reads and commits identifier state through the [`FormSession`] trait, so
//! any host that owns form state (a UI binding, a test harness, the CLI) can drive it.
//! [`RegistrationForm`] is the plain snapshot implementation used by the CLI and in tests.

use crate::identifier::{FormIdentifiersMap, IdentifierType, InitialIdentifiers};
use crate::wire::{self, WireFormat};
use crate::{RegistrationError, RegistrationResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifier state of one open registration form.
pub trait FormSession {
    /// Live identifier records, keyed by field name.
    fn identifiers(&self) -> &FormIdentifiersMap;

    /// Identifier values the form was opened with, keyed by identifier type uuid.
    fn initial_identifiers(&self) -> &InitialIdentifiers;

    /// Replace the identifier records of the form.
    fn set_identifiers(&mut self, identifiers: FormIdentifiersMap);
}

/// Snapshot of a registration form's identifier state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistrationForm {
    #[serde(default)]
    pub identifiers: FormIdentifiersMap,

    #[serde(default)]
    pub initial_identifiers: InitialIdentifiers,
}

impl RegistrationForm {
    pub fn new(initial_identifiers: InitialIdentifiers) -> Self {
        Self {
            identifiers: FormIdentifiersMap::new(),
            initial_identifiers,
        }
    }

    /// Parse a form snapshot from JSON text.
    pub fn parse(json_text: &str) -> RegistrationResult<Self> {
        wire::parse(json_text, WireFormat::Json, "Registration form")
    }

    /// Load a form snapshot file.
    pub fn load(path: &Path) -> RegistrationResult<Self> {
        wire::load(path, "Registration form")
    }

    /// Render the snapshot as pretty-printed JSON.
    pub fn render(&self) -> RegistrationResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the snapshot and write it to `path`.
    pub fn save(&self, path: &Path) -> RegistrationResult<()> {
        let json = self.render()?;
        std::fs::write(path, json).map_err(RegistrationError::FileWrite)
    }
}

impl FormSession for RegistrationForm {
    fn identifiers(&self) -> &FormIdentifiersMap {
        &self.identifiers
    }

    fn initial_identifiers(&self) -> &InitialIdentifiers {
        &self.initial_identifiers
    }

    fn set_identifiers(&mut self, identifiers: FormIdentifiersMap) {
        self.identifiers = identifiers;
    }
}

/// Switch the field `field_name` to the source `source_uuid` and commit the result.
///
/// The source is looked up among the sources of the field's own identifier type.
///
/// # Errors
///
/// Returns [`RegistrationError::InvalidInput`] if the field is not on the form, its identifier
/// type is not in `catalog`, or that type has no source `source_uuid`.
pub fn change_identifier_source<S: FormSession>(
    session: &mut S,
    catalog: &[IdentifierType],
    field_name: &str,
    source_uuid: &str,
) -> RegistrationResult<()> {
    let mut identifiers = session.identifiers().clone();
    let record = identifiers.get_mut(field_name).ok_or_else(|| {
        RegistrationError::InvalidInput(format!("no identifier field named {field_name}"))
    })?;

    let identifier_type = catalog
        .iter()
        .find(|ty| ty.uuid.as_str() == record.identifier_type_uuid)
        .ok_or_else(|| {
            RegistrationError::InvalidInput(format!(
                "identifier type {} of field {field_name} is not in the catalog",
                record.identifier_type_uuid
            ))
        })?;

    let source = identifier_type.source(source_uuid).ok_or_else(|| {
        RegistrationError::InvalidInput(format!(
            "identifier type {} has no source {source_uuid}",
            identifier_type.uuid
        ))
    })?;

    record.select_source(Some(source.clone()));
    tracing::info!(
        "identifier {} now uses source {} (auto-generation: {})",
        field_name,
        source.name,
        record.auto_generation
    );

    session.set_identifiers(identifiers);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{
        AutoGenerationOption, IdentifierFieldRecord, IdentifierSource, IdentifierValue,
    };
    use vpr_registration_types::{FieldName, IdentifierTypeUuid};

    fn generator() -> IdentifierSource {
        IdentifierSource {
            uuid: "generator".into(),
            name: "Generator".into(),
            auto_generation_option: Some(AutoGenerationOption {
                automatic_generation_enabled: true,
                manual_entry_enabled: false,
            }),
        }
    }

    fn manual() -> IdentifierSource {
        IdentifierSource {
            uuid: "manual".into(),
            name: "Manual".into(),
            auto_generation_option: None,
        }
    }

    fn catalog() -> Vec<IdentifierType> {
        vec![IdentifierType {
            uuid: IdentifierTypeUuid::new("type-1").expect("valid uuid"),
            name: "OpenMRS ID".into(),
            field_name: FieldName::new("openmrsId").expect("valid field name"),
            is_primary: true,
            required: false,
            identifier_sources: vec![generator(), manual()],
        }]
    }

    fn form() -> RegistrationForm {
        let mut form = RegistrationForm::default();
        form.identifiers.insert(
            FieldName::new("openmrsId").expect("valid field name"),
            IdentifierFieldRecord {
                identifier_type_uuid: "type-1".into(),
                identifier_name: "OpenMRS ID".into(),
                preferred: true,
                initial_value: "100GEJ".into(),
                required: true,
                identifier_value: IdentifierValue::AutoGenerated,
                auto_generation: true,
                selected_source: Some(generator()),
                identifier_uuid: None,
            },
        );
        form
    }

    #[test]
    fn change_source_commits_resolved_record() {
        let mut form = form();
        change_identifier_source(&mut form, &catalog(), "openmrsId", "manual")
            .expect("change source");

        let record = &form.identifiers["openmrsId"];
        assert_eq!(record.selected_source, Some(manual()));
        assert_eq!(record.identifier_value, IdentifierValue::manual("100GEJ"));
        assert!(!record.auto_generation);
    }

    #[test]
    fn change_source_rejects_unknown_field_or_source() {
        let mut form = form();
        let err = change_identifier_source(&mut form, &catalog(), "nationalId", "manual")
            .expect_err("unknown field");
        assert!(matches!(err, RegistrationError::InvalidInput(msg) if msg.contains("nationalId")));

        let err = change_identifier_source(&mut form, &catalog(), "openmrsId", "missing")
            .expect_err("unknown source");
        assert!(matches!(err, RegistrationError::InvalidInput(msg) if msg.contains("no source")));

        let err = change_identifier_source(&mut form, &[], "openmrsId", "manual")
            .expect_err("type not in catalog");
        assert!(matches!(err, RegistrationError::InvalidInput(msg) if msg.contains("catalog")));

        // Failed changes leave the form alone.
        assert_eq!(form, self::form());
    }

    #[test]
    fn parses_and_renders_snapshot() {
        let input = r#"{
            "identifiers": {},
            "initialIdentifiers": {
                "type-1": {"initialValue": "100GEJ", "identifierValue": "100GEJ"}
            }
        }"#;
        let form = RegistrationForm::parse(input).expect("parse form");
        let initial = &form.initial_identifiers["type-1"];
        assert_eq!(initial.initial_value.as_deref(), Some("100GEJ"));
        assert_eq!(initial.identifier_value, Some(IdentifierValue::manual("100GEJ")));

        let rendered = form.render().expect("render form");
        assert_eq!(RegistrationForm::parse(&rendered).expect("reparse"), form);
    }

    #[test]
    fn rejects_unknown_record_keys() {
        let input = r#"{"initialIdentifiers": {"type-1": {"value": "x"}}}"#;
        let err = RegistrationForm::parse(input).expect_err("should reject");
        assert!(matches!(err, RegistrationError::Translation(msg) if msg.contains("value")));
    }

    #[test]
    fn saves_and_loads_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("form.json");

        form().save(&path).expect("save form");
        assert_eq!(RegistrationForm::load(&path).expect("load form"), form());
    }
}
