//! Initialisation of identifier field records.

use crate::config::IdentifierTypeOverride;
use crate::identifier::{IdentifierFieldPatch, IdentifierFieldRecord, IdentifierType};
use crate::source::resolve_identifier_source;

/// Build the form record for one identifier type.
///
/// Base fields come from `identifier_type`, with `required` taken from the first matching
/// override when it sets one. Any field set in `prior` then wins over the base. Finally the
/// source is resolved (the prior selection, else the type's first source) and its value,
/// flag and selection overwrite the merged record.
///
/// Neither `identifier_type` nor `prior` is modified.
pub fn initialise_identifier(
    identifier_type: &IdentifierType,
    prior: Option<&IdentifierFieldPatch>,
    overrides: &[IdentifierTypeOverride],
) -> IdentifierFieldRecord {
    let empty = IdentifierFieldPatch::default();
    let prior = prior.unwrap_or(&empty);

    let required = overrides
        .iter()
        .find(|rule| rule.identifier_type_uuid == identifier_type.uuid)
        .and_then(|rule| rule.required)
        .unwrap_or(identifier_type.is_primary || identifier_type.required);

    let initial_value = prior.initial_value.clone().unwrap_or_default();
    let source = prior
        .selected_source
        .as_ref()
        .or_else(|| identifier_type.default_source());
    let current_value = prior.identifier_value.clone().unwrap_or_default();
    let resolved = resolve_identifier_source(source, &current_value, &initial_value);

    tracing::debug!(
        "initialised identifier {} (required: {}, auto-generation: {})",
        identifier_type.field_name,
        prior.required.unwrap_or(required),
        resolved.auto_generation
    );

    IdentifierFieldRecord {
        identifier_type_uuid: prior
            .identifier_type_uuid
            .clone()
            .unwrap_or_else(|| identifier_type.uuid.to_string()),
        identifier_name: prior
            .identifier_name
            .clone()
            .unwrap_or_else(|| identifier_type.name.clone()),
        preferred: prior.preferred.unwrap_or(identifier_type.is_primary),
        initial_value,
        required: prior.required.unwrap_or(required),
        identifier_value: resolved.identifier_value,
        auto_generation: resolved.auto_generation,
        selected_source: resolved.selected_source,
        identifier_uuid: prior.identifier_uuid.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{AutoGenerationOption, IdentifierSource, IdentifierValue};
    use vpr_registration_types::{FieldName, IdentifierTypeUuid};

    fn generator(manual_entry_enabled: bool) -> IdentifierSource {
        IdentifierSource {
            uuid: format!("generator-{manual_entry_enabled}"),
            name: "Generator".into(),
            auto_generation_option: Some(AutoGenerationOption {
                automatic_generation_enabled: true,
                manual_entry_enabled,
            }),
        }
    }

    fn identifier_type(
        is_primary: bool,
        required: bool,
        sources: Vec<IdentifierSource>,
    ) -> IdentifierType {
        IdentifierType {
            uuid: IdentifierTypeUuid::new("05a29f94-c0ed-11e2-94be-8c13b969e334")
                .expect("valid uuid"),
            name: "OpenMRS ID".into(),
            field_name: FieldName::new("openmrsId").expect("valid field name"),
            is_primary,
            required,
            identifier_sources: sources,
        }
    }

    fn override_rule(
        identifier_type: &IdentifierType,
        required: Option<bool>,
    ) -> IdentifierTypeOverride {
        IdentifierTypeOverride {
            identifier_type_uuid: identifier_type.uuid.clone(),
            required,
        }
    }

    #[test]
    fn seeds_base_fields_from_type() {
        let ty = identifier_type(true, false, vec![]);
        let record = initialise_identifier(&ty, None, &[]);

        assert_eq!(record.identifier_type_uuid, ty.uuid.as_str());
        assert_eq!(record.identifier_name, "OpenMRS ID");
        assert!(record.preferred);
        assert!(record.required);
        assert_eq!(record.initial_value, "");
        assert_eq!(record.identifier_value, IdentifierValue::default());
        assert!(!record.auto_generation);
        assert!(record.selected_source.is_none());
    }

    #[test]
    fn optional_type_is_not_required_unless_overridden() {
        let ty = identifier_type(false, false, vec![]);
        let record = initialise_identifier(&ty, Some(&IdentifierFieldPatch::default()), &[]);
        assert!(!record.required);

        let overrides = [override_rule(&ty, Some(true))];
        let record = initialise_identifier(&ty, Some(&IdentifierFieldPatch::default()), &overrides);
        assert!(record.required);
    }

    #[test]
    fn explicit_false_override_wins_over_primary() {
        let ty = identifier_type(true, true, vec![]);
        let overrides = [override_rule(&ty, Some(false))];
        assert!(!initialise_identifier(&ty, None, &overrides).required);
    }

    #[test]
    fn override_without_required_keeps_catalog_value() {
        let ty = identifier_type(false, true, vec![]);
        let overrides = [override_rule(&ty, None)];
        assert!(initialise_identifier(&ty, None, &overrides).required);
    }

    #[test]
    fn first_matching_override_wins() {
        let ty = identifier_type(false, false, vec![]);
        let overrides = [override_rule(&ty, Some(true)), override_rule(&ty, Some(false))];
        assert!(initialise_identifier(&ty, None, &overrides).required);
    }

    #[test]
    fn override_for_other_type_is_ignored() {
        let ty = identifier_type(false, false, vec![]);
        let overrides = [IdentifierTypeOverride {
            identifier_type_uuid: IdentifierTypeUuid::new("other").expect("valid uuid"),
            required: Some(true),
        }];
        assert!(!initialise_identifier(&ty, None, &overrides).required);
    }

    #[test]
    fn first_source_is_the_default() {
        let ty = identifier_type(true, false, vec![generator(false), generator(true)]);
        let record = initialise_identifier(&ty, None, &[]);

        assert_eq!(record.selected_source, Some(generator(false)));
        assert!(record.identifier_value.is_auto_generated());
        assert!(record.auto_generation);
    }

    #[test]
    fn prior_selection_and_value_are_respected() {
        let ty = identifier_type(true, false, vec![generator(false), generator(true)]);
        let prior = IdentifierFieldPatch {
            selected_source: Some(generator(true)),
            identifier_value: Some(IdentifierValue::manual("100GEJ")),
            ..IdentifierFieldPatch::default()
        };
        let record = initialise_identifier(&ty, Some(&prior), &[]);

        assert_eq!(record.selected_source, Some(generator(true)));
        assert_eq!(record.identifier_value, IdentifierValue::manual("100GEJ"));
        assert!(record.auto_generation);
    }

    #[test]
    fn prior_fields_win_over_base_but_not_over_resolution() {
        let ty = identifier_type(true, false, vec![generator(false)]);
        let prior = IdentifierFieldPatch {
            identifier_name: Some("Legacy name".into()),
            preferred: Some(false),
            required: Some(false),
            initial_value: Some("100GEJ".into()),
            identifier_value: Some(IdentifierValue::manual("100GEJ")),
            auto_generation: Some(false),
            identifier_uuid: Some("identifier-uuid".into()),
            ..IdentifierFieldPatch::default()
        };
        let record = initialise_identifier(&ty, Some(&prior), &[]);

        assert_eq!(record.identifier_name, "Legacy name");
        assert!(!record.preferred);
        assert!(!record.required);
        assert_eq!(record.initial_value, "100GEJ");
        assert_eq!(record.identifier_uuid.as_deref(), Some("identifier-uuid"));
        // The forcing source overrides the prior value and flag.
        assert!(record.identifier_value.is_auto_generated());
        assert!(record.auto_generation);
    }

    #[test]
    fn is_deterministic_and_leaves_inputs_untouched() {
        let ty = identifier_type(false, true, vec![generator(false)]);
        let prior = IdentifierFieldPatch {
            identifier_value: Some(IdentifierValue::manual("x")),
            ..IdentifierFieldPatch::default()
        };
        let ty_before = ty.clone();
        let prior_before = prior.clone();

        let first = initialise_identifier(&ty, Some(&prior), &[]);
        let second = initialise_identifier(&ty, Some(&prior), &[]);

        assert_eq!(first, second);
        assert_eq!(ty, ty_before);
        assert_eq!(prior, prior_before);
    }
}
