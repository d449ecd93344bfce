//! Identifier source resolution.
//!
//! Decides the effective value of an identifier field for a given source: a source that
//! generates values and forbids manual entry forces [`IdentifierValue::AutoGenerated`];
//! otherwise the current value is kept, except that an auto-generated marker left over from a
//! previous source falls back to the field's initial value.

use crate::identifier::{IdentifierSource, IdentifierValue};

/// Outcome of resolving an identifier source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceResolution {
    pub identifier_value: IdentifierValue,
    pub auto_generation: bool,
    pub selected_source: Option<IdentifierSource>,
}

/// Resolve the value and auto-generation flag of a field for `source`.
///
/// An absent source, or a source without an auto-generation option, is treated as neither
/// generating values nor allowing manual entry.
pub fn resolve_identifier_source(
    source: Option<&IdentifierSource>,
    current_value: &IdentifierValue,
    initial_value: &str,
) -> SourceResolution {
    let auto_generation = source.is_some_and(IdentifierSource::automatic_generation_enabled);
    let manual_entry_enabled = source.is_some_and(IdentifierSource::manual_entry_enabled);

    let identifier_value = if auto_generation && !manual_entry_enabled {
        IdentifierValue::AutoGenerated
    } else if !current_value.is_auto_generated() {
        current_value.clone()
    } else {
        IdentifierValue::manual(initial_value)
    };

    SourceResolution {
        identifier_value,
        auto_generation,
        selected_source: source.cloned(),
    }
}
