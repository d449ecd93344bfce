use crate::identifier::FormIdentifiersMap;

/// Return a copy of `identifiers` without the field `field_name`.
///
/// Removing a field that is not present returns an equivalent copy.
pub fn remove_identifier(identifiers: &FormIdentifiersMap, field_name: &str) -> FormIdentifiersMap {
    identifiers
        .iter()
        .filter(|(name, _)| name.as_str() != field_name)
        .map(|(name, record)| (name.clone(), record.clone()))
        .collect()
}
