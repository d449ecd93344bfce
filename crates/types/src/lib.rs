//! Validated text types shared across the registration crates.
//!
//! Identifier types are referenced in two ways: by their catalog uuid and by the form field
//! name their value is stored under. Both are plain strings on the wire, so this crate wraps
//! them in newtypes that guarantee the minimum needed to use them as map keys.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
    /// The input contained a character that is not allowed for this type
    #[error("text contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Catalog uuid of an identifier type.
///
/// The value is trimmed during construction and must not be empty. No further format is
/// enforced: deployments reference identifier types by whatever uuid their catalog uses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentifierTypeUuid(String);

impl IdentifierTypeUuid {
    /// Creates a new `IdentifierTypeUuid` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Form field name an identifier value is stored under.
///
/// Field names are used as a segment of a form path (`identifiers.<field>`), so they must be
/// non-empty and may not contain whitespace or `.`. Unlike [`IdentifierTypeUuid`] the input is
/// not trimmed; surrounding whitespace is rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldName(String);

impl FieldName {
    /// Creates a new `FieldName` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] for empty input, or [`TextError::InvalidCharacter`] for the
    /// first whitespace or `.` character found.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(TextError::Empty);
        }
        if let Some(bad) = input.chars().find(|c| c.is_whitespace() || *c == '.') {
            return Err(TextError::InvalidCharacter(bad));
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentifierTypeUuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for IdentifierTypeUuid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Both types are used as map keys and looked up by plain `&str`.
impl std::borrow::Borrow<str> for IdentifierTypeUuid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for IdentifierTypeUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for IdentifierTypeUuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IdentifierTypeUuid::new(&s).map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for FieldName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for FieldName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FieldName::new(&s).map_err(serde::de::Error::custom)
    }
}
