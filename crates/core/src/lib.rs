//! # VPR Registration Core
//!
//! Identifier field logic for the patient registration form.
//!
//! This crate derives and maintains the identifier fields of a registration form:
//! - Resolving an identifier source into a value and auto-generation flag ([`source`])
//! - Initialising a field record for an identifier type ([`initialiser`])
//! - Removing a field from the form ([`pruner`])
//! - Adding the fields for required, primary and default identifier types without touching
//!   existing ones ([`synchroniser`])
//!
//! Catalog, configuration and form snapshots can be loaded from YAML/JSON files.
//!
//! **No rendering or persistence**: displaying fields, validating identifier formats and saving
//! identifiers to the registry belong to the host.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod identifier;
pub mod initialiser;
pub mod pruner;
pub mod source;
pub mod synchroniser;
pub mod wire;

pub use catalog::IdentifierCatalog;
pub use config::{IdentifierTypeOverride, RegistrationConfig};
pub use error::{RegistrationError, RegistrationResult};
pub use form::{change_identifier_source, FormSession, RegistrationForm};
pub use identifier::{
    AutoGenerationOption, FormIdentifiersMap, IdentifierFieldPatch, IdentifierFieldRecord,
    IdentifierSource, IdentifierType, IdentifierValue, InitialIdentifiers,
};
pub use initialiser::initialise_identifier;
pub use pruner::remove_identifier;
pub use source::{resolve_identifier_source, SourceResolution};
pub use synchroniser::{synchronise, IdentifierSynchroniser, SyncInput, SyncOutcome};
pub use wire::WireFormat;

// Re-export validated text types from the types crate
pub use vpr_registration_types::{FieldName, IdentifierTypeUuid, TextError};
