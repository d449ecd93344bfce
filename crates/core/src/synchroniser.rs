//! Identifier field synchronisation.
//!
//! Keeps the identifier fields of a registration form in step with the identifier-type
//! catalog and configuration. Every primary, required or default identifier type gets a
//! field; fields already on the form are never reinitialised, so in-progress edits survive.
//!
//! ## Change tracking
//!
//! [`IdentifierSynchroniser`] re-runs only when one of its named inputs ([`SyncInput`]) has
//! changed since the last run. A committed update is itself a change to the form's
//! identifiers, so the run after a commit happens once more and then finds nothing to add.
//! No update is ever committed when nothing was added; committing an unchanged map would
//! mark the identifiers dirty again and the host would loop forever.

use crate::config::RegistrationConfig;
use crate::constants::MAX_SYNC_PASSES;
use crate::form::FormSession;
use crate::identifier::{
    FormIdentifiersMap, IdentifierFieldPatch, IdentifierType, InitialIdentifiers,
};
use crate::initialiser::initialise_identifier;
use crate::{RegistrationError, RegistrationResult};
use vpr_registration_types::FieldName;

/// Build records for the identifier types that should be on the form but are not.
///
/// Returns an empty map when the catalog is not available yet. The prior value for a new
/// record comes from the live identifiers keyed by type uuid, then from the initial form
/// values, then defaults.
pub fn missing_identifiers(
    catalog: Option<&[IdentifierType]>,
    config: &RegistrationConfig,
    identifiers: &FormIdentifiersMap,
    initial_identifiers: &InitialIdentifiers,
) -> FormIdentifiersMap {
    let Some(catalog) = catalog else {
        return FormIdentifiersMap::new();
    };

    catalog
        .iter()
        .filter(|ty| ty.is_primary || ty.required || config.is_default_identifier_type(&ty.uuid))
        .filter(|ty| !identifiers.contains_key(&ty.field_name))
        .map(|ty| {
            let prior = identifiers
                .get(ty.uuid.as_str())
                .map(IdentifierFieldPatch::from)
                .or_else(|| initial_identifiers.get(&ty.uuid).cloned());
            let record =
                initialise_identifier(ty, prior.as_ref(), &config.identifier_type_overrides);
            (ty.field_name.clone(), record)
        })
        .collect()
}

/// Compute the updated identifier map, or `None` when nothing needs to change.
///
/// Existing entries are kept as they are; only missing identifier types are added.
pub fn synchronise(
    catalog: Option<&[IdentifierType]>,
    config: &RegistrationConfig,
    identifiers: &FormIdentifiersMap,
    initial_identifiers: &InitialIdentifiers,
) -> Option<FormIdentifiersMap> {
    let missing = missing_identifiers(catalog, config, identifiers, initial_identifiers);
    if missing.is_empty() {
        return None;
    }

    let mut merged = identifiers.clone();
    merged.extend(missing);
    Some(merged)
}

/// Inputs the synchroniser depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncInput {
    Catalog,
    Config,
    Identifiers,
}

/// Result of one [`IdentifierSynchroniser::on_change`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No input changed since the last run.
    Skipped,
    /// The synchroniser ran and found nothing to add.
    Unchanged,
    /// New fields were committed to the form.
    Updated { added: Vec<FieldName> },
}

#[derive(Clone, Copy, Debug, Default)]
struct DirtyInputs {
    catalog: bool,
    config: bool,
    identifiers: bool,
}

impl DirtyInputs {
    fn all() -> Self {
        Self {
            catalog: true,
            config: true,
            identifiers: true,
        }
    }

    fn mark(&mut self, input: SyncInput) {
        match input {
            SyncInput::Catalog => self.catalog = true,
            SyncInput::Config => self.config = true,
            SyncInput::Identifiers => self.identifiers = true,
        }
    }

    fn any(&self) -> bool {
        self.catalog || self.config || self.identifiers
    }
}

/// Re-runs [`synchronise`] against a form session whenever one of its inputs changes.
///
/// The host reports changes it makes to the form through [`notify`](Self::notify) and calls
/// [`on_change`](Self::on_change) from its event loop. Catalog and configuration changes are
/// recorded by their setters.
#[derive(Clone, Debug)]
pub struct IdentifierSynchroniser {
    catalog: Option<Vec<IdentifierType>>,
    config: RegistrationConfig,
    dirty: DirtyInputs,
}

impl IdentifierSynchroniser {
    /// Create a synchroniser without a catalog. The first `on_change` always runs.
    pub fn new(config: RegistrationConfig) -> Self {
        Self {
            catalog: None,
            config,
            dirty: DirtyInputs::all(),
        }
    }

    pub fn with_catalog(mut self, catalog: Vec<IdentifierType>) -> Self {
        self.set_catalog(catalog);
        self
    }

    pub fn catalog(&self) -> Option<&[IdentifierType]> {
        self.catalog.as_deref()
    }

    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    pub fn set_catalog(&mut self, catalog: Vec<IdentifierType>) {
        self.catalog = Some(catalog);
        self.dirty.mark(SyncInput::Catalog);
    }

    /// Forget the catalog, for example while it is being reloaded.
    pub fn clear_catalog(&mut self) {
        self.catalog = None;
        self.dirty.mark(SyncInput::Catalog);
    }

    pub fn set_config(&mut self, config: RegistrationConfig) {
        self.config = config;
        self.dirty.mark(SyncInput::Config);
    }

    /// Record that `input` changed outside the synchroniser.
    pub fn notify(&mut self, input: SyncInput) {
        self.dirty.mark(input);
    }

    /// Run once if any input changed since the last run.
    pub fn on_change<S: FormSession>(&mut self, session: &mut S) -> SyncOutcome {
        if !self.dirty.any() {
            return SyncOutcome::Skipped;
        }
        self.dirty = DirtyInputs::default();

        if self.catalog.is_none() {
            tracing::debug!("identifier catalog not loaded; skipping synchronisation");
            return SyncOutcome::Unchanged;
        }

        let missing = missing_identifiers(
            self.catalog(),
            &self.config,
            session.identifiers(),
            session.initial_identifiers(),
        );
        if missing.is_empty() {
            return SyncOutcome::Unchanged;
        }

        let added: Vec<FieldName> = missing.keys().cloned().collect();
        let mut merged = session.identifiers().clone();
        merged.extend(missing);
        session.set_identifiers(merged);
        self.dirty.mark(SyncInput::Identifiers);

        tracing::info!(
            "added identifier fields: {}",
            added
                .iter()
                .map(FieldName::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        SyncOutcome::Updated { added }
    }

    /// Run until an invocation commits nothing, returning every field added on the way.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::SyncDidNotSettle`] if updates are still being committed
    /// after [`MAX_SYNC_PASSES`] runs.
    pub fn settle<S: FormSession>(
        &mut self,
        session: &mut S,
    ) -> RegistrationResult<Vec<FieldName>> {
        let mut added = Vec::new();
        for _ in 0..MAX_SYNC_PASSES {
            match self.on_change(session) {
                SyncOutcome::Updated { added: fields } => added.extend(fields),
                SyncOutcome::Skipped | SyncOutcome::Unchanged => return Ok(added),
            }
        }
        Err(RegistrationError::SyncDidNotSettle {
            passes: MAX_SYNC_PASSES,
        })
    }
}
