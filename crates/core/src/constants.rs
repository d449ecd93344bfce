//! Constants used throughout the registration core crate.

/// Wire encoding of an identifier value that will be generated by its source.
pub const AUTO_GENERATED_SENTINEL: &str = "auto-generated";

/// Upper bound on synchronisation passes before [`settle`](crate::synchroniser::IdentifierSynchroniser::settle)
/// gives up.
///
/// Each committed pass only adds missing fields, so two passes always suffice.
pub const MAX_SYNC_PASSES: usize = 8;
