//! Error taxonomy for the matching engine.
//!
//! Invalid identities and bad descent are caller errors and surface as
//! not-found; backend failures are retried once at the store boundary and
//! then degrade the affected response section.

use jurisdiction_core::{InvalidJurisdiction, JurisdictionId};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed jurisdiction identity in the input.
    #[error(transparent)]
    InvalidJurisdiction(#[from] InvalidJurisdiction),

    /// Well-formed id with no matching record in the reference data.
    #[error("no jurisdiction on record for id: {0}")]
    UnknownJurisdiction(JurisdictionId),

    /// The narrower level does not descend from the wider level given.
    #[error("{child} does not belong to {parent}")]
    JurisdictionMismatch { child: String, parent: String },

    /// The external query backend failed even after a retry.
    #[error("reference data source unavailable: {0}")]
    DataSourceUnavailable(#[from] StoreError),
}
