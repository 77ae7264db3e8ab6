//! Service-area coverage overrides.
//!
//! Some service areas (e.g. a regional metropolitan water district) are
//! defined as covering a whole state's geography even though they sit
//! outside the state/county/city tree. They are configuration, not code:
//! adding a service area means adding an entry here, never a new string
//! comparison in match logic.

use jurisdiction_core::{JurisdictionId, StateCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAreaOverride {
    pub service_area_id: JurisdictionId,
    pub home_state: StateCode,
}

/// Injectable table of service-area overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceAreaOverrides(Vec<ServiceAreaOverride>);

impl ServiceAreaOverrides {
    pub fn new(entries: Vec<ServiceAreaOverride>) -> Self {
        ServiceAreaOverrides(entries)
    }

    pub fn empty() -> Self {
        ServiceAreaOverrides::default()
    }

    /// Service-area ids whose home state matches the target's state.
    pub fn covering_state(&self, state: StateCode) -> impl Iterator<Item = &JurisdictionId> {
        self.0
            .iter()
            .filter(move |entry| entry.home_state == state)
            .map(|entry| &entry.service_area_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
