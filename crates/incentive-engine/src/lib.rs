//! Regulatory jurisdiction and incentive matching engine.
//!
//! Read-mostly and stateless between requests: all reference data lives
//! behind the [`store::RegistryStore`] query interface, and every
//! operation is a pure read over it. The combined view issues its
//! sub-queries concurrently and degrades per section.

pub mod aggregate;
pub mod error;
pub mod matcher;
pub mod memory;
pub mod model;
pub mod overrides;
pub mod resolver;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use jurisdiction_core::{JurisdictionId, StateCode};
use tokio::time::timeout;

use crate::error::EngineError;
use crate::model::{
    IncentiveMatches, JurisdictionView, JurisdictionViewOutcome, PathResolution, RegulationView,
    Section, StateRollup, WaterType, WaterTypeFilter,
};
use crate::overrides::ServiceAreaOverrides;
use crate::store::{with_retry, RegistryStore};

/// Upper bound for each sub-query of the combined view.
const SECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Engine entry point. Holds the query interface and the service-area
/// override table; no other state.
pub struct IncentiveEngine {
    store: Arc<dyn RegistryStore>,
    overrides: ServiceAreaOverrides,
}

impl IncentiveEngine {
    pub fn new(store: Arc<dyn RegistryStore>, overrides: ServiceAreaOverrides) -> Self {
        Self { store, overrides }
    }

    /// Resolve `state[/county[/city]]` slugs to a jurisdiction and its
    /// ancestor chain.
    pub async fn resolve_path(
        &self,
        state_slug: &str,
        county_slug: Option<&str>,
        city_slug: Option<&str>,
    ) -> Result<PathResolution, EngineError> {
        resolver::resolve_path(self.store.as_ref(), state_slug, county_slug, city_slug).await
    }

    /// Directory rollup for a state.
    pub async fn state_rollup(&self, state: StateCode) -> Result<StateRollup, EngineError> {
        let id = JurisdictionId::state(state);
        let record = with_retry(|| self.store.jurisdiction_by_id(&id)).await?;
        let record = record.ok_or(EngineError::UnknownJurisdiction(id))?;
        Ok(resolver::state_rollup(self.store.as_ref(), record).await)
    }

    /// Active programs covering the jurisdiction, each exactly once,
    /// annotated with the narrowest coverage type that matched.
    pub async fn match_incentives(
        &self,
        id: &JurisdictionId,
        water_type: Option<WaterType>,
    ) -> Result<IncentiveMatches, EngineError> {
        id.key()?;
        let record = with_retry(|| self.store.jurisdiction_by_id(id))
            .await?
            .ok_or_else(|| EngineError::UnknownJurisdiction(id.clone()))?;
        let candidates = matcher::candidate_ids(&record, &self.overrides);
        let programs = with_retry(|| self.store.programs_covering(&candidates)).await?;
        let matches = matcher::match_programs(programs, &candidates, water_type);
        tracing::debug!(
            jurisdiction = %id,
            candidates = candidates.len(),
            matched = matches.count,
            "incentive match complete"
        );
        Ok(matches)
    }

    /// Base legal status joined with per-water-type regulation rows.
    pub async fn aggregate_regulations(
        &self,
        id: &JurisdictionId,
        filter: WaterTypeFilter,
    ) -> Result<RegulationView, EngineError> {
        id.key()?;
        let record = with_retry(|| self.store.jurisdiction_by_id(id))
            .await?
            .ok_or_else(|| EngineError::UnknownJurisdiction(id.clone()))?;
        let narrowed = match filter {
            WaterTypeFilter::All => None,
            WaterTypeFilter::Only(water_type) => Some(water_type),
        };
        let rows = with_retry(|| self.store.regulations_for(id, narrowed)).await?;
        Ok(aggregate::build_view(&record, rows, filter))
    }

    /// Resolve a slug path and assemble the aggregated view.
    ///
    /// Path resolution is the one hard dependency; the rollup, incentive,
    /// and regulation sub-queries then run concurrently, each bounded by
    /// [`SECTION_TIMEOUT`]. A failed or timed-out sub-query marks only
    /// its own section unavailable.
    pub async fn jurisdiction_view(
        &self,
        state_slug: &str,
        county_slug: Option<&str>,
        city_slug: Option<&str>,
    ) -> Result<JurisdictionViewOutcome, EngineError> {
        let (jurisdiction, ancestors) = match self
            .resolve_path(state_slug, county_slug, city_slug)
            .await?
        {
            PathResolution::Resolved {
                jurisdiction,
                ancestors,
            } => (jurisdiction, ancestors),
            PathResolution::NotFound => return Ok(JurisdictionViewOutcome::NotFound),
        };

        // The state record is the first ancestor, or the target itself on
        // a state page.
        let state_record = ancestors
            .first()
            .cloned()
            .unwrap_or_else(|| jurisdiction.clone());

        let (rollup, incentives, regulations) = tokio::join!(
            timeout(SECTION_TIMEOUT, async {
                Ok::<_, EngineError>(resolver::state_rollup(self.store.as_ref(), state_record).await)
            }),
            timeout(
                SECTION_TIMEOUT,
                self.match_incentives(&jurisdiction.id, None),
            ),
            timeout(
                SECTION_TIMEOUT,
                self.aggregate_regulations(&jurisdiction.id, WaterTypeFilter::All),
            ),
        );

        Ok(JurisdictionViewOutcome::Found(Box::new(JurisdictionView {
            rollup: section("rollup", rollup),
            incentives: section("incentives", incentives),
            regulations: section("regulations", regulations),
            jurisdiction,
            ancestors,
        })))
    }
}

/// Collapse a timed, fallible sub-query into a response section.
fn section<T>(
    name: &str,
    outcome: Result<Result<T, EngineError>, tokio::time::error::Elapsed>,
) -> Section<T> {
    match outcome {
        Ok(Ok(value)) => Section::Available(value),
        Ok(Err(err)) => {
            tracing::warn!(section = name, error = %err, "response section unavailable");
            Section::Unavailable
        }
        Err(_) => {
            tracing::warn!(section = name, "response section timed out");
            Section::Unavailable
        }
    }
}
