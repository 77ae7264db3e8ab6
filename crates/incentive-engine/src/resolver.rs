//! Slug-path resolution and the state directory rollup.

use jurisdiction_core::slug::{find_by_slug, resolve_state_slug};
use jurisdiction_core::{JurisdictionId, Level, StateCode};

use crate::error::EngineError;
use crate::model::{JurisdictionRecord, PathResolution, StateRollup};
use crate::store::{with_retry, RegistryStore};

/// Resolve `state[/county[/city]]` slugs to a jurisdiction and its
/// ancestor chain.
///
/// Slug misses are `NotFound` values. A narrower name that exists only
/// under a different ancestor is a `JurisdictionMismatch` so callers
/// render not-found instead of silently falling back to the parent.
pub(crate) async fn resolve_path(
    store: &dyn RegistryStore,
    state_slug: &str,
    county_slug: Option<&str>,
    city_slug: Option<&str>,
) -> Result<PathResolution, EngineError> {
    let Some(state) = resolve_state_slug(state_slug) else {
        return Ok(PathResolution::NotFound);
    };

    let state_id = JurisdictionId::state(state);
    let Some(state_record) = with_retry(|| store.jurisdiction_by_id(&state_id)).await? else {
        return Ok(PathResolution::NotFound);
    };

    let Some(county_slug) = county_slug else {
        return Ok(PathResolution::Resolved {
            jurisdiction: state_record,
            ancestors: vec![],
        });
    };

    let state_rows = with_retry(|| store.jurisdictions_by_state(state)).await?;

    let counties: Vec<JurisdictionRecord> = state_rows
        .iter()
        .filter(|r| r.level == Level::County)
        .cloned()
        .collect();
    let Some(county_record) = find_by_slug(&counties, county_slug, county_name).cloned() else {
        return county_miss(store, state, county_slug).await;
    };

    let Some(city_slug) = city_slug else {
        return Ok(PathResolution::Resolved {
            jurisdiction: county_record,
            ancestors: vec![state_record],
        });
    };

    let cities: Vec<JurisdictionRecord> = state_rows
        .iter()
        .filter(|r| r.level == Level::City)
        .filter(|r| {
            same_name(
                r.county_name.as_deref(),
                county_record.county_name.as_deref(),
            )
        })
        .cloned()
        .collect();
    let Some(city_record) = find_by_slug(&cities, city_slug, city_name).cloned() else {
        return city_miss(store, &county_record, city_slug).await;
    };

    Ok(PathResolution::Resolved {
        jurisdiction: city_record,
        ancestors: vec![state_record, county_record],
    })
}

/// Directory rollup for a state: its record plus counts of distinct
/// counties and cities with at least one incentive or regulation record.
///
/// Degraded mode: if the backend is still unavailable after the retry,
/// the counts come back as zero so the page renders "no data" instead of
/// crashing.
pub(crate) async fn state_rollup(store: &dyn RegistryStore, record: JurisdictionRecord) -> StateRollup {
    let ids = match with_retry(|| store.jurisdictions_with_data(record.state_code)).await {
        Ok(ids) => ids,
        Err(err) => {
            tracing::warn!(
                state = %record.state_code,
                error = %err,
                "directory rollup degraded to empty counts"
            );
            return StateRollup {
                record,
                county_count: 0,
                city_count: 0,
            };
        }
    };

    let mut county_count = 0;
    let mut city_count = 0;
    for id in &ids {
        if let Ok(key) = id.key() {
            match key.level {
                Level::County => county_count += 1,
                Level::City => city_count += 1,
                Level::State | Level::ServiceArea => {}
            }
        }
    }
    StateRollup {
        record,
        county_count,
        city_count,
    }
}

/// County slug missed within the state: a county of that name under a
/// different state is a mismatch, no county anywhere is not-found.
async fn county_miss(
    store: &dyn RegistryStore,
    state: StateCode,
    county_slug: &str,
) -> Result<PathResolution, EngineError> {
    let all_counties = with_retry(|| store.jurisdictions_at_level(Level::County)).await?;
    match find_by_slug(&all_counties, county_slug, county_name) {
        Some(other) => Err(EngineError::JurisdictionMismatch {
            child: format!("county {}", other.display_name()),
            parent: state.name().to_string(),
        }),
        None => Ok(PathResolution::NotFound),
    }
}

/// City slug missed within the county: same distinction one level down.
async fn city_miss(
    store: &dyn RegistryStore,
    county_record: &JurisdictionRecord,
    city_slug: &str,
) -> Result<PathResolution, EngineError> {
    let all_cities = with_retry(|| store.jurisdictions_at_level(Level::City)).await?;
    match find_by_slug(&all_cities, city_slug, city_name) {
        Some(other) => Err(EngineError::JurisdictionMismatch {
            child: format!("city {}", other.display_name()),
            parent: format!(
                "county {}, {}",
                county_record.display_name(),
                county_record.state_name
            ),
        }),
        None => Ok(PathResolution::NotFound),
    }
}

fn county_name(record: &JurisdictionRecord) -> &str {
    record.county_name.as_deref().unwrap_or("")
}

fn city_name(record: &JurisdictionRecord) -> &str {
    record.city_name.as_deref().unwrap_or("")
}

fn same_name(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}
