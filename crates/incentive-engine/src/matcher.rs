//! Incentive matching: candidate-set construction, eligibility, and
//! dedup with coverage precedence.

use std::collections::HashSet;

use jurisdiction_core::{JurisdictionId, Level};

use crate::model::{IncentiveMatches, IncentiveProgram, JurisdictionRecord, MatchedProgram, WaterType};
use crate::overrides::ServiceAreaOverrides;

/// Jurisdiction ids that can satisfy a coverage link for this target:
/// the state always, the county and city when present, plus any service
/// area whose home state covers the target. A service-area target is its
/// own sole candidate.
pub(crate) fn candidate_ids(
    record: &JurisdictionRecord,
    overrides: &ServiceAreaOverrides,
) -> Vec<JurisdictionId> {
    if record.level == Level::ServiceArea {
        return vec![record.id.clone()];
    }

    let mut ids = vec![JurisdictionId::state(record.state_code)];
    if let Some(county) = record.county_name.as_deref() {
        if let Ok(id) = JurisdictionId::county(record.state_code, county) {
            ids.push(id);
        }
    }
    if let Some(city) = record.city_name.as_deref() {
        if let Ok(id) = JurisdictionId::city(record.state_code, city) {
            ids.push(id);
        }
    }
    ids.extend(overrides.covering_state(record.state_code).cloned());
    ids
}

/// Reduce candidate programs to the final match set.
///
/// A program is eligible when it is active, passes the water-type filter,
/// and has any coverage link into the candidate set. It appears exactly
/// once, annotated with the narrowest link that matched; which level
/// matched never affects eligibility, only the annotation. Output is
/// sorted by program name, then id, so repeated runs over unchanged data
/// produce identical responses.
pub(crate) fn match_programs(
    programs: Vec<IncentiveProgram>,
    candidates: &[JurisdictionId],
    water_type: Option<WaterType>,
) -> IncentiveMatches {
    let candidate_set: HashSet<&str> = candidates.iter().map(JurisdictionId::as_str).collect();

    let mut matched: Vec<MatchedProgram> = Vec::new();
    for program in programs {
        if !program.is_active() {
            continue;
        }
        if let Some(wt) = water_type {
            if !program.applies_to(wt) {
                continue;
            }
        }
        let narrowest = program
            .coverage
            .iter()
            .filter(|link| candidate_set.contains(link.jurisdiction_id.as_str()))
            .map(|link| link.coverage_type)
            .max();
        let Some(coverage_type) = narrowest else {
            continue;
        };
        matched.push(MatchedProgram {
            program_id: program.program_id,
            program_name: program.program_name,
            amount_min: program.amount_min,
            amount_max: program.amount_max,
            matched_coverage_type: coverage_type,
        });
    }

    matched.sort_by(|a, b| {
        (a.program_name.as_str(), a.program_id.as_str())
            .cmp(&(b.program_name.as_str(), b.program_id.as_str()))
    });
    let count = matched.len();
    IncentiveMatches {
        programs: matched,
        count,
    }
}
