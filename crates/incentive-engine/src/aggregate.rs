//! Regulation aggregation: base legal status joined with per-water-type
//! regulation rows.

use std::collections::BTreeMap;

use crate::model::{
    JurisdictionRecord, RegulationEntry, RegulationView, WaterType, WaterTypeFilter,
    WaterTypeRegulation,
};

/// Assemble the jurisdiction-level view from the base record and its rows.
///
/// With `All`, every water type gets an entry: a missing row becomes an
/// explicit `NotOnFile` marker so callers can tell "not yet researched"
/// from "found and empty." A requested single type behaves the same way
/// for just that type.
pub(crate) fn build_view(
    record: &JurisdictionRecord,
    rows: Vec<WaterTypeRegulation>,
    filter: WaterTypeFilter,
) -> RegulationView {
    let mut by_water_type = BTreeMap::new();
    match filter {
        WaterTypeFilter::All => {
            for water_type in WaterType::all() {
                by_water_type.insert(water_type, entry_for(&rows, water_type));
            }
        }
        WaterTypeFilter::Only(water_type) => {
            by_water_type.insert(water_type, entry_for(&rows, water_type));
        }
    }

    RegulationView {
        jurisdiction_id: record.id.clone(),
        legal_status: record.legal_status,
        governing_code: record.governing_code.clone(),
        by_water_type,
    }
}

fn entry_for(rows: &[WaterTypeRegulation], water_type: WaterType) -> RegulationEntry {
    // At most one row per (jurisdiction, water type); first wins if the
    // source ever violates that.
    rows.iter()
        .find(|row| row.water_type == water_type)
        .cloned()
        .map(RegulationEntry::OnFile)
        .unwrap_or(RegulationEntry::NotOnFile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jurisdiction_core::{JurisdictionId, LegalStatus, Level, StateCode};
    use pretty_assertions::assert_eq;

    fn record() -> JurisdictionRecord {
        JurisdictionRecord {
            id: JurisdictionId::from_raw("CA_COUNTY_GLENN"),
            level: Level::County,
            state_code: StateCode::CA,
            state_name: "California".to_string(),
            county_name: Some("Glenn".to_string()),
            city_name: None,
            legal_status: LegalStatus::Regulated,
            governing_code: Some("CPC Chapter 15".to_string()),
        }
    }

    fn greywater_row() -> WaterTypeRegulation {
        WaterTypeRegulation {
            jurisdiction_id: JurisdictionId::from_raw("CA_COUNTY_GLENN"),
            water_type: WaterType::Greywater,
            permit_threshold_gpd: Some(250.0),
            approved_uses: vec!["Subsurface irrigation".to_string()],
            key_restrictions: vec!["No surface ponding".to_string()],
            summary: Some("Permit above 250 gpd".to_string()),
        }
    }

    #[test]
    fn test_all_filter_emits_explicit_not_on_file() {
        let view = build_view(&record(), vec![greywater_row()], WaterTypeFilter::All);

        // No Rainwater row exists, but the key is present with a marker.
        assert_eq!(
            view.by_water_type.get(&WaterType::Rainwater),
            Some(&RegulationEntry::NotOnFile)
        );
        assert!(view.by_water_type[&WaterType::Greywater].is_on_file());
        assert_eq!(view.by_water_type.len(), WaterType::all().count());
    }

    #[test]
    fn test_single_type_with_no_row_is_not_on_file() {
        let view = build_view(
            &record(),
            vec![],
            WaterTypeFilter::Only(WaterType::Rainwater),
        );
        assert_eq!(
            view.by_water_type.get(&WaterType::Rainwater),
            Some(&RegulationEntry::NotOnFile)
        );
        assert_eq!(view.by_water_type.len(), 1);
    }

    #[test]
    fn test_base_fields_come_from_the_record() {
        let view = build_view(&record(), vec![], WaterTypeFilter::All);
        assert_eq!(view.legal_status, LegalStatus::Regulated);
        assert_eq!(view.governing_code.as_deref(), Some("CPC Chapter 15"));
        assert_eq!(view.jurisdiction_id.as_str(), "CA_COUNTY_GLENN");
    }
}
