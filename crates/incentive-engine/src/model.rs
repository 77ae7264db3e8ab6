//! Domain records the engine reads and the response shapes it produces.

use std::collections::BTreeMap;

use jurisdiction_core::{JurisdictionId, LegalStatus, Level, StateCode};
use serde::{Deserialize, Serialize};

/// A jurisdiction as stored in the reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionRecord {
    pub id: JurisdictionId,
    pub level: Level,
    pub state_code: StateCode,
    pub state_name: String,
    pub county_name: Option<String>,
    pub city_name: Option<String>,
    pub legal_status: LegalStatus,
    /// Citation of the governing plumbing/health code, when recorded.
    pub governing_code: Option<String>,
}

impl JurisdictionRecord {
    /// The most specific display name this record carries.
    pub fn display_name(&self) -> &str {
        self.city_name
            .as_deref()
            .or(self.county_name.as_deref())
            .unwrap_or(&self.state_name)
    }
}

/// How broadly a coverage link applies.
///
/// Variant order is ascending specificity, so `Ord` ranks `CitySpecific`
/// above `CountyWide` above `ServiceArea` above `StateWide`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageType {
    StateWide,
    ServiceArea,
    CountyWide,
    CitySpecific,
}

impl CoverageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageType::StateWide => "STATE_WIDE",
            CoverageType::ServiceArea => "SERVICE_AREA",
            CoverageType::CountyWide => "COUNTY_WIDE",
            CoverageType::CitySpecific => "CITY_SPECIFIC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "STATE_WIDE" => Some(CoverageType::StateWide),
            "SERVICE_AREA" => Some(CoverageType::ServiceArea),
            "COUNTY_WIDE" => Some(CoverageType::CountyWide),
            "CITY_SPECIFIC" => Some(CoverageType::CitySpecific),
            _ => None,
        }
    }
}

/// Association from a program to one jurisdiction it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageLink {
    pub jurisdiction_id: JurisdictionId,
    pub coverage_type: CoverageType,
}

/// Category of regulated water reuse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaterType {
    Greywater,
    Rainwater,
}

impl WaterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterType::Greywater => "GREYWATER",
            WaterType::Rainwater => "RAINWATER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GREYWATER" => Some(WaterType::Greywater),
            "RAINWATER" => Some(WaterType::Rainwater),
            _ => None,
        }
    }

    pub fn all() -> impl Iterator<Item = WaterType> {
        [WaterType::Greywater, WaterType::Rainwater].into_iter()
    }
}

/// Water-type selector for regulation aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterTypeFilter {
    All,
    Only(WaterType),
}

impl WaterTypeFilter {
    /// `"all"` (any case) selects everything; otherwise a single type.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Some(WaterTypeFilter::All);
        }
        WaterType::parse(s).map(WaterTypeFilter::Only)
    }
}

/// An incentive program with its coverage links.
///
/// `status` is kept as the raw source value; eligibility is a
/// case-insensitive comparison against `"active"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveProgram {
    pub program_id: String,
    pub program_name: String,
    pub status: String,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    /// `None` means the program applies regardless of water type.
    pub water_type: Option<WaterType>,
    pub coverage: Vec<CoverageLink>,
}

impl IncentiveProgram {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }

    pub fn applies_to(&self, water_type: WaterType) -> bool {
        self.water_type.map_or(true, |t| t == water_type)
    }
}

/// Per-water-type regulation row. At most one per
/// `(jurisdiction_id, water_type)`; an absent row means "no specific
/// regulation recorded," not "prohibited."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterTypeRegulation {
    pub jurisdiction_id: JurisdictionId,
    pub water_type: WaterType,
    /// Gallons-per-day threshold above which a permit is required.
    pub permit_threshold_gpd: Option<f64>,
    pub approved_uses: Vec<String>,
    pub key_restrictions: Vec<String>,
    pub summary: Option<String>,
}

/// One matched program in a response, annotated with the narrowest
/// coverage type that reached the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedProgram {
    pub program_id: String,
    pub program_name: String,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub matched_coverage_type: CoverageType,
}

/// Result of an incentive match, sorted by program name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveMatches {
    pub programs: Vec<MatchedProgram>,
    pub count: usize,
}

impl IncentiveMatches {
    /// Derived presentation view: programs bucketed by the coverage type
    /// they matched at. Not a separate data structure, just a grouping of
    /// the flat list.
    pub fn by_coverage(&self) -> BTreeMap<CoverageType, Vec<&MatchedProgram>> {
        let mut buckets: BTreeMap<CoverageType, Vec<&MatchedProgram>> = BTreeMap::new();
        for program in &self.programs {
            buckets
                .entry(program.matched_coverage_type)
                .or_default()
                .push(program);
        }
        buckets
    }
}

/// Whether a regulation row is on file for a water type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegulationEntry {
    OnFile(WaterTypeRegulation),
    NotOnFile,
}

impl RegulationEntry {
    pub fn is_on_file(&self) -> bool {
        matches!(self, RegulationEntry::OnFile(_))
    }
}

/// Jurisdiction-level regulation view: base legal status joined with the
/// per-water-type rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationView {
    pub jurisdiction_id: JurisdictionId,
    pub legal_status: LegalStatus,
    pub governing_code: Option<String>,
    pub by_water_type: BTreeMap<WaterType, RegulationEntry>,
}

/// State directory rollup: the state's own record plus counts of counties
/// and cities that have any incentive or regulation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRollup {
    pub record: JurisdictionRecord,
    pub county_count: usize,
    pub city_count: usize,
}

/// Outcome of resolving a slug path. Slug misses are values, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathResolution {
    Resolved {
        jurisdiction: JurisdictionRecord,
        /// Wider levels, outermost first (state, then county for a city).
        ancestors: Vec<JurisdictionRecord>,
    },
    NotFound,
}

/// One section of a combined response; a failed sub-query marks its
/// section unavailable instead of failing the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section<T> {
    Available(T),
    Unavailable,
}

impl<T> Section<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Section::Available(_))
    }
}

/// Aggregated per-jurisdiction view assembled from concurrent sub-queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionView {
    pub jurisdiction: JurisdictionRecord,
    pub ancestors: Vec<JurisdictionRecord>,
    pub rollup: Section<StateRollup>,
    pub incentives: Section<IncentiveMatches>,
    pub regulations: Section<RegulationView>,
}

/// Outcome of building the combined view for a slug path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JurisdictionViewOutcome {
    Found(Box<JurisdictionView>),
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_coverage_specificity_ordering() {
        assert!(CoverageType::CitySpecific > CoverageType::CountyWide);
        assert!(CoverageType::CountyWide > CoverageType::ServiceArea);
        assert!(CoverageType::ServiceArea > CoverageType::StateWide);
    }

    #[test]
    fn test_coverage_type_round_trip() {
        for ct in [
            CoverageType::StateWide,
            CoverageType::ServiceArea,
            CoverageType::CountyWide,
            CoverageType::CitySpecific,
        ] {
            assert_eq!(CoverageType::parse(ct.as_str()), Some(ct));
        }
        assert_eq!(CoverageType::parse("city_specific"), Some(CoverageType::CitySpecific));
        assert_eq!(CoverageType::parse("NATIONWIDE"), None);
    }

    #[test]
    fn test_program_status_compare_is_case_insensitive() {
        let mut program = IncentiveProgram {
            program_id: "p1".to_string(),
            program_name: "Rebate".to_string(),
            status: "ACTIVE".to_string(),
            amount_min: None,
            amount_max: None,
            water_type: None,
            coverage: vec![],
        };
        assert!(program.is_active());

        program.status = "Active".to_string();
        assert!(program.is_active());

        program.status = "Expired".to_string();
        assert!(!program.is_active());

        program.status = "PENDING".to_string();
        assert!(!program.is_active());
    }

    #[test]
    fn test_water_type_filter_parse() {
        assert_eq!(WaterTypeFilter::parse("all"), Some(WaterTypeFilter::All));
        assert_eq!(WaterTypeFilter::parse("ALL"), Some(WaterTypeFilter::All));
        assert_eq!(
            WaterTypeFilter::parse("greywater"),
            Some(WaterTypeFilter::Only(WaterType::Greywater))
        );
        assert_eq!(WaterTypeFilter::parse("seawater"), None);
    }

    #[test]
    fn test_by_coverage_is_a_grouping_of_the_flat_list() {
        let matches = IncentiveMatches {
            programs: vec![
                MatchedProgram {
                    program_id: "a".to_string(),
                    program_name: "A".to_string(),
                    amount_min: None,
                    amount_max: None,
                    matched_coverage_type: CoverageType::StateWide,
                },
                MatchedProgram {
                    program_id: "b".to_string(),
                    program_name: "B".to_string(),
                    amount_min: None,
                    amount_max: None,
                    matched_coverage_type: CoverageType::CitySpecific,
                },
            ],
            count: 2,
        };
        let buckets = matches.by_coverage();
        assert_eq!(buckets[&CoverageType::StateWide].len(), 1);
        assert_eq!(buckets[&CoverageType::CitySpecific].len(), 1);
        assert_eq!(buckets.values().map(|v| v.len()).sum::<usize>(), matches.count);
    }
}
