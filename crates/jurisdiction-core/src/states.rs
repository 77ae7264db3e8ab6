//! The 50-state (plus DC) code/name reference table.
//!
//! Every lookup is driven by one table so the code<->name mapping stays
//! bidirectional and exhaustive. Lookups are case-insensitive and accept
//! either the 2-letter code or the full name.

use serde::{Deserialize, Serialize};

/// US state postal codes, plus the District of Columbia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StateCode {
    AL,
    AK,
    AZ,
    AR,
    CA,
    CO,
    CT,
    DE,
    FL,
    GA,
    HI,
    ID,
    IL,
    IN,
    IA,
    KS,
    KY,
    LA,
    ME,
    MD,
    MA,
    MI,
    MN,
    MS,
    MO,
    MT,
    NE,
    NV,
    NH,
    NJ,
    NM,
    NY,
    NC,
    ND,
    OH,
    OK,
    OR,
    PA,
    RI,
    SC,
    SD,
    TN,
    TX,
    UT,
    VT,
    VA,
    WA,
    WV,
    WI,
    WY,
    DC,
}

/// Single source of truth for code and display name.
const STATE_TABLE: &[(StateCode, &str, &str)] = &[
    (StateCode::AL, "AL", "Alabama"),
    (StateCode::AK, "AK", "Alaska"),
    (StateCode::AZ, "AZ", "Arizona"),
    (StateCode::AR, "AR", "Arkansas"),
    (StateCode::CA, "CA", "California"),
    (StateCode::CO, "CO", "Colorado"),
    (StateCode::CT, "CT", "Connecticut"),
    (StateCode::DE, "DE", "Delaware"),
    (StateCode::FL, "FL", "Florida"),
    (StateCode::GA, "GA", "Georgia"),
    (StateCode::HI, "HI", "Hawaii"),
    (StateCode::ID, "ID", "Idaho"),
    (StateCode::IL, "IL", "Illinois"),
    (StateCode::IN, "IN", "Indiana"),
    (StateCode::IA, "IA", "Iowa"),
    (StateCode::KS, "KS", "Kansas"),
    (StateCode::KY, "KY", "Kentucky"),
    (StateCode::LA, "LA", "Louisiana"),
    (StateCode::ME, "ME", "Maine"),
    (StateCode::MD, "MD", "Maryland"),
    (StateCode::MA, "MA", "Massachusetts"),
    (StateCode::MI, "MI", "Michigan"),
    (StateCode::MN, "MN", "Minnesota"),
    (StateCode::MS, "MS", "Mississippi"),
    (StateCode::MO, "MO", "Missouri"),
    (StateCode::MT, "MT", "Montana"),
    (StateCode::NE, "NE", "Nebraska"),
    (StateCode::NV, "NV", "Nevada"),
    (StateCode::NH, "NH", "New Hampshire"),
    (StateCode::NJ, "NJ", "New Jersey"),
    (StateCode::NM, "NM", "New Mexico"),
    (StateCode::NY, "NY", "New York"),
    (StateCode::NC, "NC", "North Carolina"),
    (StateCode::ND, "ND", "North Dakota"),
    (StateCode::OH, "OH", "Ohio"),
    (StateCode::OK, "OK", "Oklahoma"),
    (StateCode::OR, "OR", "Oregon"),
    (StateCode::PA, "PA", "Pennsylvania"),
    (StateCode::RI, "RI", "Rhode Island"),
    (StateCode::SC, "SC", "South Carolina"),
    (StateCode::SD, "SD", "South Dakota"),
    (StateCode::TN, "TN", "Tennessee"),
    (StateCode::TX, "TX", "Texas"),
    (StateCode::UT, "UT", "Utah"),
    (StateCode::VT, "VT", "Vermont"),
    (StateCode::VA, "VA", "Virginia"),
    (StateCode::WA, "WA", "Washington"),
    (StateCode::WV, "WV", "West Virginia"),
    (StateCode::WI, "WI", "Wisconsin"),
    (StateCode::WY, "WY", "Wyoming"),
    (StateCode::DC, "DC", "District of Columbia"),
];

impl StateCode {
    /// The 2-letter postal code, e.g. `"CA"`.
    pub fn as_str(&self) -> &'static str {
        self.entry().1
    }

    /// The full display name, e.g. `"California"`.
    pub fn name(&self) -> &'static str {
        self.entry().2
    }

    /// Look up by 2-letter code, case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        STATE_TABLE
            .iter()
            .find(|(_, c, _)| c.eq_ignore_ascii_case(code.trim()))
            .map(|(state, _, _)| *state)
    }

    /// Look up by full name, case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        STATE_TABLE
            .iter()
            .find(|(_, _, n)| n.eq_ignore_ascii_case(name.trim()))
            .map(|(state, _, _)| *state)
    }

    /// Accepts either the 2-letter code or the full name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_code(s).or_else(|| Self::from_name(s))
    }

    /// Every recognized state, in table order.
    pub fn all() -> impl Iterator<Item = StateCode> {
        STATE_TABLE.iter().map(|(state, _, _)| *state)
    }

    fn entry(&self) -> &'static (StateCode, &'static str, &'static str) {
        STATE_TABLE
            .iter()
            .find(|(state, _, _)| state == self)
            .unwrap_or(&STATE_TABLE[0])
    }
}

impl std::fmt::Display for StateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_code_parsing() {
        assert_eq!(StateCode::from_code("CA"), Some(StateCode::CA));
        assert_eq!(StateCode::from_code("ca"), Some(StateCode::CA));
        assert_eq!(StateCode::from_code("XX"), None);
    }

    #[test]
    fn test_name_parsing() {
        assert_eq!(StateCode::from_name("California"), Some(StateCode::CA));
        assert_eq!(StateCode::from_name("new york"), Some(StateCode::NY));
        assert_eq!(StateCode::from_name("Cascadia"), None);
    }

    #[test]
    fn test_parse_accepts_both_forms() {
        assert_eq!(StateCode::parse("TX"), Some(StateCode::TX));
        assert_eq!(StateCode::parse("texas"), Some(StateCode::TX));
        assert_eq!(
            StateCode::parse("district of columbia"),
            Some(StateCode::DC)
        );
    }

    #[test]
    fn test_table_is_exhaustive_and_bidirectional() {
        let mut count = 0;
        for state in StateCode::all() {
            assert_eq!(StateCode::from_code(state.as_str()), Some(state));
            assert_eq!(StateCode::from_name(state.name()), Some(state));
            count += 1;
        }
        // 50 states + DC
        assert_eq!(count, 51);
    }

    #[test]
    fn test_display_is_postal_code() {
        assert_eq!(StateCode::NY.to_string(), "NY");
        assert_eq!(StateCode::DC.to_string(), "DC");
    }
}
