//! Canonical jurisdiction identity.
//!
//! Ids follow `{STATE}_{LEVEL}_{NAME}` for the state/county/city tree
//! (`CA_STATE`, `CA_COUNTY_GLENN`, `CA_CITY_WILLOWS`). Service areas sit
//! outside the tree and use the irregular `{NAME}_SERVICE_AREA` form
//! (`MWD_SERVICE_AREA`). Identity is computed deterministically from the
//! input names and is never invented downstream.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::states::StateCode;

const SERVICE_AREA_SUFFIX: &str = "_SERVICE_AREA";

/// Hierarchy level of a jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    State,
    County,
    City,
    ServiceArea,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::State => "STATE",
            Level::County => "COUNTY",
            Level::City => "CITY",
            Level::ServiceArea => "SERVICE_AREA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "STATE" => Some(Level::State),
            "COUNTY" => Some(Level::County),
            "CITY" => Some(Level::City),
            "SERVICE_AREA" => Some(Level::ServiceArea),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidJurisdiction {
    #[error("unrecognized state code: {0}")]
    UnknownStateCode(String),

    #[error("{level} jurisdiction requires a {missing} name")]
    MissingName { level: Level, missing: &'static str },

    #[error("malformed jurisdiction id: {0}")]
    MalformedId(String),
}

/// Base legal status of water reuse within a jurisdiction, derived from the
/// raw single-letter status code carried by the reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegalStatus {
    Legal,
    Regulated,
    Varies,
    Unknown,
}

impl LegalStatus {
    /// `L` -> Legal, `R` -> Regulated, any other recorded code -> Varies,
    /// no code at all -> Unknown.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            None | Some("") => LegalStatus::Unknown,
            Some(c) if c.eq_ignore_ascii_case("L") => LegalStatus::Legal,
            Some(c) if c.eq_ignore_ascii_case("R") => LegalStatus::Regulated,
            Some(_) => LegalStatus::Varies,
        }
    }
}

/// Canonical jurisdiction id string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JurisdictionId(String);

/// Components recovered from parsing a canonical id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JurisdictionKey {
    pub level: Level,
    /// Absent for service areas, which carry no state in their id.
    pub state: Option<StateCode>,
    /// County, city, or service-area name component, canonicalized.
    pub name: Option<String>,
}

impl JurisdictionId {
    /// Id for a state, e.g. `CA_STATE`.
    pub fn state(state: StateCode) -> Self {
        JurisdictionId(format!("{}_STATE", state))
    }

    /// Id for a county, e.g. `CA_COUNTY_GLENN`.
    pub fn county(state: StateCode, county: &str) -> Result<Self, InvalidJurisdiction> {
        let name = require_name(Level::County, "county", county)?;
        Ok(JurisdictionId(format!("{}_COUNTY_{}", state, name)))
    }

    /// Id for a city, e.g. `CA_CITY_WILLOWS`.
    pub fn city(state: StateCode, city: &str) -> Result<Self, InvalidJurisdiction> {
        let name = require_name(Level::City, "city", city)?;
        Ok(JurisdictionId(format!("{}_CITY_{}", state, name)))
    }

    /// Id for a service area, e.g. `MWD_SERVICE_AREA`.
    pub fn service_area(name: &str) -> Result<Self, InvalidJurisdiction> {
        let name = require_name(Level::ServiceArea, "service area", name)?;
        Ok(JurisdictionId(format!("{}{}", name, SERVICE_AREA_SUFFIX)))
    }

    /// Build the canonical id for `(level, state, countyName?, cityName?)`.
    pub fn new(
        level: Level,
        state: StateCode,
        county: Option<&str>,
        city: Option<&str>,
    ) -> Result<Self, InvalidJurisdiction> {
        match level {
            Level::State => Ok(Self::state(state)),
            Level::County => Self::county(state, county.unwrap_or_default()),
            Level::City => Self::city(state, city.unwrap_or_default()),
            Level::ServiceArea => Err(InvalidJurisdiction::MissingName {
                level: Level::ServiceArea,
                missing: "service area",
            }),
        }
    }

    /// Wrap an id string that already came from the reference store.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        JurisdictionId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover level, state, and name from a canonical id.
    pub fn key(&self) -> Result<JurisdictionKey, InvalidJurisdiction> {
        Self::parse(&self.0)
    }

    pub fn parse(raw: &str) -> Result<JurisdictionKey, InvalidJurisdiction> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InvalidJurisdiction::MalformedId(raw.to_string()));
        }

        // Service-area ids carry their name up front and no state code.
        if let Some(name) = raw.strip_suffix(SERVICE_AREA_SUFFIX) {
            if name.is_empty() {
                return Err(InvalidJurisdiction::MalformedId(raw.to_string()));
            }
            return Ok(JurisdictionKey {
                level: Level::ServiceArea,
                state: None,
                name: Some(name.to_string()),
            });
        }

        let (code, rest) = raw
            .split_once('_')
            .ok_or_else(|| InvalidJurisdiction::MalformedId(raw.to_string()))?;
        let state = StateCode::from_code(code)
            .ok_or_else(|| InvalidJurisdiction::UnknownStateCode(code.to_string()))?;

        let key = match rest.split_once('_') {
            None if rest == "STATE" => JurisdictionKey {
                level: Level::State,
                state: Some(state),
                name: None,
            },
            Some(("COUNTY", name)) if !name.is_empty() => JurisdictionKey {
                level: Level::County,
                state: Some(state),
                name: Some(name.to_string()),
            },
            Some(("CITY", name)) if !name.is_empty() => JurisdictionKey {
                level: Level::City,
                state: Some(state),
                name: Some(name.to_string()),
            },
            _ => return Err(InvalidJurisdiction::MalformedId(raw.to_string())),
        };
        Ok(key)
    }
}

impl std::fmt::Display for JurisdictionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonicalize a display name into an id component: uppercase, runs of
/// non-alphanumerics collapsed to a single underscore, ends trimmed.
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_uppercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

fn require_name(
    level: Level,
    missing: &'static str,
    name: &str,
) -> Result<String, InvalidJurisdiction> {
    let canonical = canonical_name(name);
    if canonical.is_empty() {
        return Err(InvalidJurisdiction::MissingName { level, missing });
    }
    Ok(canonical)
}
