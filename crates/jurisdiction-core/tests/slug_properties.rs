//! Property-based tests for slug handling and jurisdiction identity.

use jurisdiction_core::identity::{canonical_name, JurisdictionId, Level};
use jurisdiction_core::slug::{deslugify, resolve_state_slug, slugify};
use jurisdiction_core::states::StateCode;
use proptest::prelude::*;

/// Place-name-shaped input: words of letters with occasional apostrophes
/// and periods, joined by spaces.
fn place_name() -> impl Strategy<Value = String> {
    proptest::collection::vec("[A-Za-z][a-z'.]{0,10}", 1..4).prop_map(|words| words.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ============================================================
    // Slug Shape
    // ============================================================

    #[test]
    fn slugs_stay_in_url_safe_charset(name in "\\PC{0,40}") {
        let slug = slugify(&name);
        let pattern = regex::Regex::new(r"^$|^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
        prop_assert!(
            pattern.is_match(&slug),
            "slug {:?} escaped the charset for input {:?}",
            slug,
            name
        );
    }

    #[test]
    fn slugify_is_idempotent(name in place_name()) {
        let once = slugify(&name);
        prop_assert_eq!(slugify(&once), once.clone());
    }

    #[test]
    fn deslugify_then_slugify_round_trips(name in place_name()) {
        // The display form is lossy (case, punctuation), but the slug form
        // is stable across a round trip.
        let slug = slugify(&name);
        prop_assert_eq!(slugify(&deslugify(&slug)), slug);
    }

    // ============================================================
    // Identity Canonicalization
    // ============================================================

    #[test]
    fn canonical_names_are_upper_snake(name in place_name()) {
        let canonical = canonical_name(&name);
        let pattern = regex::Regex::new(r"^$|^[A-Z0-9]+(_[A-Z0-9]+)*$").unwrap();
        prop_assert!(pattern.is_match(&canonical));
    }

    #[test]
    fn city_ids_parse_back_to_city_level(name in "[A-Za-z]{1,12}( [A-Za-z]{1,12}){0,2}") {
        let id = JurisdictionId::city(StateCode::CA, &name).unwrap();
        let key = id.key().unwrap();
        prop_assert_eq!(key.level, Level::City);
        prop_assert_eq!(key.state, Some(StateCode::CA));
        prop_assert_eq!(key.name, Some(canonical_name(&name)));
    }
}

// ============================================================
// Exhaustive Table Checks (non-property)
// ============================================================

#[test]
fn every_state_name_slug_resolves_to_its_code() {
    for state in StateCode::all() {
        let slug = slugify(state.name());
        assert_eq!(
            resolve_state_slug(&slug),
            Some(state),
            "name slug {:?} did not resolve",
            slug
        );
    }
}

#[test]
fn every_state_code_slug_resolves_to_its_code() {
    for state in StateCode::all() {
        let slug = state.as_str().to_lowercase();
        assert_eq!(resolve_state_slug(&slug), Some(state));
    }
}

#[test]
fn state_table_round_trips_through_names() {
    for state in StateCode::all() {
        let name = state.name();
        assert_eq!(StateCode::from_name(name), Some(state));
    }
}
