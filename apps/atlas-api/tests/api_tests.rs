//! In-process router tests against the in-memory reference store.

use std::sync::Arc;

use atlas_api::state::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use incentive_engine::memory::MemoryStore;
use incentive_engine::model::{CoverageLink, CoverageType, IncentiveProgram, JurisdictionRecord};
use incentive_engine::model::{WaterType, WaterTypeRegulation};
use incentive_engine::overrides::{ServiceAreaOverride, ServiceAreaOverrides};
use incentive_engine::IncentiveEngine;
use jurisdiction_core::{JurisdictionId, LegalStatus, Level, StateCode};
use serde_json::Value;
use tower::ServiceExt;

fn record(
    id: &str,
    level: Level,
    state: StateCode,
    county: Option<&str>,
    city: Option<&str>,
) -> JurisdictionRecord {
    JurisdictionRecord {
        id: JurisdictionId::from_raw(id),
        level,
        state_code: state,
        state_name: state.name().to_string(),
        county_name: county.map(str::to_string),
        city_name: city.map(str::to_string),
        legal_status: LegalStatus::Legal,
        governing_code: None,
    }
}

fn test_app() -> Router {
    let mut store = MemoryStore::new();
    store.insert_jurisdiction(record("CA_STATE", Level::State, StateCode::CA, None, None));
    store.insert_jurisdiction(record("NY_STATE", Level::State, StateCode::NY, None, None));
    store.insert_jurisdiction(record(
        "CA_COUNTY_GLENN",
        Level::County,
        StateCode::CA,
        Some("Glenn"),
        None,
    ));
    store.insert_jurisdiction(record(
        "CA_CITY_WILLOWS",
        Level::City,
        StateCode::CA,
        Some("Glenn"),
        Some("Willows"),
    ));

    store.insert_program(IncentiveProgram {
        program_id: "ca-rebate".to_string(),
        program_name: "California Reuse Rebate".to_string(),
        status: "active".to_string(),
        amount_min: Some(500.0),
        amount_max: Some(10_000.0),
        water_type: None,
        coverage: vec![
            CoverageLink {
                jurisdiction_id: JurisdictionId::from_raw("CA_STATE"),
                coverage_type: CoverageType::StateWide,
            },
            CoverageLink {
                jurisdiction_id: JurisdictionId::from_raw("CA_CITY_WILLOWS"),
                coverage_type: CoverageType::CitySpecific,
            },
        ],
    });

    store.insert_regulation(WaterTypeRegulation {
        jurisdiction_id: JurisdictionId::from_raw("CA_CITY_WILLOWS"),
        water_type: WaterType::Greywater,
        permit_threshold_gpd: Some(250.0),
        approved_uses: vec!["Subsurface irrigation".to_string()],
        key_restrictions: vec![],
        summary: None,
    });

    let overrides = ServiceAreaOverrides::new(vec![ServiceAreaOverride {
        service_area_id: JurisdictionId::from_raw("MWD_SERVICE_AREA"),
        home_state: StateCode::CA,
    }]);

    let state = AppState {
        engine: IncentiveEngine::new(Arc::new(store), overrides),
    };
    atlas_api::router(Arc::new(state))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

#[tokio::test]
async fn health_returns_ok() {
    let (status, body) = get(test_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn city_page_returns_resolved_view() {
    let (status, body) = get(
        test_app(),
        "/api/jurisdictions/california/glenn/willows",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jurisdiction"]["id"], "CA_CITY_WILLOWS");
    assert_eq!(body["ancestors"].as_array().unwrap().len(), 2);
    // All sections present and available.
    assert!(body["rollup"]["available"].is_object());
    assert!(body["incentives"]["available"].is_object());
    assert!(body["regulations"]["available"].is_object());
}

#[tokio::test]
async fn stale_slugs_render_not_found() {
    let (status, _) = get(test_app(), "/api/jurisdictions/atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(test_app(), "/api/jurisdictions/california/tulare").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_ancestor_renders_not_found_not_parent_fallback() {
    // Glenn is California's county; under New York it must 404.
    let (status, _) = get(test_app(), "/api/jurisdictions/new-york/glenn").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incentive_match_annotates_narrowest_coverage() {
    let (status, body) = get(test_app(), "/api/incentives/CA_CITY_WILLOWS").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["programs"][0]["program_id"], "ca-rebate");
    assert_eq!(
        body["programs"][0]["matched_coverage_type"],
        "CITY_SPECIFIC"
    );
}

#[tokio::test]
async fn unknown_jurisdiction_id_is_not_found() {
    let (status, _) = get(test_app(), "/api/incentives/CA_CITY_NOWHERE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_water_type_query_is_a_bad_request() {
    let (status, _) = get(
        test_app(),
        "/api/incentives/CA_CITY_WILLOWS?water_type=seawater",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn regulations_default_to_all_with_explicit_markers() {
    let (status, body) = get(test_app(), "/api/regulations/CA_CITY_WILLOWS").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["by_water_type"]["GREYWATER"]["on_file"].is_object());
    assert_eq!(body["by_water_type"]["RAINWATER"], "not_on_file");
}

#[tokio::test]
async fn regulations_accept_a_single_type_filter() {
    let (status, body) = get(
        test_app(),
        "/api/regulations/CA_CITY_WILLOWS?water_type=rainwater",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let map = body["by_water_type"].as_object().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map["RAINWATER"], "not_on_file");
}
