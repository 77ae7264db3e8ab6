//! SQLite-backed implementation of the engine's query interface.
//!
//! The reference tables mirror the logical record sets the engine reads:
//! jurisdictions, incentive programs with coverage links, per-water-type
//! regulations, and the service-area override table. List-valued columns
//! are stored as JSON text.

use std::collections::BTreeSet;

use incentive_engine::model::{
    CoverageLink, CoverageType, IncentiveProgram, JurisdictionRecord, WaterType,
    WaterTypeRegulation,
};
use incentive_engine::overrides::{ServiceAreaOverride, ServiceAreaOverrides};
use incentive_engine::store::{RegistryStore, StoreError};
use jurisdiction_core::{JurisdictionId, LegalStatus, Level, StateCode};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
        tracing::info!("Running reference table migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jurisdictions (
                id TEXT PRIMARY KEY,
                level TEXT NOT NULL,
                state_code TEXT NOT NULL,
                state_name TEXT NOT NULL,
                county_name TEXT,
                city_name TEXT,
                legal_code TEXT,
                governing_code TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_jurisdictions_state
                ON jurisdictions(state_code)
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS incentive_programs (
                program_id TEXT PRIMARY KEY,
                program_name TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                amount_min REAL,
                amount_max REAL,
                water_type TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS coverage_links (
                program_id TEXT NOT NULL,
                jurisdiction_id TEXT NOT NULL,
                coverage_type TEXT NOT NULL,
                PRIMARY KEY (program_id, jurisdiction_id, coverage_type)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_coverage_jurisdiction
                ON coverage_links(jurisdiction_id)
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS water_type_regulations (
                jurisdiction_id TEXT NOT NULL,
                water_type TEXT NOT NULL,
                permit_threshold_gpd REAL,
                approved_uses_json TEXT NOT NULL DEFAULT '[]',
                key_restrictions_json TEXT NOT NULL DEFAULT '[]',
                summary TEXT,
                PRIMARY KEY (jurisdiction_id, water_type)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS service_area_overrides (
                service_area_id TEXT PRIMARY KEY,
                home_state_code TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Service-area overrides are loaded once at startup; they are
    /// configuration, not per-request data.
    pub async fn load_overrides(pool: &SqlitePool) -> anyhow::Result<ServiceAreaOverrides> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT service_area_id, home_state_code FROM service_area_overrides")
                .fetch_all(pool)
                .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for (service_area_id, home_state_code) in rows {
            let Some(home_state) = StateCode::from_code(&home_state_code) else {
                tracing::warn!(
                    service_area_id,
                    home_state_code,
                    "skipping override with unrecognized home state"
                );
                continue;
            };
            entries.push(ServiceAreaOverride {
                service_area_id: JurisdictionId::from_raw(service_area_id),
                home_state,
            });
        }
        Ok(ServiceAreaOverrides::new(entries))
    }

    async fn load_program(&self, program_id: &str) -> Result<Option<IncentiveProgram>, StoreError> {
        let row: Option<ProgramRow> = sqlx::query_as(
            r#"
            SELECT program_id, program_name, status, amount_min, amount_max, water_type
            FROM incentive_programs
            WHERE program_id = ?
            "#,
        )
        .bind(program_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let links: Vec<LinkRow> = sqlx::query_as(
            r#"
            SELECT jurisdiction_id, coverage_type
            FROM coverage_links
            WHERE program_id = ?
            "#,
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        let coverage = links
            .into_iter()
            .filter_map(|link| {
                let Some(coverage_type) = CoverageType::parse(&link.coverage_type) else {
                    tracing::warn!(
                        program_id,
                        coverage_type = link.coverage_type,
                        "skipping coverage link with unrecognized type"
                    );
                    return None;
                };
                Some(CoverageLink {
                    jurisdiction_id: JurisdictionId::from_raw(link.jurisdiction_id),
                    coverage_type,
                })
            })
            .collect();

        Ok(Some(IncentiveProgram {
            program_id: row.program_id,
            program_name: row.program_name,
            status: row.status,
            amount_min: row.amount_min,
            amount_max: row.amount_max,
            water_type: row.water_type.as_deref().and_then(WaterType::parse),
            coverage,
        }))
    }
}

#[derive(Debug, Clone, FromRow)]
struct JurisdictionRow {
    id: String,
    level: String,
    state_code: String,
    state_name: String,
    county_name: Option<String>,
    city_name: Option<String>,
    legal_code: Option<String>,
    governing_code: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct ProgramRow {
    program_id: String,
    program_name: String,
    status: String,
    amount_min: Option<f64>,
    amount_max: Option<f64>,
    water_type: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct LinkRow {
    jurisdiction_id: String,
    coverage_type: String,
}

#[derive(Debug, Clone, FromRow)]
struct RegulationRow {
    jurisdiction_id: String,
    water_type: String,
    permit_threshold_gpd: Option<f64>,
    approved_uses_json: String,
    key_restrictions_json: String,
    summary: Option<String>,
}

const JURISDICTION_COLUMNS: &str = r#"
    id, level, state_code, state_name, county_name, city_name,
    legal_code, governing_code
"#;

fn to_record(row: JurisdictionRow) -> Option<JurisdictionRecord> {
    let Some(level) = Level::parse(&row.level) else {
        tracing::warn!(id = row.id, level = row.level, "skipping row with bad level");
        return None;
    };
    let Some(state_code) = StateCode::from_code(&row.state_code) else {
        tracing::warn!(
            id = row.id,
            state_code = row.state_code,
            "skipping row with bad state code"
        );
        return None;
    };
    Some(JurisdictionRecord {
        id: JurisdictionId::from_raw(row.id),
        level,
        state_code,
        state_name: row.state_name,
        county_name: row.county_name,
        city_name: row.city_name,
        legal_status: LegalStatus::from_code(row.legal_code.as_deref()),
        governing_code: row.governing_code,
    })
}

fn to_regulation(row: RegulationRow) -> Option<WaterTypeRegulation> {
    let Some(water_type) = WaterType::parse(&row.water_type) else {
        tracing::warn!(
            jurisdiction_id = row.jurisdiction_id,
            water_type = row.water_type,
            "skipping regulation row with unrecognized water type"
        );
        return None;
    };
    Some(WaterTypeRegulation {
        jurisdiction_id: JurisdictionId::from_raw(row.jurisdiction_id),
        water_type,
        permit_threshold_gpd: row.permit_threshold_gpd,
        approved_uses: serde_json::from_str(&row.approved_uses_json).unwrap_or_default(),
        key_restrictions: serde_json::from_str(&row.key_restrictions_json).unwrap_or_default(),
        summary: row.summary,
    })
}

fn store_err(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[async_trait::async_trait]
impl RegistryStore for SqliteStore {
    async fn jurisdiction_by_id(
        &self,
        id: &JurisdictionId,
    ) -> Result<Option<JurisdictionRecord>, StoreError> {
        let row: Option<JurisdictionRow> = sqlx::query_as(&format!(
            "SELECT {JURISDICTION_COLUMNS} FROM jurisdictions WHERE id = ?"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(row.and_then(to_record))
    }

    async fn jurisdictions_by_state(
        &self,
        state: StateCode,
    ) -> Result<Vec<JurisdictionRecord>, StoreError> {
        let rows: Vec<JurisdictionRow> = sqlx::query_as(&format!(
            "SELECT {JURISDICTION_COLUMNS} FROM jurisdictions WHERE state_code = ?"
        ))
        .bind(state.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(rows.into_iter().filter_map(to_record).collect())
    }

    async fn jurisdictions_at_level(
        &self,
        level: Level,
    ) -> Result<Vec<JurisdictionRecord>, StoreError> {
        let rows: Vec<JurisdictionRow> = sqlx::query_as(&format!(
            "SELECT {JURISDICTION_COLUMNS} FROM jurisdictions WHERE level = ?"
        ))
        .bind(level.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(rows.into_iter().filter_map(to_record).collect())
    }

    async fn programs_covering(
        &self,
        ids: &[JurisdictionId],
    ) -> Result<Vec<IncentiveProgram>, StoreError> {
        // The candidate set is small (state, county, city, plus a few
        // service areas), so one indexed lookup per id is fine.
        let mut program_ids: BTreeSet<String> = BTreeSet::new();
        for id in ids {
            let found: Vec<String> = sqlx::query_scalar(
                "SELECT DISTINCT program_id FROM coverage_links WHERE jurisdiction_id = ?",
            )
            .bind(id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
            program_ids.extend(found);
        }

        let mut programs = Vec::with_capacity(program_ids.len());
        for program_id in &program_ids {
            if let Some(program) = self.load_program(program_id).await? {
                programs.push(program);
            }
        }
        Ok(programs)
    }

    async fn regulations_for(
        &self,
        id: &JurisdictionId,
        water_type: Option<WaterType>,
    ) -> Result<Vec<WaterTypeRegulation>, StoreError> {
        let rows: Vec<RegulationRow> = match water_type {
            Some(water_type) => sqlx::query_as(
                r#"
                SELECT jurisdiction_id, water_type, permit_threshold_gpd,
                       approved_uses_json, key_restrictions_json, summary
                FROM water_type_regulations
                WHERE jurisdiction_id = ? AND water_type = ?
                "#,
            )
            .bind(id.as_str())
            .bind(water_type.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?,
            None => sqlx::query_as(
                r#"
                SELECT jurisdiction_id, water_type, permit_threshold_gpd,
                       approved_uses_json, key_restrictions_json, summary
                FROM water_type_regulations
                WHERE jurisdiction_id = ?
                "#,
            )
            .bind(id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?,
        };
        Ok(rows.into_iter().filter_map(to_regulation).collect())
    }

    async fn jurisdictions_with_data(
        &self,
        state: StateCode,
    ) -> Result<Vec<JurisdictionId>, StoreError> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT j.id FROM jurisdictions j
            JOIN coverage_links c ON c.jurisdiction_id = j.id
            WHERE j.state_code = ?
            UNION
            SELECT DISTINCT j.id FROM jurisdictions j
            JOIN water_type_regulations r ON r.jurisdiction_id = j.id
            WHERE j.state_code = ?
            "#,
        )
        .bind(state.as_str())
        .bind(state.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(ids.into_iter().map(JurisdictionId::from_raw).collect())
    }
}
