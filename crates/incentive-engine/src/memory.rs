//! In-memory implementation of the query interface.
//!
//! Backs the engine's test suites and any environment without a live
//! reference backend. Failure injection lets degraded-mode and retry
//! behavior be exercised deterministically.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};

use jurisdiction_core::{JurisdictionId, Level, StateCode};

use crate::model::{IncentiveProgram, JurisdictionRecord, WaterType, WaterTypeRegulation};
use crate::store::{RegistryStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    jurisdictions: HashMap<String, JurisdictionRecord>,
    programs: Vec<IncentiveProgram>,
    regulations: Vec<WaterTypeRegulation>,
    fail_next: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_jurisdiction(&mut self, record: JurisdictionRecord) {
        self.jurisdictions
            .insert(record.id.as_str().to_string(), record);
    }

    pub fn insert_program(&mut self, program: IncentiveProgram) {
        self.programs.push(program);
    }

    pub fn insert_regulation(&mut self, regulation: WaterTypeRegulation) {
        self.regulations.push(regulation);
    }

    /// Make the next `n` queries fail with `StoreError::Unavailable`.
    pub fn fail_next_queries(&self, n: u32) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        let remaining = self.fail_next.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_next.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RegistryStore for MemoryStore {
    async fn jurisdiction_by_id(
        &self,
        id: &JurisdictionId,
    ) -> Result<Option<JurisdictionRecord>, StoreError> {
        self.check_available()?;
        Ok(self.jurisdictions.get(id.as_str()).cloned())
    }

    async fn jurisdictions_by_state(
        &self,
        state: StateCode,
    ) -> Result<Vec<JurisdictionRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .jurisdictions
            .values()
            .filter(|r| r.state_code == state)
            .cloned()
            .collect())
    }

    async fn jurisdictions_at_level(
        &self,
        level: Level,
    ) -> Result<Vec<JurisdictionRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .jurisdictions
            .values()
            .filter(|r| r.level == level)
            .cloned()
            .collect())
    }

    async fn programs_covering(
        &self,
        ids: &[JurisdictionId],
    ) -> Result<Vec<IncentiveProgram>, StoreError> {
        self.check_available()?;
        let wanted: HashSet<&str> = ids.iter().map(JurisdictionId::as_str).collect();
        Ok(self
            .programs
            .iter()
            .filter(|p| {
                p.coverage
                    .iter()
                    .any(|link| wanted.contains(link.jurisdiction_id.as_str()))
            })
            .cloned()
            .collect())
    }

    async fn regulations_for(
        &self,
        id: &JurisdictionId,
        water_type: Option<WaterType>,
    ) -> Result<Vec<WaterTypeRegulation>, StoreError> {
        self.check_available()?;
        Ok(self
            .regulations
            .iter()
            .filter(|r| r.jurisdiction_id == *id)
            .filter(|r| water_type.map_or(true, |wt| r.water_type == wt))
            .cloned()
            .collect())
    }

    async fn jurisdictions_with_data(
        &self,
        state: StateCode,
    ) -> Result<Vec<JurisdictionId>, StoreError> {
        self.check_available()?;
        let mut referenced: HashSet<&str> = HashSet::new();
        for program in &self.programs {
            for link in &program.coverage {
                referenced.insert(link.jurisdiction_id.as_str());
            }
        }
        for regulation in &self.regulations {
            referenced.insert(regulation.jurisdiction_id.as_str());
        }
        Ok(referenced
            .into_iter()
            .filter(|id| {
                self.jurisdictions
                    .get(*id)
                    .is_some_and(|r| r.state_code == state)
            })
            .map(JurisdictionId::from_raw)
            .collect())
    }
}
