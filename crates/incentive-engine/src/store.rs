//! The query interface over the external reference data.
//!
//! The engine never builds queries itself; it goes through this handful of
//! typed reads so the matching and aggregation logic can run against an
//! in-memory store in tests. Any relational or warehouse backend that can
//! answer these six questions is an acceptable implementation.

use std::future::Future;
use std::time::Duration;

use jurisdiction_core::{JurisdictionId, Level, StateCode};
use thiserror::Error;

use crate::model::{IncentiveProgram, JurisdictionRecord, WaterType, WaterTypeRegulation};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("query backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait::async_trait]
pub trait RegistryStore: Send + Sync {
    /// Jurisdiction by canonical id.
    async fn jurisdiction_by_id(
        &self,
        id: &JurisdictionId,
    ) -> Result<Option<JurisdictionRecord>, StoreError>;

    /// Every jurisdiction whose state code matches.
    async fn jurisdictions_by_state(
        &self,
        state: StateCode,
    ) -> Result<Vec<JurisdictionRecord>, StoreError>;

    /// Every jurisdiction at one hierarchy level, across all states.
    /// Used to tell "wrong ancestor" apart from "does not exist."
    async fn jurisdictions_at_level(
        &self,
        level: Level,
    ) -> Result<Vec<JurisdictionRecord>, StoreError>;

    /// Programs having at least one coverage link into the id set, with
    /// all of their links. Status filtering is engine logic, not a query.
    async fn programs_covering(
        &self,
        ids: &[JurisdictionId],
    ) -> Result<Vec<IncentiveProgram>, StoreError>;

    /// Regulation rows for one jurisdiction, optionally narrowed to a
    /// water type.
    async fn regulations_for(
        &self,
        id: &JurisdictionId,
        water_type: Option<WaterType>,
    ) -> Result<Vec<WaterTypeRegulation>, StoreError>;

    /// Ids in the state referenced by at least one coverage link or
    /// regulation row. Feeds the directory rollup counts.
    async fn jurisdictions_with_data(
        &self,
        state: StateCode,
    ) -> Result<Vec<JurisdictionId>, StoreError>;
}

const RETRY_BACKOFF: Duration = Duration::from_millis(150);

/// Retry a store call once with backoff. Every engine read goes through
/// here; a second failure propagates to the caller, which decides whether
/// the whole operation or just one response section degrades.
pub(crate) async fn with_retry<T, F, Fut>(op: F) -> Result<T, StoreError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(first) => {
            tracing::warn!(error = %first, "store query failed, retrying once");
            tokio::time::sleep(RETRY_BACKOFF).await;
            op().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_recovers_from_single_failure() {
        let calls = AtomicU32::new(0);
        let result = with_retry(|| {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(StoreError::Unavailable("first attempt".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_second_failure() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(StoreError::Unavailable("down".to_string())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
