use std::sync::Arc;
use std::time::Duration;

use actix_web::{HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use thiserror::Error;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::boards::{BoardClient, BoardError};
use crate::dedup::{classify, collapse_duplicates};
use crate::jobs::JobRecord;
use crate::registry::{CompanyConfig, CompanyRegistry};
use crate::store::{SeenStore, StoreError};
use super::dto::{CheckReport, CheckSummary, ErrorResponse, SeenStats};

/// Service-level errors. Board failures never show up here; only a broken
/// seen-set fails a check.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("seen-set unavailable: {0}")]
    Store(#[from] StoreError),
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        error!("Request failed: {}", self);
        HttpResponse::InternalServerError().json(ErrorResponse::new(self.to_string()))
    }
}

/// Runs check cycles: fetch every registered company, classify against the
/// seen-set, persist the new ids.
pub struct JobTracker {
    registry: CompanyRegistry,
    boards: Arc<dyn BoardClient>,
    store: Mutex<Box<dyn SeenStore>>,
    fetch_limit: Semaphore,
    fetch_timeout: Duration,
}

impl JobTracker {
    /// Create a new JobTracker instance
    pub fn new(
        registry: CompanyRegistry,
        boards: Arc<dyn BoardClient>,
        store: Box<dyn SeenStore>,
        max_concurrent_fetches: usize,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            boards,
            store: Mutex::new(store),
            fetch_limit: Semaphore::new(max_concurrent_fetches.max(1)),
            fetch_timeout,
        }
    }

    pub fn registry(&self) -> &CompanyRegistry {
        &self.registry
    }

    /// Run one check cycle
    ///
    /// # Business Logic
    /// - Fetches every company concurrently, bounded by the fetch semaphore
    /// - Skips (and logs) companies whose board call fails or times out
    /// - Collapses duplicate ids, keeping registry order
    /// - Classifies against the seen-set and persists new ids before returning
    ///
    /// # Returns
    /// - `Ok(CheckReport)` - Check completed, possibly with failed companies
    /// - `Err(ServiceError)` - The seen-set could not be written
    pub async fn run_check(&self) -> Result<CheckReport, ServiceError> {
        let fetched_at = Utc::now();
        info!("Service: Starting job check across {} companies", self.registry.len());

        let outcomes = join_all(
            self.registry
                .iter()
                .map(|company| self.fetch_company(company, fetched_at)),
        )
        .await;

        let mut batch = Vec::new();
        let mut companies_checked = 0;
        let mut companies_failed = Vec::new();

        for (company, outcome) in self.registry.iter().zip(outcomes) {
            match outcome {
                Ok(jobs) => {
                    companies_checked += 1;
                    batch.extend(jobs);
                }
                Err(e) => {
                    error!("Error fetching {} jobs for {}: {}", company.board, company.name, e);
                    companies_failed.push(company.name.clone());
                }
            }
        }

        let all_jobs = collapse_duplicates(batch);
        info!("Service: Total jobs fetched: {}", all_jobs.len());

        let classification = {
            let mut store = self.store.lock().await;
            classify(all_jobs.clone(), &mut **store)?
        };

        if !companies_failed.is_empty() {
            warn!(
                "Service: Check completed with {} failed companies: {}",
                companies_failed.len(),
                companies_failed.join(", ")
            );
        }
        info!(
            "Service: Check complete: {} new jobs found out of {} total",
            classification.new.len(),
            all_jobs.len()
        );

        Ok(CheckReport {
            timestamp: fetched_at,
            summary: CheckSummary {
                total_jobs_fetched: all_jobs.len(),
                new_jobs_found: classification.new.len(),
                companies_checked,
                companies_failed,
            },
            new_jobs: classification.new,
            all_jobs,
        })
    }

    /// Current seen-set size and location
    pub async fn stats(&self) -> SeenStats {
        let store = self.store.lock().await;
        SeenStats {
            total_jobs_seen: store.len(),
            storage_file: store.location(),
        }
    }

    async fn fetch_company(
        &self,
        company: &CompanyConfig,
        fetched_at: DateTime<Utc>,
    ) -> Result<Vec<JobRecord>, BoardError> {
        // The semaphore is never closed, so acquire only fails if it were
        let _permit = self.fetch_limit.acquire().await.ok();

        match timeout(self.fetch_timeout, self.boards.fetch(company, fetched_at)).await {
            Ok(result) => result,
            Err(_) => Err(BoardError::Timeout(self.fetch_timeout)),
        }
    }
}
