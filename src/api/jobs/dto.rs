use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::jobs::JobRecord;

/// Aggregate counts for one check cycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckSummary {
    pub total_jobs_fetched: usize,
    pub new_jobs_found: usize,
    /// Companies whose board answered successfully
    pub companies_checked: usize,
    /// Companies skipped this cycle because their board call failed
    pub companies_failed: Vec<String>,
}

/// Everything one check cycle produced. Not persisted.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub timestamp: DateTime<Utc>,
    pub summary: CheckSummary,
    pub new_jobs: Vec<JobRecord>,
    pub all_jobs: Vec<JobRecord>,
}

/// Response for `/check`
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub summary: CheckSummary,
    pub new_jobs: Vec<JobRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_jobs: Option<Vec<JobRecord>>,
}

impl CheckResponse {
    pub fn from_report(report: CheckReport, include_all: bool) -> Self {
        Self {
            status: "success".to_string(),
            timestamp: report.timestamp,
            summary: report.summary,
            new_jobs: report.new_jobs,
            all_jobs: include_all.then_some(report.all_jobs),
        }
    }
}

/// Query string for `/check`
#[derive(Debug, Default, Deserialize)]
pub struct CheckQuery {
    #[serde(default)]
    pub include_all: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenStats {
    pub total_jobs_seen: usize,
    pub storage_file: String,
}

/// Response for `/stats`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub stats: SeenStats,
}

/// Body of every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
