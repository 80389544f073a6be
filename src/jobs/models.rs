use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::{BoardType, CompanyConfig};
use super::region::categorize_location;

/// Normalized job posting, identical in shape for every board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// `{prefix}_{board_id}_{upstream_id}`, stable across fetches
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Coarse region derived from `location`
    pub region: String,
    pub source: BoardType,
    pub url: String,
    /// Start of the check cycle that produced this record
    pub fetched_at: DateTime<Utc>,
}

impl JobRecord {
    /// Build a record for `company`, deriving the id and region.
    pub fn new(
        company: &CompanyConfig,
        upstream_id: &str,
        title: String,
        location: String,
        url: String,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: job_id(company, upstream_id),
            title,
            company: company.name.clone(),
            region: categorize_location(&location).to_string(),
            location,
            source: company.board,
            url,
            fetched_at,
        }
    }
}

/// Deterministic id for a posting: the same upstream posting always maps to the same id.
pub fn job_id(company: &CompanyConfig, upstream_id: &str) -> String {
    format!(
        "{}_{}_{}",
        company.board.id_prefix(),
        company.board_id,
        upstream_id.trim()
    )
}
