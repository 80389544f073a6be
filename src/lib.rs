//! Polls Greenhouse and Lever job boards, remembers which postings have
//! already been reported, and serves the new ones over HTTP.

pub mod api;
pub mod boards;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod jobs;
pub mod logging;
pub mod registry;
pub mod shutdown;
pub mod store;

use std::sync::Arc;

use crate::api::jobs::JobTracker;
use crate::boards::HttpBoardClient;
use crate::config::Config;
use crate::error::AppError;
use crate::registry::CompanyRegistry;
use crate::store::FileSeenStore;

/// Wire a [`JobTracker`] from configuration: validated registry, HTTP board
/// client and the file-backed seen-set.
pub fn build_tracker(config: &Config) -> Result<JobTracker, AppError> {
    let registry = CompanyRegistry::load(config.companies_file.as_deref())?;
    let boards = HttpBoardClient::new(config.boards.clone(), config.fetch_timeout)?;
    let store = FileSeenStore::load(&config.seen_store_path)?;

    Ok(JobTracker::new(
        registry,
        Arc::new(boards),
        Box::new(store),
        config.max_concurrent_fetches,
        config.fetch_timeout,
    ))
}
