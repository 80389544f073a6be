use actix_web::{
    HttpResponse, get,
    web::{Data, Query, ServiceConfig},
};
use chrono::Utc;
use tracing::info;

use super::dto::{CheckQuery, CheckResponse, StatsResponse};
use super::service::{JobTracker, ServiceError};

/// Run one check cycle and report what was new
#[get("/check")]
async fn check_jobs(
    tracker: Data<JobTracker>,
    query: Query<CheckQuery>,
) -> Result<HttpResponse, ServiceError> {
    info!("Starting job check...");
    let report = tracker.run_check().await?;
    Ok(HttpResponse::Ok().json(CheckResponse::from_report(report, query.include_all)))
}

/// Seen-set statistics
#[get("/stats")]
async fn get_stats(tracker: Data<JobTracker>) -> HttpResponse {
    HttpResponse::Ok().json(StatsResponse {
        status: "success".to_string(),
        timestamp: Utc::now(),
        stats: tracker.stats().await,
    })
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(check_jobs).service(get_stats);
}
