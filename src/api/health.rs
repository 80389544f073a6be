use std::collections::BTreeMap;

use actix_web::{HttpResponse, Responder, get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::jobs::JobTracker;

const SERVICE_NAME: &str = "Job Tracker API";

/// Status probe response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub companies: usize,
    pub endpoints: BTreeMap<String, String>,
}

/// Liveness response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub jobs_seen: usize,
}

fn status_response(tracker: &JobTracker) -> StatusResponse {
    let endpoints = [
        ("/", "API status"),
        ("/api/status", "API status"),
        ("/check", "Check for new jobs (?include_all=true adds all_jobs)"),
        ("/stats", "Seen-set statistics"),
        ("/health", "Liveness probe"),
    ]
    .into_iter()
    .map(|(path, description)| (path.to_string(), description.to_string()))
    .collect();

    StatusResponse {
        status: "online".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        companies: tracker.registry().len(),
        endpoints,
    }
}

/// API status
///
/// Served on both `/` and `/api/status` for the browser client.
#[get("/")]
async fn root(tracker: web::Data<JobTracker>) -> impl Responder {
    HttpResponse::Ok().json(status_response(&tracker))
}

#[get("/api/status")]
async fn api_status(tracker: web::Data<JobTracker>) -> impl Responder {
    HttpResponse::Ok().json(status_response(&tracker))
}

/// Liveness check endpoint
///
/// Does not touch upstream boards. Use for uptime monitors.
#[get("/health")]
async fn health_check(tracker: web::Data<JobTracker>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        jobs_seen: tracker.stats().await.total_jobs_seen,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(root)
        .service(api_status)
        .service(health_check);
}
