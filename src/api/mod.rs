pub mod health;
pub mod jobs;
pub mod validation;

use actix_web::web;

/// Register every route of the HTTP surface
pub fn routes(config: &mut web::ServiceConfig) {
    config
        .app_data(validation::query_config())
        .configure(health::health_config)
        .configure(jobs::handlers::job_config);
}
