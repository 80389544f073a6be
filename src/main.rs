use actix_web::{App, HttpServer, middleware::Logger, web};
use clap::Parser;
use tracing::info;

use job_tracker::{
    api,
    cli::{self, Cli, Command},
    config::Config,
    error::AppError,
    logging,
    shutdown::ShutdownCoordinator,
};

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = Config::from_env()?;

    logging::init(&config.log_dir)?;

    // Registry validation happens here, before any upstream call
    let tracker = job_tracker::build_tracker(&config)?;

    let command = cli.command();
    if command != Command::Serve {
        return cli::run(&command, &tracker, &mut std::io::stdout()).await;
    }

    info!("Starting job-tracker application");
    info!("Configuration loaded successfully:");
    info!("  - Companies: {}", tracker.registry().len());
    info!("  - Seen-set file: {}", config.seen_store_path.display());
    info!("  - Fetch timeout: {:?}", config.fetch_timeout);
    info!("  - Max concurrent fetches: {}", config.max_concurrent_fetches);

    let tracker = web::Data::new(tracker);
    let server_tracker = tracker.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(server_tracker.clone())
            .configure(api::routes)
    });

    info!("Server starting on http://{}:{}", config.host, config.port);

    // Bind and start the server
    let server = server
        .bind((config.host.as_str(), config.port))?
        .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn server in background
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, tracker);

    coordinator.wait_for_shutdown().await?;
    Ok(())
}
