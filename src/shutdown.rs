use actix_web::{dev::ServerHandle, web::Data};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::api::jobs::JobTracker;

/// Handles graceful shutdown of the application
///
/// 1. Listens for shutdown signals (SIGTERM, SIGINT/CTRL+C)
/// 2. Stops the HTTP server, letting an in-flight check finish and persist
/// 3. Waits for the server task
/// 4. Logs the final seen-set size
pub struct ShutdownCoordinator {
    server_handle: ServerHandle,
    server_task: JoinHandle<Result<(), std::io::Error>>,
    tracker: Data<JobTracker>,
}

impl ShutdownCoordinator {
    pub fn new(
        server_handle: ServerHandle,
        server_task: JoinHandle<Result<(), std::io::Error>>,
        tracker: Data<JobTracker>,
    ) -> Self {
        Self {
            server_handle,
            server_task,
            tracker,
        }
    }

    /// Block until CTRL+C or SIGTERM (Unix only), then shut down.
    ///
    /// If the server exits on its own first, its result is returned as is.
    pub async fn wait_for_shutdown(mut self) -> Result<(), std::io::Error> {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to install CTRL+C signal handler: {:?}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    error!("Failed to install SIGTERM signal handler: {:?}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received CTRL+C signal, initiating graceful shutdown...");
            }
            _ = terminate => {
                info!("Received SIGTERM signal, initiating graceful shutdown...");
            }
            result = &mut self.server_task => {
                return match result {
                    Ok(result) => result,
                    Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e)),
                };
            }
        }

        self.shutdown().await
    }

    async fn shutdown(self) -> Result<(), std::io::Error> {
        info!("Stopping HTTP server (no longer accepting new requests)...");
        self.server_handle.stop(true).await;

        info!("Waiting for HTTP server to fully shut down...");
        match self.server_task.await {
            Ok(Ok(_)) => info!("HTTP server shut down successfully"),
            Ok(Err(e)) => error!("HTTP server encountered error during shutdown: {:?}", e),
            Err(e) => error!("HTTP server task panicked: {:?}", e),
        }

        let stats = self.tracker.stats().await;
        info!(
            "Seen-set holds {} job ids in {}",
            stats.total_jobs_seen, stats.storage_file
        );

        info!("Graceful shutdown completed successfully");
        Ok(())
    }
}
