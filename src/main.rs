use actix_web::{App, HttpServer, middleware::NormalizePath, web};
use std::io;
use tracing::info;
mod api;
use crate::api::{
    cors::cors,
    errors,
    health::health_config,
    job::{JobService, handlers::job_config},
};
mod config;
mod shutdown;
mod store;
mod telemetry;
mod worker;
#[cfg(test)]
mod test_support;
use crate::shutdown::ShutdownCoordinator;
use crate::store::JobRepository;
use crate::worker::store_writer;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load configuration from arguments, environment and .env
    let config = config::Config::load()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let jobs_file = config
        .jobs_file_path()
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;

    telemetry::init(&config.log_dir)?;

    info!("Starting job-board application");
    info!("Configuration loaded successfully:");
    info!("  - Jobs file: {}", jobs_file.display());
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Write queue capacity: {}", config.write_queue_capacity);
    info!("  - CORS origins: {}", config.cors_origins.join(", "));

    let repository = JobRepository::new(jobs_file);
    repository
        .ensure_exists()
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;

    // Create shutdown channel for graceful shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    // Single writer owns every mutation of the store file
    let (writer, store_handle) =
        store_writer::channel(repository.clone(), config.write_queue_capacity);
    let writer_handle = tokio::spawn(writer.run(shutdown_rx));

    let job_service = web::Data::new(JobService::new(repository, store_handle));
    let max_payload_size = config.max_payload_size;
    let cors_origins = config.cors_origins.clone();

    let server = HttpServer::new(move || {
        // Configure payload size limits globally
        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .wrap(NormalizePath::trim())
            .wrap(cors(&cors_origins))
            .app_data(job_service.clone())
            .app_data(payload_config)
            .app_data(errors::json_config(max_payload_size))
            .configure(health_config)
            .configure(job_config)
    });

    info!("Server starting on http://{}:{}", config.host, config.port);

    // Bind and start the server
    let server = server
        .bind((config.host.as_str(), config.port))?
        .disable_signals()
        .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn server in background
    let server_task = tokio::spawn(server);

    let coordinator =
        ShutdownCoordinator::new(server_handle, server_task, writer_handle, shutdown_tx);

    coordinator.wait_for_shutdown().await
}
