//! # Student Records - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, inicializa el logging y arranca el servidor.

use student_records::config::Config;
use student_records::server::Server;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::new();

    // RUST_LOG tiene prioridad sobre --log-level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "configuración inválida");
        std::process::exit(2);
    }
    config.log_summary();

    let server = match Server::bind(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(address = %config.address(), error = %e, "no se pudo hacer bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!(error = %e, "error fatal");
        std::process::exit(1);
    }
}
