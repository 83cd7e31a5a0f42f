//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI con fallback a variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./student_records --port 3000 --log-level debug --allow-hard-delete
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=3000 HTTP_HOST=0.0.0.0 ./student_records
//! ```

use clap::Parser;
use thiserror::Error;

/// Tamaño mínimo aceptable para `max_request_bytes`
pub const MIN_REQUEST_BYTES: usize = 1024;

/// Errores de validación de la configuración
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max request bytes must be >= {min} (got {0})", min = MIN_REQUEST_BYTES)]
    RequestLimitTooSmall(usize),

    #[error("read timeout must be > 0")]
    ZeroReadTimeout,
}

/// Configuración del servidor de estudiantes
#[derive(Debug, Clone, Parser)]
#[command(name = "student_records")]
#[command(about = "Servicio HTTP/1.0 de registro de estudiantes y notas")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Tamaño máximo de un request (headers + body) en bytes
    #[arg(long = "max-request-bytes", default_value = "65536", env = "MAX_REQUEST_BYTES")]
    pub max_request_bytes: usize,

    /// Timeout de lectura del socket en milisegundos
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Nivel de log cuando RUST_LOG no está definido
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    /// Permite `DELETE /students/{code}?purge=true`
    #[arg(long = "allow-hard-delete", env = "ALLOW_HARD_DELETE")]
    pub allow_hard_delete: bool,
}

impl Config {
    /// Parsea argumentos CLI (y variables de entorno)
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use student_records::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_request_bytes < MIN_REQUEST_BYTES {
            return Err(ConfigError::RequestLimitTooSmall(self.max_request_bytes));
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::ZeroReadTimeout);
        }
        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            max_request_bytes = self.max_request_bytes,
            read_timeout_ms = self.read_timeout_ms,
            allow_hard_delete = self.allow_hard_delete,
            "configuración cargada"
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            max_request_bytes: 65_536,
            read_timeout_ms: 5_000,
            log_level: "info".to_string(),
            allow_hard_delete: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.max_request_bytes, 65_536);
        assert!(!config.allow_hard_delete);
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_request_limit() {
        let mut config = Config::default();
        config.max_request_bytes = 100;
        assert_eq!(config.validate(), Err(ConfigError::RequestLimitTooSmall(100)));

        config.max_request_bytes = MIN_REQUEST_BYTES;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_read_timeout() {
        let mut config = Config::default();
        config.read_timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroReadTimeout));
    }

    #[test]
    fn test_parse_cli_args() {
        let config = Config::try_parse_from([
            "student_records",
            "--port",
            "3000",
            "--host",
            "0.0.0.0",
            "--allow-hard-delete",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.allow_hard_delete);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_parse_rejects_invalid_port() {
        assert!(Config::try_parse_from(["student_records", "--port", "abc"]).is_err());
    }
}
