//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Implementación del protocolo HTTP/1.0 sin librerías de alto nivel:
//!
//! - Parsing de requests (request line, headers, body JSON)
//! - Construcción de responses
//! - Códigos de estado
//!
//! HTTP/1.0 (RFC 1945) no requiere `Host`, no tiene chunked encoding y
//! cierra la conexión después de cada respuesta.

pub mod request;
pub mod response;
pub mod status;

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
