//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones (un thread por conexión)
//! 3. Lee y parsea requests HTTP, incluido el body
//! 4. Despacha al router y envía la respuesta

pub mod tcp;

pub use tcp::{build_router, Server};
