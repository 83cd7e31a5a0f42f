//! # Student Records
//! src/lib.rs
//!
//! Servicio HTTP/1.0 que mantiene en memoria el registro de estudiantes:
//! alta, notas, promedio y situación, listados y desactivación.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing y construcción de mensajes HTTP/1.0
//! - `router`: Enrutamiento por método y patrón de path
//! - `server`: Servidor TCP, un thread por conexión
//! - `students`: Store, validación, evaluador de notas y handlers
//! - `system`: `/status` y `/metrics`
//! - `metrics`: Recolección de métricas
//! - `config`: Argumentos CLI y variables de entorno
//! - `error`: Errores del dominio
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use student_records::config::Config;
//! use student_records::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("bind");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod router;
pub mod server;
pub mod state;
pub mod students;
pub mod system;
