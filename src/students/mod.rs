//! # Registro de Estudiantes
//! src/students/mod.rs
//!
//! Ciclo de vida de un estudiante: registro, notas, consulta y
//! desactivación.
//!
//! ## Componentes
//!
//! - `types`: estado, situación y notas
//! - `record`: `StudentRecord` y sus vistas JSON
//! - `store`: colección en memoria protegida por un lock
//! - `validation`: reglas de presencia, tipo y rango
//! - `evaluator`: promedio y situación
//! - `handlers`: endpoints HTTP

pub mod evaluator;
pub mod handlers;
pub mod record;
pub mod store;
pub mod types;
pub mod validation;

pub use record::StudentRecord;
pub use store::RecordStore;
pub use types::{Grades, Situation, StatusFilter, StudentStatus};

use crate::http::Method;
use crate::router::Router;

/// Registra las rutas de estudiantes
///
/// `/students/grades` va antes que `/students/{code}` para que el literal
/// tenga prioridad.
pub fn register_routes(router: &mut Router) {
    router.register(Method::POST, "/students", handlers::register_handler);
    router.register(Method::GET, "/students", handlers::list_handler);
    router.register(Method::GET, "/students/grades", handlers::list_graded_handler);
    router.register(Method::GET, "/students/{code}", handlers::get_one_handler);
    router.register(Method::DELETE, "/students/{code}", handlers::delete_handler);
    router.register(Method::POST, "/students/{code}/grades", handlers::submit_grades_handler);
    router.register(Method::GET, "/students/{code}/grades", handlers::get_grades_handler);
}
