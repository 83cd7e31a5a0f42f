//! # Errores del Dominio
//! src/error.rs
//!
//! Taxonomía de errores de las operaciones sobre estudiantes. Todos son
//! terminales para el request y se devuelven al cliente como
//! `{"error": "mensaje"}` con el código HTTP correspondiente.

use crate::http::{Response, StatusCode};
use thiserror::Error;

/// Error de una operación sobre estudiantes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudentError {
    /// Campo faltante, tipo incorrecto o valor fuera de rango
    #[error("{0}")]
    InvalidInput(String),

    /// Matrícula ya registrada
    #[error("{0}")]
    Conflict(String),

    /// Estudiante inexistente o listado vacío
    #[error("{0}")]
    NotFound(String),

    /// Regla de negocio violada
    #[error("{0}")]
    Forbidden(String),
}

impl StudentError {
    pub fn invalid(message: impl Into<String>) -> Self {
        StudentError::InvalidInput(message.into())
    }

    pub fn student_not_found() -> Self {
        StudentError::NotFound("Student not found".to_string())
    }

    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            StudentError::InvalidInput(_) => StatusCode::BadRequest,
            StudentError::Conflict(_) => StatusCode::Conflict,
            StudentError::NotFound(_) => StatusCode::NotFound,
            StudentError::Forbidden(_) => StatusCode::Forbidden,
        }
    }
}

impl From<StudentError> for Response {
    fn from(error: StudentError) -> Self {
        tracing::debug!(status = error.status_code().as_u16(), %error, "request rechazado");
        Response::error(error.status_code(), &error.to_string())
    }
}

/// Alias para resultados del dominio
pub type Result<T> = std::result::Result<T, StudentError>;
