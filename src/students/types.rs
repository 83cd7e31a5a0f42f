//! # Tipos del Registro de Estudiantes
//! src/students/types.rs
//!
//! Tipos fundamentales: estado del estudiante, situación académica y el
//! conjunto de cuatro notas.

use crate::error::{Result, StudentError};
use serde::{Deserialize, Serialize};

/// Cantidad exacta de notas por estudiante
pub const GRADE_COUNT: usize = 4;

/// Nota mínima aceptada
pub const MIN_GRADE: f64 = 0.0;

/// Nota máxima aceptada
pub const MAX_GRADE: f64 = 10.0;

/// Estado de un estudiante
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    /// Puede recibir notas
    Active,

    /// Desactivado (soft delete)
    Inactive,
}

impl StudentStatus {
    /// Solo acepta "active" o "inactive", sin variantes de mayúsculas
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(StudentStatus::Active),
            "inactive" => Some(StudentStatus::Inactive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
        }
    }
}

/// Filtro `?status=` del listado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Sin filtro (ausente o vacío)
    #[default]
    Any,

    Only(StudentStatus),

    /// Valor que no es un estado conocido; no coincide con ningún registro
    Unknown,
}

impl StatusFilter {
    pub fn matches(&self, status: StudentStatus) -> bool {
        match self {
            StatusFilter::Any => true,
            StatusFilter::Only(wanted) => *wanted == status,
            StatusFilter::Unknown => false,
        }
    }
}

/// Situación derivada del promedio de notas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Situation {
    /// Promedio >= 7
    Approved,

    /// 5 <= promedio < 7
    Remedial,

    /// Promedio < 5
    Failed,
}

/// Cuatro notas, cada una en [0, 10]
///
/// Solo se construye a través de [`Grades::new`], por lo que cualquier
/// valor de este tipo cumple el invariante de rango.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Grades([f64; GRADE_COUNT]);

impl Grades {
    pub fn new(values: [f64; GRADE_COUNT]) -> Result<Self> {
        if values.iter().all(|v| is_valid_grade(*v)) {
            Ok(Self(values))
        } else {
            Err(StudentError::invalid(format!(
                "All grades must be numbers between {} and {}",
                MIN_GRADE, MAX_GRADE
            )))
        }
    }

    pub fn values(&self) -> &[f64; GRADE_COUNT] {
        &self.0
    }
}

/// `true` si la nota es finita y está en [MIN_GRADE, MAX_GRADE]
pub fn is_valid_grade(value: f64) -> bool {
    value.is_finite() && (MIN_GRADE..=MAX_GRADE).contains(&value)
}
