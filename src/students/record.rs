//! # Registro de un Estudiante
//! src/students/record.rs
//!
//! `StudentRecord` y las vistas JSON que devuelven los endpoints.

use crate::students::evaluator::{self, Evaluation};
use crate::students::types::{Grades, Situation, StudentStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Registro completo de un estudiante
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Matrícula tal como la envió el cliente
    pub enrollment_code: String,

    pub name: String,

    pub status: StudentStatus,

    /// `None` hasta el primer envío de notas
    pub grades: Option<Grades>,

    /// Inmutable
    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl StudentRecord {
    pub fn new(name: String, enrollment_code: String, status: StudentStatus) -> Self {
        let now = Utc::now();
        Self {
            enrollment_code,
            name,
            status,
            grades: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Clave de búsqueda: la matrícula sin distinguir mayúsculas
    pub fn key(&self) -> String {
        normalize_code(&self.enrollment_code)
    }

    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }

    /// Guarda las notas y actualiza `updated_at`
    pub fn record_grades(&mut self, grades: Grades) {
        self.grades = Some(grades);
        self.updated_at = Utc::now();
    }

    /// Marca el estudiante como inactivo (sin error si ya lo estaba)
    pub fn deactivate(&mut self) {
        self.status = StudentStatus::Inactive;
    }

    /// Evaluación de las notas, si están registradas
    pub fn evaluation(&self) -> Option<Evaluation> {
        self.grades.as_ref().map(evaluator::evaluate)
    }

    pub fn summary(&self) -> StudentSummary {
        StudentSummary {
            enrollment_code: self.enrollment_code.clone(),
            name: self.name.clone(),
            status: self.status,
        }
    }

    /// Detalle completo; sin notas, los campos de evaluación se omiten
    pub fn detail(&self) -> StudentDetail {
        let evaluation = self.evaluation();
        StudentDetail {
            summary: self.summary(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            grades: self.grades,
            average: evaluation.map(|e| e.average),
            situation: evaluation.map(|e| e.situation),
        }
    }

    /// Vista de notas con situación; `None` si no hay notas
    pub fn graded(&self) -> Option<GradedStudent> {
        let grades = self.grades?;
        let evaluation = evaluator::evaluate(&grades);
        Some(GradedStudent {
            summary: self.summary(),
            grades,
            average: evaluation.average,
            situation: evaluation.situation,
        })
    }
}

/// Normaliza una matrícula para comparaciones
pub fn normalize_code(code: &str) -> String {
    code.to_lowercase()
}

/// Entrada del listado de estudiantes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub enrollment_code: String,
    pub name: String,
    pub status: StudentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetail {
    #[serde(flatten)]
    pub summary: StudentSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grades: Option<Grades>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation: Option<Situation>,
}

/// Estudiante con notas completas y su situación
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedStudent {
    #[serde(flatten)]
    pub summary: StudentSummary,
    pub grades: Grades,
    pub average: f64,
    pub situation: Situation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn record() -> StudentRecord {
        StudentRecord::new("Ana Lima".into(), "ABC-1".into(), StudentStatus::Active)
    }

    #[test]
    fn test_new_record() {
        let r = record();
        assert!(r.is_active());
        assert!(r.grades.is_none());
        assert_eq!(r.created_at, r.updated_at);
        assert_eq!(r.key(), "abc-1");
    }

    #[test]
    fn test_record_grades_updates_timestamp() {
        let mut r = record();
        let created = r.created_at;
        r.record_grades(Grades::new([8.0; 4]).unwrap());

        assert!(r.grades.is_some());
        assert_eq!(r.created_at, created);
        assert!(r.updated_at >= created);
    }

    #[test]
    fn test_deactivate_twice() {
        let mut r = record();
        r.deactivate();
        r.deactivate();
        assert_eq!(r.status, StudentStatus::Inactive);
    }

    #[test]
    fn test_detail_without_grades_omits_evaluation() {
        let json = serde_json::to_value(record().detail()).unwrap();

        assert_eq!(json["enrollmentCode"], "ABC-1");
        assert_eq!(json["status"], "active");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("grades").is_none());
        assert!(json.get("situation").is_none());
    }

    #[test]
    fn test_detail_with_grades() {
        let mut r = record();
        r.record_grades(Grades::new([6.0; 4]).unwrap());
        let json = serde_json::to_value(r.detail()).unwrap();

        assert_eq!(json["average"], 6.0);
        assert_eq!(json["situation"], "remedial");
        assert_eq!(json["grades"], serde_json::json!([6.0, 6.0, 6.0, 6.0]));
    }

    #[test]
    fn test_graded_view() {
        let mut r = record();
        assert!(r.graded().is_none());

        r.record_grades(Grades::new([2.0; 4]).unwrap());
        let json: Value = serde_json::to_value(r.graded().unwrap()).unwrap();
        assert_eq!(json["name"], "Ana Lima");
        assert_eq!(json["situation"], "failed");
    }
}
