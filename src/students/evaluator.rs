//! # Evaluador de Notas
//! src/students/evaluator.rs
//!
//! Calcula el promedio de las cuatro notas y lo traduce a una situación.
//! Funciones puras, sin efectos secundarios.

use crate::students::types::{Grades, Situation, GRADE_COUNT};
use serde::Serialize;

/// Promedio mínimo para aprobar
pub const APPROVAL_THRESHOLD: f64 = 7.0;

/// Promedio mínimo para recuperación
pub const REMEDIAL_THRESHOLD: f64 = 5.0;

/// Resultado de evaluar un conjunto de notas
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    /// Promedio redondeado a 2 decimales
    pub average: f64,
    pub situation: Situation,
}

/// Media aritmética sin redondear
pub fn mean(grades: &Grades) -> f64 {
    grades.values().iter().sum::<f64>() / GRADE_COUNT as f64
}

/// Redondea a 2 decimales (mitades lejos de cero)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Situation {
    pub fn from_average(average: f64) -> Self {
        if average >= APPROVAL_THRESHOLD {
            Situation::Approved
        } else if average >= REMEDIAL_THRESHOLD {
            Situation::Remedial
        } else {
            Situation::Failed
        }
    }
}

/// Evalúa las notas
///
/// La situación se calcula sobre el promedio ya redondeado, así lo que se
/// reporta al cliente siempre es coherente (un 6.999 se muestra 7.0 y es
/// "approved").
pub fn evaluate(grades: &Grades) -> Evaluation {
    let average = round2(mean(grades));
    Evaluation {
        average,
        situation: Situation::from_average(average),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grades(values: [f64; 4]) -> Grades {
        Grades::new(values).unwrap()
    }

    #[test]
    fn test_all_tens_approved() {
        let evaluation = evaluate(&grades([10.0; 4]));
        assert_eq!(evaluation.average, 10.0);
        assert_eq!(evaluation.situation, Situation::Approved);
    }

    #[test]
    fn test_sixes_remedial() {
        let evaluation = evaluate(&grades([6.0; 4]));
        assert_eq!(evaluation.average, 6.0);
        assert_eq!(evaluation.situation, Situation::Remedial);
    }

    #[test]
    fn test_twos_failed() {
        let evaluation = evaluate(&grades([2.0; 4]));
        assert_eq!(evaluation.average, 2.0);
        assert_eq!(evaluation.situation, Situation::Failed);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(evaluate(&grades([7.0; 4])).situation, Situation::Approved);
        assert_eq!(evaluate(&grades([5.0; 4])).situation, Situation::Remedial);
        assert_eq!(Situation::from_average(4.99), Situation::Failed);
        assert_eq!(Situation::from_average(6.99), Situation::Remedial);
    }

    #[test]
    fn test_mean_mixed() {
        let g = grades([10.0, 8.0, 6.0, 4.0]);
        assert_eq!(mean(&g), 7.0);
        assert_eq!(evaluate(&g).situation, Situation::Approved);
    }

    #[test]
    fn test_rounding_two_decimals() {
        // 27.01 / 4 = 6.7525
        let evaluation = evaluate(&grades([7.0, 7.0, 7.0, 6.01]));
        assert_eq!(evaluation.average, 6.75);
        assert_eq!(round2(2.346), 2.35);
    }

    #[test]
    fn test_situation_uses_rounded_average() {
        // 27.99 / 4 = 6.9975 -> 7.0
        let evaluation = evaluate(&grades([7.0, 7.0, 7.0, 6.99]));
        assert_eq!(evaluation.average, 7.0);
        assert_eq!(evaluation.situation, Situation::Approved);
    }
}
