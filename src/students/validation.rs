//! # Reglas de Validación
//! src/students/validation.rs
//!
//! Funciones puras que revisan presencia, tipo y rango de los campos de
//! registro y de envío de notas. Trabajan sobre `serde_json::Value` para
//! poder distinguir "campo ausente" de "campo con tipo incorrecto".

use crate::error::{Result, StudentError};
use crate::students::record::StudentRecord;
use crate::students::types::{
    Grades, StatusFilter, StudentStatus, GRADE_COUNT, MAX_GRADE, MIN_GRADE,
};
use serde_json::{Map, Value};

/// Longitud mínima del nombre (caracteres, sin espacios en los extremos)
pub const MIN_NAME_LEN: usize = 3;

/// Datos de registro ya validados
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub enrollment_code: String,
    pub status: StudentStatus,
}

impl Registration {
    pub fn into_record(self) -> StudentRecord {
        StudentRecord::new(self.name, self.enrollment_code, self.status)
    }
}

/// Parsea el body de un request como JSON
pub fn parse_body(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body)
        .map_err(|e| StudentError::invalid(format!("Invalid JSON body: {}", e)))
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| StudentError::invalid("Request body must be a JSON object"))
}

/// Campo string obligatorio: ausente, `null` o vacío cuenta como faltante
fn required_str<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a str> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(missing(name)),
        Some(Value::String(s)) if s.is_empty() => Err(missing(name)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(StudentError::invalid(format!(
            "Field '{}' must be a string",
            name
        ))),
    }
}

fn missing(name: &str) -> StudentError {
    StudentError::invalid(format!("Missing required field: {}", name))
}

/// Valida `{name, enrollmentCode, status}`
///
/// La unicidad de la matrícula no se revisa aquí: la comprueba el store
/// al insertar, bajo su lock.
pub fn validate_registration(payload: &Value) -> Result<Registration> {
    let fields = as_object(payload)?;

    // Primero presencia de los tres campos, en orden
    let name = required_str(fields, "name")?;
    let enrollment_code = required_str(fields, "enrollmentCode")?;
    let status = required_str(fields, "status")?;

    let status = StudentStatus::from_str(status).ok_or_else(|| {
        StudentError::invalid("Status must be \"active\" or \"inactive\"")
    })?;

    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(StudentError::invalid(format!(
            "Name must be at least {} characters long",
            MIN_NAME_LEN
        )));
    }

    Ok(Registration {
        name: name.to_string(),
        enrollment_code: enrollment_code.to_string(),
        status,
    })
}

/// Solo estudiantes activos pueden recibir notas
pub fn ensure_active(record: &StudentRecord) -> Result<()> {
    if record.is_active() {
        Ok(())
    } else {
        Err(StudentError::Forbidden(
            "Cannot submit grades for an inactive student".to_string(),
        ))
    }
}

/// Valida `{grades: [n, n, n, n]}`
pub fn validate_grades(payload: &Value) -> Result<Grades> {
    let fields = as_object(payload)?;

    let items = match fields.get("grades") {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Err(missing("grades")),
        Some(_) => return Err(StudentError::invalid("Field 'grades' must be an array")),
    };

    if items.len() != GRADE_COUNT {
        return Err(StudentError::invalid(format!(
            "Exactly {} grades are required",
            GRADE_COUNT
        )));
    }

    let mut values = [0.0; GRADE_COUNT];
    for (slot, item) in values.iter_mut().zip(items) {
        *slot = item.as_f64().ok_or_else(|| {
            StudentError::invalid(format!(
                "All grades must be numbers between {} and {}",
                MIN_GRADE, MAX_GRADE
            ))
        })?;
    }

    Grades::new(values)
}

/// Filtro opcional `?status=` del listado
///
/// Ausente o vacío equivale a sin filtro. Un valor desconocido no es un
/// error de entrada: simplemente no coincide con ningún estudiante.
pub fn parse_status_filter(raw: Option<&str>) -> StatusFilter {
    match raw.map(str::trim) {
        None | Some("") => StatusFilter::Any,
        Some(value) => StudentStatus::from_str(value)
            .map(StatusFilter::Only)
            .unwrap_or(StatusFilter::Unknown),
    }
}
