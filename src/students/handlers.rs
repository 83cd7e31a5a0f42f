//! # Handlers HTTP de Estudiantes
//! src/students/handlers.rs
//!
//! Cada handler valida la entrada, opera sobre el `RecordStore` y, cuando
//! hay notas, usa el evaluador. Los errores del dominio se convierten en
//! `{"error": "..."}` con su código (400, 403, 404, 409).
//!
//! - `POST   /students`
//! - `GET    /students?status=active|inactive`
//! - `GET    /students/grades`
//! - `GET    /students/{code}`
//! - `DELETE /students/{code}` (`?purge=true` para borrado definitivo)
//! - `POST   /students/{code}/grades`
//! - `GET    /students/{code}/grades`

use crate::error::{Result, StudentError};
use crate::http::{Request, Response, StatusCode};
use crate::router::PathParams;
use crate::state::AppState;
use crate::students::record::{GradedStudent, StudentSummary};
use crate::students::validation;
use serde_json::json;

/// Convierte el resultado de un handler interno en Response
fn respond(result: Result<Response>) -> Response {
    result.unwrap_or_else(Response::from)
}

/// Matrícula del path; el router garantiza que existe
fn code_param(params: &PathParams) -> Result<&str> {
    params
        .get("code")
        .ok_or_else(|| StudentError::invalid("Missing enrollment code in path"))
}

/// Handler para `POST /students`
///
/// Body: `{"name": "...", "enrollmentCode": "...", "status": "active"}`
///
/// # Ejemplo de response (201)
/// ```json
/// {"message": "Student registered successfully", "student": {...}}
/// ```
pub fn register_handler(req: &Request, _params: &PathParams, state: &AppState) -> Response {
    respond(register(req, state))
}

fn register(req: &Request, state: &AppState) -> Result<Response> {
    let payload = validation::parse_body(req.body())?;
    let registration = validation::validate_registration(&payload)?;
    let stored = state.store.add(registration.into_record())?;

    tracing::info!(code = %stored.enrollment_code, "estudiante registrado");

    Ok(Response::json(
        StatusCode::Created,
        &json!({
            "message": "Student registered successfully",
            "student": stored.detail(),
        }),
    ))
}

/// Handler para `POST /students/{code}/grades`
///
/// Body: `{"grades": [n1, n2, n3, n4]}`. Orden de chequeo: existencia
/// (404), estado activo (403), luego el body (400).
pub fn submit_grades_handler(req: &Request, params: &PathParams, state: &AppState) -> Response {
    respond(submit_grades(req, params, state))
}

fn submit_grades(req: &Request, params: &PathParams, state: &AppState) -> Result<Response> {
    let code = code_param(params)?;
    // El error de parseo se difiere para que 404/403 tengan prioridad
    let payload = validation::parse_body(req.body());

    let updated = state.store.update(code, |record| {
        validation::ensure_active(record)?;
        let grades = validation::validate_grades(&payload?)?;
        record.record_grades(grades);
        Ok(record.detail())
    })?;

    tracing::info!(code = %updated.summary.enrollment_code, "notas registradas");

    Ok(Response::json(
        StatusCode::Ok,
        &json!({
            "message": "Grades updated successfully",
            "student": updated,
        }),
    ))
}

/// Handler para `GET /students/{code}/grades`
///
/// # Ejemplo de response
/// ```json
/// {"enrollmentCode": "A-1", "grades": [7, 8, 9, 10], "average": 8.5, "situation": "approved"}
/// ```
pub fn get_grades_handler(_req: &Request, params: &PathParams, state: &AppState) -> Response {
    respond(get_grades(params, state))
}

fn get_grades(params: &PathParams, state: &AppState) -> Result<Response> {
    let record = state.store.find_by_code(code_param(params)?)?;
    let graded = record.graded().ok_or_else(|| {
        StudentError::NotFound("Grades not registered for this student".to_string())
    })?;

    Ok(Response::json(
        StatusCode::Ok,
        &json!({
            "enrollmentCode": graded.summary.enrollment_code,
            "grades": graded.grades,
            "average": graded.average,
            "situation": graded.situation,
        }),
    ))
}

/// Handler para `DELETE /students/{code}`
///
/// Por defecto desactiva (soft delete); desactivar un estudiante ya
/// inactivo también responde 200. Con `?purge=true` y el servidor
/// arrancado con `--allow-hard-delete`, elimina el registro.
pub fn delete_handler(req: &Request, params: &PathParams, state: &AppState) -> Response {
    respond(delete(req, params, state))
}

fn delete(req: &Request, params: &PathParams, state: &AppState) -> Result<Response> {
    let code = code_param(params)?;

    if wants_purge(req) {
        if !state.allow_hard_delete {
            return Err(StudentError::Forbidden(
                "Hard delete is disabled on this server".to_string(),
            ));
        }
        let removed = state.store.remove(code)?;
        tracing::warn!(code = %removed.enrollment_code, "estudiante eliminado definitivamente");
        return Ok(Response::json(
            StatusCode::Ok,
            &json!({ "message": "Student deleted successfully" }),
        ));
    }

    state.store.update(code, |record| {
        record.deactivate();
        Ok(())
    })?;
    tracing::info!(code, "estudiante desactivado");

    Ok(Response::json(
        StatusCode::Ok,
        &json!({ "message": "Student deactivated successfully" }),
    ))
}

/// `?purge`, `?purge=true` o `?purge=1`
fn wants_purge(req: &Request) -> bool {
    matches!(req.query_param("purge"), Some("" | "true" | "1"))
}

/// Handler para `GET /students?status=...`
///
/// 404 si no hay estudiantes o si el filtro no coincide con ninguno.
pub fn list_handler(req: &Request, _params: &PathParams, state: &AppState) -> Response {
    respond(list(req, state))
}

fn list(req: &Request, state: &AppState) -> Result<Response> {
    let filter = validation::parse_status_filter(req.query_param("status"));
    let summaries: Vec<StudentSummary> = state
        .store
        .list(filter)?
        .iter()
        .map(|r| r.summary())
        .collect();

    Ok(Response::json(StatusCode::Ok, &summaries))
}

/// Handler para `GET /students/{code}`
///
/// Incluye `grades`, `average` y `situation` solo si hay notas.
pub fn get_one_handler(_req: &Request, params: &PathParams, state: &AppState) -> Response {
    respond(
        code_param(params)
            .and_then(|code| state.store.find_by_code(code))
            .map(|record| Response::json(StatusCode::Ok, &record.detail())),
    )
}

/// Handler para `GET /students/grades`
///
/// Estudiantes con notas y su situación; puede ser una lista vacía.
pub fn list_graded_handler(_req: &Request, _params: &PathParams, state: &AppState) -> Response {
    let graded: Vec<GradedStudent> = state
        .store
        .with_grades()
        .iter()
        .filter_map(|r| r.graded())
        .collect();

    Response::json(StatusCode::Ok, &graded)
}
