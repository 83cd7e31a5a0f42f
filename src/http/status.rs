//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Códigos de estado que usa el servicio de estudiantes:
//!
//! - **2xx**: Éxito (200 OK, 201 Created)
//! - **4xx**: Error del cliente (400, 403, 404, 405, 408, 409, 411, 413)
//! - **5xx**: Error del servidor (500)

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 201 Created - Se registró un estudiante nuevo
    Created = 201,

    /// 400 Bad Request - Campos faltantes, tipos o rangos inválidos
    BadRequest = 400,

    /// 403 Forbidden - Regla de negocio violada (ej: notas a un inactivo)
    Forbidden = 403,

    /// 404 Not Found - Ruta, estudiante o listado vacío
    NotFound = 404,

    /// 405 Method Not Allowed - La ruta existe pero no con ese método
    MethodNotAllowed = 405,

    /// 408 Request Timeout - El request no llegó completo antes del timeout
    RequestTimeout = 408,

    /// 409 Conflict - Matrícula duplicada
    Conflict = 409,

    /// 411 Length Required - POST sin `Content-Length`
    LengthRequired = 411,

    /// 413 Payload Too Large - Request por encima del límite configurado
    PayloadTooLarge = 413,

    /// 500 Internal Server Error - Error interno del servidor
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use student_records::http::StatusCode;
    /// assert_eq!(StatusCode::Created.as_u16(), 201);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::Conflict => "Conflict",
            StatusCode::LengthRequired => "Length Required",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok | StatusCode::Created)
    }

    /// Verifica si el código indica error del cliente (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "201 Created"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::Created.as_u16(), 201);
        assert_eq!(StatusCode::Forbidden.as_u16(), 403);
        assert_eq!(StatusCode::Conflict.as_u16(), 409);
        assert_eq!(StatusCode::PayloadTooLarge.as_u16(), 413);
        assert_eq!(StatusCode::RequestTimeout.as_u16(), 408);
        assert_eq!(StatusCode::LengthRequired.as_u16(), 411);
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(StatusCode::Created.reason_phrase(), "Created");
        assert_eq!(StatusCode::MethodNotAllowed.reason_phrase(), "Method Not Allowed");
        assert_eq!(StatusCode::LengthRequired.reason_phrase(), "Length Required");
    }

    #[test]
    fn test_classification() {
        assert!(StatusCode::Created.is_success());
        assert!(!StatusCode::Conflict.is_success());
        assert!(StatusCode::Forbidden.is_client_error());
        assert!(!StatusCode::InternalServerError.is_client_error());
        assert!(StatusCode::InternalServerError.is_server_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::Created.to_string(), "201 Created");
        assert_eq!(StatusCode::Forbidden.to_string(), "403 Forbidden");
    }
}
