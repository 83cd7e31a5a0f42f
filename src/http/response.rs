//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas HTTP/1.0 y convertirlas a bytes.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.0 201 Created\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 42\r\n
//! X-Request-Id: 6f1c...\r\n
//! \r\n
//! {"message":"Student registered successfully"}
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use student_records::http::{Response, StatusCode};
//! use serde_json::json;
//!
//! let response = Response::json(StatusCode::Created, &json!({"message": "ok"}));
//! assert_eq!(response.status(), StatusCode::Created);
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.0 201 Created\r\n"));
//! ```

use super::StatusCode;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

/// Representa una respuesta HTTP/1.0 completa
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,

    /// Usamos HashMap para evitar headers duplicados
    headers: HashMap<String, String>,

    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header (si ya existe, se sobrescribe)
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de [`Response::with_header`]
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Establece el body y calcula `Content-Length`
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self.headers
            .insert("Content-Length".to_string(), self.body.len().to_string());
        self
    }

    /// Serializa `payload` como JSON con el código indicado
    ///
    /// Los tipos del dominio siempre serializan (structs con campos
    /// String/número); si aun así falla, se responde 500.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self::new(status)
                .with_header("Content-Type", "application/json")
                .with_body(&body),
            Err(e) => {
                tracing::error!(error = %e, "no se pudo serializar la respuesta");
                Self::error(StatusCode::InternalServerError, "Failed to serialize response")
            }
        }
    }

    /// Crea una respuesta de error con formato `{"error": "mensaje"}`
    ///
    /// # Ejemplo
    /// ```
    /// use student_records::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::NotFound, "Student not found");
    /// assert_eq!(response.body(), br#"{"error":"Student not found"}"#);
    /// ```
    pub fn error(status: StatusCode, message: &str) -> Self {
        // json! de un String no puede fallar al serializar
        let body = json!({ "error": message }).to_string();
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(&body)
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        result.extend_from_slice(format!("HTTP/1.0 {}\r\n", self.status).as_bytes());

        // Orden estable para que las respuestas sean reproducibles
        let mut names: Vec<&String> = self.headers.keys().collect();
        names.sort();
        for name in names {
            let header_line = format!("{}: {}\r\n", name, self.headers[name]);
            result.extend_from_slice(header_line.as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
