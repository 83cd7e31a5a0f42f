//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Parser HTTP/1.0 escrito a mano para el servicio de estudiantes.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /students HTTP/1.0\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 58\r\n
//! \r\n
//! {"name":"Ana","enrollmentCode":"A-1","status":"active"}
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query HTTP/1.0`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: JSON en POST, vacío en GET/DELETE

use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::collections::HashMap;
use thiserror::Error;

/// Separador entre headers y body
pub(crate) const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Consultar estudiantes
    GET,

    /// POST - Registrar estudiantes o notas
    POST,

    /// DELETE - Desactivar (o purgar) un estudiante
    DELETE,
}

impl Method {
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::DELETE => "DELETE",
        }
    }
}

/// Representa un request HTTP/1.0 parseado
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,

    /// Path sin query string (ej: "/students/A-1/grades")
    path: String,

    /// Query parameters parseados (ej: {"status": "active"})
    query_params: HashMap<String, String>,

    headers: HashMap<String, String>,

    /// "HTTP/1.0" o "HTTP/1.1"
    version: String,

    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Incomplete HTTP request")]
    IncompleteRequest,

    #[error("Invalid request line format")]
    InvalidRequestLine,

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Empty request")]
    EmptyRequest,
}

impl Request {
    /// Parsea un request HTTP/1.0 desde bytes
    ///
    /// El buffer debe contener el request completo (headers y body). El
    /// servidor se encarga de leer hasta `Content-Length` antes de llamar
    /// a esta función.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use student_records::http::Request;
    ///
    /// let raw = b"GET /students?status=active HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/students");
    /// assert_eq!(request.query_param("status"), Some("active"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ParseError::EmptyRequest);
        }

        // Separar la cabecera (texto) del body (bytes crudos)
        let (head, body) = match find_subslice(buffer, HEADER_TERMINATOR) {
            Some(pos) => (&buffer[..pos], &buffer[pos + HEADER_TERMINATOR.len()..]),
            None => (buffer, &[][..]),
        };

        let head = std::str::from_utf8(head).map_err(|_| ParseError::InvalidRequestLine)?;
        let mut lines = head.split("\r\n");
        let request_line = lines.next().ok_or(ParseError::IncompleteRequest)?;

        let (method, path, query_params, version) = Self::parse_request_line(request_line)?;
        let headers = Self::parse_headers(lines)?;

        Ok(Request {
            method,
            path,
            query_params,
            headers,
            version,
            body: body.to_vec(),
        })
    }

    /// Formato: `GET /path?query HTTP/1.0`
    fn parse_request_line(
        line: &str,
    ) -> Result<(Method, String, HashMap<String, String>, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::from_str(parts[0])?;
        let (path, query_params) = Self::parse_path_and_query(parts[1]);

        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        Ok((method, path, query_params, version))
    }

    fn parse_path_and_query(path_with_query: &str) -> (String, HashMap<String, String>) {
        match path_with_query.split_once('?') {
            Some((path, query)) => (path.to_string(), Self::parse_query_string(query)),
            None => (path_with_query.to_string(), HashMap::new()),
        }
    }

    /// Ejemplo: "status=active&purge=true"
    /// Retorna: {"status": "active", "purge": "true"}
    fn parse_query_string(query: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();

        for param in query.split('&').filter(|p| !p.is_empty()) {
            match param.split_once('=') {
                Some((key, value)) => {
                    params.insert(decode_query_component(key), decode_query_component(value));
                }
                // Parámetro sin valor (ej: "?purge")
                None => {
                    params.insert(decode_query_component(param), String::new());
                }
            }
        }

        params
    }

    fn parse_headers<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            if line.trim().is_empty() {
                break;
            }

            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.trim().to_string(), value.trim().to_string());
                }
                None => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// Obtiene un query parameter específico
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(|s| s.as_str())
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header sin distinguir mayúsculas en el nombre
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Decodifica un segmento de path ya separado por `/`
///
/// Todas las secuencias `%XX` se decodifican y el resultado debe ser UTF-8
/// válido. `+` queda literal: solo es espacio en query strings.
pub(crate) fn decode_path_segment(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

/// Decodifica una clave o valor de query string (`+` es espacio)
pub(crate) fn decode_query_component(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Posición de `needle` dentro de `haystack`
pub(crate) fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
