//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea método + patrón de path a handlers.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Los patrones usan segmentos literales o parámetros entre llaves:
//! `/students/{code}/grades`. Las rutas se prueban en orden de registro,
//! así que una ruta literal registrada antes gana sobre un parámetro
//! (`/students/grades` antes de `/students/{code}`).
//!
//! Si ningún patrón coincide retorna 404; si el path coincide pero no el
//! método, 405. El path se separa por `/` antes de decodificar cada
//! segmento, así que `%2F` dentro de un parámetro no crea segmentos nuevos.

use crate::http::request::decode_path_segment;
use crate::http::{Method, Request, Response, StatusCode};
use crate::state::AppState;
use std::collections::HashMap;

/// Tipo de función handler
///
/// Recibe el request, los parámetros extraídos del path y el estado
/// compartido.
pub type Handler = fn(&Request, &PathParams, &AppState) -> Response;

/// Clave de métricas para requests que no coinciden con ninguna ruta
pub const UNMATCHED_ROUTE: &str = "(unmatched)";

/// Parámetros de path (ej: `{code}` → "A-1")
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: HashMap<String, String>,
}

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

struct Route {
    method: Method,
    pattern: String,
    segments: Vec<Segment>,
    handler: Handler,
}

impl Route {
    /// Intenta hacer match del path; retorna los parámetros si coincide
    fn matches(&self, parts: &[String]) -> Option<PathParams> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.values.insert(name.clone(), part.clone());
                }
            }
        }

        Some(params)
    }
}

/// Router que mapea (método, patrón) a handlers
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra una ruta con su handler
    ///
    /// # Ejemplo
    /// ```
    /// use student_records::http::{Method, Request, Response, StatusCode};
    /// use student_records::router::{PathParams, Router};
    /// use student_records::state::AppState;
    ///
    /// fn hello(_req: &Request, params: &PathParams, _state: &AppState) -> Response {
    ///     Response::json(StatusCode::Ok, &params.get("who"))
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, "/hello/{who}", hello);
    ///
    /// let request = Request::parse(b"GET /hello/ana HTTP/1.0\r\n\r\n").unwrap();
    /// let response = router.route(&request, &AppState::default());
    /// assert_eq!(response.status(), StatusCode::Ok);
    /// ```
    pub fn register(&mut self, method: Method, pattern: &str, handler: Handler) {
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            segments: parse_pattern(pattern),
            handler,
        });
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    pub fn route(&self, request: &Request, state: &AppState) -> Response {
        self.dispatch(request, state).0
    }

    /// Como [`Router::route`], pero también retorna el patrón que atendió
    /// el request (o [`UNMATCHED_ROUTE`]).
    ///
    /// El patrón sirve como clave de métricas: su cantidad es fija aunque
    /// los paths concretos no lo sean.
    pub fn dispatch(&self, request: &Request, state: &AppState) -> (Response, &str) {
        let Some(parts) = decode_path(request.path()) else {
            let mut response = Response::error(
                StatusCode::BadRequest,
                "Invalid percent-encoding in path",
            );
            Self::add_common_headers(&mut response);
            return (response, UNMATCHED_ROUTE);
        };

        let mut path_match: Option<&str> = None;

        for route in &self.routes {
            if let Some(params) = route.matches(&parts) {
                if route.method == request.method() {
                    let mut response = (route.handler)(request, &params, state);
                    Self::add_common_headers(&mut response);
                    return (response, route.pattern.as_str());
                }
                if path_match.is_none() {
                    path_match = Some(route.pattern.as_str());
                }
            }
        }

        let (mut response, pattern) = match path_match {
            Some(pattern) => (
                Response::error(
                    StatusCode::MethodNotAllowed,
                    &format!(
                        "Method {} not allowed for {}",
                        request.method().as_str(),
                        request.path()
                    ),
                ),
                pattern,
            ),
            None => (
                Response::error(
                    StatusCode::NotFound,
                    &format!("Route not found: {}", request.path()),
                ),
                UNMATCHED_ROUTE,
            ),
        };
        Self::add_common_headers(&mut response);
        (response, pattern)
    }

    /// Headers comunes a todas las respuestas
    fn add_common_headers(response: &mut Response) {
        response.add_header("Server", "StudentRecords-HTTP/1.0");
        response.add_header("Connection", "close");
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_pattern(pattern: &str) -> Vec<Segment> {
    split_path(pattern)
        .into_iter()
        .map(|part| match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(part.to_string()),
        })
        .collect()
}

/// Separa y decodifica; `None` si algún segmento no es UTF-8 válido
fn decode_path(path: &str) -> Option<Vec<String>> {
    split_path(path).into_iter().map(decode_path_segment).collect()
}

/// "/students/A-1/" → ["students", "A-1"]
fn split_path(path: &str) -> Vec<&str> {
    path.trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}
