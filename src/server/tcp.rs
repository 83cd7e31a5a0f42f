//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor HTTP/1.0 que atiende cada conexión en su propio thread. Todos
//! los threads comparten el mismo `AppState`; el store interno serializa
//! las operaciones con un único lock.

use crate::config::Config;
use crate::http::request::{find_subslice, HEADER_TERMINATOR};
use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use crate::state::AppState;
use crate::{students, system};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

/// Tamaño de cada lectura del socket
const READ_CHUNK: usize = 4096;

/// Clave de métricas para requests que no llegaron al router
const TRANSPORT_ERROR_KEY: &str = "(error)";

/// Errores al leer un request del socket
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("request exceeds {0} bytes")]
    TooLarge(usize),

    #[error("invalid Content-Length header")]
    InvalidContentLength,

    #[error("Content-Length header is required")]
    LengthRequired,

    #[error("request not received within the read timeout")]
    Timeout,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Límites aplicados a cada conexión
#[derive(Debug, Clone, Copy)]
struct ConnectionLimits {
    max_request_bytes: usize,
    read_timeout: Duration,
}

impl ConnectionLimits {
    fn from_config(config: &Config) -> Self {
        Self {
            max_request_bytes: config.max_request_bytes,
            read_timeout: Duration::from_millis(config.read_timeout_ms),
        }
    }
}

/// Construye el router con todas las rutas del servicio
pub fn build_router() -> Router {
    let mut router = Router::new();
    system::register_routes(&mut router);
    students::register_routes(&mut router);
    router
}

/// Servidor HTTP/1.0 concurrente
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    state: Arc<AppState>,
    limits: ConnectionLimits,
}

impl Server {
    /// Crea el estado compartido y hace bind en `config.address()`
    ///
    /// Con puerto 0 el sistema operativo asigna uno libre; se consulta con
    /// [`Server::local_addr`].
    pub fn bind(config: &Config) -> io::Result<Self> {
        let listener = TcpListener::bind(config.address())?;

        Ok(Self {
            listener,
            router: Arc::new(build_router()),
            state: Arc::new(AppState::from_config(config)),
            limits: ConnectionLimits::from_config(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Estado compartido (store y métricas)
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Acepta conexiones indefinidamente, un thread por conexión
    pub fn run(self) -> io::Result<()> {
        tracing::info!(address = %self.local_addr()?, "servidor escuchando (un thread por conexión)");

        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!(error = %e, "error al aceptar conexión");
                    continue;
                }
            };

            let router = Arc::clone(&self.router);
            let state = Arc::clone(&self.state);
            let limits = self.limits;

            let peer = stream
                .peer_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|_| "unknown".to_string());
            tracing::debug!(%peer, "nueva conexión");

            state.metrics.increment_active_connections();
            thread::spawn(move || {
                if let Err(e) = handle_connection(stream, &router, &state, limits) {
                    tracing::warn!(%peer, error = %e, "error en conexión");
                }
                state.metrics.decrement_active_connections();
            });
        }

        Ok(())
    }
}

/// Lee un request, lo despacha y escribe la respuesta
fn handle_connection(
    mut stream: TcpStream,
    router: &Router,
    state: &AppState,
    limits: ConnectionLimits,
) -> io::Result<()> {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    stream.set_read_timeout(Some(limits.read_timeout))?;

    let transport_error = |status: StatusCode, message: &str| {
        (
            Response::error(status, message),
            "-",
            "/error".to_string(),
            TRANSPORT_ERROR_KEY.to_string(),
        )
    };

    let (mut response, method, path, route_key) =
        match read_request(&mut stream, limits.max_request_bytes) {
            Ok(raw) if raw.is_empty() => {
                tracing::debug!("conexión cerrada sin datos");
                return Ok(());
            }
            Ok(raw) => match Request::parse(&raw) {
                Ok(request) => {
                    let (response, pattern) = router.dispatch(&request, state);
                    (
                        response,
                        request.method().as_str(),
                        request.path().to_string(),
                        pattern.to_string(),
                    )
                }
                Err(e) => {
                    tracing::warn!(request_id = %request_id, error = %e, "request inválido");
                    transport_error(StatusCode::BadRequest, &format!("Invalid: {}", e))
                }
            },
            Err(ReadError::Io(e)) => return Err(e),
            Err(e @ ReadError::TooLarge(_)) => {
                transport_error(StatusCode::PayloadTooLarge, &e.to_string())
            }
            Err(e @ ReadError::InvalidContentLength) => {
                transport_error(StatusCode::BadRequest, &e.to_string())
            }
            Err(e @ ReadError::LengthRequired) => {
                transport_error(StatusCode::LengthRequired, &e.to_string())
            }
            Err(e @ ReadError::Timeout) => {
                tracing::debug!(request_id = %request_id, "timeout de lectura");
                transport_error(StatusCode::RequestTimeout, &e.to_string())
            }
        };

    response.add_header("X-Request-Id", &request_id);
    response.add_header("Connection", "close");

    stream.write_all(&response.to_bytes())?;
    stream.flush()?;

    let latency = start.elapsed();
    let status = response.status().as_u16();
    state.metrics.record_request(&route_key, status, latency);

    tracing::info!(
        request_id = %request_id,
        method,
        path = %path,
        status,
        latency_ms = latency.as_secs_f64() * 1000.0,
        "request atendido"
    );

    Ok(())
}

/// Lee headers y, si hay `Content-Length`, el body completo
///
/// Retorna un buffer vacío si el cliente cerró sin enviar nada. Si el
/// cliente cierra antes de completar el body se retorna lo recibido y el
/// parser decide. Un POST sin `Content-Length` se rechaza en cuanto
/// terminan los headers.
fn read_request<R: Read>(stream: &mut R, max_bytes: usize) -> Result<Vec<u8>, ReadError> {
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];
    let mut expected_len: Option<usize> = None;

    loop {
        if let Some(total) = expected_len {
            if buffer.len() >= total {
                buffer.truncate(total);
                return Ok(buffer);
            }
        }

        let n = match stream.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            // set_read_timeout reporta WouldBlock en Unix y TimedOut en Windows
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                return Err(ReadError::Timeout);
            }
            Err(e) => return Err(ReadError::Io(e)),
        };
        if n == 0 {
            return Ok(buffer);
        }
        buffer.extend_from_slice(&chunk[..n]);

        if expected_len.is_none() {
            match find_subslice(&buffer, HEADER_TERMINATOR) {
                Some(head_end) => {
                    let head = &buffer[..head_end];
                    let body_len = match content_length(head)? {
                        Some(len) => len,
                        None if head.starts_with(b"POST ") => {
                            return Err(ReadError::LengthRequired);
                        }
                        None => 0,
                    };
                    let total = head_end + HEADER_TERMINATOR.len() + body_len;
                    if total > max_bytes {
                        return Err(ReadError::TooLarge(max_bytes));
                    }
                    expected_len = Some(total);
                }
                // Headers sin terminar que ya superan el límite
                None if buffer.len() > max_bytes => {
                    return Err(ReadError::TooLarge(max_bytes));
                }
                None => {}
            }
        }
    }
}

/// Valor de `Content-Length` en la cabecera, si está
fn content_length(head: &[u8]) -> Result<Option<usize>, ReadError> {
    let head = String::from_utf8_lossy(head);

    for line in head.split("\r\n").skip(1) {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                return value
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| ReadError::InvalidContentLength);
            }
        }
    }

    Ok(None)
}
