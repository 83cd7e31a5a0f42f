//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta y agrega métricas de requests en tiempo real.

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Máximo de latencias guardadas para calcular percentiles
const MAX_LATENCIES: usize = 10_000;

/// Rutas reportadas en `top_paths`
const TOP_PATHS: usize = 10;

/// Claves distintas que se guardan en `requests_per_path`
const MAX_TRACKED_PATHS: usize = 256;

/// Acumula las rutas que llegan con el mapa ya lleno
const OVERFLOW_PATH_KEY: &str = "(other)";

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

#[derive(Default)]
struct MetricsData {
    total_requests: u64,

    /// Requests por código de estado
    status_codes: HashMap<u16, u64>,

    /// Últimas latencias en microsegundos
    latencies: VecDeque<u64>,

    /// Requests por patrón de ruta, con a lo sumo `MAX_TRACKED_PATHS` claves
    requests_per_path: HashMap<String, u64>,

    active_connections: u64,
}

/// Snapshot de métricas (para uso externo)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub active_connections: u64,
    pub uptime_secs: u64,
    pub latency_p50_us: u64,
    pub latency_p95_us: u64,
    pub latency_p99_us: u64,
    pub latency_avg_us: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData::default())),
            start_time: Instant::now(),
        }
    }

    /// Registra un request terminado
    ///
    /// `route` debe ser el patrón que atendió el request, no el path
    /// concreto; de lo contrario cada matrícula crearía una clave nueva.
    pub fn record_request(&self, route: &str, status_code: u16, latency: Duration) {
        let mut data = self.inner.lock();

        data.total_requests += 1;
        *data.status_codes.entry(status_code).or_insert(0) += 1;

        if data.latencies.len() >= MAX_LATENCIES {
            data.latencies.pop_front();
        }
        data.latencies.push_back(latency.as_micros() as u64);

        let tracked = data.requests_per_path.contains_key(route)
            || data.requests_per_path.len() < MAX_TRACKED_PATHS;
        let key = if tracked { route } else { OVERFLOW_PATH_KEY };
        *data.requests_per_path.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn increment_active_connections(&self) {
        self.inner.lock().active_connections += 1;
    }

    /// No baja de cero
    pub fn decrement_active_connections(&self) {
        let mut data = self.inner.lock();
        data.active_connections = data.active_connections.saturating_sub(1);
    }

    pub fn active_connections(&self) -> u64 {
        self.inner.lock().active_connections
    }

    /// Métricas actuales en formato JSON
    pub fn to_json(&self) -> Value {
        let data = self.inner.lock();
        let (p50, p95, p99, avg) = calculate_percentiles(&data.latencies);
        let stddev = calculate_stddev(&data.latencies, avg);

        let status_codes: HashMap<String, u64> = data
            .status_codes
            .iter()
            .map(|(code, count)| (code.to_string(), *count))
            .collect();

        // Top rutas más accedidas
        let mut paths: Vec<(&String, &u64)> = data.requests_per_path.iter().collect();
        paths.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        let top_paths: Vec<Value> = paths
            .into_iter()
            .take(TOP_PATHS)
            .map(|(path, count)| json!({ "path": path, "count": count }))
            .collect();

        json!({
            "server": {
                "uptime_seconds": self.start_time.elapsed().as_secs(),
            },
            "requests": {
                "total": data.total_requests,
                "active_connections": data.active_connections,
                "status_codes": status_codes,
                "top_paths": top_paths,
            },
            "latency_us": {
                "p50": p50,
                "p95": p95,
                "p99": p99,
                "avg": avg,
                "stddev": (stddev * 100.0).round() / 100.0,
                "samples": data.latencies.len(),
            }
        })
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        let data = self.inner.lock();
        let (p50, p95, p99, avg) = calculate_percentiles(&data.latencies);

        MetricsSnapshot {
            total_requests: data.total_requests,
            active_connections: data.active_connections,
            uptime_secs: self.start_time.elapsed().as_secs(),
            latency_p50_us: p50,
            latency_p95_us: p95,
            latency_p99_us: p99,
            latency_avg_us: avg,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// (p50, p95, p99, promedio)
fn calculate_percentiles(latencies: &VecDeque<u64>) -> (u64, u64, u64, u64) {
    if latencies.is_empty() {
        return (0, 0, 0, 0);
    }

    let mut sorted: Vec<u64> = latencies.iter().copied().collect();
    sorted.sort_unstable();

    let len = sorted.len();
    let avg = sorted.iter().sum::<u64>() / len as u64;

    (
        sorted[len * 50 / 100],
        sorted[len * 95 / 100],
        sorted[len * 99 / 100],
        avg,
    )
}

fn calculate_stddev(latencies: &VecDeque<u64>, avg: u64) -> f64 {
    if latencies.is_empty() {
        return 0.0;
    }

    let variance = latencies
        .iter()
        .map(|&x| {
            let diff = x as f64 - avg as f64;
            diff * diff
        })
        .sum::<f64>()
        / latencies.len() as f64;

    variance.sqrt()
}
