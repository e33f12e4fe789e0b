use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

const LATENCY_WINDOW: usize = 10_000;

pub struct Observability {
    requests_total: AtomicU64,
    request_errors_total: AtomicU64,
    connections_total: AtomicU64,
    request_latency_us: Mutex<VecDeque<u64>>,
}

impl Observability {
    fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            request_errors_total: AtomicU64::new(0),
            connections_total: AtomicU64::new(0),
            request_latency_us: Mutex::new(VecDeque::with_capacity(LATENCY_WINDOW)),
        }
    }

    pub fn record_connection(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_request(&self, latency: Duration, ok: bool) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.request_errors_total.fetch_add(1, Ordering::Relaxed);
        }
        let us = latency.as_micros() as u64;
        // a poisoned window only loses latency samples
        if let Ok(mut lock) = self.request_latency_us.lock() {
            if lock.len() >= LATENCY_WINDOW {
                lock.pop_front();
            }
            lock.push_back(us);
        }
    }

    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    pub fn request_errors_total(&self) -> u64 {
        self.request_errors_total.load(Ordering::Relaxed)
    }

    fn p99_latency_us(&self) -> u64 {
        let Ok(lock) = self.request_latency_us.lock() else {
            return 0;
        };
        if lock.is_empty() {
            return 0;
        }
        let mut v: Vec<u64> = lock.iter().copied().collect();
        v.sort_unstable();
        let idx = ((v.len() as f64) * 0.99).floor() as usize;
        v[idx.min(v.len() - 1)]
    }

    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();
        out.push_str("# TYPE swiftqueue_requests_total counter\n");
        out.push_str(&format!(
            "swiftqueue_requests_total {}\n",
            self.requests_total()
        ));
        out.push_str("# TYPE swiftqueue_request_errors_total counter\n");
        out.push_str(&format!(
            "swiftqueue_request_errors_total {}\n",
            self.request_errors_total()
        ));
        out.push_str("# TYPE swiftqueue_connections_total counter\n");
        out.push_str(&format!(
            "swiftqueue_connections_total {}\n",
            self.connections_total.load(Ordering::Relaxed)
        ));
        out.push_str("# TYPE swiftqueue_request_latency_p99_us gauge\n");
        out.push_str(&format!(
            "swiftqueue_request_latency_p99_us {}\n",
            self.p99_latency_us()
        ));
        out
    }
}

static OBS: OnceLock<Observability> = OnceLock::new();

pub fn observability() -> &'static Observability {
    OBS.get_or_init(Observability::new)
}
