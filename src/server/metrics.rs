use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpRecord {
    pub count: u64,
    pub last_at: u64,
    pub last_status: u16,
    pub last_chars: usize,
    pub status_counts: HashMap<u16, u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub started_at: u64,
    pub total_requests: u64,
    #[serde(rename = "totalDeepLCalls")]
    pub total_deepl_calls: u64,
    pub http_2xx: u64,
    pub http_4xx: u64,
    pub http_5xx: u64,
    pub http_429: u64,
    pub per_ip: HashMap<String, IpRecord>,
}

#[derive(Debug)]
pub struct MetricsRegistry {
    started_at: u64,
    total_requests: AtomicU64,
    total_deepl_calls: AtomicU64,
    http_2xx: AtomicU64,
    http_4xx: AtomicU64,
    http_5xx: AtomicU64,
    http_429: AtomicU64,
    per_ip: RwLock<HashMap<String, IpRecord>>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            started_at: unix_now(),
            total_requests: AtomicU64::new(0),
            total_deepl_calls: AtomicU64::new(0),
            http_2xx: AtomicU64::new(0),
            http_4xx: AtomicU64::new(0),
            http_5xx: AtomicU64::new(0),
            http_429: AtomicU64::new(0),
            per_ip: RwLock::new(HashMap::new()),
        }
    }

    pub async fn note(&self, ip: &str, status: u16, deepl_calls: u64, chars: usize) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_deepl_calls
            .fetch_add(deepl_calls, Ordering::Relaxed);

        // 429s count toward both their own bucket and the 4xx class
        if status >= 500 {
            self.http_5xx.fetch_add(1, Ordering::Relaxed);
        } else if status == 429 {
            self.http_429.fetch_add(1, Ordering::Relaxed);
            self.http_4xx.fetch_add(1, Ordering::Relaxed);
        } else if status >= 400 {
            self.http_4xx.fetch_add(1, Ordering::Relaxed);
        } else {
            self.http_2xx.fetch_add(1, Ordering::Relaxed);
        }

        let mut per_ip = self.per_ip.write().await;
        let record = per_ip.entry(ip.to_string()).or_default();
        record.count += 1;
        record.last_at = unix_now();
        record.last_status = status;
        record.last_chars = chars;
        *record.status_counts.entry(status).or_insert(0) += 1;
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            started_at: self.started_at,
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_deepl_calls: self.total_deepl_calls.load(Ordering::Relaxed),
            http_2xx: self.http_2xx.load(Ordering::Relaxed),
            http_4xx: self.http_4xx.load(Ordering::Relaxed),
            http_5xx: self.http_5xx.load(Ordering::Relaxed),
            http_429: self.http_429.load(Ordering::Relaxed),
            per_ip: self.per_ip.read().await.clone(),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
