use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct CooldownGate {
    per_ip: Duration,
    global: Duration,
    state: Arc<Mutex<CooldownState>>,
}

#[derive(Debug, Default)]
struct CooldownState {
    last_hit_by_ip: HashMap<String, Instant>,
    last_global_hit: Option<Instant>,
}

impl CooldownGate {
    pub fn new(per_ip: Duration, global: Duration) -> Self {
        Self {
            per_ip,
            global,
            state: Arc::new(Mutex::new(CooldownState::default())),
        }
    }

    // Ok admits the request and stamps both windows; Err carries the
    // remaining whole seconds for the caller's Retry-After header. A request
    // rejected by either window stamps nothing.
    pub async fn check(&self, ip: &str) -> std::result::Result<(), u64> {
        let now = Instant::now();
        let mut state = self.state.lock().await;

        if !self.per_ip.is_zero() {
            if let Some(last) = state.last_hit_by_ip.get(ip) {
                let elapsed = now.duration_since(*last);
                if elapsed < self.per_ip {
                    return Err(remaining_secs(self.per_ip - elapsed));
                }
            }
        }

        if !self.global.is_zero() {
            if let Some(last) = state.last_global_hit {
                let elapsed = now.duration_since(last);
                if elapsed < self.global {
                    return Err(remaining_secs(self.global - elapsed));
                }
            }
        }

        state.last_hit_by_ip.insert(ip.to_string(), now);
        if !self.global.is_zero() {
            state.last_global_hit = Some(now);
        }

        Ok(())
    }

    pub async fn sweep(&self) {
        let horizon = self.per_ip.max(SWEEP_INTERVAL);
        let now = Instant::now();
        let mut state = self.state.lock().await;
        state
            .last_hit_by_ip
            .retain(|_, last| now.duration_since(*last) <= horizon);
    }

    pub fn spawn_sweeper(&self) {
        let gate = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                gate.sweep().await;
            }
        });
    }

    pub async fn tracked_ips(&self) -> usize {
        self.state.lock().await.last_hit_by_ip.len()
    }
}

fn remaining_secs(remaining: Duration) -> u64 {
    (remaining.as_millis() as u64 + 999) / 1000
}
