use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Process-wide monotonic request counters, mirroring the original
/// `Analytics` singleton's fields. Concurrent increments are benign —
/// there is no ordering requirement between counters, only monotonicity.
#[derive(Debug)]
pub struct Analytics {
    pub gets: AtomicU64,
    pub posts: AtomicU64,
    pub invalid: AtomicU64,
    pub malicious: AtomicU64,
    pub health: AtomicU64,
    start_time: Instant,
}

impl Default for Analytics {
    fn default() -> Self {
        Analytics {
            gets: AtomicU64::new(0),
            posts: AtomicU64::new(0),
            invalid: AtomicU64::new(0),
            malicious: AtomicU64::new(0),
            health: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }
}

impl Analytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_post(&self) {
        self.posts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid(&self) {
        self.invalid.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malicious(&self) {
        self.malicious.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_health(&self) {
        self.health.fetch_add(1, Ordering::Relaxed);
    }

    /// Renders an HTML fragment summarizing uptime and request counts,
    /// matching the original `Analytics::report()`; this is what `GET
    /// /health` returns.
    pub fn report(&self) -> String {
        let uptime = self.start_time.elapsed().as_secs();
        let days = uptime / 86400;
        let hours = (uptime % 86400) / 3600;
        let minutes = (uptime % 3600) / 60;
        let seconds = uptime % 60;

        let gets = self.gets.load(Ordering::Relaxed);
        let posts = self.posts.load(Ordering::Relaxed);
        let invalid = self.invalid.load(Ordering::Relaxed);
        let malicious = self.malicious.load(Ordering::Relaxed);
        let health = self.health.load(Ordering::Relaxed);
        let total = gets + posts + invalid + malicious + health;

        format!(
            "<!doctype html><html><head><link rel=\"icon\" href=\"data:,\">\
             <title>Analytics</title></head><body><pre>\
             Uptime: {days}d {hours}h {minutes}m {seconds}s\n\n\
             Requests served: {total}\n\
             - {gets} valid (GET)\n\
             - {posts} valid (POST)\n\
             - {invalid} invalid\n\
             - {malicious} malicious\n\
             - {health} health checks\n\
             </pre></body></html>"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero_and_accumulate() {
        let a = Analytics::new();
        assert_eq!(a.gets.load(Ordering::Relaxed), 0);
        a.record_get();
        a.record_get();
        a.record_post();
        a.record_malicious();
        assert_eq!(a.gets.load(Ordering::Relaxed), 2);
        assert_eq!(a.posts.load(Ordering::Relaxed), 1);
        assert_eq!(a.malicious.load(Ordering::Relaxed), 1);
        let report = a.report();
        assert!(report.contains("Requests served: 4"));
    }
}
