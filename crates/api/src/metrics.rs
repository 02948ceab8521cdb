use extract::ResultSummary;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Timing (in microseconds)
    total_extract_time_us: AtomicU64,
    extract_runs: AtomicUsize,

    // Counts
    total_documents_parsed: AtomicUsize,
    total_characters_found: AtomicUsize,
    total_locations_found: AtomicUsize,
    total_relationships_found: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            total_extract_time_us: AtomicU64::new(0),
            extract_runs: AtomicUsize::new(0),
            total_documents_parsed: AtomicUsize::new(0),
            total_characters_found: AtomicUsize::new(0),
            total_locations_found: AtomicUsize::new(0),
            total_relationships_found: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Any single analyzer call (characters, locations, relationships)
    pub fn record_extract(&self, duration: Duration) {
        self.total_extract_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.extract_runs.fetch_add(1, Ordering::Relaxed);
    }

    /// A full corpus parse
    pub fn record_parse(&self, duration: Duration, documents: usize, summary: ResultSummary) {
        self.record_extract(duration);
        self.total_documents_parsed.fetch_add(documents, Ordering::Relaxed);
        self.total_characters_found
            .fetch_add(summary.characters, Ordering::Relaxed);
        self.total_locations_found
            .fetch_add(summary.locations, Ordering::Relaxed);
        self.total_relationships_found
            .fetch_add(summary.relationships, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let runs = self.extract_runs.load(Ordering::Relaxed);
        let total_us = self.total_extract_time_us.load(Ordering::Relaxed) as f64;

        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            extract_runs: runs,
            avg_extract_time_ms: if runs > 0 {
                total_us / runs as f64 / 1000.0 // Convert to ms
            } else {
                0.0
            },
            total_documents_parsed: self.total_documents_parsed.load(Ordering::Relaxed),
            total_characters_found: self.total_characters_found.load(Ordering::Relaxed),
            total_locations_found: self.total_locations_found.load(Ordering::Relaxed),
            total_relationships_found: self.total_relationships_found.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub extract_runs: usize,
    pub avg_extract_time_ms: f64,
    pub total_documents_parsed: usize,
    pub total_characters_found: usize,
    pub total_locations_found: usize,
    pub total_relationships_found: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();
        metrics.record_request(true);
        metrics.record_request(false);
        metrics.record_parse(
            Duration::from_millis(4),
            3,
            ResultSummary {
                characters: 2,
                locations: 1,
                relationships: 1,
            },
        );
        metrics.record_extract(Duration::from_millis(2));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.failed_requests, 1);
        assert_eq!(snapshot.extract_runs, 2);
        assert_eq!(snapshot.total_documents_parsed, 3);
        assert_eq!(snapshot.total_characters_found, 2);
        assert!((snapshot.avg_extract_time_ms - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Metrics::new().snapshot();
        assert_eq!(snapshot.avg_extract_time_ms, 0.0);
    }
}
