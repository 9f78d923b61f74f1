use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    ingest_requests: AtomicU64,
    ingest_events: AtomicU64,
    ingest_duplicates: AtomicU64,
    ingest_rejects: AtomicU64,
    ingest_errors: AtomicU64,
    remove_audits: AtomicU64,
    bulk_removed_events: AtomicU64,
}

impl Metrics {
    pub fn record_ingest(&self, inserted: usize, duplicates: usize, rejects: usize) {
        self.ingest_requests.fetch_add(1, Ordering::Relaxed);
        self.ingest_events
            .fetch_add(inserted as u64, Ordering::Relaxed);
        self.ingest_duplicates
            .fetch_add(duplicates as u64, Ordering::Relaxed);
        self.ingest_rejects
            .fetch_add(rejects as u64, Ordering::Relaxed);
    }

    pub fn record_ingest_error(&self) {
        self.ingest_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_remove_audit(&self) {
        self.remove_audits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bulk_removed(&self, count: u64) {
        self.bulk_removed_events.fetch_add(count, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let requests = self.ingest_requests.load(Ordering::Relaxed);
        let events = self.ingest_events.load(Ordering::Relaxed);
        let duplicates = self.ingest_duplicates.load(Ordering::Relaxed);
        let rejects = self.ingest_rejects.load(Ordering::Relaxed);
        let errors = self.ingest_errors.load(Ordering::Relaxed);
        let audits = self.remove_audits.load(Ordering::Relaxed);
        let removed = self.bulk_removed_events.load(Ordering::Relaxed);

        format!(
            "# TYPE scantrail_ingest_requests_total counter\n\
scantrail_ingest_requests_total {}\n\
# TYPE scantrail_ingest_events_total counter\n\
scantrail_ingest_events_total {}\n\
# TYPE scantrail_ingest_duplicates_total counter\n\
scantrail_ingest_duplicates_total {}\n\
# TYPE scantrail_ingest_rejects_total counter\n\
scantrail_ingest_rejects_total {}\n\
# TYPE scantrail_ingest_errors_total counter\n\
scantrail_ingest_errors_total {}\n\
# TYPE scantrail_remove_audits_total counter\n\
scantrail_remove_audits_total {}\n\
# TYPE scantrail_bulk_removed_events_total counter\n\
scantrail_bulk_removed_events_total {}\n",
            requests, events, duplicates, rejects, errors, audits, removed
        )
    }
}
