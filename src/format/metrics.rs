use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Process-wide counters updated on the frame encode and decode paths.
pub(crate) struct Metrics;

static FRAMES_ENCODED: AtomicU64 = AtomicU64::new(0);
static FRAMES_DECODED: AtomicU64 = AtomicU64::new(0);
static BYTES_ENCODED: AtomicU64 = AtomicU64::new(0);
static BYTES_DECODED: AtomicU64 = AtomicU64::new(0);
static CHECKSUM_FAILURES: AtomicU64 = AtomicU64::new(0);
static TRUNCATED_FRAMES: AtomicU64 = AtomicU64::new(0);
static PREFIX_BUILDS: AtomicU64 = AtomicU64::new(0);
static PREFIX_LATENCY_TOTAL_NS: AtomicU64 = AtomicU64::new(0);
static PREFIX_LATENCY_MAX_NS: AtomicU64 = AtomicU64::new(0);

const NANOSECONDS_PER_MICROSECOND: u128 = 1_000;

/// Direction of frame flow for counting.
#[derive(Clone, Copy)]
pub(crate) enum FrameDirection {
    Encoded,
    Decoded,
}

/// Kind of integrity failure observed on the read path.
#[derive(Clone, Copy)]
pub(crate) enum IntegrityFailure {
    Checksum,
    Truncated,
}

impl Metrics {
    #[inline]
    pub(crate) fn record_frame(direction: FrameDirection, payload_len: usize) {
        let len = payload_len as u64;
        match direction {
            FrameDirection::Encoded => {
                FRAMES_ENCODED.fetch_add(1, Ordering::Relaxed);
                BYTES_ENCODED.fetch_add(len, Ordering::Relaxed);
            }
            FrameDirection::Decoded => {
                FRAMES_DECODED.fetch_add(1, Ordering::Relaxed);
                BYTES_DECODED.fetch_add(len, Ordering::Relaxed);
            }
        }
    }

    #[inline]
    pub(crate) fn record_failure(kind: IntegrityFailure) {
        match kind {
            IntegrityFailure::Checksum => CHECKSUM_FAILURES.fetch_add(1, Ordering::Relaxed),
            IntegrityFailure::Truncated => TRUNCATED_FRAMES.fetch_add(1, Ordering::Relaxed),
        };
    }

    #[inline]
    pub(crate) fn record_prefix_latency(duration: Duration) {
        let nanos = duration
            .as_nanos()
            .min(u64::MAX as u128)
            .try_into()
            .unwrap_or(u64::MAX);

        PREFIX_BUILDS.fetch_add(1, Ordering::Relaxed);
        PREFIX_LATENCY_TOTAL_NS.fetch_add(nanos, Ordering::Relaxed);
        update_max(&PREFIX_LATENCY_MAX_NS, nanos);
    }
}

/// Read the current process-wide counters.
#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        frames_encoded: FRAMES_ENCODED.load(Ordering::Relaxed),
        frames_decoded: FRAMES_DECODED.load(Ordering::Relaxed),
        bytes_encoded: BYTES_ENCODED.load(Ordering::Relaxed),
        bytes_decoded: BYTES_DECODED.load(Ordering::Relaxed),
        checksum_failures: CHECKSUM_FAILURES.load(Ordering::Relaxed),
        truncated_frames: TRUNCATED_FRAMES.load(Ordering::Relaxed),
        prefix_builds: PREFIX_BUILDS.load(Ordering::Relaxed),
        prefix_latency_total_ns: PREFIX_LATENCY_TOTAL_NS.load(Ordering::Relaxed),
        prefix_latency_max_ns: PREFIX_LATENCY_MAX_NS.load(Ordering::Relaxed),
    }
}

fn update_max(target: &AtomicU64, candidate: u64) {
    let mut current = target.load(Ordering::Relaxed);
    while candidate > current {
        match target.compare_exchange_weak(
            current,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return,
            Err(old) => current = old,
        }
    }
}

/// Point-in-time copy of the framing counters.
#[derive(Default, Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    /// Frames appended to an output buffer
    pub frames_encoded: u64,
    /// Frames that passed verification on read
    pub frames_decoded: u64,
    /// Payload bytes in encoded frames
    pub bytes_encoded: u64,
    /// Payload bytes in decoded frames
    pub bytes_decoded: u64,
    /// Frames rejected for a CRC32 mismatch
    pub checksum_failures: u64,
    /// Frames rejected for a size field no available bytes can satisfy
    pub truncated_frames: u64,
    /// Successful prefix builds
    pub prefix_builds: u64,
    /// Sum of prefix build durations
    pub prefix_latency_total_ns: u64,
    /// Slowest prefix build
    pub prefix_latency_max_ns: u64,
}

impl MetricsSnapshot {
    /// Average frame prefix build latency in microseconds.
    #[must_use]
    pub fn avg_prefix_latency_us(&self) -> Option<u64> {
        if self.prefix_builds == 0 {
            return None;
        }

        let total_ns = u128::from(self.prefix_latency_total_ns);
        Some((total_ns / (u128::from(self.prefix_builds) * NANOSECONDS_PER_MICROSECOND)) as u64)
    }
}
