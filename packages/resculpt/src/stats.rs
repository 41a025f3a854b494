//! Lightweight transformation counters.
//!
//! Atomic counters shared by every transformation an engine runs; cheap
//! enough to leave always-on. Exposed as point-in-time snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

/// Internal counter block; one per engine.
#[derive(Debug, Default)]
pub(crate) struct EngineStats {
    transforms: AtomicU64,
    chunks: AtomicU64,
    bytes_in: AtomicU64,
    bytes_out: AtomicU64,
    write_errors: AtomicU64,
}

impl EngineStats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_chunk(&self, bytes_in: usize, bytes_out: usize) {
        self.chunks.fetch_add(1, Ordering::Relaxed);
        self.bytes_in.fetch_add(bytes_in as u64, Ordering::Relaxed);
        self.bytes_out
            .fetch_add(bytes_out as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_tail(&self, bytes_out: usize) {
        self.bytes_out
            .fetch_add(bytes_out as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_transform(&self) {
        self.transforms.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            transforms: self.transforms.load(Ordering::Relaxed),
            chunks: self.chunks.load(Ordering::Relaxed),
            bytes_in: self.bytes_in.load(Ordering::Relaxed),
            bytes_out: self.bytes_out.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time counters for one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Completed transformations.
    pub transforms: u64,
    /// Chunks fed through the engine.
    pub chunks: u64,
    /// Input bytes consumed.
    pub bytes_in: u64,
    /// Output bytes produced.
    pub bytes_out: u64,
    /// Transformations aborted by a sink write failure.
    pub write_errors: u64,
}
