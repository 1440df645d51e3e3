//! Bounded batch writer.
//!
//! Records accumulate up to a fixed capacity, are flushed to a sink as one
//! atomic batch, and accumulation continues. A failed batch is retried one
//! record at a time so a single bad record costs only itself.

use tracing::{debug, warn};

/// Default number of records per batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Destination for batched records.
pub trait BatchSink<T> {
    /// Error raised by a failed write.
    type Error: core::fmt::Display;

    /// Write all `items` atomically.
    fn write_batch(&mut self, items: &[T]) -> Result<(), Self::Error>;
}

/// Totals for everything pushed through a [`BatchWriter`].
#[derive(Debug)]
pub struct BatchReport<T> {
    /// Records written.
    pub written: usize,
    /// Batches flushed, counting per-record retries as one batch each.
    pub batches: usize,
    /// Records that could not be written even on their own.
    pub failed: Vec<T>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            written: 0,
            batches: 0,
            failed: Vec::new(),
        }
    }
}

/// Accumulate-flush-continue writer.
#[derive(Debug)]
pub struct BatchWriter<T> {
    capacity: usize,
    pending: Vec<T>,
    report: BatchReport<T>,
}

impl<T> Default for BatchWriter<T> {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl<T> BatchWriter<T> {
    /// A writer flushing every `capacity` records (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            pending: Vec::with_capacity(capacity),
            report: BatchReport::default(),
        }
    }

    /// Queue a record, flushing first if the batch is full.
    pub fn push<S: BatchSink<T>>(&mut self, item: T, sink: &mut S) {
        self.pending.push(item);
        if self.pending.len() >= self.capacity {
            self.flush(sink);
        }
    }

    /// Records queued but not yet flushed.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Write everything queued.
    pub fn flush<S: BatchSink<T>>(&mut self, sink: &mut S) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);
        self.report.batches = self.report.batches.saturating_add(1);

        match sink.write_batch(&batch) {
            Ok(()) => {
                self.report.written = self.report.written.saturating_add(batch.len());
                debug!(count = batch.len(), "Flushed batch");
            }
            Err(e) => {
                warn!(count = batch.len(), error = %e, "Batch write failed, retrying per record");
                for item in batch {
                    self.report.batches = self.report.batches.saturating_add(1);
                    match sink.write_batch(std::slice::from_ref(&item)) {
                        Ok(()) => self.report.written = self.report.written.saturating_add(1),
                        Err(e) => {
                            warn!(error = %e, "Record skipped after failed write");
                            self.report.failed.push(item);
                        }
                    }
                }
            }
        }
    }

    /// Flush the remainder and return the totals.
    pub fn finish<S: BatchSink<T>>(mut self, sink: &mut S) -> BatchReport<T> {
        self.flush(sink);
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        batches: Vec<Vec<u32>>,
        reject: Option<u32>,
    }

    impl BatchSink<u32> for RecordingSink {
        type Error = String;

        fn write_batch(&mut self, items: &[u32]) -> Result<(), String> {
            if let Some(bad) = self.reject.filter(|b| items.contains(b)) {
                return Err(format!("rejected {bad}"));
            }
            self.batches.push(items.to_vec());
            Ok(())
        }
    }

    #[test]
    fn flushes_at_capacity_and_on_finish() {
        let mut sink = RecordingSink::default();
        let mut writer = BatchWriter::new(3);
        for i in 0..7 {
            writer.push(i, &mut sink);
        }
        assert_eq!(writer.pending(), 1);
        let report = writer.finish(&mut sink);

        assert_eq!(report.written, 7);
        assert_eq!(report.batches, 3);
        assert!(report.failed.is_empty());
        let sizes: Vec<usize> = sink.batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn failed_batch_is_retried_per_record() {
        let mut sink = RecordingSink {
            reject: Some(4),
            ..RecordingSink::default()
        };
        let mut writer = BatchWriter::new(5);
        for i in 0..5 {
            writer.push(i, &mut sink);
        }
        let report = writer.finish(&mut sink);

        assert_eq!(report.written, 4);
        assert_eq!(report.failed, vec![4]);
        assert_eq!(sink.batches.len(), 4);
    }

    #[test]
    fn zero_capacity_is_treated_as_one() {
        let mut sink = RecordingSink::default();
        let mut writer = BatchWriter::new(0);
        writer.push(1, &mut sink);
        assert_eq!(writer.pending(), 0);
        assert_eq!(writer.finish(&mut sink).written, 1);
    }
}
