use crate::event::LogEvent;
use std::time::{Duration, Instant};

/// Events accumulated since the last flush, plus the flush marker.
///
/// Owned exclusively by the engine loop; no locking. Flushing is driven
/// purely by wall-clock elapsed time, never by event content. If a flush is
/// delayed long enough to span several window intervals, splitting the
/// backlog into correctly-bounded windows is the aggregator's job, not the
/// buffer's.
pub struct WindowBuffer {
    events: Vec<LogEvent>,
    last_flush: Instant,
    flush_interval: Duration,
}

impl WindowBuffer {
    pub fn new(now: Instant, flush_interval: Duration) -> Self {
        Self {
            events: Vec::new(),
            last_flush: now,
            flush_interval,
        }
    }

    /// Append an event at the tail, in receipt order.
    pub fn append(&mut self, event: LogEvent) {
        self.events.push(event);
    }

    /// True once a full flush interval has elapsed since the last flush.
    pub fn should_flush(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_flush) >= self.flush_interval
    }

    /// Hand off the buffered events by move and reset the flush marker.
    pub fn take_and_reset(&mut self, now: Instant) -> Vec<LogEvent> {
        self.last_flush = now;
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
