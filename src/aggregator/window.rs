use crate::event::LogEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Aggregate result for one tumbling window. A pure function of the events
/// whose timestamps fall in `[window_start, window_end)`; never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowStat {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_count: u64,
    pub error_count: u64,
    pub top_service: String,
}

#[derive(Default)]
struct WindowAccumulator {
    total: u64,
    errors: u64,
    services: HashMap<String, ServiceTally>,
}

struct ServiceTally {
    count: u64,
    /// Receipt-order index of this service's first event in the flush,
    /// used as the deterministic tie-break.
    first_seen: usize,
}

/// Partition a flushed buffer into epoch-aligned tumbling windows and compute
/// per-window statistics, ascending by `window_start`.
///
/// Window boundaries are exact multiples of `window_size` from the Unix
/// epoch, so they are reproducible across restarts. Single pass, one
/// accumulator per distinct window touched by the input; empty windows are
/// never constructed.
pub fn aggregate(events: &[LogEvent], window_size: Duration) -> Vec<WindowStat> {
    let window_millis = window_size.as_millis() as i64;
    if events.is_empty() || window_millis == 0 {
        return Vec::new();
    }

    let mut windows: BTreeMap<i64, WindowAccumulator> = BTreeMap::new();

    for (order, event) in events.iter().enumerate() {
        // Truncate toward negative infinity so pre-epoch timestamps still
        // land in the window below them.
        let start_millis =
            event.timestamp.timestamp_millis().div_euclid(window_millis) * window_millis;

        let acc = windows.entry(start_millis).or_default();
        acc.total += 1;
        if event.level.is_error() {
            acc.errors += 1;
        }
        acc.services
            .entry(event.service.clone())
            .or_insert(ServiceTally {
                count: 0,
                first_seen: order,
            })
            .count += 1;
    }

    windows
        .into_iter()
        .map(|(start_millis, acc)| WindowStat {
            window_start: datetime_at(start_millis),
            window_end: datetime_at(start_millis.saturating_add(window_millis)),
            total_count: acc.total,
            error_count: acc.errors,
            top_service: top_service(&acc.services),
        })
        .collect()
}

/// Window bounds near the edges of chrono's representable range saturate
/// instead of panicking; a decoded timestamp is always in range, but its
/// window boundary can fall just outside it.
fn datetime_at(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(if millis > 0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

/// Service with the highest occurrence count. Ties go to the service whose
/// first event arrived earliest; equal first occurrence is impossible within
/// one flush, but the lexicographically smallest name is the final fallback.
fn top_service(services: &HashMap<String, ServiceTally>) -> String {
    let mut best: Option<(&String, &ServiceTally)> = None;

    for (name, tally) in services {
        let replace = match best {
            None => true,
            Some((best_name, best_tally)) => {
                tally.count > best_tally.count
                    || (tally.count == best_tally.count
                        && tally.first_seen < best_tally.first_seen)
                    || (tally.count == best_tally.count
                        && tally.first_seen == best_tally.first_seen
                        && name.as_str() < best_name.as_str())
            }
        };
        if replace {
            best = Some((name, tally));
        }
    }

    best.map(|(name, _)| name.clone()).unwrap_or_default()
}
