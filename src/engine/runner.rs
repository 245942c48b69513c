use crate::aggregator::{aggregate, WindowBuffer};
use crate::config::Config;
use crate::event::decode;
use crate::publish::StatPublisher;
use crate::transport::{EventSource, StatSink, TransportError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Fatal engine failures. Everything recoverable (decode failures, publish
/// failures, empty flushes) is handled inside the loop and only counted.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("input stream closed")]
    InputClosed,
}

/// Counters accumulated over the engine's lifetime, logged on shutdown.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EngineReport {
    pub events_decoded: u64,
    pub decode_failures: u64,
    pub flushes: u64,
    pub windows_published: u64,
    pub publish_failures: u64,
}

/// Drive the aggregation cycle until shutdown: poll for inbound messages
/// with a bounded wait, append decoded events to the buffer, and flush the
/// buffer through the aggregator and publisher once per flush interval.
///
/// A single task owns all mutable state, so no locking is needed around the
/// buffer. The bounded poll keeps flush checks timely even when the input
/// channel is quiet; the shutdown watch channel interrupts the poll promptly.
/// On exit (signal, stream end, or transport failure) one best-effort final
/// flush drains whatever is buffered.
pub async fn run_engine<S, K>(
    mut source: S,
    sink: K,
    config: &Config,
    mut shutdown: watch::Receiver<bool>,
) -> Result<EngineReport, EngineError>
where
    S: EventSource,
    K: StatSink,
{
    let window_size = config.aggregator.window_size;
    let poll_timeout = config.aggregator.poll_timeout;

    let mut publisher = StatPublisher::new(sink, config.transport.output_channel.clone());
    let mut buffer = WindowBuffer::new(Instant::now(), window_size);
    let mut report = EngineReport::default();

    info!(
        window_size = ?window_size,
        poll_timeout = ?poll_timeout,
        output_channel = %config.transport.output_channel,
        "Aggregation engine started"
    );

    let exit = loop {
        tokio::select! {
            _ = shutdown.changed() => {
                info!("Shutdown requested, flushing remaining events");
                break None;
            }

            polled = timeout(poll_timeout, source.next_event()) => {
                match polled {
                    Ok(Some(Ok(payload))) => match decode(&payload) {
                        Ok(event) => {
                            report.events_decoded += 1;
                            buffer.append(event);
                        }
                        Err(e) => {
                            report.decode_failures += 1;
                            warn!(error = %e, "Dropping undecodable message");
                        }
                    },
                    Ok(Some(Err(e))) => break Some(EngineError::Transport(e)),
                    Ok(None) => {
                        warn!("Input stream closed");
                        break Some(EngineError::InputClosed);
                    }
                    Err(_) => {
                        // Poll window elapsed with no message; fall through
                        // to the flush check.
                    }
                }
            }
        }

        if buffer.should_flush(Instant::now()) {
            flush_cycle(&mut buffer, &mut publisher, window_size, &mut report).await;
        }
    };

    // Best-effort final flush. If the transport is already gone the publish
    // failure is counted like any other.
    flush_cycle(&mut buffer, &mut publisher, window_size, &mut report).await;

    info!(
        events_decoded = report.events_decoded,
        decode_failures = report.decode_failures,
        flushes = report.flushes,
        windows_published = report.windows_published,
        publish_failures = report.publish_failures,
        "Aggregation engine stopped"
    );

    match exit {
        Some(error) => Err(error),
        None => Ok(report),
    }
}

/// Take ownership of the buffered events, aggregate, publish. An empty
/// buffer resets the flush marker but produces no output and no side effect.
async fn flush_cycle<K: StatSink>(
    buffer: &mut WindowBuffer,
    publisher: &mut StatPublisher<K>,
    window_size: Duration,
    report: &mut EngineReport,
) {
    let events = buffer.take_and_reset(Instant::now());
    if events.is_empty() {
        return;
    }

    let stats = aggregate(&events, window_size);
    report.flushes += 1;
    debug!(
        events = events.len(),
        windows = stats.len(),
        "Flushing window buffer"
    );

    match publisher.publish(&stats).await {
        Ok(()) => report.windows_published += stats.len() as u64,
        Err(e) => {
            report.publish_failures += 1;
            warn!(
                error = %e,
                windows = stats.len(),
                "Publish failed, stats for this cycle are lost"
            );
        }
    }
}
