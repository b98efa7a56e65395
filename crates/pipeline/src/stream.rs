//! Newline-delimited JSON telemetry stream

use std::collections::HashMap;

use accident_detection::AccidentDetector;
use serde_json::Value;
use telemetry::SpeedHistory;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Session key for records without a `vehicle_id`
pub const DEFAULT_SESSION: &str = "default";

/// Default cap on concurrently tracked vehicles
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct Session {
    history: SpeedHistory,
    last_seen: u64,
}

/// Speed histories keyed by vehicle.
///
/// Holds at most `max_sessions` vehicles; opening a session beyond that
/// drops the one seen least recently.
#[derive(Debug)]
pub struct SessionStore {
    capacity: usize,
    max_sessions: usize,
    clock: u64,
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new(capacity: usize, max_sessions: usize) -> Self {
        Self {
            capacity,
            max_sessions: max_sessions.max(1),
            clock: 0,
            sessions: HashMap::new(),
        }
    }

    /// History for a vehicle, created empty on first use
    pub fn history(&mut self, vehicle_id: &str) -> &mut SpeedHistory {
        self.clock += 1;

        if !self.sessions.contains_key(vehicle_id) && self.sessions.len() >= self.max_sessions {
            self.evict_oldest();
        }

        let capacity = self.capacity;
        let session = self
            .sessions
            .entry(vehicle_id.to_string())
            .or_insert_with(|| {
                debug!("Opening session for vehicle {}", vehicle_id);
                Session {
                    history: SpeedHistory::new(capacity),
                    last_seen: 0,
                }
            });
        session.last_seen = self.clock;
        &mut session.history
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, session)| session.last_seen)
            .map(|(id, _)| id.clone());

        if let Some(id) = oldest {
            debug!("Dropping idle session for vehicle {}", id);
            self.sessions.remove(&id);
        }
    }

    pub fn contains(&self, vehicle_id: &str) -> bool {
        self.sessions.contains_key(vehicle_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Counters reported when the stream ends
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    /// Frames evaluated
    pub frames: u64,
    /// Lines that were not valid telemetry
    pub rejected: u64,
    /// Frames classified as an accident
    pub accidents: u64,
    /// Vehicle sessions held when the stream ended
    pub sessions: usize,
}

fn vehicle_id(record: &Value) -> String {
    match record.get("vehicle_id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => DEFAULT_SESSION.to_string(),
    }
}

/// Evaluate every line of `input` and write one prediction per line to `output`.
///
/// Malformed lines are logged and counted but do not stop the stream. Each
/// frame is evaluated against the speeds seen before it; its own speed is
/// recorded afterwards.
pub async fn process_stream<R, W>(
    detector: &AccidentDetector,
    sessions: &mut SessionStore,
    input: R,
    mut output: W,
) -> anyhow::Result<StreamSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = StreamSummary::default();
    let mut lines = input.lines();
    let mut line_number = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: Value = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping line {}: invalid JSON: {}", line_number, e);
                summary.rejected += 1;
                continue;
            }
        };

        let frame = match preprocessor::preprocess(&record) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping line {}: {}", line_number, e);
                summary.rejected += 1;
                continue;
            }
        };

        let history = sessions.history(&vehicle_id(&record));
        let result = detector.evaluate(&frame, history.as_slice());
        history.push(frame.speed());

        summary.frames += 1;
        if result.is_accident {
            summary.accidents += 1;
        }

        let mut encoded = serde_json::to_vec(&result)?;
        encoded.push(b'\n');
        output.write_all(&encoded).await?;
    }

    output.flush().await?;
    summary.sessions = sessions.len();

    info!(
        "Stream finished: {} frames, {} rejected, {} accidents across {} sessions",
        summary.frames, summary.rejected, summary.accidents, summary.sessions
    );

    Ok(summary)
}
