//! Load/store event traces.
//!
//! Traces are JSON-lines: one [`TraceEvent`] object per line, tagged by `op`.
//! Blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! {"op":"store","pc":4198400,"addr":268435456,"size":8,"value":99}
//! {"op":"load","pc":4198416,"addr":268435456,"size":8,"value":99}
//! {"op":"load","pc":4198432,"addr":268435464,"size":4}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::SimError;

/// One executed memory instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum TraceEvent {
    /// A load instruction.
    Load {
        /// Program counter of the load.
        pc: u64,
        /// Effective address.
        addr: u64,
        /// Access width in bytes.
        size: usize,
        /// Value memory held when the load executed.
        ///
        /// When absent, the load reads whatever the replayed memory image
        /// currently holds (possibly unmapped).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<u64>,
    },
    /// A store instruction.
    Store {
        /// Program counter of the store.
        pc: u64,
        /// Effective address.
        addr: u64,
        /// Access width in bytes.
        size: usize,
        /// Value written, when the instrumentation could determine it.
        ///
        /// Stores without a value are not reported to the engine.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<u64>,
    },
}

impl TraceEvent {
    /// Program counter of the instruction.
    pub const fn pc(&self) -> u64 {
        match *self {
            Self::Load { pc, .. } | Self::Store { pc, .. } => pc,
        }
    }

    /// Returns `true` for loads.
    pub const fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}

/// Parses a JSON-lines trace.
///
/// # Errors
///
/// Returns [`SimError::Io`] on read failure and [`SimError::TraceParse`]
/// (with a one-based line number) for malformed lines.
pub fn read_trace<R: BufRead>(reader: R) -> Result<Vec<TraceEvent>, SimError> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(text).map_err(|source| SimError::TraceParse {
            line: idx + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Writes `events` as JSON-lines.
///
/// # Errors
///
/// Returns [`SimError::Io`] or [`SimError::Json`] if writing fails.
pub fn write_trace<W: Write>(mut writer: W, events: &[TraceEvent]) -> Result<(), SimError> {
    for event in events {
        serde_json::to_writer(&mut writer, event)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a JSON-lines trace file.
///
/// # Errors
///
/// Same as [`read_trace`], plus [`SimError::Io`] if the file cannot be opened.
pub fn load_trace_file(path: impl AsRef<Path>) -> Result<Vec<TraceEvent>, SimError> {
    let file = File::open(path)?;
    read_trace(BufReader::new(file))
}

/// Writes a JSON-lines trace file, replacing any existing file.
///
/// # Errors
///
/// Same as [`write_trace`], plus [`SimError::Io`] if the file cannot be created.
pub fn save_trace_file(path: impl AsRef<Path>, events: &[TraceEvent]) -> Result<(), SimError> {
    let file = File::create(path)?;
    write_trace(BufWriter::new(file), events)
}
