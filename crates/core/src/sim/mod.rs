//! Simulation driver: memory, traces, workloads, and replay.
//!
//! The prediction engine never sees a running program directly. This module
//! stands in for the instrumentation layer: it supplies the safe-copy memory
//! primitive and delivers load/store events in program order.

/// Safe-copy memory sources (trait and sparse in-memory image).
pub mod memory;

/// Live-process memory reads via `process_vm_readv`.
#[cfg(target_os = "linux")]
pub mod process;

/// Top-level simulator: engine plus memory image, replaying events.
pub mod simulator;

/// JSON-lines trace events and their reader/writer.
pub mod trace;

/// Synthetic workload generators.
pub mod workload;

pub use self::memory::{MemorySource, SparseMemory};
pub use self::simulator::Simulator;
pub use self::trace::TraceEvent;
pub use self::workload::Workload;
