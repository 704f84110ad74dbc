//! Simulator: owns the engine and the replayed memory image side by side.
//!
//! Events are applied strictly in order. A load that carries its observed
//! value first makes that value visible in memory; the engine then re-reads
//! it through the safe-copy path like it would from a live program.

use tracing::info;

use super::memory::{MemorySource, SparseMemory, truncate};
use super::trace::TraceEvent;
use crate::common::constants::MAX_ACCESS_BYTES;
use crate::common::error::SimError;
use crate::config::Config;
use crate::core::{Engine, LoadOutcome};
use crate::stats::Summary;

/// Top-level simulator: prediction engine + memory image.
#[derive(Debug, Clone)]
pub struct Simulator {
    /// Prediction engine.
    pub engine: Engine,
    /// Memory image the engine reads loads back from.
    pub memory: SparseMemory,
    heartbeat_interval: u64,
    events: u64,
}

impl Simulator {
    /// Creates a simulator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if the configuration fails validation.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            engine: Engine::new(config),
            memory: SparseMemory::new(),
            heartbeat_interval: config.engine.heartbeat_interval,
            events: 0,
        })
    }

    /// Applies one event.
    ///
    /// # Returns
    ///
    /// The load outcome for loads the engine processed, `None` for stores
    /// and dropped loads.
    pub fn step(&mut self, event: &TraceEvent) -> Option<LoadOutcome> {
        self.tick();

        match *event {
            TraceEvent::Load {
                pc,
                addr,
                size,
                value,
            } => {
                if let Some(value) = value {
                    if size <= MAX_ACCESS_BYTES {
                        self.memory.write(addr, size, value);
                    }
                }
                self.engine.on_load(&self.memory, pc, addr, size)
            }
            TraceEvent::Store {
                addr, size, value, ..
            } => {
                if let Some(value) = value {
                    let value = truncate(value, size);
                    self.memory.write(addr, size, value);
                    self.engine.on_store(addr, value);
                }
                None
            }
        }
    }

    /// Applies every event in order and returns the final summary.
    pub fn run<'a, I>(&mut self, events: I) -> Summary
    where
        I: IntoIterator<Item = &'a TraceEvent>,
    {
        info!("Running load value prediction ({:?})...", self.engine.mode());
        for event in events {
            let _ = self.step(event);
        }
        let summary = self.summary();
        info!(
            "Prediction accuracy: {:.2}% over {} loads",
            summary.hit_rate, summary.loads.total_loads
        );
        summary
    }

    /// Drives the engine against an external memory source instead of the
    /// replayed image.
    ///
    /// Load values carried by the events are ignored; stores with a known
    /// value are still reported.
    pub fn run_against<'a, M, I>(&mut self, mem: &M, events: I) -> Summary
    where
        M: MemorySource + ?Sized,
        I: IntoIterator<Item = &'a TraceEvent>,
    {
        for event in events {
            self.tick();
            match *event {
                TraceEvent::Load { pc, addr, size, .. } => {
                    let _ = self.engine.on_load(mem, pc, addr, size);
                }
                TraceEvent::Store {
                    addr,
                    size,
                    value: Some(value),
                    ..
                } => self.engine.on_store(addr, truncate(value, size)),
                TraceEvent::Store { value: None, .. } => {}
            }
        }
        self.summary()
    }

    /// Counts one event and emits the periodic heartbeat.
    fn tick(&mut self) {
        self.events += 1;
        if self.heartbeat_interval != 0 && self.events % self.heartbeat_interval == 0 {
            info!("Executed {} events.", self.events);
        }
    }

    /// Number of events applied so far.
    pub const fn events(&self) -> u64 {
        self.events
    }

    /// Read-only summary of the run so far.
    pub fn summary(&self) -> Summary {
        self.engine.summary()
    }
}
