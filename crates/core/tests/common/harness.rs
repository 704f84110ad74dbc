//! Simulator harness and event builders.

use lvpsim_core::config::{Config, EngineMode};
use lvpsim_core::core::LoadOutcome;
use lvpsim_core::sim::{Simulator, TraceEvent};

/// Program counter used by tests that only need one load site.
pub const PC: u64 = 0x40_1000;

/// Data address used by tests that only need one location.
pub const ADDR: u64 = 0x1000_0000;

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("trace"))
        .with_test_writer()
        .try_init();
}

/// Builds a load event that carries its observed value.
pub const fn load(pc: u64, addr: u64, size: usize, value: u64) -> TraceEvent {
    TraceEvent::Load {
        pc,
        addr,
        size,
        value: Some(value),
    }
}

/// Builds a store event with a known value.
pub const fn store(pc: u64, addr: u64, size: usize, value: u64) -> TraceEvent {
    TraceEvent::Store {
        pc,
        addr,
        size,
        value: Some(value),
    }
}

/// Owns a simulator and feeds it events.
pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Hybrid engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Engine running a single mode with otherwise default settings.
    pub fn with_mode(mode: EngineMode) -> Self {
        let mut config = Config::default();
        config.engine.mode = mode;
        Self::with_config(&config)
    }

    /// Engine built from `config`.
    pub fn with_config(config: &Config) -> Self {
        init_tracing();
        Self {
            sim: Simulator::new(config).expect("test config must validate"),
        }
    }

    /// Applies a load of `value` (8 bytes) at `pc`/`addr`.
    pub fn load(&mut self, pc: u64, addr: u64, value: u64) -> Option<LoadOutcome> {
        self.sim.step(&load(pc, addr, 8, value))
    }

    /// Applies a store of `value` (8 bytes) to `addr`.
    pub fn store(&mut self, addr: u64, value: u64) {
        let _ = self.sim.step(&store(PC, addr, 8, value));
    }

    /// Applies a load sequence at one PC/address, returning every outcome.
    pub fn load_values(&mut self, pc: u64, addr: u64, values: &[u64]) -> Vec<LoadOutcome> {
        values
            .iter()
            .map(|&v| self.load(pc, addr, v).expect("load must be processed"))
            .collect()
    }
}
