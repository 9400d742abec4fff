//! Top-level simulator facade: wires a [`Config`] into an [`AccessEngine`]
//! and drives it over a [`TraceSource`].

use crate::config::Config;
use crate::counters::Counters;
use crate::engine::AccessEngine;
use crate::trace::{TraceEvent, TraceSource};

use log::info;

/// Owns the engine and exposes the operations the CLI drives: construction
/// from a validated config, a full reset, single-access processing, and
/// running an entire trace source to completion.
pub struct Simulator {
    config: Config,
    engine: AccessEngine,
}

impl Simulator {
    /// Builds a simulator from a validated configuration.
    pub fn new(config: Config) -> Self {
        let engine = AccessEngine::new(&config);
        info!(
            "simulator initialized: {} banks x {} rows x {} cols, flash {}",
            engine.bank_count(),
            engine.rows_per_bank(),
            engine.columns_per_row(),
            if engine.hybrid_mode() { "enabled" } else { "disabled" }
        );
        Simulator { config, engine }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn counters(&self) -> &Counters {
        self.engine.counters()
    }

    /// Resets DRAM contents, Flash contents, the classifier's maps, and all
    /// counters to their freshly-constructed state. The configuration itself
    /// is untouched.
    pub fn clear(&mut self) {
        self.engine.clear();
        info!("simulator state cleared");
    }

    /// Equivalent to [`Self::clear`], plus an `info`-level capacity report
    /// summarizing the DRAM and (if enabled) Flash tier sizes.
    pub fn initialize(&mut self) {
        self.engine.clear();
        let dram_bytes =
            self.engine.bank_count() as u64 * self.engine.rows_per_bank() as u64 * self.engine.columns_per_row() as u64;
        info!(
            "DRAM initialized: {} banks x {} rows x {} columns = {} bytes",
            self.engine.bank_count(),
            self.engine.rows_per_bank(),
            self.engine.columns_per_row(),
            dram_bytes
        );
        if self.engine.hybrid_mode() {
            info!(
                "Flash initialized: {} pages x {} bytes = {} bytes",
                self.engine.flash_page_count(),
                self.config.flash_page_size,
                self.config.flash_capacity
            );
        }
    }

    /// Processes a single access, identical to what one trace line produces.
    pub fn process_access(&mut self, operation: Option<crate::common::Operation>, address: u64) {
        self.engine.process_access(operation, address);
    }

    /// Drives every event a [`TraceSource`] produces through the engine,
    /// returning the number of events consumed (accesses plus malformed
    /// lines).
    pub fn run_trace(&mut self, mut source: impl TraceSource) -> u64 {
        let mut events = 0u64;
        while let Some(event) = source.next_event() {
            events += 1;
            match event {
                TraceEvent::Access { operation, address } => {
                    self.engine.process_access(operation, address);
                }
                TraceEvent::Malformed => {
                    self.engine.note_malformed_line();
                }
            }
        }
        info!("trace run complete: {events} lines consumed");
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Operation;

    fn hybrid_config() -> Config {
        let mut c = Config::default();
        c.enable_flash = true;
        c.flash_capacity = 16384;
        c.flash_page_size = 4096;
        c
    }

    #[test]
    fn fresh_simulator_has_zero_counters() {
        let sim = Simulator::new(Config::default());
        assert_eq!(*sim.counters(), Counters::new());
    }

    #[test]
    fn process_access_updates_counters() {
        let mut sim = Simulator::new(Config::default());
        sim.process_access(Some(Operation::Read), 0x10);
        assert_eq!(sim.counters().total_accesses, 1);
    }

    #[test]
    fn initialize_resets_state_like_clear() {
        let mut sim = Simulator::new(hybrid_config());
        sim.process_access(Some(Operation::Read), 0x10);
        sim.initialize();
        assert_eq!(*sim.counters(), Counters::new());
        assert!(sim.config().enable_flash);
    }

    #[test]
    fn clear_resets_counters_but_keeps_config() {
        let mut sim = Simulator::new(hybrid_config());
        sim.process_access(Some(Operation::Read), 0x10);
        sim.clear();
        assert_eq!(*sim.counters(), Counters::new());
        assert!(sim.config().enable_flash);
    }

    struct FixedTrace {
        events: std::collections::VecDeque<TraceEvent>,
    }

    impl TraceSource for FixedTrace {
        fn next_event(&mut self) -> Option<TraceEvent> {
            self.events.pop_front()
        }
    }

    #[test]
    fn run_trace_counts_malformed_and_valid_lines() {
        let mut sim = Simulator::new(Config::default());
        let source = FixedTrace {
            events: std::collections::VecDeque::from(vec![
                TraceEvent::Access { operation: Some(Operation::Read), address: 0x0 },
                TraceEvent::Malformed,
                TraceEvent::Access { operation: Some(Operation::Write), address: 0x4 },
            ]),
        };
        let consumed = sim.run_trace(source);
        assert_eq!(consumed, 3);
        assert_eq!(sim.counters().total_accesses, 2);
        assert_eq!(sim.counters().malformed_line_events, 1);
    }
}
