//! The access engine: the orchestrator that ties the decoder, DRAM bank
//! array, Flash store, and classifier together and accumulates counters.
//!
//! Routes each incoming access through the classifier, then to the DRAM
//! bank array or the Flash store (or both, for write-through), folding the
//! result into the counter bundle. Also injects the periodic refresh event.

use crate::classifier::{Classifier, Transition};
use crate::common::Operation;
use crate::config::Config;
use crate::counters::Counters;
use crate::decoder::{decode_dram, decode_flash};
use crate::dram::{BankArray, RowBufferEvent};
use crate::flash::FlashStore;

use log::warn;

/// Latency and threshold constants the engine needs on every access.
///
/// Split out from [`Config`] so the engine does not need to know about
/// config-file parsing; constructed once from a validated `Config`.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub row_hit_latency: u64,
    pub row_miss_latency: u64,
    pub flash_read_latency: u64,
    pub flash_write_latency: u64,
    pub cache_promotion_latency: u64,
    pub cache_eviction_latency: u64,
    pub refresh_latency: u64,
    pub hot_data_threshold: u64,
    pub refresh_cadence: u64,
}

impl Timing {
    pub fn from_config(config: &Config) -> Self {
        Timing {
            row_hit_latency: config.column_access_time,
            row_miss_latency: config.row_access_time,
            flash_read_latency: crate::config::FLASH_READ_LATENCY,
            flash_write_latency: crate::config::FLASH_WRITE_LATENCY,
            cache_promotion_latency: crate::config::CACHE_PROMOTION_LATENCY,
            cache_eviction_latency: crate::config::CACHE_EVICTION_LATENCY,
            refresh_latency: config.refresh_interval,
            hot_data_threshold: crate::config::HOT_DATA_THRESHOLD,
            refresh_cadence: crate::config::REFRESH_CADENCE,
        }
    }
}

/// The access-processing engine: DRAM banks, optional Flash tier,
/// classifier, and the counter bundle they all feed.
pub struct AccessEngine {
    banks: BankArray,
    flash: Option<FlashStore>,
    classifier: Classifier,
    counters: Counters,
    timing: Timing,
}

impl AccessEngine {
    pub fn new(config: &Config) -> Self {
        let banks = BankArray::new(config.dram_banks, config.dram_rows, config.dram_columns);
        let flash = config
            .enable_flash
            .then(|| FlashStore::new(config.flash_capacity, config.flash_page_size));
        let timing = Timing::from_config(config);

        AccessEngine {
            banks,
            flash,
            classifier: Classifier::new(timing.hot_data_threshold),
            counters: Counters::new(),
            timing,
        }
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn bank_count(&self) -> usize {
        self.banks.len()
    }

    pub fn rows_per_bank(&self) -> u32 {
        self.banks.rows_per_bank()
    }

    pub fn columns_per_row(&self) -> u32 {
        self.banks.columns_per_row()
    }

    pub fn hybrid_mode(&self) -> bool {
        self.flash.is_some()
    }

    pub fn flash_page_count(&self) -> usize {
        self.flash.as_ref().map_or(0, FlashStore::page_count)
    }

    /// Records a malformed trace line. Does not touch `total_accesses`;
    /// the line is simply skipped and the run continues.
    pub fn note_malformed_line(&mut self) {
        self.counters.malformed_line_events += 1;
        warn!("skipping malformed trace line");
    }

    /// Resets every component to its freshly-constructed state.
    pub fn clear(&mut self) {
        self.banks.clear();
        if let Some(flash) = &mut self.flash {
            flash.clear();
        }
        self.classifier.clear();
        self.counters = Counters::new();
    }

    /// Processes one `(operation, address)` access.
    ///
    /// `operation` is `None` for an unrecognized op character: `total_accesses`
    /// still increments, `unknown_op_events` increments, and no further state
    /// change occurs. This is a soft error, not a failure the caller must
    /// handle.
    pub fn process_access(&mut self, operation: Option<Operation>, address: u64) {
        self.counters.total_accesses += 1;

        let Some(operation) = operation else {
            self.counters.unknown_op_events += 1;
            warn!("unknown operation character for address {address:#x}");
            self.maybe_refresh();
            return;
        };

        if self.flash.is_some() {
            self.process_hybrid(operation, address);
        } else {
            self.process_dram_only(operation, address);
        }

        self.maybe_refresh();
    }

    fn process_dram_only(&mut self, operation: Operation, address: u64) {
        let dram = decode_dram(address);
        if !self.banks.in_bounds(dram.bank, dram.row, dram.column) {
            self.counters.out_of_bounds_events += 1;
            warn!("DRAM address out of bounds: {address:#x}");
            return;
        }

        let is_write = operation == Operation::Write;
        let event = self.banks.access(dram.bank, dram.row, dram.column, is_write);
        let latency = self.row_buffer_latency(event);
        self.counters.total_latency += latency;
        self.tally_row_event(event);
    }

    fn process_hybrid(&mut self, operation: Operation, address: u64) {
        let classification = self.classifier.classify(address);

        match classification.transition {
            Transition::Promoted => {
                self.counters.cache_promotions += 1;
                self.counters.cache_overhead += self.timing.cache_promotion_latency;
                self.counters.total_latency += self.timing.cache_promotion_latency;
            }
            Transition::Evicted => {
                self.counters.cache_evictions += 1;
                self.counters.cache_overhead += self.timing.cache_eviction_latency;
                self.counters.total_latency += self.timing.cache_eviction_latency;
            }
            Transition::None => {}
        }

        if classification.resident {
            self.counters.dram_cache_hits += 1;
            self.dispatch_dram_resident(operation, address);
        } else {
            self.counters.dram_cache_misses += 1;
            self.dispatch_flash(operation, address);
        }
    }

    fn dispatch_dram_resident(&mut self, operation: Operation, address: u64) {
        let dram = decode_dram(address);
        if !self.banks.in_bounds(dram.bank, dram.row, dram.column) {
            self.counters.out_of_bounds_events += 1;
            warn!("DRAM address out of bounds: {address:#x}");
            return;
        }

        let is_write = operation == Operation::Write;
        let event = self.banks.access(dram.bank, dram.row, dram.column, is_write);
        let latency = self.row_buffer_latency(event);
        self.counters.total_latency += latency;
        self.counters.dram_access_latency += latency;
        self.tally_row_event(event);

        if is_write {
            self.write_through(address);
        }
    }

    fn write_through(&mut self, address: u64) {
        let Some(flash) = &self.flash else { return };
        let flash_addr = decode_flash(address, flash.page_size());
        if let Some(latency) = flash.write_through_latency(flash_addr.page, self.timing.flash_write_latency) {
            self.counters.flash_writes += 1;
            self.counters.flash_access_latency += latency;
            self.counters.total_latency += latency;
        } else {
            self.counters.out_of_bounds_events += 1;
            warn!("Flash write-through address out of bounds: {address:#x}");
        }
    }

    fn dispatch_flash(&mut self, operation: Operation, address: u64) {
        let Some(flash) = &mut self.flash else { return };
        let flash_addr = decode_flash(address, flash.page_size());
        if !flash.in_bounds(flash_addr.page) {
            self.counters.out_of_bounds_events += 1;
            warn!("Flash address out of bounds: {address:#x}");
            return;
        }

        let is_write = operation == Operation::Write;
        let result = flash.access(
            flash_addr.page,
            flash_addr.offset,
            is_write,
            self.timing.flash_read_latency,
            self.timing.flash_write_latency,
            self.counters.total_accesses,
        );

        if result.is_write {
            self.counters.flash_writes += 1;
        } else {
            self.counters.flash_reads += 1;
        }
        self.counters.flash_access_latency += result.latency;
        self.counters.total_latency += result.latency;
    }

    fn row_buffer_latency(&self, event: RowBufferEvent) -> u64 {
        match event {
            RowBufferEvent::Hit => self.timing.row_hit_latency,
            RowBufferEvent::Miss => self.timing.row_miss_latency,
        }
    }

    fn tally_row_event(&mut self, event: RowBufferEvent) {
        match event {
            RowBufferEvent::Hit => self.counters.row_hits += 1,
            RowBufferEvent::Miss => self.counters.row_misses += 1,
        }
    }

    /// Injects a refresh event every `refresh_cadence` accesses.
    fn maybe_refresh(&mut self) {
        let i = self.counters.total_accesses;
        if i > 0 && i % self.timing.refresh_cadence == 0 {
            self.counters.refresh_cycles += 1;
            self.counters.total_latency += self.timing.refresh_latency;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dram_only_config() -> Config {
        let mut c = Config::default();
        c.dram_banks = 4;
        c.dram_rows = 1024;
        c.dram_columns = 1024;
        c.enable_flash = false;
        c
    }

    fn hybrid_config() -> Config {
        let mut c = dram_only_config();
        c.enable_flash = true;
        c.flash_capacity = 16384;
        c.flash_page_size = 4096;
        c
    }

    // Scenario 1: single cold read.
    #[test]
    fn single_read_to_cold_address() {
        let mut engine = AccessEngine::new(&dram_only_config());
        engine.process_access(Some(Operation::Read), 0x0000);
        let c = engine.counters();
        assert_eq!(c.total_accesses, 1);
        assert_eq!(c.row_misses, 1);
        assert_eq!(c.row_hits, 0);
        assert_eq!(c.total_latency, 30);
    }

    // Scenario 2: row-buffer hit.
    #[test]
    fn row_buffer_hit_on_repeat_access() {
        let mut engine = AccessEngine::new(&dram_only_config());
        engine.process_access(Some(Operation::Read), 0x0000);
        engine.process_access(Some(Operation::Read), 0x0001);
        let c = engine.counters();
        assert_eq!(c.row_misses, 1);
        assert_eq!(c.row_hits, 1);
        assert_eq!(c.total_latency, 40);
    }

    // Scenario 3: row-buffer miss on same bank, different row.
    #[test]
    fn row_buffer_miss_same_bank_different_row() {
        let mut engine = AccessEngine::new(&dram_only_config());
        engine.process_access(Some(Operation::Read), 0x0000);
        engine.process_access(Some(Operation::Read), 0x0004);
        let c = engine.counters();
        assert_eq!(c.row_misses, 2);
        assert_eq!(c.row_hits, 0);
        assert_eq!(c.total_latency, 60);
    }

    // Scenario 4: cross-bank independence.
    #[test]
    fn cross_bank_independence() {
        let mut engine = AccessEngine::new(&dram_only_config());
        engine.process_access(Some(Operation::Read), 0x0000);
        engine.process_access(Some(Operation::Read), 0x1000);
        engine.process_access(Some(Operation::Read), 0x0000);
        let c = engine.counters();
        assert_eq!(c.row_misses, 2);
        assert_eq!(c.row_hits, 1);
        assert_eq!(c.total_latency, 70);
    }

    // Scenario 5: hybrid promotion.
    #[test]
    fn hybrid_promotion_on_third_access() {
        let mut engine = AccessEngine::new(&hybrid_config());
        for _ in 0..3 {
            engine.process_access(Some(Operation::Read), 0x5);
        }
        engine.process_access(Some(Operation::Read), 0x5);
        let c = engine.counters();
        assert_eq!(c.cache_promotions, 1);
        assert_eq!(c.cache_overhead, 200);
        assert!(c.dram_cache_hits >= 2);
        assert_eq!(c.dram_cache_misses, 2);
    }

    // Scenario 6: write-through.
    #[test]
    fn write_through_after_promotion() {
        let mut engine = AccessEngine::new(&hybrid_config());
        for _ in 0..3 {
            engine.process_access(Some(Operation::Read), 0x5);
        }
        let before = *engine.counters();
        engine.process_access(Some(Operation::Write), 0x5);
        let after = engine.counters();

        assert_eq!(after.row_hits + after.row_misses, before.row_hits + before.row_misses + 1);
        assert_eq!(after.flash_writes, before.flash_writes + 1);
        assert_eq!(
            after.total_latency,
            before.total_latency + crate::config::FLASH_WRITE_LATENCY + 10
        );
        assert_eq!(
            after.flash_access_latency,
            before.flash_access_latency + crate::config::FLASH_WRITE_LATENCY
        );
    }

    #[test]
    fn out_of_bounds_counts_access_but_mutates_nothing() {
        let mut config = dram_only_config();
        config.dram_banks = 1;
        let mut engine = AccessEngine::new(&config);
        engine.process_access(Some(Operation::Read), 0x1000);
        let c = engine.counters();
        assert_eq!(c.total_accesses, 1);
        assert_eq!(c.out_of_bounds_events, 1);
        assert_eq!(c.row_hits + c.row_misses, 0);
        assert_eq!(c.total_latency, 0);
    }

    #[test]
    fn unknown_operation_counts_access_only() {
        let mut engine = AccessEngine::new(&dram_only_config());
        engine.process_access(None, 0x0);
        let c = engine.counters();
        assert_eq!(c.total_accesses, 1);
        assert_eq!(c.unknown_op_events, 1);
        assert_eq!(c.total_latency, 0);
    }

    #[test]
    fn refresh_fires_every_8192_accesses() {
        let mut engine = AccessEngine::new(&dram_only_config());
        for i in 0..8192u64 {
            engine.process_access(Some(Operation::Read), i * 4);
        }
        assert_eq!(engine.counters().refresh_cycles, 1);
    }

    #[test]
    fn clear_resets_everything() {
        let mut engine = AccessEngine::new(&hybrid_config());
        for _ in 0..5 {
            engine.process_access(Some(Operation::Read), 0x5);
        }
        engine.clear();
        let c = engine.counters();
        assert_eq!(*c, Counters::new());
        assert_eq!(engine.classifier.frequency_of(0x5), 0);
    }
}
