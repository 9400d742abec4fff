//! Hybrid DRAM/Flash memory hierarchy simulator.
//!
//! This crate replays a trace of memory accesses against a simulated DRAM
//! bank array with a row-buffer cache, optionally backed by a Flash tier
//! managed through frequency-based hot/cold classification.
//!
//! # Architecture
//!
//! * **Decoder**: pure address-to-coordinate mapping for DRAM and Flash.
//! * **DRAM**: bank array with one row-buffer register per bank.
//! * **Flash**: fixed page array with per-page write counters.
//! * **Classifier**: per-address access frequency and DRAM/Flash residency.
//! * **Engine**: orchestrates decode, classify, dispatch, and counters.
//! * **Trace**: file-based and synthetic access stream producers.
//!
//! # Modules
//!
//! * `common`: shared leaf types (`Operation`, `Residency`, `ActiveRow`).
//! * `config`: configuration loading and validation.
//! * `decoder`: address decomposition.
//! * `dram`: bank array and row-buffer state machine.
//! * `flash`: Flash page store.
//! * `classifier`: hot/cold classification and residency tracking.
//! * `counters`: the statistics bundle.
//! * `engine`: the access-processing orchestrator.
//! * `trace`: trace sources.
//! * `simulator`: the top-level facade.
//! * `cli`: command-line argument parsing and the interactive menu.

/// Shared leaf types: operation classification and residency/row-buffer state.
pub mod common;

/// Configuration loading, validation, and the fixed latency/threshold constants.
pub mod config;

/// Pure address decoding into DRAM bank/row/column and Flash page/offset coordinates.
pub mod decoder;

/// DRAM bank array and row-buffer state machine.
pub mod dram;

/// Flash page store.
pub mod flash;

/// Hot/cold classifier and residency tracking.
pub mod classifier;

/// The statistics counter bundle.
pub mod counters;

/// The access-processing engine tying the above together.
pub mod engine;

/// Trace sources: file-based reader and synthetic generator.
pub mod trace;

/// Top-level simulator facade.
pub mod simulator;

/// Command-line argument parsing and the interactive menu.
pub mod cli;
