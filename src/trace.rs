//! Trace sources: a file-based trace reader and a synthetic bimodal
//! generator, both yielding the same access stream to the engine.

use crate::common::Operation;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufRead, BufReader};

/// One decoded (or rejected) trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    /// A well-formed access.
    Access { operation: Option<Operation>, address: u64 },
    /// A line that could not be parsed as `<op> <hex address>` at all.
    Malformed,
}

/// A source of trace events the simulator can drive.
pub trait TraceSource {
    fn next_event(&mut self) -> Option<TraceEvent>;
}

/// Reads a trace file line by line.
///
/// Each line is either blank, a `#`-prefixed comment, or `<op> <hex address>`
/// (e.g. `R 1a3f`); the address is always read as hexadecimal. A line with
/// content that fails to parse into that shape yields [`TraceEvent::Malformed`]
/// rather than aborting the run.
pub struct FileTraceSource {
    lines: std::io::Lines<BufReader<File>>,
}

impl FileTraceSource {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open trace file {}", path.display()))?;
        Ok(FileTraceSource {
            lines: BufReader::new(file).lines(),
        })
    }
}

impl TraceSource for FileTraceSource {
    fn next_event(&mut self) -> Option<TraceEvent> {
        loop {
            let line = self.lines.next()?.ok()?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Some(parse_trace_line(trimmed));
        }
    }
}

/// Parses one non-empty, non-comment trace line of the form `<op> <hex address>`.
pub fn parse_trace_line(line: &str) -> TraceEvent {
    let mut parts = line.split_whitespace();
    let (Some(op_token), Some(addr_token)) = (parts.next(), parts.next()) else {
        return TraceEvent::Malformed;
    };
    if parts.next().is_some() {
        return TraceEvent::Malformed;
    }

    let Some(op_char) = op_token.chars().next() else {
        return TraceEvent::Malformed;
    };
    if op_token.chars().count() != 1 {
        return TraceEvent::Malformed;
    }

    let Ok(address) = u64::from_str_radix(addr_token.trim_start_matches("0x"), 16) else {
        return TraceEvent::Malformed;
    };

    TraceEvent::Access {
        operation: Operation::from_char(op_char),
        address,
    }
}

/// Address space size the synthetic generator draws from (1 MiB).
const SYNTHETIC_ADDRESS_SPACE: u64 = 0x10_0000;
/// Fraction of the address space treated as "hot" (the low 20%).
const HOT_FRACTION_DENOM: u64 = 5;
/// Percentage chance (0-99) that a generated access targets a hot address.
const HOT_ACCESS_PERCENT: u32 = 80;
/// Percentage chance (0-99) that a generated access is a read.
const READ_PERCENT: u32 = 70;
/// Percentage chance (0-99) that spatial-locality mode reuses the previous
/// draw's row field with a freshly drawn column.
const SPATIAL_LOCALITY_PERCENT: u32 = 30;
/// Mask isolating the decoder's column field (bits `[1:0]`).
const COLUMN_MASK: u64 = 0x3;

/// Generates a synthetic bimodal access stream: 80% of accesses land in the
/// low 20% of the address space (the "hot" quintile), the rest in the
/// remaining 80% (the "cold" range); 70% of accesses are reads.
pub struct SyntheticTraceSource {
    rng: StdRng,
    remaining: u64,
    hot_address_count: u64,
    spatial_locality: bool,
    previous_address: Option<u64>,
}

impl SyntheticTraceSource {
    pub fn new(seed: u64, num_accesses: u64) -> Self {
        SyntheticTraceSource {
            rng: StdRng::seed_from_u64(seed),
            remaining: num_accesses,
            hot_address_count: SYNTHETIC_ADDRESS_SPACE / HOT_FRACTION_DENOM,
            spatial_locality: false,
            previous_address: None,
        }
    }

    /// Enables the opt-in spatial-locality mode: 30% of draws after the
    /// first reuse the previous access's row field with a freshly drawn
    /// column instead of an independent bimodal draw. Not reachable from
    /// the default CLI flow.
    pub fn with_spatial_locality(mut self) -> Self {
        self.spatial_locality = true;
        self
    }

    pub fn hot_address_count(&self) -> u64 {
        self.hot_address_count
    }

    pub fn address_space(&self) -> u64 {
        SYNTHETIC_ADDRESS_SPACE
    }

    fn draw_bimodal_address(&mut self) -> u64 {
        let is_hot_access = self.rng.gen_range(0..100) < HOT_ACCESS_PERCENT;
        if is_hot_access {
            self.rng.gen_range(0..self.hot_address_count)
        } else {
            self.rng.gen_range(self.hot_address_count..SYNTHETIC_ADDRESS_SPACE)
        }
    }

    fn draw_address(&mut self) -> u64 {
        if self.spatial_locality {
            if let Some(previous) = self.previous_address {
                if self.rng.gen_range(0..100) < SPATIAL_LOCALITY_PERCENT {
                    let column = self.rng.gen_range(0..=COLUMN_MASK);
                    return (previous & !COLUMN_MASK) | column;
                }
            }
        }
        self.draw_bimodal_address()
    }
}

impl TraceSource for SyntheticTraceSource {
    fn next_event(&mut self) -> Option<TraceEvent> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let address = self.draw_address();
        self.previous_address = Some(address);

        let operation = if self.rng.gen_range(0..100) < READ_PERCENT {
            Operation::Read
        } else {
            Operation::Write
        };

        Some(TraceEvent::Access {
            operation: Some(operation),
            address,
        })
    }
}
