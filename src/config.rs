//! Simulator configuration.
//!
//! Loads the `key = value` configuration file describing DRAM geometry,
//! Flash capacity, timing constants, and the default synthetic trace
//! length. The accepted syntax (one `key = value` pair per line, `#`
//! comments, blank lines) is a syntactic subset of TOML, so the file is
//! parsed with [`toml`] into a `Deserialize` struct whose fields all carry
//! `#[serde(default = "...")]`; unknown keys are ignored and missing keys
//! fall back to the documented defaults for free.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_DRAM_BANKS: u32 = 4;
const DEFAULT_DRAM_ROWS: u32 = 1024;
const DEFAULT_DRAM_COLUMNS: u32 = 1024;
const DEFAULT_FLASH_CAPACITY: u64 = 16 * 1024 * 1024;
const DEFAULT_FLASH_PAGE_SIZE: u32 = 4096;
const DEFAULT_ROW_ACCESS_TIME: u64 = 30;
const DEFAULT_COLUMN_ACCESS_TIME: u64 = 10;
const DEFAULT_REFRESH_INTERVAL: u64 = 100;
const DEFAULT_TRACE_LINES: u64 = 10_000;

/// Timing and latency constants that are not exposed as config keys; they
/// are held fixed rather than made user-tunable.
pub const FLASH_READ_LATENCY: u64 = 100;
pub const FLASH_WRITE_LATENCY: u64 = 500;
pub const CACHE_PROMOTION_LATENCY: u64 = 200;
pub const CACHE_EVICTION_LATENCY: u64 = 200;
pub const HOT_DATA_THRESHOLD: u64 = 3;
pub const REFRESH_CADENCE: u64 = 8192;

/// Validated, immutable simulator configuration.
///
/// Constructed only via [`Config::load`] or [`Config::from_str`], both of
/// which enforce the invariants documented on each field.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of addressable DRAM banks (bounds-check limit; the address
    /// decoder itself always derives a 2-bit bank field, see `decoder.rs`).
    pub dram_banks: u32,

    /// Rows per bank (bounds-check limit).
    pub dram_rows: u32,

    /// Columns per row (bounds-check limit). Also accepted under the
    /// `row_buffer_size` alias; see [`RawConfig`].
    pub dram_columns: u32,

    /// Whether the Flash tier and DRAM-as-cache policy are enabled.
    pub enable_flash: bool,

    /// Total Flash capacity in bytes. Must be a multiple of `flash_page_size`.
    pub flash_capacity: u64,

    /// Flash page size in bytes.
    pub flash_page_size: u32,

    /// Row-buffer miss latency in cycles (RAS-equivalent).
    pub row_access_time: u64,

    /// Row-buffer hit latency in cycles (CAS-equivalent).
    pub column_access_time: u64,

    /// Per-refresh-event latency in cycles.
    pub refresh_interval: u64,

    /// Default synthetic trace length when no trace file is supplied.
    pub trace_lines: u64,
}

/// Deserialization target for the config file: accepts both `dram_columns`
/// and its `row_buffer_size` alias, then collapses to `Config`. Kept as a
/// separate type (rather than a `serde(alias = ...)` attribute on one field)
/// because the config file may specify either key, or in principle both, in
/// which case the explicit `dram_columns` line wins.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_dram_banks")]
    dram_banks: u32,
    #[serde(default = "default_dram_rows")]
    dram_rows: u32,
    dram_columns: Option<u32>,
    row_buffer_size: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_flexible_bool")]
    enable_flash: bool,
    #[serde(default = "default_flash_capacity")]
    flash_capacity: u64,
    #[serde(default = "default_flash_page_size")]
    flash_page_size: u32,
    #[serde(default = "default_row_access_time")]
    row_access_time: u64,
    #[serde(default = "default_column_access_time")]
    column_access_time: u64,
    #[serde(default = "default_refresh_interval")]
    refresh_interval: u64,
    #[serde(default = "default_trace_lines")]
    trace_lines: u64,
}

impl Config {
    /// Reads and parses a config file from disk.
    ///
    /// A missing file or a file that fails to parse is an unrecoverable
    /// error, reported to the caller so it can log and exit non-zero.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_str(&text).with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parses config text directly, applying the `dram_columns`/`row_buffer_size`
    /// alias resolution and the `flash_capacity % flash_page_size == 0` invariant.
    pub fn from_str(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text).context("invalid config syntax")?;

        let dram_columns = raw
            .dram_columns
            .or(raw.row_buffer_size)
            .unwrap_or_else(default_dram_columns);

        let config = Config {
            dram_banks: raw.dram_banks,
            dram_rows: raw.dram_rows,
            dram_columns,
            enable_flash: raw.enable_flash,
            flash_capacity: raw.flash_capacity,
            flash_page_size: raw.flash_page_size,
            row_access_time: raw.row_access_time,
            column_access_time: raw.column_access_time,
            refresh_interval: raw.refresh_interval,
            trace_lines: raw.trace_lines,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.dram_banks >= 1, "dram_banks must be at least 1");
        anyhow::ensure!(self.dram_rows >= 1, "dram_rows must be at least 1");
        anyhow::ensure!(self.dram_columns >= 1, "dram_columns must be at least 1");
        anyhow::ensure!(self.flash_page_size >= 1, "flash_page_size must be at least 1");
        anyhow::ensure!(
            self.flash_capacity % self.flash_page_size as u64 == 0,
            "flash_capacity ({}) must be a multiple of flash_page_size ({})",
            self.flash_capacity,
            self.flash_page_size
        );
        Ok(())
    }

    /// Number of Flash pages implied by `flash_capacity` / `flash_page_size`.
    pub fn flash_page_count(&self) -> u64 {
        self.flash_capacity / self.flash_page_size as u64
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dram_banks: default_dram_banks(),
            dram_rows: default_dram_rows(),
            dram_columns: default_dram_columns(),
            enable_flash: false,
            flash_capacity: default_flash_capacity(),
            flash_page_size: default_flash_page_size(),
            row_access_time: default_row_access_time(),
            column_access_time: default_column_access_time(),
            refresh_interval: default_refresh_interval(),
            trace_lines: default_trace_lines(),
        }
    }
}

fn default_dram_banks() -> u32 {
    DEFAULT_DRAM_BANKS
}

fn default_dram_rows() -> u32 {
    DEFAULT_DRAM_ROWS
}

fn default_dram_columns() -> u32 {
    DEFAULT_DRAM_COLUMNS
}

fn default_flash_capacity() -> u64 {
    DEFAULT_FLASH_CAPACITY
}

fn default_flash_page_size() -> u32 {
    DEFAULT_FLASH_PAGE_SIZE
}

fn default_row_access_time() -> u64 {
    DEFAULT_ROW_ACCESS_TIME
}

fn default_column_access_time() -> u64 {
    DEFAULT_COLUMN_ACCESS_TIME
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL
}

fn default_trace_lines() -> u64 {
    DEFAULT_TRACE_LINES
}

/// Accepts `true`/`false` as well as the `1`/`0` spelling for `enable_flash`.
fn deserialize_flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match toml::Value::deserialize(deserializer)? {
        toml::Value::Boolean(b) => Ok(b),
        toml::Value::Integer(i) => Ok(i != 0),
        toml::Value::String(s) => Ok(s == "true" || s == "1"),
        other => Err(serde::de::Error::custom(format!(
            "expected bool, integer, or string for enable_flash, got {other:?}"
        ))),
    }
}
