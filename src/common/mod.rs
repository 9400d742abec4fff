//! Common types shared across the memory hierarchy simulator.
//!
//! These are small, leaf-level types with no dependency on the engine,
//! DRAM, or Flash modules, mirroring how shared primitives are isolated
//! elsewhere in this codebase.

/// Memory access operation classification (read vs. write).
pub mod operation;

/// Residency and row-buffer sentinel types.
pub mod residency;

pub use operation::Operation;
pub use residency::{ActiveRow, Residency};
