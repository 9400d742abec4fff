//! Address decoder.
//!
//! Pure, stateless mapping from a 64-bit byte address to DRAM bank/row/column
//! coordinates and to Flash page/offset coordinates.
//!
//! The DRAM bank/row/column field widths are hard-coded to 2/10/2 bits
//! (4 banks, 1024 rows, 4 columns) independent of the configured bank/row/
//! column counts. This is a deliberate choice, not a bug: the configured
//! counts are still applied as bounds-check limits, so a smaller configured
//! bank count simply makes the unreachable high banks produce out-of-bounds
//! events.

const BANK_SHIFT: u64 = 12;
const BANK_MASK: u64 = 0x3;
const ROW_SHIFT: u64 = 2;
const ROW_MASK: u64 = 0x3FF;
const COLUMN_MASK: u64 = 0x3;

/// DRAM coordinates decoded from a byte address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DramAddr {
    pub bank: u32,
    pub row: u32,
    pub column: u32,
}

/// Flash coordinates decoded from a byte address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashAddr {
    pub page: u64,
    pub offset: u64,
}

/// Decodes a byte address into DRAM bank/row/column fields.
///
/// Always derives a 2-bit bank field, 10-bit row field, and 2-bit column
/// field, regardless of the configured bank/row/column counts; those counts
/// are applied separately as bounds-check limits by the caller.
pub fn decode_dram(address: u64) -> DramAddr {
    DramAddr {
        bank: ((address >> BANK_SHIFT) & BANK_MASK) as u32,
        row: ((address >> ROW_SHIFT) & ROW_MASK) as u32,
        column: (address & COLUMN_MASK) as u32,
    }
}

/// Decodes a byte address into a Flash page index and in-page offset.
pub fn decode_flash(address: u64, page_size: u32) -> FlashAddr {
    let page_size = page_size as u64;
    FlashAddr {
        page: address / page_size,
        offset: address % page_size,
    }
}
