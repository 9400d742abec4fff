//! Residency and row-buffer sentinel types.

/// Which tier an address currently lives in, from the classifier's point of view.
///
/// `Unseen` is a first-class variant rather than folding "never seen" into
/// `Flash` via an `Option`-less boolean, so that the first access to a fresh
/// address is never mistaken for "already evicted to Flash".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Residency {
    /// No access to this address has been observed yet.
    #[default]
    Unseen,
    /// The address is currently resident in the DRAM cache.
    Dram,
    /// The address currently lives only in Flash.
    Flash,
}

impl Residency {
    /// Whether this address should be treated as DRAM-resident for dispatch.
    pub fn is_resident(self) -> bool {
        matches!(self, Residency::Dram)
    }
}

/// The row currently held open in a bank's row buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActiveRow {
    /// No row is open (e.g. immediately after construction or `clear`).
    #[default]
    None,
    /// Row `0` of this variant is the currently open row index.
    Row(u32),
}

impl ActiveRow {
    /// `true` if `row` is already the open row.
    pub fn is_hit(self, row: u32) -> bool {
        matches!(self, ActiveRow::Row(r) if r == row)
    }
}
