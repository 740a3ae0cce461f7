//! Λ-table: per-byte energy cost in picojoules.
//!
//! The table is externally authored data. It is applied exactly as written and
//! must stay identical to the firmware and RTL copies of the same table.

/// Costs for the 7-bit ASCII range, in pJ.
#[rustfmt::skip]
const ASCII_COSTS: [u32; 128] = [
    // Control chars: 0-31
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // Space and punctuation
    50, 100, 100, 150, 100, 100, 100, 50,
    150, 150, 100, 200, 50, 50, 50, 100,
    // Digits 0-9, then : ; < = > ?
    200, 180, 170, 160, 150, 140, 130, 120,
    110, 100, 100, 100, 100, 100, 100, 100,
    // @, A-Z, [ \ ] ^ _
    150, 450, 420, 400, 380, 360, 350, 340,
    330, 320, 310, 300, 290, 280, 270, 260,
    250, 240, 230, 220, 210, 200, 190, 180,
    170, 160, 150, 100, 100, 100, 100, 100,
    // `, a-z, { | } ~ DEL
    150, 400, 380, 360, 340, 320, 300, 280,
    260, 240, 220, 200, 180, 160, 140, 120,
    100, 90, 80, 70, 60, 50, 40, 30,
    20, 10, 100, 100, 100, 100, 0, 0,
];

/// Cost assigned to every byte >= 128. The table defines no extended range, so
/// those bytes fall back to zero.
pub const EXTENDED_FALLBACK_COST: u32 = 0;

const fn build_table(ascii: [u32; 128]) -> [u32; 256] {
    let mut table = [EXTENDED_FALLBACK_COST; 256];
    let mut i = 0;
    while i < ascii.len() {
        table[i] = ascii[i];
        i += 1;
    }
    table
}

/// The full 256-entry Λ-table, index = byte value.
pub const LAMBDA_TABLE: [u32; 256] = build_table(ASCII_COSTS);

/// Immutable byte -> cost mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostTable {
    entries: [u32; 256],
}

impl CostTable {
    /// The table shared by the packer, the validator and the hardware gate.
    pub const STANDARD: CostTable = CostTable {
        entries: LAMBDA_TABLE,
    };

    /// Wrap an externally supplied table.
    pub const fn new(entries: [u32; 256]) -> Self {
        Self { entries }
    }

    /// Cost of a single byte in pJ. Total over all byte values.
    #[inline]
    pub const fn cost_of(&self, byte: u8) -> u32 {
        self.entries[byte as usize]
    }

    /// Largest per-byte cost in the table.
    pub fn max_cost(&self) -> u32 {
        self.entries.iter().copied().max().unwrap_or(0)
    }

    pub fn entries(&self) -> &[u32; 256] {
        &self.entries
    }
}

impl Default for CostTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Cost of `byte` under the standard table.
#[inline]
pub const fn cost_of(byte: u8) -> u32 {
    CostTable::STANDARD.cost_of(byte)
}
