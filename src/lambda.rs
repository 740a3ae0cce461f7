//! Λ-cost accumulation, batch and streaming.
//!
//! Both forms sum the same `CostTable::cost_of` lookups; the streaming gate
//! only adds latch state on top. Totals are `u64` so that any blob that fits in
//! memory, times the largest table entry, cannot overflow.

use crate::cost_table::CostTable;

/// Σ cost_of(b) over `bytes` using `table`.
pub fn accumulate(table: &CostTable, bytes: &[u8]) -> u64 {
    bytes.iter().map(|&b| u64::from(table.cost_of(b))).sum()
}

/// Λ-cost of `bytes` under the standard table.
pub fn cost(bytes: &[u8]) -> u64 {
    accumulate(&CostTable::STANDARD, bytes)
}

/// Streaming gate state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GateState {
    Open,
    Closed,
}

/// Gate outputs after a byte has been consumed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GateSnapshot {
    pub total: u64,
    pub gate_open: bool,
    pub violation: bool,
}

/// Byte-at-a-time Λ accumulator that latches closed once the running total
/// strictly exceeds the budget.
///
/// A session is owned by one caller. `Closed` is terminal until [`reset`].
///
/// [`reset`]: LambdaGate::reset
#[derive(Debug, Clone)]
pub struct LambdaGate<'t> {
    table: &'t CostTable,
    budget: u64,
    total: u64,
    state: GateState,
    violation: bool,
}

impl LambdaGate<'static> {
    /// Gate over the standard table.
    pub fn new(budget: u64) -> Self {
        Self::with_table(&CostTable::STANDARD, budget)
    }
}

impl<'t> LambdaGate<'t> {
    pub fn with_table(table: &'t CostTable, budget: u64) -> Self {
        Self {
            table,
            budget,
            total: 0,
            state: GateState::Open,
            violation: false,
        }
    }

    /// Consume one byte and return the gate outputs.
    pub fn feed(&mut self, byte: u8) -> GateSnapshot {
        self.total = self
            .total
            .saturating_add(u64::from(self.table.cost_of(byte)));
        // total == budget keeps the gate open
        if self.state == GateState::Open && self.total > self.budget {
            self.state = GateState::Closed;
            self.violation = true;
        }
        self.snapshot()
    }

    /// Feed every byte of `bytes` in order. Returns the index of the byte that
    /// closed the gate, or `None` if it was already closed or stayed open.
    pub fn feed_all(&mut self, bytes: &[u8]) -> Option<usize> {
        let mut closed_at = None;
        for (i, &b) in bytes.iter().enumerate() {
            let was_open = self.is_open();
            self.feed(b);
            if was_open && !self.is_open() {
                closed_at = Some(i);
            }
        }
        closed_at
    }

    /// Rearm for a new blob. The budget is kept.
    pub fn reset(&mut self) {
        self.total = 0;
        self.state = GateState::Open;
        self.violation = false;
    }

    /// Rearm with a different budget.
    pub fn reset_with_budget(&mut self, budget: u64) {
        self.budget = budget;
        self.reset();
    }

    pub fn snapshot(&self) -> GateSnapshot {
        GateSnapshot {
            total: self.total,
            gate_open: self.is_open(),
            violation: self.violation,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == GateState::Open
    }

    pub fn violation(&self) -> bool {
        self.violation
    }
}
