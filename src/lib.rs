#![forbid(unsafe_code)]

//! OPEN GATE: Λ-budget certificates for binary patches.
//!
//! A patch may be applied only if its Λ-cost (the sum of a fixed per-byte
//! energy table) fits the budget recorded in a 512-byte certificate that is
//! bound to the patch by content hash. The same cost function backs a
//! byte-at-a-time gate that mirrors the hardware checker.

use thiserror::Error;

pub mod certificate;
pub mod config;
pub mod cost_table;
pub mod lambda;
pub mod validator;

pub use certificate::{
    certificate_digest, decode, encode, parse_parent_hash, Certificate, CertificateError,
    CERT_LEN, GENESIS_PARENT, MAGIC,
};
pub use config::{BudgetTerms, GateConfig};
pub use cost_table::{cost_of, CostTable, LAMBDA_TABLE};
pub use lambda::{accumulate, cost, GateSnapshot, GateState, LambdaGate};
pub use validator::{
    measure, pack, patch_digest, validate, validate_with_table, BudgetStanding, EntropyReport,
    ValidationReport, ValidationResult,
};

/// 256-bit digest (SHA-256).
pub type Digest32 = [u8; 32];

/// Every way a pack or validation can fail. All are recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error(transparent)]
    Certificate(#[from] CertificateError),
    #[error(
        "patch hash mismatch: certificate binds {}, patch hashes to {}",
        hex::encode(expected),
        hex::encode(computed)
    )]
    HashMismatch { expected: Digest32, computed: Digest32 },
    #[error("budget {budget} > hard max {hard_max}")]
    BudgetExceedsHardMax { budget: u32, hard_max: u32 },
    #[error("epsilon {epsilon} > max {max}")]
    EpsilonOutOfBounds { epsilon: u32, max: u32 },
    #[error("Λ-cost {cost} > budget {budget}")]
    CostExceedsBudget { cost: u64, budget: u32 },
    #[error("invalid {field}: {reason}")]
    Input { field: &'static str, reason: String },
}

impl GateError {
    /// Stable short tag for logs and exit reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::Certificate(CertificateError::Size { .. }) => "size",
            GateError::Certificate(CertificateError::Magic { .. }) => "magic",
            GateError::HashMismatch { .. } => "hash_mismatch",
            GateError::BudgetExceedsHardMax { .. } => "budget_exceeds_hard_max",
            GateError::EpsilonOutOfBounds { .. } => "epsilon_out_of_bounds",
            GateError::CostExceedsBudget { .. } => "cost_exceeds_budget",
            GateError::Input { .. } => "input",
        }
    }
}
