use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::certificate::{self, parent_hash_from_slice, CERT_LEN};
use crate::config::{BudgetTerms, GateConfig};
use crate::cost_table::CostTable;
use crate::lambda::accumulate;
use crate::{Digest32, GateError};

/// Successful validation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub budget: u32,
    pub cost: u64,
    pub margin: u64,
    pub epsilon: u32,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "certificate valid")?;
        writeln!(f, "  budget:  {} pJ", self.budget)?;
        writeln!(f, "  Λ-cost:  {} pJ", self.cost)?;
        writeln!(f, "  margin:  {} pJ", self.margin)?;
        write!(f, "  epsilon: {} pJ", self.epsilon)
    }
}

pub type ValidationResult = Result<ValidationReport, GateError>;

/// SHA-256 content hash of a patch.
pub fn patch_digest(patch: &[u8]) -> Digest32 {
    Sha256::digest(patch).into()
}

/// Build the certificate binding `patch` to `terms`.
///
/// The terms are written as given; a certificate whose budget exceeds its
/// hard max packs fine and is rejected at validation.
pub fn pack(
    patch: &[u8],
    terms: &BudgetTerms,
    parent_hash: &[u8],
) -> Result<[u8; CERT_LEN], GateError> {
    let parent = parent_hash_from_slice(parent_hash)?;
    let patch_hash = patch_digest(patch);
    debug!(
        budget = terms.budget,
        hard_max = terms.hard_max,
        epsilon = terms.epsilon,
        patch_len = patch.len(),
        patch_hash = %hex::encode(&patch_hash[..8]),
        "packed certificate"
    );
    Ok(certificate::encode(
        terms.budget,
        terms.hard_max,
        terms.epsilon,
        &parent,
        &patch_hash,
    ))
}

/// Check `cert_bytes` against `patch` under the standard cost table.
pub fn validate(patch: &[u8], cert_bytes: &[u8], config: &GateConfig) -> ValidationResult {
    validate_with_table(&CostTable::STANDARD, patch, cert_bytes, config)
}

/// Check `cert_bytes` against `patch`. The first failing check wins.
pub fn validate_with_table(
    table: &CostTable,
    patch: &[u8],
    cert_bytes: &[u8],
    config: &GateConfig,
) -> ValidationResult {
    let result = run_checks(table, patch, cert_bytes, config);
    match &result {
        Ok(report) => info!(
            budget = report.budget,
            cost = report.cost,
            margin = report.margin,
            "certificate accepted"
        ),
        Err(e) => warn!(kind = e.kind(), error = %e, "certificate rejected"),
    }
    result
}

fn run_checks(
    table: &CostTable,
    patch: &[u8],
    cert_bytes: &[u8],
    config: &GateConfig,
) -> ValidationResult {
    let cert = certificate::decode(cert_bytes)?;

    let computed = patch_digest(patch);
    if computed != cert.patch_hash {
        return Err(GateError::HashMismatch {
            expected: cert.patch_hash,
            computed,
        });
    }

    if cert.budget > cert.hard_max {
        return Err(GateError::BudgetExceedsHardMax {
            budget: cert.budget,
            hard_max: cert.hard_max,
        });
    }

    if cert.epsilon > config.epsilon_max {
        return Err(GateError::EpsilonOutOfBounds {
            epsilon: cert.epsilon,
            max: config.epsilon_max,
        });
    }

    let cost = accumulate(table, patch);
    let budget = u64::from(cert.budget);
    if cost > budget {
        return Err(GateError::CostExceedsBudget {
            cost,
            budget: cert.budget,
        });
    }

    Ok(ValidationReport {
        budget: cert.budget,
        cost,
        margin: budget - cost,
        epsilon: cert.epsilon,
    })
}

/// Where a blob's cost sits relative to the configured defaults.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub enum BudgetStanding {
    WithinDefaultBudget,
    ExceedsDefaultBudget,
    ExceedsHardMax,
}

/// Λ-cost summary of a blob.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntropyReport {
    pub len: usize,
    pub cost: u64,
    pub average_pj_per_byte: f64,
    pub standing: BudgetStanding,
}

/// Measure a blob against the configured default budget and hard max.
pub fn measure(bytes: &[u8], config: &GateConfig) -> EntropyReport {
    let cost = accumulate(&CostTable::STANDARD, bytes);
    let average_pj_per_byte = if bytes.is_empty() {
        0.0
    } else {
        cost as f64 / bytes.len() as f64
    };
    let standing = if cost > u64::from(config.default_hard_max) {
        BudgetStanding::ExceedsHardMax
    } else if cost > u64::from(config.default_budget) {
        BudgetStanding::ExceedsDefaultBudget
    } else {
        BudgetStanding::WithinDefaultBudget
    };
    debug!(len = bytes.len(), cost, ?standing, "measured blob");
    EntropyReport {
        len: bytes.len(),
        cost,
        average_pj_per_byte,
        standing,
    }
}
