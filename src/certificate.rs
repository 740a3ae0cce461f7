//! Fixed 512-byte certificate layout.
//!
//! | field       | offset | size |
//! |-------------|--------|------|
//! | magic       | 0      | 4    |
//! | budget      | 4      | 4    |
//! | hard_max    | 8      | 4    |
//! | epsilon     | 12     | 4    |
//! | parent_hash | 16     | 32   |
//! | patch_hash  | 48     | 32   |
//! | signature   | 80     | 64   |
//! | reserved    | 144    | 368  |
//!
//! Integers are little-endian. Decoding is purely structural.

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::{Digest32, GateError};

/// Total record size.
pub const CERT_LEN: usize = 512;
/// Format tag at offset 0.
pub const MAGIC: [u8; 4] = *b"OGT1";
pub const HASH_LEN: usize = 32;
pub const SIGNATURE_LEN: usize = 64;
pub const RESERVED_LEN: usize = 368;

const BUDGET_OFFSET: usize = 4;
const HARD_MAX_OFFSET: usize = 8;
const EPSILON_OFFSET: usize = 12;
const PARENT_HASH_OFFSET: usize = 16;
const PATCH_HASH_OFFSET: usize = 48;
const SIGNATURE_OFFSET: usize = 80;
const RESERVED_OFFSET: usize = 144;

/// Parent hash of a certificate with no predecessor.
pub const GENESIS_PARENT: Digest32 = [0u8; HASH_LEN];

/// Structural decode failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CertificateError {
    #[error("certificate must be {expected} bytes (got {actual})")]
    Size { expected: usize, actual: usize },
    #[error("invalid magic: {}", hex::encode(found))]
    Magic { found: [u8; 4] },
}

/// Decoded certificate. Fields are carried verbatim from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub magic: [u8; 4],
    pub budget: u32,
    pub hard_max: u32,
    pub epsilon: u32,
    pub parent_hash: Digest32,
    pub patch_hash: Digest32,
    pub signature: [u8; SIGNATURE_LEN],
    pub reserved: [u8; RESERVED_LEN],
}

impl Certificate {
    /// New unsigned certificate: zero signature, zero padding.
    pub fn new(
        budget: u32,
        hard_max: u32,
        epsilon: u32,
        parent_hash: Digest32,
        patch_hash: Digest32,
    ) -> Self {
        Self {
            magic: MAGIC,
            budget,
            hard_max,
            epsilon,
            parent_hash,
            patch_hash,
            signature: [0u8; SIGNATURE_LEN],
            reserved: [0u8; RESERVED_LEN],
        }
    }

    /// Serialize to the 512-byte wire layout.
    pub fn to_bytes(&self) -> [u8; CERT_LEN] {
        let mut out = [0u8; CERT_LEN];
        out[..BUDGET_OFFSET].copy_from_slice(&self.magic);
        out[BUDGET_OFFSET..HARD_MAX_OFFSET].copy_from_slice(&self.budget.to_le_bytes());
        out[HARD_MAX_OFFSET..EPSILON_OFFSET].copy_from_slice(&self.hard_max.to_le_bytes());
        out[EPSILON_OFFSET..PARENT_HASH_OFFSET].copy_from_slice(&self.epsilon.to_le_bytes());
        out[PARENT_HASH_OFFSET..PATCH_HASH_OFFSET].copy_from_slice(&self.parent_hash);
        out[PATCH_HASH_OFFSET..SIGNATURE_OFFSET].copy_from_slice(&self.patch_hash);
        out[SIGNATURE_OFFSET..RESERVED_OFFSET].copy_from_slice(&self.signature);
        out[RESERVED_OFFSET..].copy_from_slice(&self.reserved);
        out
    }

    /// Parse a record. Checks length, then magic, then copies fields out.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CertificateError> {
        if bytes.len() != CERT_LEN {
            return Err(CertificateError::Size {
                expected: CERT_LEN,
                actual: bytes.len(),
            });
        }
        let magic: [u8; 4] = field(bytes, 0);
        if magic != MAGIC {
            return Err(CertificateError::Magic { found: magic });
        }
        Ok(Self {
            magic,
            budget: u32::from_le_bytes(field(bytes, BUDGET_OFFSET)),
            hard_max: u32::from_le_bytes(field(bytes, HARD_MAX_OFFSET)),
            epsilon: u32::from_le_bytes(field(bytes, EPSILON_OFFSET)),
            parent_hash: field(bytes, PARENT_HASH_OFFSET),
            patch_hash: field(bytes, PATCH_HASH_OFFSET),
            signature: field(bytes, SIGNATURE_OFFSET),
            reserved: field(bytes, RESERVED_OFFSET),
        })
    }

    /// SHA-256 of the encoded record.
    pub fn digest(&self) -> Digest32 {
        certificate_digest(&self.to_bytes())
    }
}

// Caller guarantees `bytes.len() == CERT_LEN`, so every fixed window is in range.
fn field<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}

/// Encode a fresh certificate record.
pub fn encode(
    budget: u32,
    hard_max: u32,
    epsilon: u32,
    parent_hash: &Digest32,
    patch_hash: &Digest32,
) -> [u8; CERT_LEN] {
    Certificate::new(budget, hard_max, epsilon, *parent_hash, *patch_hash).to_bytes()
}

/// Decode a certificate record.
pub fn decode(bytes: &[u8]) -> Result<Certificate, CertificateError> {
    Certificate::from_bytes(bytes)
}

/// SHA-256 of an encoded certificate; what a successor stores as `parent_hash`.
pub fn certificate_digest(record: &[u8; CERT_LEN]) -> Digest32 {
    Sha256::digest(record).into()
}

/// Check a raw parent hash is exactly 32 bytes.
pub fn parent_hash_from_slice(bytes: &[u8]) -> Result<Digest32, GateError> {
    Digest32::try_from(bytes).map_err(|_| GateError::Input {
        field: "parent_hash",
        reason: format!("expected {HASH_LEN} bytes, got {}", bytes.len()),
    })
}

/// Parse a hex parent hash, with or without a `0x` prefix.
pub fn parse_parent_hash(text: &str) -> Result<Digest32, GateError> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|e| GateError::Input {
        field: "parent_hash",
        reason: format!("not valid hex: {e}"),
    })?;
    parent_hash_from_slice(&bytes)
}
