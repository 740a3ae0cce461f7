//! End-to-end tests for packing, validating and streaming patches
//!
//! Tests cover:
//! - Known cost vectors
//! - Validation check ordering
//! - Streaming gate boundary and latch behavior
//! - Property-based tests for batch/streaming equivalence and the codec

use open_gate::{
    cost, cost_of, decode, encode, pack, validate, BudgetTerms, CertificateError, GateConfig,
    GateError, LambdaGate, CERT_LEN, GENESIS_PARENT,
};

fn terms(budget: u32, hard_max: u32) -> BudgetTerms {
    BudgetTerms::new(budget, hard_max, 50_000)
}

#[cfg(test)]
mod known_vectors {
    use super::*;

    #[test]
    fn test_single_and_pair() {
        assert_eq!(cost(b"A"), 450);
        assert_eq!(cost(b"AB"), 870);
        assert_eq!(cost(b""), 0);
    }

    #[test]
    fn test_pack_with_tight_budget_is_rejected() {
        let cfg = GateConfig::default();
        let cert = pack(b"AB", &terms(800, 1_000_000), &GENESIS_PARENT).unwrap();
        let err = validate(b"AB", &cert, &cfg).unwrap_err();
        assert_eq!(err, GateError::CostExceedsBudget { cost: 870, budget: 800 });
    }

    #[test]
    fn test_pack_with_generous_budget_is_accepted() {
        let cfg = GateConfig::default();
        let cert = pack(b"AB", &terms(1000, 1_000_000), &GENESIS_PARENT).unwrap();
        let report = validate(b"AB", &cert, &cfg).unwrap();
        assert_eq!(report.budget, 1000);
        assert_eq!(report.cost, 870);
        assert_eq!(report.margin, 130);
        assert_eq!(report.epsilon, 50_000);
    }
}

#[cfg(test)]
mod check_ordering {
    use super::*;

    #[test]
    fn test_budget_above_hard_max_even_at_low_cost() {
        let cfg = GateConfig::default();
        let cert = pack(b"", &terms(300_000, 250_000), &GENESIS_PARENT).unwrap();
        let err = validate(b"", &cert, &cfg).unwrap_err();
        assert_eq!(
            err,
            GateError::BudgetExceedsHardMax { budget: 300_000, hard_max: 250_000 }
        );
    }

    #[test]
    fn test_bad_magic_reported_before_hash() {
        let cfg = GateConfig::default();
        let mut cert = pack(b"AB", &terms(1000, 1000), &GENESIS_PARENT).unwrap();
        cert[0] = b'X';
        let err = validate(b"something else", &cert, &cfg).unwrap_err();
        assert_eq!(err.kind(), "magic");
    }

    #[test]
    fn test_tampered_patch_is_hash_mismatch() {
        let cfg = GateConfig::default();
        let cert = pack(b"AB", &terms(1000, 1000), &GENESIS_PARENT).unwrap();
        let err = validate(b"AB\x00", &cert, &cfg).unwrap_err();
        assert_eq!(err.kind(), "hash_mismatch");
    }

    #[test]
    fn test_epsilon_checked_before_cost() {
        let cfg = GateConfig { epsilon_max: 10, ..GateConfig::default() };
        let cert = pack(b"AB", &BudgetTerms::new(1, 1, 11), &GENESIS_PARENT).unwrap();
        let err = validate(b"AB", &cert, &cfg).unwrap_err();
        assert_eq!(err, GateError::EpsilonOutOfBounds { epsilon: 11, max: 10 });
    }

    #[test]
    fn test_validation_is_repeatable_and_shareable() {
        let cfg = GateConfig::default();
        let cert = pack(b"hello", &terms(10_000, 10_000), &GENESIS_PARENT).unwrap();
        let first = validate(b"hello", &cert, &cfg);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cfg = cfg.clone();
                std::thread::spawn(move || validate(b"hello", &cert, &cfg))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), first);
        }
    }
}

#[cfg(test)]
mod streaming_gate {
    use super::*;

    #[test]
    fn test_violation_mid_stream() {
        let patch = b"hello, world";
        let budget = 1500;
        let mut gate = LambdaGate::new(budget);
        let closed_at = gate.feed_all(patch).expect("gate should close");

        let before: u64 = patch[..closed_at].iter().map(|&b| u64::from(cost_of(b))).sum();
        let at: u64 = before + u64::from(cost_of(patch[closed_at]));
        assert!(before <= budget);
        assert!(at > budget);
        assert!(!gate.is_open());
        assert_eq!(gate.total(), cost(patch));
    }

    #[test]
    fn test_gate_agrees_with_validator() {
        let cfg = GateConfig::default();
        for budget in [0u32, 449, 450, 869, 870, 871] {
            let cert = pack(b"AB", &terms(budget, 1_000_000), &GENESIS_PARENT).unwrap();
            let accepted = validate(b"AB", &cert, &cfg).is_ok();

            let mut gate = LambdaGate::new(u64::from(budget));
            gate.feed_all(b"AB");
            assert_eq!(accepted, gate.is_open(), "budget {budget}");
            assert_eq!(accepted, !gate.violation(), "budget {budget}");
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_cost_is_sum_of_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let expected: u64 = bytes.iter().map(|&b| u64::from(cost_of(b))).sum();
            prop_assert_eq!(cost(&bytes), expected);
        }

        #[test]
        fn prop_streaming_matches_batch(
            bytes in proptest::collection::vec(any::<u8>(), 0..512),
            budget in 0u64..200_000,
        ) {
            let mut gate = LambdaGate::new(budget);
            for &b in &bytes {
                gate.feed(b);
            }
            prop_assert_eq!(gate.total(), cost(&bytes));
            prop_assert_eq!(gate.is_open(), cost(&bytes) <= budget);
        }

        #[test]
        fn prop_gate_never_reopens(
            bytes in proptest::collection::vec(any::<u8>(), 1..256),
            budget in 0u64..20_000,
        ) {
            let mut gate = LambdaGate::new(budget);
            let mut closed = false;
            for &b in &bytes {
                let snap = gate.feed(b);
                if closed {
                    prop_assert!(!snap.gate_open);
                    prop_assert!(snap.violation);
                }
                closed = !snap.gate_open;
                prop_assert_eq!(snap.gate_open, snap.total <= budget);
            }
        }

        #[test]
        fn prop_codec_recovers_fields(
            b in any::<u32>(),
            h in any::<u32>(),
            e in any::<u32>(),
            parent in proptest::array::uniform32(any::<u8>()),
            patch_hash in proptest::array::uniform32(any::<u8>()),
        ) {
            let bytes = encode(b, h, e, &parent, &patch_hash);
            prop_assert_eq!(bytes.len(), CERT_LEN);
            let cert = decode(&bytes).unwrap();
            prop_assert_eq!((cert.budget, cert.hard_max, cert.epsilon), (b, h, e));
            prop_assert_eq!(cert.parent_hash, parent);
            prop_assert_eq!(cert.patch_hash, patch_hash);
        }

        #[test]
        fn prop_wrong_length_is_size_error(len in 0usize..2048) {
            prop_assume!(len != CERT_LEN);
            let err = validate(b"", &vec![0u8; len], &GateConfig::default()).unwrap_err();
            prop_assert_eq!(
                err,
                GateError::Certificate(CertificateError::Size { expected: CERT_LEN, actual: len })
            );
        }
    }
}
