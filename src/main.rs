use std::error::Error;

use open_gate::{
    certificate_digest, measure, pack, validate, BudgetTerms, GateConfig, LambdaGate,
    GENESIS_PARENT,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = GateConfig::from_env();
    tracing::info!(?config, "open_gate v{}", env!("CARGO_PKG_VERSION"));

    // Sample patch: 'A' (450 pJ) then 'B' (420 pJ).
    let patch = b"AB";
    let entropy = measure(patch, &config);
    println!(
        "Λ-cost = {} pJ ({} bytes, {:.1} pJ/byte, {:?})",
        entropy.cost, entropy.len, entropy.average_pj_per_byte, entropy.standing
    );

    let defaults = BudgetTerms::defaults(&config);
    let generous = pack(patch, &defaults.with_budget(1000), &GENESIS_PARENT)?;
    let report = validate(patch, &generous, &config)?;
    println!("{report}");
    println!("{}", serde_json::to_string(&report)?);

    // Child certificate chained to the first one, with a budget below the cost.
    let parent = certificate_digest(&generous);
    let tight = pack(patch, &defaults.with_budget(800), &parent)?;
    match validate(patch, &tight, &config) {
        Ok(report) => println!("{report}"),
        Err(e) => println!("ERROR ({}): {e}", e.kind()),
    }

    // Same blob through the streaming gate.
    let mut gate = LambdaGate::new(800);
    for &byte in patch {
        let snap = gate.feed(byte);
        println!(
            "byte 0x{byte:02x}: total={} gate_open={} violation={}",
            snap.total, snap.gate_open, snap.violation
        );
    }

    Ok(())
}
