use serde::{Deserialize, Serialize};
use tracing::warn;

/// Budget defaults and the epsilon ceiling shared by packer and validator.
/// Every cooperating implementation, including the hardware gate, must be
/// configured with the same values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Budget used when the caller supplies none, pJ.
    pub default_budget: u32,
    /// Hard maximum used when the caller supplies none, pJ.
    pub default_hard_max: u32,
    /// Side-channel tolerance used when the caller supplies none, pJ.
    pub default_epsilon: u32,
    /// Largest epsilon a certificate may declare, pJ.
    pub epsilon_max: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            default_budget: 300_000,
            default_hard_max: 1_000_000,
            default_epsilon: 50_000,
            epsilon_max: 50_000,
        }
    }
}

impl GateConfig {
    /// Defaults overridden by `OPEN_GATE_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a JSON document; missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let slots: [(&str, &mut u32); 4] = [
            ("OPEN_GATE_DEFAULT_BUDGET", &mut self.default_budget),
            ("OPEN_GATE_DEFAULT_HARD_MAX", &mut self.default_hard_max),
            ("OPEN_GATE_DEFAULT_EPSILON", &mut self.default_epsilon),
            ("OPEN_GATE_EPSILON_MAX", &mut self.epsilon_max),
        ];
        for (key, slot) in slots {
            if let Some(raw) = lookup(key) {
                match raw.trim().parse() {
                    Ok(v) => *slot = v,
                    Err(_) => warn!(key, value = %raw, "ignoring unparsable override"),
                }
            }
        }
        self
    }
}

/// Budget / hard max / epsilon triple written into a certificate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetTerms {
    pub budget: u32,
    pub hard_max: u32,
    pub epsilon: u32,
}

impl BudgetTerms {
    pub fn new(budget: u32, hard_max: u32, epsilon: u32) -> Self {
        Self {
            budget,
            hard_max,
            epsilon,
        }
    }

    pub fn defaults(config: &GateConfig) -> Self {
        Self::new(
            config.default_budget,
            config.default_hard_max,
            config.default_epsilon,
        )
    }

    pub fn with_budget(self, budget: u32) -> Self {
        Self { budget, ..self }
    }
}
