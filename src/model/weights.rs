use serde::{Deserialize, Serialize};

use crate::model::contest::ContestType;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub accuracy: f64,
    pub speed: f64,
    pub efficiency: f64,
}

impl ScoringWeights {
    pub fn for_contest(contest_type: ContestType) -> Self {
        match contest_type {
            ContestType::Coding => Self {
                accuracy: 0.40,
                speed: 0.35,
                efficiency: 0.25,
            },
            ContestType::Quiz => Self {
                accuracy: 0.70,
                speed: 0.30,
                efficiency: 0.0,
            },
            ContestType::Sports => Self {
                accuracy: 0.50,
                speed: 0.50,
                efficiency: 0.0,
            },
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::for_contest(ContestType::Coding)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EarlyBonusRule {
    pub max_bonus: u32,
    pub full_bonus_window_ms: i64,
    pub zero_bonus_after_ms: i64,
}

impl Default for EarlyBonusRule {
    fn default() -> Self {
        Self {
            max_bonus: 10,
            full_bonus_window_ms: 10 * 60 * 1000,
            zero_bonus_after_ms: 50 * 60 * 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PenaltyRule {
    pub max_allowed: u32,
    pub penalty_per_extra: u32,
}

impl Default for PenaltyRule {
    fn default() -> Self {
        Self {
            max_allowed: 3,
            penalty_per_extra: 5,
        }
    }
}

/// Tunables for one scoring run. Missing fields in a profile file take the v1 defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringProfile {
    pub baseline_time_ms: f64,
    pub baseline_memory_kb: f64,
    pub early_bonus: Option<EarlyBonusRule>,
    pub penalty: Option<PenaltyRule>,
}

impl ScoringProfile {
    pub fn default_v1() -> Self {
        Self {
            baseline_time_ms: 1000.0,
            baseline_memory_kb: 1024.0,
            early_bonus: None,
            penalty: None,
        }
    }

    pub fn with_modifiers_v1() -> Self {
        let mut base = Self::default_v1();
        base.early_bonus = Some(EarlyBonusRule::default());
        base.penalty = Some(PenaltyRule::default());
        base
    }

    pub fn has_modifiers(&self) -> bool {
        self.early_bonus.is_some() || self.penalty.is_some()
    }
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::default_v1()
    }
}
