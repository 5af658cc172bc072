use serde::{Serialize, Serializer};

use crate::model::submission::JudgeMeasurements;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParamViolation {
    #[error("testCasesPassed cannot be negative")]
    NegativePassed,
    #[error("totalTestCases must be positive")]
    NonPositiveTotal,
    #[error("testCasesPassed cannot exceed totalTestCases")]
    PassedExceedsTotal,
    #[error("executionTime cannot be negative")]
    NegativeExecutionTime,
    #[error("memoryUsage cannot be negative")]
    NegativeMemoryUsage,
}

impl Serialize for ParamViolation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ParamViolation>,
}

/// Lists every violated constraint; never fails.
pub fn validate_scoring_params(params: &JudgeMeasurements) -> ValidationReport {
    let mut errors = Vec::new();
    if params.test_cases_passed < 0 {
        errors.push(ParamViolation::NegativePassed);
    }
    if params.total_test_cases <= 0 {
        errors.push(ParamViolation::NonPositiveTotal);
    }
    if params.test_cases_passed > params.total_test_cases {
        errors.push(ParamViolation::PassedExceedsTotal);
    }
    if params.execution_time_ms < 0.0 {
        errors.push(ParamViolation::NegativeExecutionTime);
    }
    if params.memory_usage_kb < 0.0 {
        errors.push(ParamViolation::NegativeMemoryUsage);
    }
    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/scoring/validate.rs"]
mod tests;
