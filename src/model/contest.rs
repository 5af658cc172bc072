use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Selects the scoring weights; anything unrecognised scores as `Coding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestType {
    #[default]
    Coding,
    Quiz,
    Sports,
}

impl ContestType {
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "quiz" => ContestType::Quiz,
            "sports" => ContestType::Sports,
            _ => ContestType::Coding,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContestType::Coding => "coding",
            ContestType::Quiz => "quiz",
            ContestType::Sports => "sports",
        }
    }
}

impl<'de> Deserialize<'de> for ContestType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse_lenient).unwrap_or_default())
    }
}

/// Opaque to scoring; carried so a contest document round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub contest_type: ContestType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

impl Contest {
    pub fn duration_ms(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds()
    }

    /// Milliseconds between contest start and `at`; negative before the start.
    pub fn delay_ms(&self, at: DateTime<Utc>) -> i64 {
        (at - self.start_time).num_milliseconds()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.end_time <= self.start_time {
            return Err(format!(
                "contest {} ends at {} which is not after its start {}",
                self.id, self.end_time, self.start_time
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/contest.rs"]
mod tests;
