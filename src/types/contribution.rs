use crate::error::PodTrustError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// AI/human authorship split of one artifact. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSplit {
    pub ai_percent: u8,
    pub human_percent: u8,
}

impl ContributionSplit {
    pub const HUMAN: Self = Self {
        ai_percent: 0,
        human_percent: 100,
    };

    /// Builds a split from an AI share, deriving the human share.
    pub fn from_ai(ai_percent: u8) -> Self {
        let ai_percent = ai_percent.min(100);
        Self {
            ai_percent,
            human_percent: 100 - ai_percent,
        }
    }
}

impl Default for ContributionSplit {
    fn default() -> Self {
        Self::HUMAN
    }
}

/// One normalized upload. Stored records are checked on the way in, so a
/// deserialized value always carries a split summing to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredContribution")]
pub struct WorkFileContribution {
    pub file_id: String,
    pub pod_id: String,
    pub user_id: String,
    pub ai_percent: u8,
    pub human_percent: u8,
}

impl WorkFileContribution {
    pub fn new(file_id: &str, pod_id: &str, user_id: &str, split: ContributionSplit) -> Self {
        Self {
            file_id: file_id.to_string(),
            pod_id: pod_id.to_string(),
            user_id: user_id.to_string(),
            ai_percent: split.ai_percent,
            human_percent: split.human_percent,
        }
    }

    pub fn is_normalized(&self) -> bool {
        u16::from(self.ai_percent) + u16::from(self.human_percent) == 100
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredContribution {
    file_id: String,
    pod_id: String,
    user_id: String,
    ai_percent: u8,
    human_percent: u8,
}

impl TryFrom<StoredContribution> for WorkFileContribution {
    type Error = PodTrustError;

    fn try_from(stored: StoredContribution) -> Result<Self, Self::Error> {
        let contribution = Self {
            file_id: stored.file_id,
            pod_id: stored.pod_id,
            user_id: stored.user_id,
            ai_percent: stored.ai_percent,
            human_percent: stored.human_percent,
        };
        if !contribution.is_normalized() {
            return Err(PodTrustError::Validation(format!(
                "work file {}: aiPercent {} and humanPercent {} must sum to 100",
                contribution.file_id, contribution.ai_percent, contribution.human_percent
            )));
        }
        Ok(contribution)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Scope {
    Pod(String),
    User(String),
    All,
}

impl Scope {
    pub fn contains(&self, contribution: &WorkFileContribution) -> bool {
        match self {
            Self::Pod(pod_id) => contribution.pod_id == *pod_id,
            Self::User(user_id) => contribution.user_id == *user_id,
            Self::All => true,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pod(id) => write!(f, "pod {id}"),
            Self::User(id) => write!(f, "user {id}"),
            Self::All => f.write_str("all files"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContribution {
    pub user_id: String,
    pub total_files: usize,
    pub avg_ai: u8,
    pub avg_human: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionAggregate {
    pub scope: Scope,
    pub total_files: usize,
    pub avg_ai: u8,
    pub avg_human: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_user: Option<Vec<UserContribution>>,
}
