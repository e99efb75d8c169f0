use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two alternative tracks that lead to a trusted skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    Quiz,
    Certificate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    NotVerified,
    QuizAttempted,
    QuizPassed,
    CodingTestSubmitted,
    CodingTestPassed,
    CertificateSubmitted,
    CertificateVerified,
}

impl VerificationState {
    pub fn is_complete(self) -> bool {
        matches!(self, Self::CodingTestPassed | Self::CertificateVerified)
    }
}

impl fmt::Display for VerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotVerified => "not_verified",
            Self::QuizAttempted => "quiz_attempted",
            Self::QuizPassed => "quiz_passed",
            Self::CodingTestSubmitted => "coding_test_submitted",
            Self::CodingTestPassed => "coding_test_passed",
            Self::CertificateSubmitted => "certificate_submitted",
            Self::CertificateVerified => "certificate_verified",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillVerificationRecord {
    pub user_id: String,
    pub skill: String,
    pub state: VerificationState,
    pub level1_quiz_passed: bool,
    pub level2_coding_test_passed: bool,
    #[serde(default)]
    pub certificate_verified: bool,
    pub method: Option<VerificationMethod>,
    pub score: Option<u32>,
    pub updated_at: DateTime<Utc>,
}

impl SkillVerificationRecord {
    pub fn new(user_id: &str, skill: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            skill: skill.trim().to_string(),
            state: VerificationState::NotVerified,
            level1_quiz_passed: false,
            level2_coding_test_passed: false,
            certificate_verified: false,
            method: None,
            score: None,
            updated_at: now,
        }
    }

    pub fn level3_complete(&self) -> bool {
        (self.level1_quiz_passed && self.level2_coding_test_passed) || self.certificate_verified
    }
}
