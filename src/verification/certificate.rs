use crate::analysis::{certificate_prompt, extract_json, ContentAnalyzer, ImageAttachment};
use crate::error::{PodTrustError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateVerdict {
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certificate_name: String,
    #[serde(default)]
    pub issuing_organization: String,
    #[serde(default)]
    pub message: String,
}

impl CertificateVerdict {
    pub fn verifies(&self, skill: &str) -> bool {
        let wanted = skill.trim().to_lowercase();
        self.is_valid
            && self
                .skills
                .iter()
                .any(|listed| listed.trim().to_lowercase() == wanted)
    }

    pub fn verified_skills(&self, requested: &[String]) -> Vec<String> {
        requested
            .iter()
            .filter(|skill| self.verifies(skill))
            .cloned()
            .collect()
    }
}

/// Asks the analysis capability to review a certificate image. Capability
/// failures surface as errors: there is no safe default verdict.
pub async fn review_certificate(
    analyzer: &dyn ContentAnalyzer,
    requested: &[String],
    image: &ImageAttachment,
    timeout: Duration,
) -> Result<CertificateVerdict> {
    let requested = requested
        .iter()
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect::<Vec<_>>();
    if requested.is_empty() {
        return Err(PodTrustError::Validation(
            "at least one skill must be requested for certificate review".to_string(),
        ));
    }
    if image.data.is_empty() {
        return Err(PodTrustError::Validation(
            "certificate image is empty".to_string(),
        ));
    }

    let prompt = certificate_prompt(&requested);
    let raw = tokio::time::timeout(timeout, analyzer.analyze(&prompt, Some(image)))
        .await
        .map_err(|_| {
            PodTrustError::Capability(format!(
                "certificate review timed out after {}s",
                timeout.as_secs()
            ))
        })??;
    let verdict: CertificateVerdict = extract_json(&raw)?;

    info!(
        valid = verdict.is_valid,
        certificate = %verdict.certificate_name,
        issuer = %verdict.issuing_organization,
        "certificate reviewed"
    );
    Ok(verdict)
}
