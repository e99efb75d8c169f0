//! AI/human authorship attribution for uploaded work files.
//!
//! Normalization never fails: every edge case resolves to a split that sums
//! to 100, falling back to full human credit when nothing better is known.

pub mod aggregate;

use crate::analysis::{contribution_prompt, extract_json, ContentAnalyzer};
use crate::types::config::ContributionSettings;
use crate::types::contribution::ContributionSplit;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

pub use aggregate::aggregate;

/// Caller-supplied percentages that skip analysis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualSplit {
    pub ai_percent: f64,
    pub human_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContributionInput {
    pub content: Option<String>,
    pub description: Option<String>,
    pub file_type: Option<String>,
    pub manual: Option<ManualSplit>,
}

impl ContributionInput {
    /// Decodes raw file bytes. Binary artifacts count as having no content.
    pub fn text_from_bytes(bytes: &[u8]) -> Option<String> {
        if bytes.contains(&0) {
            return None;
        }
        std::str::from_utf8(bytes).ok().map(ToString::to_string)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSource {
    EmptyContent,
    TooShort,
    Analyzed,
    Manual,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedContribution {
    #[serde(flatten)]
    pub split: ContributionSplit,
    pub source: SplitSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl NormalizedContribution {
    fn human(source: SplitSource) -> Self {
        Self {
            split: ContributionSplit::HUMAN,
            source,
            reasoning: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalysisEstimate {
    ai_contribution_percent: f64,
    human_contribution_percent: f64,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    confidence: Option<Value>,
}

/// Rescales a raw pair to sum to exactly 100 and clamps it into range.
pub fn rescale(ai: f64, human: f64) -> ContributionSplit {
    let ai = if ai.is_finite() { ai } else { 0.0 };
    let human = if human.is_finite() { human } else { 0.0 };
    let total = ai + human;
    if total <= 0.0 {
        return ContributionSplit::HUMAN;
    }
    let ai_percent = (ai / total * 100.0).round().clamp(0.0, 100.0) as u8;
    ContributionSplit::from_ai(ai_percent)
}

pub async fn normalize_contribution(
    analyzer: Option<&dyn ContentAnalyzer>,
    input: &ContributionInput,
    settings: &ContributionSettings,
) -> NormalizedContribution {
    if let Some(manual) = input.manual {
        return NormalizedContribution {
            split: rescale(manual.ai_percent, manual.human_percent),
            source: SplitSource::Manual,
            reasoning: None,
        };
    }

    let content = match input.content.as_deref().map(str::trim) {
        Some(content) if !content.is_empty() => content,
        _ => {
            debug!("no text content; crediting uploader");
            return NormalizedContribution::human(SplitSource::EmptyContent);
        }
    };

    if content.chars().count() < settings.min_content_chars {
        debug!(
            chars = content.chars().count(),
            min = settings.min_content_chars,
            "content too short to attribute; crediting uploader"
        );
        return NormalizedContribution::human(SplitSource::TooShort);
    }

    let Some(analyzer) = analyzer else {
        warn!("no content analyzer configured; crediting uploader");
        return NormalizedContribution::human(SplitSource::Fallback);
    };

    let prompt = contribution_prompt(
        content,
        input.description.as_deref(),
        input.file_type.as_deref(),
    );
    let raw = match tokio::time::timeout(settings.timeout, analyzer.analyze(&prompt, None)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(error)) => {
            warn!(%error, "content analysis failed; crediting uploader");
            return NormalizedContribution::human(SplitSource::Fallback);
        }
        Err(_) => {
            warn!(
                timeout_secs = settings.timeout.as_secs(),
                "content analysis timed out; crediting uploader"
            );
            return NormalizedContribution::human(SplitSource::Fallback);
        }
    };

    let estimate: AnalysisEstimate = match extract_json(&raw) {
        Ok(estimate) => estimate,
        Err(error) => {
            warn!(%error, "unusable content analysis answer; crediting uploader");
            return NormalizedContribution::human(SplitSource::Fallback);
        }
    };

    let raw_sum = estimate.ai_contribution_percent + estimate.human_contribution_percent;
    if (raw_sum - 100.0).abs() > f64::EPSILON {
        debug!(
            ai = estimate.ai_contribution_percent,
            human = estimate.human_contribution_percent,
            "estimate does not sum to 100; rescaling"
        );
    }
    debug!(confidence = ?estimate.confidence, "content analysis estimate received");

    NormalizedContribution {
        split: rescale(
            estimate.ai_contribution_percent,
            estimate.human_contribution_percent,
        ),
        source: SplitSource::Analyzed,
        reasoning: estimate.reasoning,
    }
}
