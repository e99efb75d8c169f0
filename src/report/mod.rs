pub mod json;
pub mod md;

use crate::error::{PodTrustError, Result};
use crate::types::contribution::ContributionAggregate;
use crate::types::pod::ScoredPod;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render_matches(pods: &[ScoredPod], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(&pods).map_err(PodTrustError::Json),
        OutputFormat::Md => Ok(md::matches_to_markdown(pods)),
    }
}

pub fn render_aggregate(aggregate: &ContributionAggregate, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(aggregate).map_err(PodTrustError::Json),
        OutputFormat::Md => Ok(md::aggregate_to_markdown(aggregate)),
    }
}
