//! Location-skill ranking of candidate pods.
//!
//! Scoring is a pure function of the request's inputs. Nothing is cached
//! between calls: the user's coordinates or tech stack can change from one
//! request to the next.

pub mod filter;
pub mod location;
pub mod tech;

use crate::error::Result;
use crate::types::config::MatchSettings;
use crate::types::pod::{PodRecord, ScoredPod, UserSignal};
pub use filter::MatchFilters;
use tracing::debug;

pub fn composite_score(location_score: u8, tech_score: u8, settings: &MatchSettings) -> u8 {
    let blended = settings.location_weight * f64::from(location_score)
        + settings.tech_weight * f64::from(tech_score);
    blended.round().clamp(0.0, 100.0) as u8
}

pub fn score_pod(user: &UserSignal, pod: &PodRecord, settings: &MatchSettings) -> ScoredPod {
    let location = location::location_score(user, pod, settings);
    let tech_score = tech::tech_score(&user.tech_stack, &pod.skills_needed, settings);
    ScoredPod {
        pod: pod.clone(),
        match_score: composite_score(location.score, tech_score, settings),
        location_score: location.score,
        tech_score,
        distance_km: location.distance_km,
    }
}

/// Filters `pods`, scores the survivors against `user` and ranks them by
/// match score, newest first on ties.
pub fn match_pods(
    user: &UserSignal,
    pods: &[PodRecord],
    filters: &MatchFilters,
    settings: &MatchSettings,
) -> Result<Vec<ScoredPod>> {
    let resolved = filters.resolve(user)?;

    let mut ranked = pods
        .iter()
        .filter(|pod| resolved.keep(pod))
        .map(|pod| score_pod(user, pod, settings))
        .collect::<Vec<_>>();

    ranked.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| b.pod.created_at.cmp(&a.pod.created_at))
    });

    debug!(
        candidates = pods.len(),
        ranked = ranked.len(),
        "ranked pods for match request"
    );
    Ok(ranked)
}
