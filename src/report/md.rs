use crate::types::contribution::ContributionAggregate;
use crate::types::pod::ScoredPod;

pub fn matches_to_markdown(pods: &[ScoredPod]) -> String {
    let mut output = String::new();
    output.push_str("# Pod Matches\n\n");
    if pods.is_empty() {
        output.push_str("- none\n");
        return output;
    }

    for (rank, scored) in pods.iter().enumerate() {
        let distance = scored
            .distance_km
            .map(|km| format!(", {km:.1} km away"))
            .unwrap_or_default();
        output.push_str(&format!(
            "{}. {} (match {}, location {}, tech {}{})\n",
            rank + 1,
            scored.pod.name,
            scored.match_score,
            scored.location_score,
            scored.tech_score,
            distance
        ));
        if !scored.pod.skills_needed.is_empty() {
            output.push_str(&format!(
                "   skills: {}\n",
                scored.pod.skills_needed.join(", ")
            ));
        }
    }
    output
}

pub fn aggregate_to_markdown(aggregate: &ContributionAggregate) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Contributions: {}\n\n", aggregate.scope));
    output.push_str(&format!(
        "- files: {}\n- average AI: {}%\n- average human: {}%\n",
        aggregate.total_files, aggregate.avg_ai, aggregate.avg_human
    ));

    if let Some(per_user) = &aggregate.per_user {
        output.push_str("\n## By Member\n\n");
        if per_user.is_empty() {
            output.push_str("- none\n");
        }
        for user in per_user {
            output.push_str(&format!(
                "- {}: {} file(s), AI {}% / human {}%\n",
                user.user_id, user.total_files, user.avg_ai, user.avg_human
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::contribution::{Scope, UserContribution};

    #[test]
    fn empty_match_list_renders_placeholder() {
        let rendered = matches_to_markdown(&[]);
        assert!(rendered.contains("# Pod Matches"));
        assert!(rendered.contains("- none"));
    }

    #[test]
    fn pod_aggregate_lists_members() {
        let aggregate = ContributionAggregate {
            scope: Scope::Pod("p9".to_string()),
            total_files: 2,
            avg_ai: 25,
            avg_human: 75,
            per_user: Some(vec![UserContribution {
                user_id: "u1".to_string(),
                total_files: 2,
                avg_ai: 25,
                avg_human: 75,
            }]),
        };
        let rendered = aggregate_to_markdown(&aggregate);
        assert!(rendered.contains("# Contributions: pod p9"));
        assert!(rendered.contains("## By Member"));
        assert!(rendered.contains("- u1: 2 file(s), AI 25% / human 75%"));
    }
}
