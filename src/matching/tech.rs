use crate::types::config::MatchSettings;

fn normalized(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|skill| skill.trim().to_lowercase())
        .filter(|skill| !skill.is_empty())
        .collect()
}

/// Bidirectional containment: "react" matches "React Native" and vice versa.
pub fn skills_overlap(user_skill: &str, pod_skill: &str) -> bool {
    pod_skill.contains(user_skill) || user_skill.contains(pod_skill)
}

pub fn tech_score(user_stack: &[String], pod_skills: &[String], settings: &MatchSettings) -> u8 {
    let user_stack = normalized(user_stack);
    if user_stack.is_empty() {
        return settings.neutral_tech_score;
    }

    let pod_skills = normalized(pod_skills);
    if pod_skills.is_empty() {
        return 0;
    }

    let matched = pod_skills
        .iter()
        .filter(|pod_skill| {
            user_stack
                .iter()
                .any(|user_skill| skills_overlap(user_skill, pod_skill))
        })
        .count();

    (matched as f64 / pod_skills.len() as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn partial_overlap_rounds_to_nearest_percent() {
        let settings = MatchSettings::default();
        let score = tech_score(
            &skills(&["React", "Node.js"]),
            &skills(&["React", "Node.js", "MongoDB"]),
            &settings,
        );
        assert_eq!(score, 67);
    }

    #[test]
    fn containment_matches_in_both_directions() {
        let settings = MatchSettings::default();
        assert_eq!(
            tech_score(&skills(&["react"]), &skills(&["React Native"]), &settings),
            100
        );
        assert_eq!(
            tech_score(&skills(&["Spring Boot"]), &skills(&["spring"]), &settings),
            100
        );
    }

    #[test]
    fn empty_user_stack_is_neutral_regardless_of_pod() {
        let settings = MatchSettings::default();
        assert_eq!(tech_score(&[], &skills(&["Rust"]), &settings), 50);
        assert_eq!(tech_score(&skills(&["  "]), &[], &settings), 50);
    }

    #[test]
    fn pod_without_skills_scores_zero() {
        let settings = MatchSettings::default();
        assert_eq!(tech_score(&skills(&["Rust"]), &[], &settings), 0);
    }

    #[test]
    fn disjoint_skills_score_zero() {
        let settings = MatchSettings::default();
        assert_eq!(
            tech_score(&skills(&["Python"]), &skills(&["Go", "Kubernetes"]), &settings),
            0
        );
    }
}
