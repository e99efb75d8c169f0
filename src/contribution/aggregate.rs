use crate::types::contribution::{
    ContributionAggregate, Scope, UserContribution, WorkFileContribution,
};
use std::collections::BTreeMap;
use tracing::warn;

fn mean(sum: u64, count: usize) -> u8 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Default)]
struct Tally {
    files: usize,
    ai: u64,
    human: u64,
}

impl Tally {
    fn add(&mut self, contribution: &WorkFileContribution) {
        self.files += 1;
        self.ai += u64::from(contribution.ai_percent);
        self.human += u64::from(contribution.human_percent);
    }
}

/// Rolls normalized contributions into scope-level averages. The AI and
/// human means are rounded independently and need not sum to 100. Records
/// whose split does not sum to 100 are left out.
pub fn aggregate(scope: &Scope, contributions: &[WorkFileContribution]) -> ContributionAggregate {
    let mut total = Tally::default();
    let mut by_user = BTreeMap::<&str, Tally>::new();
    for contribution in contributions.iter().filter(|c| scope.contains(c)) {
        if !contribution.is_normalized() {
            warn!(
                file = %contribution.file_id,
                ai = contribution.ai_percent,
                human = contribution.human_percent,
                "skipping work file with an unnormalized split"
            );
            continue;
        }
        total.add(contribution);
        by_user
            .entry(contribution.user_id.as_str())
            .or_default()
            .add(contribution);
    }

    let per_user = matches!(scope, Scope::Pod(_)).then(|| {
        let mut users = by_user
            .into_iter()
            .map(|(user_id, tally)| UserContribution {
                user_id: user_id.to_string(),
                total_files: tally.files,
                avg_ai: mean(tally.ai, tally.files),
                avg_human: mean(tally.human, tally.files),
            })
            .collect::<Vec<_>>();
        users.sort_by(|a, b| b.total_files.cmp(&a.total_files));
        users
    });

    if total.files == 0 {
        return ContributionAggregate {
            scope: scope.clone(),
            total_files: 0,
            avg_ai: 0,
            avg_human: 100,
            per_user,
        };
    }

    ContributionAggregate {
        scope: scope.clone(),
        total_files: total.files,
        avg_ai: mean(total.ai, total.files),
        avg_human: mean(total.human, total.files),
        per_user,
    }
}
