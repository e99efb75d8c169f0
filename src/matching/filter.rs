use crate::error::{PodTrustError, Result};
use crate::matching::location::haversine_km;
use crate::types::pod::{GeoPoint, PodRecord, UserSignal};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFilters {
    /// Case-insensitive substring across name, description, skills and creator.
    pub search: Option<String>,
    /// Exact city equality.
    pub city: Option<String>,
    /// Case-insensitive substring against any required skill.
    pub tech: Option<String>,
    /// Keep only pods within this radius of the user.
    pub within_km: Option<f64>,
}

/// Filters checked against one request's user signal.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedFilters {
    search: Option<String>,
    city: Option<String>,
    tech: Option<String>,
    radius: Option<(GeoPoint, f64)>,
}

impl MatchFilters {
    pub(crate) fn resolve(&self, user: &UserSignal) -> Result<ResolvedFilters> {
        let city = match &self.city {
            Some(city) if city.trim().is_empty() => {
                return Err(PodTrustError::Validation(
                    "city filter cannot be blank".to_string(),
                ))
            }
            other => other.clone(),
        };

        let radius = match self.within_km {
            Some(km) if !km.is_finite() || km < 0.0 => {
                return Err(PodTrustError::Validation(format!(
                    "radius filter must be a non-negative distance (got {km})"
                )))
            }
            Some(km) => {
                let origin = user.coords().ok_or_else(|| {
                    PodTrustError::Validation(
                        "radius filter requires the user's coordinates".to_string(),
                    )
                })?;
                Some((origin, km))
            }
            None => None,
        };

        Ok(ResolvedFilters {
            search: lowered(self.search.as_deref()),
            city,
            tech: lowered(self.tech.as_deref()),
            radius,
        })
    }
}

fn lowered(value: Option<&str>) -> Option<String> {
    value
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
}

impl ResolvedFilters {
    pub(crate) fn keep(&self, pod: &PodRecord) -> bool {
        match self.rejection(pod) {
            Some(filter) => {
                debug!(pod = %pod.id, filter, "pod filtered out");
                false
            }
            None => true,
        }
    }

    /// Name of the first filter `pod` fails, if any.
    fn rejection(&self, pod: &PodRecord) -> Option<&'static str> {
        if let Some(term) = &self.search {
            let hit = pod.name.to_lowercase().contains(term)
                || pod.description.to_lowercase().contains(term)
                || pod.creator_name.to_lowercase().contains(term)
                || pod
                    .skills_needed
                    .iter()
                    .any(|skill| skill.to_lowercase().contains(term));
            if !hit {
                return Some("search");
            }
        }

        if let Some(city) = &self.city {
            if pod.city.as_deref() != Some(city.as_str()) {
                return Some("city");
            }
        }

        if let Some(tech) = &self.tech {
            if !pod
                .skills_needed
                .iter()
                .any(|skill| skill.to_lowercase().contains(tech))
            {
                return Some("tech");
            }
        }

        if let Some((origin, max_km)) = self.radius {
            match pod.coords() {
                Some(point) if haversine_km(origin, point) <= max_km => {}
                _ => return Some("within_km"),
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pod::UserLocation;
    use chrono::Utc;

    fn pod() -> PodRecord {
        PodRecord {
            id: "p1".to_string(),
            name: "Weekend Hack".to_string(),
            description: "Build a budgeting app".to_string(),
            creator_name: "Ravi Kumar".to_string(),
            skills_needed: vec!["React Native".to_string(), "Firebase".to_string()],
            team_size: 4,
            member_count: 2,
            city: Some("Pune".to_string()),
            location: Some(GeoPoint::new(18.5204, 73.8567)),
            created_at: Utc::now(),
        }
    }

    fn located_user() -> UserSignal {
        UserSignal {
            tech_stack: vec![],
            location: Some(UserLocation {
                lat: Some(18.5314),
                lng: Some(73.8446),
                city_name: Some("Pune".to_string()),
            }),
        }
    }

    #[test]
    fn search_matches_any_text_field_case_insensitively() {
        let user = UserSignal::default();
        for term in ["weekend", "BUDGETING", "ravi", "firebase"] {
            let filters = MatchFilters {
                search: Some(term.to_string()),
                ..MatchFilters::default()
            };
            let resolved = filters.resolve(&user).expect("filters should resolve");
            assert!(resolved.keep(&pod()), "search term {term} should match");
        }

        let filters = MatchFilters {
            search: Some("blockchain".to_string()),
            ..MatchFilters::default()
        };
        assert!(!filters
            .resolve(&user)
            .expect("filters should resolve")
            .keep(&pod()));
    }

    #[test]
    fn city_filter_requires_exact_equality() {
        let user = UserSignal::default();
        let exact = MatchFilters {
            city: Some("Pune".to_string()),
            ..MatchFilters::default()
        };
        assert!(exact.resolve(&user).expect("resolve").keep(&pod()));

        let lowercase = MatchFilters {
            city: Some("pune".to_string()),
            ..MatchFilters::default()
        };
        assert!(!lowercase.resolve(&user).expect("resolve").keep(&pod()));
    }

    #[test]
    fn tech_filter_uses_substring_containment() {
        let user = UserSignal::default();
        let filters = MatchFilters {
            tech: Some("react".to_string()),
            ..MatchFilters::default()
        };
        assert!(filters.resolve(&user).expect("resolve").keep(&pod()));
    }

    #[test]
    fn blank_city_filter_is_rejected() {
        let filters = MatchFilters {
            city: Some("   ".to_string()),
            ..MatchFilters::default()
        };
        let err = filters
            .resolve(&UserSignal::default())
            .expect_err("blank city should fail");
        assert!(matches!(err, PodTrustError::Validation(_)));
    }

    #[test]
    fn radius_filter_requires_user_coordinates() {
        let filters = MatchFilters {
            within_km: Some(25.0),
            ..MatchFilters::default()
        };
        let err = filters
            .resolve(&UserSignal::default())
            .expect_err("radius without coordinates should fail");
        assert!(err.to_string().contains("requires the user's coordinates"));
    }

    #[test]
    fn radius_filter_drops_distant_and_unlocated_pods() {
        let filters = MatchFilters {
            within_km: Some(5.0),
            ..MatchFilters::default()
        };
        let resolved = filters.resolve(&located_user()).expect("resolve");
        assert!(resolved.keep(&pod()));

        let mut far = pod();
        far.location = Some(GeoPoint::new(19.0760, 72.8777));
        assert!(!resolved.keep(&far));

        let mut unlocated = pod();
        unlocated.location = None;
        assert!(!resolved.keep(&unlocated));
    }

    #[test]
    fn rejection_names_the_first_failing_filter() {
        let filters = MatchFilters {
            search: Some("budgeting".to_string()),
            city: Some("Mumbai".to_string()),
            tech: Some("kotlin".to_string()),
            ..MatchFilters::default()
        };
        let resolved = filters.resolve(&located_user()).expect("resolve");
        assert_eq!(resolved.rejection(&pod()), Some("city"));

        let far = MatchFilters {
            within_km: Some(0.5),
            ..MatchFilters::default()
        };
        let resolved = far.resolve(&located_user()).expect("resolve");
        assert_eq!(resolved.rejection(&pod()), Some("within_km"));

        let resolved = MatchFilters::default()
            .resolve(&located_user())
            .expect("resolve");
        assert_eq!(resolved.rejection(&pod()), None);
    }
}
