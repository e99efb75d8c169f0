use crate::types::config::MatchSettings;
use crate::types::pod::{GeoPoint, PodRecord, UserSignal};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationScore {
    pub score: u8,
    pub distance_km: Option<f64>,
}

/// Great-circle distance between two points.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

pub fn distance_score(distance_km: f64, settings: &MatchSettings) -> u8 {
    settings
        .bands
        .iter()
        .find(|band| distance_km <= band.max_km)
        .map_or(settings.beyond_score, |band| band.score)
}

pub fn location_score(user: &UserSignal, pod: &PodRecord, settings: &MatchSettings) -> LocationScore {
    if let (Some(from), Some(to)) = (user.coords(), pod.coords()) {
        let distance_km = haversine_km(from, to);
        return LocationScore {
            score: distance_score(distance_km, settings),
            distance_km: Some(distance_km),
        };
    }

    let score = match (user.city_name(), pod.city_name()) {
        (Some(user_city), Some(pod_city)) if user_city.to_lowercase() == pod_city.to_lowercase() => {
            settings.city_match_score
        }
        (Some(_), Some(_)) => settings.city_mismatch_score,
        _ => 0,
    };
    LocationScore {
        score,
        distance_km: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pod::UserLocation;
    use chrono::Utc;

    fn pod(city: Option<&str>, location: Option<GeoPoint>) -> PodRecord {
        PodRecord {
            id: "p".to_string(),
            name: "pod".to_string(),
            description: String::new(),
            creator_name: String::new(),
            skills_needed: vec![],
            team_size: 4,
            member_count: 1,
            city: city.map(ToString::to_string),
            location,
            created_at: Utc::now(),
        }
    }

    fn user(lat: Option<f64>, lng: Option<f64>, city: Option<&str>) -> UserSignal {
        UserSignal {
            tech_stack: vec![],
            location: Some(UserLocation {
                lat,
                lng,
                city_name: city.map(ToString::to_string),
            }),
        }
    }

    #[test]
    fn haversine_bangalore_to_chennai_is_about_290_km() {
        let distance = haversine_km(
            GeoPoint::new(12.9716, 77.5946),
            GeoPoint::new(13.0827, 80.2707),
        );
        assert!((280.0..300.0).contains(&distance), "got {distance}");
    }

    #[test]
    fn distance_bands_follow_the_table() {
        let settings = MatchSettings::default();
        assert_eq!(distance_score(0.0, &settings), 100);
        assert_eq!(distance_score(10.0, &settings), 100);
        assert_eq!(distance_score(10.5, &settings), 80);
        assert_eq!(distance_score(50.0, &settings), 80);
        assert_eq!(distance_score(99.9, &settings), 60);
        assert_eq!(distance_score(200.0, &settings), 40);
        assert_eq!(distance_score(200.1, &settings), 20);
    }

    #[test]
    fn distance_score_never_increases_with_distance() {
        let settings = MatchSettings::default();
        let mut previous = u8::MAX;
        for step in 0..600 {
            let score = distance_score(f64::from(step) * 0.5, &settings);
            assert!(score <= previous, "score rose at {} km", f64::from(step) * 0.5);
            previous = score;
        }
    }

    #[test]
    fn coordinates_take_precedence_over_city_names() {
        let settings = MatchSettings::default();
        let result = location_score(
            &user(Some(12.9716), Some(77.5946), Some("Chennai")),
            &pod(Some("Chennai"), Some(GeoPoint::new(13.0827, 80.2707))),
            &settings,
        );
        assert_eq!(result.score, 20);
        assert!(result.distance_km.is_some());
    }

    #[test]
    fn city_names_compare_case_insensitively_without_coordinates() {
        let settings = MatchSettings::default();
        let matched = location_score(
            &user(None, None, Some("bengaluru")),
            &pod(Some("Bengaluru"), None),
            &settings,
        );
        assert_eq!(matched.score, 100);
        assert!(matched.distance_km.is_none());

        let mismatched = location_score(
            &user(Some(12.9), Some(77.5), Some("Bengaluru")),
            &pod(Some("Mumbai"), None),
            &settings,
        );
        assert_eq!(mismatched.score, 30);
    }

    #[test]
    fn missing_location_data_scores_zero() {
        let settings = MatchSettings::default();
        let no_user = UserSignal::default();
        assert_eq!(
            location_score(&no_user, &pod(Some("Pune"), None), &settings).score,
            0
        );
        assert_eq!(
            location_score(&user(None, None, Some("Pune")), &pod(None, None), &settings).score,
            0
        );
    }
}
