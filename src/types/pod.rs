use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Resolved location of the requesting user. Coordinates may still be
/// pending (e.g. geolocation not yet resolved) while the city is known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLocation {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub city_name: Option<String>,
}

impl UserLocation {
    pub fn coords(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(GeoPoint::new(lat, lng))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSignal {
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub location: Option<UserLocation>,
}

impl UserSignal {
    pub fn coords(&self) -> Option<GeoPoint> {
        self.location.as_ref().and_then(UserLocation::coords)
    }

    pub fn city_name(&self) -> Option<&str> {
        self.location
            .as_ref()
            .and_then(|location| location.city_name.as_deref())
            .map(str::trim)
            .filter(|city| !city.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub skills_needed: Vec<String>,
    #[serde(default)]
    pub team_size: u32,
    #[serde(default)]
    pub member_count: u32,
    pub city: Option<String>,
    pub location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}

impl PodRecord {
    pub fn coords(&self) -> Option<GeoPoint> {
        self.location
            .filter(|point| point.lat.is_finite() && point.lng.is_finite())
    }

    pub fn city_name(&self) -> Option<&str> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
    }
}

/// A pod ranked for one request. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPod {
    #[serde(flatten)]
    pub pod: PodRecord,
    pub match_score: u8,
    pub location_score: u8,
    pub tech_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub pod_id: String,
    pub match_score: u8,
}

impl From<&ScoredPod> for MatchResult {
    fn from(scored: &ScoredPod) -> Self {
        Self {
            pod_id: scored.pod.id.clone(),
            match_score: scored.match_score,
        }
    }
}
