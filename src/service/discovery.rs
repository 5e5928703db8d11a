// service/discovery.rs
//! Public discovery of professionals: search filters, proximity and the
//! top-rated fallback used when nothing is nearby.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::profilemodel::{CaProfile, NearbyProfile, ProfessionalType, VerificationStatus};

/// A profile is publicly listed only once an administrator has verified it.
pub fn is_discoverable(profile: &CaProfile) -> bool {
    profile.verification_status == VerificationStatus::Verified
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Coordinates { latitude, longitude })
    }

    /// Parses raw query values; `None` when either is missing or not a usable coordinate.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Option<Self> {
        let latitude = lat?.trim().parse::<f64>().ok()?;
        let longitude = lon?.trim().parse::<f64>().ok()?;
        Coordinates::new(latitude, longitude)
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub professional_type: Option<ProfessionalType>,
    pub category: Option<String>,
    pub state: Option<String>,
    pub min_experience: Option<i32>,
}

impl SearchCriteria {
    pub fn matches(&self, profile: &CaProfile) -> bool {
        if let Some(term) = non_empty(&self.q) {
            let term = term.to_lowercase();
            let hit = profile.name.to_lowercase().contains(&term)
                || profile
                    .firm_name
                    .as_deref()
                    .is_some_and(|firm| firm.to_lowercase().contains(&term))
                || profile
                    .specializations
                    .iter()
                    .any(|s| s.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        if let Some(kind) = self.professional_type {
            if profile.professional_type != kind {
                return false;
            }
        }

        if let Some(category) = non_empty(&self.category) {
            let offered = profile.specializations.iter().any(|s| s == category)
                || profile
                    .services
                    .iter()
                    .any(|service| service.category.label() == category);
            if !offered {
                return false;
            }
        }

        if let Some(state) = non_empty(&self.state) {
            if profile.state != state {
                return false;
            }
        }

        match self.min_experience {
            Some(min) if min > 0 => profile.experience_years >= min,
            _ => true,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Default discovery: verified profiles that satisfy every criterion.
pub fn search(profiles: Vec<CaProfile>, criteria: &SearchCriteria) -> Vec<CaProfile> {
    profiles
        .into_iter()
        .filter(|profile| is_discoverable(profile) && criteria.matches(profile))
        .collect()
}

/// Verified profiles by descending rating, at most `limit`.
pub fn top_rated(profiles: Vec<CaProfile>, limit: usize) -> Vec<CaProfile> {
    let mut ranked: Vec<CaProfile> = profiles.into_iter().filter(is_discoverable).collect();
    ranked.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);
    ranked
}

/// Profiles highlighted on the landing page: the closest verified professionals,
/// or the best rated ones when there are none nearby or no location is known.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", content = "profiles", rename_all = "snake_case")]
pub enum FeaturedProfiles {
    Nearby(Vec<NearbyProfile>),
    TopRated(Vec<CaProfile>),
}

impl FeaturedProfiles {
    /// `None` when the proximity search came back empty.
    pub fn from_nearby(mut nearby: Vec<NearbyProfile>, limit: usize) -> Option<Self> {
        if nearby.is_empty() {
            return None;
        }
        nearby.truncate(limit);
        Some(FeaturedProfiles::Nearby(nearby))
    }

    pub fn top_rated(profiles: Vec<CaProfile>, limit: usize) -> Self {
        FeaturedProfiles::TopRated(top_rated(profiles, limit))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FeaturedProfiles::TopRated(_))
    }

    pub fn len(&self) -> usize {
        match self {
            FeaturedProfiles::Nearby(profiles) => profiles.len(),
            FeaturedProfiles::TopRated(profiles) => profiles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
