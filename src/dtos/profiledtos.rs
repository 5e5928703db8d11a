use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    models::profilemodel::{GeoPoint, PricingRange, ProfessionalType, ServiceOffering},
    service::{discovery::Coordinates, verification::ReviewDecision},
};

/// Body of `POST /profiles`: registers a listing or replaces the provided fields of
/// the listing with the same `id`. Verification fields are not accepted here.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "Owner id is required"))]
    pub user_id: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub professional_type: Option<ProfessionalType>,

    #[validate(length(min = 1, max = 150, message = "Name must be between 1-150 characters"))]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub firm_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icai_registration_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_qualification: Option<String>,

    #[validate(range(min = 0, max = 80, message = "Experience must be between 0-80 years"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<i32>,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0-5"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[validate(range(min = 0, message = "Review count cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specializations: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceOffering>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_range: Option<PricingRange>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[validate(length(max = 10, message = "Pincode must be at most 10 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// GeoJSON alternative to `latitude`/`longitude`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

impl UpsertProfileDto {
    pub fn coordinates(&self) -> Option<Coordinates> {
        resolve_coordinates(self.location.as_ref(), self.latitude, self.longitude)
    }
}

/// Body of `PATCH /profiles/:id`. Absent fields are left untouched.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub professional_type: Option<ProfessionalType>,

    #[validate(length(min = 1, max = 150, message = "Name must be between 1-150 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub firm_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icai_registration_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_qualification: Option<String>,

    #[validate(range(min = 0, max = 80, message = "Experience must be between 0-80 years"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<i32>,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0-5"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[validate(range(min = 0, message = "Review count cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specializations: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceOffering>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_range: Option<PricingRange>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[validate(length(max = 10, message = "Pincode must be at most 10 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_online: Option<bool>,
}

impl UpdateProfileDto {
    pub fn coordinates(&self) -> Option<Coordinates> {
        resolve_coordinates(self.location.as_ref(), self.latitude, self.longitude)
    }

    pub fn avatar(avatar: impl Into<String>) -> Self {
        UpdateProfileDto {
            avatar: Some(avatar.into()),
            ..Default::default()
        }
    }

    pub fn online(is_online: bool) -> Self {
        UpdateProfileDto {
            is_online: Some(is_online),
            ..Default::default()
        }
    }
}

/// GeoJSON takes precedence over the flat pair; a half-given pair is ignored.
fn resolve_coordinates(
    location: Option<&GeoPoint>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Option<Coordinates> {
    if let Some(point) = location {
        return Coordinates::new(point.latitude(), point.longitude());
    }
    Coordinates::new(latitude?, longitude?)
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQueryDto {
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CoordinatesQueryDto {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl CoordinatesQueryDto {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::parse(self.lat.as_deref(), self.lon.as_deref())
    }
}

/// Body of `POST /profiles/:id/review`.
#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewProfileDto {
    #[validate(length(min = 1, message = "Reviewer id is required"))]
    pub reviewer_id: String,

    pub decision: ReviewDecision,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}
