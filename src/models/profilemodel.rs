// models/profilemodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default coordinates (Hyderabad) for listings registered without a location.
pub const DEFAULT_LATITUDE: f64 = 17.3850;
pub const DEFAULT_LONGITUDE: f64 = 78.4867;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "professional_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ProfessionalType {
    #[default]
    Ca,
    Accountant,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "pricing_range")]
pub enum PricingRange {
    Budget,
    #[default]
    Standard,
    Premium,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash, Default)]
#[sqlx(type_name = "verification_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    EmailVerified,
    PendingAdminApproval,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn to_str(&self) -> &str {
        match self {
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::EmailVerified => "email_verified",
            VerificationStatus::PendingAdminApproval => "pending_admin_approval",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, VerificationStatus::Verified | VerificationStatus::Rejected)
    }

    /// Statuses listed in the admin verification queue.
    pub fn is_queued(&self) -> bool {
        !self.is_terminal()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCategory {
    #[serde(rename = "Income Tax Services")]
    IncomeTax,
    #[serde(rename = "GST Services")]
    Gst,
    #[serde(rename = "Audit & Assurance")]
    Audit,
    #[serde(rename = "Business & Company Services")]
    BusinessCompliance,
    #[serde(rename = "Accounting & Bookkeeping")]
    Accounting,
    #[serde(rename = "Financial Advisory")]
    FinancialAdvisory,
    #[serde(rename = "Compliance & Legal")]
    Legal,
}

impl ServiceCategory {
    pub fn label(&self) -> &str {
        match self {
            ServiceCategory::IncomeTax => "Income Tax Services",
            ServiceCategory::Gst => "GST Services",
            ServiceCategory::Audit => "Audit & Assurance",
            ServiceCategory::BusinessCompliance => "Business & Company Services",
            ServiceCategory::Accounting => "Accounting & Bookkeeping",
            ServiceCategory::FinancialAdvisory => "Financial Advisory",
            ServiceCategory::Legal => "Compliance & Legal",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    pub id: String,
    pub category: ServiceCategory,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_price: Option<f64>,
    #[serde(default)]
    pub is_fixed_price: bool,
}

/// GeoJSON point, coordinates ordered `[longitude, latitude]`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaProfile {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub professional_type: ProfessionalType,
    pub name: String,
    pub firm_name: Option<String>,
    pub icai_registration_number: Option<String>,
    pub professional_qualification: Option<String>,
    pub experience_years: i32,
    pub rating: f64,
    pub review_count: i32,
    pub specializations: Vec<String>,
    pub languages: Vec<String>,
    pub about: String,
    #[sqlx(json)]
    pub services: Vec<ServiceOffering>,
    pub pricing_range: PricingRange,
    pub avatar: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_verified: bool,
    pub is_online: bool,
    pub verification_status: VerificationStatus,
    pub admin_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CaProfile {
    /// Only fully verified professionals can be messaged.
    pub fn is_contactable(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }
}

/// A profile returned by the proximity search, with its distance from the query point.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NearbyProfile {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub profile: CaProfile,
    pub distance_km: f64,
}
