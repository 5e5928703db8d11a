//! Shared fixtures for unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{
    profilemodel::{CaProfile, PricingRange, ProfessionalType, VerificationStatus},
    usermodel::{User, UserRole},
};

pub fn epoch(offset_seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + offset_seconds, 0).unwrap()
}

pub fn user(id: &str, email: &str, role: UserRole) -> User {
    User {
        id: id.to_string(),
        name: id.to_uppercase(),
        email: email.to_string(),
        phone: String::new(),
        role,
        admin_role: None,
        avatar: None,
        bookmarks: Vec::new(),
        is_email_verified: false,
        created_at: epoch(0),
        updated_at: epoch(0),
    }
}

pub fn profile(id: &str, status: VerificationStatus, rating: f64) -> CaProfile {
    CaProfile {
        id: id.to_string(),
        user_id: format!("owner-{}", id),
        professional_type: ProfessionalType::Ca,
        name: format!("Professional {}", id),
        firm_name: None,
        icai_registration_number: None,
        professional_qualification: None,
        experience_years: 1,
        rating,
        review_count: 0,
        specializations: Vec::new(),
        languages: Vec::new(),
        about: String::new(),
        services: Vec::new(),
        pricing_range: PricingRange::Standard,
        avatar: None,
        city: "Hyderabad".to_string(),
        state: String::new(),
        pincode: String::new(),
        latitude: 17.3850,
        longitude: 78.4867,
        is_verified: status == VerificationStatus::Verified,
        is_online: false,
        verification_status: status,
        admin_feedback: None,
        created_at: epoch(0),
        updated_at: epoch(0),
    }
}
