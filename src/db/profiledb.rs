// db/profiledb.rs
use async_trait::async_trait;
use sqlx::{types::Json, Error};

use super::{DBClient, Upsert};
use crate::{
    dtos::profiledtos::{UpdateProfileDto, UpsertProfileDto},
    models::profilemodel::{CaProfile, NearbyProfile, VerificationStatus, DEFAULT_LATITUDE, DEFAULT_LONGITUDE},
    service::{
        discovery::Coordinates,
        error::ServiceError,
        verification::{self, ReviewDecision, ReviewOutcome},
    },
    utils::id_generator::generate_profile_id,
};

/// Mean earth radius used by the proximity search.
const EARTH_RADIUS_KM: f64 = 6371.0088;

#[async_trait]
pub trait ProfileExt {
    async fn get_profiles(&self, user_id: Option<&str>) -> Result<Vec<CaProfile>, Error>;

    async fn get_profiles_by_status(&self, status: VerificationStatus) -> Result<Vec<CaProfile>, Error>;

    async fn get_profile(&self, profile_id: &str) -> Result<Option<CaProfile>, Error>;

    async fn upsert_profile(&self, dto: &UpsertProfileDto) -> Result<Upsert<CaProfile>, Error>;

    async fn update_profile(
        &self,
        profile_id: &str,
        dto: &UpdateProfileDto,
    ) -> Result<Option<CaProfile>, Error>;

    async fn review_profile(
        &self,
        profile_id: &str,
        decision: ReviewDecision,
        feedback: Option<&str>,
    ) -> Result<Option<(CaProfile, ReviewOutcome)>, ServiceError>;

    async fn get_nearby_profiles(
        &self,
        origin: Coordinates,
        radius_km: f64,
    ) -> Result<Vec<NearbyProfile>, Error>;
}

#[async_trait]
impl ProfileExt for DBClient {
    async fn get_profiles(&self, user_id: Option<&str>) -> Result<Vec<CaProfile>, Error> {
        sqlx::query_as::<_, CaProfile>(concat!(
            "SELECT ",
            profile_columns!(),
            " FROM ca_profiles WHERE ($1::text IS NULL OR user_id = $1) ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_profiles_by_status(&self, status: VerificationStatus) -> Result<Vec<CaProfile>, Error> {
        sqlx::query_as::<_, CaProfile>(concat!(
            "SELECT ",
            profile_columns!(),
            " FROM ca_profiles WHERE verification_status = $1 ORDER BY created_at"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_profile(&self, profile_id: &str) -> Result<Option<CaProfile>, Error> {
        sqlx::query_as::<_, CaProfile>(concat!("SELECT ", profile_columns!(), " FROM ca_profiles WHERE id = $1"))
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn upsert_profile(&self, dto: &UpsertProfileDto) -> Result<Upsert<CaProfile>, Error> {
        let mut tx = self.pool.begin().await?;
        let coordinates = dto.coordinates();

        let existing: Option<String> = match dto.id.as_deref() {
            Some(id) => {
                sqlx::query_scalar("SELECT id FROM ca_profiles WHERE id = $1 FOR UPDATE")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
            }
            None => None,
        };

        let outcome = match existing {
            Some(id) => {
                let profile = sqlx::query_as::<_, CaProfile>(concat!(
                    r#"
                    UPDATE ca_profiles
                    SET user_id = $2,
                        professional_type = COALESCE($3, professional_type),
                        name = $4,
                        firm_name = COALESCE($5, firm_name),
                        icai_registration_number = COALESCE($6, icai_registration_number),
                        professional_qualification = COALESCE($7, professional_qualification),
                        experience_years = COALESCE($8, experience_years),
                        rating = COALESCE($9, rating),
                        review_count = COALESCE($10, review_count),
                        specializations = COALESCE($11, specializations),
                        languages = COALESCE($12, languages),
                        about = COALESCE($13, about),
                        services = COALESCE($14, services),
                        pricing_range = COALESCE($15, pricing_range),
                        avatar = COALESCE($16, avatar),
                        city = COALESCE($17, city),
                        state = COALESCE($18, state),
                        pincode = COALESCE($19, pincode),
                        latitude = COALESCE($20, latitude),
                        longitude = COALESCE($21, longitude),
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING "#,
                    profile_columns!()
                ))
                .bind(&id)
                .bind(&dto.user_id)
                .bind(dto.professional_type)
                .bind(&dto.name)
                .bind(dto.firm_name.as_deref())
                .bind(dto.icai_registration_number.as_deref())
                .bind(dto.professional_qualification.as_deref())
                .bind(dto.experience_years)
                .bind(dto.rating)
                .bind(dto.review_count)
                .bind(dto.specializations.as_ref())
                .bind(dto.languages.as_ref())
                .bind(dto.about.as_deref())
                .bind(dto.services.as_ref().map(Json))
                .bind(dto.pricing_range)
                .bind(dto.avatar.as_deref())
                .bind(dto.city.as_deref())
                .bind(dto.state.as_deref())
                .bind(dto.pincode.as_deref())
                .bind(coordinates.map(|c| c.latitude))
                .bind(coordinates.map(|c| c.longitude))
                .fetch_one(&mut *tx)
                .await?;
                Upsert::Replaced(profile)
            }
            None => {
                let id = dto.id.clone().unwrap_or_else(generate_profile_id);
                let profile = sqlx::query_as::<_, CaProfile>(concat!(
                    r#"
                    INSERT INTO ca_profiles (
                        id, user_id, professional_type, name, firm_name, icai_registration_number,
                        professional_qualification, experience_years, rating, review_count,
                        specializations, languages, about, services, pricing_range, avatar,
                        city, state, pincode, latitude, longitude
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                            $17, $18, $19, $20, $21)
                    RETURNING "#,
                    profile_columns!()
                ))
                .bind(&id)
                .bind(&dto.user_id)
                .bind(dto.professional_type.unwrap_or_default())
                .bind(&dto.name)
                .bind(dto.firm_name.as_deref())
                .bind(dto.icai_registration_number.as_deref())
                .bind(dto.professional_qualification.as_deref())
                .bind(dto.experience_years.unwrap_or(0))
                .bind(dto.rating.unwrap_or(0.0))
                .bind(dto.review_count.unwrap_or(0))
                .bind(dto.specializations.clone().unwrap_or_default())
                .bind(dto.languages.clone().unwrap_or_default())
                .bind(dto.about.clone().unwrap_or_default())
                .bind(Json(dto.services.clone().unwrap_or_default()))
                .bind(dto.pricing_range.unwrap_or_default())
                .bind(dto.avatar.as_deref())
                .bind(dto.city.clone().unwrap_or_default())
                .bind(dto.state.clone().unwrap_or_default())
                .bind(dto.pincode.clone().unwrap_or_default())
                .bind(coordinates.map_or(DEFAULT_LATITUDE, |c| c.latitude))
                .bind(coordinates.map_or(DEFAULT_LONGITUDE, |c| c.longitude))
                .fetch_one(&mut *tx)
                .await?;
                Upsert::Created(profile)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn update_profile(
        &self,
        profile_id: &str,
        dto: &UpdateProfileDto,
    ) -> Result<Option<CaProfile>, Error> {
        let coordinates = dto.coordinates();

        sqlx::query_as::<_, CaProfile>(concat!(
            r#"
            UPDATE ca_profiles
            SET professional_type = COALESCE($2, professional_type),
                name = COALESCE($3, name),
                firm_name = COALESCE($4, firm_name),
                icai_registration_number = COALESCE($5, icai_registration_number),
                professional_qualification = COALESCE($6, professional_qualification),
                experience_years = COALESCE($7, experience_years),
                rating = COALESCE($8, rating),
                review_count = COALESCE($9, review_count),
                specializations = COALESCE($10, specializations),
                languages = COALESCE($11, languages),
                about = COALESCE($12, about),
                services = COALESCE($13, services),
                pricing_range = COALESCE($14, pricing_range),
                avatar = COALESCE($15, avatar),
                city = COALESCE($16, city),
                state = COALESCE($17, state),
                pincode = COALESCE($18, pincode),
                latitude = COALESCE($19, latitude),
                longitude = COALESCE($20, longitude),
                is_online = COALESCE($21, is_online),
                updated_at = NOW()
            WHERE id = $1
            RETURNING "#,
            profile_columns!()
        ))
        .bind(profile_id)
        .bind(dto.professional_type)
        .bind(dto.name.as_deref())
        .bind(dto.firm_name.as_deref())
        .bind(dto.icai_registration_number.as_deref())
        .bind(dto.professional_qualification.as_deref())
        .bind(dto.experience_years)
        .bind(dto.rating)
        .bind(dto.review_count)
        .bind(dto.specializations.as_ref())
        .bind(dto.languages.as_ref())
        .bind(dto.about.as_deref())
        .bind(dto.services.as_ref().map(Json))
        .bind(dto.pricing_range)
        .bind(dto.avatar.as_deref())
        .bind(dto.city.as_deref())
        .bind(dto.state.as_deref())
        .bind(dto.pincode.as_deref())
        .bind(coordinates.map(|c| c.latitude))
        .bind(coordinates.map(|c| c.longitude))
        .bind(dto.is_online)
        .fetch_optional(&self.pool)
        .await
    }

    async fn review_profile(
        &self,
        profile_id: &str,
        decision: ReviewDecision,
        feedback: Option<&str>,
    ) -> Result<Option<(CaProfile, ReviewOutcome)>, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<VerificationStatus> = sqlx::query_scalar(
            "SELECT verification_status FROM ca_profiles WHERE id = $1 FOR UPDATE",
        )
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        let outcome = verification::review(current, decision, feedback)?;

        let profile = sqlx::query_as::<_, CaProfile>(concat!(
            r#"
            UPDATE ca_profiles
            SET verification_status = $2,
                is_verified = $3,
                admin_feedback = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING "#,
            profile_columns!()
        ))
        .bind(profile_id)
        .bind(outcome.status)
        .bind(outcome.is_verified)
        .bind(outcome.admin_feedback.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some((profile, outcome)))
    }

    async fn get_nearby_profiles(
        &self,
        origin: Coordinates,
        radius_km: f64,
    ) -> Result<Vec<NearbyProfile>, Error> {
        // Haversine distance; LEAST guards ASIN against rounding just above 1.
        sqlx::query_as::<_, NearbyProfile>(concat!(
            "SELECT * FROM (SELECT ",
            profile_columns!(),
            r#",
                   2 * $3 * ASIN(LEAST(1.0, SQRT(
                       POWER(SIN(RADIANS(latitude - $1) / 2), 2)
                       + COS(RADIANS($1)) * COS(RADIANS(latitude))
                       * POWER(SIN(RADIANS(longitude - $2) / 2), 2)
                   ))) AS distance_km
                FROM ca_profiles
                WHERE verification_status = $4
            ) AS nearby
            WHERE distance_km <= $5
            ORDER BY distance_km ASC
            "#
        ))
        .bind(origin.latitude)
        .bind(origin.longitude)
        .bind(EARTH_RADIUS_KM)
        .bind(VerificationStatus::Verified)
        .bind(radius_km)
        .fetch_all(&self.pool)
        .await
    }
}
