// db/userdb.rs
use async_trait::async_trait;
use sqlx::Error;

use super::{DBClient, Upsert};
use crate::{
    dtos::userdtos::{UpdateUserDto, UpsertUserDto},
    models::{
        profilemodel::CaProfile,
        usermodel::{AdminRole, User, UserRole, ADMIN_AVATAR_SEED, ADMIN_NAME, ADMIN_PHONE, ADMIN_USER_ID},
    },
    service::{
        error::ServiceError,
        verification::{self, Transition},
    },
    utils::{avatar::signup_avatar, id_generator::generate_user_id},
};

/// State after an email confirmation: the user and, for professionals, their profile.
#[derive(Debug, Clone)]
pub struct EmailConfirmation {
    pub user: User,
    pub profile: Option<CaProfile>,
    pub transition: Option<Transition>,
}

#[async_trait]
pub trait UserExt {
    async fn get_users(&self, email: Option<&str>) -> Result<Vec<User>, Error>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, Error>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error>;

    async fn upsert_user(&self, dto: &UpsertUserDto) -> Result<Upsert<User>, Error>;

    async fn update_user(&self, user_id: &str, dto: &UpdateUserDto) -> Result<Option<User>, Error>;

    async fn ensure_admin(&self, email: &str) -> Result<User, Error>;

    async fn confirm_email(
        &self,
        user_id: &str,
        profile_id: Option<&str>,
    ) -> Result<Option<EmailConfirmation>, ServiceError>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_users(&self, email: Option<&str>) -> Result<Vec<User>, Error> {
        sqlx::query_as::<_, User>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE ($1::text IS NULL OR LOWER(email) = LOWER($1)) ORDER BY created_at"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(concat!("SELECT ", user_columns!(), " FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_user(&self, dto: &UpsertUserDto) -> Result<Upsert<User>, Error> {
        let mut tx = self.pool.begin().await?;
        let email = dto.email.trim();

        // An explicit id match wins over an email match.
        let existing: Option<String> = sqlx::query_scalar(
            r#"
            SELECT id FROM users
            WHERE id = $1 OR LOWER(email) = LOWER($2)
            ORDER BY (id = $1) IS TRUE DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(dto.id.as_deref())
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match existing {
            Some(id) => {
                let user = sqlx::query_as::<_, User>(concat!(
                    r#"
                    UPDATE users
                    SET name = COALESCE($2, name),
                        email = $3,
                        phone = COALESCE($4, phone),
                        role = COALESCE($5, role),
                        admin_role = COALESCE($6, admin_role),
                        avatar = COALESCE($7, avatar),
                        bookmarks = COALESCE($8, bookmarks),
                        is_email_verified = COALESCE($9, is_email_verified),
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING "#,
                    user_columns!()
                ))
                .bind(&id)
                .bind(dto.name.as_deref())
                .bind(email)
                .bind(dto.phone.as_deref())
                .bind(dto.role)
                .bind(dto.admin_role)
                .bind(dto.avatar.as_deref())
                .bind(dto.bookmarks.as_ref())
                .bind(dto.is_email_verified)
                .fetch_one(&mut *tx)
                .await?;
                Upsert::Replaced(user)
            }
            None => {
                let id = dto.id.clone().unwrap_or_else(generate_user_id);
                let name = dto.name.clone().unwrap_or_else(|| dto.default_name());
                let user = sqlx::query_as::<_, User>(concat!(
                    r#"
                    INSERT INTO users
                        (id, name, email, phone, role, admin_role, avatar, bookmarks, is_email_verified)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    RETURNING "#,
                    user_columns!()
                ))
                .bind(&id)
                .bind(&name)
                .bind(email)
                .bind(dto.phone.clone().unwrap_or_default())
                .bind(dto.role.unwrap_or_default())
                .bind(dto.admin_role)
                .bind(dto.avatar.as_deref())
                .bind(dto.bookmarks.clone().unwrap_or_default())
                .bind(dto.is_email_verified.unwrap_or(false))
                .fetch_one(&mut *tx)
                .await?;
                Upsert::Created(user)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn update_user(&self, user_id: &str, dto: &UpdateUserDto) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(concat!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                role = COALESCE($5, role),
                admin_role = COALESCE($6, admin_role),
                avatar = COALESCE($7, avatar),
                bookmarks = COALESCE($8, bookmarks),
                is_email_verified = COALESCE($9, is_email_verified),
                updated_at = NOW()
            WHERE id = $1
            RETURNING "#,
            user_columns!()
        ))
        .bind(user_id)
        .bind(dto.name.as_deref())
        .bind(dto.email.as_deref().map(str::trim))
        .bind(dto.phone.as_deref())
        .bind(dto.role)
        .bind(dto.admin_role)
        .bind(dto.avatar.as_deref())
        .bind(dto.bookmarks.as_ref())
        .bind(dto.is_email_verified)
        .fetch_optional(&self.pool)
        .await
    }

    async fn ensure_admin(&self, email: &str) -> Result<User, Error> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, phone, role, admin_role, avatar, is_email_verified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(ADMIN_USER_ID)
        .bind(ADMIN_NAME)
        .bind(email)
        .bind(ADMIN_PHONE)
        .bind(UserRole::Admin)
        .bind(AdminRole::Super)
        .bind(signup_avatar(ADMIN_AVATAR_SEED))
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            tracing::info!("Seeded administrator account {}", email);
        }

        self.get_user_by_email(email).await?.ok_or(Error::RowNotFound)
    }

    async fn confirm_email(
        &self,
        user_id: &str,
        profile_id: Option<&str>,
    ) -> Result<Option<EmailConfirmation>, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(concat!(
            "UPDATE users SET is_email_verified = TRUE, updated_at = NOW() WHERE id = $1 RETURNING ",
            user_columns!()
        ))
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        if !user.role.is_professional() {
            tx.commit().await?;
            return Ok(Some(EmailConfirmation {
                user,
                profile: None,
                transition: None,
            }));
        }

        let profile = sqlx::query_as::<_, CaProfile>(concat!(
            "SELECT ",
            profile_columns!(),
            " FROM ca_profiles WHERE user_id = $1 AND ($2::text IS NULL OR id = $2) \
             ORDER BY created_at LIMIT 1 FOR UPDATE"
        ))
        .bind(&user.id)
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(profile) = profile else {
            tx.commit().await?;
            return Ok(Some(EmailConfirmation {
                user,
                profile: None,
                transition: None,
            }));
        };

        let transition = verification::confirm_email(user.role, profile.verification_status)?;
        let profile = match transition {
            Transition::Advanced { to, .. } => {
                sqlx::query_as::<_, CaProfile>(concat!(
                    "UPDATE ca_profiles SET verification_status = $2, updated_at = NOW() WHERE id = $1 RETURNING ",
                    profile_columns!()
                ))
                .bind(&profile.id)
                .bind(to)
                .fetch_one(&mut *tx)
                .await?
            }
            Transition::Unchanged(_) => profile,
        };

        tx.commit().await?;

        if let Transition::Advanced { from, to } = transition {
            tracing::info!(
                "Profile {} moved from {} to {}",
                profile.id,
                from.to_str(),
                to.to_str()
            );
        }

        Ok(Some(EmailConfirmation {
            user,
            profile: Some(profile),
            transition: Some(transition),
        }))
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::models::profilemodel::VerificationStatus::{self, *};

    async fn seed_user(pool: &PgPool, id: &str, role: UserRole) -> Result<(), Error> {
        sqlx::query("INSERT INTO users (id, name, email, role) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(id.to_uppercase())
            .bind(format!("{}@taxmitra.test", id))
            .bind(role)
            .execute(pool)
            .await?;
        Ok(())
    }

    async fn seed_profile(
        pool: &PgPool,
        id: &str,
        owner: &str,
        status: VerificationStatus,
    ) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO ca_profiles (id, user_id, name, verification_status, is_verified) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(owner)
        .bind(format!("Professional {}", id))
        .bind(status)
        .bind(status == Verified)
        .execute(pool)
        .await?;
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn confirmation_queues_profile_once(pool: PgPool) -> Result<(), ServiceError> {
        seed_user(&pool, "u-ca", UserRole::Ca).await?;
        seed_profile(&pool, "ca-1", "u-ca", Unverified).await?;
        let db_client = DBClient::new(pool);

        let first = db_client.confirm_email("u-ca", None).await?.unwrap();
        assert!(first.user.is_email_verified);
        assert_eq!(
            first.transition,
            Some(Transition::Advanced {
                from: Unverified,
                to: PendingAdminApproval
            })
        );
        assert_eq!(first.profile.unwrap().verification_status, PendingAdminApproval);

        let second = db_client.confirm_email("u-ca", Some("ca-1")).await?.unwrap();
        assert_eq!(second.transition, Some(Transition::Unchanged(PendingAdminApproval)));
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn confirmation_never_moves_decided_profiles_back(pool: PgPool) -> Result<(), ServiceError> {
        seed_user(&pool, "u-ca", UserRole::Ca).await?;
        seed_user(&pool, "u-acc", UserRole::Accountant).await?;
        seed_profile(&pool, "ca-ok", "u-ca", Verified).await?;
        seed_profile(&pool, "acc-no", "u-acc", Rejected).await?;
        let db_client = DBClient::new(pool.clone());

        for (user_id, profile_id, status) in [("u-ca", "ca-ok", Verified), ("u-acc", "acc-no", Rejected)] {
            let confirmation = db_client.confirm_email(user_id, None).await?.unwrap();
            assert_eq!(confirmation.transition, Some(Transition::Unchanged(status)));

            let stored: VerificationStatus =
                sqlx::query_scalar("SELECT verification_status FROM ca_profiles WHERE id = $1")
                    .bind(profile_id)
                    .fetch_one(&pool)
                    .await?;
            assert_eq!(stored, status);
        }
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn confirmation_targets_the_named_profile(pool: PgPool) -> Result<(), ServiceError> {
        seed_user(&pool, "u-ca", UserRole::Ca).await?;
        seed_profile(&pool, "ca-first", "u-ca", Verified).await?;
        seed_profile(&pool, "ca-second", "u-ca", EmailVerified).await?;
        let db_client = DBClient::new(pool);

        let confirmation = db_client.confirm_email("u-ca", Some("ca-second")).await?.unwrap();
        let profile = confirmation.profile.unwrap();
        assert_eq!(profile.id, "ca-second");
        assert_eq!(profile.verification_status, PendingAdminApproval);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn clients_only_get_the_email_flag(pool: PgPool) -> Result<(), ServiceError> {
        seed_user(&pool, "u-cl", UserRole::Client).await?;
        seed_profile(&pool, "ca-odd", "u-cl", Unverified).await?;
        let db_client = DBClient::new(pool);

        let confirmation = db_client.confirm_email("u-cl", None).await?.unwrap();
        assert!(confirmation.user.is_email_verified);
        assert!(confirmation.profile.is_none());
        assert!(confirmation.transition.is_none());
        assert_eq!(
            db_client.get_user("u-cl").await?.map(|user| user.is_email_verified),
            Some(true)
        );

        assert!(db_client.confirm_email("u-nobody", None).await?.is_none());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn professional_without_profile_still_gets_flag(pool: PgPool) -> Result<(), ServiceError> {
        seed_user(&pool, "u-new", UserRole::Accountant).await?;
        let db_client = DBClient::new(pool);

        let confirmation = db_client.confirm_email("u-new", None).await?.unwrap();
        assert!(confirmation.user.is_email_verified);
        assert!(confirmation.profile.is_none());
        Ok(())
    }
}
