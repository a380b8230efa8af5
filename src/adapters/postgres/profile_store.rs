//! PostgreSQL implementation of the `ProfileStore` port.
//!
//! Rows are mapped by hand so the database schema never leaks into the
//! domain types. Driver errors are classified into the store error
//! taxonomy by SQLSTATE code; everything unrecognized lands in
//! `StoreError::Backend`.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{Role, StoreError, Timestamp, UserId};
use crate::domain::profile::{BrandProfile, CoreProfileRecord, CreatorProfile};
use crate::ports::ProfileStore;

/// PostgreSQL-backed profile store.
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a SQLSTATE code to the store error taxonomy.
pub(crate) fn classify_pg_code(code: &str, message: &str) -> StoreError {
    match code {
        "23505" => StoreError::UniqueViolation,
        "42501" => StoreError::PermissionDenied,
        _ => StoreError::backend(message),
    }
}

fn map_db_error(error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) => match db.code() {
            Some(code) => classify_pg_code(code.as_ref(), db.message()),
            None => StoreError::backend(db.message()),
        },
        _ => StoreError::backend(error.to_string()),
    }
}

fn core_from_row(row: &PgRow) -> Result<CoreProfileRecord, StoreError> {
    let user_id: Uuid = row.try_get("user_id").map_err(map_db_error)?;
    let role: Option<String> = row.try_get("role").map_err(map_db_error)?;
    let onboarding_completed: bool = row
        .try_get("onboarding_completed")
        .map_err(map_db_error)?;
    let created_at: chrono::DateTime<chrono::Utc> =
        row.try_get("created_at").map_err(map_db_error)?;
    let updated_at: chrono::DateTime<chrono::Utc> =
        row.try_get("updated_at").map_err(map_db_error)?;

    Ok(CoreProfileRecord {
        user_id: UserId::from_uuid(user_id),
        role,
        onboarding_completed,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

fn creator_from_row(row: &PgRow) -> Result<CreatorProfile, StoreError> {
    let user_id: Uuid = row.try_get("user_id").map_err(map_db_error)?;
    let platforms: Vec<String> = row.try_get("platforms").map_err(map_db_error)?;
    let follower_count: i64 = row.try_get("follower_count").map_err(map_db_error)?;
    let niches: Vec<String> = row.try_get("niches").map_err(map_db_error)?;
    let bio: Option<String> = row.try_get("bio").map_err(map_db_error)?;
    let created_at: chrono::DateTime<chrono::Utc> =
        row.try_get("created_at").map_err(map_db_error)?;

    Ok(CreatorProfile {
        user_id: UserId::from_uuid(user_id),
        platforms,
        follower_count,
        niches,
        bio,
        created_at: Timestamp::from_datetime(created_at),
    })
}

fn brand_from_row(row: &PgRow) -> Result<BrandProfile, StoreError> {
    let user_id: Uuid = row.try_get("user_id").map_err(map_db_error)?;
    let company_name: String = row.try_get("company_name").map_err(map_db_error)?;
    let industry: Option<String> = row.try_get("industry").map_err(map_db_error)?;
    let company_size: Option<String> = row.try_get("company_size").map_err(map_db_error)?;
    let monthly_budget_cents: Option<i64> =
        row.try_get("monthly_budget_cents").map_err(map_db_error)?;
    let website: Option<String> = row.try_get("website").map_err(map_db_error)?;
    let created_at: chrono::DateTime<chrono::Utc> =
        row.try_get("created_at").map_err(map_db_error)?;

    Ok(BrandProfile {
        user_id: UserId::from_uuid(user_id),
        company_name,
        industry,
        company_size,
        monthly_budget_cents,
        website,
        created_at: Timestamp::from_datetime(created_at),
    })
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn find_core(&self, user_id: &UserId) -> Result<Option<CoreProfileRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT user_id, role, onboarding_completed, created_at, updated_at
             FROM profiles WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.as_ref().map(core_from_row).transpose()
    }

    async fn insert_core(&self, record: &CoreProfileRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO profiles (user_id, role, onboarding_completed, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(record.user_id.as_uuid())
        .bind(&record.role)
        .bind(record.onboarding_completed)
        .bind(record.created_at.as_datetime())
        .bind(record.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn set_role(&self, user_id: &UserId, role: Role) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE profiles SET role = $2, updated_at = NOW()
             WHERE user_id = $1 AND role IS NULL",
        )
        .bind(user_id.as_uuid())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            // Distinguish a missing row from a role that is already locked in.
            return match self.find_core(user_id).await? {
                Some(_) => Err(StoreError::backend("role already set")),
                None => Err(StoreError::NotFound),
            };
        }
        Ok(())
    }

    async fn complete_onboarding(&self, user_id: &UserId) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE profiles SET onboarding_completed = TRUE, updated_at = NOW()
             WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn find_creator(&self, user_id: &UserId) -> Result<Option<CreatorProfile>, StoreError> {
        let row = sqlx::query(
            "SELECT user_id, platforms, follower_count, niches, bio, created_at
             FROM creator_profiles WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.as_ref().map(creator_from_row).transpose()
    }

    async fn find_brand(&self, user_id: &UserId) -> Result<Option<BrandProfile>, StoreError> {
        let row = sqlx::query(
            "SELECT user_id, company_name, industry, company_size, monthly_budget_cents,
                    website, created_at
             FROM brand_profiles WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.as_ref().map(brand_from_row).transpose()
    }

    async fn insert_creator(&self, profile: &CreatorProfile) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO creator_profiles
                (user_id, platforms, follower_count, niches, bio, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(profile.user_id.as_uuid())
        .bind(&profile.platforms)
        .bind(profile.follower_count)
        .bind(&profile.niches)
        .bind(&profile.bio)
        .bind(profile.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn insert_brand(&self, profile: &BrandProfile) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO brand_profiles
                (user_id, company_name, industry, company_size, monthly_budget_cents,
                 website, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(profile.user_id.as_uuid())
        .bind(&profile.company_name)
        .bind(&profile.industry)
        .bind(&profile.company_size)
        .bind(profile.monthly_budget_cents)
        .bind(&profile.website)
        .bind(profile.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_classifies_as_unique_violation() {
        assert!(matches!(
            classify_pg_code("23505", "duplicate key value violates unique constraint"),
            StoreError::UniqueViolation
        ));
    }

    #[test]
    fn insufficient_privilege_classifies_as_permission_denied() {
        let error = classify_pg_code("42501", "permission denied for table profiles");
        assert!(matches!(error, StoreError::PermissionDenied));
        assert!(error.is_not_ready());
    }

    #[test]
    fn other_codes_classify_as_backend() {
        let error = classify_pg_code("40001", "could not serialize access");
        assert!(matches!(error, StoreError::Backend(_)));
        assert!(!error.is_not_ready());
    }
}
