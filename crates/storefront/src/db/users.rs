//! User repository for database operations.
//!
//! Admins, staff and customers share the `dairy.user` table and are told apart
//! by `role`. Phone numbers are unique across all roles.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use yadukul_core::{Phone, Role, UserId};

use super::RepositoryError;
use crate::models::user::{NewStaff, ProfileUpdate, User};

const USER_COLUMNS: &str = "id, name, phone, role, address, avatar_url, loyalty_points, \
                            assigned_area, performance, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    phone: String,
    role: Role,
    address: Option<String>,
    avatar_url: Option<String>,
    loyalty_points: i32,
    assigned_area: Option<String>,
    performance: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let phone = Phone::parse(&row.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            phone,
            role: row.role,
            address: row.address,
            avatar_url: row.avatar_url,
            loyalty_points: row.loyalty_points,
            assigned_area: row.assigned_area,
            performance: row.performance,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the phone in the database is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM dairy.user WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user by their phone number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the phone in the database is invalid.
    pub async fn get_by_phone(&self, phone: &Phone) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM dairy.user WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List every user with the given role, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM dairy.user WHERE role = $1 ORDER BY created_at, id"
        ))
        .bind(role)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a user with just a name, phone and role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        phone: &Phone,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO dairy.user (name, phone, role) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(phone)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::conflict_on_unique(e, "phone already registered"))?;

        row.try_into()
    }

    /// Create a staff member.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_staff(&self, staff: &NewStaff) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO dairy.user (name, phone, role, assigned_area, performance) \
             VALUES ($1, $2, 'staff', $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&staff.name)
        .bind(&staff.phone)
        .bind(staff.assigned_area.as_deref())
        .bind(staff.performance)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::conflict_on_unique(e, "phone already registered"))?;

        row.try_into()
    }

    /// Replace a staff member's editable fields.
    ///
    /// Returns `None` if no staff member has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new phone belongs to someone else.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_staff(
        &self,
        id: UserId,
        staff: &NewStaff,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE dairy.user \
             SET name = $2, phone = $3, assigned_area = $4, performance = $5 \
             WHERE id = $1 AND role = 'staff' \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&staff.name)
        .bind(&staff.phone)
        .bind(staff.assigned_area.as_deref())
        .bind(staff.performance)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::conflict_on_unique(e, "phone already registered"))?;

        row.map(TryInto::try_into).transpose()
    }

    /// Delete a staff member.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no staff member has this ID.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_staff(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM dairy.user WHERE id = $1 AND role = 'staff'")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Apply a profile update; absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE dairy.user \
             SET name = COALESCE($2, name), \
                 address = COALESCE($3, address), \
                 avatar_url = COALESCE($4, avatar_url) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.address.as_deref())
        .bind(update.avatar_url.as_deref())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Create an admin, or promote the existing user with this phone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_admin(&self, name: &str, phone: &Phone) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO dairy.user (name, phone, role) VALUES ($1, $2, 'admin') \
             ON CONFLICT (phone) DO UPDATE SET name = EXCLUDED.name, role = 'admin' \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(phone)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }
}
