//! User repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use thiserror::Error;
use uuid::Uuid;

use monedero_shared::SubscriptionTier;

use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// The user does not exist.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// The email is already registered.
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a permanent user.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` or a database error.
    pub async fn create(
        &self,
        email: &str,
        display_name: &str,
        tier: SubscriptionTier,
    ) -> Result<users::Model, UserError> {
        self.insert(email, display_name, tier, false, None).await
    }

    /// Creates a guest user that expires at the given instant.
    ///
    /// Expired guests are removed, with everything they own, by the
    /// guest-expiry sweep.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` or a database error.
    pub async fn create_guest(
        &self,
        email: &str,
        display_name: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<users::Model, UserError> {
        self.insert(
            email,
            display_name,
            SubscriptionTier::Free,
            true,
            Some(expires_at),
        )
        .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find_by_id(&self, id: Uuid) -> Result<users::Model, UserError> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Changes a user's subscription tier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn set_tier(
        &self,
        id: Uuid,
        tier: SubscriptionTier,
    ) -> Result<users::Model, UserError> {
        let user = self.find_by_id(id).await?;
        let mut active: users::ActiveModel = user.into();
        active.tier = Set(tier.into());
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    async fn insert(
        &self,
        email: &str,
        display_name: &str,
        tier: SubscriptionTier,
        is_guest: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<users::Model, UserError> {
        if self.find_by_email(email).await?.is_some() {
            return Err(UserError::DuplicateEmail(email.to_owned()));
        }

        let now = Utc::now();
        let model = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_owned()),
            display_name: Set(display_name.to_owned()),
            tier: Set(tier.into()),
            is_guest: Set(is_guest),
            expires_at: Set(expires_at.map(Into::into)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        Ok(model.insert(&self.db).await?)
    }
}
