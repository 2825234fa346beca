use std::sync::Arc;

use async_trait::async_trait;
use blog_auth::Authenticator;
use blog_auth::LookupError;
use blog_auth::UserClaims;
use blog_auth::UserLookup;
use blog_auth::UserRecord;
use chrono::Utc;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Also serves as the user lookup behind the authentication gate.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self
            .authenticator
            .hash_password(command.password.as_str())
            .map_err(|e| UserError::PasswordHashing(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<Session, UserError> {
        let Some(user) = self
            .repository
            .find_by_username_or_email(&command.username_or_email)
            .await?
        else {
            return Err(self
                .authenticator
                .reject_unknown_account(&command.password)
                .into());
        };

        let result = self.authenticator.authenticate(
            &command.password,
            &user.password_hash,
            &UserClaims::claim_set(user.id),
        )?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(Session {
            user,
            token: result.access_token,
            expires_at: result.expires_at,
        })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<UR> UserLookup for UserService<UR>
where
    UR: UserRepository,
{
    async fn lookup_user_by_id(&self, id: &str) -> Result<Option<UserRecord>, LookupError> {
        // Identifiers we never issue cannot belong to a user.
        let Ok(id) = UserId::from_string(id) else {
            return Ok(None);
        };

        let user = self
            .repository
            .find_by_id(&id)
            .await
            .map_err(|e| LookupError(e.to_string()))?;

        Ok(user.map(|user| UserRecord {
            id: user.id.to_string(),
            password_hash: user.password_hash,
        }))
    }
}
