//! Authentication service for user registration, login, and token issuance

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::middleware::Claims;
use crate::models::UserRow;
use shared::models::{LoginRequest, LoginResponse, RegisterRequest, User};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Register a new user account
    pub async fn register(&self, input: RegisterRequest) -> AppResult<User> {
        // Required fields guaranteed by the validated payload
        let username = input.username.unwrap_or_default();
        let email = input.email.unwrap_or_default();
        let password = input.password.unwrap_or_default();

        // Pre-check uniqueness for friendlier field errors; the DB
        // constraints still backstop races
        let username_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(&username)
        .fetch_one(&self.db)
        .await?;

        if username_taken {
            return Err(AppError::Conflict {
                resource: "username".to_string(),
                message: "Username already exists".to_string(),
                message_pt: "Nome de usuário já existe.".to_string(),
            });
        }

        let email_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(&email)
        .fetch_one(&self.db)
        .await?;

        if email_taken {
            return Err(AppError::Conflict {
                resource: "email".to_string(),
                message: "Email already registered".to_string(),
                message_pt: "Email já registrado.".to_string(),
            });
        }

        let password_hash = hash(&password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash
            "#,
        )
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            crate::error::map_unique_violation(
                e,
                &[
                    ("uq_users_username", "username", "Nome de usuário já existe."),
                    ("uq_users_email", "email", "Email já registrado."),
                ],
            )
        })?;

        Ok(user.into())
    }

    /// Authenticate with email and password, returning a bearer token
    pub async fn login(&self, input: LoginRequest) -> AppResult<LoginResponse> {
        let email = input.email.unwrap_or_default();
        let password = input.password.unwrap_or_default();

        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, password_hash FROM users WHERE email = $1",
        )
        .bind(&email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self.generate_token(user.id, &user.username)?;

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            username: user.username,
        })
    }

    /// Fetch the public record of a user
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, password_hash FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário".to_string()))?;

        Ok(user.into())
    }

    /// Generate an access token
    fn generate_token(&self, user_id: Uuid, username: &str) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }
}
