//! JWT authentication: login, token issuance and validation, and the
//! middleware that guards the profile routes.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::user::{self, UserRole};
use crate::errors::ServiceError;

/// Claim set carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    pub customer_id: Option<Uuid>,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated identity extracted from a validated token. Inserted into
/// request extensions by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub customer_id: Option<Uuid>,
    pub token_id: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration_secs: u64,
}

/// Login body. Shoppers log in with their email; the seeded admin account
/// uses a plain username, so both spellings of the field are accepted.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username")]
    pub email: String,
    pub password: String,
}

/// Mirrors what the storefront expects back from a login: the bearer token
/// plus the identity it encodes.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub customer_id: Option<Uuid>,
}

/// Token issuance and validation over the users table.
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DbPool>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DbPool>) -> Self {
        Self { config, db }
    }

    /// Verify a username/password pair and issue a token. Both unknown
    /// usernames and wrong passwords produce the same error so the response
    /// never discloses which accounts exist.
    #[instrument(skip(self, request), fields(username = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ServiceError> {
        let username = request.email.trim().to_lowercase();

        let Some(account) = user::Entity::find()
            .filter(user::Column::Username.eq(&username))
            .one(self.db.as_ref())
            .await?
        else {
            warn!("login attempt for unknown username");
            return Err(ServiceError::Unauthorized(
                "Invalid credentials".to_string(),
            ));
        };

        if !verify_password(&request.password, &account.password_hash)? {
            warn!("login attempt with wrong password");
            return Err(ServiceError::Unauthorized(
                "Invalid credentials".to_string(),
            ));
        }

        let token = self.issue_token(&account)?;
        debug!(user_id = %account.id, "login succeeded");

        Ok(LoginResponse {
            token,
            user: UserInfo {
                id: account.id,
                username: account.username,
                role: account.role,
                customer_id: account.customer_id,
            },
        })
    }

    pub fn issue_token(&self, account: &user::Model) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            role: account.role,
            customer_id: account.customer_id,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.config.token_expiration_secs as i64,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("token creation failed: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ServiceError::Unauthorized("Token expired".to_string())
            }
            _ => ServiceError::Unauthorized("Invalid token".to_string()),
        })
    }
}

/// Requires a valid `Authorization: Bearer` token and stores the resulting
/// [`AuthUser`] in request extensions for downstream handlers.
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(token) = token else {
        return ServiceError::Unauthorized("Missing bearer token".to_string()).into_response();
    };

    match authenticate(&auth_service, token) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn authenticate(auth_service: &AuthService, token: &str) -> Result<AuthUser, ServiceError> {
    let claims = auth_service.validate_token(token)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ServiceError::Unauthorized("Invalid token".to_string()))?;

    Ok(AuthUser {
        user_id,
        username: claims.username,
        role: claims.role,
        customer_id: claims.customer_id,
        token_id: claims.jti,
    })
}

pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalError(format!("password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ServiceError::InternalError(format!("stored hash is malformed: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
