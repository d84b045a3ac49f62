use actix_web::{post, web, HttpResponse};
use serde::Serialize;
use validator::Validate;
use uuid::Uuid;

use crate::{
    api::AppState,
    domain::user::{User, UserLogin},
    infrastructure::error::AppResult,
    utils::security::generate_session_token,
};

/// Réponse d'authentification réussie
#[derive(Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Réponse simplifiée pour l'utilisateur (exclut les données sensibles)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub is_superuser: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_superuser: user.is_superuser,
            created_at: user.created_at,
        }
    }
}

/// Endpoint de connexion (nom d'utilisateur/mot de passe)
#[post("/auth/login")]
pub async fn login(
    credentials: web::Json<UserLogin>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    // Validation des inputs
    credentials.validate()?;

    let user = state
        .db
        .users()
        .authenticate(&credentials.username, &credentials.password)
        .await?;

    let access_token = generate_session_token(
        user.id,
        &user.username,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )?;

    tracing::info!(user_id = %user.id, "🔑 Connexion de '{}'", user.username);

    let response = AuthResponse {
        user: user.into(),
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_expiry_hours * 3600,
    };

    Ok(HttpResponse::Ok().json(response))
}
