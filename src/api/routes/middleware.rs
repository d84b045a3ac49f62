//! # Session de l'utilisateur courant
//!
//! Les routes protégées déclarent un paramètre `CurrentUser`: l'extracteur
//! lit `Authorization: Bearer <token>`, vérifie la signature JWT puis charge
//! l'utilisateur en base. Toute erreur donne un 401 avant que le handler ne
//! soit appelé.

use actix_web::{
    dev::Payload,
    http::header::{HeaderMap, AUTHORIZATION},
    web, FromRequest, HttpRequest,
};
use futures_util::future::LocalBoxFuture;

use crate::{
    api::AppState,
    domain::user::User,
    infrastructure::error::{unauthorized, AppError},
    utils::security::verify_session_token,
};

/// Utilisateur authentifié de la requête
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req.headers());

        Box::pin(async move {
            let state = state
                .ok_or_else(|| AppError::InternalError("AppState non configuré".to_string()))?;
            let token =
                token.ok_or_else(|| unauthorized("Missing or invalid Authorization header"))?;

            let claims = verify_session_token(&token, &state.jwt_secret)?;

            let user = state
                .db
                .users()
                .get_by_id(&claims.sub)
                .await?
                .ok_or_else(|| unauthorized("utilisateur inconnu"))?;

            Ok(CurrentUser(user))
        })
    }
}

/// Extrait le token d'un en-tête `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
