use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use validator::ValidationErrors;

/// Type de résultat standard pour l'application
pub type AppResult<T> = Result<T, AppError>;

/// Erreurs principales de l'application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Session absente ou invalide (401 Unauthorized)
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Pas de droits sur la ressource (403 Forbidden)
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Ressource non trouvée (404 Not Found)
    #[error("{0} not found")]
    NotFound(String),

    /// Contrainte d'unicité violée (409 Conflict)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Données invalides (422 Unprocessable Entity)
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Erreur de base de données (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(#[source] SqlxError),

    /// Source externe injoignable ou en erreur (502 Bad Gateway)
    #[error("External source error: {0}")]
    ExternalSource(String),

    /// Fichier CSV illisible (422 Unprocessable Entity)
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Erreur de configuration (500 Internal Server Error)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Erreur interne du serveur (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Convertit l'erreur en code HTTP approprié
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) | AppError::CsvError(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::ExternalSource(_) => StatusCode::BAD_GATEWAY,
            AppError::DatabaseError(_)
            | AppError::ConfigurationError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message renvoyé au client (les détails internes restent dans les logs)
    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::Unauthorized(_) => "Authentification requise.".to_string(),
            AppError::Forbidden(_) => {
                "Vous n'avez pas les droits sur ce problème.".to_string()
            }
            AppError::NotFound(resource) => format!("{} non trouvé", resource),
            AppError::Conflict(message) => format!("Conflit: {}", message),
            AppError::ValidationError(message) | AppError::CsvError(message) => message.clone(),
            AppError::ExternalSource(_)
            | AppError::DatabaseError(_)
            | AppError::ConfigurationError(_)
            | AppError::InternalError(_) => "Une erreur interne est survenue.".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "❌ Erreur serveur");
        }

        let error_response = ErrorResponse {
            error: self.user_friendly_message(),
            code: self.status_code().as_u16(),
        };

        HttpResponse::build(self.status_code()).json(error_response)
    }
}

/// Structure de réponse d'erreur standardisée
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

// Implémentations From pour les conversions automatiques

impl From<SqlxError> for AppError {
    fn from(error: SqlxError) -> Self {
        match &error {
            SqlxError::RowNotFound => AppError::NotFound("Resource".to_string()),
            SqlxError::Database(db_error) => match db_error.code().as_deref() {
                Some("23505") => AppError::Conflict(
                    db_error
                        .constraint()
                        .map(|c| format!("unique constraint violation ({})", c))
                        .unwrap_or_else(|| "unique constraint violation".to_string()),
                ),
                Some("23503") => AppError::NotFound("Referenced row".to_string()),
                _ => AppError::DatabaseError(error),
            },
            _ => AppError::DatabaseError(error),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                match &error.message {
                    Some(msg) => messages.push(msg.to_string()),
                    None => messages.push(format!("champ '{}' invalide", field)),
                }
            }
        }
        messages.sort();
        AppError::ValidationError(messages.join("; "))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        AppError::ExternalSource(format!("IO error: {}", error))
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        AppError::CsvError(error.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            AppError::ExternalSource("Request timeout".to_string())
        } else if error.is_connect() {
            AppError::ExternalSource("Connection failed".to_string())
        } else {
            AppError::ExternalSource(format!("HTTP request error: {}", error))
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(error: argon2::password_hash::Error) -> Self {
        AppError::InternalError(format!("Erreur de hashage: {}", error))
    }
}

// Helper functions pour créer des erreurs courantes
pub fn not_found<T: Into<String>>(resource: T) -> AppError {
    AppError::NotFound(resource.into())
}

pub fn forbidden<T: Into<String>>(message: T) -> AppError {
    AppError::Forbidden(message.into())
}

pub fn unauthorized<T: Into<String>>(message: T) -> AppError {
    AppError::Unauthorized(message.into())
}

pub fn validation_error<T: Into<String>>(message: T) -> AppError {
    AppError::ValidationError(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn forbidden_and_not_found_use_distinct_statuses() {
        assert_eq!(forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(not_found("Problem").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: AppError = SqlxError::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn server_errors_hide_details() {
        let err = AppError::InternalError("secret stack trace".to_string());
        assert!(!err.user_friendly_message().contains("secret"));
    }

    #[actix_web::test]
    async fn error_response_is_json_with_code() {
        let response = not_found("Problème").error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_json_eq!(value, json!({ "error": "Problème non trouvé", "code": 404 }));
    }
}
