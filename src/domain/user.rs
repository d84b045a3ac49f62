use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use validator::Validate;

/// Représente un utilisateur de l'outil d'annotation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Identifiant unique de l'utilisateur (UUID)
    pub id: Uuid,
    /// Nom de connexion (unique)
    pub username: String,
    /// Hash Argon2 du mot de passe (jamais exposé dans les APIs)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Un super-utilisateur a accès à tous les problèmes
    pub is_superuser: bool,
    /// Date de création du compte
    pub created_at: DateTime<Utc>,
}

/// Données requises pour créer un nouvel utilisateur
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 64, message = "Le nom d'utilisateur doit contenir entre 1 et 64 caractères"))]
    pub username: String,
    #[validate(length(min = 1, message = "Mot de passe requis"))]
    pub password: String,
    pub is_superuser: bool,
}

/// Données pour la connexion d'un utilisateur
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserLogin {
    #[validate(length(min = 1, message = "Nom d'utilisateur requis"))]
    pub username: String,
    pub password: String,
}

impl NewUser {
    pub fn superuser(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            is_superuser: true,
        }
    }

    pub fn standard(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            is_superuser: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_credentials_are_accepted() {
        assert!(NewUser::superuser("admin", "admin").validate().is_ok());
        assert!(NewUser::standard("a", "x").validate().is_ok());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        assert!(NewUser::standard("", "secret").validate().is_err());
        assert!(NewUser::standard("alice", "").validate().is_err());
    }

    #[test]
    fn username_longer_than_column_is_rejected() {
        let user = NewUser::standard("u".repeat(65), "secret");
        assert!(user.validate().is_err());
    }

    #[test]
    fn valid_superuser_passes_validation() {
        let user = NewUser::superuser("admin", "correct horse battery");
        assert!(user.validate().is_ok());
        assert!(user.is_superuser);
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "bob".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            is_superuser: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"username\":\"bob\""));
    }
}
