// utils/config.rs
use crate::infrastructure::error::{AppError, AppResult};
use dotenv::dotenv;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use uuid::Uuid;

/// Préfixe des variables décrivant les problèmes attribués à un rôle,
/// par exemple `ROLE_PROBLEMS_STANDARD=<uuid>,<uuid>`.
pub const ROLE_PROBLEMS_PREFIX: &str = "ROLE_PROBLEMS_";

/// Rôle attribué par `create-standard-user`
pub const STANDARD_ROLE: &str = "standard";

pub const DEFAULT_WISE_SAYINGS_URL: &str = "https://www.gutenberg.org/files/21130/21130-0.txt";
pub const DEFAULT_PRIDE_URL: &str = "https://www.gutenberg.org/files/1342/1342-0.txt";

#[derive(Debug, Clone)]
pub struct Config {
    // Environnement et serveur
    pub run_mode: String,
    pub server_host: String,
    pub server_port: u16,
    pub workers: usize,
    pub log_level: String,
    pub log_format: String,

    // Base de données
    pub database_url: String,
    pub database_max_connections: u32,

    // Sécurité
    pub jwt_secret: Option<String>,
    pub jwt_expiry_hours: i64,

    // Sources d'import
    pub wise_sayings_url: String,
    pub pride_url: String,
    pub atom_csv_path: String,
    pub http_timeout_seconds: u64,

    // Rôle -> problèmes attribués
    pub role_problems: HashMap<String, Vec<Uuid>>,
}

impl Config {
    /// Charger la configuration depuis les variables d'environnement
    pub fn from_env() -> AppResult<Self> {
        // Charger le fichier .env si présent
        dotenv().ok();

        Self::from_vars(env::vars().collect())
    }

    /// Construit la configuration depuis un jeu de variables explicite
    pub fn from_vars(vars: HashMap<String, String>) -> AppResult<Self> {
        let database_url = vars.get("DATABASE_URL").cloned().ok_or_else(|| {
            AppError::ConfigurationError(
                "Variable d'environnement requise manquante: DATABASE_URL".to_string(),
            )
        })?;

        Ok(Config {
            run_mode: string_var(&vars, "RUN_MODE", "development"),
            server_host: string_var(&vars, "SERVER_HOST", "0.0.0.0"),
            server_port: parse_var(&vars, "SERVER_PORT", 8080)?,
            workers: parse_var(&vars, "WORKERS", 4)?,
            log_level: string_var(&vars, "LOG_LEVEL", "info"),
            log_format: string_var(&vars, "LOG_FORMAT", "compact"),

            database_url,
            database_max_connections: parse_var(&vars, "DATABASE_MAX_CONNECTIONS", 10)?,

            jwt_secret: vars.get("JWT_SECRET").filter(|s| !s.is_empty()).cloned(),
            jwt_expiry_hours: parse_var(&vars, "JWT_EXPIRY_HOURS", 12)?,

            wise_sayings_url: string_var(&vars, "WISE_SAYINGS_URL", DEFAULT_WISE_SAYINGS_URL),
            pride_url: string_var(&vars, "PRIDE_URL", DEFAULT_PRIDE_URL),
            atom_csv_path: string_var(&vars, "ATOM_CSV_PATH", "atom-risk.csv"),
            http_timeout_seconds: parse_var(&vars, "HTTP_TIMEOUT_SECONDS", 30)?,

            role_problems: parse_role_problems(&vars)?,
        })
    }

    /// Problèmes attribués à un rôle (liste vide si le rôle n'est pas configuré)
    pub fn problems_for_role(&self, role: &str) -> &[Uuid] {
        self.role_problems
            .get(&role.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Secret JWT, obligatoire pour servir l'API
    pub fn require_jwt_secret(&self) -> AppResult<&str> {
        self.jwt_secret.as_deref().ok_or_else(|| {
            AppError::ConfigurationError(
                "Variable d'environnement requise manquante: JWT_SECRET".to_string(),
            )
        })
    }
}

fn string_var(vars: &HashMap<String, String>, key: &str, default: &str) -> String {
    vars.get(key).cloned().unwrap_or_else(|| default.to_string())
}

fn parse_var<T: FromStr>(vars: &HashMap<String, String>, key: &str, default: T) -> AppResult<T> {
    match vars.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::ConfigurationError(format!("{} must be a number", key))),
        None => Ok(default),
    }
}

fn parse_role_problems(vars: &HashMap<String, String>) -> AppResult<HashMap<String, Vec<Uuid>>> {
    let mut roles = HashMap::new();

    for (key, value) in vars {
        let Some(role) = key.strip_prefix(ROLE_PROBLEMS_PREFIX) else {
            continue;
        };

        let ids = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Uuid::parse_str(s).map_err(|_| {
                    AppError::ConfigurationError(format!("{}: UUID invalide '{}'", key, s))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        roles.insert(role.to_lowercase(), ids);
    }

    Ok(roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_vars(vars(&[])).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/annotator")])).unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.atom_csv_path, "atom-risk.csv");
        assert_eq!(config.wise_sayings_url, DEFAULT_WISE_SAYINGS_URL);
        assert!(config.jwt_secret.is_none());
        assert!(config.problems_for_role(STANDARD_ROLE).is_empty());
    }

    #[test]
    fn invalid_port_is_a_configuration_error() {
        let err = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/annotator"),
            ("SERVER_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }

    #[test]
    fn role_problems_are_parsed_per_role() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/annotator"),
            ("ROLE_PROBLEMS_STANDARD", &format!("{}, {}", a, b)),
            ("ROLE_PROBLEMS_REVIEWER", ""),
        ]))
        .unwrap();

        assert_eq!(config.problems_for_role("standard"), &[a, b]);
        assert!(config.problems_for_role("reviewer").is_empty());
    }

    #[test]
    fn invalid_role_uuid_is_rejected() {
        let err = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/annotator"),
            ("ROLE_PROBLEMS_STANDARD", "not-a-uuid"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }
}
