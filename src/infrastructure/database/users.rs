use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use chrono::Utc;
use validator::Validate;

use crate::{
    domain::user::{NewUser, User},
    domain::problem::UserProblem,
    infrastructure::error::{AppError, AppResult},
    utils::security::{hash_password, verify_password},
};

/// Repository pour les opérations sur les utilisateurs et leurs droits
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Crée une nouvelle instance du repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crée un nouvel utilisateur dans la base de données
    ///
    /// # Retourne
    /// * `Ok(User)` - L'utilisateur créé avec son ID généré
    /// * `Err(AppError::Conflict)` - Si le nom d'utilisateur existe déjà
    pub async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        let mut conn = self.pool.acquire().await?;
        Self::insert(&mut conn, new_user).await
    }

    /// Insère un utilisateur sur une connexion (ou transaction) existante
    pub async fn insert(conn: &mut PgConnection, new_user: &NewUser) -> AppResult<User> {
        // Validation des données d'entrée
        new_user.validate()?;

        let password_hash = hash_password(&new_user.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, is_superuser, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, password_hash, is_superuser, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&password_hash)
        .bind(new_user.is_superuser)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict(format!(
                "l'utilisateur '{}' existe déjà",
                new_user.username
            )),
            other => other,
        })?;

        Ok(user)
    }

    /// Récupère un utilisateur par son ID
    pub async fn get_by_id(&self, user_id: &Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, is_superuser, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Récupère un utilisateur par son nom de connexion
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, is_superuser, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Authentifie un utilisateur avec son nom et son mot de passe
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("identifiants invalides".to_string()))?;

        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(AppError::Unauthorized("identifiants invalides".to_string()))
        }
    }

    /// Accorde à un utilisateur le droit d'annoter un problème
    pub async fn grant_problem(
        conn: &mut PgConnection,
        user_id: &Uuid,
        problem_id: &Uuid,
    ) -> AppResult<UserProblem> {
        let grant = sqlx::query_as::<_, UserProblem>(
            r#"
            INSERT INTO user_problems (id, user_id, problem_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, problem_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(problem_id)
        .fetch_one(conn)
        .await?;

        Ok(grant)
    }

    /// Vérifie si l'utilisateur possède un droit sur le problème
    pub async fn has_grant(&self, user_id: &Uuid, problem_id: &Uuid) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_problems
                WHERE user_id = $1 AND problem_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(problem_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Liste les droits d'un utilisateur
    pub async fn grants_for_user(&self, user_id: &Uuid) -> AppResult<Vec<UserProblem>> {
        let grants = sqlx::query_as::<_, UserProblem>(
            "SELECT id, user_id, problem_id FROM user_problems WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(grants)
    }
}
